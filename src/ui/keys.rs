use winit::keyboard::{Key, NamedKey};

use crate::session::{Intent, JUMP_TO_END};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Close,
    ToggleFullscreen,
    Session(Intent),
}

/// Maps a pressed (or auto-repeated) key to what the viewer should do.
pub fn action_for(key: &Key) -> Option<Action> {
    let intent = match key {
        Key::Named(named) => match named {
            NamedKey::Escape => return Some(Action::Close),
            NamedKey::ArrowRight => Intent::Navigate(1),
            NamedKey::ArrowUp => Intent::Navigate(10),
            NamedKey::PageUp => Intent::Navigate(100),
            NamedKey::End => Intent::Navigate(JUMP_TO_END),
            NamedKey::ArrowLeft => Intent::Navigate(-1),
            NamedKey::ArrowDown => Intent::Navigate(-10),
            NamedKey::PageDown => Intent::Navigate(-100),
            NamedKey::Home => Intent::Navigate(-JUMP_TO_END),
            _ => return None,
        },
        Key::Character(s) => match s.to_lowercase().as_str() {
            "q" => return Some(Action::Close),
            "f" => return Some(Action::ToggleFullscreen),
            "l" => Intent::Dump,
            "1" => Intent::Prefetch(1),
            "2" => Intent::Prefetch(5),
            "3" => Intent::Prefetch(10),
            "4" => Intent::Prefetch(30),
            "5" => Intent::Prefetch(100),
            "6" => Intent::Evict(1),
            "7" => Intent::Evict(5),
            "8" => Intent::Evict(10),
            "9" => Intent::Evict(30),
            "0" => Intent::Evict(100),
            _ => return None,
        },
        _ => return None,
    };
    Some(Action::Session(intent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(
            action_for(&Key::Named(NamedKey::ArrowRight)),
            Some(Action::Session(Intent::Navigate(1)))
        );
        assert_eq!(
            action_for(&Key::Named(NamedKey::PageDown)),
            Some(Action::Session(Intent::Navigate(-100)))
        );
        assert_eq!(
            action_for(&Key::Named(NamedKey::Home)),
            Some(Action::Session(Intent::Navigate(-JUMP_TO_END)))
        );
    }

    #[test]
    fn digit_keys_load_and_unload() {
        assert_eq!(action_for(&ch("4")), Some(Action::Session(Intent::Prefetch(30))));
        assert_eq!(action_for(&ch("0")), Some(Action::Session(Intent::Evict(100))));
    }

    #[test]
    fn window_keys() {
        assert_eq!(action_for(&Key::Named(NamedKey::Escape)), Some(Action::Close));
        assert_eq!(action_for(&ch("Q")), Some(Action::Close));
        assert_eq!(action_for(&ch("f")), Some(Action::ToggleFullscreen));
        assert_eq!(action_for(&ch("l")), Some(Action::Session(Intent::Dump)));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(action_for(&ch("x")), None);
        assert_eq!(action_for(&Key::Named(NamedKey::Tab)), None);
    }
}
