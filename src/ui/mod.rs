use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::WindowId;

use crate::decoder::DecodedImage;
use crate::error::AppError;
use crate::session::Session;
use crate::ui::keys::{Action, action_for};
use crate::ui::viewport::Viewport;

pub mod keys;
pub mod render;
pub mod viewport;

// ---------------------------------------------------------------------------
// Application handler (winit 0.30 style)
// ---------------------------------------------------------------------------

enum Mode {
    /// One window walking through the session's slots.
    Sequence {
        session: Session,
        first: Arc<DecodedImage>,
        fullscreen: bool,
    },
    /// Every image in its own window; no navigation.
    Gallery(Vec<(PathBuf, Arc<DecodedImage>)>),
}

pub struct App {
    mode: Mode,
    viewports: HashMap<WindowId, Viewport>,
    started: bool,
    error: Option<AppError>,
}

impl App {
    pub fn sequence(session: Session, first: Arc<DecodedImage>, fullscreen: bool) -> Self {
        Self::with_mode(Mode::Sequence { session, first, fullscreen })
    }

    pub fn gallery(images: Vec<(PathBuf, Arc<DecodedImage>)>) -> Self {
        Self::with_mode(Mode::Gallery(images))
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            viewports: HashMap::new(),
            started: false,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn finish(self) -> Result<(), AppError> {
        self.error.map_or(Ok(()), Err)
    }

    fn open_windows(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        match &self.mode {
            Mode::Sequence { session, first, fullscreen } => {
                let mut vp = Viewport::open(event_loop, Arc::clone(first), &session.title())?;
                if *fullscreen {
                    vp.toggle_fullscreen();
                }
                self.viewports.insert(vp.window.id(), vp);
            }
            Mode::Gallery(images) => {
                let opened = open_each(images, |(path, img)| {
                    let title = path.display().to_string();
                    Viewport::open(event_loop, Arc::clone(img), &title)
                        .inspect_err(|e| log::warn!("{}: cannot open window: {}", title, e))
                })?;
                for vp in opened {
                    self.viewports.insert(vp.window.id(), vp);
                }
            }
        }
        Ok(())
    }

    fn close(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        self.viewports.remove(&window_id);
        if self.viewports.is_empty() {
            event_loop.exit();
        }
    }
}

/// Opens every item, skipping the ones that fail. Errors only when nothing
/// opened, with the last failure.
fn open_each<T, V, E>(
    items: impl IntoIterator<Item = T>,
    mut open: impl FnMut(T) -> Result<V, E>,
) -> Result<Vec<V>, E> {
    let mut opened = Vec::new();
    let mut last_err = None;
    for item in items {
        match open(item) {
            Ok(v) => opened.push(v),
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) if opened.is_empty() => Err(e),
        _ => Ok(opened),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;
        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.open_windows(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.close(event_loop, window_id),

            WindowEvent::Resized(_) => {
                if let Some(vp) = self.viewports.get(&window_id) {
                    vp.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(vp) = self.viewports.get_mut(&window_id) {
                    vp.redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let Some(action) = action_for(&event.logical_key) else { return };
                match action {
                    Action::Close => self.close(event_loop, window_id),
                    Action::ToggleFullscreen => {
                        if let Some(vp) = self.viewports.get_mut(&window_id) {
                            vp.toggle_fullscreen();
                        }
                    }
                    Action::Session(intent) => {
                        let Mode::Sequence { session, .. } = &mut self.mode else { return };
                        let handled = session.handle(intent);
                        if let Some(report) = handled.report {
                            println!("{}", report);
                        }
                        if let Some(vp) = self.viewports.get_mut(&window_id) {
                            if let Some(img) = handled.shown {
                                vp.set_image(img);
                            }
                            vp.window.set_title(&session.title());
                        }
                    }
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_odd(n: u32) -> Result<u32, String> {
        if n % 2 == 1 { Ok(n) } else { Err(format!("no window for {}", n)) }
    }

    #[test]
    fn failed_windows_are_skipped() {
        assert_eq!(open_each([1, 2, 3, 4, 5], open_odd), Ok(vec![1, 3, 5]));
    }

    #[test]
    fn fails_only_when_no_window_opens() {
        assert_eq!(open_each([2, 4], open_odd), Err("no window for 4".to_string()));
        assert_eq!(open_each(Vec::<u32>::new(), open_odd), Ok(Vec::new()));
    }
}
