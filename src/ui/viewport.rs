use softbuffer::{Context, Surface};
use std::num::NonZeroU32;
use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window};

use crate::decoder::DecodedImage;
use crate::error::AppError;
use crate::ui::render::{draw_fitted, initial_window_size};

/// One window showing one image.
pub struct Viewport {
    pub window: Arc<Window>,
    surface: Surface<Arc<Window>, Arc<Window>>,
    _context: Context<Arc<Window>>,
    image: Arc<DecodedImage>,
    fullscreen: bool,
}

impl Viewport {
    pub fn open(
        event_loop: &ActiveEventLoop,
        image: Arc<DecodedImage>,
        title: &str,
    ) -> Result<Self, AppError> {
        let (w, h) = initial_window_size(image.width, image.height);
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(w, h));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let context = Context::new(Arc::clone(&window))?;
        let surface = Surface::new(&context, Arc::clone(&window))?;

        window.request_redraw();
        Ok(Self {
            window,
            surface,
            _context: context,
            image,
            fullscreen: false,
        })
    }

    pub fn set_image(&mut self, image: Arc<DecodedImage>) {
        self.image = image;
        self.window.request_redraw();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        if self.fullscreen {
            self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            self.window.set_fullscreen(None);
        }
        self.window.request_redraw();
    }

    pub fn redraw(&mut self) {
        let size = self.window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        if let Err(e) = self.surface.resize(w, h) {
            log::error!("resize surface: {}", e);
            return;
        }
        match self.surface.buffer_mut() {
            Ok(mut buffer) => {
                draw_fitted(&mut buffer, w.get(), h.get(), &self.image);
                if let Err(e) = buffer.present() {
                    log::error!("present frame: {}", e);
                }
            }
            Err(e) => log::error!("map frame buffer: {}", e),
        }
    }
}
