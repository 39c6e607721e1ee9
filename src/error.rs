use thiserror::Error;

/// Why a single image could not be decoded. Any of these marks the slot as
/// permanently failed.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("decoder panicked")]
    Panicked,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("request count must be positive")]
    InvalidCount,

    #[error("could not start decode workers: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors that end the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no image files found")]
    NoImages,

    #[error("none of the {0} images could be decoded")]
    NoLoadableImage(usize),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("create surface: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),
}
