mod cache;
mod cli;
mod cursor;
mod decoder;
mod error;
mod files;
mod session;
mod slots;
mod ui;

#[cfg(test)]
mod test_utils;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use winit::event_loop::EventLoop;

use crate::cache::CacheController;
use crate::cli::Cli;
use crate::decoder::{DecodedImage, Decoder, ImageDecoder};
use crate::error::AppError;
use crate::files::collect_images;
use crate::session::{CacheSettings, Session};
use crate::slots::{SlotSequence, SlotStatus};
use crate::ui::App;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let files = collect_images(&cli.paths, cli.file_list.as_deref(), cli.recursive);
    if files.is_empty() {
        return Err(AppError::NoImages);
    }

    let decoder: Arc<dyn Decoder> = Arc::new(ImageDecoder);
    let workers = cli.worker_count();

    let mut app = if cli.gallery {
        App::gallery(decode_all(files, decoder, workers)?)
    } else {
        let settings = CacheSettings { workers, max_resident: cli.max_resident };
        let mut session = Session::new(files, decoder, settings)?;
        let first = session.open()?;
        App::sequence(session, first, !cli.windowed)
    };

    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    app.finish()
}

/// Decodes every path on the worker pool and keeps the ones that worked.
fn decode_all(
    files: Vec<PathBuf>,
    decoder: Arc<dyn Decoder>,
    workers: usize,
) -> Result<Vec<(PathBuf, Arc<DecodedImage>)>, AppError> {
    let total = files.len();
    let mut cache = CacheController::new(SlotSequence::new(files), decoder, workers)?;
    cache.load_next(total, 0)?;

    let images: Vec<_> = cache
        .slots()
        .iter()
        .filter_map(|slot| match slot.status() {
            SlotStatus::Loaded(img) => Some((slot.path().to_path_buf(), Arc::clone(img))),
            _ => None,
        })
        .collect();
    if images.is_empty() {
        return Err(AppError::NoLoadableImage(total));
    }
    Ok(images)
}
