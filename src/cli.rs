use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_MAX_RESIDENT: usize = 300;

pub const HELP_KEYS: &str = "\
Key Bindings:
  Esc / q       : Close window
  f             : Toggle fullscreen
  l             : Print cache status
  Right / Left  : Next / previous image
  Up / Down     : Forward / back 10 images
  PgUp / PgDn   : Forward / back 100 images
  End / Home    : Last / first image
  1 2 3 4 5     : Preload 1 / 5 / 10 / 30 / 100 images
  6 7 8 9 0     : Unload 1 / 5 / 10 / 30 / 100 images
";

#[derive(Parser)]
#[command(name = "imview", about = "Image sequence viewer", after_help = HELP_KEYS)]
pub struct Cli {
    /// Image files or directories to view, in order
    #[arg(required_unless_present = "file_list")]
    pub paths: Vec<PathBuf>,

    /// Load file list from a text file (one path per line)
    #[arg(short = 'L', long, value_name = "FILE")]
    pub file_list: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Most decoded images kept in memory; older ones are unloaded first
    #[arg(short = 'c', long, default_value_t = DEFAULT_MAX_RESIDENT)]
    pub max_resident: usize,

    /// Parallel decode workers (default: number of CPUs)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Open every image in its own window instead of one navigable window
    #[arg(short, long)]
    pub gallery: bool,

    /// Start in a window rather than fullscreen
    #[arg(short, long)]
    pub windowed: bool,
}

impl Cli {
    pub fn worker_count(&self) -> usize {
        self.workers.filter(|&n| n > 0).unwrap_or_else(default_workers)
    }
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
