use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tga", "tiff", "tif", "webp", "ico", "pnm", "pbm",
    "pgm", "ppm", "pam", "dds", "hdr", "exr", "ff", "qoi",
];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Builds the ordered slot list. Files named on the command line or in the
/// list file are kept as given, even if they will not decode; directories
/// contribute their image files in sorted order.
pub fn collect_images(paths: &[PathBuf], file_list: Option<&Path>, recursive: bool) -> Vec<PathBuf> {
    let mut out = Vec::new();

    if let Some(list_path) = file_list {
        match fs::File::open(list_path) {
            Ok(file) => {
                for line in io::BufReader::new(file).lines().map_while(Result::ok) {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        out.push(PathBuf::from(trimmed));
                    }
                }
            }
            Err(e) => log::error!("Cannot read file list {}: {}", list_path.display(), e),
        }
    }

    for path in paths {
        if path.is_dir() {
            scan_dir(path, recursive, &mut out);
        } else {
            out.push(path.clone());
        }
    }

    log::debug!("Collected {} paths", out.len());
    out
}

fn scan_dir(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot scan {}: {}", dir.display(), e);
            return;
        }
    };
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in entries.filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() && is_image_file(&p) {
            files.push(p);
        } else if recursive && p.is_dir() {
            subdirs.push(p);
        }
    }

    files.sort();
    out.extend(files);

    if recursive {
        subdirs.sort();
        for sub in subdirs {
            scan_dir(&sub, true, out);
        }
    }
}
