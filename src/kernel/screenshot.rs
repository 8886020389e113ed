use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn screenshot_file_name(index: u32) -> String {
    format!("screenshot{}.png", index)
}

/// Smallest positive index whose file does not exist yet. Gaps are reused,
/// existing files are never overwritten.
pub fn next_screenshot_index(dir: &Path) -> u32 {
    let mut index = 1;
    while dir.join(screenshot_file_name(index)).exists() {
        index += 1;
    }
    index
}

/// Creates the directory if needed and returns the next free path.
pub fn next_screenshot_path(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(screenshot_file_name(next_screenshot_index(dir))))
}
