use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("failed to append note to {path}: {source}")]
    Append { path: PathBuf, source: io::Error },
    #[error("failed to read notes from {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// Result of reading the store. Missing and empty are kept apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesReport {
    Missing,
    Empty,
    Notes(Vec<String>),
}

/// Append-only note file, one note per line.
#[derive(Debug, Clone)]
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, text: &str) -> Result<(), NoteError> {
        // A note must stay on one line.
        let line = text.lines().map(str::trim).collect::<Vec<_>>().join(" ");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| NoteError::Append { path: self.path.clone(), source })?;
        writeln!(file, "{}", line).map_err(|source| NoteError::Append { path: self.path.clone(), source })
    }

    pub fn read(&self) -> Result<NotesReport, NoteError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(NotesReport::Missing),
            Err(source) => return Err(NoteError::Read { path: self.path.clone(), source }),
        };

        let notes: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if notes.is_empty() {
            Ok(NotesReport::Empty)
        } else {
            Ok(NotesReport::Notes(notes))
        }
    }
}
