use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

/// File-system existence checks used by the static path condition.
pub trait FileProbe: Send + Sync {
    fn kind(&self, path: &Path) -> io::Result<FileKind>;
}

/// Probes the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileProbe;

impl FileProbe for StdFileProbe {
    fn kind(&self, path: &Path) -> io::Result<FileKind> {
        let meta = fs::metadata(path)?;
        let kind = if meta.is_file() {
            FileKind::File
        } else if meta.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        };

        Ok(kind)
    }
}
