use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Host storage the exporter runs against. Paths are relative to the store.
pub trait DocumentStore: Send + Sync {
    fn read_document(&self, path: &Path) -> io::Result<String>;

    /// Overwrite the document with `text`.
    fn write_document(&self, path: &Path, text: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Create a new file. Fails with `io::ErrorKind::AlreadyExists` if
    /// something is already at `path`, so check-and-create is one step.
    fn create_file(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Create a folder and any missing parents.
    fn create_folder(&self, path: &Path) -> io::Result<()>;
}

/// A vault on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl DocumentStore for FsStore {
    fn read_document(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    fn write_document(&self, path: &Path, text: &str) -> io::Result<()> {
        fs::write(self.resolve(path), text)
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn create_file(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.resolve(path))?;
        file.write_all(content.as_bytes())
    }

    fn create_folder(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(self.resolve(path))
    }
}
