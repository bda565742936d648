// Local filesystem adapter (std::fs)

use std::io;
use std::path::Path;

use zoe_core::port::FileSystem;

/// Real disk access
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        // Order is whatever the OS returns; non UTF-8 names are kept (lossy) so they get classified
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
