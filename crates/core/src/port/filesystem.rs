// Filesystem Port (listing and existence checks)

use std::path::Path;

/// Filesystem access needed by flows
pub trait FileSystem: Send + Sync {
    /// Entry names of a directory, in the order the OS returns them
    ///
    /// # Errors
    /// Returns an error if the path is missing, not a directory, or unreadable
    fn list_dir(&self, path: &Path) -> std::io::Result<Vec<String>>;

    fn exists(&self, path: &Path) -> bool;
}

pub mod mocks {
    use super::FileSystem;
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::path::{Path, PathBuf};

    /// In-memory directories (listing order kept as inserted) and files
    #[derive(Default)]
    pub struct MockFileSystem {
        dirs: HashMap<PathBuf, Vec<String>>,
        files: HashSet<PathBuf>,
    }

    impl MockFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dir<I, S>(mut self, path: impl Into<PathBuf>, entries: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.dirs
                .insert(path.into(), entries.into_iter().map(Into::into).collect());
            self
        }

        pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
            self.files.insert(path.into());
            self
        }
    }

    impl FileSystem for MockFileSystem {
        fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
            self.dirs.get(path).cloned().ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "No such file or directory")
            })
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.contains(path) || self.dirs.contains_key(path)
        }
    }
}
