//! Where finished exports are delivered.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Receives a finished export. Called at most once per export, and only
/// with complete data.
pub trait ExportTarget: Send + Sync {
    fn save(&self, filename: &str, data: &[u8]) -> io::Result<()>;
}

impl<T: ExportTarget + ?Sized> ExportTarget for &T {
    fn save(&self, filename: &str, data: &[u8]) -> io::Result<()> {
        (**self).save(filename, data)
    }
}

impl<T: ExportTarget + ?Sized> ExportTarget for Arc<T> {
    fn save(&self, filename: &str, data: &[u8]) -> io::Result<()> {
        (**self).save(filename, data)
    }
}

/// Saves into a directory.
///
/// Data is written to a hidden `.part` sibling and renamed into place, so
/// a reader never sees a truncated file under the final name.
#[derive(Clone, Debug)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path a download named `filename` ends up at.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(sanitize(filename))
    }
}

impl ExportTarget for DirectoryTarget {
    fn save(&self, filename: &str, data: &[u8]) -> io::Result<()> {
        let name = sanitize(filename);
        let dest = self.dir.join(&name);
        let part = self.dir.join(format!(".{name}.part"));

        let written = fs::write(&part, data).and_then(|()| fs::rename(&part, &dest));
        if let Err(e) = written {
            let _ = fs::remove_file(&part);
            return Err(e);
        }
        log::info!("saved {} ({} bytes)", dest.display(), data.len());
        Ok(())
    }
}

/// Path separators would let a filename escape the directory.
fn sanitize(filename: &str) -> String {
    let name: String = filename
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    match name.as_str() {
        "" | "." | ".." => "export.png".to_owned(),
        _ => name,
    }
}

/// One delivered export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Keeps downloads in memory. Clones share the same list.
#[derive(Clone, Debug, Default)]
pub struct MemoryTarget {
    downloads: Arc<Mutex<Vec<Download>>>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything saved so far, oldest first.
    pub fn downloads(&self) -> Vec<Download> {
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ExportTarget for MemoryTarget {
    fn save(&self, filename: &str, data: &[u8]) -> io::Result<()> {
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Download {
                filename: filename.to_owned(),
                data: data.to_vec(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_writes_final_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let target = DirectoryTarget::new(dir.path());
        target.save("EXPORT_A_B.png", b"png").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["EXPORT_A_B.png".to_owned()]);
        assert_eq!(fs::read(target.path_for("EXPORT_A_B.png")).unwrap(), b"png");
    }

    #[test]
    fn separators_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let target = DirectoryTarget::new(dir.path());
        target.save("EXPORT_a/b_c\\d.png", b"x").unwrap();
        assert!(dir.path().join("EXPORT_a_b_c_d.png").exists());
        assert_eq!(sanitize(".."), "export.png");
    }

    #[test]
    fn missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let target = DirectoryTarget::new(dir.path().join("gone"));
        assert!(target.save("a.png", b"x").is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn memory_target_shares_between_clones() {
        let target = MemoryTarget::new();
        let other = target.clone();
        other.save("a.png", &[1, 2]).unwrap();
        assert_eq!(
            target.downloads(),
            vec![Download {
                filename: "a.png".into(),
                data: vec![1, 2]
            }]
        );
    }
}
