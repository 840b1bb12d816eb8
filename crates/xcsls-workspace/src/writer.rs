use std::io::Write;

use camino::Utf8Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("I/O error writing derived file: {0}")]
    Io(#[from] std::io::Error),
    #[error("derived path has no parent directory")]
    NoParent,
}

/// Persist derived text, write-to-temp-then-rename so the downstream
/// compiler never observes a half-written file.
pub fn write_derived(path: &Utf8Path, content: &str) -> Result<(), WriterError> {
    let parent = path.parent().ok_or(WriterError::NoParent)?;
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.persist(path).map_err(|err| WriterError::Io(err.error))?;
    Ok(())
}

/// Remove a derived file if it exists. A missing file is not an error.
pub fn remove_derived(path: &Utf8Path) -> Result<(), WriterError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(WriterError::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let target = root.join("Generated").join("pages").join("Home.cs");

        write_derived(&target, "class Home {}").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "class Home {}");
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let target = root.join("a.cs");

        write_derived(&target, "one").unwrap();
        write_derived(&target, "two").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "two");
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        assert!(remove_derived(&root.join("absent.cs")).is_ok());
    }

    #[test]
    fn test_remove_existing() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let target = root.join("a.cs");
        write_derived(&target, "x").unwrap();
        remove_derived(&target).unwrap();
        assert!(!target.as_std_path().exists());
    }
}
