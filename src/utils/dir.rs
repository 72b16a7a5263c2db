use std::{io, path::Path};

use crate::error::{ExportError, ExportResult};

/// Creates `path` with all of its parents. Existing directories are fine.
pub fn ensure_dir(path: &Path) -> ExportResult<()> {
    match std::fs::create_dir_all(path) {
        Ok(_) => Ok(()),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(v) => Err(ExportError::io(path, v)),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_ensure_dir_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("output").join("2020");

        ensure_dir(&nested)?;
        ensure_dir(&nested)?;

        assert!(nested.is_dir());
        Ok(())
    }

    #[test]
    fn test_ensure_dir_over_file_fails() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("taken");
        std::fs::write(&file, "")?;

        assert!(matches!(ensure_dir(&file.join("child")), Err(ExportError::Io { .. })));
        Ok(())
    }
}
