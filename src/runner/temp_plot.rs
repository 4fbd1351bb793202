use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::warn;

/// Image file produced by the interpreter, removed when the guard goes away.
#[derive(Debug)]
pub struct TempPlot {
    path: PathBuf,
    armed: bool,
}

impl TempPlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting any failure.
    pub fn remove(mut self) -> io::Result<()> {
        self.armed = false;
        fs::remove_file(&self.path)
    }
}

impl Drop for TempPlot {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "could not remove temporary plot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_the_guard_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve");
        fs::write(&path, b"png").unwrap();
        drop(TempPlot::new(&path));
        assert!(!path.exists());
    }

    #[test]
    fn explicit_remove_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let plot = TempPlot::new(dir.path().join("never-written"));
        let err = plot.remove().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
