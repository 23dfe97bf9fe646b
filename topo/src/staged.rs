//! Outputs written to a temporary sibling and renamed into place.

use anyhow::Result;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// A completely written temporary file waiting to replace `path`.
///
/// The temporary file is removed if dropped before [`Staged::commit`].
pub struct Staged {
    tmp: Option<PathBuf>,
    path: PathBuf,
}

impl Staged {
    /// Writes `path`'s replacement with `write`.
    pub fn write<F>(path: &Path, write: F) -> Result<Self>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<()>,
    {
        let staged = Self {
            tmp: Some(tmp_path(path)),
            path: path.to_owned(),
        };
        if let Some(tmp) = &staged.tmp {
            let mut wtr = BufWriter::new(File::create(tmp)?);
            write(&mut wtr)?;
            wtr.flush()?;
        }
        Ok(staged)
    }

    /// Replaces the target with the staged file.
    pub fn commit(mut self) -> Result<()> {
        if let Some(tmp) = self.tmp.take() {
            fs::rename(tmp, &self.path)?;
        }
        Ok(())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if let Some(tmp) = self.tmp.take() {
            let _ = fs::remove_file(tmp);
        }
    }
}

/// `path` with `.tmp` appended, so outputs that only differ by
/// extension don't share a temporary file.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
