use memmap2::Mmap;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::processor::{ProcessorError, Result};

/// Read-only, memory-mapped view of a whole input file
///
/// The mapping is unmapped when the value is dropped, so every exit path of a
/// run releases it. Workers borrow [`MappedSource::bytes`] immutably; nothing
/// ever writes through the mapping.
#[derive(Debug)]
pub struct MappedSource {
    path: PathBuf,
    mmap: Mmap,
}

impl MappedSource {
    /// Opens and maps `path`
    ///
    /// # Errors
    /// [`ProcessorError::Io`] if the file cannot be opened or mapped.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ProcessorError::io("open", path, e))?;
        // SAFETY: the map is read-only and the input is not expected to change during a run.
        let mmap =
            unsafe { Mmap::map(&file) }.map_err(|e| ProcessorError::io("map", path, e))?;

        Ok(MappedSource {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}
