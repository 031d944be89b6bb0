//! Documents on the local file system.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use fs2::FileExt;

use stt_core::{StoreError, Vault};

/// File-system vault.
///
/// `update` holds an exclusive advisory lock on the document from read to
/// write, so two `stt` processes never interleave edits of the same file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsVault;

impl Vault for FsVault {
    fn read(&self, path: &Path) -> Result<String, StoreError> {
        fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        fs::write(path, contents).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn update(
        &self,
        path: &Path,
        edit: &mut dyn FnMut(String) -> Result<String, StoreError>,
    ) -> Result<(), StoreError> {
        let read_err = |source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        };
        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(read_err)?;
        file.lock_exclusive().map_err(read_err)?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(read_err)?;
        let updated = edit(contents)?;

        rewrite(&mut file, &updated).map_err(write_err)?;
        tracing::debug!(path = %path.display(), "updated document");
        // Dropping the handle releases the lock.
        Ok(())
    }
}

fn rewrite(file: &mut File, contents: &str) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
