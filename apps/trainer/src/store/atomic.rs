//! Whole-file replacement through a sibling temp file.
//!
//! The target either keeps its previous contents or holds the new contents in
//! full; a reader never observes a partial write.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Replace `path` with `contents`.
///
/// The temp file is flushed, checked for its full length and synced before
/// the rename. On any failure the temp file is removed and `path` is left
/// as it was.
pub fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = tmp_write_path(path);
    if let Err(error) = write_tmp(&tmp_path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    sync_parent(path)
}

fn write_tmp(tmp_path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(contents)?;
    file.flush()?;
    file.sync_all()?;

    let written = file.metadata()?.len();
    if written != contents.len() as u64 {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!(
                "short write to {}: {written} of {} bytes",
                tmp_path.display(),
                contents.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => File::open(parent)?.sync_all(),
        _ => Ok(()),
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}

pub(crate) fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}
