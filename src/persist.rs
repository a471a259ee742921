//! Disk I/O helpers: load from file and atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees.

use crate::error::{Error, Result};
use crate::serializer::Serializer;
use serde_json::Value;
use std::path::Path;

/// Reads and parses the file at `path`. `Ok(None)` only when the file is
/// missing, so the caller can seed a default instead. An empty file is a
/// parse failure like any other.
pub fn load<S>(path: &Path, serializer: &S) -> Result<Option<Value>>
where
    S: Serializer,
{
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Load(format!("{}: {e}", path.display()))),
    };
    serializer
        .deserialize(&bytes)
        .map(Some)
        .map_err(|e| match e {
            Error::Load(msg) => Error::Load(format!("{}: {msg}", path.display())),
            other => other,
        })
}

/// Create the parent directory if needed, write `bytes` to `<path>.tmp`, then
/// rename over `path`. A crash mid-write leaves the old file intact.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::Save(format!("{}: {e}", parent.display())))?;
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes).map_err(|e| Error::Save(format!("{}: {e}", tmp.display())))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        Error::Save(format!("{}: {e}", path.display()))
    })?;
    Ok(())
}
