//! Document persistence

use crate::naming::candidate_paths;
use crate::types::*;
use lopdf::Document;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fail with [`StampError::NotFound`] unless `path` is an existing regular file.
///
/// Other metadata errors, such as a denied permission, surface as I/O errors.
pub(crate) async fn ensure_file(path: &Path) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(StampError::NotFound(path.to_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StampError::NotFound(path.to_owned()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Serialize a document into memory.
pub fn document_bytes(doc: &mut Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Write `bytes` as `file_name` inside `dir`, creating `dir` if needed.
///
/// Unless `overwrite` is set an existing file is never replaced: the next
/// free `name_N.pdf` is used instead. Returns the path actually written.
pub fn write_output(dir: &Path, file_name: &str, bytes: &[u8], overwrite: bool) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    if overwrite {
        let path = dir.join(file_name);
        std::fs::write(&path, bytes)?;
        return Ok(path);
    }

    for path in candidate_paths(dir, file_name) {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
                    drop(file);
                    let _ = std::fs::remove_file(&path);
                    return Err(e.into());
                }
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(StampError::Io(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("no free output name for {}", file_name),
    )))
}

/// Serialize and write a document, blocking the current thread.
pub fn save_document(
    mut doc: Document,
    dir: &Path,
    file_name: &str,
    overwrite: bool,
) -> Result<PathBuf> {
    let bytes = document_bytes(&mut doc)?;
    write_output(dir, file_name, &bytes, overwrite)
}
