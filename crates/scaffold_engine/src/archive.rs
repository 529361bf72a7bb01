use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::persist::{AtomicFileWriter, PersistError};
use crate::GeneratedFile;

/// Fixed name of the downloadable artifact.
pub const ARCHIVE_FILENAME: &str = "ai_generated_project.zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub entry_count: usize,
    pub byte_len: u64,
    pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to build zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to write zip entry: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to save zip archive: {0}")]
    Persist(#[from] PersistError),
}

/// Packs `files` into an in-memory zip, one entry per filename.
///
/// Entry paths are used verbatim. A repeated filename keeps the position of its
/// first occurrence and the content of its last.
pub fn build_archive(files: &[GeneratedFile]) -> Result<Vec<u8>, ArchiveError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in collect_entries(files) {
        writer.start_file(name, options)?;
        writer.write_all(content.as_bytes())?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Writes [`ARCHIVE_FILENAME`] into `output_dir`. Does nothing for an empty file list.
pub fn export_archive(
    files: &[GeneratedFile],
    output_dir: &Path,
) -> Result<Option<ArchiveSummary>, ArchiveError> {
    if files.is_empty() {
        return Ok(None);
    }
    let bytes = build_archive(files)?;
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let path = writer.write(ARCHIVE_FILENAME, &bytes)?;
    Ok(Some(ArchiveSummary {
        entry_count: collect_entries(files).len(),
        byte_len: bytes.len() as u64,
        path,
    }))
}

fn collect_entries(files: &[GeneratedFile]) -> Vec<(&str, &str)> {
    let mut entries: Vec<(&str, &str)> = Vec::with_capacity(files.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for file in files {
        match positions.get(file.filename.as_str()) {
            Some(&index) => entries[index].1 = &file.content,
            None => {
                positions.insert(&file.filename, entries.len());
                entries.push((&file.filename, &file.content));
            }
        }
    }
    entries
}
