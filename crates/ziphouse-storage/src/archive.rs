//! Per-Topic Archive Writer
//!
//! An `ArchiveWriter` is one open ZIP container bound to exactly one topic
//! and one calendar day, living at `<root>/<day>/<topic>.zip`. All payloads
//! land newline-delimited in a single entry named after the topic: records
//! for a topic/day are logically one unbounded stream, and wrapping it in a
//! ZIP entry avoids small-file proliferation while keeping the container
//! readable with standard archive tools as soon as it is closed.
//!
//! Opening a path that already holds an archive (a reopen after a crash or
//! a rotation-recovery) appends a fresh entry to the existing container
//! rather than truncating it.
//!
//! Writers are not safe for concurrent use; the registry guarantees
//! single-writer access.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Result;

/// An open, append-mode compressed container for one topic on one day.
pub struct ArchiveWriter {
    topic: String,
    day: String,
    path: PathBuf,
    writer: ZipWriter<File>,
}

impl ArchiveWriter {
    /// Open (or create) the archive for `topic` under `root/day` and begin
    /// the entry all subsequent appends land in.
    pub fn open(root: &Path, day: &str, topic: &str) -> Result<Self> {
        let dir = root.join(day);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{topic}.zip"));

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        let mut writer = if file.metadata()?.len() > 0 {
            ZipWriter::new_append(file)?
        } else {
            ZipWriter::new(file)
        };
        writer.start_file(topic, SimpleFileOptions::default())?;

        tracing::info!(topic, path = %path.display(), "opened archive writer");

        Ok(Self {
            topic: topic.to_string(),
            day: day.to_string(),
            path,
            writer,
        })
    }

    /// Append one record payload, newline-terminated, to the active entry.
    pub fn append(&mut self, payload: &[u8]) -> Result<()> {
        self.writer.write_all(payload)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Finalize the container and flush it to disk.
    ///
    /// After this returns the archive is independently decompressible.
    pub fn close(self) -> Result<()> {
        let mut file = self.writer.finish()?;
        file.flush()?;
        tracing::info!(topic = %self.topic, path = %self.path.display(), "closed archive writer");
        Ok(())
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for ArchiveWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveWriter")
            .field("topic", &self.topic)
            .field("day", &self.day)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn read_entry(path: &Path, name: &str) -> String {
        let file = File::open(path).unwrap();
        let mut archive = ZipArchive::new(file).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn test_open_creates_day_directory_and_file() {
        let tmp = TempDir::new().unwrap();
        let writer = ArchiveWriter::open(tmp.path(), "20240101", "orders").unwrap();

        assert_eq!(writer.day(), "20240101");
        assert_eq!(writer.topic(), "orders");
        assert_eq!(writer.path(), tmp.path().join("20240101").join("orders.zip"));
        writer.close().unwrap();
        assert!(tmp.path().join("20240101").join("orders.zip").is_file());
    }

    #[test]
    fn test_round_trip_preserves_order_and_newlines() {
        let tmp = TempDir::new().unwrap();
        let mut writer = ArchiveWriter::open(tmp.path(), "20240101", "orders").unwrap();
        writer.append(b"first").unwrap();
        writer.append(b"second").unwrap();
        let path = writer.path().to_path_buf();
        writer.close().unwrap();

        assert_eq!(read_entry(&path, "orders"), "first\nsecond\n");
    }

    #[test]
    fn test_entry_is_named_after_topic() {
        let tmp = TempDir::new().unwrap();
        let mut writer = ArchiveWriter::open(tmp.path(), "20240101", "clicks").unwrap();
        writer.append(b"{}").unwrap();
        let path = writer.path().to_path_buf();
        writer.close().unwrap();

        let file = File::open(&path).unwrap();
        let archive = ZipArchive::new(file).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names, vec!["clicks"]);
    }

    #[test]
    fn test_reopen_appends_to_existing_archive() {
        let tmp = TempDir::new().unwrap();
        let mut writer = ArchiveWriter::open(tmp.path(), "20240101", "orders").unwrap();
        writer.append(b"before").unwrap();
        let path = writer.path().to_path_buf();
        writer.close().unwrap();
        let len_after_first = fs::metadata(&path).unwrap().len();

        let mut writer = ArchiveWriter::open(tmp.path(), "20240101", "orders").unwrap();
        writer.append(b"after").unwrap();
        writer.close().unwrap();

        // The container grew and the freshest entry for the topic holds the
        // new payload.
        assert!(fs::metadata(&path).unwrap().len() > len_after_first);
        assert_eq!(read_entry(&path, "orders"), "after\n");
    }

    #[test]
    fn test_empty_payload_still_writes_newline() {
        let tmp = TempDir::new().unwrap();
        let mut writer = ArchiveWriter::open(tmp.path(), "20240101", "orders").unwrap();
        writer.append(b"").unwrap();
        let path = writer.path().to_path_buf();
        writer.close().unwrap();

        assert_eq!(read_entry(&path, "orders"), "\n");
    }
}
