//! Append-only JSONL audit log.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8;
use log::warn;
use serde::Serialize;

/// One newline-delimited JSON file recording what a batch changed.
///
/// Writes are best-effort by design: enrichment must never abort because
/// the log could not be written, so failures are reported through the `log`
/// facade and otherwise swallowed. Each entry is flushed as soon as it is
/// appended — the log is the only record of partial progress when a batch
/// is interrupted, so its completeness matters more than write throughput.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: Utf8PathBuf,
}

impl AuditLog {
    /// Target the log at `path`. The file is created on first append.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log's path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Append one entry as a JSON line, swallowing write failures.
    pub fn append<T: Serialize>(&self, entry: &T) {
        if let Err(err) = self.try_append(entry) {
            warn!("audit log write to {} failed: {err}", self.path);
        }
    }

    fn try_append<T: Serialize>(&self, entry: &T) -> io::Result<()> {
        let line = serde_json::to_string(entry).map_err(io::Error::other)?;
        let (dir, file_name) = self.open_parent()?;
        let mut file = dir.open_with(
            file_name.as_str(),
            OpenOptions::new().create(true).append(true),
        )?;
        writeln!(file, "{line}")?;
        file.flush()
    }

    fn open_parent(&self) -> io::Result<(fs_utf8::Dir, String)> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| io::Error::other("audit log path has no file name"))?
            .to_owned();
        let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
        Ok((dir, file_name))
    }
}
