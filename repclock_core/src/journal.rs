//! Append-only journal of finished exercise reports.
//!
//! Entries are appended to a JSONL (JSON Lines) file with file locking so a
//! tracking store can pick them up later.

use crate::{Result, SessionReport};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One line of the journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalEntry {
    ExerciseReport {
        id: Uuid,
        session_id: Uuid,
        recorded_at: DateTime<Utc>,
        report: SessionReport,
    },
    SessionFinished {
        id: Uuid,
        session_id: Uuid,
        recorded_at: DateTime<Utc>,
        total_seconds: u64,
    },
}

impl JournalEntry {
    pub fn exercise_report(session_id: Uuid, report: SessionReport) -> Self {
        JournalEntry::ExerciseReport {
            id: Uuid::new_v4(),
            session_id,
            recorded_at: Utc::now(),
            report,
        }
    }

    pub fn session_finished(session_id: Uuid, total_seconds: u64) -> Self {
        JournalEntry::SessionFinished {
            id: Uuid::new_v4(),
            session_id,
            recorded_at: Utc::now(),
            total_seconds,
        }
    }

    pub fn session_id(&self) -> Uuid {
        match self {
            JournalEntry::ExerciseReport { session_id, .. }
            | JournalEntry::SessionFinished { session_id, .. } => *session_id,
        }
    }
}

/// Destination for journal entries
pub trait ReportSink {
    fn append(&mut self, entry: &JournalEntry) -> Result<()>;
}

/// JSONL-based journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl ReportSink for JsonlJournal {
    fn append(&mut self, entry: &JournalEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;
        tracing::debug!("Appended journal entry for session {}", entry.session_id());
        Ok(())
    }
}

/// Read every parseable entry from a journal file
pub fn read_journal(path: &Path) -> Result<Vec<JournalEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<JournalEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Skipping journal line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} journal entries", entries.len());
    Ok(entries)
}
