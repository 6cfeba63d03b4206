use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// What one transcript entry records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryKind {
    Query,
    Question,
    Answer,
    Feedback,
    Results,
    Error,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Query => write!(f, "query"),
            EntryKind::Question => write!(f, "question"),
            EntryKind::Answer => write!(f, "answer"),
            EntryKind::Feedback => write!(f, "feedback"),
            EntryKind::Results => write!(f, "results"),
            EntryKind::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Local>,
    pub kind: EntryKind,
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            kind,
            text: text.into(),
        }
    }
}

/// Timestamped log of one advisor session. Dumped at exit when debug
/// output is on; otherwise it just accumulates and is dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: EntryKind, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::new(kind, text));
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "[{}] {}: {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.kind,
                entry.text
            )?;
        }
        Ok(())
    }
}
