//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the persisted record produced by text/audio/video/OCR/art/mood
//!   capture flows.
//! - Validate per-type field requirements before any write.
//!
//! # Invariants
//! - `id`, `date` and `kind` are fixed at creation.
//! - Media entry types always carry a non-blank `file_url`.
//! - `emotion_tag`, when present, is never blank.

use crate::model::mood;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one journal entry.
pub type EntryId = Uuid;

/// Body of the welcome entry inserted on first use.
pub const WELCOME_CONTENT: &str = "Welcome to Reflexion! 👋

This is an example journal entry. Reflexion offers multiple ways to express yourself, whether through writing, speech, video, or even art. You can track your emotions over time and reflect on past entries.

Tap \"New Entry\" to start journaling in a way that works best for you.";

/// Capture flow that produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryType {
    Text,
    Audio,
    Video,
    /// Text recognized from a scanned page.
    Ocr,
    DrawnArt,
    UploadedArt,
    /// Quick mood survey summary.
    MoodEntry,
}

impl EntryType {
    pub const ALL: [EntryType; 7] = [
        Self::Text,
        Self::Audio,
        Self::Video,
        Self::Ocr,
        Self::DrawnArt,
        Self::UploadedArt,
        Self::MoodEntry,
    ];

    /// Display label for list rows and detail headers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "📝 Text",
            Self::Audio => "🎙 Audio",
            Self::Video => "📹 Video",
            Self::Ocr => "📔 OCR Scanned Text",
            Self::DrawnArt => "🎨 Drawn Art",
            Self::UploadedArt => "🖼️ Uploaded Art",
            Self::MoodEntry => "😀 Quick Mood Entry",
        }
    }

    /// Whether entries of this type must reference an external media file.
    pub fn requires_file(self) -> bool {
        matches!(
            self,
            Self::Audio | Self::Video | Self::DrawnArt | Self::UploadedArt
        )
    }

    pub fn is_art(self) -> bool {
        matches!(self, Self::DrawnArt | Self::UploadedArt)
    }
}

impl Display for EntryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Wire names; `label()` is the display text.
        let name = match self {
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Ocr => "ocr",
            Self::DrawnArt => "drawnArt",
            Self::UploadedArt => "uploadedArt",
            Self::MoodEntry => "moodEntry",
        };
        f.write_str(name)
    }
}

/// Validation errors for entry writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    MissingFileUrl(EntryType),
    BlankEmotionTag,
    NotArtType(EntryType),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFileUrl(kind) => {
                write!(f, "entry type `{kind}` requires a file reference")
            }
            Self::BlankEmotionTag => write!(f, "emotion tag must not be blank when set"),
            Self::NotArtType(kind) => {
                write!(f, "entry type `{kind}` is not an art entry type")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// Persisted journal record.
///
/// Field names on the wire follow the blob layout:
/// `id`, `date`, `type`, `content`, `fileURL`, `emotionTag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    /// Creation time and sole sort key (newest first).
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EntryType,
    /// Transcript, caption or survey summary depending on `kind`.
    pub content: String,
    #[serde(
        rename = "fileURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_url: Option<String>,
    #[serde(
        rename = "emotionTag",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub emotion_tag: Option<String>,
}

impl JournalEntry {
    /// Creates an entry with a generated id stamped at `date`.
    pub fn new(kind: EntryType, content: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4(), kind, content, date)
    }

    /// Creates an entry with a caller-provided id.
    ///
    /// Used when a producer re-saves an existing record (edit/retag flows).
    pub fn with_id(
        id: EntryId,
        kind: EntryType,
        content: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            date,
            kind,
            content: content.into(),
            file_url: None,
            emotion_tag: None,
        }
    }

    pub fn with_file_url(mut self, file_url: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self
    }

    pub fn with_emotion_tag(mut self, tag: impl Into<String>) -> Self {
        self.emotion_tag = Some(tag.into());
        self
    }

    /// Builds the first-use welcome entry.
    pub fn welcome(date: DateTime<Utc>) -> Self {
        Self::new(EntryType::Text, WELCOME_CONTENT, date).with_emotion_tag(mood::REFLECTIVE)
    }

    /// Identity comparison; two records are the same entry iff ids match.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.id == other.id
    }

    /// Returns whether this entry carries exactly `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.emotion_tag.as_deref() == Some(tag)
    }

    /// Checks per-type field requirements.
    ///
    /// # Errors
    /// - `MissingFileUrl` when a media type has no (or a blank) file reference.
    /// - `BlankEmotionTag` when a tag is set but empty after trimming.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.kind.requires_file()
            && self
                .file_url
                .as_deref()
                .map_or(true, |url| url.trim().is_empty())
        {
            return Err(EntryValidationError::MissingFileUrl(self.kind));
        }

        if matches!(self.emotion_tag.as_deref(), Some(tag) if tag.trim().is_empty()) {
            return Err(EntryValidationError::BlankEmotionTag);
        }

        Ok(())
    }
}

/// Candidate entry handed over by a capture producer.
///
/// The store side assigns the id; `date` falls back to save time when the
/// producer did not stamp a capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub kind: EntryType,
    pub content: String,
    pub file_url: Option<String>,
    pub emotion_tag: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl EntryDraft {
    pub fn new(kind: EntryType, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            file_url: None,
            emotion_tag: None,
            date: None,
        }
    }

    pub fn file_url(mut self, file_url: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self
    }

    pub fn emotion_tag(mut self, tag: impl Into<String>) -> Self {
        self.emotion_tag = Some(tag.into());
        self
    }

    pub fn captured_at(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Materializes the draft with a fresh id.
    pub fn into_entry(self, now: DateTime<Utc>) -> JournalEntry {
        JournalEntry {
            id: Uuid::new_v4(),
            date: self.date.unwrap_or(now),
            kind: self.kind,
            content: self.content,
            file_url: self.file_url,
            emotion_tag: self.emotion_tag,
        }
    }
}
