//! Diary entry model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::color::ColorTag;
use super::photo::Photo;

/// Message shown when an entry with no visible text is submitted.
pub const EMPTY_ENTRY_MESSAGE: &str = "Entry cannot be empty";

const EMPTY_PREVIEW: &str = "Empty entry";
const UNKNOWN_DATE: &str = "Unknown date";

/// Creation time of an entry in nanoseconds since the Unix epoch.
///
/// This is also the entry's identity: no other identifier exists, and the
/// store keys entries by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryTimestamp(i64);

/// Display style for entry dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Jan 5, 2026 3:07 PM`, used in entry lists
    Short,
    /// `Monday, January 5, 2026 03:07 PM`, used in the entry header
    Long,
}

impl DateStyle {
    const fn pattern(self) -> &'static str {
        match self {
            Self::Short => "%b %-d, %Y %-I:%M %p",
            Self::Long => "%A, %B %-d, %Y %I:%M %p",
        }
    }
}

impl EntryTimestamp {
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    #[must_use]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }

    /// Format in the local time zone.
    #[must_use]
    pub fn format_date(self, style: DateStyle) -> String {
        self.format_date_in(&Local, style)
    }

    /// Format in an explicit time zone. Non-positive timestamps are unknown.
    #[must_use]
    pub fn format_date_in<Tz>(self, tz: &Tz, style: DateStyle) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if self.0 <= 0 {
            return UNKNOWN_DATE.to_string();
        }
        self.to_datetime()
            .with_timezone(tz)
            .format(style.pattern())
            .to_string()
    }
}

impl fmt::Display for EntryTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryTimestamp {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A diary entry as held by the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    /// User-authored body
    pub text: String,
    /// Color tag, blue when the store has none
    #[serde(default)]
    pub color_tag: ColorTag,
    /// Creation time and identity
    pub timestamp: EntryTimestamp,
    /// Optional single attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
}

impl DiaryEntry {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        color_tag: ColorTag,
        timestamp: EntryTimestamp,
        photo: Option<Photo>,
    ) -> Self {
        Self {
            text: text.into(),
            color_tag,
            timestamp,
            photo,
        }
    }

    /// First non-blank line of the text, for list rows.
    #[must_use]
    pub fn preview(&self) -> &str {
        self.text
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or(EMPTY_PREVIEW)
    }

    #[must_use]
    pub const fn has_photo(&self) -> bool {
        self.photo.is_some()
    }
}

/// Input of the add operation. The timestamp is assigned when the add runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewEntry {
    pub text: String,
    pub photo: Option<Photo>,
    pub color_tag: ColorTag,
}

impl NewEntry {
    #[must_use]
    pub fn new(text: impl Into<String>, color_tag: ColorTag) -> Self {
        Self {
            text: text.into(),
            photo: None,
            color_tag,
        }
    }

    #[must_use]
    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photo = Some(photo);
        self
    }
}
