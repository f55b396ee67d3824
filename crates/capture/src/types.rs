//! Shared value types for the Capture API domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (e.g. enumerations only accept the
//! discriminants the remote engine defines) and participate in synthesis.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::UnknownDiscriminant;

// ---------------------------------------------------------------------------
// Process classification
// ---------------------------------------------------------------------------

/// Whether a process belongs to the capture engine or the action engine.
///
/// Travels on the wire as its integer discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProcessType {
    /// Handled by the action engine.
    GlobalAction = 1,
    /// Handled by the capture engine.
    GlobalCapture = 2,
}

impl From<ProcessType> for u8 {
    fn from(value: ProcessType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for ProcessType {
    type Error = UnknownDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::GlobalAction),
            2 => Ok(Self::GlobalCapture),
            other => Err(UnknownDiscriminant::new("ProcessType", other)),
        }
    }
}

// ---------------------------------------------------------------------------

/// Every status a process can take inside the remote engine.
///
/// Client-synthesized processes always start as [`ProcessStatus::Ready`],
/// which tells the engine the process may be picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProcessStatus {
    /// Queued behind other work.
    WaitQueue = 1,
    /// A node is executing.
    Processing = 2,
    /// A node failed.
    Errored = 3,
    /// Reached the end of the workflow.
    Completed = 4,
    /// Waiting to be picked up.
    Ready = 5,
    /// Closed by an operator.
    ManuallyCompleted = 6,
    /// Parked until a timer fires.
    WaitTimer = 7,
    /// Queued until a timer fires.
    QueueTimer = 8,
    /// Waiting for manual validation.
    Validation = 9,
    /// Running a child workflow.
    SubProcessing = 10,
}

impl From<ProcessStatus> for u8 {
    fn from(value: ProcessStatus) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for ProcessStatus {
    type Error = UnknownDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::WaitQueue,
            2 => Self::Processing,
            3 => Self::Errored,
            4 => Self::Completed,
            5 => Self::Ready,
            6 => Self::ManuallyCompleted,
            7 => Self::WaitTimer,
            8 => Self::QueueTimer,
            9 => Self::Validation,
            10 => Self::SubProcessing,
            other => return Err(UnknownDiscriminant::new("ProcessStatus", other)),
        })
    }
}

// ---------------------------------------------------------------------------
// Opaque engine entries
// ---------------------------------------------------------------------------

/// An entry the remote engine owns and populates after creation.
///
/// Used for process history and file-page records. The element schema is not
/// part of this client's contract, so the JSON is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueEntry(serde_json::Value);

impl OpaqueEntry {
    /// Wraps a raw JSON value.
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns the raw JSON value.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly. Serialises as RFC 3339. Deserialisation also accepts the
/// offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` form the remote engine emits for
/// unspecified-kind dates, which is read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Parses either an RFC 3339 timestamp or an offset-less one (read as UTC).
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Timestamp::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{text}'")))
    }
}
