use chrono::TimeDelta;

use crate::{error::SessionError, utils};

pub const NOT_STARTED_OR_ENDED: &str = "Session not started or ended.";

/// One recorded coding interval.
///
/// Fields are private: `duration` is derived from `start` and `end` when the
/// session is built and persisted as text, so the timestamps cannot change
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: i64, // 0 until assigned by sqlite
    start: String,
    end: String,
    duration: String,
}

impl Session {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, SessionError> {
        let start = start.into();
        let end = end.into();
        let duration = compute_duration(&start, &end)?;
        Ok(Session {
            id: 0,
            start,
            end,
            duration,
        })
    }

    /// Materializes a stored row as-is; the stored duration is not recomputed.
    pub(crate) fn from_row(id: i64, start: String, end: String, duration: String) -> Self {
        Session {
            id,
            start,
            end,
            duration,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    /// `end - start`, or `None` when either timestamp is empty or malformed.
    pub fn elapsed(&self) -> Option<TimeDelta> {
        let start = utils::parse_timestamp(&self.start).ok()?;
        let end = utils::parse_timestamp(&self.end).ok()?;
        Some(end - start)
    }
}

/// Formats `end - start` for two `yyyy-MM-dd HH:mm:ss` timestamps.
///
/// An empty timestamp yields [`NOT_STARTED_OR_ENDED`] instead of an error.
pub fn compute_duration(start: &str, end: &str) -> Result<String, SessionError> {
    if start.is_empty() || end.is_empty() {
        return Ok(NOT_STARTED_OR_ENDED.to_string());
    }

    let parse = |value: &str| {
        utils::parse_timestamp(value).map_err(|source| SessionError::Timestamp {
            value: value.to_string(),
            source,
        })
    };
    let start = parse(start)?;
    let end = parse(end)?;

    Ok(utils::format_duration(end - start))
}
