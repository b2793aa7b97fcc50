use std::{fmt, io::Write};

use chrono::TimeDelta;

use crate::{models::Session, utils};

pub struct SessionView<'a> {
    pub session: &'a Session,
}

impl fmt::Display for SessionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session ID: {}, Start: {}, End: {}, Duration: {}",
            self.session.id(),
            self.session.start(),
            self.session.end(),
            self.session.duration(),
        )
    }
}

/// Sum of every session whose timestamps parse; others are skipped.
pub fn total_elapsed(sessions: &[Session]) -> TimeDelta {
    sessions
        .iter()
        .filter_map(Session::elapsed)
        .fold(TimeDelta::zero(), |acc, delta| acc + delta)
}

pub fn display_sessions<W: Write>(out: &mut W, sessions: &[Session]) -> std::io::Result<()> {
    if sessions.is_empty() {
        return writeln!(out, "No sessions found.");
    }

    writeln!(out, "All Coding Sessions:")?;
    for session in sessions {
        writeln!(out, "{}", SessionView { session })?;
        writeln!(out, "---------------------------------------")?;
    }

    let minutes = u64::try_from(total_elapsed(sessions).num_minutes()).unwrap_or(0);
    let (hours, minutes) = utils::split_minutes(minutes);
    writeln!(out, "Total: {hours}h {minutes}m")
}
