use std::io::BufRead;

use chrono::{Local, NaiveDateTime, TimeDelta};

/// Storage and display format for session timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn split_minutes(total_minutes: u64) -> (u64, u64) {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    (hours, minutes)
}

/// Reads one line into `line`, replacing invalid UTF-8 instead of failing.
/// Returns the number of bytes read; 0 means end of input.
pub fn read_line_lossy<R: BufRead>(input: &mut R, line: &mut String) -> std::io::Result<usize> {
    let mut buf = Vec::new();
    let read = input.read_until(b'\n', &mut buf)?;
    line.clear();
    line.push_str(&String::from_utf8_lossy(&buf));
    Ok(read)
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Current wall-clock time truncated to the stored second precision.
pub fn now_timestamp() -> String {
    format_timestamp(&Local::now().naive_local())
}

/// Renders a delta as `[-][d.]hh:mm:ss`, sub-second parts dropped.
pub fn format_duration(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let secs = total.unsigned_abs();

    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{sign}{days}.{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sub_day_durations_with_padding() {
        assert_eq!(format_duration(TimeDelta::seconds(5_400)), "01:30:00");
        assert_eq!(format_duration(TimeDelta::seconds(61)), "00:01:01");
        assert_eq!(format_duration(TimeDelta::zero()), "00:00:00");
    }

    #[test]
    fn formats_days_and_negative_spans() {
        assert_eq!(
            format_duration(TimeDelta::seconds(86_400 + 3_723)),
            "1.01:02:03"
        );
        assert_eq!(format_duration(TimeDelta::seconds(-90)), "-00:01:30");
    }

    #[test]
    fn splits_minutes_into_hours() {
        assert_eq!(split_minutes(135), (2, 15));
        assert_eq!(split_minutes(59), (0, 59));
    }

    #[test]
    fn splits_totals_beyond_u32() {
        let minutes = u64::from(u32::MAX) + 61;
        assert_eq!(split_minutes(minutes), (minutes / 60, 16));
    }

    #[test]
    fn reads_invalid_utf8_lines_lossily() {
        let mut input = std::io::Cursor::new(b"\xff\xfe\nstop\n".to_vec());
        let mut line = String::new();

        assert_eq!(read_line_lossy(&mut input, &mut line).unwrap(), 3);
        assert_eq!(line, "\u{FFFD}\u{FFFD}\n");
        assert_eq!(read_line_lossy(&mut input, &mut line).unwrap(), 5);
        assert_eq!(line, "stop\n");
        assert_eq!(read_line_lossy(&mut input, &mut line).unwrap(), 0);
    }

    #[test]
    fn now_timestamp_parses_back() {
        assert!(parse_timestamp(&now_timestamp()).is_ok());
    }
}
