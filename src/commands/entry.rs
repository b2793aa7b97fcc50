use std::io::{BufRead, Write};

use chrono::NaiveDateTime;
use tracing::warn;

use crate::{db::SessionStore, error::CaptureError, models::Session, utils};

/// Stores a session from typed timestamps, prompting for any not given.
///
/// Returns the session and whether it was persisted.
pub fn add_session<R, W>(
    store: &SessionStore,
    input: &mut R,
    output: &mut W,
    start: Option<String>,
    end: Option<String>,
) -> Result<(Session, bool), CaptureError>
where
    R: BufRead,
    W: Write,
{
    let start = match start.as_deref().map(utils::parse_timestamp) {
        Some(Ok(parsed)) => parsed,
        _ => prompt_timestamp(input, output, "start", None)?,
    };
    let end = match end.as_deref().map(utils::parse_timestamp) {
        Some(Ok(parsed)) if parsed >= start => parsed,
        Some(Ok(_)) => {
            writeln!(output, "The end time cannot be before the start time.")?;
            prompt_timestamp(input, output, "end", Some(start))?
        }
        _ => prompt_timestamp(input, output, "end", Some(start))?,
    };

    let session = Session::new(utils::format_timestamp(&start), utils::format_timestamp(&end))?;
    let stored = store.create(&session);
    if stored {
        writeln!(
            output,
            "Session created successfully! Start: {}, End: {}, Duration: {}",
            session.start(),
            session.end(),
            session.duration()
        )?;
    } else {
        warn!("Manual session was not persisted");
        writeln!(output, "The session could not be saved.")?;
    }
    Ok((session, stored))
}

fn prompt_timestamp<R, W>(
    input: &mut R,
    output: &mut W,
    label: &'static str,
    not_before: Option<NaiveDateTime>,
) -> Result<NaiveDateTime, CaptureError>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        writeln!(output, "Enter the {label} time of the session (yyyy-MM-dd HH:mm:ss):")?;
        output.flush()?;

        if utils::read_line_lossy(input, &mut line)? == 0 {
            return Err(CaptureError::InputClosed(label));
        }
        match utils::parse_timestamp(line.trim()) {
            Ok(parsed) if not_before.is_some_and(|floor| parsed < floor) => {
                writeln!(output, "The end time cannot be before the start time.")?;
            }
            Ok(parsed) => return Ok(parsed),
            Err(_) => writeln!(output, "Invalid format. Please use yyyy-MM-dd HH:mm:ss.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::Config;

    fn open_store(dir: &tempfile::TempDir) -> SessionStore {
        let config = Config {
            database_path: dir.path().join("tracker.db"),
        };
        let mut store = SessionStore::new(&config);
        store.open().expect("open store");
        store
    }

    #[test]
    fn stores_session_from_arguments() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let store = open_store(&temp_dir);
        let mut output = Vec::new();

        let (session, stored) = add_session(
            &store,
            &mut Cursor::new(""),
            &mut output,
            Some("2024-01-01 10:00:00".into()),
            Some("2024-01-01 11:30:00".into()),
        )
        .expect("add session");

        assert!(stored);
        assert_eq!(session.duration(), "01:30:00");
        assert_eq!(store.get_all()[0].duration(), "01:30:00");
    }

    #[test]
    fn reprompts_on_bad_format_and_reversed_range() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let store = open_store(&temp_dir);
        let mut input = Cursor::new(
            "yesterday\n2024-03-01 08:00:00\n2024-03-01 07:00:00\n2024-03-01 08:20:05\n",
        );
        let mut output = Vec::new();

        let (session, _) =
            add_session(&store, &mut input, &mut output, None, None).expect("add session");

        assert_eq!(session.duration(), "00:20:05");
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Invalid format. Please use yyyy-MM-dd HH:mm:ss."));
        assert!(text.contains("The end time cannot be before the start time."));
    }

    #[test]
    fn reversed_arguments_explain_the_reprompt() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let store = open_store(&temp_dir);
        let mut output = Vec::new();

        let (session, stored) = add_session(
            &store,
            &mut Cursor::new("2024-01-01 12:00:00\n"),
            &mut output,
            Some("2024-01-01 10:00:00".into()),
            Some("2024-01-01 09:00:00".into()),
        )
        .expect("add session");

        assert!(stored);
        assert_eq!(session.duration(), "02:00:00");
        let text = String::from_utf8(output).unwrap();
        let reason = text.find("The end time cannot be before the start time.").unwrap();
        let prompt = text.find("Enter the end time of the session").unwrap();
        assert!(reason < prompt);
    }

    #[test]
    fn closed_input_aborts_entry() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let store = open_store(&temp_dir);
        let mut output = Vec::new();

        let result = add_session(&store, &mut Cursor::new("nope\n"), &mut output, None, None);
        assert!(matches!(result, Err(CaptureError::InputClosed("start"))));
        assert!(store.get_all().is_empty());
    }
}
