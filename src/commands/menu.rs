use std::{
    io::{BufRead, Write},
    time::Duration,
};

use tracing::error;

use crate::{
    commands::{entry, session},
    db::SessionStore,
    error::CaptureError,
    utils, views,
};

/// Interactive main menu. Returns once the user picks exit or input closes.
pub fn run_menu<R, W>(
    store: &SessionStore,
    input: &mut R,
    output: &mut W,
    tick: Duration,
) -> Result<(), CaptureError>
where
    R: BufRead,
    W: Write + Send,
{
    writeln!(output, "Welcome to Coding Tracker!")?;
    writeln!(output, "To start select an option from the menu below.")?;

    let mut line = String::new();
    loop {
        writeln!(output, "Main Menu")?;
        writeln!(output, "1. Add a new coding session")?;
        writeln!(output, "2. Start a timed coding session")?;
        writeln!(output, "3. View coding sessions")?;
        writeln!(output, "4. Exit")?;
        output.flush()?;

        if utils::read_line_lossy(input, &mut line)? == 0 {
            return Ok(());
        }

        let result = match line.trim() {
            "1" => entry::add_session(store, input, output, None, None).map(|_| ()),
            "2" => session::run_timed_session(store, input, output, tick).map(|_| ()),
            "3" => views::display_sessions(output, &store.get_all()).map_err(CaptureError::from),
            "4" => return Ok(()),
            _ => {
                writeln!(output, "Invalid input. Please try again.")?;
                continue;
            }
        };

        match result {
            Ok(()) => {}
            Err(err @ CaptureError::InputClosed(_)) => return Err(err),
            // Back to the menu, the failed action is reported and dropped
            Err(err) => {
                error!(error = %err, "Menu action failed");
                writeln!(output, "Error: {err}")?;
            }
        }
    }
}
