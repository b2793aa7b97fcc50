use std::{
    io::{BufRead, Write},
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use chrono::TimeDelta;
use tracing::{debug, warn};

use crate::{db::SessionStore, error::CaptureError, models::Session, utils};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Runs one live session: waits for `start`, repaints the elapsed time every
/// tick until `stop` is read, then stores and reports the session.
///
/// The returned session is the one handed to the store, whether or not the
/// insert succeeded.
pub fn run_timed_session<R, W>(
    store: &SessionStore,
    input: &mut R,
    output: &mut W,
    tick: Duration,
) -> Result<Session, CaptureError>
where
    R: BufRead,
    W: Write + Send,
{
    writeln!(output, "Type 'start' to begin your coding session:")?;
    output.flush()?;
    wait_for_command(input, "start", || {
        writeln!(output, "Please type 'start' to begin.")?;
        output.flush()
    })?;

    let start = utils::now_timestamp();
    let started_at = Instant::now();
    writeln!(output, "Session started at {start}")?;
    writeln!(output, "Type 'stop' and press Enter to end the session.")?;
    // Reserved for the elapsed-time line; input is typed below it
    writeln!(output)?;
    output.flush()?;

    let running = AtomicBool::new(true);
    let display = Mutex::new(&mut *output);

    let end = thread::scope(|scope| -> Result<String, CaptureError> {
        let ticker = scope.spawn(|| run_ticker(&running, started_at, &display, tick));

        let stopped = wait_for_command(input, "stop", || Ok(()));
        // End time is taken when the command is recognized, not on the last repaint.
        let end = utils::now_timestamp();

        running.store(false, Ordering::Release);
        ticker.thread().unpark();
        stopped.map(|_| end)
    })?;
    drop(display);

    let session = Session::new(start, end)?;
    if !store.create(&session) {
        warn!("Timed session was not persisted");
        writeln!(output, "The session could not be saved.")?;
    }
    writeln!(output, "Session stopped at {}", session.end())?;
    writeln!(output, "Total duration: {}", session.duration())?;
    writeln!(output, "____________________________")?;
    output.flush()?;

    Ok(session)
}

/// Reads lines until one equals `command` (trimmed, case-insensitive).
/// `on_mismatch` runs after every other line.
fn wait_for_command<R, F>(
    input: &mut R,
    command: &'static str,
    mut on_mismatch: F,
) -> Result<(), CaptureError>
where
    R: BufRead,
    F: FnMut() -> std::io::Result<()>,
{
    let mut line = String::new();
    loop {
        if utils::read_line_lossy(input, &mut line)? == 0 {
            return Err(CaptureError::InputClosed(command));
        }
        if line.trim().eq_ignore_ascii_case(command) {
            return Ok(());
        }
        debug!(input = %line.trim(), expected = command, "Ignoring input");
        on_mismatch()?;
    }
}

fn run_ticker<W: Write>(
    running: &AtomicBool,
    started_at: Instant,
    display: &Mutex<W>,
    tick: Duration,
) {
    while running.load(Ordering::Acquire) {
        let elapsed = TimeDelta::from_std(started_at.elapsed()).unwrap_or(TimeDelta::zero());
        let line = format!("Time elapsed: {}", utils::format_duration(elapsed));
        {
            let mut out = display.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Save cursor, repaint the reserved line above the input line, restore cursor
            if write!(out, "\x1b7\x1b[1A\r\x1b[2K{line}\x1b8")
                .and_then(|_| out.flush())
                .is_err()
            {
                return;
            }
        }
        // Woken early by unpark once stop is requested
        thread::park_timeout(tick);
    }
    let mut out = display.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _ = writeln!(out);
}
