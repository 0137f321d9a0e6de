//! Terminal prompts for the interactive flow.

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use secrecy::SecretString;
use std::io::{self, BufRead, Write};

/// Print `message` and read one line from stdin, without the trailing newline.
pub fn read_line(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Block until the user presses ENTER.
pub fn wait_for_enter(message: &str) -> Result<()> {
    read_line(message).map(|_| ())
}

/// Leaves raw mode when dropped, also on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Read a secret without echoing it to the terminal.
pub fn read_secret(message: &str) -> Result<SecretString> {
    print!("{}", message);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut secret = String::new();
    {
        let _raw = RawModeGuard::enable()?;

        loop {
            let Event::Key(key) = event::read().context("Failed to read key event")? else {
                continue;
            };
            if !apply_key(&mut secret, key)? {
                break;
            }
        }
    }
    println!();

    Ok(SecretString::from(secret))
}

/// Apply one key press to the buffer. Returns `false` once input is complete.
fn apply_key(buffer: &mut String, key: KeyEvent) -> Result<bool> {
    if key.kind == KeyEventKind::Release {
        return Ok(true);
    }

    match key.code {
        KeyCode::Enter => return Ok(false),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            bail!("Input interrupted")
        }
        KeyCode::Char(_)
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
        KeyCode::Char(c) => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }

    Ok(true)
}
