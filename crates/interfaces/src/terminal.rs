use crate::keys::KeyInput;
use crate::traits::Surface;
use crossterm::event::{self, Event};
use crossterm::terminal;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;

/// Surface backed by the process's stdout.
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for TerminalSurface {
    fn write(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn clear(&self) {
        self.write("\x1b[2J\x1b[3J\x1b[H");
    }

    fn show_status(&self, status: &str) {
        self.write(&format!("\x1b]0;{}\x07", status));
    }
}

/// Raw-mode keyboard reader.
///
/// Key events are read on a dedicated thread and forwarded over a channel.
/// Dropping the reader stops the thread and restores the terminal mode.
pub struct KeyReader {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl KeyReader {
    pub fn spawn() -> io::Result<(Self, mpsc::UnboundedReceiver<KeyInput>)> {
        terminal::enable_raw_mode()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let thread = std::thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                match event::poll(Duration::from_millis(50)) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        tracing::warn!("Terminal poll failed: {}", e);
                        break;
                    }
                }
                match event::read() {
                    Ok(Event::Key(key)) => {
                        let input = KeyInput::from(key);
                        if input != KeyInput::Ignored && tx.send(input).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("Terminal read failed: {}", e);
                        break;
                    }
                }
            }
        });

        Ok((
            Self {
                stop,
                thread: Some(thread),
            },
            rx,
        ))
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!("Failed to restore terminal mode: {}", e);
        }
    }
}
