use crate::traits::Surface;
use parking_lot::Mutex;

/// In-memory surface that records everything written to it.
#[derive(Default)]
pub struct CaptureSurface {
    output: Mutex<String>,
    statuses: Mutex<Vec<String>>,
    clears: Mutex<usize>,
}

impl CaptureSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> String {
        self.output.lock().clone()
    }

    /// Output with escape sequences removed.
    pub fn plain(&self) -> String {
        strip_ansi(&self.output.lock())
    }

    /// Returns and forgets everything written so far.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.output.lock())
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().clone()
    }

    pub fn clears(&self) -> usize {
        *self.clears.lock()
    }
}

impl Surface for CaptureSurface {
    fn write(&self, text: &str) {
        self.output.lock().push_str(text);
    }

    fn clear(&self) {
        *self.clears.lock() += 1;
        self.output.lock().clear();
    }

    fn show_status(&self, status: &str) {
        self.statuses.lock().push(status.to_string());
    }
}

/// Removes CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL`) sequences.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('[') => {
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) {
                        break;
                    }
                }
            }
            Some(']') => {
                for next in chars.by_ref() {
                    if next == '\x07' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    out
}
