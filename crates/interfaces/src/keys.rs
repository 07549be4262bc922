use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Enter,
    Backspace,
    Up,
    Down,
    Char(char),
    Interrupt,
    Ignored,
}

/// Splits a raw character stream into keys.
///
/// Recognizes carriage return, DEL/BS, the `ESC [ A` / `ESC [ B` arrow
/// sequences, Ctrl-C and Ctrl-D. Other escape sequences and control
/// characters are dropped.
pub fn decode(data: &str) -> Vec<KeyInput> {
    let mut keys = Vec::new();
    let mut chars = data.chars().peekable();

    while let Some(c) = chars.next() {
        let key = match c {
            '\r' => KeyInput::Enter,
            '\x7f' | '\x08' => KeyInput::Backspace,
            '\x03' | '\x04' => KeyInput::Interrupt,
            '\x1b' => {
                if chars.peek() != Some(&'[') {
                    continue;
                }
                chars.next();
                // CSI: parameters then one final byte in '@'..='~'
                let mut last = None;
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) {
                        last = Some(next);
                        break;
                    }
                }
                match last {
                    Some('A') => KeyInput::Up,
                    Some('B') => KeyInput::Down,
                    _ => continue,
                }
            }
            c if (c as u32) < 32 => continue,
            c => KeyInput::Char(c),
        };
        keys.push(key);
    }

    keys
}

impl From<KeyEvent> for KeyInput {
    fn from(event: KeyEvent) -> Self {
        if event.kind == KeyEventKind::Release {
            return KeyInput::Ignored;
        }
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return match event.code {
                KeyCode::Char('c') | KeyCode::Char('d') => KeyInput::Interrupt,
                _ => KeyInput::Ignored,
            };
        }
        match event.code {
            KeyCode::Enter => KeyInput::Enter,
            KeyCode::Backspace => KeyInput::Backspace,
            KeyCode::Up => KeyInput::Up,
            KeyCode::Down => KeyInput::Down,
            KeyCode::Char(c) => KeyInput::Char(c),
            _ => KeyInput::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line_and_enter() {
        assert_eq!(
            decode("hi\r"),
            vec![KeyInput::Char('h'), KeyInput::Char('i'), KeyInput::Enter]
        );
    }

    #[test]
    fn test_decode_arrows_and_backspace() {
        assert_eq!(
            decode("\x1b[A\x1b[B\x7f"),
            vec![KeyInput::Up, KeyInput::Down, KeyInput::Backspace]
        );
    }

    #[test]
    fn test_decode_drops_other_sequences() {
        assert_eq!(decode("\x1b[C\x1b[1;5Dx\t\n"), vec![KeyInput::Char('x')]);
        assert_eq!(decode("\x03"), vec![KeyInput::Interrupt]);
    }

    #[test]
    fn test_from_key_event() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyInput::from(ctrl_c), KeyInput::Interrupt);
        let a = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(KeyInput::from(a), KeyInput::Char('A'));
        assert_eq!(
            KeyInput::from(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)),
            KeyInput::Ignored
        );
    }
}
