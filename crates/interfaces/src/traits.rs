/// Line-oriented output surface shared by the session and its timers.
pub trait Surface: Send + Sync {
    /// Writes raw text, escape sequences included, without a line break.
    fn write(&self, text: &str);

    fn writeln(&self, text: &str) {
        self.write(&format!("{}\r\n", to_crlf(text)));
    }

    fn clear(&self);

    fn show_status(&self, status: &str);
}

/// Raw-mode terminals need `\r\n`; bare `\n` only moves down a row.
pub fn to_crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_crlf() {
        assert_eq!(to_crlf("a\nb\r\nc"), "a\r\nb\r\nc");
    }
}
