//! Terminal color and weight escapes.

pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const BOLD: &str = "\x1b[1m";
pub const BANNER: &str = "\x1b[1;32m";
pub const RESET: &str = "\x1b[0m";

fn paint(text: &str, style: &str) -> String {
    format!("{style}{text}{RESET}")
}

pub fn green(text: &str) -> String {
    paint(text, GREEN)
}

pub fn red(text: &str) -> String {
    paint(text, RED)
}

pub fn yellow(text: &str) -> String {
    paint(text, YELLOW)
}

pub fn cyan(text: &str) -> String {
    paint(text, CYAN)
}

pub fn bold(text: &str) -> String {
    paint(text, BOLD)
}

pub fn banner(text: &str) -> String {
    paint(text, BANNER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_with_reset() {
        assert_eq!(red("boom"), "\x1b[31mboom\x1b[0m");
        assert_eq!(bold(""), "\x1b[1m\x1b[0m");
    }
}
