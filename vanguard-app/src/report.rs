//! Formatting for scan reports, scan failures and monitor ticks.

use vanguard_core::ansi;
use vanguard_providers::{ScanError, ScanReport};

pub const LCP_GOOD_BELOW: f64 = 2.5;
pub const CLS_GOOD_BELOW: f64 = 0.1;
pub const SEO_GOOD_FROM: f64 = 90.0;
pub const SEO_MEDIUM_FROM: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Good,
    Medium,
    Bad,
}

impl Rating {
    pub fn paint(self, text: &str) -> String {
        match self {
            Rating::Good => ansi::green(text),
            Rating::Medium => ansi::yellow(text),
            Rating::Bad => ansi::red(text),
        }
    }
}

/// Leading decimal number of a display string such as `"3.0 s"`.
pub fn leading_number(display: &str) -> Option<f64> {
    let digits: String = display
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

pub fn rate_lcp(display: &str) -> Rating {
    match leading_number(display) {
        Some(value) if value < LCP_GOOD_BELOW => Rating::Good,
        _ => Rating::Bad,
    }
}

pub fn rate_cls(display: &str) -> Rating {
    match leading_number(display) {
        Some(value) if value < CLS_GOOD_BELOW => Rating::Good,
        _ => Rating::Bad,
    }
}

pub fn rate_seo(score: f64) -> Rating {
    if score >= SEO_GOOD_FROM {
        Rating::Good
    } else if score >= SEO_MEDIUM_FROM {
        Rating::Medium
    } else {
        Rating::Bad
    }
}

pub fn render_report(url: &str, report: &ScanReport) -> Vec<String> {
    let seo = format!("{:.0}/100", report.seo_score);
    vec![
        ansi::bold(&format!("SCAN REPORT: {}", url)),
        "------------------".to_string(),
        format!(
            "LCP (Largest Contentful Paint):  {}",
            rate_lcp(&report.lcp).paint(&report.lcp)
        ),
        format!(
            "CLS (Cumulative Layout Shift):   {}",
            rate_cls(&report.cls).paint(&report.cls)
        ),
        format!(
            "SEO Score:                       {}",
            rate_seo(report.seo_score).paint(&seo)
        ),
    ]
}

pub fn render_scan_error(error: &ScanError) -> String {
    match error {
        ScanError::Api(message) | ScanError::Config(message) => {
            ansi::red(&format!("[ERROR] {}", message))
        }
        ScanError::Transport(_) | ScanError::Parse(_) => {
            ansi::red("[SYSTEM ERROR] Failed to reach scan service.")
        }
    }
}

pub fn render_monitor_tick(timestamp: &str, url: &str, up: bool) -> String {
    let status = if up { ansi::green("UP") } else { ansi::red("DOWN") };
    format!("[{}] MONITOR {}: {}", timestamp, url, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("3.0 s"), Some(3.0));
        assert_eq!(leading_number("0.05"), Some(0.05));
        assert_eq!(leading_number("1.2\u{a0}s"), Some(1.2));
        assert_eq!(leading_number("n/a"), None);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(rate_lcp("2.4 s"), Rating::Good);
        assert_eq!(rate_lcp("2.5 s"), Rating::Bad);
        assert_eq!(rate_lcp("unknown"), Rating::Bad);
        assert_eq!(rate_cls("0.099"), Rating::Good);
        assert_eq!(rate_cls("0.1"), Rating::Bad);
        assert_eq!(rate_seo(90.0), Rating::Good);
        assert_eq!(rate_seo(89.0), Rating::Medium);
        assert_eq!(rate_seo(50.0), Rating::Medium);
        assert_eq!(rate_seo(49.9), Rating::Bad);
    }

    #[test]
    fn test_report_coloring() {
        let report = ScanReport {
            lcp: "3.0 s".to_string(),
            cls: "0.05".to_string(),
            seo_score: 72.0,
        };
        let lines = render_report("example.com", &report);
        assert!(lines[2].contains(&ansi::red("3.0 s")));
        assert!(lines[3].contains(&ansi::green("0.05")));
        assert!(lines[4].contains(&ansi::yellow("72/100")));
    }

    #[test]
    fn test_error_lines() {
        let api = render_scan_error(&ScanError::Api("quota exceeded".to_string()));
        assert!(api.contains("[ERROR] quota exceeded"));
        let transport = render_scan_error(&ScanError::Transport("refused".to_string()));
        assert!(transport.contains("[SYSTEM ERROR]"));
    }
}
