//! Static `neofetch` panel: logo on the left, vitals on the right.

const LOGO: &[&str] = &[
    r" __      __",
    r" \ \    / /",
    r"  \ \  / / ",
    r"   \ \/ /  ",
    r"    \  /   ",
    r"     \/    ",
];

const STATS: &[&str] = &[
    "guest@vanguard",
    "--------------",
    "OS: Vanguard OS 1.0.0",
    "Host: Vanguard Terminal",
    "Kernel: vgd-rt",
    "Shell: vsh",
    "Uptime: always",
    "Scanner: PageSpeed Insights v5",
];

const GUTTER: &str = "   ";

pub fn render() -> String {
    zip_columns(LOGO, STATS)
}

/// Joins two columns row by row. Left lines are padded to the widest left
/// line; rows past the end of either column are filled with blanks.
pub fn zip_columns(left: &[&str], right: &[&str]) -> String {
    let width = left.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let rows = left.len().max(right.len());

    (0..rows)
        .map(|i| {
            let l = left.get(i).copied().unwrap_or("");
            let r = right.get(i).copied().unwrap_or("");
            let line = format!("{:<width$}{GUTTER}{}", l, r, width = width);
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
