//! Text formatting shared by the terminal front end

use scraper::{Html, Node};
use time::OffsetDateTime;
use time::macros::format_description;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const MONTH: u64 = 30 * DAY;

/// Format a duration (in seconds) as a relative time string (e.g., "5m", "2h",
/// "3d").
///
/// For durations of 30 days or more, returns None to indicate the caller
/// should format as an absolute date instead.
pub fn format_duration_relative(seconds: u64) -> Option<String> {
    if seconds < MINUTE {
        Some(format!("{seconds}s"))
    } else if seconds < HOUR {
        Some(format!("{}m", seconds / MINUTE))
    } else if seconds < DAY {
        Some(format!("{}h", seconds / HOUR))
    } else if seconds < MONTH {
        Some(format!("{}d", seconds / DAY))
    } else {
        None
    }
}

/// Age of something created at unix time `then`, as seen at unix time `now`
///
/// "5m ago" for recent items, a UTC date ("2007-04-04") for old ones.
pub fn format_age(now: u64, then: u64) -> String {
    match format_duration_relative(now.saturating_sub(then)) {
        Some(relative) => format!("{relative} ago"),
        None => format_date(then),
    }
}

fn format_date(unix_secs: u64) -> String {
    let Ok(secs) = i64::try_from(unix_secs) else {
        return unix_secs.to_string();
    };
    OffsetDateTime::from_unix_timestamp(secs)
        .ok()
        .and_then(|dt| dt.format(format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or_else(|| unix_secs.to_string())
}

/// `"1 comment"`, `"3 comments"`
pub fn format_count(count: i64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Render the HTML subset used in item bodies as plain text
///
/// Tags are dropped and entities decoded. `<p>` starts a new paragraph, `<br>`
/// a new line.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "p" => push_break(&mut out, "\n\n"),
            Node::Element(el) if el.name() == "br" => push_break(&mut out, "\n"),
            _ => {}
        }
    }

    out.trim().to_owned()
}

fn push_break(out: &mut String, brk: &str) {
    if !out.is_empty() && !out.ends_with(brk) {
        out.push_str(brk);
    }
}
