//! Number and duration parsers for console text.
//!
//! Every parser returns `None` for "nothing recognizable here", which is
//! distinct from a recognized value of zero.

use regex::Regex;
use std::sync::LazyLock;

// ============================================================================
// Regex Patterns
// ============================================================================

/// First run of digits with an optional fractional part.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("Invalid regex"));

/// Leading float, the way a lenient float parser reads "2.5 A".
static LEADING_FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("Invalid regex")
});

static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*hr").expect("Invalid regex"));

static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*min").expect("Invalid regex"));

/// Hours with optional trailing minutes, e.g. "2 hr 9 min".
static HOURS_MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*hr\s*(?:(\d+)\s*min)?").expect("Invalid regex")
});

/// Runtime values above this are taken to be seconds.
///
/// Unverified heuristic: no firmware documents the unit switch, and a
/// genuine runtime above five hours will be misread as seconds.
pub const RUNTIME_SECONDS_THRESHOLD: f64 = 300.0;

// ============================================================================
// Numbers
// ============================================================================

/// Returns the first number in `text`.
pub fn parse_number(text: &str) -> Option<f64> {
    NUMBER_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Parses a float prefix after leading whitespace, ignoring any trailing
/// unit text ("2.5 A" → 2.5, "A 2.5" → `None`).
pub fn parse_leading_float(text: &str) -> Option<f64> {
    LEADING_FLOAT_RE
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

// ============================================================================
// Durations
// ============================================================================

/// Parses "<n> hr" and/or "<n> min" tokens anywhere in `text` into minutes.
///
/// Returns `None` when neither token is present.
pub fn parse_duration(text: &str) -> Option<f64> {
    let hours = capture_number(&HOURS_RE, text, 1);
    let minutes = capture_number(&MINUTES_RE, text, 1);
    if hours.is_none() && minutes.is_none() {
        return None;
    }
    Some(hours.unwrap_or(0.0) * 60.0 + minutes.unwrap_or(0.0))
}

/// Parses a duration near a keyword: "<h> hr [<m> min]" first, then
/// "<m> min" alone.
pub fn parse_duration_near(text: &str) -> Option<f64> {
    if let Some(caps) = HOURS_MINUTES_RE.captures(text) {
        let hours: f64 = caps.get(1)?.as_str().parse().ok()?;
        let minutes: f64 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0.0);
        return Some(hours * 60.0 + minutes);
    }
    capture_number(&MINUTES_RE, text, 1)
}

/// Returns true if `text` contains an hour or minute token marker.
pub fn has_duration_marker(text: &str) -> bool {
    text.contains("hr") || text.contains("min")
}

/// Converts a runtime reading to minutes.
///
/// Readings above [`RUNTIME_SECONDS_THRESHOLD`] are assumed to be seconds.
pub fn normalize_runtime(runtime: f64) -> f64 {
    if runtime > RUNTIME_SECONDS_THRESHOLD {
        runtime / 60.0
    } else {
        runtime
    }
}

fn capture_number(re: &Regex, text: &str, group: usize) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .and_then(|m| m.as_str().parse().ok())
}

// ============================================================================
// Text Windows
// ============================================================================

/// Returns the slice of `text` spanning `radius` characters before and after
/// byte offset `pos`.
///
/// `pos` must lie on a character boundary.
pub fn window_around(text: &str, pos: usize, radius: usize) -> &str {
    let start = if radius == 0 {
        pos
    } else {
        text[..pos]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map_or(0, |(i, _)| i)
    };
    let end = text[pos..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| pos + i);
    &text[start..end]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("load current 2.5 a"), Some(2.5));
        assert_eq!(parse_number("230 vac"), Some(230.0));
        assert_eq!(parse_number("0"), Some(0.0));
        assert_eq!(parse_number("1.2.3"), Some(1.2));
        assert_eq!(parse_number("no digits"), None);
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("2.5\u{a0}A"), Some(2.5));
        assert_eq!(parse_leading_float("  27.0 "), Some(27.0));
        assert_eq!(parse_leading_float("-3"), Some(-3.0));
        assert_eq!(parse_leading_float("A 2.5"), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("2hr 9min"), Some(129.0));
        assert_eq!(parse_duration("45min"), Some(45.0));
        assert_eq!(parse_duration("3hr"), Some(180.0));
        assert_eq!(parse_duration("1 hr 05 min"), Some(65.0));
        assert_eq!(parse_duration("runtime remaining"), None);
        assert_eq!(parse_duration("admin"), None);
    }

    #[test]
    fn test_parse_duration_near() {
        assert_eq!(parse_duration_near("runtime remaining: 2 hr 9 min"), Some(129.0));
        assert_eq!(parse_duration_near("remaining 3 hr"), Some(180.0));
        assert_eq!(parse_duration_near("remaining 17 min"), Some(17.0));
        assert_eq!(parse_duration_near("remaining 1200"), None);
    }

    #[test]
    fn test_normalize_runtime() {
        assert_eq!(normalize_runtime(450.0), 7.5);
        assert_eq!(normalize_runtime(120.0), 120.0);
        assert_eq!(normalize_runtime(300.0), 300.0);
        assert_eq!(normalize_runtime(0.0), 0.0);
    }

    #[test]
    fn test_window_around() {
        let text = "0123456789";
        assert_eq!(window_around(text, 5, 2), "3456");
        assert_eq!(window_around(text, 1, 5), "012345");
        assert_eq!(window_around(text, 8, 5), "3456789");
        assert_eq!(window_around(text, 4, 0), "");
    }

    #[test]
    fn test_window_around_multibyte() {
        let text = "ab°cd";
        let pos = text.find('c').unwrap();
        assert_eq!(window_around(text, pos, 1), "°c");
    }
}
