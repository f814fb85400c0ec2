// Numeric token handling for French-formatted plan and form text.
use std::sync::LazyLock;

use regex::Regex;

/// A number with optional thin, narrow no-break or no-break space thousands groups and an
/// optional `.` or `,` decimal part.
pub(crate) const NUMBER: &str = r"(?:\d{1,3}(?:[\x{2009}\x{202F}\x{00A0}]\d{3})+|\d+)(?:[.,]\d+)?";

static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NUMBER).expect("number pattern compiles"));

const GROUP_SEPARATORS: [char; 3] = ['\u{2009}', '\u{202F}', '\u{00A0}'];

/// Parse a token matched by [`NUMBER`]. Returns `None` rather than failing.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|ch| !GROUP_SEPARATORS.contains(ch))
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();

    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Every number on a line, skipping the `2` of an `m2` area unit.
pub(crate) fn numbers_in(line: &str) -> Vec<f64> {
    NUMBER_TOKEN
        .find_iter(line)
        .filter(|found| !line[..found.start()].trim_end().ends_with(['m', 'M']))
        .filter_map(|found| parse_number(found.as_str()))
        .collect()
}

/// Compile a pattern, substituting `{n}` with [`NUMBER`].
pub(crate) fn compile_with_number(pattern: &str) -> Regex {
    Regex::new(&pattern.replace("{n}", NUMBER)).expect("extraction pattern compiles")
}
