use std::sync::LazyLock;

use regex::Regex;

use super::super::domain::{CaseFamily, DocumentType};

/// Size of the title-block region scanned for a sheet's own piece code.
pub const HEADER_SCAN_CHARS: usize = 500;

/// `PC03`, `PC 3`, `PA-5`: family code, optional separator and zero padding, one digit.
static HEADER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(P[CA])[ _\-]?0?([1-9])\b").expect("header marker pattern compiles")
});

fn header_region(text: &str) -> &str {
    match text.char_indices().nth(HEADER_SCAN_CHARS) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// First piece code announced in the title block that the family accepts.
pub(crate) fn header_marker(text: &str, family: CaseFamily) -> Option<DocumentType> {
    HEADER_MARKER
        .captures_iter(header_region(text))
        .filter_map(|captures| {
            let code = format!("{}{}", &captures[1], &captures[2]);
            DocumentType::from_code(&code)
        })
        .find(|document_type| document_type.is_candidate_for(family))
}
