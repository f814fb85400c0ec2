//! Surface extraction for the official application form.
//!
//! Forms lay surfaces out as a table, so the generic "surface ... N m²" patterns tend to
//! pick the first column instead of the grand total.

use std::sync::LazyLock;

use regex::Regex;

use super::numeric::{compile_with_number, numbers_in};
use super::patterns::first_number;

static TOTAL_SURFACES_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    compile_with_number(r"(?i)surfaces?\s+totales?|total\s+des\s+surfaces")
});

static AREA_UNIT: LazyLock<Regex> = LazyLock::new(|| compile_with_number(r"(?i)m[²2]"));

static EXISTING_SURFACE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![compile_with_number(
        r"(?i)surface\s+(?:de\s+plancher\s+)?existante[^\n\d]{0,30}?({n})",
    )]
});

static CREATED_SURFACE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![compile_with_number(
        r"(?i)surface\s+(?:de\s+plancher\s+)?cr[ée]{2}e[^\n\d]{0,30}?({n})",
    )]
});

static TOTAL_SURFACE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![compile_with_number(
        r"(?i)surface\s+(?:de\s+plancher\s+)?totale[^\n\d]{0,30}?({n})",
    )]
});

pub(crate) fn form_surface(text: &str) -> Option<f64> {
    total_surfaces_line(text).or_else(|| labelled_surfaces(text))
}

/// Largest figure on the first line carrying both a total-surfaces phrase and an area unit.
fn total_surfaces_line(text: &str) -> Option<f64> {
    text.lines()
        .filter(|line| TOTAL_SURFACES_PHRASE.is_match(line) && AREA_UNIT.is_match(line))
        .find_map(|line| numbers_in(line).into_iter().reduce(f64::max))
}

fn labelled_surfaces(text: &str) -> Option<f64> {
    let existing = first_number(&EXISTING_SURFACE, text);
    let created = first_number(&CREATED_SURFACE, text);
    let total = first_number(&TOTAL_SURFACE, text);

    if existing.is_none() && created.is_none() && total.is_none() {
        return None;
    }

    let summed = existing.unwrap_or(0.0) + created.unwrap_or(0.0);
    Some(total.unwrap_or(0.0).max(summed))
}
