use std::sync::LazyLock;

use regex::Regex;

use super::numeric::{compile_with_number, parse_number};

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| compile_with_number(pattern))
        .collect()
}

pub(crate) static SURFACE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)surface\s*(?:de\s*plancher)?(?:\s*(?:totale|cr[ée]{2}e|projet[ée]e|existante))?\s*[:\s]*({n})\s*m",
        r"(?i)({n})[ \t]*m[²2][ \t]*(?:de[ \t]*)?(?:surface|plancher)",
        r"(?i)surface\s*[:\s]*({n})",
    ])
});

pub(crate) static ADDRESS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)adresse\s*(?:du\s*(?:terrain|projet))?\s*:?[ \t]*([^\n]+)",
        r"(?i)situ[ée]e?\s*(?:à|au)?\s*:?[ \t]*([^\n]+)",
    ])
});

pub(crate) static REFERENCE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"\b(P[CA]\s?\d{3}\s?\d{3}\s?\d{2}\s?[A-Z0-9]\d{4})\b",
        r"(?i:n°|numéro|référence)\s*(?i:de\s*dossier)?\s*[:\s]*([A-Z0-9][A-Z0-9\-]*)",
    ])
});

pub(crate) static IMPERMEABILIZED_AREA: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)surfaces?\s+imperm[ée]abilis[ée]e?s?(?:\s+(?:totales?|cr[ée]{2}es?|projet[ée]es?|du\s+projet))?\s*[:=]?\s*({n})\s*m[²2]",
        r"(?i)({n})\s*m[²2]\s+(?:de\s+)?(?:surfaces?\s+)?imperm[ée]abilis",
    ])
});

pub(crate) static RETENTION_VOLUME: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)volume\s+(?:de\s+|du\s+)?(?:r[ée]tention|stockage|utile|bassin)[^\n\d]{0,30}?({n})\s*m[3³]",
    ])
});

pub(crate) static DISCHARGE_FLOW: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[r"(?i)d[ée]bit\s+de\s+fuite[^\n\d]{0,30}?({n})\s*l\s*/\s*s"])
});

pub(crate) static INFILTRATION_AREA: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[r"(?i)surface\s+d['’]infiltration[^\n\d]{0,20}?({n})\s*m[²2]"])
});

pub(crate) static INFILTRATION_RATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)(?:perm[ée]abilit[ée]|vitesse\s+d['’]infiltration|capacit[ée]\s+d['’]infiltration)[^\n\d]{0,30}?({n})\s*mm\s*/\s*h",
        r"(?i)\bk\s*=\s*({n})\s*mm\s*/\s*h",
    ])
});

pub(crate) static INFILTRATION_MENTION: LazyLock<Regex> =
    LazyLock::new(|| compile_with_number(r"(?i)infiltr"));

pub(crate) static RETENTION_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    compile_with_number(r"(?i)r[ée]tention|stockage\s+des\s+eaux|bassin\s+de\s+stockage")
});

pub(crate) static INFILTRATION_TEST: LazyLock<Regex> = LazyLock::new(|| {
    compile_with_number(
        r"(?i)(?:test|essai)s?\s+(?:de\s+|d['’])(?:perm[ée]abilit[ée]|infiltration)|essai\s+porchet",
    )
});

pub(crate) static RAIN_15MM: LazyLock<Regex> =
    LazyLock::new(|| compile_with_number(r"(?i)\b15\s*mm\b"));

pub(crate) static RAIN_45MM: LazyLock<Regex> =
    LazyLock::new(|| compile_with_number(r"(?i)\b45\s*mm\b"));

static RAIN_CONTEXT: LazyLock<Regex> =
    LazyLock::new(|| compile_with_number(r"(?i)pluie|abattement|lame\s+d['’]eau"));

static NEGATION: LazyLock<Regex> = LazyLock::new(|| {
    compile_with_number(
        r"(?i)\bnon\b|n['’]est\s+pas|ne\s+sont\s+pas|\bpas\s+(?:de\b|d['’]|g[ée]r|retenu|infiltr|stock)|\baucun",
    )
});

/// First numeric capture produced by the patterns, in order. Unparseable captures fall through
/// to the next match and then the next pattern.
pub(crate) fn first_number(patterns: &[Regex], text: &str) -> Option<f64> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .find_map(|captures| captures.get(1).and_then(|m| parse_number(m.as_str())))
    })
}

/// First non-empty text capture produced by the patterns, in order.
pub(crate) fn first_text(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern.captures_iter(text).find_map(|captures| {
            captures
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .filter(|value| !value.is_empty())
        })
    })
}

/// Evidence gathered for one rainfall threshold within one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RainEvidence {
    pub positive: bool,
    pub negative: bool,
}

/// Lines naming the threshold in a rainfall context count as positive unless negated.
pub(crate) fn rain_evidence(threshold: &Regex, text: &str) -> RainEvidence {
    let mut evidence = RainEvidence::default();
    for line in text.lines() {
        if !threshold.is_match(line) || !RAIN_CONTEXT.is_match(line) {
            continue;
        }
        if NEGATION.is_match(line) {
            evidence.negative = true;
        } else {
            evidence.positive = true;
        }
    }
    evidence
}
