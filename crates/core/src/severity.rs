//! Severity classification of free-text diagnoses.
//!
//! Classification walks [`SEVERITY_PATTERNS`] top to bottom and returns the severity of the first
//! phrase found as a substring of the normalised diagnosis. More specific phrases are listed
//! before the general ones they contain, e.g. `"advanced diabetic nephropathy"` before
//! `"nephropathy"` and `"prediabetes"` before `"diabetes"`.

/// Ordinal severity level in `0..=5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(u8);

impl Severity {
    pub const MAX_LEVEL: u8 = 5;

    /// Builds a severity from a raw level, returning `None` above [`Severity::MAX_LEVEL`].
    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX_LEVEL).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the priority table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeverityPattern {
    /// Lower-case phrase searched for in the diagnosis.
    pub phrase: &'static str,
    pub severity: Severity,
}

const fn row(phrase: &'static str, level: u8) -> SeverityPattern {
    SeverityPattern {
        phrase,
        severity: Severity(level),
    }
}

/// Priority-ordered phrase table. First match wins.
pub const SEVERITY_PATTERNS: &[SeverityPattern] = &[
    row("diabetes type 3", 4),
    row("diabetes type 2", 3),
    row("diabetes type 1", 2),
    row("advanced diabetic nephropathy", 5),
    row("nephropathy", 4),
    row("prediabetes", 1),
    row("diabetes", 2),
    row("diabetic", 2),
    row("normal", 0),
];

/// Maps a diagnosis to its severity, or `None` when no phrase matches.
///
/// Matching is case-insensitive and ignores surrounding whitespace. An unknown diagnosis is a
/// normal outcome: rules that need a severity simply skip that visit.
pub fn classify(diagnosis: &str) -> Option<Severity> {
    let normalised = diagnosis.trim().to_lowercase();
    SEVERITY_PATTERNS
        .iter()
        .find(|p| normalised.contains(p.phrase))
        .map(|p| p.severity)
}
