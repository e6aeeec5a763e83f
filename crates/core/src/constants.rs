//! Thresholds and keyword sets used by the trajectory rules.
//!
//! Keywords are matched as lower-case substrings of the treatment text unless noted otherwise.

/// Lowest valid outcome score (inclusive).
pub const OUTCOME_SCORE_MIN: f64 = 0.0;

/// Highest valid outcome score (inclusive).
pub const OUTCOME_SCORE_MAX: f64 = 10.0;

/// An outcome drop strictly greater than this between adjacent visits is a reversal.
pub const OUTCOME_DROP_THRESHOLD: f64 = 1.0;

/// The post-dip spike must exceed the pre-dip level by strictly more than this many levels.
pub const SPIKE_MARGIN: u8 = 1;

/// Severity at or above which conservative-only treatment is flagged.
pub const SEVERE_LEVEL: u8 = 3;

/// Severity at or above which an absent treatment is flagged.
pub const MODERATE_LEVEL: u8 = 2;

/// Severity at or below which insulin is flagged as aggressive.
pub const MILD_LEVEL: u8 = 1;

/// Treatment keywords that describe conservative management.
pub const CONSERVATIVE_KEYWORDS: &[&str] = &["lifestyle", "diet"];

/// Treatment keywords that indicate pharmacological escalation.
pub const ESCALATION_KEYWORDS: &[&str] = &["insulin", "metformin", "ace", "arb"];

/// Whole-text treatment values (trimmed, lower-cased) meaning nothing was prescribed.
pub const NO_TREATMENT_VALUES: &[&str] = &["", "none", "no treatment", "stopped medication"];

/// Treatment keyword considered aggressive for a mild diagnosis.
pub const AGGRESSIVE_KEYWORD: &str = "insulin";
