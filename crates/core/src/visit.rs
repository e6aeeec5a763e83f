//! Visit, issue and timeline types.
//!
//! Visits are immutable once recorded. Issues are derived from a visit list on every analysis
//! and are never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trajectory_types::PatientId;

/// A single recorded clinical encounter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Calendar date of the encounter. Not required to be unique within a patient.
    pub date: NaiveDate,
    /// Free-form clinical label; the only input to severity classification.
    pub diagnosis: String,
    /// Free-form treatment description. May be empty.
    pub treatment: String,
    /// Outcome score, expected within 0..=10 when present. NaN is reported as out of range.
    #[serde(default)]
    pub outcome_score: Option<f64>,
    /// Carried through untouched; never analysed.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Visit {
    pub fn new(date: NaiveDate, diagnosis: impl Into<String>, treatment: impl Into<String>) -> Self {
        Self {
            date,
            diagnosis: diagnosis.into(),
            treatment: treatment.into(),
            outcome_score: None,
            notes: None,
        }
    }

    pub fn with_outcome_score(mut self, score: f64) -> Self {
        self.outcome_score = Some(score);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Category of a finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Severity changed between adjacent visits, or a dip-then-spike was seen.
    DiagnosisDrift,
    /// Outcome score dropped by more than the allowed margin.
    OutcomeReversal,
    /// A visit carries a value outside its valid domain.
    DataError,
    /// Treatment does not fit the diagnosis severity.
    TreatmentContradiction,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::DiagnosisDrift => "diagnosis_drift",
            IssueType::OutcomeReversal => "outcome_reversal",
            IssueType::DataError => "data_error",
            IssueType::TreatmentContradiction => "treatment_contradiction",
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding produced by the trajectory analyzer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub message: String,
    /// Dates of the contributing visits, in chronological order.
    pub related_dates: Vec<NaiveDate>,
}

impl Issue {
    pub fn new(issue_type: IssueType, message: impl Into<String>, related_dates: Vec<NaiveDate>) -> Self {
        Self {
            issue_type,
            message: message.into(),
            related_dates,
        }
    }
}

/// Read view of a patient: visits sorted by date plus freshly computed issues.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientTimeline {
    pub patient_id: PatientId,
    pub visits: Vec<Visit>,
    pub issues: Vec<Issue>,
}

/// Returns a copy of `visits` sorted ascending by date.
///
/// The sort is stable, so visits sharing a date keep their insertion order.
pub fn sorted_by_date(visits: &[Visit]) -> Vec<Visit> {
    let mut sorted = visits.to_vec();
    sorted.sort_by_key(|v| v.date);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
    }

    #[test]
    fn sort_keeps_insertion_order_for_equal_dates() {
        let visits = vec![
            Visit::new(day(3), "normal", "none"),
            Visit::new(day(1), "first", "a"),
            Visit::new(day(1), "second", "b"),
        ];

        let sorted = sorted_by_date(&visits);
        let labels: Vec<&str> = sorted.iter().map(|v| v.diagnosis.as_str()).collect();
        assert_eq!(labels, vec!["first", "second", "normal"]);
    }

    #[test]
    fn visit_deserializes_with_optional_fields_absent() {
        let visit: Visit = serde_json::from_str(
            r#"{"date":"2024-02-01","diagnosis":"Prediabetes","treatment":"diet"}"#,
        )
        .expect("parse visit");

        assert_eq!(visit.date, NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date"));
        assert_eq!(visit.outcome_score, None);
        assert_eq!(visit.notes, None);
    }

    #[test]
    fn notes_are_serialized_untouched() {
        let visit = Visit::new(day(4), "diabetes", "metformin").with_notes("  fasting, see lab ");
        let json = serde_json::to_value(&visit).expect("serialize visit");

        assert_eq!(json["notes"], "  fasting, see lab ");
        assert_eq!(json["outcome_score"], serde_json::Value::Null);
    }

    #[test]
    fn visit_rejects_null_diagnosis() {
        let result = serde_json::from_str::<Visit>(
            r#"{"date":"2024-02-01","diagnosis":null,"treatment":"diet"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn issue_serializes_type_field() {
        let issue = Issue::new(IssueType::DataError, "bad", vec![day(2)]);
        let json = serde_json::to_value(&issue).expect("serialize issue");

        assert_eq!(json["type"], "data_error");
        assert_eq!(json["related_dates"][0], "2024-01-02");
    }
}
