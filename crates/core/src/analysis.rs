//! Rule-based trajectory analysis.
//!
//! [`analyze`] sorts a patient's visits by date, derives a severity and an outcome score per
//! visit, and runs five independent detection passes. Passes never short-circuit each other and
//! their findings are concatenated in a fixed order:
//!
//! 1. diagnosis drift between adjacent visits
//! 2. dip-then-spike over three consecutive visits
//! 3. outcome deterioration between adjacent visits
//! 4. outcome scores outside the valid range
//! 5. treatment that contradicts diagnosis severity
//!
//! The analysis is a pure function of its input: no I/O, no shared state, and identical input
//! always yields identical output.

use crate::constants::{
    AGGRESSIVE_KEYWORD, CONSERVATIVE_KEYWORDS, ESCALATION_KEYWORDS, MILD_LEVEL, MODERATE_LEVEL,
    NO_TREATMENT_VALUES, OUTCOME_DROP_THRESHOLD, OUTCOME_SCORE_MAX, OUTCOME_SCORE_MIN,
    SEVERE_LEVEL, SPIKE_MARGIN,
};
use crate::severity::{classify, Severity};
use crate::visit::{sorted_by_date, Issue, IssueType, Visit};

const MISSED_PROGRESSION_MESSAGE: &str = "Possible missed progression: diagnosis improved and then \
     worsened sharply beyond its earlier level. Review the middle visit for misclassification or \
     under-diagnosis.";

/// Sorted visits with their derived per-visit values, index-aligned.
struct Trajectory {
    visits: Vec<Visit>,
    severities: Vec<Option<Severity>>,
    scores: Vec<Option<f64>>,
}

impl Trajectory {
    fn new(visits: &[Visit]) -> Self {
        let visits = sorted_by_date(visits);
        let severities = visits.iter().map(|v| classify(&v.diagnosis)).collect();
        let scores = visits.iter().map(|v| v.outcome_score).collect();
        Self {
            visits,
            severities,
            scores,
        }
    }

    fn len(&self) -> usize {
        self.visits.len()
    }
}

/// Evaluates every rule over `visits` and returns the findings.
///
/// Input order does not matter; visits are sorted by date internally (stable for equal dates).
/// Visits with an unrecognised diagnosis or no outcome score are skipped by the rules that need
/// those values.
pub fn analyze(visits: &[Visit]) -> Vec<Issue> {
    if visits.is_empty() {
        return Vec::new();
    }

    let trajectory = Trajectory::new(visits);

    let mut issues = diagnosis_drift(&trajectory);
    issues.extend(missed_progression(&trajectory));
    issues.extend(outcome_deterioration(&trajectory));
    issues.extend(invalid_outcome_scores(&trajectory));
    issues.extend(treatment_contradictions(&trajectory));

    tracing::debug!(
        visits = trajectory.len(),
        issues = issues.len(),
        "trajectory analysed"
    );

    issues
}

fn diagnosis_drift(t: &Trajectory) -> Vec<Issue> {
    let mut issues = Vec::new();
    for i in 1..t.len() {
        let (Some(prev), Some(curr)) = (t.severities[i - 1], t.severities[i]) else {
            continue;
        };
        let direction = match curr.cmp(&prev) {
            std::cmp::Ordering::Greater => "worsened",
            std::cmp::Ordering::Less => "improved",
            std::cmp::Ordering::Equal => continue,
        };
        let (before, after) = (&t.visits[i - 1], &t.visits[i]);
        issues.push(Issue::new(
            IssueType::DiagnosisDrift,
            format!(
                "Diagnosis severity {direction} from {:?} (level {prev}) to {:?} (level {curr}).",
                before.diagnosis, after.diagnosis
            ),
            vec![before.date, after.date],
        ));
    }
    issues
}

fn missed_progression(t: &Trajectory) -> Vec<Issue> {
    let mut issues = Vec::new();
    for i in 1..t.len().saturating_sub(1) {
        let (Some(a), Some(b), Some(c)) =
            (t.severities[i - 1], t.severities[i], t.severities[i + 1])
        else {
            continue;
        };
        if a > b && c.level() > a.level() + SPIKE_MARGIN {
            issues.push(Issue::new(
                IssueType::DiagnosisDrift,
                MISSED_PROGRESSION_MESSAGE,
                vec![t.visits[i - 1].date, t.visits[i].date, t.visits[i + 1].date],
            ));
        }
    }
    issues
}

fn outcome_deterioration(t: &Trajectory) -> Vec<Issue> {
    let mut issues = Vec::new();
    for i in 1..t.len() {
        let (Some(prev), Some(curr)) = (t.scores[i - 1], t.scores[i]) else {
            continue;
        };
        if curr < prev - OUTCOME_DROP_THRESHOLD {
            issues.push(Issue::new(
                IssueType::OutcomeReversal,
                format!(
                    "Outcome score dropped from {prev} to {curr} between consecutive visits. \
                     Possible deterioration not reflected in the diagnosis."
                ),
                vec![t.visits[i - 1].date, t.visits[i].date],
            ));
        }
    }
    issues
}

fn invalid_outcome_scores(t: &Trajectory) -> Vec<Issue> {
    t.visits
        .iter()
        .zip(&t.scores)
        .filter_map(|(visit, score)| {
            let score = (*score)?;
            if !(OUTCOME_SCORE_MIN..=OUTCOME_SCORE_MAX).contains(&score) {
                Some(Issue::new(
                    IssueType::DataError,
                    format!(
                        "Outcome score {score} is outside the valid range \
                         {OUTCOME_SCORE_MIN}-{OUTCOME_SCORE_MAX}."
                    ),
                    vec![visit.date],
                ))
            } else {
                None
            }
        })
        .collect()
}

fn treatment_contradictions(t: &Trajectory) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (visit, severity) in t.visits.iter().zip(&t.severities) {
        let Some(severity) = severity else {
            continue;
        };
        let level = severity.level();
        let treatment = visit.treatment.to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| treatment.contains(k));

        if level >= SEVERE_LEVEL
            && contains_any(CONSERVATIVE_KEYWORDS)
            && !contains_any(ESCALATION_KEYWORDS)
        {
            issues.push(Issue::new(
                IssueType::TreatmentContradiction,
                format!(
                    "Mild treatment for severe diagnosis: {:?} (level {level}) treated with {:?}. \
                     Check if escalation of therapy is needed.",
                    visit.diagnosis, visit.treatment
                ),
                vec![visit.date],
            ));
        }

        if level >= MODERATE_LEVEL && NO_TREATMENT_VALUES.contains(&treatment.trim()) {
            issues.push(Issue::new(
                IssueType::TreatmentContradiction,
                format!(
                    "No treatment documented for diagnosis {:?} (level {level}). \
                     Verify if treatment is missing from the record.",
                    visit.diagnosis
                ),
                vec![visit.date],
            ));
        }

        if level <= MILD_LEVEL && treatment.contains(AGGRESSIVE_KEYWORD) {
            issues.push(Issue::new(
                IssueType::TreatmentContradiction,
                format!(
                    "Aggressive treatment for mild diagnosis: {:?} (level {level}) treated with {:?}. \
                     Check if diagnosis severity or treatment plan is documented correctly.",
                    visit.diagnosis, visit.treatment
                ),
                vec![visit.date],
            ));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date")
    }

    fn visit(d: u32, diagnosis: &str, treatment: &str) -> Visit {
        Visit::new(day(d), diagnosis, treatment)
    }

    fn of_type(issues: &[Issue], issue_type: IssueType) -> Vec<&Issue> {
        issues.iter().filter(|i| i.issue_type == issue_type).collect()
    }

    #[test]
    fn empty_input_yields_no_issues() {
        assert!(analyze(&[]).is_empty());
    }

    #[test]
    fn single_visit_runs_only_per_visit_rules() {
        let visits = vec![visit(1, "nephropathy", "none").with_outcome_score(11.0)];
        let issues = analyze(&visits);

        assert!(of_type(&issues, IssueType::DiagnosisDrift).is_empty());
        assert!(of_type(&issues, IssueType::OutcomeReversal).is_empty());
        assert_eq!(of_type(&issues, IssueType::DataError).len(), 1);
        assert_eq!(of_type(&issues, IssueType::TreatmentContradiction).len(), 1);
    }

    #[test]
    fn worsening_diagnosis_is_flagged_once() {
        let visits = vec![
            visit(1, "prediabetes", "metformin"),
            visit(2, "diabetes type 2", "metformin"),
        ];
        let issues = analyze(&visits);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::DiagnosisDrift);
        assert!(issues[0].message.contains("worsened"));
        assert_eq!(issues[0].related_dates, vec![day(1), day(2)]);
    }

    #[test]
    fn improving_diagnosis_is_flagged() {
        let visits = vec![
            visit(1, "diabetes type 1", "insulin"),
            visit(2, "normal", "annual review"),
        ];
        let issues = analyze(&visits);

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("improved"));
    }

    #[test]
    fn equal_or_unknown_severities_do_not_drift() {
        let visits = vec![
            visit(1, "diabetes", "metformin"),
            visit(2, "diabetic", "metformin"),
            visit(3, "hypertension", "ace inhibitor"),
            visit(4, "normal", "none"),
        ];
        assert!(analyze(&visits).is_empty());
    }

    #[test]
    fn dip_then_spike_reports_drift_and_missed_progression() {
        let visits = vec![
            visit(1, "diabetes type 2", "metformin"),
            visit(2, "normal", "annual review"),
            visit(3, "advanced diabetic nephropathy", "insulin and ace inhibitor"),
        ];
        let issues = analyze(&visits);

        assert_eq!(issues.len(), 3);
        assert!(issues[0].message.contains("improved"));
        assert_eq!(issues[0].related_dates, vec![day(1), day(2)]);
        assert!(issues[1].message.contains("worsened"));
        assert_eq!(issues[1].related_dates, vec![day(2), day(3)]);
        assert_eq!(issues[2].issue_type, IssueType::DiagnosisDrift);
        assert!(issues[2].message.contains("missed progression"));
        assert_eq!(issues[2].related_dates, vec![day(1), day(2), day(3)]);
    }

    #[test]
    fn spike_of_exactly_one_level_above_is_not_missed_progression() {
        let visits = vec![
            visit(1, "diabetes type 2", "metformin"),
            visit(2, "normal", "annual review"),
            visit(3, "nephropathy", "ace inhibitor"),
        ];
        let issues = analyze(&visits);

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| !i.message.contains("missed progression")));
    }

    #[test]
    fn unknown_middle_severity_skips_missed_progression() {
        let visits = vec![
            visit(1, "diabetes type 2", "metformin"),
            visit(2, "asthma", "inhaler"),
            visit(3, "advanced diabetic nephropathy", "insulin"),
        ];
        let issues = analyze(&visits);

        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn spike_without_dip_is_only_drift() {
        let visits = vec![
            visit(1, "normal", "annual review"),
            visit(2, "normal", "annual review"),
            visit(3, "advanced diabetic nephropathy", "insulin"),
        ];
        let issues = analyze(&visits);

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("worsened"));
        assert_eq!(issues[0].related_dates, vec![day(2), day(3)]);
    }

    #[test]
    fn nan_score_is_data_error() {
        let issues = analyze(&[visit(1, "hypertension", "rest").with_outcome_score(f64::NAN)]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::DataError);
    }

    #[test]
    fn arb_keyword_matches_inside_carbohydrate() {
        let issues = analyze(&[visit(1, "nephropathy", "low carbohydrate diet")]);
        assert!(issues.is_empty());
    }

    #[test]
    fn outcome_drop_above_threshold_is_reversal() {
        let visits = vec![
            visit(1, "hypertension", "ace inhibitor").with_outcome_score(8.0),
            visit(2, "hypertension", "ace inhibitor").with_outcome_score(6.5),
        ];
        let issues = analyze(&visits);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::OutcomeReversal);
        assert!(issues[0].message.contains('8'));
        assert!(issues[0].message.contains("6.5"));
        assert_eq!(issues[0].related_dates, vec![day(1), day(2)]);
    }

    #[test]
    fn small_outcome_drop_is_ignored() {
        let visits = vec![
            visit(1, "hypertension", "ace inhibitor").with_outcome_score(8.0),
            visit(2, "hypertension", "ace inhibitor").with_outcome_score(7.2),
        ];
        assert!(analyze(&visits).is_empty());
    }

    #[test]
    fn outcome_drop_of_exactly_one_is_ignored() {
        let visits = vec![
            visit(1, "hypertension", "ace inhibitor").with_outcome_score(8.0),
            visit(2, "hypertension", "ace inhibitor").with_outcome_score(7.0),
        ];
        assert!(analyze(&visits).is_empty());
    }

    #[test]
    fn missing_score_skips_reversal_check() {
        let visits = vec![
            visit(1, "hypertension", "ace inhibitor").with_outcome_score(9.0),
            visit(2, "hypertension", "ace inhibitor"),
            visit(3, "hypertension", "ace inhibitor").with_outcome_score(2.0),
        ];
        assert!(analyze(&visits).is_empty());
    }

    #[test]
    fn out_of_range_scores_are_data_errors() {
        for score in [11.0, -1.0] {
            let issues = analyze(&[visit(1, "hypertension", "rest").with_outcome_score(score)]);
            assert_eq!(issues.len(), 1, "score {score}");
            assert_eq!(issues[0].issue_type, IssueType::DataError);
            assert!(issues[0].message.contains(&score.to_string()));
            assert_eq!(issues[0].related_dates, vec![day(1)]);
        }
    }

    #[test]
    fn boundary_scores_are_valid() {
        for score in [0.0, 10.0] {
            let issues = analyze(&[visit(1, "hypertension", "rest").with_outcome_score(score)]);
            assert!(issues.is_empty(), "score {score}");
        }
    }

    #[test]
    fn lifestyle_only_for_severe_diagnosis_is_contradiction() {
        let issues = analyze(&[visit(1, "nephropathy", "lifestyle changes only")]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::TreatmentContradiction);
        assert!(issues[0].message.contains("Mild treatment"));
    }

    #[test]
    fn escalation_keyword_clears_lifestyle_contradiction() {
        let issues = analyze(&[visit(1, "nephropathy", "insulin and lifestyle changes")]);
        assert!(issues.is_empty());
    }

    #[test]
    fn conservative_treatment_for_moderate_diagnosis_is_fine() {
        let issues = analyze(&[visit(1, "diabetes", "diet")]);
        assert!(issues.is_empty());
    }

    #[test]
    fn absent_treatment_for_moderate_diagnosis_is_contradiction() {
        for treatment in ["", "  None ", "no treatment", "Stopped medication"] {
            let issues = analyze(&[visit(1, "diabetes", treatment)]);
            assert_eq!(issues.len(), 1, "treatment {treatment:?}");
            assert!(issues[0].message.contains("No treatment documented"));
        }
    }

    #[test]
    fn no_treatment_values_must_match_whole_text() {
        let issues = analyze(&[visit(1, "diabetes", "none of the above, metformin")]);
        assert!(issues.is_empty());
    }

    #[test]
    fn absent_treatment_for_mild_diagnosis_is_fine() {
        let issues = analyze(&[visit(1, "prediabetes", "none")]);
        assert!(issues.is_empty());
    }

    #[test]
    fn insulin_for_mild_diagnosis_is_contradiction() {
        let issues = analyze(&[visit(1, "normal", "Insulin glargine")]);

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("Aggressive treatment"));
    }

    #[test]
    fn one_visit_can_trigger_several_rules() {
        let issues = analyze(&[visit(1, "nephropathy", "diet").with_outcome_score(12.0)]);

        let types: Vec<IssueType> = issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(types, vec![IssueType::DataError, IssueType::TreatmentContradiction]);
    }

    #[test]
    fn unknown_severity_skips_treatment_rules() {
        let issues = analyze(&[visit(1, "asthma", "none")]);
        assert!(issues.is_empty());
    }

    #[test]
    fn passes_are_concatenated_in_fixed_order() {
        let visits = vec![
            visit(1, "prediabetes", "diet").with_outcome_score(9.0),
            visit(2, "diabetes type 2", "lifestyle").with_outcome_score(-2.0),
        ];
        let types: Vec<IssueType> = analyze(&visits).iter().map(|i| i.issue_type).collect();

        assert_eq!(
            types,
            vec![
                IssueType::DiagnosisDrift,
                IssueType::OutcomeReversal,
                IssueType::DataError,
                IssueType::TreatmentContradiction,
            ]
        );
    }

    #[test]
    fn analysis_is_deterministic() {
        let visits = vec![
            visit(1, "diabetes type 2", "diet").with_outcome_score(7.0),
            visit(2, "normal", "insulin").with_outcome_score(3.0),
            visit(3, "advanced diabetic nephropathy", "none").with_outcome_score(15.0),
        ];
        assert_eq!(analyze(&visits), analyze(&visits));
    }

    #[test]
    fn input_order_does_not_matter() {
        let ordered = vec![
            visit(1, "diabetes type 2", "metformin").with_outcome_score(8.0),
            visit(2, "normal", "annual review").with_outcome_score(6.0),
            visit(3, "advanced diabetic nephropathy", "lifestyle").with_outcome_score(11.0),
        ];
        let shuffled = vec![ordered[2].clone(), ordered[0].clone(), ordered[1].clone()];

        assert_eq!(analyze(&ordered), analyze(&shuffled));
    }

    #[test]
    fn same_day_visits_keep_insertion_order() {
        let visits = vec![
            visit(1, "prediabetes", "diet"),
            visit(1, "diabetes type 2", "metformin"),
        ];
        let issues = analyze(&visits);

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("worsened"));
        assert_eq!(issues[0].related_dates, vec![day(1), day(1)]);
    }
}
