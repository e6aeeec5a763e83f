//! Request and response bodies for the HTTP API.
//!
//! These are the only types serialised over the wire. Each has a `utoipa::ToSchema` derive so the
//! OpenAPI document stays in step with the handlers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trajectory_core::{Issue, PatientTimeline, Visit};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
}

/// Visit payload accepted by `POST /patients/{id}/visits`.
///
/// `date`, `diagnosis` and `treatment` are required and must not be null.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewVisitReq {
    /// Visit date, `YYYY-MM-DD`.
    #[schema(example = "2024-03-01")]
    pub date: NaiveDate,
    #[schema(example = "Diabetes Type 2")]
    pub diagnosis: String,
    #[schema(example = "metformin")]
    pub treatment: String,
    /// Expected within 0 to 10.
    #[serde(default)]
    pub outcome_score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<NewVisitReq> for Visit {
    fn from(req: NewVisitReq) -> Self {
        Visit {
            date: req.date,
            diagnosis: req.diagnosis,
            treatment: req.treatment,
            outcome_score: req.outcome_score,
            notes: req.notes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VisitRes {
    pub date: NaiveDate,
    pub diagnosis: String,
    pub treatment: String,
    pub outcome_score: Option<f64>,
    pub notes: Option<String>,
}

impl From<Visit> for VisitRes {
    fn from(visit: Visit) -> Self {
        VisitRes {
            date: visit.date,
            diagnosis: visit.diagnosis,
            treatment: visit.treatment,
            outcome_score: visit.outcome_score,
            notes: visit.notes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IssueRes {
    /// One of `diagnosis_drift`, `outcome_reversal`, `data_error`, `treatment_contradiction`.
    #[serde(rename = "type")]
    pub issue_type: String,
    pub message: String,
    pub related_dates: Vec<NaiveDate>,
}

impl From<Issue> for IssueRes {
    fn from(issue: Issue) -> Self {
        IssueRes {
            issue_type: issue.issue_type.as_str().to_string(),
            message: issue.message,
            related_dates: issue.related_dates,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientTimelineRes {
    pub patient_id: String,
    pub visits: Vec<VisitRes>,
    pub issues: Vec<IssueRes>,
}

impl From<PatientTimeline> for PatientTimelineRes {
    fn from(timeline: PatientTimeline) -> Self {
        PatientTimelineRes {
            patient_id: timeline.patient_id.into_inner(),
            visits: timeline.visits.into_iter().map(VisitRes::from).collect(),
            issues: timeline.issues.into_iter().map(IssueRes::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletePatientRes {
    pub status: String,
    pub patient_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResetRes {
    pub status: String,
    /// Patients remaining after the reset; always zero.
    pub patients: usize,
}
