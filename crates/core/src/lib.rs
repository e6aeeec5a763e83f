//! # Trajectory Core
//!
//! Rule-based analysis of a patient's chronological visit records.
//!
//! This crate contains:
//! - the visit/issue data model
//! - the severity classifier (ordered phrase table)
//! - the trajectory analyzer (five detection passes)
//! - the visit store abstraction and an in-memory implementation
//! - `TimelineService`, combining store and analyzer for callers
//!
//! **No API concerns**: HTTP routing, CORS and response shapes belong in `api-rest` and
//! `api-shared`.

pub mod analysis;
pub mod constants;
pub mod error;
pub mod import;
pub mod severity;
pub mod store;
pub mod timeline;
pub mod visit;

pub use analysis::analyze;
pub use error::{TrajectoryError, TrajectoryResult};
pub use import::parse_visits_json;
pub use severity::{classify, Severity, SeverityPattern, SEVERITY_PATTERNS};
pub use store::{InMemoryVisitStore, VisitStore};
pub use timeline::TimelineService;
pub use visit::{sorted_by_date, Issue, IssueType, PatientTimeline, Visit};

pub use trajectory_types::{IdError, PatientId};
