//! Elective bidding: validated student profiles, course quotas, and the
//! clearance prices derived from who currently holds a seat.

pub mod application;
pub mod clearance;
pub mod course;
pub mod demographics;
pub mod ingest;
pub mod profile;
pub mod quota;
pub mod registry;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use application::Application;
pub use clearance::{ClearanceError, ClearancePrice, CourseData, ExpenditureMap};
pub use course::{Course, CourseCatalog, CourseCode, CourseError};
pub use demographics::{Gender, Grade};
pub use ingest::{ErrorSink, IngestError, RosterStatus, RosterSummary, TracingErrorSink};
pub use profile::{Profile, ProfileBuilder, ProfileId};
pub use quota::SpotMap;
pub use registry::{BuildOutcome, IngestDiagnostic, IngestReport, ProfileRegistry};
pub use router::clearance_router;
pub use service::{ClearanceService, ClearanceView, CourseSummaryView, ServiceError};
