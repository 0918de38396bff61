use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::clearance::{ClearanceError, CourseData, ExpenditureMap};
use super::course::{Course, CourseCatalog};
use super::ingest::{self, ErrorSink, IngestError, RosterSummary};
use super::registry::{IngestReport, ProfileRegistry};

fn open_export(path: &Path, sink: &dyn ErrorSink) -> Result<File, IngestError> {
    File::open(path)
        .map_err(IngestError::from)
        .inspect_err(|err| ingest::report(sink, err))
}

/// Read-only facade over a loaded catalog and profile registry.
#[derive(Debug)]
pub struct ClearanceService {
    catalog: CourseCatalog,
    registry: ProfileRegistry,
    ingest_report: IngestReport,
    roster: RosterSummary,
}

impl ClearanceService {
    pub fn new(catalog: CourseCatalog, registry: ProfileRegistry) -> Self {
        Self {
            catalog,
            registry,
            ingest_report: IngestReport::default(),
            roster: RosterSummary::default(),
        }
    }

    /// Loads courses, then profiles (whose previous courses resolve against the
    /// catalog), then the optional bid roster.
    pub fn from_readers<C, P, R>(
        courses: C,
        profiles: P,
        roster: Option<R>,
        sink: &dyn ErrorSink,
    ) -> Result<Self, ServiceError>
    where
        C: Read,
        P: Read,
        R: Read,
    {
        let mut catalog =
            ingest::load_catalog(courses).inspect_err(|err| ingest::report(sink, err))?;
        let (registry, ingest_report) = ProfileRegistry::from_reader(profiles, &catalog, sink)?;

        let roster = match roster {
            Some(reader) => ingest::apply_roster(reader, &registry, &mut catalog)
                .inspect_err(|err| ingest::report(sink, err))?,
            None => RosterSummary::default(),
        };

        Ok(Self {
            catalog,
            registry,
            ingest_report,
            roster,
        })
    }

    pub fn from_paths(
        courses: &Path,
        profiles: &Path,
        roster: Option<&Path>,
        sink: &dyn ErrorSink,
    ) -> Result<Self, ServiceError> {
        let courses = open_export(courses, sink)?;
        let profiles = open_export(profiles, sink)?;
        let roster = roster
            .map(|path| open_export(path, sink))
            .transpose()?;
        Self::from_readers(courses, profiles, roster, sink)
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn ingest_report(&self) -> &IngestReport {
        &self.ingest_report
    }

    pub fn roster_summary(&self) -> RosterSummary {
        self.roster
    }

    /// Fresh clearance prices for `code`.
    pub fn clearance(&self, code: &str) -> Result<ClearanceView, ServiceError> {
        let course = self
            .catalog
            .get(code)
            .ok_or_else(|| ServiceError::UnknownCourse(code.to_string()))?;

        let mut data = CourseData::new(course);
        let prices = data.calc_demographic_expenditure()?.clone();

        Ok(ClearanceView {
            course: CourseSummaryView::from(course),
            prices,
        })
    }

    pub fn courses(&self) -> Vec<CourseSummaryView> {
        self.catalog.iter().map(CourseSummaryView::from).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseSummaryView {
    pub code: String,
    pub name: String,
    pub instructor: String,
    pub total_capacity: u32,
    pub occupants: usize,
    pub bids: usize,
}

impl From<&Course> for CourseSummaryView {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code().to_string(),
            name: course.name().to_string(),
            instructor: course.instructor().to_string(),
            total_capacity: course.quota().total_capacity(),
            occupants: course.occupant_count(),
            bids: course.bid_count(),
        }
    }
}

/// Clearance table for display.
#[derive(Debug, Clone, Serialize)]
pub struct ClearanceView {
    pub course: CourseSummaryView,
    pub prices: ExpenditureMap,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Clearance(#[from] ClearanceError),
    #[error("unknown course {0}")]
    UnknownCourse(String),
}
