use csv::StringRecord;
use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;
use tracing::{error, info};

use super::application::Application;
use super::course::{Course, CourseCatalog, CourseCode, CourseError};
use super::demographics::cells;
use super::profile::ProfileId;
use super::quota::SpotMap;
use super::registry::ProfileRegistry;

/// Failures while turning tabular exports into domain objects.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("record {row} is missing required columns (found {found}, expected at least {expected})")]
    MalformedRecord {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("record {row}, column {column}: {reason} (found {value:?})")]
    BadData {
        row: usize,
        column: usize,
        value: String,
        reason: &'static str,
    },
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Course(#[from] CourseError),
}

impl IngestError {
    /// Message suitable for a blocking notification shown to staff.
    pub fn headline(&self) -> &'static str {
        match self {
            IngestError::MalformedRecord { .. } => "Validated student data is missing.",
            IngestError::BadData { .. } => "Validated data contains an unrecognized value.",
            IngestError::Csv(_) | IngestError::Io(_) => "Input file could not be read.",
            IngestError::Course(_) => "Course data is inconsistent.",
        }
    }
}

/// Sink for ingestion failures that must be surfaced to a person.
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str, detail: &str);
}

/// Sink that only logs; used when no interactive surface is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, message: &str, detail: &str) {
        error!(%detail, "{message}");
    }
}

pub(crate) fn report(sink: &dyn ErrorSink, err: &IngestError) {
    sink.report(err.headline(), &err.to_string());
}

/// Reads every data row of a headed CSV export. Rows may differ in width.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<StringRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for record in csv_reader.records() {
        records.push(record?);
    }
    Ok(records)
}

pub(crate) fn require_columns(
    row: usize,
    record: &StringRecord,
    expected: usize,
) -> Result<(), IngestError> {
    if record.len() < expected {
        return Err(IngestError::MalformedRecord {
            row,
            found: record.len(),
            expected,
        });
    }
    Ok(())
}

pub(crate) fn field(record: &StringRecord, column: usize) -> &str {
    record.get(column).unwrap_or_default()
}

pub(crate) fn bad_data(
    row: usize,
    column: usize,
    value: &str,
    reason: &'static str,
) -> IngestError {
    IngestError::BadData {
        row,
        column,
        value: value.to_string(),
        reason,
    }
}

pub(crate) fn parse_u32(
    record: &StringRecord,
    row: usize,
    column: usize,
) -> Result<u32, IngestError> {
    let raw = field(record, column);
    raw.parse::<u32>()
        .map_err(|_| bad_data(row, column, raw, "expected a non-negative integer"))
}

pub(crate) fn parse_i32(
    record: &StringRecord,
    row: usize,
    column: usize,
) -> Result<i32, IngestError> {
    let raw = field(record, column);
    raw.parse::<i32>()
        .map_err(|_| bad_data(row, column, raw, "expected an integer"))
}

const COURSE_COLUMNS: usize = 12;

/// Loads a course catalog from `code,name,instructor,total,<8 cell capacities>`
/// rows. Cell columns run grade-major: freshman male, freshman female,
/// sophomore male, and so on through senior female.
pub fn load_catalog<R: Read>(reader: R) -> Result<CourseCatalog, IngestError> {
    let mut catalog = CourseCatalog::new();

    for (row, record) in read_records(reader)?.iter().enumerate() {
        require_columns(row, record, COURSE_COLUMNS)?;

        let code = field(record, 0);
        if code.is_empty() {
            return Err(bad_data(row, 0, code, "course code is empty"));
        }

        let total = parse_u32(record, row, 3)?;
        let mut quota = SpotMap::new(total);
        for (offset, (grade, gender)) in cells().enumerate() {
            quota = quota.with_cell(grade, gender, parse_u32(record, row, 4 + offset)?);
        }

        let course = Course::new(
            field(record, 1),
            CourseCode::new(code),
            field(record, 2),
            quota,
        );
        catalog
            .insert(course)
            .map_err(|_| bad_data(row, 0, code, "course code appears more than once"))?;
    }

    info!(courses = catalog.len(), "course catalog loaded");
    Ok(catalog)
}

/// Whether a roster row's bid has already been granted a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterStatus {
    Placed,
    Pending,
}

impl RosterStatus {
    fn from_code(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "placed" => Some(Self::Placed),
            "pending" | "" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Counts from a roster import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterSummary {
    pub bids: usize,
    pub placements: usize,
}

struct RosterEntry {
    application: Application,
    status: RosterStatus,
}

const ROSTER_COLUMNS: usize = 3;

/// Applies an `email,course,points,status` roster to the catalog: every row
/// records a bid, and `placed` rows also seat the student.
///
/// All rows are validated before the catalog is touched.
pub fn apply_roster<R: Read>(
    reader: R,
    registry: &ProfileRegistry,
    catalog: &mut CourseCatalog,
) -> Result<RosterSummary, IngestError> {
    let mut entries = Vec::new();
    let mut seen: HashSet<(ProfileId, CourseCode)> = HashSet::new();

    for (row, record) in read_records(reader)?.iter().enumerate() {
        require_columns(row, record, ROSTER_COLUMNS)?;

        let email = field(record, 0);
        let student = ProfileId::from_email(email)
            .ok_or_else(|| bad_data(row, 0, email, "email does not carry a student number"))?;
        if registry.get(student).is_none() {
            return Err(bad_data(row, 0, email, "no registered profile for this student"));
        }

        let code = field(record, 1);
        if !catalog.contains(code) {
            return Err(bad_data(row, 1, code, "unknown course code"));
        }
        let course = CourseCode::new(code);

        let amount = parse_u32(record, row, 2)?;

        let status_raw = field(record, 3);
        let status = RosterStatus::from_code(status_raw)
            .ok_or_else(|| bad_data(row, 3, status_raw, "status must be placed or pending"))?;

        let already_bid = catalog
            .get(code)
            .is_some_and(|existing| existing.bid_for(student).is_some());
        if already_bid || !seen.insert((student, course.clone())) {
            return Err(bad_data(row, 1, code, "student already bid on this course"));
        }

        entries.push(RosterEntry {
            application: Application::new(student, course, amount),
            status,
        });
    }

    let mut summary = RosterSummary::default();
    for entry in entries {
        let code = entry.application.course().clone();
        let student = entry.application.student();
        let Some(course) = catalog.get_mut(code.as_str()) else {
            continue;
        };

        course.submit_bid(entry.application)?;
        summary.bids += 1;

        if entry.status == RosterStatus::Placed {
            if let Some(profile) = registry.get(student) {
                if course.place_student(Arc::clone(profile)) {
                    summary.placements += 1;
                }
            }
        }
    }

    info!(
        bids = summary.bids,
        placements = summary.placements,
        "roster applied"
    );
    Ok(summary)
}
