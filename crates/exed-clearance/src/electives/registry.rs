use csv::StringRecord;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::Arc;
use tracing::{info, warn};

use super::course::{CourseCatalog, CourseCode};
use super::demographics::{Gender, Grade};
use super::ingest::{
    bad_data, field, parse_i32, parse_u32, read_records, report, require_columns, ErrorSink, IngestError,
};
use super::profile::{Profile, ProfileId};

const REQUIRED_COLUMNS: usize = 7;
const PREVIOUS_COURSE_COLUMNS: std::ops::Range<usize> = 7..10;

/// Non-fatal data-quality finding raised while building the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestDiagnostic {
    LotteryCollision { id: ProfileId, lotto_number: i32 },
}

/// Outcome of a successful registry build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub profiles: usize,
    pub diagnostics: Vec<IngestDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Built(IngestReport),
    /// The registry was already populated; the input was not read.
    AlreadyBuilt,
}

/// Identifier-keyed store of validated student profiles.
///
/// Populated once. A build against a non-empty registry is a no-op, and a
/// failed build leaves the registry untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<ProfileId, Arc<Profile>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a populated registry from a headed CSV export.
    pub fn from_reader<R: Read>(
        reader: R,
        catalog: &CourseCatalog,
        sink: &dyn ErrorSink,
    ) -> Result<(Self, IngestReport), IngestError> {
        let mut registry = Self::new();
        let report = match registry.load(reader, catalog, sink)? {
            BuildOutcome::Built(report) => report,
            BuildOutcome::AlreadyBuilt => IngestReport::default(),
        };
        Ok((registry, report))
    }

    pub fn load<R: Read>(
        &mut self,
        reader: R,
        catalog: &CourseCatalog,
        sink: &dyn ErrorSink,
    ) -> Result<BuildOutcome, IngestError> {
        if self.is_built() {
            return Ok(BuildOutcome::AlreadyBuilt);
        }

        let records = read_records(reader).inspect_err(|err| report(sink, err))?;
        self.build(&records, catalog, sink)
    }

    /// Parses `email, first, last, gender, grade, points, lotto, prev1?, prev2?, prev3?`
    /// rows into profiles. The first failing row aborts the whole batch and is
    /// reported to `sink`.
    pub fn build(
        &mut self,
        rows: &[StringRecord],
        catalog: &CourseCatalog,
        sink: &dyn ErrorSink,
    ) -> Result<BuildOutcome, IngestError> {
        if self.is_built() {
            return Ok(BuildOutcome::AlreadyBuilt);
        }

        let mut staged: HashMap<ProfileId, Arc<Profile>> = HashMap::with_capacity(rows.len());
        let mut seen_lotto: HashSet<i32> = HashSet::with_capacity(rows.len());
        let mut diagnostics = Vec::new();

        for (row, record) in rows.iter().enumerate() {
            let profile =
                parse_profile(row, record, catalog).inspect_err(|err| report(sink, err))?;

            if staged.contains_key(&profile.id()) {
                let err = bad_data(row, 0, field(record, 0), "student id already registered");
                report(sink, &err);
                return Err(err);
            }

            if !seen_lotto.insert(profile.lotto_number()) {
                warn!(
                    id = %profile.id(),
                    lotto_number = profile.lotto_number(),
                    "profile shares a lottery number with another student"
                );
                diagnostics.push(IngestDiagnostic::LotteryCollision {
                    id: profile.id(),
                    lotto_number: profile.lotto_number(),
                });
            }

            staged.insert(profile.id(), Arc::new(profile));
        }

        self.profiles = staged;
        let report = IngestReport {
            profiles: self.profiles.len(),
            diagnostics,
        };
        info!(
            profiles = report.profiles,
            lottery_collisions = report.diagnostics.len(),
            "profile registry built"
        );
        Ok(BuildOutcome::Built(report))
    }

    pub fn get(&self, id: ProfileId) -> Option<&Arc<Profile>> {
        self.profiles.get(&id)
    }

    pub fn count(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_built(&self) -> bool {
        !self.profiles.is_empty()
    }
}

fn parse_profile(
    row: usize,
    record: &StringRecord,
    catalog: &CourseCatalog,
) -> Result<Profile, IngestError> {
    require_columns(row, record, REQUIRED_COLUMNS)?;

    let email = field(record, 0);
    let id = ProfileId::from_email(email)
        .ok_or_else(|| bad_data(row, 0, email, "email does not carry a student number"))?;

    let gender_raw = field(record, 3);
    let gender = Gender::from_code(gender_raw)
        .ok_or_else(|| bad_data(row, 3, gender_raw, "unrecognized gender code"))?;

    let grade_raw = field(record, 4);
    let grade = Grade::from_code(grade_raw)
        .ok_or_else(|| bad_data(row, 4, grade_raw, "unrecognized grade code"))?;

    let points = parse_u32(record, row, 5)?;
    let lotto_number = parse_i32(record, row, 6)?;

    let mut builder = Profile::builder(id)
        .name(field(record, 1), field(record, 2))
        .gender(gender)
        .grade(grade)
        .points(points)
        .lotto_number(lotto_number);

    for column in PREVIOUS_COURSE_COLUMNS {
        let Some(code) = record.get(column) else {
            break;
        };
        if code.is_empty() {
            continue;
        }
        if !catalog.contains(code) {
            return Err(bad_data(row, column, code, "unknown previous course"));
        }
        builder = builder.previous_course(CourseCode::new(code));
    }

    Ok(builder.build())
}
