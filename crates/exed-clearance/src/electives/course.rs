use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::application::Application;
use super::profile::{Profile, ProfileId};
use super::quota::SpotMap;

/// Short catalog code identifying a course (e.g. `HIKE`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseCode(pub String);

impl CourseCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while recording bids or assembling a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("student {student} already holds a bid on {course}")]
    DuplicateBid {
        student: ProfileId,
        course: CourseCode,
    },
    #[error("bid for {found} submitted to {expected}")]
    WrongCourse {
        expected: CourseCode,
        found: CourseCode,
    },
    #[error("course {0} is already defined")]
    DuplicateCourse(CourseCode),
}

/// An elective offering: identity, quota, incoming bids, and the students
/// currently holding a placed seat.
#[derive(Debug, Clone)]
pub struct Course {
    name: String,
    code: CourseCode,
    instructor: String,
    quota: SpotMap,
    occupants: BTreeMap<ProfileId, Arc<Profile>>,
    bids: HashMap<ProfileId, Application>,
}

impl Course {
    pub fn new(
        name: impl Into<String>,
        code: CourseCode,
        instructor: impl Into<String>,
        quota: SpotMap,
    ) -> Self {
        Self {
            name: name.into(),
            code,
            instructor: instructor.into(),
            quota,
            occupants: BTreeMap::new(),
            bids: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &CourseCode {
        &self.code
    }

    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    pub fn quota(&self) -> &SpotMap {
        &self.quota
    }

    pub fn occupants(&self) -> impl Iterator<Item = &Profile> + '_ {
        self.occupants.values().map(|profile| profile.as_ref())
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_occupant(&self, id: ProfileId) -> bool {
        self.occupants.contains_key(&id)
    }

    /// Gives `profile` a seat. Returns `false` when the student already held one.
    pub fn place_student(&mut self, profile: Arc<Profile>) -> bool {
        let id = profile.id();
        if self.occupants.contains_key(&id) {
            return false;
        }
        self.occupants.insert(id, profile);
        true
    }

    /// Records an incoming bid. Amounts are taken as given.
    pub fn submit_bid(&mut self, application: Application) -> Result<(), CourseError> {
        if application.course() != &self.code {
            return Err(CourseError::WrongCourse {
                expected: self.code.clone(),
                found: application.course().clone(),
            });
        }

        let student = application.student();
        if self.bids.contains_key(&student) {
            return Err(CourseError::DuplicateBid {
                student,
                course: self.code.clone(),
            });
        }

        self.bids.insert(student, application);
        Ok(())
    }

    pub fn bid_for(&self, student: ProfileId) -> Option<&Application> {
        self.bids.get(&student)
    }

    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }
}

/// Course lookup keyed by code.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: BTreeMap<CourseCode, Course>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, course: Course) -> Result<(), CourseError> {
        if self.courses.contains_key(course.code()) {
            return Err(CourseError::DuplicateCourse(course.code().clone()));
        }
        self.courses.insert(course.code().clone(), course);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&Course> {
        self.courses.get(&CourseCode::new(code))
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Course> {
        self.courses.get_mut(&CourseCode::new(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Course> + '_ {
        self.courses.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::electives::demographics::{Gender, Grade};

    fn course() -> Course {
        Course::new(
            "Canyon Hike",
            CourseCode::new("HIKE"),
            "jander",
            SpotMap::uniform(4, 1),
        )
    }

    #[test]
    fn place_student_is_idempotent() {
        let mut course = course();
        let profile = Arc::new(
            Profile::builder(ProfileId(1))
                .grade(Grade::Senior)
                .gender(Gender::Male)
                .build(),
        );

        assert!(course.place_student(profile.clone()));
        assert!(!course.place_student(profile));
        assert_eq!(course.occupant_count(), 1);
        assert!(course.is_occupant(ProfileId(1)));
    }

    #[test]
    fn submit_bid_allows_one_bid_per_student() {
        let mut course = course();
        course
            .submit_bid(Application::new(ProfileId(1), CourseCode::new("HIKE"), 5))
            .expect("first bid accepted");

        match course.submit_bid(Application::new(ProfileId(1), CourseCode::new("HIKE"), 9)) {
            Err(CourseError::DuplicateBid { student, .. }) => assert_eq!(student, ProfileId(1)),
            other => panic!("expected duplicate bid, got {other:?}"),
        }
        assert_eq!(course.bid_for(ProfileId(1)).map(Application::amount), Some(5));
    }

    #[test]
    fn submit_bid_rejects_other_course() {
        let mut course = course();
        let result = course.submit_bid(Application::new(ProfileId(1), CourseCode::new("RAFT"), 5));
        assert!(matches!(result, Err(CourseError::WrongCourse { .. })));
        assert_eq!(course.bid_count(), 0);
    }

    #[test]
    fn catalog_rejects_duplicate_codes() {
        let mut catalog = CourseCatalog::new();
        catalog.insert(course()).expect("first insert");
        assert!(matches!(
            catalog.insert(course()),
            Err(CourseError::DuplicateCourse(_))
        ));
        assert!(catalog.contains("HIKE"));
        assert!(catalog.get("RAFT").is_none());
    }
}
