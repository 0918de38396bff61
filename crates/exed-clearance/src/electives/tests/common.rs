use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use csv::StringRecord;

use crate::electives::course::{Course, CourseCatalog, CourseCode};
use crate::electives::demographics::{Gender, Grade};
use crate::electives::ingest::{read_records, ErrorSink};
use crate::electives::profile::{Profile, ProfileId};
use crate::electives::quota::SpotMap;
use crate::electives::Application;

pub(super) const PROFILE_HEADER: &str =
    "email,first_name,last_name,gender,grade,points,lotto,prev_1,prev_2,prev_3";

pub(super) fn course_with(quota: SpotMap) -> Course {
    Course::new("someCourse", CourseCode::new("SC"), "jander", quota)
}

/// Seats a student of the given cell after recording their bid.
pub(super) fn seat(
    course: &mut Course,
    id: u32,
    grade: Grade,
    gender: Gender,
    bid: u32,
) -> Arc<Profile> {
    let profile = Arc::new(student(id, grade, gender));
    course
        .submit_bid(Application::new(ProfileId(id), course.code().clone(), bid))
        .expect("bid accepted");
    course.place_student(profile.clone());
    profile
}

pub(super) fn student(id: u32, grade: Grade, gender: Gender) -> Profile {
    Profile::builder(ProfileId(id))
        .name(format!("Student{id}"), "Test")
        .grade(grade)
        .gender(gender)
        .points(100)
        .lotto_number(id as i32)
        .build()
}

pub(super) fn catalog() -> CourseCatalog {
    let mut catalog = CourseCatalog::new();
    for (code, name) in [("HIKE", "Canyon Hike"), ("RAFT", "River Raft"), ("CAVE", "Caving")] {
        catalog
            .insert(Course::new(
                name,
                CourseCode::new(code),
                "staff",
                SpotMap::uniform(8, 2),
            ))
            .expect("unique code");
    }
    catalog
}

pub(super) fn profile_rows(body: &str) -> Vec<StringRecord> {
    read_records(Cursor::new(format!("{PROFILE_HEADER}\n{body}"))).expect("csv parses")
}

#[derive(Default)]
pub(super) struct RecordingSink {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub(super) fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().expect("sink mutex poisoned").clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, message: &str, detail: &str) {
        self.reports
            .lock()
            .expect("sink mutex poisoned")
            .push((message.to_string(), detail.to_string()));
    }
}

/// In-memory log buffer for asserting on emitted `tracing` events.
#[derive(Clone, Default)]
pub(super) struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Runs `f` with a thread-local subscriber that writes into this buffer.
    pub(super) fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let logs = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub(super) fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("log buffer poisoned")
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
