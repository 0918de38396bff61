use serde::Serialize;

use super::course::CourseCode;
use super::profile::ProfileId;

/// A student's point offer on one course. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    student: ProfileId,
    course: CourseCode,
    amount: u32,
}

impl Application {
    pub fn new(student: ProfileId, course: CourseCode, amount: u32) -> Self {
        Self {
            student,
            course,
            amount,
        }
    }

    pub fn student(&self) -> ProfileId {
        self.student
    }

    pub fn course(&self) -> &CourseCode {
        &self.course
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }
}
