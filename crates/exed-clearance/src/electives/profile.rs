use serde::{Deserialize, Serialize};
use std::fmt;

use super::course::CourseCode;
use super::demographics::{Gender, Grade};

/// Registry key for a student, derived from the student's school email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub u32);

impl ProfileId {
    /// Extracts the student number embedded at the end of the email local part,
    /// e.g. `jdoe24817@school.org` maps to `24817`.
    ///
    /// Returns `None` when the address has no `@`, the local part does not end in
    /// digits, or the digits do not fit in a `u32`.
    pub fn from_email(email: &str) -> Option<Self> {
        let (local, domain) = email.trim().split_once('@')?;
        if local.is_empty() || domain.is_empty() {
            return None;
        }

        let digit_start = local
            .char_indices()
            .rev()
            .take_while(|(_, ch)| ch.is_ascii_digit())
            .last()
            .map(|(index, _)| index)?;

        local[digit_start..].parse::<u32>().ok().map(Self)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated student record. Immutable once constructed; use [`ProfileBuilder`]
/// to assemble one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    id: ProfileId,
    first_name: String,
    last_name: String,
    gender: Gender,
    grade: Grade,
    points: u32,
    lotto_number: i32,
    previous_courses: Vec<CourseCode>,
}

impl Profile {
    pub fn builder(id: ProfileId) -> ProfileBuilder {
        ProfileBuilder::new(id)
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    /// Bidding budget.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Tie-break key used by placement when two bids are equal.
    pub fn lotto_number(&self) -> i32 {
        self.lotto_number
    }

    pub fn previous_courses(&self) -> &[CourseCode] {
        &self.previous_courses
    }

    pub fn cell(&self) -> (Grade, Gender) {
        (self.grade, self.gender)
    }
}

/// Step-wise constructor for [`Profile`].
///
/// Unset fields default to an unnamed freshman male with no points, lottery
/// number zero, and no previous courses.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    profile: Profile,
}

impl ProfileBuilder {
    pub fn new(id: ProfileId) -> Self {
        Self {
            profile: Profile {
                id,
                first_name: String::new(),
                last_name: String::new(),
                gender: Gender::Male,
                grade: Grade::Freshman,
                points: 0,
                lotto_number: 0,
                previous_courses: Vec::new(),
            },
        }
    }

    pub fn name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.profile.first_name = first_name.into();
        self.profile.last_name = last_name.into();
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.profile.gender = gender;
        self
    }

    pub fn grade(mut self, grade: Grade) -> Self {
        self.profile.grade = grade;
        self
    }

    pub fn points(mut self, points: u32) -> Self {
        self.profile.points = points;
        self
    }

    pub fn lotto_number(mut self, lotto_number: i32) -> Self {
        self.profile.lotto_number = lotto_number;
        self
    }

    pub fn previous_course(mut self, course: CourseCode) -> Self {
        self.profile.previous_courses.push(course);
        self
    }

    pub fn build(self) -> Profile {
        self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_uses_trailing_digits_of_local_part() {
        assert_eq!(
            ProfileId::from_email("jdoe24817@aspenk12.net"),
            Some(ProfileId(24817))
        );
        assert_eq!(
            ProfileId::from_email("  a1b2c0042@school.org "),
            Some(ProfileId(42))
        );
    }

    #[test]
    fn id_rejects_addresses_without_student_number() {
        assert_eq!(ProfileId::from_email("jdoe@school.org"), None);
        assert_eq!(ProfileId::from_email("jdoe24817"), None);
        assert_eq!(ProfileId::from_email("@school.org"), None);
        assert_eq!(ProfileId::from_email("99999999999@school.org"), None);
    }

    #[test]
    fn builder_sets_every_field() {
        let profile = Profile::builder(ProfileId(7))
            .name("Ada", "Lovelace")
            .gender(Gender::Female)
            .grade(Grade::Junior)
            .points(120)
            .lotto_number(33)
            .previous_course(CourseCode::new("HIKE"))
            .build();

        assert_eq!(profile.full_name(), "Ada Lovelace");
        assert_eq!(profile.cell(), (Grade::Junior, Gender::Female));
        assert_eq!(profile.points(), 120);
        assert_eq!(profile.lotto_number(), 33);
        assert_eq!(profile.previous_courses(), &[CourseCode::new("HIKE")]);
    }
}
