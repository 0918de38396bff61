use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use super::course::{Course, CourseCode};
use super::demographics::{cells, Gender, Grade};
use super::profile::{Profile, ProfileId};

/// Minimum winning bid for a quota cell.
///
/// `Unobtainable` orders above every point amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClearancePrice {
    Points(u32),
    Unobtainable,
}

impl ClearancePrice {
    pub const FREE: Self = Self::Points(0);

    fn outbidding(min_bid: u32) -> Self {
        min_bid
            .checked_add(1)
            .map_or(Self::Unobtainable, Self::Points)
    }
}

const UNOBTAINABLE: &str = "unobtainable";

impl fmt::Display for ClearancePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Points(points) => write!(f, "{points}"),
            Self::Unobtainable => f.write_str(UNOBTAINABLE),
        }
    }
}

impl Serialize for ClearancePrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Points(points) => serializer.serialize_u32(*points),
            Self::Unobtainable => serializer.serialize_str(UNOBTAINABLE),
        }
    }
}

/// Grade → gender → clearance price.
pub type ExpenditureMap = BTreeMap<Grade, BTreeMap<Gender, ClearancePrice>>;

#[derive(Debug, thiserror::Error)]
pub enum ClearanceError {
    #[error("cannot take the minimum bid of an empty student set on {course}")]
    EmptySet { course: CourseCode },
    #[error("student {student} has no bid on {course}")]
    MissingBid {
        student: ProfileId,
        course: CourseCode,
    },
}

/// Clearance snapshot derived from a course's current occupants.
///
/// Prices are only as fresh as the last [`CourseData::calc_demographic_expenditure`]
/// call; recompute after every placement change.
#[derive(Debug)]
pub struct CourseData<'a> {
    course: &'a Course,
    expenditure: ExpenditureMap,
}

impl<'a> CourseData<'a> {
    pub fn new(course: &'a Course) -> Self {
        Self {
            course,
            expenditure: ExpenditureMap::new(),
        }
    }

    /// Smallest bid placed on `course` by any of `students`.
    pub fn find_min_bid<'p, I>(students: I, course: &Course) -> Result<u32, ClearanceError>
    where
        I: IntoIterator<Item = &'p Profile>,
    {
        let mut min: Option<u32> = None;
        for student in students {
            let amount = course
                .bid_for(student.id())
                .map(|bid| bid.amount())
                .ok_or_else(|| ClearanceError::MissingBid {
                    student: student.id(),
                    course: course.code().clone(),
                })?;
            min = Some(min.map_or(amount, |current| current.min(amount)));
        }

        min.ok_or_else(|| ClearanceError::EmptySet {
            course: course.code().clone(),
        })
    }

    /// Recomputes the price of every quota cell from the current occupants.
    pub fn calc_demographic_expenditure(&mut self) -> Result<&ExpenditureMap, ClearanceError> {
        let course = self.course;
        let quota = course.quota();
        let occupied = course.occupant_count();
        let course_full = occupied >= quota.total_capacity() as usize;
        let mut expenditure = ExpenditureMap::new();

        for (grade, gender) in cells() {
            let capacity = quota.cell_capacity(grade, gender);
            let in_cell = course
                .occupants()
                .filter(|profile| profile.cell() == (grade, gender))
                .count();

            let price = if capacity == 0 {
                ClearancePrice::Unobtainable
            } else if in_cell >= capacity as usize {
                let cell_occupants = course
                    .occupants()
                    .filter(|profile| profile.cell() == (grade, gender));
                ClearancePrice::outbidding(Self::find_min_bid(cell_occupants, course)?)
            } else if course_full && occupied == 0 {
                // zero total capacity: nobody to outbid, no seat to win
                ClearancePrice::Unobtainable
            } else if course_full {
                ClearancePrice::outbidding(Self::find_min_bid(course.occupants(), course)?)
            } else {
                ClearancePrice::FREE
            };

            debug!(
                course = %course.code(),
                %grade,
                %gender,
                capacity,
                in_cell,
                occupied,
                %price,
                "priced quota cell"
            );
            expenditure.entry(grade).or_default().insert(gender, price);
        }

        self.expenditure = expenditure;
        Ok(&self.expenditure)
    }

    pub fn demographic_expenditure_map(&self) -> &ExpenditureMap {
        &self.expenditure
    }

    pub fn price_for(&self, grade: Grade, gender: Gender) -> Option<ClearancePrice> {
        self.expenditure
            .get(&grade)
            .and_then(|by_gender| by_gender.get(&gender))
            .copied()
    }
}
