use serde::{Deserialize, Serialize};
use std::fmt;

/// Grade level of a student, ordered from youngest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    Freshman,
    Sophomore,
    Junior,
    Senior,
}

impl Grade {
    pub const fn ordered() -> [Self; 4] {
        [Self::Freshman, Self::Sophomore, Self::Junior, Self::Senior]
    }

    /// Numeric school grade used in the validated student export (9 through 12).
    pub const fn code(self) -> u8 {
        match self {
            Self::Freshman => 9,
            Self::Sophomore => 10,
            Self::Junior => 11,
            Self::Senior => 12,
        }
    }

    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim().parse::<u8>().ok()? {
            9 => Some(Self::Freshman),
            10 => Some(Self::Sophomore),
            11 => Some(Self::Junior),
            12 => Some(Self::Senior),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Freshman => "Freshman",
            Self::Sophomore => "Sophomore",
            Self::Junior => "Junior",
            Self::Senior => "Senior",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn ordered() -> [Self; 2] {
        [Self::Male, Self::Female]
    }

    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Some(Self::Male),
            "f" | "female" => Some(Self::Female),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every (grade, gender) quota cell in grade-major order.
pub fn cells() -> impl Iterator<Item = (Grade, Gender)> {
    Grade::ordered()
        .into_iter()
        .flat_map(|grade| Gender::ordered().into_iter().map(move |gender| (grade, gender)))
}
