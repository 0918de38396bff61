//! Clearance pricing for points-based elective course bidding.
//!
//! Students hold a point budget and bid on courses whose seats are split into
//! (grade, gender) quota cells. Given the students already holding a seat, the
//! [`electives::CourseData`] engine derives the minimum bid that currently wins a
//! seat in each cell.

pub mod config;
pub mod electives;
pub mod error;
pub mod telemetry;
