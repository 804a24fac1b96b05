//! # AICTE Portal
//!
//! Tracks student achievements: students submit AICTE grades and activities,
//! and mentors approve grades and publish events targeted at groups of students.

pub mod config;
pub mod error;
pub mod file;
pub mod graphql;
pub mod models;
pub mod util;

#[cfg(test)]
mod tests;
