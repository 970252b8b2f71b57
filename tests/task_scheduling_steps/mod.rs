//! Step definitions for task scheduling BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
