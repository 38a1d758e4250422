//! Timetabling domain models.
//!
//! Core data types for representing timetable-generation inputs and
//! solutions: classes with subject definitions, teachers with weekly
//! targets, the program/course catalog, and the day × period slot grid
//! that both solvers construct and score.

mod catalog;
mod class;
mod grid;
mod teacher;

pub use catalog::{
    catalog_credit_sum, program_min_credits, rating_for, Course, CourseRating, Program,
};
pub use class::{ClassUnit, CourseType, DeliveryMode, ElectiveOption, SubjectDefinition};
pub use grid::{Grid, Slot, SlotStatus, Solution};
pub use teacher::Teacher;
