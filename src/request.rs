//! Generation request container.

use serde::{Deserialize, Serialize};

use crate::models::{ClassUnit, Course, CourseRating, Program, Teacher};

/// Valid range for working days per week.
pub const DAY_RANGE: (i32, i32) = (1, 7);
/// Valid range for periods per day.
pub const HOUR_RANGE: (i32, i32) = (1, 12);

/// Input container for one timetable-generation run.
///
/// Bundles everything the data layer supplies: classes, teachers, the
/// week shape, fixed break/elective indices, and the program/course
/// catalog. Immutable during a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableRequest {
    /// Classes to timetable.
    pub classes: Vec<ClassUnit>,
    /// Available teachers.
    pub teachers: Vec<Teacher>,
    /// Working days per week (clamped to 1-7).
    pub working_days: i32,
    /// Periods per day (clamped to 1-12).
    pub hours_per_day: i32,
    /// Period indices reserved as breaks, every day.
    pub break_slots: Vec<usize>,
    /// Period indices reserved for elective-group meetings (rotated per day).
    pub elective_periods: Vec<usize>,
    /// Explicit program minimum-credit records.
    pub programs: Vec<Program>,
    /// Course catalog (fallback credit source).
    pub courses: Vec<Course>,
    /// Course ratings (ACO placement nudge).
    pub course_ratings: Vec<CourseRating>,
    /// Share of non-break capacity left free by the GA initializer (0-100).
    pub free_period_percentage: f64,
}

impl TimetableRequest {
    /// Creates a request with the given week shape.
    pub fn new(working_days: i32, hours_per_day: i32) -> Self {
        Self {
            working_days,
            hours_per_day,
            ..Self::default()
        }
    }

    /// Sets the classes.
    pub fn with_classes(mut self, classes: Vec<ClassUnit>) -> Self {
        self.classes = classes;
        self
    }

    /// Sets the teachers.
    pub fn with_teachers(mut self, teachers: Vec<Teacher>) -> Self {
        self.teachers = teachers;
        self
    }

    /// Sets the break period indices.
    pub fn with_break_slots(mut self, break_slots: Vec<usize>) -> Self {
        self.break_slots = break_slots;
        self
    }

    /// Sets the elective period indices.
    pub fn with_elective_periods(mut self, elective_periods: Vec<usize>) -> Self {
        self.elective_periods = elective_periods;
        self
    }

    /// Sets the program records.
    pub fn with_programs(mut self, programs: Vec<Program>) -> Self {
        self.programs = programs;
        self
    }

    /// Sets the course catalog.
    pub fn with_courses(mut self, courses: Vec<Course>) -> Self {
        self.courses = courses;
        self
    }

    /// Sets the course ratings.
    pub fn with_course_ratings(mut self, ratings: Vec<CourseRating>) -> Self {
        self.course_ratings = ratings;
        self
    }

    /// Sets the free-period percentage (GA initializer).
    pub fn with_free_period_percentage(mut self, pct: f64) -> Self {
        self.free_period_percentage = pct;
        self
    }

    /// Working days clamped to the valid range.
    pub fn days(&self) -> usize {
        self.working_days.clamp(DAY_RANGE.0, DAY_RANGE.1) as usize
    }

    /// Periods per day clamped to the valid range.
    pub fn hours(&self) -> usize {
        self.hours_per_day.clamp(HOUR_RANGE.0, HOUR_RANGE.1) as usize
    }

    /// Free-period percentage clamped to 0-100.
    pub fn free_percentage(&self) -> f64 {
        self.free_period_percentage.clamp(0.0, 100.0)
    }
}
