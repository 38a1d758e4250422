//! Program and course catalog models.
//!
//! The catalog resolves a class's minimum-credit target: an explicit
//! `Program` record wins, else catalog courses for the program+semester
//! are summed, else the builder falls back to the class's own subjects.

use serde::{Deserialize, Serialize};

/// An academic program with an explicit minimum-credit target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Program identifier (matches `ClassUnit::program`).
    pub name: String,
    /// Semester this record applies to.
    pub semester: i32,
    /// Minimum credits a student must earn this semester.
    pub min_credits: f64,
}

/// A catalog course entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Course name.
    pub name: String,
    /// Owning program identifier.
    pub program: String,
    /// Semester the course is offered in.
    pub semester: i32,
    /// Credit weight.
    pub credits: f64,
}

/// An aggregate student rating for a course (1-5 scale).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRating {
    /// Subject/course name the rating applies to.
    pub subject: String,
    /// Mean rating, 1.0-5.0.
    pub rating: f64,
}

impl Program {
    /// Creates a new program record.
    pub fn new(name: impl Into<String>, semester: i32, min_credits: f64) -> Self {
        Self {
            name: name.into(),
            semester,
            min_credits,
        }
    }
}

impl Course {
    /// Creates a new catalog course.
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        semester: i32,
        credits: f64,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            semester,
            credits,
        }
    }
}

impl CourseRating {
    /// Creates a new course rating.
    pub fn new(subject: impl Into<String>, rating: f64) -> Self {
        Self {
            subject: subject.into(),
            rating,
        }
    }
}

/// Looks up an explicit minimum-credit record for a program+semester.
pub fn program_min_credits(programs: &[Program], program: &str, semester: i32) -> Option<f64> {
    programs
        .iter()
        .find(|p| p.name == program && p.semester == semester && p.min_credits > 0.0)
        .map(|p| p.min_credits)
}

/// Sums catalog course credits for a program+semester.
pub fn catalog_credit_sum(courses: &[Course], program: &str, semester: i32) -> f64 {
    courses
        .iter()
        .filter(|c| c.program == program && c.semester == semester)
        .map(|c| c.credits)
        .sum()
}

/// Finds the rating for a subject, if any.
pub fn rating_for(ratings: &[CourseRating], subject: &str) -> Option<f64> {
    ratings
        .iter()
        .find(|r| r.subject == subject)
        .map(|r| r.rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_lookup() {
        let programs = vec![Program::new("CS", 3, 22.0), Program::new("EE", 3, 20.0)];
        assert_eq!(program_min_credits(&programs, "CS", 3), Some(22.0));
        assert_eq!(program_min_credits(&programs, "CS", 4), None);
        assert_eq!(program_min_credits(&programs, "ME", 3), None);
    }

    #[test]
    fn test_program_zero_credits_ignored() {
        let programs = vec![Program::new("CS", 3, 0.0)];
        assert_eq!(program_min_credits(&programs, "CS", 3), None);
    }

    #[test]
    fn test_catalog_credit_sum() {
        let courses = vec![
            Course::new("Math", "CS", 3, 4.0),
            Course::new("Physics", "CS", 3, 3.0),
            Course::new("Circuits", "EE", 3, 4.0),
        ];
        assert_eq!(catalog_credit_sum(&courses, "CS", 3), 7.0);
        assert_eq!(catalog_credit_sum(&courses, "CS", 1), 0.0);
    }

    #[test]
    fn test_rating_for() {
        let ratings = vec![CourseRating::new("Math", 4.5)];
        assert_eq!(rating_for(&ratings, "Math"), Some(4.5));
        assert_eq!(rating_for(&ratings, "Art"), None);
    }
}
