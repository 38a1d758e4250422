//! Teacher model.

use serde::{Deserialize, Serialize};

/// A teacher available for timetable assignment.
///
/// `weekly_hours` is the target load; the hours actually left after a
/// generation run are derived output, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Required weekly teaching hours (target load).
    pub weekly_hours: u32,
}

impl Teacher {
    /// Creates a new teacher.
    pub fn new(id: impl Into<String>, weekly_hours: u32) -> Self {
        Self {
            id: id.into(),
            weekly_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_new() {
        let t = Teacher::new("T1", 18);
        assert_eq!(t.id, "T1");
        assert_eq!(t.weekly_hours, 18);
    }

    #[test]
    fn test_teacher_serde_roundtrip() {
        let t = Teacher::new("T1", 18);
        let json = serde_json::to_string(&t).unwrap();
        let back: Teacher = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "T1");
        assert_eq!(back.weekly_hours, 18);
    }
}
