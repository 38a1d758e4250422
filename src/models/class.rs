//! Class and subject models.
//!
//! A class unit is one cohort of students following a weekly timetable.
//! Its subjects declare how instruction is delivered (theory vs. 3-period
//! lab sessions) and which teachers are eligible to deliver it.

use serde::{Deserialize, Serialize};

/// One cohort of students sharing a weekly timetable.
///
/// Supplied whole by the data layer per generation run; immutable during
/// a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassUnit {
    /// Unique class name (e.g., "CS-3A").
    pub name: String,
    /// Owning program identifier.
    pub program: String,
    /// Semester number within the program.
    pub semester: i32,
    /// Enrolled student identifiers.
    pub students: Vec<String>,
    /// Subjects this class must be taught.
    pub subjects: Vec<SubjectDefinition>,
}

/// Course-type tag for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Major,
    SkillBased,
    /// Choice among named options; occupies pre-reserved elective periods
    /// instead of competing in per-period demand.
    Elective,
}

/// Delivery mode for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Single-period sessions.
    Theory,
    /// 3-contiguous-period sessions, placed atomically.
    Lab,
}

/// One named choice within an elective group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectiveOption {
    /// Option name (e.g., "French", "Music").
    pub name: String,
    /// Teacher IDs eligible to deliver this option.
    pub teachers: Vec<String>,
}

/// A subject taught to one class.
///
/// Credit weight drives proportional period allocation. For elective
/// groups, `options` and `picks_required` describe the choice set; the
/// group itself receives no ordinary demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectDefinition {
    /// Subject name (unique within the class).
    pub name: String,
    /// Credit weight. Must be > 0 for a subject to receive periods.
    pub credits: f64,
    /// Teacher IDs eligible to deliver this subject.
    pub teachers: Vec<String>,
    /// Course-type tag.
    pub course_type: CourseType,
    /// Delivery mode.
    pub mode: DeliveryMode,
    /// Elective options (empty unless `course_type == Elective`).
    pub options: Vec<ElectiveOption>,
    /// How many options a student must pick from an elective group.
    pub picks_required: u32,
}

impl ClassUnit {
    /// Creates a new class unit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: String::new(),
            semester: 0,
            students: Vec::new(),
            subjects: Vec::new(),
        }
    }

    /// Sets the owning program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: i32) -> Self {
        self.semester = semester;
        self
    }

    /// Adds a student identifier.
    pub fn with_student(mut self, student: impl Into<String>) -> Self {
        self.students.push(student.into());
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: SubjectDefinition) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Subjects that compete for ordinary per-period demand.
    pub fn teachable_subjects(&self) -> impl Iterator<Item = &SubjectDefinition> {
        self.subjects.iter().filter(|s| !s.is_elective())
    }

    /// Elective-group subjects of this class.
    pub fn elective_groups(&self) -> impl Iterator<Item = &SubjectDefinition> {
        self.subjects.iter().filter(|s| s.is_elective())
    }

    /// Whether any subject of this class is an elective group.
    ///
    /// Precomputed once per run by callers; never rescanned per candidate.
    pub fn has_electives(&self) -> bool {
        self.subjects.iter().any(|s| s.is_elective())
    }

    /// Finds a subject by name.
    pub fn subject(&self, name: &str) -> Option<&SubjectDefinition> {
        self.subjects.iter().find(|s| s.name == name)
    }
}

impl SubjectDefinition {
    /// Creates a theory subject with the given name and credit weight.
    pub fn new(name: impl Into<String>, credits: f64) -> Self {
        Self {
            name: name.into(),
            credits,
            teachers: Vec::new(),
            course_type: CourseType::Major,
            mode: DeliveryMode::Theory,
            options: Vec::new(),
            picks_required: 0,
        }
    }

    /// Sets eligible teachers.
    pub fn with_teachers(mut self, teachers: Vec<String>) -> Self {
        self.teachers = teachers;
        self
    }

    /// Sets the course type.
    pub fn with_course_type(mut self, course_type: CourseType) -> Self {
        self.course_type = course_type;
        self
    }

    /// Sets the delivery mode.
    pub fn with_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds an elective option and marks the subject as elective.
    pub fn with_option(mut self, option: ElectiveOption) -> Self {
        self.course_type = CourseType::Elective;
        self.options.push(option);
        self
    }

    /// Sets the number of options a student must pick.
    pub fn with_picks_required(mut self, picks: u32) -> Self {
        self.picks_required = picks;
        self
    }

    /// Whether this subject is an elective group.
    #[inline]
    pub fn is_elective(&self) -> bool {
        self.course_type == CourseType::Elective
    }

    /// Whether this subject is delivered as lab sessions.
    #[inline]
    pub fn is_lab(&self) -> bool {
        self.mode == DeliveryMode::Lab
    }

    /// All teacher IDs attached to this subject, options included.
    pub fn all_teachers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.teachers.iter().map(|t| t.as_str()).collect();
        for opt in &self.options {
            ids.extend(opt.teachers.iter().map(|t| t.as_str()));
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl ElectiveOption {
    /// Creates a new elective option.
    pub fn new(name: impl Into<String>, teachers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            teachers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_builder() {
        let class = ClassUnit::new("CS-3A")
            .with_program("CS")
            .with_semester(3)
            .with_student("S1")
            .with_subject(SubjectDefinition::new("Math", 4.0));

        assert_eq!(class.name, "CS-3A");
        assert_eq!(class.program, "CS");
        assert_eq!(class.semester, 3);
        assert_eq!(class.students, vec!["S1".to_string()]);
        assert_eq!(class.subjects.len(), 1);
        assert!(!class.has_electives());
    }

    #[test]
    fn test_subject_builder() {
        let subject = SubjectDefinition::new("Physics Lab", 2.0)
            .with_teachers(vec!["T1".into(), "T2".into()])
            .with_mode(DeliveryMode::Lab)
            .with_course_type(CourseType::SkillBased);

        assert_eq!(subject.name, "Physics Lab");
        assert!(subject.is_lab());
        assert!(!subject.is_elective());
        assert_eq!(subject.teachers.len(), 2);
    }

    #[test]
    fn test_elective_group() {
        let subject = SubjectDefinition::new("Language", 0.0)
            .with_option(ElectiveOption::new("French", vec!["T3".into()]))
            .with_option(ElectiveOption::new("German", vec!["T4".into()]))
            .with_picks_required(1);

        assert!(subject.is_elective());
        assert_eq!(subject.options.len(), 2);
        assert_eq!(subject.picks_required, 1);

        let all = subject.all_teachers();
        assert!(all.contains(&"T3"));
        assert!(all.contains(&"T4"));
    }

    #[test]
    fn test_teachable_excludes_electives() {
        let class = ClassUnit::new("C1")
            .with_subject(SubjectDefinition::new("Math", 4.0))
            .with_subject(
                SubjectDefinition::new("Language", 0.0)
                    .with_option(ElectiveOption::new("French", vec![])),
            );

        assert_eq!(class.teachable_subjects().count(), 1);
        assert_eq!(class.elective_groups().count(), 1);
        assert!(class.has_electives());
    }

    #[test]
    fn test_all_teachers_dedup() {
        let subject = SubjectDefinition::new("X", 1.0)
            .with_teachers(vec!["T1".into(), "T1".into()]);
        assert_eq!(subject.all_teachers(), vec!["T1"]);
    }
}
