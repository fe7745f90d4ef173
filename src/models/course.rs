use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    Active,
    Draft,
    Inactive,
}

/// A language course that sessions are booked against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub level: String,
    pub description: String,
    /// Planned length in hours.
    pub duration: u32,
    pub status: CourseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<Uuid>,
    #[serde(default)]
    pub students_enrolled: Vec<Uuid>,
}

impl Course {
    pub fn new(title: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            level: level.into(),
            description: String::new(),
            duration: 0,
            status: CourseStatus::Draft,
            trainer_id: None,
            students_enrolled: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_duration(mut self, hours: u32) -> Self {
        self.duration = hours;
        self
    }

    pub fn with_status(mut self, status: CourseStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_trainer(mut self, trainer_id: Uuid) -> Self {
        self.trainer_id = Some(trainer_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_new_is_draft() {
        let course = Course::new("Business English", "B2");
        assert_eq!(course.status, CourseStatus::Draft);
        assert!(course.students_enrolled.is_empty());
    }

    #[test]
    fn test_course_builder() {
        let trainer = Uuid::new_v4();
        let course = Course::new("Spanish Basics", "A1")
            .with_description("Introductory course")
            .with_duration(20)
            .with_status(CourseStatus::Active)
            .with_trainer(trainer);

        assert_eq!(course.duration, 20);
        assert_eq!(course.status, CourseStatus::Active);
        assert_eq!(course.trainer_id, Some(trainer));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&CourseStatus::Active).unwrap(), "\"Active\"");

        let course = Course::new("Business English", "B2").with_trainer(Uuid::new_v4());
        let json = serde_json::to_string(&course).unwrap();
        assert!(json.contains("\"trainerId\""));
        assert!(json.contains("\"studentsEnrolled\""));
    }
}
