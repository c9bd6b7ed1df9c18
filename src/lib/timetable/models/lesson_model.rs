//! Module with lesson models compatible with the `schedules/get-actual-lessons` call of Schulmanager Online
use std::fmt;

use chrono::NaiveDate;
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct ClassHour {
    pub id: i64,
    /// Display label, e.g. "3" for the third hour.
    pub number: String,
}

#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub abbreviation: String,
    pub name: String,
    /// Set for blocks that are not real teaching, e.g. study hall.
    pub is_pseudo_subject: bool,
}

/// A class (cohort) such as "7a".
#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct Classe {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub id: i64,
    pub abbreviation: String,
    pub firstname: String,
    pub lastname: String,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentGroup {
    pub id: i64,
    pub name: String,
    /// Always sent by the upstream, `null` for groups spanning several classes.
    #[serde(deserialize_with = "Option::deserialize")]
    #[schemars(schema_with = "nullable_id")]
    pub class_id: Option<i64>,
}

fn nullable_id(_: &mut SchemaGenerator) -> Schema {
    json_schema!({ "type": ["integer", "null"] })
}

/// What actually takes place in a slot, or what was planned before a change.
#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActualLesson {
    pub room: Room,
    pub subject: Subject,
    pub teachers: Vec<Teacher>,
    pub subject_label: String,
    pub student_groups: Vec<StudentGroup>,
    pub classes: Vec<Classe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "i64")]
    pub lesson_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "i64")]
    pub course_id: Option<i64>,
}

#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum LessonType {
    RegularLesson,
    CancelledLesson,
    ChangedLesson,
    Event,
    SpecialLesson,
}

impl LessonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonType::RegularLesson => "regularLesson",
            LessonType::CancelledLesson => "cancelledLesson",
            LessonType::ChangedLesson => "changedLesson",
            LessonType::Event => "event",
            LessonType::SpecialLesson => "specialLesson",
        }
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One slot of the timetable.
///
/// Optional fields may be left out by the upstream but are never `null`; their
/// schema is that of the inner type and `#[serde(default)]` keeps them out of
/// `required`.
#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub date: NaiveDate,
    pub class_hour: ClassHour,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "ActualLesson")]
    pub actual_lesson: Option<ActualLesson>,
    /// State before a substitution or cancellation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Vec<ActualLesson>")]
    pub original_lessons: Option<Vec<ActualLesson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "bool")]
    pub is_substitution: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "bool")]
    pub is_new: Option<bool>,
}

impl Lesson {
    pub fn is_cancelled(&self) -> bool {
        self.lesson_type == LessonType::CancelledLesson
    }

    pub fn is_changed(&self) -> bool {
        self.lesson_type == LessonType::ChangedLesson || self.is_substitution == Some(true)
    }

    /// The lesson that takes place, falling back to the first planned one for cancellations.
    pub fn effective_lesson(&self) -> Option<&ActualLesson> {
        self.actual_lesson.as_ref().or_else(|| {
            self.original_lessons
                .as_ref()
                .and_then(|originals| originals.first())
        })
    }
}

#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub text: String,
    pub teachers: Vec<Teacher>,
    pub classes: Vec<Classe>,
    pub rooms: Vec<Room>,
    pub student_groups: Vec<StudentGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "i64")]
    pub absence_id: Option<i64>,
}

/// A lesson that may carry an event payload, sent for lessons of type `event`.
#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct LessonWithEvent {
    #[serde(flatten)]
    pub lesson: Lesson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Event")]
    pub event: Option<Event>,
}

/// Result of one module call inside the `calls` envelope.
#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct CallResult {
    pub status: u16,
    pub data: Vec<Lesson>,
}

#[derive(Deserialize, Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct TimetableResponse {
    pub results: Vec<CallResult>,
}

impl TimetableResponse {
    /// Every lesson of every result, in upstream order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.results.iter().flat_map(|result| result.data.iter())
    }
}
