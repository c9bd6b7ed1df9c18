//! Typed, schema-validated access to the Schulmanager Online timetable API.
pub mod timetable;
