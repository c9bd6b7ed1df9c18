pub mod error;
pub mod helpers;
pub mod models;
pub mod run_tool;
pub mod schema;
pub mod timetable_getter;
