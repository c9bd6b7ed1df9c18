//! Module with the request envelope of the `/api/calls` endpoint
use serde::Serialize;

use super::TimetableQuery;

const SCHEDULES_MODULE: &str = "schedules";
const ACTUAL_LESSONS_ENDPOINT: &str = "get-actual-lessons";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallsRequest {
    pub bundle_version: String,
    pub requests: Vec<ModuleCall>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCall {
    pub module_name: String,
    pub endpoint_name: String,
    pub parameters: LessonsParameters,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LessonsParameters {
    pub student: StudentRef,
    pub start: String,
    pub end: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StudentRef {
    pub id: i64,
}

impl CallsRequest {
    /// An envelope holding exactly one `schedules/get-actual-lessons` call.
    pub fn actual_lessons(bundle_version: &str, query: &TimetableQuery) -> Self {
        CallsRequest {
            bundle_version: bundle_version.to_owned(),
            requests: vec![ModuleCall {
                module_name: SCHEDULES_MODULE.to_owned(),
                endpoint_name: ACTUAL_LESSONS_ENDPOINT.to_owned(),
                parameters: LessonsParameters {
                    student: StudentRef {
                        id: query.student_id,
                    },
                    start: query.start.clone(),
                    end: query.end.clone(),
                },
            }],
        }
    }
}
