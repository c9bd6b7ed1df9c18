use log::{debug, error, info};
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client,
};
use serde_json::Value;

use crate::timetable::{
    error::FetchError,
    models::{
        lesson_model::{Lesson, TimetableResponse},
        request_model::CallsRequest,
        TimetableQuery, Upstream,
    },
    schema::SchemaValidator,
};

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";

/// Fetch one timetable window and validate it, keeping the failure cause.
pub async fn try_get_timetable(
    http_client: &Client,
    upstream: &Upstream,
    token: &str,
    query: &TimetableQuery,
) -> Result<TimetableResponse, FetchError> {
    info!(
        "Getting timetable of student {} from {} to {}",
        query.student_id, query.start, query.end
    );
    let body = CallsRequest::actual_lessons(&upstream.bundle_version, query);
    let response = http_client
        .post(&upstream.url)
        .bearer_auth(token)
        .header(ACCEPT, ACCEPT_VALUE)
        .header(CONTENT_TYPE, "application/json")
        .json(&body)
        .send()
        .await?;
    debug!("{} answered with {}", upstream.url, response.status());

    let bytes = response.bytes().await?;
    let json: Value = serde_json::from_slice(&bytes)?;
    let timetable = SchemaValidator::<TimetableResponse>::new()?.validate(json)?;
    info!(
        "Collected {} lessons in {} result(s)",
        timetable.lessons().count(),
        timetable.results.len()
    );
    Ok(timetable)
}

/// Fetch one timetable window; any failure is logged once and yields `None`.
pub async fn get_timetable(
    http_client: &Client,
    upstream: &Upstream,
    token: &str,
    query: &TimetableQuery,
) -> Option<TimetableResponse> {
    match try_get_timetable(http_client, upstream, token, query).await {
        Ok(timetable) => Some(timetable),
        Err(err) => {
            error!(
                "Failed to get timetable of student {}: {}",
                query.student_id, err
            );
            None
        }
    }
}

/// Fetch from the production endpoint, see [`get_timetable`].
pub async fn fetch_timetable(
    http_client: &Client,
    token: &str,
    student_id: i64,
    start: &str,
    end: &str,
) -> Option<TimetableResponse> {
    let query = TimetableQuery {
        student_id,
        start: start.to_owned(),
        end: end.to_owned(),
    };
    get_timetable(http_client, &Upstream::default(), token, &query).await
}

/* form one line of the summary for a lesson */
pub fn format_lesson_as_string(lesson: &Lesson) -> String {
    let (subject, room, teachers) = match lesson.effective_lesson() {
        Some(actual) => (
            if actual.subject.is_pseudo_subject {
                format!("({})", actual.subject.name)
            } else {
                actual.subject.name.clone()
            },
            actual.room.name.clone(),
            actual
                .teachers
                .iter()
                .map(|teacher| teacher.abbreviation.clone())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        None => ("-".to_owned(), "-".to_owned(), "-".to_owned()),
    };
    let marker = if lesson.is_cancelled() {
        " [cancelled]"
    } else if lesson.is_changed() {
        " [substitution]"
    } else {
        ""
    };
    format!(
        "{} {:>3}. {:<15} {} | {} | {}{}",
        lesson.date,
        lesson.class_hour.number,
        lesson.lesson_type,
        subject,
        room,
        teachers,
        marker
    )
}

pub fn render_summary(timetable: &TimetableResponse) -> String {
    timetable
        .lessons()
        .map(format_lesson_as_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
