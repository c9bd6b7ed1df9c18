use reqwest::Client;

use super::{
    error::FetchError,
    helpers::try_get_timetable,
    models::{lesson_model::TimetableResponse, TimetableQuery, Upstream},
};

/// A trait, necessary for every entity that will be used for getting a validated timetable.
#[allow(async_fn_in_trait)]
pub trait TimetableGetter {
    async fn get_timetable(
        &self,
        upstream: &Upstream,
        token: &str,
        query: &TimetableQuery,
    ) -> Result<TimetableResponse, FetchError>;
}

/// Allows to use Client for getting the timetable via a request to Schulmanager Online.
impl TimetableGetter for Client {
    async fn get_timetable(
        &self,
        upstream: &Upstream,
        token: &str,
        query: &TimetableQuery,
    ) -> Result<TimetableResponse, FetchError> {
        try_get_timetable(self, upstream, token, query).await
    }
}
