use log::info;

use super::{
    error::RunError,
    helpers::render_summary,
    models::{Args, Config, TimetableQuery},
    timetable_getter::TimetableGetter,
};

/// Command line values win over config.json.
pub fn resolve_query(args: &Args, config: &Config) -> Result<TimetableQuery, RunError> {
    let student_id = args
        .student_id
        .or(config.student_id)
        .ok_or(RunError::MissingParameter("student id"))?;
    let start = args
        .start
        .clone()
        .or_else(|| config.start.clone())
        .ok_or(RunError::MissingParameter("start date"))?;
    let end = args
        .end
        .clone()
        .or_else(|| config.end.clone())
        .ok_or(RunError::MissingParameter("end date"))?;
    Ok(TimetableQuery {
        student_id,
        start,
        end,
    })
}

/// Fetch the configured window once and render it for stdout.
pub async fn run<TG: TimetableGetter>(
    timetable_getter: TG,
    args: &Args,
    config: Config,
) -> Result<String, RunError> {
    let query = resolve_query(args, &config)?;
    let timetable = timetable_getter
        .get_timetable(&config.upstream(), &config.token, &query)
        .await?;
    info!(
        "Rendering {} lessons for student {}",
        timetable.lessons().count(),
        query.student_id
    );
    if args.summary {
        Ok(render_summary(&timetable))
    } else {
        serde_json::to_string_pretty(&timetable).map_err(RunError::Render)
    }
}
