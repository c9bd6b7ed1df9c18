use lib::timetable::models;
use lib::timetable::run_tool;

use std::process::ExitCode;

use clap::Parser;
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::{error, info};
use models::{Args, Config};
use run_tool::run;

#[tokio::main]
async fn main() -> ExitCode {
    /* Setup logging, stdout is reserved for the timetable itself */
    env_logger::builder()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    /* Get all the required resources */
    let args = Args::parse();
    let config: Config = match Figment::new()
        .merge(Json::file(&args.config_json_path))
        .merge(Env::prefixed("SM_"))
        .extract()
    {
        Ok(config) => config,
        Err(err) => {
            error!(
                "Failed to read config from {}: {}",
                args.config_json_path.display(),
                err
            );
            return ExitCode::FAILURE;
        }
    };
    info!("Read config from {}", args.config_json_path.display());
    let http_client = reqwest::Client::new();

    /* Fetch, validate and print */
    match run(http_client, &args, config).await {
        Ok(rendered) => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
