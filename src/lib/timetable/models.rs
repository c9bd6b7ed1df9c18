use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

pub mod lesson_model;
pub mod request_model;

/// The single endpoint every Schulmanager Online module call goes through.
pub const SCHULMANAGER_CALLS_URL: &str = "https://login.schulmanager-online.de/api/calls";

/// Bundle version the upstream expects for the current request/response contract.
pub const BUNDLE_VERSION: &str = "b413412dfd";

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Path to config.json, that contains the token and the default query.
/// 2. Optional overrides for the student and the date window, taking precedence over config.json.
/// 3. Whether to print a per-lesson summary instead of the validated JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[arg(long, value_name = "ID")]
    pub student_id: Option<i64>,
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,
    #[arg(long)]
    pub summary: bool,
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Bearer token of an already logged in Schulmanager session
/// 2. Default student and date window, used when not given on the command line
/// 3. Upstream endpoint and bundle version, defaulting to the production values
#[derive(Debug, Deserialize)]
pub struct Config {
    pub token: String,
    pub student_id: Option<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_bundle_version")]
    pub bundle_version: String,
}

impl Config {
    pub fn upstream(&self) -> Upstream {
        Upstream {
            url: self.endpoint.clone(),
            bundle_version: self.bundle_version.clone(),
        }
    }
}

fn default_endpoint() -> String {
    SCHULMANAGER_CALLS_URL.to_owned()
}

fn default_bundle_version() -> String {
    BUNDLE_VERSION.to_owned()
}

/// Where requests are sent and which contract version they claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub url: String,
    pub bundle_version: String,
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            url: default_endpoint(),
            bundle_version: default_bundle_version(),
        }
    }
}

/// One student's timetable window. Dates are sent as given, without checking them first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableQuery {
    pub student_id: i64,
    pub start: String,
    pub end: String,
}
