#![allow(non_snake_case)]

use std::env;
use std::sync::Arc;

use dayPlanner::cli;
use dayPlanner::config::AppConfig;
use dayPlanner::db::{DB, load_db};
use dayPlanner::models::activity::{self, Activity};
use dayPlanner::runtime;
use dayPlanner::service::ack_service::Theme;

const DEFAULT_RUN_MODE: &str = "api";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TIMEZONE: &str = "America/New_York";

#[tokio::main]
async fn main() {
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    let db: DB<Activity> =
        load_db(&activity::get_db_location()).expect("Unable to load database.");
    let shared_db = Arc::new(tokio::sync::Mutex::new(db));

    let openai_api_key = get_prop("OPENAI_API_KEY")
        .expect("OPENAI_API_KEY environment variable not set");
    let theme = get_prop("REMINDER_THEME")
        .map(|v| v.parse::<Theme>().expect("Invalid REMINDER_THEME"))
        .unwrap_or_default();
    let tz: chrono_tz::Tz = get_prop("TIMEZONE")
        .unwrap_or(DEFAULT_TIMEZONE.to_string())
        .parse()
        .expect("Invalid TIMEZONE");

    let run_mode = get_prop("RUN_MODE").unwrap_or(DEFAULT_RUN_MODE.to_string());
    if run_mode == "api" {
        let port = get_prop("PORT")
            .map(|v| v.parse::<u16>().expect("Invalid PORT"))
            .unwrap_or(DEFAULT_PORT);
        runtime::run_api(shared_db.clone(), openai_api_key, port, theme, tz).await;
    } else if run_mode == "cli" {
        cli::cli(shared_db.clone(), openai_api_key, tz).await;
    } else {
        println!("Invalid run mode {}", run_mode);
    }
}
