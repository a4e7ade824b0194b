use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use inquire::Text;
use tokio::sync::Mutex;

use crate::db::DB;
use crate::models::activity::Activity;
use crate::service::activity_service::ActivityService;
use crate::service::extraction_service::ExtractionService;
use crate::service::openai_service::OpenAIService;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract activities from a plan description and store them.
    Plan { text: String },
    /// Prompt interactively for a plan description.
    PlanPrompt {},
    /// List stored activities, optionally for a single date.
    Agenda { date: Option<NaiveDate> },
}

pub async fn cli(shared_db: Arc<Mutex<DB<Activity>>>, openai_api_key: String, tz: Tz) {
    // Fine to panic here
    let cli = Cli::parse();
    let mut db = shared_db.lock().await;
    match &cli.command {
        Commands::Plan { text } => {
            if let Err(e) = plan_from_text(&mut db, text, &openai_api_key, tz).await {
                println!("Failed to plan day: {}", e);
            }
        }
        Commands::PlanPrompt {} => match specify_prompt() {
            Ok(text) => {
                if let Err(e) = plan_from_text(&mut db, &text, &openai_api_key, tz).await {
                    println!("Failed to plan day: {}", e);
                }
            }
            Err(_) => {
                println!("No plan description supplied");
            }
        },
        Commands::Agenda { date } => {
            let activities = match date {
                Some(date) => ActivityService::list_by_date(&db, *date),
                None => ActivityService::list_all(&db),
            };
            if activities.is_empty() {
                println!("Nothing scheduled.");
            }
            for activity in activities {
                println!(
                    "{}  {} - {}  {}",
                    activity.date, activity.start_time, activity.end_time, activity.name
                );
            }
        }
    }
}

async fn plan_from_text(
    db: &mut DB<Activity>,
    text: &str,
    openai_api_key: &str,
    tz: Tz,
) -> Result<(), Box<dyn std::error::Error>> {
    let openai = OpenAIService::new(openai_api_key.to_string());
    let today = Utc::now().with_timezone(&tz).date_naive();
    let parsed = ExtractionService::extract(&openai, text, today).await?;
    if parsed.is_empty() {
        println!("No activities found in that description.");
        return Ok(());
    }
    for item in parsed {
        let activity = ActivityService::create(db, item)?;
        println!(
            "Added {}  {} - {}  {}",
            activity.date, activity.start_time, activity.end_time, activity.name
        );
    }
    Ok(())
}

fn specify_prompt() -> Result<String, Box<dyn std::error::Error>> {
    Ok(Text::new("Describe your day.").prompt()?)
}
