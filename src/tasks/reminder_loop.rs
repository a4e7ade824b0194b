use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tokio::time::{interval, sleep};
use tracing::{error, info};

use crate::db::DB;
use crate::models::activity::Activity;
use crate::service::ack_service::{AckState, AcknowledgmentService, Theme};
use crate::service::openai_service::OpenAIClient;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, activity: &str, phrase: &str) -> Result<(), String>;
}

/// Production notifier: surfaces the reminder on the process log. The
/// phrase stays answerable through the acknowledgment endpoint either way.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, activity: &str, phrase: &str) -> Result<(), String> {
        info!("reminder: \"{}\" is starting. Say \"{}\" to acknowledge it.", activity, phrase);
        Ok(())
    }
}

/// Runs the reminder check once per whole minute for the lifetime of the
/// process. The first tick is aligned to the next minute boundary; after
/// that the cadence is a fixed 60 seconds. A tick skipped while the
/// process was suspended is not made up.
pub async fn run_reminder_loop(
    db: Arc<Mutex<DB<Activity>>>,
    acks: Arc<Mutex<AckState>>,
    openai: Arc<dyn OpenAIClient>,
    notifier: Arc<dyn Notifier>,
    theme: Theme,
    tz: Tz,
) {
    let now = Utc::now().with_timezone(&tz);
    let millis_into_minute =
        u64::from(now.second()) * 1000 + u64::from(now.timestamp_subsec_millis());
    sleep(Duration::from_millis(60_000 - millis_into_minute.min(59_999))).await;

    let mut ticker = interval(Duration::from_secs(60));
    loop {
        ticker.tick().await;
        let now = Utc::now().with_timezone(&tz).naive_local();
        let activities: Vec<Activity> = {
            let db = db.lock().await;
            db.values().cloned().collect()
        };
        reminder_tick(
            &activities,
            &acks,
            openai.as_ref(),
            notifier.as_ref(),
            theme,
            now,
        )
        .await;
    }
}

/// One reminder check: every activity scheduled for today whose start time
/// equals the current minute gets a themed phrase stored as pending and a
/// notification carrying that exact phrase. Failures are contained per
/// activity so one bad reminder never blocks the rest of the tick.
pub async fn reminder_tick<C: OpenAIClient + ?Sized, N: Notifier + ?Sized>(
    activities: &[Activity],
    acks: &Mutex<AckState>,
    openai: &C,
    notifier: &N,
    theme: Theme,
    now: NaiveDateTime,
) {
    let today = now.date();
    let minute = now.format("%H:%M").to_string();
    for activity in activities {
        if activity.date != today || activity.start_time != minute {
            continue;
        }
        let phrase = AcknowledgmentService::request_phrase(openai, &activity.name, theme).await;
        {
            let mut acks = acks.lock().await;
            acks.expect_phrase(&activity.name, &phrase);
        }
        if let Err(err) = notifier.notify(&activity.name, &phrase).await {
            error!("failed to deliver reminder for '{}': {}", activity.name, err);
        }
    }
}
