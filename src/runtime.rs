use std::sync::Arc;

use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::info;

use crate::db::DB;
use crate::models::activity::Activity;
use crate::server::{self, AppState};
use crate::service::ack_service::{AckState, Theme};
use crate::service::openai_service::{OpenAIClient, OpenAIService};
use crate::tasks::reminder_loop::{LogNotifier, Notifier, run_reminder_loop};

pub async fn run_api(
    shared_db: Arc<Mutex<DB<Activity>>>,
    openai_api_key: String,
    port: u16,
    theme: Theme,
    tz: Tz,
) {
    let openai: Arc<dyn OpenAIClient> = Arc::new(OpenAIService::new(openai_api_key));
    let acks = Arc::new(Mutex::new(AckState::new()));
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    {
        let db = shared_db.clone();
        let acks = acks.clone();
        let openai = openai.clone();
        let notifier = notifier.clone();
        tokio::spawn(async move {
            run_reminder_loop(db, acks, openai, notifier, theme, tz).await;
        });
    }

    let state = AppState {
        db: shared_db,
        acks,
        openai,
        tz,
    };
    info!("day planner listening on port {}", port);
    warp::serve(server::routes(state)).run(([0, 0, 0, 0], port)).await;
}
