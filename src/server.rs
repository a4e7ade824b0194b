use std::convert::Infallible;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::error;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::db::DB;
use crate::models::activity::Activity;
use crate::service::ack_service::{AckState, MatchResult};
use crate::service::activity_service::ActivityService;
use crate::service::extraction_service::ExtractionService;
use crate::service::openai_service::OpenAIClient;

const BODY_LIMIT: u64 = 16 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<DB<Activity>>>,
    pub acks: Arc<Mutex<AckState>>,
    pub openai: Arc<dyn OpenAIClient>,
    pub tz: Tz,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let extract = warp::path!("api" / "openai")
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_extract);

    let acknowledge = warp::path!("api" / "ackl")
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handle_acknowledge);

    let list_all = warp::path!("api" / "activities")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_list_all);

    let list_by_date = warp::path!("api" / "activities" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_list_by_date);

    let delete = warp::path!("api" / "activities" / String)
        .and(warp::delete())
        .and(with_state(state))
        .and_then(handle_delete);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "DELETE"]);

    extract
        .or(acknowledge)
        .or(list_all)
        .or(list_by_date)
        .or(delete)
        .with(cors)
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_reply(
    status: StatusCode,
    value: &serde_json::Value,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(value), status)
}

/// POST /api/openai: extract activities from the user's plan text and
/// persist them.
pub async fn handle_extract(
    body: MessageBody,
    state: AppState,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    let today = Utc::now().with_timezone(&state.tz).date_naive();
    let parsed =
        match ExtractionService::extract(state.openai.as_ref(), &body.message, today).await {
            Ok(parsed) => parsed,
            Err(err) => {
                error!("extraction failed: {}", err);
                return Ok(json_reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &json!({ "error": "Failed to process request", "details": err.to_string() }),
                ));
            }
        };

    let mut db = state.db.lock().await;
    let mut activities = Vec::with_capacity(parsed.len());
    for item in parsed {
        match ActivityService::create(&mut db, item) {
            Ok(activity) => activities.push(activity),
            Err(err) => {
                error!("failed to persist activity: {}", err);
                return Ok(json_reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &json!({ "error": "Failed to save activities", "details": err.to_string() }),
                ));
            }
        }
    }
    Ok(json_reply(StatusCode::OK, &json!({ "activities": activities })))
}

/// POST /api/ackl: check a typed or transcribed reply against the pending
/// acknowledgment phrases. A miss is a normal outcome, not an error.
pub async fn handle_acknowledge(
    body: MessageBody,
    state: AppState,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    let result = state.acks.lock().await.acknowledge(&body.message);
    let response = match result {
        MatchResult::Matched { activity } => {
            format!("Acknowledgment accepted. \"{}\" is underway.", activity)
        }
        MatchResult::NoMatch => "That did not match any phrase I'm waiting for.".to_string(),
    };
    Ok(json_reply(StatusCode::OK, &json!({ "response": response })))
}

pub async fn handle_list_all(
    state: AppState,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    let db = state.db.lock().await;
    let activities = ActivityService::list_all(&db);
    Ok(json_reply(StatusCode::OK, &json!({ "activities": activities })))
}

pub async fn handle_list_by_date(
    date: String,
    state: AppState,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    let date = match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(err) => {
            return Ok(json_reply(
                StatusCode::BAD_REQUEST,
                &json!({ "error": "Invalid date, expected YYYY-MM-DD", "details": err.to_string() }),
            ));
        }
    };
    let db = state.db.lock().await;
    let activities = ActivityService::list_by_date(&db, date);
    Ok(json_reply(StatusCode::OK, &json!({ "activities": activities })))
}

pub async fn handle_delete(
    id: String,
    state: AppState,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    let mut db = state.db.lock().await;
    match ActivityService::delete(&mut db, &id) {
        Ok(true) => Ok(json_reply(StatusCode::OK, &json!({ "success": true }))),
        Ok(false) => Ok(json_reply(
            StatusCode::NOT_FOUND,
            &json!({ "error": "Activity not found" }),
        )),
        Err(err) => {
            error!("failed to delete activity {}: {}", id, err);
            Ok(json_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": "Failed to delete activity", "details": err.to_string() }),
            ))
        }
    }
}
