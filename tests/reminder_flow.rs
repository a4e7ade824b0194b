use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::Mutex as TokioMutex;

use dayPlanner::models::activity::{Activity, ActivityKind};
use dayPlanner::service::ack_service::{AckState, MatchResult, Theme};
use dayPlanner::service::openai_service::OpenAIClient;
use dayPlanner::tasks::reminder_loop::{Notifier, reminder_tick};

struct FakeOpenAI {
    response: Result<String, String>,
    calls: TokioMutex<Vec<String>>,
}

impl FakeOpenAI {
    fn new(response: Result<String, String>) -> Self {
        Self {
            response,
            calls: TokioMutex::new(Vec::new()),
        }
    }

    async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait::async_trait]
impl OpenAIClient for FakeOpenAI {
    async fn generate_prompt(
        &self,
        prompt: &str,
        prompt_type: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let mut calls = self.calls.lock().await;
        calls.push(format!("{}:{}", prompt_type, prompt));
        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err(err) => Err(err.clone().into()),
        }
    }
}

struct MockNotifier {
    sent: TokioMutex<Vec<(String, String)>>,
    fail: bool,
}

impl MockNotifier {
    fn new() -> Self {
        Self {
            sent: TokioMutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            sent: TokioMutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, activity: &str, phrase: &str) -> Result<(), String> {
        let mut sent = self.sent.lock().await;
        sent.push((activity.to_string(), phrase.to_string()));
        if self.fail {
            return Err("delivery failed".to_string());
        }
        Ok(())
    }
}

fn activity(name: &str, start_time: &str) -> Activity {
    Activity {
        id: format!("id-{}", name),
        name: name.to_string(),
        start_time: start_time.to_string(),
        end_time: "23:00".to_string(),
        description: String::new(),
        kind: ActivityKind::Default,
        date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
    }
}

fn clock(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, 10)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[tokio::test]
async fn tick_fires_once_for_matching_start_time() {
    let activities = vec![activity("Standup", "09:00")];
    let acks = TokioMutex::new(AckState::new());
    let openai = FakeOpenAI::new(Ok("I am ready for standup.".to_string()));
    let notifier = MockNotifier::new();

    reminder_tick(
        &activities,
        &acks,
        &openai,
        &notifier,
        Theme::Disciplined,
        clock(9, 0),
    )
    .await;

    assert_eq!(openai.call_count().await, 1);
    {
        let acks = acks.lock().await;
        assert_eq!(acks.pending_len(), 1);
        assert_eq!(
            acks.pending_phrase("Standup"),
            Some("I am ready for standup.")
        );
    }

    // The next minute has no matching start time: no new call, no new entry.
    reminder_tick(
        &activities,
        &acks,
        &openai,
        &notifier,
        Theme::Disciplined,
        clock(9, 1),
    )
    .await;
    assert_eq!(openai.call_count().await, 1);
    assert_eq!(acks.lock().await.pending_len(), 1);
}

#[tokio::test]
async fn tick_ignores_activities_on_other_dates() {
    let mut other_day = activity("Standup", "09:00");
    other_day.date = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();
    let acks = TokioMutex::new(AckState::new());
    let openai = FakeOpenAI::new(Ok("phrase".to_string()));
    let notifier = MockNotifier::new();

    reminder_tick(
        &[other_day],
        &acks,
        &openai,
        &notifier,
        Theme::Disciplined,
        clock(9, 0),
    )
    .await;

    assert_eq!(openai.call_count().await, 0);
    assert_eq!(acks.lock().await.pending_len(), 0);
}

#[tokio::test]
async fn failed_phrase_generation_uses_the_theme_fallback_verbatim() {
    let activities = vec![activity("Standup", "09:00")];
    let acks = TokioMutex::new(AckState::new());
    let openai = FakeOpenAI::new(Err("timed out".to_string()));
    let notifier = MockNotifier::new();

    reminder_tick(
        &activities,
        &acks,
        &openai,
        &notifier,
        Theme::Motivational,
        clock(9, 0),
    )
    .await;

    let expected = Theme::Motivational.fallback_phrase("Standup");
    assert_eq!(
        acks.lock().await.pending_phrase("Standup"),
        Some(expected.as_str())
    );
}

#[tokio::test]
async fn notification_carries_the_stored_phrase() {
    let activities = vec![activity("Standup", "09:00")];
    let acks = TokioMutex::new(AckState::new());
    let openai = FakeOpenAI::new(Ok("\"Standup begins now.\"".to_string()));
    let notifier = MockNotifier::new();

    reminder_tick(
        &activities,
        &acks,
        &openai,
        &notifier,
        Theme::Disciplined,
        clock(9, 0),
    )
    .await;

    let sent = notifier.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "Standup");
    let acks = acks.lock().await;
    assert_eq!(acks.pending_phrase("Standup"), Some(sent[0].1.as_str()));
}

#[tokio::test]
async fn one_failing_delivery_does_not_block_the_rest_of_the_tick() {
    let activities = vec![activity("Standup", "09:00"), activity("Gym", "09:00")];
    let acks = TokioMutex::new(AckState::new());
    let openai = FakeOpenAI::new(Ok("phrase".to_string()));
    let notifier = MockNotifier::failing();

    reminder_tick(
        &activities,
        &acks,
        &openai,
        &notifier,
        Theme::Disciplined,
        clock(9, 0),
    )
    .await;

    assert_eq!(openai.call_count().await, 2);
    let acks = acks.lock().await;
    assert_eq!(acks.pending_len(), 2);
    assert!(acks.pending_phrase("Standup").is_some());
    assert!(acks.pending_phrase("Gym").is_some());
}

#[tokio::test]
async fn acknowledging_a_reminder_clears_only_that_entry() {
    let activities = vec![activity("Standup", "09:00"), activity("Gym", "09:05")];
    let acks = TokioMutex::new(AckState::new());
    let openai = FakeOpenAI::new(Err("unreachable".to_string()));
    let notifier = MockNotifier::new();

    reminder_tick(
        &activities,
        &acks,
        &openai,
        &notifier,
        Theme::Disciplined,
        clock(9, 0),
    )
    .await;
    reminder_tick(
        &activities,
        &acks,
        &openai,
        &notifier,
        Theme::Disciplined,
        clock(9, 5),
    )
    .await;

    let mut acks = acks.lock().await;
    assert_eq!(acks.pending_len(), 2);

    let reply = Theme::Disciplined.fallback_phrase("Standup").to_uppercase();
    assert_eq!(
        acks.acknowledge(&reply),
        MatchResult::Matched {
            activity: "Standup".to_string()
        }
    );
    assert_eq!(acks.pending_len(), 1);
    assert!(acks.pending_phrase("Gym").is_some());

    assert_eq!(acks.acknowledge("not the phrase"), MatchResult::NoMatch);
    assert_eq!(acks.pending_len(), 1);
}
