use chrono::NaiveDate;
use thiserror::Error;

use crate::models::activity::{ActivityKind, ParsedActivity, parse_clock_time};
use crate::service::openai_service::OpenAIClient;

/// The upstream model call failed or timed out. An unusable reply is not
/// an error: it degrades to fewer (or zero) extracted activities.
#[derive(Debug, Error)]
#[error("activity extraction failed: {details}")]
pub struct ExtractionFailed {
    pub details: String,
}

pub struct ExtractionService;

impl ExtractionService {
    /// Sends the user's free-text plan to the model and parses the reply
    /// into activity records. Never touches storage; the caller persists.
    pub async fn extract<C: OpenAIClient + ?Sized>(
        openai: &C,
        free_text: &str,
        today: NaiveDate,
    ) -> Result<Vec<ParsedActivity>, ExtractionFailed> {
        let reply = openai
            .generate_prompt(free_text, "extraction")
            .await
            .map_err(|e| ExtractionFailed {
                details: e.to_string(),
            })?;
        Ok(parse_activities(&reply, today))
    }
}

/// Parses a model reply into activity records, one per line of the form
/// `(name, startTime, endTime, description)`.
///
/// Lines that do not start with `(`, do not split into exactly four
/// comma-separated fields, have an empty name, or carry an unparseable
/// clock time are dropped silently. Malformed model output degrades to
/// fewer activities, never to an error.
pub fn parse_activities(reply: &str, date: NaiveDate) -> Vec<ParsedActivity> {
    let mut activities = Vec::new();
    for line in reply.lines() {
        let trimmed = line.trim();
        if !trimmed.starts_with('(') {
            continue;
        }
        let inner = trimmed.strip_prefix('(').unwrap_or(trimmed);
        let inner = inner.strip_suffix(')').unwrap_or(inner);
        let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            continue;
        }
        let name = fields[0];
        if name.is_empty() {
            continue;
        }
        let (Some(start), Some(end)) = (parse_clock_time(fields[1]), parse_clock_time(fields[2]))
        else {
            continue;
        };
        activities.push(ParsedActivity {
            name: name.to_string(),
            start_time: start.format("%H:%M").to_string(),
            end_time: end.format("%H:%M").to_string(),
            description: fields[3].to_string(),
            kind: ActivityKind::Default,
            date,
        });
    }
    activities
}
