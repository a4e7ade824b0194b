use serde::{Deserialize, Serialize};
use std::time::Duration;

use reqwest;

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

// A slow upstream must not stall the reminder loop: phrase generation is
// capped at 10 seconds, extraction at a more generous 30.
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);
const ACKNOWLEDGMENT_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn generate_openai_prompt(
    prompt: &str,
    prompt_type: &str,
    api_key: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let user_message = match prompt_type {
        "extraction" => prompt.to_string(),
        "ack_depressing" | "ack_motivational" | "ack_disciplined" => {
            format!("Activity starting now: {prompt}")
        }
        _ => return Err("Not a valid base prompt".to_string().into()),
    };

    query_openai(user_message, prompt_type, api_key).await
}

async fn query_openai(
    prompt: String,
    prompt_type: &str,
    api_key: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let system_message = match prompt_type {
        "extraction" => {
            "You are a day-planning extraction engine.\n\
             Task: read the user's description of their day and list every planned activity.\n\
             Output exactly one line per activity, each line exactly of the form:\n\
             (name, startTime, endTime, description)\n\
             Rules:\n\
             - Times are 24-hour HH:MM.\n\
             - The four fields are separated by commas and wrapped in one pair of parentheses.\n\
             - If the user gives a relative phrase like \"in the evening\", add 12 hours to an ambiguous clock time; for imprecise phrases make a best-effort estimate.\n\
             - An activity that runs past midnight keeps its real end time, even though it is numerically earlier than the start.\n\
             - Reply with ONLY the parenthesized lines: no prose, no markdown, no numbering."
        }
        "ack_depressing" => {
            "You are a weary but persistent accountability companion. \
             Reply with exactly one short, melancholic-but-determined sentence the user must repeat out loud to confirm they are starting the activity they are told about. \
             Mention the activity by name. Plain text only, no quotes."
        }
        "ack_motivational" => {
            "You are a high-energy accountability coach. \
             Reply with exactly one short, energetic sentence the user must repeat out loud to confirm they are starting the activity they are told about. \
             Mention the activity by name. Plain text only, no quotes."
        }
        "ack_disciplined" => {
            "You are a focused, professional accountability partner. \
             Reply with exactly one short, composed sentence the user must repeat out loud to confirm they are starting the activity they are told about. \
             Mention the activity by name. Plain text only, no quotes."
        }
        _ => "You are a helpful assistant.",
    };

    let (timeout, max_tokens) = match prompt_type {
        "extraction" => (EXTRACTION_TIMEOUT, 150),
        _ => (ACKNOWLEDGMENT_TIMEOUT, 60),
    };

    let request: OpenAIRequest = OpenAIRequest {
        model: "gpt-3.5-turbo".to_string(),
        messages: vec![
            OpenAIMessage {
                role: "system".to_string(),
                content: system_message.to_string(),
            },
            OpenAIMessage {
                role: "user".to_string(),
                content: prompt,
            },
        ],
        max_tokens,
        temperature: 0.7,
    };

    let client = reqwest::Client::new();
    let response = client
        .post("https://api.openai.com/v1/chat/completions")
        .timeout(timeout)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?; // read the body once

    if !status.is_success() {
        return Err(format!("Request failed with status {}: {}", status, text).into());
    }

    let parsed: OpenAIResponse = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse JSON: {}\nRaw body: {}", e, text))?;

    if let Some(choice) = parsed.choices.first() {
        Ok(choice.message.content.clone())
    } else {
        Err("No response from OpenAI".to_string().into())
    }
}
