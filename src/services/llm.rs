use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::kernel::event::ConversationContext;
use crate::kernel::mode::Mode;

/// Client for the external language-model provider that supplies the words
/// for conversational turns. The core supplies context only.
#[derive(Clone)]
pub struct ConversationClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct TurnRequest {
    prompt: String,
    stream: bool,
    n_predict: usize,
    temperature: f32,
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct TurnResponse {
    content: String,
}

impl ConversationClient {
    /// `budget` is enforced at the network level: a turn that would overrun
    /// it is abandoned.
    pub fn new(base_url: &str, budget: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(budget)
                .build()
                .unwrap_or_default(),
            base_url: base_url.to_string(),
        }
    }

    pub async fn generate_turn(&self, context: &ConversationContext) -> Result<String> {
        let register = match context.mode {
            Mode::Calm => "even and unhurried",
            Mode::Focused => "brisk and to the point",
            Mode::Stressed => "steady, brief, reassuring",
            Mode::Urgent => "fast and direct",
        };
        let goal_line = match &context.active_goal {
            Some(goal) => format!("The caller is trying to: {}.", goal),
            None => "No standing goal yet.".to_string(),
        };

        let system_prompt = format!(
            "You are speaking on a phone call on the user's behalf. \
             Keep replies short enough to say aloud. Your register: {}.",
            register
        );
        let user_prompt = format!(
            "{} Open goals: {}. The other party just said: \"{}\". Reply.",
            goal_line, context.open_goals, context.utterance
        );
        let full_prompt = format!("System: {}\nUser: {}\nAssistant:", system_prompt, user_prompt);

        let request_body = TurnRequest {
            prompt: full_prompt,
            stream: false,
            n_predict: 64,
            temperature: 0.4,
            stop: vec!["User:".to_string(), "System:".to_string()],
        };

        let response = self
            .client
            .post(format!("{}/completion", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("llm provider error: {}", response.status()));
        }

        let resp_json: TurnResponse = response.json().await?;
        Ok(resp_json.content.trim().to_string())
    }
}
