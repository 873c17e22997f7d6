//! Realtime session minting
//!
//! Forwards a session-creation request to the realtime speech API and hands
//! the upstream JSON (which carries the ephemeral client secret) back
//! untouched.

use chrono::DateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::config::RealtimeConfig;
use crate::upstream::read_json;

pub const DEFAULT_VOICE: &str = "echo";

/// Voices offered by the realtime API at the time of writing
pub const KNOWN_VOICES: [&str; 8] = [
    "alloy", "ash", "ballad", "coral", "echo", "sage", "shimmer", "verse",
];

/// System instructions sent with every session. Answers are spoken, so any
/// markdown would be read out literally.
pub const SESSION_INSTRUCTIONS: &str = "\
You are a friendly voice assistant. Your replies are converted to speech.
Never use markdown: no headings, bullet points, asterisks, tables or code blocks.
Answer in plain conversational sentences and keep answers short.
Use the get_weather and search_web tools when the user asks for current information.";

/// Query parameters of `GET /session`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    #[serde(default = "default_voice")]
    pub voice: String,
}

impl Default for SessionRequest {
    fn default() -> Self {
        Self {
            voice: default_voice(),
        }
    }
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

/// Body posted to the realtime session endpoint
#[derive(Debug, Serialize)]
pub struct SessionCreateBody<'a> {
    pub model: &'a str,
    pub voice: &'a str,
    pub instructions: &'a str,
}

pub fn is_known_voice(voice: &str) -> bool {
    KNOWN_VOICES.contains(&voice)
}

/// Client for the realtime session endpoint
pub struct RealtimeSessionClient {
    client: Client,
    api_key: String,
    session_url: String,
    model: String,
}

impl RealtimeSessionClient {
    pub fn new(client: Client, config: &RealtimeConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            session_url: config.session_url.clone(),
            model: config.model.clone(),
        }
    }

    /// Create a realtime session and return the provider's JSON verbatim
    #[instrument(skip(self, request), fields(voice = %request.voice))]
    pub async fn create_session(&self, request: &SessionRequest) -> Result<Value> {
        if !is_known_voice(&request.voice) {
            warn!(
                "Voice '{}' is not a known realtime voice, forwarding anyway",
                request.voice
            );
        }

        let body = SessionCreateBody {
            model: &self.model,
            voice: &request.voice,
            instructions: SESSION_INSTRUCTIONS,
        };
        debug!("Realtime session request URL: {}", self.session_url);

        let response = self
            .client
            .post(&self.session_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let session: Value = read_json(response, "Realtime session").await?;

        match secret_expiry(&session) {
            Some(expires_at) => info!(
                "Created realtime session for model {} (client secret expires {})",
                self.model,
                expires_at.to_rfc3339()
            ),
            None => info!("Created realtime session for model {}", self.model),
        }

        Ok(session)
    }
}

/// Expiry of the ephemeral client secret, when the provider reports one
fn secret_expiry(session: &Value) -> Option<DateTime<chrono::Utc>> {
    let seconds = session
        .get("client_secret")?
        .get("expires_at")?
        .as_i64()?;
    DateTime::from_timestamp(seconds, 0)
}
