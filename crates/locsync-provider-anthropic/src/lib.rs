//! [`Translator`] backed by the Anthropic Messages API.
//!
//! Requests are blocking; the sync pass issues them one at a time.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use locsync_config::SyncConfig;
use locsync_core::FlatEntry;
use locsync_provider_api::{ProviderError, Reply, Translator};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2023-06-01";
const BATCH_MAX_TOKENS: u32 = 4000;
const SINGLE_MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.2;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

static REPLY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^(.+?):\s*"(.+)"$"#).unwrap());

pub struct AnthropicTranslator {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    endpoint: String,
    source_lang: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// One block of the response. Only `text` blocks carry a translation.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    ToolUse,
    Thinking,
    #[serde(other)]
    Other,
}

impl From<ContentBlock> for Reply {
    fn from(block: ContentBlock) -> Self {
        let kind = match block {
            ContentBlock::Text { text } => return Reply::Text(text),
            ContentBlock::ToolUse => "tool_use",
            ContentBlock::Thinking => "thinking",
            ContentBlock::Other => "unknown",
        };
        Reply::Other { kind: kind.into() }
    }
}

impl AnthropicTranslator {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: &str,
        source_lang: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("locsync/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: format!("{}/v1/messages", base_url.trim_end_matches('/')),
            source_lang: source_lang.into(),
        })
    }

    pub fn from_config(cfg: &SyncConfig) -> Result<Self, ProviderError> {
        Self::new(
            cfg.api_key.clone(),
            cfg.model.clone(),
            &cfg.base_url,
            cfg.source_lang.clone(),
        )
    }

    /// Send one prompt and return the first content block of the answer.
    fn send(&self, prompt: &str, max_tokens: u32) -> Result<Reply, ProviderError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens,
            temperature: TEMPERATURE,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };
        tracing::debug!(
            event = "provider_request",
            model = %self.model,
            max_tokens,
            prompt = %prompt
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = resp
            .json()
            .map_err(|e| ProviderError::Format(e.to_string()))?;
        parsed
            .content
            .into_iter()
            .next()
            .map(Reply::from)
            .ok_or_else(|| ProviderError::Format("response has no content blocks".into()))
    }
}

impl Translator for AnthropicTranslator {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn translate_batch(
        &self,
        batch: &[FlatEntry],
        target_lang: &str,
    ) -> Result<BTreeMap<String, String>, ProviderError> {
        let prompt = batch_prompt(&self.source_lang, target_lang, batch);
        match self.send(&prompt, BATCH_MAX_TOKENS)? {
            Reply::Text(text) => Ok(parse_batch_reply(&text, batch)),
            Reply::Other { kind } => Err(ProviderError::Format(format!(
                "expected a text block, got `{kind}`"
            ))),
        }
    }

    fn translate_one(&self, text: &str, target_lang: &str) -> Result<Reply, ProviderError> {
        let prompt = single_prompt(&self.source_lang, target_lang, text);
        self.send(&prompt, SINGLE_MAX_TOKENS)
    }
}

fn batch_prompt(source_lang: &str, target_lang: &str, batch: &[FlatEntry]) -> String {
    let lines: Vec<String> = batch
        .iter()
        .map(|e| format!("{}: \"{}\"", e.key, e.value))
        .collect();
    format!(
        "Translate the following {source_lang} texts into {target_lang}. \
         Translate directly without explanations or alternatives, choosing the most fitting wording:\n\n\
         {}\n\n\
         Answer in the same format, one `key: \"translation\"` per line.",
        lines.join("\n")
    )
}

fn single_prompt(source_lang: &str, target_lang: &str, text: &str) -> String {
    format!(
        "Translate the following {source_lang} text into {target_lang}. \
         Translate directly without explanations or alternatives, choosing the most fitting wording:\n\n\
         \"{text}\""
    )
}

/// Pick `key: "translation"` lines out of a reply, keeping only keys that
/// were part of the request.
fn parse_batch_reply(text: &str, batch: &[FlatEntry]) -> BTreeMap<String, String> {
    let requested: HashSet<&str> = batch.iter().map(|e| e.key.as_str()).collect();
    let mut out = BTreeMap::new();
    for line in text.trim().lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = REPLY_LINE.captures(line) else {
            continue;
        };
        let key = caps[1].trim();
        if requested.contains(key) {
            out.insert(key.to_string(), caps[2].trim().to_string());
        }
    }
    out
}
