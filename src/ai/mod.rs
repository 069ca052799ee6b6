//! AI response generation for the chat assistant.
//!
//! The actual generator is an external collaborator reached over HTTP. When
//! it is unconfigured or unreachable the responder falls back to a
//! deterministic keyword table, so the chat flow never fails because of the
//! generator.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::models::{ChatMessage, ChatRole};

/// Support helpline surfaced in fallback and crisis replies.
pub const HELPLINE: &str = "+254 759 226 354";

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// How many prior turns are sent upstream as context.
const CONTEXT_TURNS: usize = 6;

const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "want to die",
    "harm myself",
];

/// Generates assistant replies, preferring the configured upstream service.
pub struct Responder {
    upstream: Option<Upstream>,
}

struct Upstream {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct UpstreamReply {
    #[serde(alias = "text")]
    response: String,
}

impl Responder {
    pub fn from_config(config: &Config) -> Self {
        let upstream = config.ai_url.as_ref().map(|url| Upstream {
            client: reqwest::Client::builder()
                .timeout(UPSTREAM_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url: url.clone(),
            api_key: config.ai_api_key.clone(),
        });

        if upstream.is_none() {
            tracing::warn!("No AI endpoint configured (WELLMIND_AI_URL); using fallback replies");
        }

        Self { upstream }
    }

    /// A responder with no upstream; always answers from the fallback table.
    pub fn fallback_only() -> Self {
        Self { upstream: None }
    }

    /// Produce a reply for `message` given the prior conversation.
    pub async fn respond(&self, history: &[ChatMessage], message: &str) -> String {
        let mut reply = match &self.upstream {
            Some(upstream) => match upstream.generate(history, message).await {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => fallback_reply(message),
                Err(e) => {
                    tracing::warn!("AI upstream failed, using fallback reply: {}", e);
                    fallback_reply(message)
                }
            },
            None => fallback_reply(message),
        };

        // Crisis messages always carry the helpline, whatever the generator said
        if is_crisis(message) && !reply.contains(HELPLINE) {
            reply.push_str(&format!(
                "\n\nEMERGENCY: if you are having thoughts of harming yourself, \
                 please call our emergency line immediately: {} or dial 999.",
                HELPLINE
            ));
        }

        reply
    }
}

impl Upstream {
    async fn generate(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, reqwest::Error> {
        let context: Vec<_> = history
            .iter()
            .rev()
            .take(CONTEXT_TURNS)
            .rev()
            .map(|m| {
                json!({
                    "role": match m.role {
                        ChatRole::User => "user",
                        ChatRole::Assistant => "assistant",
                    },
                    "message": m.content,
                })
            })
            .collect();

        let mut request = self.client.post(&self.url).json(&json!({
            "message": message,
            "chatHistory": context,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let reply: UpstreamReply = request.send().await?.error_for_status()?.json().await?;
        Ok(reply.response)
    }
}

fn is_crisis(message: &str) -> bool {
    let lower = message.to_lowercase();
    CRISIS_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Context-aware canned reply based on message content.
pub fn fallback_reply(message: &str) -> String {
    let lower = message.to_lowercase();

    if is_crisis(message) {
        format!(
            "EMERGENCY: please call our emergency line immediately at {} or dial 999. \
             You are not alone, and help is available right now.",
            HELPLINE
        )
    } else if contains_any(&lower, &["anxious", "anxiety", "panic", "worried", "nervous"]) {
        format!(
            "I understand you're feeling anxious. Try this breathing exercise: inhale for \
             4 seconds, hold for 4, exhale for 6, and repeat 5 times. For ongoing support, \
             contact our counselors at {}.",
            HELPLINE
        )
    } else if contains_any(&lower, &["depressed", "sad", "hopeless", "empty", "worthless"]) {
        format!(
            "I hear you're feeling down. These feelings are treatable, and you don't have \
             to go through this alone. Please reach out to our team at {} for professional \
             support.",
            HELPLINE
        )
    } else if contains_any(&lower, &["stress", "overwhelmed", "pressure", "burnout"]) {
        format!(
            "Stress can feel overwhelming. Try breaking tasks into smaller, manageable \
             steps. For personalized stress management techniques, call our team at {}.",
            HELPLINE
        )
    } else if contains_any(&lower, &["sleep", "insomnia", "tired", "exhausted"]) {
        format!(
            "Sleep issues can significantly affect wellbeing. Try a consistent bedtime \
             routine and avoiding screens before bed. For sleep counseling, contact {}.",
            HELPLINE
        )
    } else if contains_any(&lower, &["relationship", "partner", "breakup", "family", "friend"]) {
        format!(
            "Relationship challenges can be difficult, and healthy communication is key. \
             For relationship counseling, our team at {} can help.",
            HELPLINE
        )
    } else if contains_any(&lower, &["work", "job", "school", "exam", "study", "deadline"]) {
        format!(
            "Work and school pressure can be challenging. Try prioritizing tasks and \
             taking regular breaks. For career or academic counseling, call {}.",
            HELPLINE
        )
    } else {
        format!(
            "Thank you for reaching out. For personalized support, our counselors are \
             available at {}.",
            HELPLINE
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_only_responder_answers() {
        let responder = Responder::fallback_only();
        let reply = responder.respond(&[], "I have trouble sleeping").await;
        assert!(reply.contains("bedtime"));
    }

    #[tokio::test]
    async fn test_crisis_message_carries_helpline() {
        let responder = Responder::fallback_only();
        let reply = responder.respond(&[], "I want to end my life").await;
        assert!(reply.contains(HELPLINE));
        assert!(reply.contains("999"));
    }

    #[test]
    fn test_unknown_input_gets_generic_reply() {
        let reply = fallback_reply("what is the weather like");
        assert!(!reply.is_empty());
        assert!(reply.contains(HELPLINE));
    }

    #[test]
    fn test_keyword_routing() {
        assert!(fallback_reply("I feel anxious lately").contains("breathing"));
        assert!(fallback_reply("so much stress at the moment").contains("smaller"));
    }
}
