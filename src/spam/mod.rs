//! Explainable spam/scam scoring for inbound SMS and MMS text.
//!
//! Each signal contributes a fixed weight and a reason. Trusted institutional
//! senders short-circuit before any signal runs, so they can never be flagged.

pub mod brand;
pub mod content;
pub mod dating;
pub mod sender;
pub mod tables;
pub mod urls;

use crate::config::SpamConfig;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use urls::ExtractedUrl;

pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Signal weights, in evaluation order.
pub mod weights {
    pub const CONTACT_BONUS: f32 = -0.15;
    pub const SCAM_PHRASE: f32 = 0.60;
    pub const KEYWORD: f32 = 0.15;
    pub const MAX_COUNTED_KEYWORDS: usize = 4;
    pub const SUSPICIOUS_URL: f32 = 0.35;
    pub const SUSPICIOUS_SENDER: f32 = 0.25;
    pub const PROMOTIONAL_PREFIX: f32 = 0.30;
    pub const BUSINESS_SHORTCODE: f32 = 0.20;
    pub const URL_FROM_UNKNOWN: f32 = 0.15;
    pub const EXCESSIVE_CAPS: f32 = 0.15;
    pub const SPECIAL_CHARACTERS: f32 = 0.10;
    pub const LONG_NUMBER: f32 = 0.10;
    pub const SHORT_WITH_URL: f32 = 0.20;
    pub const TERMS_DISCLAIMER: f32 = 0.20;
    pub const HIDDEN_SENDER: f32 = 0.40;
    pub const UNREAD_OVER_72H: f32 = 0.55;
    pub const UNREAD_OVER_24H: f32 = 0.45;
    pub const UNREAD_OVER_6H: f32 = 0.30;
    pub const BRAND_IMPERSONATION: f32 = 0.50;
    pub const DATING_PHRASE: f32 = 0.50;
    pub const DATING_DOMAIN: f32 = 0.60;
    pub const GREETING_WITH_URL: f32 = 0.40;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamSignal {
    pub weight: f32,
    pub reason: String,
}

impl SpamSignal {
    pub fn new(weight: f32, reason: impl Into<String>) -> Self {
        Self {
            weight,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamCheckResult {
    pub is_spam: bool,
    pub confidence: f32,
    pub reasons: Vec<String>,
}

impl SpamCheckResult {
    fn from_signals(signals: &[SpamSignal], threshold: f32) -> Self {
        let total: f32 = signals.iter().map(|s| s.weight).sum();
        let confidence = total.clamp(0.0, 1.0);

        Self {
            is_spam: confidence >= threshold,
            confidence,
            reasons: signals.iter().map(|s| s.reason.clone()).collect(),
        }
    }

    fn trusted() -> Self {
        Self {
            is_spam: false,
            confidence: 0.0,
            reasons: vec!["Trusted sender".to_string()],
        }
    }

    fn blocked(threshold: f32) -> Self {
        Self {
            is_spam: 1.0 >= threshold,
            confidence: 1.0,
            reasons: vec!["Sender is on the block list".to_string()],
        }
    }
}

/// Inputs for one check. Defaults match the inbox pipeline: threshold 0.5,
/// already read, zero hours old.
#[derive(Debug, Clone)]
pub struct SpamQuery<'a> {
    pub body: &'a str,
    pub sender: &'a str,
    pub is_from_contact: bool,
    pub threshold: f32,
    pub is_read: bool,
    pub message_age_hours: u64,
}

impl<'a> SpamQuery<'a> {
    pub fn new(body: &'a str, sender: &'a str) -> Self {
        Self {
            body,
            sender,
            is_from_contact: false,
            threshold: DEFAULT_THRESHOLD,
            is_read: true,
            message_age_hours: 0,
        }
    }

    pub fn from_contact(mut self, is_from_contact: bool) -> Self {
        self.is_from_contact = is_from_contact;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    pub fn age_hours(mut self, hours: u64) -> Self {
        self.message_age_hours = hours;
        self
    }
}

/// Per-message view shared by all signals; lowercase forms and links are computed once.
#[derive(Debug, Clone)]
pub struct MessageContext<'a> {
    pub body: &'a str,
    pub body_lower: String,
    pub sender: &'a str,
    pub sender_lower: String,
    pub is_from_contact: bool,
    pub is_read: bool,
    pub message_age_hours: u64,
    pub urls: Vec<ExtractedUrl>,
}

impl<'a> MessageContext<'a> {
    pub fn new(query: &SpamQuery<'a>) -> Self {
        Self {
            body: query.body,
            body_lower: query.body.to_lowercase(),
            sender: query.sender.trim(),
            sender_lower: query.sender.trim().to_lowercase(),
            is_from_contact: query.is_from_contact,
            is_read: query.is_read,
            message_age_hours: query.message_age_hours,
            urls: urls::extract_urls(query.body),
        }
    }

    pub fn has_url(&self) -> bool {
        !self.urls.is_empty()
    }
}

/// One family of spam evidence. Signals append in the order they fire.
pub trait SignalExtractor: Send + Sync {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>);
    fn name(&self) -> &str;
}

pub struct SpamScorer {
    trusted: sender::TrustedSenders,
    blocked_senders: Vec<String>,
    extractors: Vec<Box<dyn SignalExtractor>>,
}

impl Default for SpamScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpamScorer {
    pub fn new() -> Self {
        Self::from_config(&SpamConfig::default())
    }

    pub fn from_config(config: &SpamConfig) -> Self {
        Self {
            trusted: sender::TrustedSenders::with_extra(&config.trusted_senders),
            blocked_senders: config
                .blocked_senders
                .iter()
                .map(|s| sender::normalize_sender(s))
                .filter(|s| !s.is_empty())
                .collect(),
            extractors: vec![
                Box::new(sender::ContactBonus),
                Box::new(content::ScamPhraseSignal),
                Box::new(content::KeywordSignal::with_extra(&config.extra_keywords)),
                Box::new(content::SuspiciousUrlSignal),
                Box::new(sender::SenderShapeSignal),
                Box::new(content::ContentHeuristics),
                Box::new(content::UnreadAgeSignal),
                Box::new(brand::BrandImpersonationSignal),
                Box::new(dating::DatingSpamSignal),
                Box::new(dating::GreetingWithUrlSignal),
            ],
        }
    }

    pub fn check_message(
        &self,
        body: &str,
        sender: &str,
        is_from_contact: bool,
        threshold: f32,
        is_read: bool,
        message_age_hours: u64,
    ) -> SpamCheckResult {
        self.check(
            &SpamQuery::new(body, sender)
                .from_contact(is_from_contact)
                .threshold(threshold)
                .read(is_read)
                .age_hours(message_age_hours),
        )
    }

    pub fn check(&self, query: &SpamQuery<'_>) -> SpamCheckResult {
        if self.trusted.is_trusted(query.sender) {
            log::debug!("Sender {} is trusted, skipping scoring", query.sender);
            return SpamCheckResult::trusted();
        }

        if self.is_blocked(query.sender) {
            log::debug!("Sender {} is blocked", query.sender);
            return SpamCheckResult::blocked(query.threshold);
        }

        let message = MessageContext::new(query);
        let signals = self.signals(&message);
        let result = SpamCheckResult::from_signals(&signals, query.threshold);

        log::debug!(
            "Spam check for {}: confidence {:.2} ({} signals), spam={}",
            query.sender,
            result.confidence,
            signals.len(),
            result.is_spam
        );

        result
    }

    /// All fired signals in evaluation order, without the whitelist/blocklist short-circuit.
    pub fn signals(&self, message: &MessageContext<'_>) -> Vec<SpamSignal> {
        let mut signals = Vec::new();
        for extractor in &self.extractors {
            let before = signals.len();
            extractor.extract(message, &mut signals);
            if signals.len() > before {
                log::trace!("{} fired {} signal(s)", extractor.name(), signals.len() - before);
            }
        }
        signals
    }

    pub fn is_trusted(&self, sender: &str) -> bool {
        self.trusted.is_trusted(sender)
    }

    pub fn is_blocked(&self, sender: &str) -> bool {
        let normalized = sender::normalize_sender(sender);
        !normalized.is_empty() && self.blocked_senders.iter().any(|b| *b == normalized)
    }
}

lazy_static! {
    static ref DEFAULT_SCORER: SpamScorer = SpamScorer::new();
}

/// Score a message with the built-in tables and no user configuration.
pub fn check_message(
    body: &str,
    sender: &str,
    is_from_contact: bool,
    threshold: f32,
    is_read: bool,
    message_age_hours: u64,
) -> SpamCheckResult {
    DEFAULT_SCORER.check_message(
        body,
        sender,
        is_from_contact,
        threshold,
        is_read,
        message_age_hours,
    )
}
