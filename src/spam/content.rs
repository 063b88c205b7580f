use super::tables::{
    HIDDEN_SENDER_MARKERS, HIGH_CONFIDENCE_PHRASES, LONG_NUMBER, SPAM_KEYWORDS,
    SUSPICIOUS_URL_PATTERNS, TERMS_PHRASES,
};
use super::{weights, MessageContext, SignalExtractor, SpamSignal};

const CAPS_MIN_LENGTH: usize = 20;
const CAPS_RATIO_LIMIT: f32 = 0.5;
const SPECIAL_CHAR_RATIO_LIMIT: f32 = 0.15;
const SHORT_MESSAGE_LENGTH: usize = 15;

pub struct ScamPhraseSignal;

impl SignalExtractor for ScamPhraseSignal {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        if let Some(phrase) = HIGH_CONFIDENCE_PHRASES
            .iter()
            .find(|p| message.body_lower.contains(*p))
        {
            signals.push(SpamSignal::new(
                weights::SCAM_PHRASE,
                format!("Scam phrase: '{}'", phrase),
            ));
        }
    }

    fn name(&self) -> &str {
        "scam_phrase"
    }
}

/// Counts distinct keyword hits; only the first four contribute.
pub struct KeywordSignal {
    extra_keywords: Vec<String>,
}

impl Default for KeywordSignal {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}

impl KeywordSignal {
    pub fn with_extra(extra: &[String]) -> Self {
        Self {
            extra_keywords: extra
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty() && !SPAM_KEYWORDS.contains(&k.as_str()))
                .collect(),
        }
    }

    pub fn count_matches(&self, body_lower: &str) -> usize {
        let builtin = SPAM_KEYWORDS
            .iter()
            .filter(|k| body_lower.contains(*k))
            .count();
        let extra = self
            .extra_keywords
            .iter()
            .filter(|k| body_lower.contains(k.as_str()))
            .count();
        builtin + extra
    }
}

impl SignalExtractor for KeywordSignal {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        let matches = self.count_matches(&message.body_lower);
        if matches > 0 {
            let counted = matches.min(weights::MAX_COUNTED_KEYWORDS);
            signals.push(SpamSignal::new(
                weights::KEYWORD * counted as f32,
                format!("Spam keywords matched: {}", matches),
            ));
        }
    }

    fn name(&self) -> &str {
        "spam_keywords"
    }
}

pub struct SuspiciousUrlSignal;

impl SignalExtractor for SuspiciousUrlSignal {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        if SUSPICIOUS_URL_PATTERNS
            .iter()
            .any(|p| p.is_match(message.body))
        {
            signals.push(SpamSignal::new(
                weights::SUSPICIOUS_URL,
                "Suspicious link pattern",
            ));
        }
    }

    fn name(&self) -> &str {
        "suspicious_url"
    }
}

/// Body-level heuristics: links, shouting, symbol noise, embedded numbers,
/// disclaimers and hidden sender ids.
pub struct ContentHeuristics;

impl ContentHeuristics {
    fn char_ratio(body: &str, predicate: impl Fn(char) -> bool) -> f32 {
        let total = body.chars().count();
        if total == 0 {
            return 0.0;
        }
        body.chars().filter(|c| predicate(*c)).count() as f32 / total as f32
    }
}

impl SignalExtractor for ContentHeuristics {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        let length = message.body.chars().count();
        let unknown = !message.is_from_contact;

        if message.has_url() && unknown {
            signals.push(SpamSignal::new(
                weights::URL_FROM_UNKNOWN,
                "Link from unknown sender",
            ));
        }

        if length > CAPS_MIN_LENGTH
            && Self::char_ratio(message.body, char::is_uppercase) > CAPS_RATIO_LIMIT
        {
            signals.push(SpamSignal::new(
                weights::EXCESSIVE_CAPS,
                "Excessive capital letters",
            ));
        }

        if Self::char_ratio(message.body, |c| !c.is_alphanumeric() && !c.is_whitespace())
            > SPECIAL_CHAR_RATIO_LIMIT
        {
            signals.push(SpamSignal::new(
                weights::SPECIAL_CHARACTERS,
                "Excessive special characters",
            ));
        }

        if unknown && LONG_NUMBER.is_match(message.body) {
            signals.push(SpamSignal::new(
                weights::LONG_NUMBER,
                "Long number from unknown sender",
            ));
        }

        if length < SHORT_MESSAGE_LENGTH && message.has_url() {
            signals.push(SpamSignal::new(
                weights::SHORT_WITH_URL,
                "Very short message with link",
            ));
        }

        if TERMS_PHRASES
            .iter()
            .any(|p| message.body_lower.contains(*p))
        {
            signals.push(SpamSignal::new(
                weights::TERMS_DISCLAIMER,
                "Terms and conditions disclaimer",
            ));
        }

        if HIDDEN_SENDER_MARKERS
            .iter()
            .any(|m| message.sender_lower.contains(*m))
        {
            signals.push(SpamSignal::new(
                weights::HIDDEN_SENDER,
                "Hidden or withheld sender",
            ));
        }
    }

    fn name(&self) -> &str {
        "content_heuristics"
    }
}

/// Unread messages from strangers that sit for hours are usually ignored spam.
pub struct UnreadAgeSignal;

impl SignalExtractor for UnreadAgeSignal {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        if message.is_read || message.is_from_contact {
            return;
        }

        let tier = match message.message_age_hours {
            h if h > 72 => Some((weights::UNREAD_OVER_72H, 72)),
            h if h > 24 => Some((weights::UNREAD_OVER_24H, 24)),
            h if h > 6 => Some((weights::UNREAD_OVER_6H, 6)),
            _ => None,
        };

        if let Some((weight, hours)) = tier {
            signals.push(SpamSignal::new(
                weight,
                format!("Unread for over {} hours", hours),
            ));
        }
    }

    fn name(&self) -> &str {
        "unread_age"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spam::SpamQuery;

    fn run(extractor: &dyn SignalExtractor, query: SpamQuery<'_>) -> Vec<SpamSignal> {
        let message = MessageContext::new(&query);
        let mut signals = Vec::new();
        extractor.extract(&message, &mut signals);
        signals
    }

    fn reasons(extractor: &dyn SignalExtractor, query: SpamQuery<'_>) -> Vec<String> {
        run(extractor, query).into_iter().map(|s| s.reason).collect()
    }

    #[test]
    fn test_scam_phrase_records_first_match_once() {
        let signals = run(
            &ScamPhraseSignal,
            SpamQuery::new("You have WON! Claim your prize, you have won", "x"),
        );
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].weight, weights::SCAM_PHRASE);
        assert_eq!(signals[0].reason, "Scam phrase: 'you have won'");
    }

    #[test]
    fn test_keyword_contribution_is_capped() {
        let signal = KeywordSignal::default();
        let signals = run(
            &signal,
            SpamQuery::new("lottery jackpot voucher cashback casino rummy", "x"),
        );
        assert_eq!(signals.len(), 1);
        assert!((signals[0].weight - 0.6).abs() < 1e-6);
        assert_eq!(signals[0].reason, "Spam keywords matched: 6");

        assert!(run(&signal, SpamQuery::new("see you soon", "x")).is_empty());
    }

    #[test]
    fn test_extra_keywords() {
        let signal = KeywordSignal::with_extra(&["Crore".to_string(), "lottery".to_string()]);
        assert_eq!(signal.count_matches("win 1 crore lottery"), 2);
    }

    #[test]
    fn test_suspicious_url_patterns() {
        let hit = |body: &str| !run(&SuspiciousUrlSignal, SpamQuery::new(body, "x")).is_empty();
        assert!(hit("pay at tinyurl.com/abc"));
        assert!(hit("visit prize-claim.xyz now"));
        assert!(hit("Pay your toll: ezpass-billing.com"));
        assert!(hit("reschedule at usps-redelivery.info"));
        assert!(hit("http://192.168.4.20/login"));
        assert!(!hit("see https://www.usps.com/track"));
        assert!(!hit("no links here"));
    }

    #[test]
    fn test_content_heuristics_for_stranger() {
        let found = reasons(
            &ContentHeuristics,
            SpamQuery::new("WIN BIG CASH TODAY CALL 98765432101 NOW!!", "Private Number"),
        );
        assert_eq!(
            found,
            vec![
                "Excessive capital letters",
                "Long number from unknown sender",
                "Hidden or withheld sender",
            ]
        );
    }

    #[test]
    fn test_short_link_and_special_characters() {
        let found = reasons(&ContentHeuristics, SpamQuery::new("$$ bit.ly/x", "+15551234567"));
        assert_eq!(
            found,
            vec![
                "Link from unknown sender",
                "Excessive special characters",
                "Very short message with link",
            ]
        );
    }

    #[test]
    fn test_contact_suppresses_link_and_number_signals() {
        let found = reasons(
            &ContentHeuristics,
            SpamQuery::new("call me on 98765432101 or see example.com", "+15551234567")
                .from_contact(true),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_terms_disclaimer() {
        let found = reasons(
            &ContentHeuristics,
            SpamQuery::new("Flat 50% off on all shoes today only T&C apply", "+15551234567"),
        );
        assert_eq!(found, vec!["Terms and conditions disclaimer"]);
    }

    #[test]
    fn test_unread_age_tiers() {
        let weight = |hours: u64, read: bool, contact: bool| -> Option<f32> {
            run(
                &UnreadAgeSignal,
                SpamQuery::new("x", "y")
                    .read(read)
                    .from_contact(contact)
                    .age_hours(hours),
            )
            .first()
            .map(|s| s.weight)
        };

        assert_eq!(weight(100, false, false), Some(weights::UNREAD_OVER_72H));
        assert_eq!(weight(72, false, false), Some(weights::UNREAD_OVER_24H));
        assert_eq!(weight(25, false, false), Some(weights::UNREAD_OVER_24H));
        assert_eq!(weight(7, false, false), Some(weights::UNREAD_OVER_6H));
        assert_eq!(weight(6, false, false), None);
        assert_eq!(weight(100, true, false), None);
        assert_eq!(weight(100, false, true), None);
    }
}
