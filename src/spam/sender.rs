use super::tables::{
    BUSINESS_SHORTCODE, PROMOTIONAL_PREFIX, SUSPICIOUS_SENDER_PATTERNS, TRUSTED_SENDERS,
    TRUSTED_SENDER_ID_PATTERNS,
};
use super::{weights, MessageContext, SignalExtractor, SpamSignal};

/// Canonical form used for block-list comparison: phone-like ids keep only
/// digits and a leading `+`, anything else is trimmed and lowercased.
pub fn normalize_sender(sender: &str) -> String {
    let trimmed = sender.trim();
    let phone_like = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.'));

    if phone_like {
        let mut normalized = String::new();
        if trimmed.starts_with('+') {
            normalized.push('+');
        }
        normalized.extend(trimmed.chars().filter(|c| c.is_ascii_digit()));
        normalized
    } else {
        trimmed.to_lowercase()
    }
}

/// Institutional whitelist: built-in table plus configured extras.
#[derive(Debug, Clone)]
pub struct TrustedSenders {
    entries: Vec<String>,
}

impl Default for TrustedSenders {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}

impl TrustedSenders {
    pub fn with_extra(extra: &[String]) -> Self {
        let mut entries: Vec<String> = TRUSTED_SENDERS.iter().map(|s| s.to_string()).collect();
        entries.extend(
            extra
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        );
        Self { entries }
    }

    pub fn is_trusted(&self, sender: &str) -> bool {
        let sender_lower = sender.trim().to_lowercase();
        if sender_lower.is_empty() {
            return false;
        }

        self.entries.iter().any(|t| sender_lower.contains(t.as_str()))
            || TRUSTED_SENDER_ID_PATTERNS
                .iter()
                .any(|p| p.is_match(&sender_lower))
    }
}

pub struct ContactBonus;

impl SignalExtractor for ContactBonus {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        if message.is_from_contact {
            signals.push(SpamSignal::new(
                weights::CONTACT_BONUS,
                "Sender is a saved contact",
            ));
        }
    }

    fn name(&self) -> &str {
        "contact_bonus"
    }
}

/// Shape of the sender id itself, independent of the body.
pub struct SenderShapeSignal;

impl SignalExtractor for SenderShapeSignal {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        let sender = message.sender;

        if SUSPICIOUS_SENDER_PATTERNS.iter().any(|p| p.is_match(sender)) {
            signals.push(SpamSignal::new(
                weights::SUSPICIOUS_SENDER,
                "Suspicious sender format",
            ));
        }

        if PROMOTIONAL_PREFIX.is_match(sender) {
            signals.push(SpamSignal::new(
                weights::PROMOTIONAL_PREFIX,
                "Promotional sender prefix",
            ));
        }

        if BUSINESS_SHORTCODE.is_match(sender) {
            signals.push(SpamSignal::new(
                weights::BUSINESS_SHORTCODE,
                "Business short code sender",
            ));
        }
    }

    fn name(&self) -> &str {
        "sender_shape"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spam::SpamQuery;

    fn shape_reasons(sender: &str) -> Vec<String> {
        let query = SpamQuery::new("hello", sender);
        let message = MessageContext::new(&query);
        let mut signals = Vec::new();
        SenderShapeSignal.extract(&message, &mut signals);
        signals.into_iter().map(|s| s.reason).collect()
    }

    #[test]
    fn test_trusted_substring_and_pattern() {
        let trusted = TrustedSenders::default();
        assert!(trusted.is_trusted("HDFCBANK"));
        assert!(trusted.is_trusted("VK-ICICIB"));
        assert!(trusted.is_trusted("BX-KOTAKMB-S"));
        assert!(!trusted.is_trusted("AD-PROMO"));
        assert!(!trusted.is_trusted(""));
        assert!(!trusted.is_trusted("+15551234567"));
    }

    #[test]
    fn test_short_ids_do_not_trust_unrelated_words() {
        let trusted = TrustedSenders::default();
        assert!(!trusted.is_trusted("AD-PURCHASE"));
        assert!(!trusted.is_trusted("chaser-deals"));
        assert!(trusted.is_trusted("ChaseBank"));
    }

    #[test]
    fn test_configured_trusted_senders() {
        let trusted = TrustedSenders::with_extra(&["  MyCreditUnion ".to_string(), String::new()]);
        assert!(trusted.is_trusted("VM-MYCREDITUNION"));
        assert!(!trusted.is_trusted("random"));
    }

    #[test]
    fn test_sender_shapes() {
        assert_eq!(shape_reasons("AD-PROMO"), vec!["Promotional sender prefix"]);
        assert_eq!(shape_reasons("bz-offers"), vec!["Promotional sender prefix"]);
        assert_eq!(shape_reasons("SWIGGY"), vec!["Business short code sender"]);
        assert_eq!(shape_reasons("promo@mailer.biz"), vec!["Suspicious sender format"]);
        assert_eq!(shape_reasons("+4479111222333"), vec!["Suspicious sender format"]);
        assert_eq!(shape_reasons("deals83412"), vec!["Suspicious sender format"]);
        assert!(shape_reasons("+15551234567").is_empty());
        assert!(shape_reasons("ABCD").is_empty());
        assert!(shape_reasons("ABCDEFGHIJKL").is_empty());
    }

    #[test]
    fn test_normalize_sender() {
        assert_eq!(normalize_sender("+1 (555) 000-1111"), "+15550001111");
        assert_eq!(normalize_sender(" AD-Promo "), "ad-promo");
        assert_eq!(normalize_sender(""), "");
    }
}
