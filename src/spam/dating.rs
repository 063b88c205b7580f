use super::tables::{CASUAL_GREETINGS, DATING_DOMAIN_KEYWORDS, DATING_PHRASES};
use super::{weights, MessageContext, SignalExtractor, SpamSignal};

pub struct DatingSpamSignal;

impl SignalExtractor for DatingSpamSignal {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        if DATING_PHRASES
            .iter()
            .any(|p| message.body_lower.contains(*p))
        {
            signals.push(SpamSignal::new(weights::DATING_PHRASE, "Dating spam phrase"));
        }

        // First offending link only
        if let Some(url) = message
            .urls
            .iter()
            .find(|url| DATING_DOMAIN_KEYWORDS.iter().any(|k| url.mentions(k)))
        {
            signals.push(SpamSignal::new(
                weights::DATING_DOMAIN,
                format!("Dating site link: {}", url.host_or_url()),
            ));
        }
    }

    fn name(&self) -> &str {
        "dating_spam"
    }
}

/// "hey" / "hi there" openers followed by a link from a stranger.
pub struct GreetingWithUrlSignal;

impl GreetingWithUrlSignal {
    pub fn starts_with_greeting(body: &str) -> bool {
        let body = body.trim_start().to_lowercase();
        CASUAL_GREETINGS.iter().any(|greeting| {
            body.strip_prefix(greeting)
                .map(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
                .unwrap_or(false)
        })
    }
}

impl SignalExtractor for GreetingWithUrlSignal {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        if !message.is_from_contact
            && message.has_url()
            && Self::starts_with_greeting(message.body)
        {
            signals.push(SpamSignal::new(
                weights::GREETING_WITH_URL,
                "Casual greeting with link",
            ));
        }
    }

    fn name(&self) -> &str {
        "greeting_with_url"
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

    #[test]
    fn test_phrase_and_domain_fire_separately() {
        let signals = run(
            &DatingSpamSignal,
            SpamQuery::new("hey babe check my profile pic, flirt-now.xyz", "5551234567"),
        );
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].weight, weights::DATING_PHRASE);
        assert_eq!(signals[1].weight, weights::DATING_DOMAIN);
        assert_eq!(signals[1].reason, "Dating site link: flirt-now.xyz");
    }

    #[test]
    fn test_keyword_in_link_path_counts() {
        let signals = run(
            &DatingSpamSignal,
            SpamQuery::new("hello see example.com/dating-profile", "x"),
        );
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].reason, "Dating site link: example.com");
    }

    #[test]
    fn test_video_call_invite_is_not_a_dating_link() {
        assert!(run(
            &DatingSpamSignal,
            SpamQuery::new(
                "Team sync moved to 3pm, join at https://meet.google.com/abc-defg-hij",
                "+15551234567"
            )
        )
        .is_empty());
    }

    #[test]
    fn test_only_first_dating_link_counts() {
        let signals = run(
            &DatingSpamSignal,
            SpamQuery::new("sexy-girls.top and flirt4free.club", "x"),
        );
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].reason, "Dating site link: sexy-girls.top");
    }

    #[test]
    fn test_clean_message() {
        assert!(run(
            &DatingSpamSignal,
            SpamQuery::new("Lunch tomorrow? menu at https://example.com", "x")
        )
        .is_empty());
    }

    #[test]
    fn test_greeting_detection() {
        assert!(GreetingWithUrlSignal::starts_with_greeting("Hey! look"));
        assert!(GreetingWithUrlSignal::starts_with_greeting("  hi there"));
        assert!(GreetingWithUrlSignal::starts_with_greeting("hello"));
        assert!(!GreetingWithUrlSignal::starts_with_greeting("history homework"));
        assert!(!GreetingWithUrlSignal::starts_with_greeting("Your code is 1234"));
    }

    #[test]
    fn test_greeting_needs_link_and_stranger() {
        let fired = |query: SpamQuery<'_>| !run(&GreetingWithUrlSignal, query).is_empty();
        assert!(fired(SpamQuery::new("hi, is this you? photos.example.com", "x")));
        assert!(!fired(SpamQuery::new("hi, is this you?", "x")));
        assert!(!fired(
            SpamQuery::new("hi, see photos.example.com", "x").from_contact(true)
        ));
    }
}
