use super::tables::BRAND_PATTERNS;
use super::{weights, MessageContext, SignalExtractor, SpamSignal};

/// Flags messages that name a brand when none of the links contain one of its domains.
///
/// Fires once per impersonated brand. A message mentioning a brand without any
/// link is left alone.
pub struct BrandImpersonationSignal;

impl BrandImpersonationSignal {
    pub fn impersonated_brands(message: &MessageContext<'_>) -> Vec<&'static str> {
        if !message.has_url() {
            return Vec::new();
        }

        BRAND_PATTERNS
            .iter()
            .filter(|(_, pattern, _)| pattern.is_match(message.body))
            .filter(|(_, _, domains)| {
                !message
                    .urls
                    .iter()
                    .any(|url| domains.iter().any(|d| url.mentions(d)))
            })
            .map(|(brand, _, _)| *brand)
            .collect()
    }
}

impl SignalExtractor for BrandImpersonationSignal {
    fn extract(&self, message: &MessageContext<'_>, signals: &mut Vec<SpamSignal>) {
        for brand in Self::impersonated_brands(message) {
            signals.push(SpamSignal::new(
                weights::BRAND_IMPERSONATION,
                format!("Possible {} impersonation", brand),
            ));
        }
    }

    fn name(&self) -> &str {
        "brand_impersonation"
    }
}
