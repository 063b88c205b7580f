use super::tables::URL_CANDIDATE;
use url::Url;

/// A link spotted in message text, with its host when it parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUrl {
    pub url: String,
    pub host: Option<String>,
}

impl ExtractedUrl {
    /// Case-insensitive containment against the whole link text, path included.
    pub fn mentions(&self, needle: &str) -> bool {
        self.url.to_lowercase().contains(needle)
    }

    /// Host if known, otherwise the raw lowercase text.
    pub fn host_or_url(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| self.url.to_lowercase())
    }
}

/// Find URL-like substrings: explicit `http(s)://` links, `www.` links and bare
/// domains such as `bit.ly/x` or `meet-now.xyz`.
pub fn extract_urls(text: &str) -> Vec<ExtractedUrl> {
    URL_CANDIDATE
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']']))
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| ExtractedUrl {
            url: candidate.to_string(),
            host: parse_host(candidate),
        })
        .collect()
}

fn parse_host(candidate: &str) -> Option<String> {
    let lower = candidate.to_lowercase();
    let absolute = if lower.starts_with("http://") || lower.starts_with("https://") {
        lower
    } else {
        format!("http://{}", lower)
    };

    Url::parse(&absolute)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.trim_start_matches("www.").to_string()))
}
