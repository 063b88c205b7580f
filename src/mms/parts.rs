use super::content_type;

/// One part of a received or stored MMS, as read from the platform store.
/// `locator` is whatever the caller uses to fetch the bytes later (a content URI, a row id).
#[derive(Debug, Clone)]
pub struct StoredPart<L> {
    pub content_type: String,
    pub name: Option<String>,
    pub text: Option<String>,
    pub size: usize,
    pub locator: L,
}

impl<L> StoredPart<L> {
    pub fn text(text: &str, locator: L) -> Self {
        Self {
            content_type: content_type::TEXT_PLAIN.to_string(),
            name: None,
            text: Some(text.to_string()),
            size: text.len(),
            locator,
        }
    }

    pub fn binary(content_type: &str, name: Option<&str>, size: usize, locator: L) -> Self {
        Self {
            content_type: content_type.to_string(),
            name: name.map(str::to_string),
            text: None,
            size,
            locator,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentRef<'a, L> {
    pub content_type: &'a str,
    pub name: Option<&'a str>,
    pub size: usize,
    pub locator: &'a L,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent<'a, L> {
    pub text: Option<String>,
    pub attachments: Vec<AttachmentRef<'a, L>>,
}

/// Split stored parts into a display body and attachment references.
///
/// Only the first non-blank text/plain part is used; some carriers deliver the
/// body twice and concatenating would duplicate it. SMIL is layout only.
pub fn extract_text_and_attachments<L>(parts: &[StoredPart<L>]) -> ExtractedContent<'_, L> {
    let mut text: Option<String> = None;
    let mut attachments = Vec::new();

    for part in parts {
        if content_type::is_text_plain(&part.content_type) {
            if text.is_none() {
                text = part
                    .text
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .map(str::to_string);
            } else {
                log::debug!("Ignoring additional text part");
            }
            continue;
        }

        if content_type::is_smil(&part.content_type) {
            continue;
        }

        attachments.push(AttachmentRef {
            content_type: &part.content_type,
            name: part.name.as_deref(),
            size: part.size,
            locator: &part.locator,
        });
    }

    ExtractedContent { text, attachments }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_image() {
        let parts = vec![
            StoredPart::binary("application/smil", Some("smil.xml"), 300, "content://mms/part/1"),
            StoredPart::text("hello there", "content://mms/part/2"),
            StoredPart::binary("image/jpeg", Some("image.jpg"), 52_000, "content://mms/part/3"),
        ];

        let extracted = extract_text_and_attachments(&parts);
        assert_eq!(extracted.text.as_deref(), Some("hello there"));
        assert_eq!(extracted.attachments.len(), 1);
        assert_eq!(extracted.attachments[0].content_type, "image/jpeg");
        assert_eq!(extracted.attachments[0].size, 52_000);
        assert_eq!(*extracted.attachments[0].locator, "content://mms/part/3");
    }

    #[test]
    fn test_duplicate_text_parts_are_not_concatenated() {
        let parts = vec![
            StoredPart::text("first body", 1u64),
            StoredPart::text("first body", 2u64),
        ];

        let extracted = extract_text_and_attachments(&parts);
        assert_eq!(extracted.text.as_deref(), Some("first body"));
        assert!(extracted.attachments.is_empty());
    }

    #[test]
    fn test_first_non_blank_text_wins() {
        let parts = vec![
            StoredPart::text("   ", 1u64),
            StoredPart::text("actual", 2u64),
            StoredPart::text("later", 3u64),
        ];

        let extracted = extract_text_and_attachments(&parts);
        assert_eq!(extracted.text.as_deref(), Some("actual"));
    }

    #[test]
    fn test_content_type_parameters_and_case() {
        let mut text_part = StoredPart::text("body", 1u64);
        text_part.content_type = "Text/Plain; charset=utf-8".to_string();
        let parts = vec![
            StoredPart::binary("APPLICATION/SMIL", None, 10, 0u64),
            text_part,
            StoredPart::binary("video/mp4", Some("clip.mp4"), 1_000, 2u64),
            StoredPart::binary("image/png", Some("a.png"), 500, 3u64),
        ];

        let extracted = extract_text_and_attachments(&parts);
        assert_eq!(extracted.text.as_deref(), Some("body"));
        let types: Vec<&str> = extracted
            .attachments
            .iter()
            .map(|a| a.content_type)
            .collect();
        assert_eq!(types, vec!["video/mp4", "image/png"]);
        assert_eq!(*extracted.attachments[1].locator, 3u64);
    }

    #[test]
    fn test_no_parts() {
        let parts: Vec<StoredPart<()>> = Vec::new();
        let extracted = extract_text_and_attachments(&parts);
        assert_eq!(extracted.text, None);
        assert!(extracted.attachments.is_empty());
    }
}
