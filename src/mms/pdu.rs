use super::content_type::{
    self, APPLICATION_SMIL, CHARSET_UTF8, MULTIPART_RELATED, PARAM_CHARSET, PARAM_START,
    PARAM_TYPE, TEXT_PLAIN,
};
use super::smil::{self, SMIL_CONTENT_ID, SMIL_PART_NAME, TEXT_PART_NAME};
use super::uintvar::encode_uintvar;
use super::{MmsPart, MmsSendRequest};
use std::sync::atomic::{AtomicU64, Ordering};

// MMS header field codes (WAP-209 section 7.3, already OR'd with 0x80)
pub const HEADER_CONTENT_TYPE: u8 = 0x84;
pub const HEADER_FROM: u8 = 0x89;
pub const HEADER_MESSAGE_TYPE: u8 = 0x8C;
pub const HEADER_MMS_VERSION: u8 = 0x8D;
pub const HEADER_SUBJECT: u8 = 0x96;
pub const HEADER_TO: u8 = 0x97;
pub const HEADER_TRANSACTION_ID: u8 = 0x98;

// Part header field codes (WSP)
pub const PART_CONTENT_LOCATION: u8 = 0x8E;
pub const PART_CONTENT_ID: u8 = 0xC0;

pub const MESSAGE_TYPE_SEND_REQ: u8 = 0x80;
/// MMS 1.2 as a short integer (major 1, minor 2).
pub const MMS_VERSION_1_2: u8 = 0x92;
pub const INSERT_ADDRESS_TOKEN: u8 = 0x81;
pub const ADDRESS_PRESENT_TOKEN: u8 = 0x80;

const LENGTH_QUOTE: u8 = 0x1F;
const MAX_SHORT_LENGTH: usize = 30;
const TEXT_QUOTE: u8 = 0x7F;
const QUOTED_STRING_MARK: u8 = 0x22;

static TRANSACTION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a transaction id unique within this process: UTC millis plus a counter.
pub fn next_transaction_id() -> String {
    let sequence = TRANSACTION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("T{:x}-{}", chrono::Utc::now().timestamp_millis(), sequence)
}

/// Lengths on the wire are 32-bit uintvars; anything larger saturates.
fn wire_length(length: usize) -> u32 {
    u32::try_from(length).unwrap_or_else(|_| {
        log::warn!("Length {} exceeds the 32-bit PDU limit", length);
        u32::MAX
    })
}

/// Append-only writer for WSP/MMS encoded values.
#[derive(Debug, Default)]
pub struct PduBuffer {
    bytes: Vec<u8>,
}

impl PduBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn push_uintvar(&mut self, value: u32) {
        self.bytes.extend_from_slice(&encode_uintvar(value));
    }

    /// Short-integer: 7-bit value with the high bit set.
    pub fn push_short_integer(&mut self, value: u8) {
        self.bytes.push(value | 0x80);
    }

    /// Value-length: one byte up to 30, otherwise length-quote followed by a uintvar.
    pub fn push_value_length(&mut self, length: usize) {
        if length <= MAX_SHORT_LENGTH {
            self.bytes.push(length as u8);
        } else {
            self.bytes.push(LENGTH_QUOTE);
            self.push_uintvar(wire_length(length));
        }
    }

    /// Null-terminated text string, quoted when the first byte would read as a short integer.
    pub fn push_text_string(&mut self, text: &str) {
        if text.as_bytes().first().is_some_and(|b| *b >= 0x80) {
            self.bytes.push(TEXT_QUOTE);
        }
        self.bytes.extend_from_slice(text.as_bytes());
        self.bytes.push(0x00);
    }

    pub fn push_quoted_string(&mut self, text: &str) {
        self.bytes.push(QUOTED_STRING_MARK);
        self.bytes.extend_from_slice(text.as_bytes());
        self.bytes.push(0x00);
    }

    /// Encoded-string-value: plain text for ASCII, UTF-8 charset form otherwise.
    pub fn push_encoded_string(&mut self, text: &str) {
        if text.is_ascii() {
            self.push_text_string(text);
            return;
        }

        let mut value = PduBuffer::new();
        value.push_short_integer(CHARSET_UTF8);
        value.push_text_string(text);
        self.push_value_length(value.len());
        self.push_bytes(&value.bytes);
    }

    /// Content-type in general form: value-length, media, then parameters.
    /// Well-known media types are written as a single short integer.
    pub fn push_content_type(&mut self, media_type: &str, params: &[ContentTypeParam<'_>]) {
        let mut value = PduBuffer::new();

        match content_type::well_known_code(media_type) {
            Some(code) => value.push_short_integer(code),
            None => value.push_text_string(media_type),
        }

        for param in params {
            match param {
                ContentTypeParam::Charset(charset) => {
                    value.push_byte(PARAM_CHARSET);
                    value.push_short_integer(*charset);
                }
                ContentTypeParam::Start(start) => {
                    value.push_byte(PARAM_START);
                    value.push_text_string(start);
                }
                ContentTypeParam::Type(related) => {
                    value.push_byte(PARAM_TYPE);
                    value.push_text_string(related);
                }
            }
        }

        self.push_value_length(value.len());
        self.push_bytes(&value.bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ContentTypeParam<'a> {
    Charset(u8),
    Start(&'a str),
    Type(&'a str),
}

/// Arrange the parts of a send request: SMIL, then text, then the attachment.
pub fn build_parts(request: &MmsSendRequest) -> Vec<MmsPart> {
    let text = request.text.as_deref().filter(|t| !t.is_empty());
    let attachment = request.attachment.as_ref().filter(|a| !a.data.is_empty());

    let image_name =
        attachment.map(|a| smil::image_part_name(content_type::image_extension(&a.mime_type)));
    let smil = smil::build_smil(image_name.as_deref(), text.is_some());

    let mut parts = Vec::with_capacity(3);
    parts.push(MmsPart::new(
        APPLICATION_SMIL,
        Some(SMIL_PART_NAME.to_string()),
        smil.into_bytes(),
    ));

    if let Some(text) = text {
        parts.push(MmsPart::new(
            TEXT_PLAIN,
            Some(TEXT_PART_NAME.to_string()),
            text.as_bytes().to_vec(),
        ));
    }

    if let (Some(attachment), Some(name)) = (attachment, image_name) {
        parts.push(MmsPart::new(
            &attachment.mime_type,
            Some(name),
            attachment.data.clone(),
        ));
    }

    parts
}

pub fn encode_send_request(request: &MmsSendRequest) -> Vec<u8> {
    encode_send_request_with_transaction_id(request, &next_transaction_id())
}

pub fn encode_send_request_with_transaction_id(
    request: &MmsSendRequest,
    transaction_id: &str,
) -> Vec<u8> {
    let parts = build_parts(request);
    let payload_size: usize = parts.iter().map(|p| p.data.len()).sum();
    let mut pdu = PduBuffer::with_capacity(payload_size + 256);

    pdu.push_byte(HEADER_MESSAGE_TYPE);
    pdu.push_byte(MESSAGE_TYPE_SEND_REQ);

    pdu.push_byte(HEADER_TRANSACTION_ID);
    pdu.push_text_string(transaction_id);

    pdu.push_byte(HEADER_MMS_VERSION);
    pdu.push_byte(MMS_VERSION_1_2);

    pdu.push_byte(HEADER_FROM);
    pdu.push_value_length(1);
    pdu.push_byte(INSERT_ADDRESS_TOKEN);

    // Carriers reject the "/TYPE=PLMN" suffix, so the number goes out bare.
    pdu.push_byte(HEADER_TO);
    pdu.push_encoded_string(&request.recipient);

    if let Some(subject) = request.subject.as_deref().filter(|s| !s.trim().is_empty()) {
        pdu.push_byte(HEADER_SUBJECT);
        pdu.push_encoded_string(subject);
    }

    // Content-Type must be the last header.
    pdu.push_byte(HEADER_CONTENT_TYPE);
    pdu.push_content_type(
        MULTIPART_RELATED,
        &[
            ContentTypeParam::Start(SMIL_CONTENT_ID),
            ContentTypeParam::Type(APPLICATION_SMIL),
        ],
    );

    write_body(&mut pdu, &parts);

    log::debug!(
        "Encoded m-send-req {} with {} parts ({} bytes)",
        transaction_id,
        parts.len(),
        pdu.len()
    );

    pdu.into_bytes()
}

fn write_body(pdu: &mut PduBuffer, parts: &[MmsPart]) {
    pdu.push_uintvar(wire_length(parts.len()));

    for part in parts {
        let headers = part_headers(part);
        pdu.push_uintvar(wire_length(headers.len()));
        pdu.push_uintvar(wire_length(part.data.len()));
        pdu.push_bytes(&headers);
        pdu.push_bytes(&part.data);
    }
}

fn part_headers(part: &MmsPart) -> Vec<u8> {
    let mut headers = PduBuffer::new();

    if content_type::is_text_plain(&part.content_type) || content_type::is_smil(&part.content_type)
    {
        headers.push_content_type(
            &part.content_type,
            &[ContentTypeParam::Charset(CHARSET_UTF8)],
        );
    } else {
        headers.push_content_type(&part.content_type, &[]);
    }

    if let Some(name) = &part.name {
        headers.push_byte(PART_CONTENT_LOCATION);
        headers.push_text_string(name);

        headers.push_byte(PART_CONTENT_ID);
        if content_type::is_smil(&part.content_type) {
            headers.push_quoted_string(SMIL_CONTENT_ID);
        } else {
            headers.push_quoted_string(&format!("<{}>", name));
        }
    }

    headers.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mms::Attachment;

    fn jpeg_request() -> MmsSendRequest {
        MmsSendRequest::new("+15551234567")
            .with_text("hi")
            .with_attachment(Attachment::new(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00], "image/jpeg"))
    }

    #[test]
    fn test_fixed_header_prefix() {
        let pdu = encode_send_request_with_transaction_id(&jpeg_request(), "T1");

        assert_eq!(&pdu[..2], &[HEADER_MESSAGE_TYPE, MESSAGE_TYPE_SEND_REQ]);
        assert_eq!(&pdu[2..6], &[HEADER_TRANSACTION_ID, b'T', b'1', 0x00]);
        assert_eq!(&pdu[6..8], &[HEADER_MMS_VERSION, MMS_VERSION_1_2]);
        assert_eq!(&pdu[8..11], &[HEADER_FROM, 0x01, INSERT_ADDRESS_TOKEN]);
        assert_eq!(pdu[11], HEADER_TO);
        assert_eq!(&pdu[12..25], b"+15551234567\0");
    }

    #[test]
    fn test_to_header_has_no_plmn_suffix() {
        let pdu = encode_send_request_with_transaction_id(&jpeg_request(), "T1");
        let haystack = String::from_utf8_lossy(&pdu);
        assert!(!haystack.contains("/TYPE=PLMN"));
    }

    #[test]
    fn test_multipart_content_type_parameters() {
        let pdu = encode_send_request_with_transaction_id(&jpeg_request(), "T1");
        let start = pdu
            .iter()
            .position(|b| *b == HEADER_CONTENT_TYPE)
            .unwrap();

        let mut expected = vec![0xB3, PARAM_START];
        expected.extend_from_slice(b"<smil>\0");
        expected.push(PARAM_TYPE);
        expected.extend_from_slice(b"application/smil\0");

        assert_eq!(pdu[start + 1] as usize, expected.len());
        assert_eq!(&pdu[start + 2..start + 2 + expected.len()], &expected[..]);
    }

    #[test]
    fn test_parts_order_and_names() {
        let parts = build_parts(&jpeg_request());
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].content_type, APPLICATION_SMIL);
        assert_eq!(parts[1].content_type, TEXT_PLAIN);
        assert_eq!(parts[1].name.as_deref(), Some("text.txt"));
        assert_eq!(parts[2].content_type, "image/jpeg");
        assert_eq!(parts[2].name.as_deref(), Some("image.jpg"));
    }

    #[test]
    fn test_empty_attachment_is_dropped() {
        let request = MmsSendRequest::new("5551234")
            .with_text("hello")
            .with_attachment(Attachment::new(Vec::new(), "image/png"));
        let parts = build_parts(&request);
        assert_eq!(parts.len(), 2);

        let smil = String::from_utf8(parts[0].data.clone()).unwrap();
        assert!(!smil.contains("<img"));
    }

    #[test]
    fn test_image_only_request() {
        let request = MmsSendRequest::new("5551234")
            .with_attachment(Attachment::new(vec![1, 2, 3], "image/png"));
        let parts = build_parts(&request);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].name.as_deref(), Some("image.png"));

        let smil = String::from_utf8(parts[0].data.clone()).unwrap();
        assert!(smil.contains("height=\"100%\""));
        assert!(smil.contains("image.png"));
    }

    #[test]
    fn test_value_length_quote_for_long_values() {
        let mut buffer = PduBuffer::new();
        buffer.push_value_length(30);
        buffer.push_value_length(31);
        buffer.push_value_length(200);
        assert_eq!(buffer.into_bytes(), vec![30, LENGTH_QUOTE, 31, LENGTH_QUOTE, 0x81, 0x48]);
    }

    #[test]
    fn test_text_string_quoting() {
        let mut buffer = PduBuffer::new();
        buffer.push_text_string("ab");
        buffer.push_text_string("é");
        assert_eq!(
            buffer.into_bytes(),
            vec![b'a', b'b', 0x00, TEXT_QUOTE, 0xC3, 0xA9, 0x00]
        );
    }

    #[test]
    fn test_well_known_vs_textual_part_content_type() {
        let jpeg = part_headers(&MmsPart::new("image/jpeg", None, vec![1]));
        assert_eq!(jpeg, vec![0x01, 0x9E]);

        let png = part_headers(&MmsPart::new("image/png", None, vec![1]));
        let mut expected = vec![10];
        expected.extend_from_slice(b"image/png\0");
        assert_eq!(png, expected);

        let text = part_headers(&MmsPart::new("text/plain", None, vec![1]));
        assert_eq!(text, vec![0x03, 0x83, PARAM_CHARSET, 0xEA]);
    }

    #[test]
    fn test_transaction_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..20_000).map(|_| next_transaction_id()).collect();
        assert_eq!(ids.len(), 20_000);
        assert!(ids.iter().all(|id| id.starts_with('T')));
    }

    #[test]
    fn test_wire_length_never_wraps() {
        assert_eq!(wire_length(70_000), 70_000);
        assert_eq!(wire_length(u32::MAX as usize), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(wire_length(u32::MAX as usize + 1), u32::MAX);
    }

    #[test]
    fn test_empty_recipient_still_encodes() {
        let pdu = encode_send_request_with_transaction_id(&MmsSendRequest::new(""), "T9");
        assert_eq!(&pdu[11..13], &[HEADER_TO, 0x00]);
    }
}
