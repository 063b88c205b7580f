//! MMS send-request encoding (WAP-209 / OMA MMS Encapsulation) and the helpers
//! around it: part extraction for display and image fitting for carrier limits.

pub mod compress;
pub mod content_type;
pub mod parser;
pub mod parts;
pub mod pdu;
pub mod smil;
pub mod uintvar;

use thiserror::Error;

pub use compress::{compress_image_to_fit, CompressedImage, ImageError};
pub use parser::{parse_send_request, ParsedPdu, ParsedPart};
pub use parts::{extract_text_and_attachments, AttachmentRef, ExtractedContent, StoredPart};
pub use pdu::{encode_send_request, encode_send_request_with_transaction_id, PduBuffer};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PduError {
    #[error("PDU truncated while reading {0}")]
    Truncated(&'static str),

    #[error("uintvar longer than 5 bytes or wider than 32 bits")]
    InvalidUintvar,

    #[error("missing required header {0}")]
    MissingHeader(&'static str),

    #[error("unexpected message type 0x{0:02x}")]
    UnexpectedMessageType(u8),

    #[error("part {index} runs past the end of the PDU")]
    PartOverrun { index: usize },

    #[error("{0} unread bytes after the last part")]
    TrailingData(usize),
}

/// One content part of an MMS message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MmsPart {
    pub content_type: String,
    /// Used as both filename and Content-Location.
    pub name: Option<String>,
    pub data: Vec<u8>,
}

impl MmsPart {
    pub fn new(content_type: &str, name: Option<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: content_type.to_string(),
            name,
            data,
        }
    }
}

/// Attachment bytes for a send request. PDU lengths are 32-bit, so data must
/// stay under 4 GiB; carrier limits are far below that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl Attachment {
    pub fn new(data: Vec<u8>, mime_type: &str) -> Self {
        Self {
            data,
            mime_type: mime_type.to_string(),
        }
    }
}

/// A message about to be encoded. Built right before encoding and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MmsSendRequest {
    /// Digits and an optional leading `+`; see [`normalize_recipient`].
    pub recipient: String,
    pub text: Option<String>,
    pub subject: Option<String>,
    pub attachment: Option<Attachment>,
}

impl MmsSendRequest {
    pub fn new(recipient: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            text: None,
            subject: None,
            attachment: None,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Reduce a phone number to digits, keeping a leading `+`.
/// `"+1 (555) 123-4567"` becomes `"+15551234567"`.
pub fn normalize_recipient(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut normalized = String::with_capacity(trimmed.len());

    if trimmed.starts_with('+') {
        normalized.push('+');
    }
    normalized.extend(trimmed.chars().filter(|c| c.is_ascii_digit()));
    normalized
}
