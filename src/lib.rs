pub mod config;
pub mod mms;
pub mod spam;

pub use config::{Config, ConfigError};
pub use mms::{
    compress_image_to_fit, encode_send_request, extract_text_and_attachments,
    parse_send_request, Attachment, MmsSendRequest, PduError,
};
pub use spam::{check_message, SpamCheckResult, SpamQuery, SpamScorer};
