//! WSP content-type encoding and the MIME tables the codec relies on.

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_SMIL: &str = "application/smil";
pub const IMAGE_JPEG: &str = "image/jpeg";
pub const MULTIPART_RELATED: &str = "application/vnd.wap.multipart.related";

/// WSP assigned numbers (WAP-230 Table 40) for the media types carriers expect
/// as single-byte codes.
const WELL_KNOWN_CONTENT_TYPES: &[(&str, u8)] = &[
    (TEXT_PLAIN, 0x03),
    (IMAGE_JPEG, 0x1E),
    ("image/gif", 0x1D),
    (MULTIPART_RELATED, 0x33),
];

/// MIME type to file extension used for synthetic attachment names.
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    (IMAGE_JPEG, "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// Well-known charset code for UTF-8 (IANA MIBenum 106).
pub const CHARSET_UTF8: u8 = 0x6A;

/// WSP parameter tokens (encoding version 1.2+).
pub const PARAM_CHARSET: u8 = 0x81;
pub const PARAM_TYPE: u8 = 0x89;
pub const PARAM_START: u8 = 0x8A;

/// Strip parameters and normalize case: `Text/Plain; charset=utf-8` -> `text/plain`.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

pub fn well_known_code(content_type: &str) -> Option<u8> {
    let media = media_type(content_type);
    WELL_KNOWN_CONTENT_TYPES
        .iter()
        .find(|(name, _)| *name == media)
        .map(|(_, code)| *code)
}

pub fn content_type_for_code(code: u8) -> Option<&'static str> {
    WELL_KNOWN_CONTENT_TYPES
        .iter()
        .find(|(_, known)| *known == code)
        .map(|(name, _)| *name)
}

pub fn image_extension(mime_type: &str) -> &'static str {
    let media = media_type(mime_type);
    IMAGE_EXTENSIONS
        .iter()
        .find(|(name, _)| *name == media)
        .map(|(_, ext)| *ext)
        .unwrap_or(DEFAULT_IMAGE_EXTENSION)
}

pub fn is_text_plain(content_type: &str) -> bool {
    media_type(content_type) == TEXT_PLAIN
}

pub fn is_smil(content_type: &str) -> bool {
    media_type(content_type) == APPLICATION_SMIL
}
