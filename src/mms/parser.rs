use super::content_type::{self, PARAM_CHARSET, PARAM_START, PARAM_TYPE};
use super::pdu::{
    ADDRESS_PRESENT_TOKEN, HEADER_CONTENT_TYPE, HEADER_FROM, HEADER_MESSAGE_TYPE,
    HEADER_MMS_VERSION, HEADER_SUBJECT, HEADER_TO, HEADER_TRANSACTION_ID, INSERT_ADDRESS_TOKEN,
    MESSAGE_TYPE_SEND_REQ, PART_CONTENT_ID, PART_CONTENT_LOCATION,
};
use super::uintvar::decode_uintvar;
use super::PduError;
use serde::Serialize;

const LENGTH_QUOTE: u8 = 0x1F;
const TEXT_QUOTE: u8 = 0x7F;
const QUOTED_STRING_MARK: u8 = 0x22;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedContentType {
    pub media_type: String,
    pub charset: Option<u32>,
    pub start: Option<String>,
    pub related_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedPart {
    pub content_type: ParsedContentType,
    pub content_location: Option<String>,
    pub content_id: Option<String>,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedPdu {
    pub message_type: u8,
    pub transaction_id: Option<String>,
    /// (major, minor)
    pub mms_version: Option<(u8, u8)>,
    pub from_insert_address: bool,
    pub from: Option<String>,
    pub to: Vec<String>,
    pub subject: Option<String>,
    pub content_type: ParsedContentType,
    pub declared_part_count: u32,
    pub parts: Vec<ParsedPart>,
}

/// Forward-only reader over a PDU slice.
struct PduReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PduReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn peek(&self, what: &'static str) -> Result<u8, PduError> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or(PduError::Truncated(what))
    }

    fn read_byte(&mut self, what: &'static str) -> Result<u8, PduError> {
        let byte = self.peek(what)?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], PduError> {
        if self.remaining() < len {
            return Err(PduError::Truncated(what));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_uintvar(&mut self, what: &'static str) -> Result<u32, PduError> {
        let (value, consumed) = decode_uintvar(&self.bytes[self.pos..]).map_err(|e| match e {
            PduError::Truncated(_) => PduError::Truncated(what),
            other => other,
        })?;
        self.pos += consumed;
        Ok(value)
    }

    /// Text-string, quoted-string or token text up to and including the null terminator.
    fn read_text(&mut self, what: &'static str) -> Result<String, PduError> {
        let first = self.peek(what)?;
        if first == TEXT_QUOTE || first == QUOTED_STRING_MARK {
            self.pos += 1;
        }
        let rest = &self.bytes[self.pos..];
        let end = rest
            .iter()
            .position(|b| *b == 0x00)
            .ok_or(PduError::Truncated(what))?;
        let text = String::from_utf8_lossy(&rest[..end]).into_owned();
        self.pos += end + 1;
        Ok(text)
    }

    /// Value-length prefix; only call when the next byte is <= 0x1F.
    fn read_value_length(&mut self, what: &'static str) -> Result<usize, PduError> {
        let first = self.read_byte(what)?;
        if first == LENGTH_QUOTE {
            Ok(self.read_uintvar(what)? as usize)
        } else {
            Ok(first as usize)
        }
    }

    /// Short or long integer.
    fn read_integer(&mut self, what: &'static str) -> Result<u32, PduError> {
        let first = self.read_byte(what)?;
        if first >= 0x80 {
            return Ok(u32::from(first & 0x7F));
        }
        let octets = self.take(first as usize, what)?;
        Ok(octets
            .iter()
            .fold(0u32, |acc, b| acc.wrapping_shl(8) | u32::from(*b)))
    }

    /// Skip any WSP value whose shape is self-describing.
    fn skip_value(&mut self, what: &'static str) -> Result<(), PduError> {
        match self.peek(what)? {
            0x00..=LENGTH_QUOTE => {
                let len = self.read_value_length(what)?;
                self.take(len, what)?;
            }
            0x20..=0x7F => {
                self.read_text(what)?;
            }
            _ => {
                self.pos += 1;
            }
        }
        Ok(())
    }

    fn read_encoded_string(&mut self, what: &'static str) -> Result<String, PduError> {
        if self.peek(what)? <= LENGTH_QUOTE {
            let len = self.read_value_length(what)?;
            let mut inner = PduReader::new(self.take(len, what)?);
            inner.read_integer(what)?;
            return inner.read_text(what);
        }
        self.read_text(what)
    }

    fn read_content_type(&mut self) -> Result<ParsedContentType, PduError> {
        const WHAT: &str = "content type";
        let first = self.peek(WHAT)?;

        if first >= 0x80 {
            self.pos += 1;
            return Ok(ParsedContentType {
                media_type: media_for_code(first & 0x7F),
                ..Default::default()
            });
        }
        if first > LENGTH_QUOTE {
            return Ok(ParsedContentType {
                media_type: self.read_text(WHAT)?,
                ..Default::default()
            });
        }

        let len = self.read_value_length(WHAT)?;
        let mut value = PduReader::new(self.take(len, WHAT)?);
        let media_type = if value.peek(WHAT)? >= 0x80 {
            media_for_code(value.read_byte(WHAT)? & 0x7F)
        } else {
            value.read_text(WHAT)?
        };

        let mut parsed = ParsedContentType {
            media_type,
            ..Default::default()
        };

        while !value.is_empty() {
            let token = value.peek(WHAT)?;
            if token < 0x80 {
                // Untyped parameter: token-text name followed by a value
                value.read_text(WHAT)?;
                value.skip_value(WHAT)?;
                continue;
            }
            value.pos += 1;
            match token {
                PARAM_CHARSET => parsed.charset = Some(value.read_integer(WHAT)?),
                PARAM_START => parsed.start = Some(value.read_text(WHAT)?),
                PARAM_TYPE => parsed.related_type = Some(value.read_text(WHAT)?),
                _ => value.skip_value(WHAT)?,
            }
        }

        Ok(parsed)
    }
}

fn media_for_code(code: u8) -> String {
    content_type::content_type_for_code(code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("wsp/0x{:02x}", code))
}

/// Decode an `m-send-req` PDU back into headers and parts.
pub fn parse_send_request(bytes: &[u8]) -> Result<ParsedPdu, PduError> {
    let mut reader = PduReader::new(bytes);

    if reader.read_byte("message type")? != HEADER_MESSAGE_TYPE {
        return Err(PduError::MissingHeader("X-Mms-Message-Type"));
    }
    let message_type = reader.read_byte("message type")?;
    if message_type != MESSAGE_TYPE_SEND_REQ {
        return Err(PduError::UnexpectedMessageType(message_type));
    }

    let mut pdu = ParsedPdu {
        message_type,
        transaction_id: None,
        mms_version: None,
        from_insert_address: false,
        from: None,
        to: Vec::new(),
        subject: None,
        content_type: ParsedContentType::default(),
        declared_part_count: 0,
        parts: Vec::new(),
    };

    loop {
        let field = reader.read_byte("header field")?;
        match field {
            HEADER_TRANSACTION_ID => pdu.transaction_id = Some(reader.read_text("transaction id")?),
            HEADER_MMS_VERSION => {
                let version = reader.read_byte("mms version")? & 0x7F;
                pdu.mms_version = Some((version >> 4, version & 0x0F));
            }
            HEADER_FROM => {
                let len = reader.read_value_length("from")?;
                let mut value = PduReader::new(reader.take(len, "from")?);
                match value.read_byte("from")? {
                    INSERT_ADDRESS_TOKEN => pdu.from_insert_address = true,
                    ADDRESS_PRESENT_TOKEN => pdu.from = Some(value.read_encoded_string("from")?),
                    _ => {}
                }
            }
            HEADER_TO => pdu.to.push(reader.read_encoded_string("to")?),
            HEADER_SUBJECT => pdu.subject = Some(reader.read_encoded_string("subject")?),
            HEADER_CONTENT_TYPE => {
                pdu.content_type = reader.read_content_type()?;
                break;
            }
            _ if field >= 0x80 => reader.skip_value("header value")?,
            _ => {
                // Application header: name and value are both text
                reader.pos -= 1;
                reader.read_text("header name")?;
                reader.read_text("header value")?;
            }
        }
    }

    pdu.declared_part_count = reader.read_uintvar("part count")?;

    for index in 0..pdu.declared_part_count as usize {
        let headers_len = reader.read_uintvar("part header length")? as usize;
        let data_len = reader.read_uintvar("part data length")? as usize;
        if reader.remaining() < headers_len + data_len {
            return Err(PduError::PartOverrun { index });
        }
        let headers = reader.take(headers_len, "part headers")?;
        let data = reader.take(data_len, "part data")?;
        pdu.parts.push(parse_part(headers, data)?);
    }

    if !reader.is_empty() {
        return Err(PduError::TrailingData(reader.remaining()));
    }

    Ok(pdu)
}

fn parse_part(headers: &[u8], data: &[u8]) -> Result<ParsedPart, PduError> {
    let mut reader = PduReader::new(headers);
    let content_type = reader.read_content_type()?;
    let mut content_location = None;
    let mut content_id = None;

    while !reader.is_empty() {
        let field = reader.read_byte("part header")?;
        match field {
            PART_CONTENT_LOCATION => content_location = Some(reader.read_text("content location")?),
            PART_CONTENT_ID => content_id = Some(reader.read_text("content id")?),
            _ if field >= 0x80 => reader.skip_value("part header value")?,
            _ => {
                reader.pos -= 1;
                reader.read_text("part header name")?;
                reader.read_text("part header value")?;
            }
        }
    }

    Ok(ParsedPart {
        content_type,
        content_location,
        content_id,
        data: data.to_vec(),
        size: data.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mms::pdu::encode_send_request_with_transaction_id;
    use crate::mms::{Attachment, MmsSendRequest};

    fn full_request() -> MmsSendRequest {
        MmsSendRequest::new("+15551234567")
            .with_text("hi")
            .with_attachment(Attachment::new(vec![0xFF, 0xD8, 0xFF, 0xD9], "image/jpeg"))
    }

    #[test]
    fn test_parse_encoded_headers() {
        let bytes = encode_send_request_with_transaction_id(&full_request(), "T42");
        let pdu = parse_send_request(&bytes).unwrap();

        assert_eq!(pdu.message_type, MESSAGE_TYPE_SEND_REQ);
        assert_eq!(pdu.transaction_id.as_deref(), Some("T42"));
        assert_eq!(pdu.mms_version, Some((1, 2)));
        assert!(pdu.from_insert_address);
        assert_eq!(pdu.to, vec!["+15551234567".to_string()]);
        assert_eq!(pdu.subject, None);
        assert_eq!(
            pdu.content_type.media_type,
            "application/vnd.wap.multipart.related"
        );
        assert_eq!(pdu.content_type.start.as_deref(), Some("<smil>"));
        assert_eq!(
            pdu.content_type.related_type.as_deref(),
            Some("application/smil")
        );
    }

    #[test]
    fn test_declared_part_count_matches_parts() {
        let bytes = encode_send_request_with_transaction_id(&full_request(), "T42");
        let pdu = parse_send_request(&bytes).unwrap();

        assert_eq!(pdu.declared_part_count, 3);
        assert_eq!(pdu.parts.len(), 3);

        assert_eq!(pdu.parts[0].content_type.media_type, "application/smil");
        assert_eq!(pdu.parts[0].content_id.as_deref(), Some("<smil>"));
        assert_eq!(pdu.parts[1].content_type.media_type, "text/plain");
        assert_eq!(pdu.parts[1].content_type.charset, Some(106));
        assert_eq!(pdu.parts[1].data, b"hi".to_vec());
        assert_eq!(pdu.parts[2].content_type.media_type, "image/jpeg");
        assert_eq!(pdu.parts[2].content_location.as_deref(), Some("image.jpg"));
        assert_eq!(pdu.parts[2].content_id.as_deref(), Some("<image.jpg>"));
        assert_eq!(pdu.parts[2].size, 4);
    }

    #[test]
    fn test_unicode_subject_round_trips() {
        let request = full_request().with_subject("Grüße");
        let bytes = encode_send_request_with_transaction_id(&request, "T1");
        let pdu = parse_send_request(&bytes).unwrap();
        assert_eq!(pdu.subject.as_deref(), Some("Grüße"));
    }

    #[test]
    fn test_large_attachment_uses_multibyte_lengths() {
        let data = vec![0xAB; 70_000];
        let request = MmsSendRequest::new("5551234")
            .with_attachment(Attachment::new(data.clone(), "image/png"));
        let bytes = encode_send_request_with_transaction_id(&request, "T1");
        let pdu = parse_send_request(&bytes).unwrap();

        assert_eq!(pdu.parts.len(), 2);
        assert_eq!(pdu.parts[1].content_type.media_type, "image/png");
        assert_eq!(pdu.parts[1].data, data);
    }

    #[test]
    fn test_truncated_pdu_is_rejected() {
        let bytes = encode_send_request_with_transaction_id(&full_request(), "T42");
        let cut = &bytes[..bytes.len() - 2];
        assert!(matches!(
            parse_send_request(cut),
            Err(PduError::PartOverrun { index: 2 })
        ));
        assert!(matches!(
            parse_send_request(&bytes[..5]),
            Err(PduError::Truncated(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_are_reported() {
        let mut bytes = encode_send_request_with_transaction_id(&full_request(), "T42");
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(parse_send_request(&bytes), Err(PduError::TrailingData(2)));
    }

    #[test]
    fn test_wrong_message_type() {
        assert_eq!(
            parse_send_request(&[HEADER_MESSAGE_TYPE, 0x84]),
            Err(PduError::UnexpectedMessageType(0x84))
        );
        assert_eq!(
            parse_send_request(&[0x98, b'T', 0x00]),
            Err(PduError::MissingHeader("X-Mms-Message-Type"))
        );
    }
}
