use super::PduError;

/// Largest value a uintvar may carry (32 bits, at most 5 encoded bytes).
const MAX_UINTVAR_BYTES: usize = 5;

/// Encode a WSP variable-length unsigned integer.
///
/// Values below 0x80 take one byte. Larger values are split into 7-bit groups,
/// most significant first, with the continuation bit set on every group but the last.
pub fn encode_uintvar(value: u32) -> Vec<u8> {
    let mut groups = Vec::with_capacity(MAX_UINTVAR_BYTES);
    let mut remaining = value;

    groups.push((remaining & 0x7F) as u8);
    remaining >>= 7;
    while remaining > 0 {
        groups.push(((remaining & 0x7F) as u8) | 0x80);
        remaining >>= 7;
    }

    groups.reverse();
    groups
}

/// Decode a uintvar from the front of `bytes`.
/// Returns the value and the number of bytes consumed.
pub fn decode_uintvar(bytes: &[u8]) -> Result<(u32, usize), PduError> {
    let mut value: u64 = 0;

    for (i, byte) in bytes.iter().enumerate() {
        if i >= MAX_UINTVAR_BYTES {
            return Err(PduError::InvalidUintvar);
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            let value = u32::try_from(value).map_err(|_| PduError::InvalidUintvar)?;
            return Ok((value, i + 1));
        }
    }

    Err(PduError::Truncated("uintvar"))
}
