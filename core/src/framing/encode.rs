use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{LENGTH_PREFIX_LEN, MAX_PACKET_LEN};
use crate::framing::types::FrameError;

/// Append one length-prefixed record to `out`.
///
/// Layout:
///
/// ```text
/// [ len (2, LE) ]
/// [ payload (len) ]
/// ```
pub fn encode_packet(payload: &[u8], out: &mut Vec<u8>) -> Result<(), FrameError> {
    if payload.len() > MAX_PACKET_LEN {
        return Err(FrameError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_PACKET_LEN,
        });
    }

    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    LittleEndian::write_u16(&mut prefix, payload.len() as u16);

    out.reserve(LENGTH_PREFIX_LEN + payload.len());
    out.extend_from_slice(&prefix);
    out.extend_from_slice(payload);
    Ok(())
}

/// Concatenate payloads into a raw recording buffer.
pub fn frame_packets<I, P>(payloads: I) -> Result<Vec<u8>, FrameError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    let mut out = Vec::new();
    for payload in payloads {
        encode_packet(payload.as_ref(), &mut out)?;
    }
    Ok(out)
}
