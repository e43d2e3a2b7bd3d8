use byteorder::{ByteOrder, LittleEndian};

use crate::constants::LENGTH_PREFIX_LEN;
use crate::framing::types::{FrameError, PacketRecord};

/// Pull-based scanner over a raw recording buffer.
///
/// Layout:
///
/// ```text
/// [ len (2, LE) ][ payload (len) ][ len (2, LE) ][ payload (len) ] ...
/// ```
///
/// Yields one `PacketRecord` per record in buffer order. The first framing
/// error is yielded once, after which the framer is exhausted. Scanning the
/// same buffer again requires a new framer.
#[derive(Debug, Clone)]
pub struct PacketFramer<'a> {
    buf: &'a [u8],
    cursor: usize,
    failed: bool,
}

impl<'a> PacketFramer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            cursor: 0,
            failed: false,
        }
    }

    /// Offset of the next length prefix.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.cursor
    }

    /// True once a framing error has been reported.
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    fn fail(&mut self, err: FrameError) -> Option<Result<PacketRecord<'a>, FrameError>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for PacketFramer<'a> {
    type Item = Result<PacketRecord<'a>, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let offset = self.cursor;
        let remaining = self.remaining();

        // Clean end of stream only on an exact record boundary.
        if remaining == 0 {
            return None;
        }
        if remaining < LENGTH_PREFIX_LEN {
            return self.fail(FrameError::TruncatedPrefix {
                offset,
                available: remaining,
            });
        }

        let declared = LittleEndian::read_u16(&self.buf[offset..offset + LENGTH_PREFIX_LEN]) as usize;
        let start = offset + LENGTH_PREFIX_LEN;
        let available = self.buf.len() - start;

        if declared > available {
            return self.fail(FrameError::TruncatedPayload {
                offset,
                declared,
                available,
            });
        }

        let end = start + declared;
        self.cursor = end;

        Some(Ok(PacketRecord {
            offset,
            length: declared,
            payload: &self.buf[start..end],
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        // Every record (or error) consumes at least one byte.
        (0, Some(self.remaining().div_ceil(LENGTH_PREFIX_LEN)))
    }
}

impl std::iter::FusedIterator for PacketFramer<'_> {}
