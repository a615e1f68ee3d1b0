//! Stream Reassembler
//!
//! Turns a fragmented byte stream back into whole decoded responses.

use std::io::{ErrorKind, Read};

use crate::error::{Result, SpkError};
use crate::protocol::{DecodeStatus, PacketCodec};

/// Fixed-capacity window of bytes received but not yet consumed
///
/// Consumed bytes are dropped by shifting the remainder to the front, so
/// the window never grows past its initial capacity.
#[derive(Debug)]
pub struct ReceiveBuffer {
    data: Vec<u8>,
    filled: usize,
}

impl ReceiveBuffer {
    /// Allocate a window of `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            data: zeroed(capacity, "receive buffer")?,
            filled: 0,
        })
    }

    /// Total window size
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes currently held
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.data.len()
    }

    /// Bytes received so far
    pub fn filled(&self) -> &[u8] {
        &self.data[..self.filled]
    }

    /// Read once from `reader` into the unused tail
    ///
    /// A zero-length read means the peer closed the connection.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        loop {
            match reader.read(&mut self.data[self.filled..]) {
                Ok(0) => return Err(SpkError::ConnectionClosed),
                Ok(n) => {
                    self.filled += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Drop the first `consumed` bytes and move the rest to the front
    pub fn compact(&mut self, consumed: usize) {
        let consumed = consumed.min(self.filled);
        if consumed == 0 {
            return;
        }
        self.data.copy_within(consumed..self.filled, 0);
        self.filled -= consumed;
    }
}

/// Pulls complete responses out of a transport
///
/// One reassembler serves one connection. Bytes that arrive after a frame
/// stay buffered for the next call.
pub struct StreamReassembler {
    buffer: ReceiveBuffer,
    payload: Vec<u8>,
}

impl StreamReassembler {
    /// Create a reassembler for responses of at most `max_response_size`
    /// decoded bytes. The receive window is twice that.
    pub fn new(max_response_size: usize) -> Result<Self> {
        if max_response_size == 0 {
            return Err(SpkError::InvalidArgument(
                "max response size must be positive".to_string(),
            ));
        }
        let window = max_response_size.checked_mul(2).ok_or_else(|| {
            SpkError::InvalidArgument(format!(
                "max response size {} is too large",
                max_response_size
            ))
        })?;

        Ok(Self {
            buffer: ReceiveBuffer::with_capacity(window)?,
            payload: zeroed(max_response_size, "response buffer")?,
        })
    }

    /// Largest decoded response accepted
    pub fn max_response_size(&self) -> usize {
        self.payload.len()
    }

    /// Bytes held back for the next response
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Block until one complete response has been decoded
    ///
    /// Returns the decrypted, unpadded payload. Fails on transport errors,
    /// on a zero-length read, on a malformed payload, on a frame longer
    /// than the response limit, and when the window fills up without ever
    /// containing a whole frame.
    pub fn next_response<R: Read>(&mut self, codec: &PacketCodec, reader: &mut R) -> Result<&[u8]> {
        // A previous read may already have delivered this frame
        if !self.buffer.is_empty() {
            if let Some(len) = self.try_decode(codec)? {
                return Ok(&self.payload[..len]);
            }
        }

        loop {
            if self.buffer.is_full() {
                return Err(SpkError::FrameTooLarge {
                    capacity: self.buffer.capacity(),
                });
            }

            let n = self.buffer.fill_from(reader)?;
            tracing::trace!("Read {} bytes, {} buffered", n, self.buffer.len());

            if let Some(len) = self.try_decode(codec)? {
                return Ok(&self.payload[..len]);
            }
        }
    }

    /// One decode attempt over the buffered bytes, compacting afterwards
    fn try_decode(&mut self, codec: &PacketCodec) -> Result<Option<usize>> {
        let mut offset = 0;
        let result = codec.decode_into(self.buffer.filled(), &mut offset, &mut self.payload);
        self.buffer.compact(offset);

        match result? {
            DecodeStatus::NeedMoreData => Ok(None),
            DecodeStatus::BufferTooSmall { required } => Err(SpkError::ResponseTooLarge {
                required,
                capacity: self.payload.len(),
            }),
            DecodeStatus::Decoded { len } => {
                tracing::trace!("Decoded {} byte response, {} left over", len, self.buffer.len());
                Ok(Some(len))
            }
        }
    }
}

fn zeroed(size: usize, what: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|e| SpkError::OutOfMemory(format!("{} of {} bytes: {}", what, size, e)))?;
    buf.resize(size, 0);
    Ok(buf)
}
