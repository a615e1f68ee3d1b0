//! Packet codec
//!
//! Encoding and decoding of encrypted frames.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────────────┐
//! │ 0x10 (1) │ Len (4)  │  AES-256-CBC(payload ‖ padding)     │
//! └──────────┴──────────┴─────────────────────────────────────┘
//! ```
//!
//! `Len` is big-endian and counts the encrypted bytes only. Padding is
//! 1..=16 bytes, each holding the pad length, so an aligned plaintext
//! still gains a whole block.
//!
//! Both directions support two-phase sizing: an undersized target
//! (including an empty one) reports the size it needs instead of failing
//! outright, so callers can supply their own buffers.

use bytes::{Buf, BufMut, Bytes};

use super::cipher::{pad_len, PayloadCipher, BLOCK_SIZE};
use crate::config::CipherParams;
use crate::error::{Result, SpkError};

/// Frame start marker
pub const MAGIC: u8 = 0x10;

/// Header size: 1 byte magic + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Outcome of a decode attempt that did not hit a protocol violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The window holds no complete frame yet
    NeedMoreData,

    /// A complete frame is present but the target cannot hold `required` bytes
    BufferTooSmall { required: usize },

    /// A frame was decrypted; `len` plaintext bytes are at the front of the target
    Decoded { len: usize },
}

/// Encoder/decoder for the encrypted, length-prefixed frames
pub struct PacketCodec {
    cipher: PayloadCipher,
}

impl PacketCodec {
    /// Create a codec bound to the given key and IV
    pub fn new(params: &CipherParams) -> Self {
        Self {
            cipher: PayloadCipher::new(params),
        }
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    /// Size of the frame produced for a plaintext of `plaintext_len` bytes
    pub fn encoded_len(plaintext_len: usize) -> usize {
        HEADER_SIZE + plaintext_len + pad_len(plaintext_len)
    }

    /// Encode `plaintext` into `out`, returning the number of bytes written
    ///
    /// Fails with `BufferTooSmall` carrying the required size when `out` is
    /// too short; pass an empty slice to query the size.
    pub fn encode_into(&self, plaintext: &[u8], out: &mut [u8]) -> Result<usize> {
        let required = Self::encoded_len(plaintext.len());
        if out.len() < required {
            return Err(SpkError::BufferTooSmall {
                required,
                capacity: out.len(),
            });
        }
        if plaintext.is_empty() {
            return Err(SpkError::InvalidArgument(
                "cannot encode an empty payload".to_string(),
            ));
        }

        let payload_len = required - HEADER_SIZE;
        let wire_len = u32::try_from(payload_len).map_err(|_| {
            SpkError::InvalidArgument(format!(
                "payload of {} bytes does not fit the length field",
                payload_len
            ))
        })?;

        let (mut header, rest) = out.split_at_mut(HEADER_SIZE);
        header.put_u8(MAGIC);
        header.put_u32(wire_len);

        // Pad in place, then encrypt the whole payload region
        let payload = &mut rest[..payload_len];
        let pad = payload_len - plaintext.len();
        payload[..plaintext.len()].copy_from_slice(plaintext);
        payload[plaintext.len()..].fill(pad as u8);
        self.cipher.encrypt_blocks(payload);

        Ok(required)
    }

    /// Encode `plaintext` into a freshly allocated frame
    pub fn encode(&self, plaintext: &[u8]) -> Result<Bytes> {
        let required = Self::encoded_len(plaintext.len());

        let mut frame = Vec::new();
        frame.try_reserve_exact(required).map_err(|e| {
            SpkError::OutOfMemory(format!("frame of {} bytes: {}", required, e))
        })?;
        frame.resize(required, 0);

        let written = self.encode_into(plaintext, &mut frame)?;
        frame.truncate(written);
        Ok(Bytes::from(frame))
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    /// Try to decode one frame from `buf`, starting the scan at `*offset`
    ///
    /// Offset handling:
    /// - no magic byte in the window: `*offset` moves to the end of `buf`,
    ///   the scanned bytes are garbage
    /// - magic found but frame incomplete, or target too small: `*offset`
    ///   rests on the magic byte so the frame is retried later
    /// - frame consumed (decoded or malformed): `*offset` points just past it
    ///
    /// On success the plaintext is followed by a zero byte in `out`.
    pub fn decode_into(
        &self,
        buf: &[u8],
        offset: &mut usize,
        out: &mut [u8],
    ) -> Result<DecodeStatus> {
        if *offset >= buf.len() {
            return Err(SpkError::InvalidArgument(format!(
                "offset {} outside window of {} bytes",
                *offset,
                buf.len()
            )));
        }

        // Resynchronize on the next frame marker
        let start = match buf[*offset..].iter().position(|&b| b == MAGIC) {
            Some(pos) => *offset + pos,
            None => {
                tracing::trace!("No frame marker in {} bytes, dropping", buf.len() - *offset);
                *offset = buf.len();
                return Ok(DecodeStatus::NeedMoreData);
            }
        };
        if start > *offset {
            tracing::debug!("Skipped {} bytes before frame marker", start - *offset);
        }
        *offset = start;

        // Length field
        if buf.len() - start < HEADER_SIZE {
            return Ok(DecodeStatus::NeedMoreData);
        }
        let payload_len = (&buf[start + 1..start + HEADER_SIZE]).get_u32() as usize;

        // Payload
        let payload_start = start + HEADER_SIZE;
        if buf.len() - payload_start < payload_len {
            return Ok(DecodeStatus::NeedMoreData);
        }
        if out.len() < payload_len {
            return Ok(DecodeStatus::BufferTooSmall {
                required: payload_len,
            });
        }

        *offset = payload_start + payload_len;

        if payload_len == 0 || payload_len % BLOCK_SIZE != 0 {
            return Err(SpkError::MalformedPayload(format!(
                "payload length {} is not a positive multiple of {}",
                payload_len, BLOCK_SIZE
            )));
        }

        let plain = &mut out[..payload_len];
        plain.copy_from_slice(&buf[payload_start..payload_start + payload_len]);
        self.cipher.decrypt_blocks(plain);

        let pad = plain[payload_len - 1] as usize;
        if pad == 0 || pad > BLOCK_SIZE {
            return Err(SpkError::MalformedPayload(format!(
                "invalid pad length {}",
                pad
            )));
        }

        let len = payload_len - pad;
        out[len] = 0;
        Ok(DecodeStatus::Decoded { len })
    }

    /// Decode one frame into an owned buffer
    ///
    /// Returns `Ok(None)` when more data is needed; `*offset` is updated
    /// exactly as in [`PacketCodec::decode_into`].
    pub fn decode(&self, buf: &[u8], offset: &mut usize) -> Result<Option<Vec<u8>>> {
        let required = match self.decode_into(buf, offset, &mut [])? {
            DecodeStatus::NeedMoreData => return Ok(None),
            DecodeStatus::BufferTooSmall { required } => required,
            // Only a zero-length frame fits an empty target, and that is
            // rejected as malformed before this point.
            DecodeStatus::Decoded { len } => {
                return Err(SpkError::MalformedPayload(format!(
                    "unexpected {} byte frame",
                    len
                )))
            }
        };

        let mut payload = Vec::new();
        payload.try_reserve_exact(required).map_err(|e| {
            SpkError::OutOfMemory(format!("payload of {} bytes: {}", required, e))
        })?;
        payload.resize(required, 0);

        match self.decode_into(buf, offset, &mut payload)? {
            DecodeStatus::Decoded { len } => {
                payload.truncate(len);
                Ok(Some(payload))
            }
            status => Err(SpkError::MalformedPayload(format!(
                "frame changed between sizing and decoding: {:?}",
                status
            ))),
        }
    }
}
