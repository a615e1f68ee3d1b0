//! Protocol Module
//!
//! Defines the wire protocol spoken on the device's control port.
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Magic(1) │ Len (4)  │   Encrypted payload (Len)   │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! - Magic: always 0x10
//! - Len: big-endian, a positive multiple of 16
//! - Payload: AES-256-CBC of UTF-8 JSON plus 1..=16 pad bytes, fixed key and
//!   IV for every frame in both directions
//!
//! ### Request body
//! `{"cmd":"get","msg":"<KIND>"}`
//!
//! ### Response body
//! `{"msg":"<KIND>","result":"ok"|true,"data":{...}}`

mod cipher;
mod codec;
mod message;

pub use cipher::{pad_len, PayloadCipher, BLOCK_SIZE};
pub use codec::{DecodeStatus, PacketCodec, HEADER_SIZE, MAGIC};
pub use message::{ControlMessage, MessageKind};

/// Control TCP port on the device
pub const DEFAULT_PORT: u16 = 9741;

/// Pre-shared AES-256 key: `T^&*J%^7tr~4^%^&I(o%^!jIJ__+a0 k`
pub const DEFAULT_KEY: [u8; 32] = *b"T^&*J%^7tr~4^%^&I(o%^!jIJ__+a0 k";

/// Pre-shared IV: `'%^Ur7gy$~t+f)%@`
pub const DEFAULT_IV: [u8; 16] = *b"'%^Ur7gy$~t+f)%@";
