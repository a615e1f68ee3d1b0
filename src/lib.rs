//! # spkctl
//!
//! Client for the control channel of networked soundbars:
//! - Encrypted, length-framed JSON over TCP (port 9741)
//! - Stream reassembly tolerant of arbitrary fragmentation
//! - Envelope validation and labelled, indented rendering of responses
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CLI driver                             │
//! │             (one kind at a time, in order)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Client                                 │
//! │          (send request / receive response)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────────┐
//!   │ PacketCodec │◄─────────│ StreamReassembler│
//!   │ (AES + hdr) │          │ (ReceiveBuffer)  │
//!   └─────────────┘          └──────────────────┘
//!                                   │ decoded JSON
//!                                   ▼
//!                 ┌──────────────────────────────────┐
//!                 │ ResponseValidator → Renderer     │
//!                 │   (label tables per kind)        │
//!                 └──────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod response;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Rejection, Result, SpkError};
pub use config::{CipherParams, Config};
pub use network::Client;
pub use protocol::{MessageKind, PacketCodec};
pub use response::{LabelAssociations, ResponseRenderer, ResponseValidator};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of spkctl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
