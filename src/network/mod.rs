//! Network Module
//!
//! TCP session handling on the client side.
//!
//! ## Architecture
//! - One blocking connection per session
//! - One request in flight at a time
//! - Receive window reused across requests on the same connection

mod client;
mod reassembler;

pub use client::Client;
pub use reassembler::{ReceiveBuffer, StreamReassembler};
