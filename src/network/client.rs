//! Control Client
//!
//! Owns one connection to the device and runs request/response exchanges
//! over it, strictly one at a time.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde_json::Value;

use super::reassembler::StreamReassembler;
use crate::config::Config;
use crate::error::{Result, SpkError};
use crate::protocol::{ControlMessage, MessageKind, PacketCodec};

/// A control session over any blocking byte stream
pub struct Client<S> {
    /// Transport (a `TcpStream` outside of tests)
    stream: S,

    /// Frame encoder/decoder bound to the session's key and IV
    codec: PacketCodec,

    /// Receive-side state, lives as long as the connection
    reassembler: StreamReassembler,

    /// Peer address for logging
    peer_addr: String,
}

impl Client<TcpStream> {
    /// Resolve the configured address and connect to the first reachable one
    pub fn connect(config: &Config) -> Result<Self> {
        let target = config.socket_addr_string();
        let addrs: Vec<SocketAddr> = target
            .to_socket_addrs()
            .map_err(|e| SpkError::AddressResolution(format!("{}: {}", target, e)))?
            .collect();
        if addrs.is_empty() {
            return Err(SpkError::AddressResolution(format!(
                "{}: no addresses found",
                target
            )));
        }

        let mut last_err = None;
        for addr in &addrs {
            tracing::debug!("Connecting to {}", addr);
            let attempt = if config.connect_timeout_ms > 0 {
                TcpStream::connect_timeout(addr, Duration::from_millis(config.connect_timeout_ms))
            } else {
                TcpStream::connect(addr)
            };
            match attempt {
                Ok(stream) => return Self::from_tcp(stream, config),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err
            .map(SpkError::Io)
            .unwrap_or_else(|| SpkError::AddressResolution(target)))
    }

    /// Wrap an already connected socket, applying the configured timeouts
    pub fn from_tcp(stream: TcpStream, config: &Config) -> Result<Self> {
        stream.set_nodelay(true)?;
        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let mut client = Self::new(stream, config)?;
        client.peer_addr = peer_addr;
        tracing::debug!("Connection established to {}", client.peer_addr);
        Ok(client)
    }
}

impl<S: Read + Write> Client<S> {
    /// Create a session over an arbitrary stream
    pub fn new(stream: S, config: &Config) -> Result<Self> {
        Ok(Self {
            stream,
            codec: PacketCodec::new(&config.cipher),
            reassembler: StreamReassembler::new(config.max_response_size)?,
            peer_addr: config.socket_addr_string(),
        })
    }

    /// Encrypt, frame, and write one plaintext request
    pub fn send(&mut self, plaintext: &[u8]) -> Result<()> {
        let frame = self.codec.encode(plaintext)?;
        tracing::trace!("Sending {} byte frame to {}", frame.len(), self.peer_addr);
        self.stream.write_all(&frame)?;
        self.stream.flush()?;
        Ok(())
    }

    /// Block until the next complete response has arrived
    pub fn receive(&mut self) -> Result<&[u8]> {
        self.reassembler.next_response(&self.codec, &mut self.stream)
    }

    /// Send raw plaintext and return the decoded response text
    pub fn exchange(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.send(plaintext)?;
        Ok(self.receive()?.to_vec())
    }

    /// Ask the device for `kind` and parse the response envelope
    pub fn query(&mut self, kind: MessageKind) -> Result<Value> {
        let body = ControlMessage::get(kind).to_json()?;
        tracing::debug!("Requesting {} from {}", kind, self.peer_addr);

        self.send(&body)?;
        let response = self.receive()?;
        tracing::debug!("Received {} byte response for {}", response.len(), kind);

        Ok(serde_json::from_slice(response)?)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Give the transport back
    pub fn into_inner(self) -> S {
        self.stream
    }
}
