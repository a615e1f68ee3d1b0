//! Configuration for spkctl
//!
//! Centralized configuration with sensible defaults.

use crate::protocol::{DEFAULT_IV, DEFAULT_KEY, DEFAULT_PORT};

/// Largest decoded response accepted by default (bytes)
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 4096;

/// Main configuration for a control session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Device address: host name, IPv4, or IPv6 literal, optionally with a port
    pub host: String,

    /// Control port used when `host` carries none
    pub port: u16,

    /// Connect timeout (milliseconds, 0 = block)
    pub connect_timeout_ms: u64,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Framing Configuration
    // -------------------------------------------------------------------------
    /// Largest decoded payload accepted.
    /// The receive buffer is sized to twice this.
    pub max_response_size: usize,

    // -------------------------------------------------------------------------
    // Cipher Configuration
    // -------------------------------------------------------------------------
    /// Pre-shared key and IV
    pub cipher: CipherParams,
}

/// Fixed AES-256-CBC parameters shared by both peers
#[derive(Clone, PartialEq, Eq)]
pub struct CipherParams {
    pub key: [u8; 32],
    pub iv: [u8; 16],
}

impl Default for CipherParams {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY,
            iv: DEFAULT_IV,
        }
    }
}

// Keep the key material out of debug logs.
impl std::fmt::Debug for CipherParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherParams")
            .field("key", &"<32 bytes>")
            .field("iv", &"<16 bytes>")
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            cipher: CipherParams::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Capacity of the receive buffer (twice the largest response)
    pub fn receive_buffer_size(&self) -> usize {
        self.max_response_size.saturating_mul(2)
    }

    /// `host:port` string suitable for `ToSocketAddrs`
    ///
    /// A host that already names a port keeps it. Bare IPv6 literals are
    /// bracketed before the port is appended.
    pub fn socket_addr_string(&self) -> String {
        let host = self.host.trim();
        if host.starts_with('[') {
            if host.contains("]:") {
                return host.to_string();
            }
            return format!("{}:{}", host, self.port);
        }
        match host.matches(':').count() {
            0 => format!("{}:{}", host, self.port),
            1 => host.to_string(),
            _ => format!("[{}]:{}", host, self.port),
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the device address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the default control port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the largest decoded response (in bytes)
    pub fn max_response_size(mut self, size: usize) -> Self {
        self.config.max_response_size = size;
        self
    }

    /// Override the cipher parameters
    pub fn cipher(mut self, cipher: CipherParams) -> Self {
        self.config.cipher = cipher;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
