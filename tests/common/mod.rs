//! Shared test doubles
//!
//! An in-memory duplex stream that hands out scripted read chunks and
//! records everything written to it.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use spkctl::config::CipherParams;
use spkctl::PacketCodec;

/// What the next `read` call returns
pub enum Step {
    Data(Vec<u8>),
    Fail(io::ErrorKind),
}

/// Scripted transport
///
/// Each `read` returns at most one scripted chunk (or part of it when the
/// caller's buffer is smaller). Once the script runs out, reads return 0.
#[derive(Default)]
pub struct ScriptedStream {
    steps: VecDeque<Step>,
    pub written: Vec<u8>,
    pub reads: usize,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `bytes` in a single read
    pub fn chunk(mut self, bytes: &[u8]) -> Self {
        self.steps.push_back(Step::Data(bytes.to_vec()));
        self
    }

    /// Deliver `bytes` in reads of at most `size` bytes each
    pub fn chunks(mut self, bytes: &[u8], size: usize) -> Self {
        for piece in bytes.chunks(size) {
            self.steps.push_back(Step::Data(piece.to_vec()));
        }
        self
    }

    /// Fail the next read with `kind`
    pub fn fail(mut self, kind: io::ErrorKind) -> Self {
        self.steps.push_back(Step::Fail(kind));
        self
    }

    /// Steps not consumed yet
    pub fn pending(&self) -> usize {
        self.steps.len()
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        match self.steps.pop_front() {
            None => Ok(0),
            Some(Step::Fail(kind)) => Err(io::Error::new(kind, "scripted failure")),
            Some(Step::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    let rest = data.split_off(n);
                    self.steps.push_front(Step::Data(rest));
                }
                Ok(n)
            }
        }
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn codec() -> PacketCodec {
    PacketCodec::new(&CipherParams::default())
}

/// Encrypted frame for a plaintext, as the device would send it
pub fn frame(plaintext: &[u8]) -> Vec<u8> {
    codec().encode(plaintext).unwrap().to_vec()
}
