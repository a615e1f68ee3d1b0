//! Payload cipher
//!
//! AES-256 in CBC mode with a pre-shared key and IV. The IV is reset to the
//! configured constant for every payload, in both directions, so identical
//! plaintexts always produce identical ciphertexts. The device expects this.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;

use crate::config::CipherParams;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Number of padding bytes appended to a plaintext of `len` bytes (1..=16)
pub fn pad_len(len: usize) -> usize {
    BLOCK_SIZE - (len % BLOCK_SIZE)
}

/// AES-256-CBC over whole blocks, IV restarted per call
pub struct PayloadCipher {
    cipher: Aes256,
    iv: [u8; BLOCK_SIZE],
}

impl PayloadCipher {
    pub fn new(params: &CipherParams) -> Self {
        Self {
            cipher: Aes256::new((&params.key).into()),
            iv: params.iv,
        }
    }

    /// Encrypt `data` in place. Length must be a multiple of `BLOCK_SIZE`.
    pub fn encrypt_blocks(&self, data: &mut [u8]) {
        debug_assert_eq!(data.len() % BLOCK_SIZE, 0);

        let mut chain = self.iv;
        for block in data.chunks_exact_mut(BLOCK_SIZE) {
            for (b, c) in block.iter_mut().zip(chain.iter()) {
                *b ^= c;
            }
            self.cipher.encrypt_block(block.into());
            chain.copy_from_slice(block);
        }
    }

    /// Decrypt `data` in place. Length must be a multiple of `BLOCK_SIZE`.
    pub fn decrypt_blocks(&self, data: &mut [u8]) {
        debug_assert_eq!(data.len() % BLOCK_SIZE, 0);

        let mut chain = self.iv;
        let mut saved = [0u8; BLOCK_SIZE];
        for block in data.chunks_exact_mut(BLOCK_SIZE) {
            saved.copy_from_slice(block);
            self.cipher.decrypt_block(block.into());
            for (b, c) in block.iter_mut().zip(chain.iter()) {
                *b ^= c;
            }
            chain = saved;
        }
    }
}
