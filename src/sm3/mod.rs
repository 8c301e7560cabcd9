// Copyright 2020 Yao Pengfei.
//
// Permission to use, copy, modify, and/or distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHORS DISCLAIM ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR ANY
// SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN ACTION
// OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF OR IN
// CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.

//! SM3 hashing.

mod compress;

pub use compress::{compress_block, compress_blocks, BLOCK_LEN};

use compress::IV;

pub const DIGEST_LEN: usize = 32;

const PAD_LEN: usize = BLOCK_LEN - 8;

/// Streaming SM3. `finalize_reset` leaves the hasher ready for a new
/// message.
#[derive(Clone)]
pub struct Sm3 {
    state: [u32; 8],
    buffer: [u8; BLOCK_LEN],
    buffer_len: usize,
    /// Total bytes absorbed.
    length: u64,
}

impl Default for Sm3 {
    fn default() -> Self {
        Sm3::new()
    }
}

impl Sm3 {
    pub fn new() -> Self {
        Sm3 {
            state: IV,
            buffer: [0; BLOCK_LEN],
            buffer_len: 0,
            length: 0,
        }
    }

    pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut hasher = Sm3::new();
        hasher.update(data);
        hasher.finalize()
    }

    pub fn update(&mut self, mut data: &[u8]) {
        self.length = self.length.wrapping_add(data.len() as u64);

        if self.buffer_len > 0 {
            let take = (BLOCK_LEN - self.buffer_len).min(data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];
            if self.buffer_len < BLOCK_LEN {
                return;
            }
            compress_block(&mut self.state, &self.buffer);
            self.buffer_len = 0;
        }

        let mut chunks = data.chunks_exact(BLOCK_LEN);
        let mut block = [0u8; BLOCK_LEN];
        for chunk in &mut chunks {
            block.copy_from_slice(chunk);
            compress_block(&mut self.state, &block);
        }

        let rest = chunks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffer_len = rest.len();
    }

    pub fn finalize(mut self) -> [u8; DIGEST_LEN] {
        self.finalize_reset()
    }

    pub fn finalize_reset(&mut self) -> [u8; DIGEST_LEN] {
        let out = self.get_hash();
        *self = Sm3::new();
        out
    }

    /// Digest of everything absorbed so far, without disturbing the hasher.
    pub fn get_hash(&self) -> [u8; DIGEST_LEN] {
        let mut state = self.state;
        let mut block = self.buffer;
        let bit_len = self.length.wrapping_mul(8);

        block[self.buffer_len] = 0x80;
        for b in block[self.buffer_len + 1..].iter_mut() {
            *b = 0;
        }
        if self.buffer_len >= PAD_LEN {
            compress_block(&mut state, &block);
            block = [0; BLOCK_LEN];
        }
        block[PAD_LEN..].copy_from_slice(&bit_len.to_be_bytes());
        compress_block(&mut state, &block);

        let mut out = [0; DIGEST_LEN];
        for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn abc() {
        assert_eq!(
            Sm3::digest(b"abc"),
            hex!("66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0")
        );
    }

    #[test]
    fn two_blocks() {
        let data = b"abcd".repeat(16);
        assert_eq!(
            Sm3::digest(&data),
            hex!("debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732")
        );
    }

    #[test]
    fn chunked_updates_agree() {
        let data: Vec<u8> = (0..300u32).map(|i| (i * 7 + 3) as u8).collect();
        let whole = Sm3::digest(&data);
        for split in &[1usize, 55, 56, 63, 64, 65, 128, 299] {
            let mut hasher = Sm3::new();
            for chunk in data.chunks(*split) {
                hasher.update(chunk);
            }
            assert_eq!(hasher.finalize(), whole, "chunk size {}", split);
        }
    }

    #[test]
    fn finalize_reset_starts_over() {
        let mut hasher = Sm3::new();
        hasher.update(b"some prefix");
        let _ = hasher.finalize_reset();
        hasher.update(b"abc");
        assert_eq!(hasher.get_hash(), Sm3::digest(b"abc"));
        assert_eq!(hasher.finalize_reset(), Sm3::digest(b"abc"));
        assert_eq!(hasher.finalize(), Sm3::digest(b""));
    }

    #[test]
    fn agrees_with_libsm() {
        for len in &[0usize, 1, 55, 56, 64, 119, 1000] {
            let data: Vec<u8> = (0..*len).map(|i| (i % 251) as u8).collect();
            let expected = libsm::sm3::hash::Sm3Hash::new(&data).get_hash();
            assert_eq!(&Sm3::digest(&data)[..], &expected[..], "len {}", len);
        }
    }
}
