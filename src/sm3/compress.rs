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

//! The SM3 compression function.

pub const BLOCK_LEN: usize = 64;

pub(crate) const IV: [u32; 8] = [
    0x7380166f, 0x4914b2b9, 0x172442d7, 0xda8a0600, 0xa96f30bc, 0x163138aa, 0xe38dee4d, 0xb0fb0e4e,
];

const T_LOW: u32 = 0x79cc4519;
const T_HIGH: u32 = 0x7a879d8a;

/// Round constants, pre-rotated by the round index.
const T: [u32; 64] = round_constants();

const fn round_constants() -> [u32; 64] {
    let mut t = [0; 64];
    let mut j = 0;
    while j < 64 {
        t[j] = if j < 16 {
            T_LOW.rotate_left(j as u32)
        } else {
            T_HIGH.rotate_left((j % 32) as u32)
        };
        j += 1;
    }
    t
}

#[inline(always)]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline(always)]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

#[inline(always)]
fn ff1(x: u32, y: u32, z: u32) -> u32 {
    ((y ^ x) & (y ^ z)) ^ y
}

#[inline(always)]
fn gg1(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}

/// Expands W[j..j + 4] together. Lanes 0 to 2 only need words that already
/// exist; lane 3 depends on W[j] from lane 0, so it is first computed with
/// that term missing and then redone.
#[inline(always)]
fn schedule_4(w: &mut [u32; 68], j: usize) {
    let mut lanes = [0u32; 4];
    for (i, lane) in lanes.iter_mut().enumerate() {
        let back3 = if i < 3 { w[j + i - 3] } else { 0 };
        *lane = p1(w[j + i - 16] ^ w[j + i - 9] ^ back3.rotate_left(15))
            ^ w[j + i - 13].rotate_left(7)
            ^ w[j + i - 6];
    }
    w[j..j + 4].copy_from_slice(&lanes);

    w[j + 3] = p1(w[j - 13] ^ w[j - 6] ^ w[j].rotate_left(15)) ^ w[j - 10].rotate_left(7) ^ w[j - 3];
}

fn expand(block: &[u8; BLOCK_LEN]) -> [u32; 68] {
    let mut w = [0u32; 68];
    for (i, chunk) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    let mut j = 16;
    while j < 68 {
        schedule_4(&mut w, j);
        j += 4;
    }
    w
}

/// Compresses one 64-byte block, read as big-endian words, into `state`.
pub fn compress_block(state: &mut [u32; 8], block: &[u8; BLOCK_LEN]) {
    let w = expand(block);

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for j in 0..64 {
        let a12 = a.rotate_left(12);
        let ss1 = a12.wrapping_add(e).wrapping_add(T[j]).rotate_left(7);
        let ss2 = ss1 ^ a12;
        let (ff, gg) = if j < 16 {
            (a ^ b ^ c, e ^ f ^ g)
        } else {
            (ff1(a, b, c), gg1(e, f, g))
        };
        let tt1 = ff.wrapping_add(d).wrapping_add(ss2).wrapping_add(w[j] ^ w[j + 4]);
        let tt2 = gg.wrapping_add(h).wrapping_add(ss1).wrapping_add(w[j]);

        d = c;
        c = b.rotate_left(9);
        b = a;
        a = tt1;
        h = g;
        g = f.rotate_left(19);
        f = e;
        e = p0(tt2);
    }

    state[0] ^= a;
    state[1] ^= b;
    state[2] ^= c;
    state[3] ^= d;
    state[4] ^= e;
    state[5] ^= f;
    state[6] ^= g;
    state[7] ^= h;
}

/// Compresses consecutive blocks in order.
pub fn compress_blocks(state: &mut [u32; 8], blocks: &[[u8; BLOCK_LEN]]) {
    for block in blocks {
        compress_block(state, block);
    }
}
