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

//! Machine words. The arithmetic is written for four 64-bit limbs on every
//! target; `u128` covers the double-width products.

pub type Limb = u64;
pub type DoubleLimb = u128;
pub const LIMB_BITS: usize = 64;
pub const LIMB_FULL: Limb = 0xffff_ffff_ffff_ffff;
pub const LIMB_LENGTH: usize = 4;
pub const LIMB_BYTES: usize = (LIMB_BITS + 7) / 8;
pub const ONE: [Limb; LIMB_LENGTH] = [1, 0, 0, 0];
pub const ZERO: [Limb; LIMB_LENGTH] = [0; LIMB_LENGTH];

/// All ones when `bit` is 1, zero when it is 0. `bit` must be 0 or 1.
#[inline(always)]
pub fn limb_mask(bit: Limb) -> Limb {
    bit.wrapping_neg()
}

/// All ones when `x` is non-zero.
#[inline(always)]
pub fn limb_nonzero_mask(x: Limb) -> Limb {
    limb_mask((x | x.wrapping_neg()) >> (LIMB_BITS - 1))
}

/// Picks `a` where `mask` is all ones and `b` where it is zero.
#[inline(always)]
pub fn limb_select(mask: Limb, a: Limb, b: Limb) -> Limb {
    (a & mask) | (b & !mask)
}
