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

//! Multi-limb primitives with no modulus attached. Everything here runs in
//! time independent of the limb values: carries and borrows come back as
//! 0/1 limbs and are turned into masks by the caller.

use crate::err::Error;
use crate::limb::{
    limb_mask, limb_nonzero_mask, DoubleLimb, Limb, LIMB_BITS, LIMB_BYTES, LIMB_LENGTH,
};

pub type Wide = [Limb; LIMB_LENGTH * 2];

/// `a + b + carry`, returning the low limb and the carry out.
#[inline(always)]
pub(crate) fn adc(a: Limb, b: Limb, carry: Limb) -> (Limb, Limb) {
    let t = DoubleLimb::from(a) + DoubleLimb::from(b) + DoubleLimb::from(carry);
    (t as Limb, (t >> LIMB_BITS) as Limb)
}

/// `a - b - borrow`, returning the low limb and the borrow out (0 or 1).
#[inline(always)]
pub(crate) fn sbb(a: Limb, b: Limb, borrow: Limb) -> (Limb, Limb) {
    let t = DoubleLimb::from(a).wrapping_sub(DoubleLimb::from(b) + DoubleLimb::from(borrow));
    (t as Limb, (t >> (2 * LIMB_BITS - 1)) as Limb)
}

/// `acc + a * b + carry`, which never overflows a double limb.
#[inline(always)]
pub(crate) fn mac(acc: Limb, a: Limb, b: Limb, carry: Limb) -> (Limb, Limb) {
    let t = DoubleLimb::from(acc) + DoubleLimb::from(a) * DoubleLimb::from(b) + DoubleLimb::from(carry);
    (t as Limb, (t >> LIMB_BITS) as Limb)
}

#[inline]
pub(crate) fn norop_add(
    a: &[Limb; LIMB_LENGTH],
    b: &[Limb; LIMB_LENGTH],
) -> ([Limb; LIMB_LENGTH], Limb) {
    let mut r = [0; LIMB_LENGTH];
    let mut carry = 0;
    for i in 0..LIMB_LENGTH {
        let (t, c) = adc(a[i], b[i], carry);
        r[i] = t;
        carry = c;
    }
    (r, carry)
}

#[inline]
pub(crate) fn norop_sub(
    a: &[Limb; LIMB_LENGTH],
    b: &[Limb; LIMB_LENGTH],
) -> ([Limb; LIMB_LENGTH], Limb) {
    let mut r = [0; LIMB_LENGTH];
    let mut borrow = 0;
    for i in 0..LIMB_LENGTH {
        let (t, w) = sbb(a[i], b[i], borrow);
        r[i] = t;
        borrow = w;
    }
    (r, borrow)
}

/// `a + (m & mask)`; the carry out is returned.
#[inline]
pub(crate) fn norop_cond_add(
    a: &[Limb; LIMB_LENGTH],
    m: &[Limb; LIMB_LENGTH],
    mask: Limb,
) -> ([Limb; LIMB_LENGTH], Limb) {
    let mut masked = [0; LIMB_LENGTH];
    for i in 0..LIMB_LENGTH {
        masked[i] = m[i] & mask;
    }
    norop_add(a, &masked)
}

/// `a - (m & mask)`; the borrow out is returned.
#[inline]
pub(crate) fn norop_cond_sub(
    a: &[Limb; LIMB_LENGTH],
    m: &[Limb; LIMB_LENGTH],
    mask: Limb,
) -> ([Limb; LIMB_LENGTH], Limb) {
    let mut masked = [0; LIMB_LENGTH];
    for i in 0..LIMB_LENGTH {
        masked[i] = m[i] & mask;
    }
    norop_sub(a, &masked)
}

/// Schoolbook 4x4 limb product.
#[inline]
pub(crate) fn norop_mul(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> Wide {
    let mut r = [0; LIMB_LENGTH * 2];
    for i in 0..LIMB_LENGTH {
        let mut carry = 0;
        for j in 0..LIMB_LENGTH {
            let (t, c) = mac(r[i + j], a[i], b[j], carry);
            r[i + j] = t;
            carry = c;
        }
        r[i + LIMB_LENGTH] = carry;
    }
    r
}

/// Square of `a`: the six cross products are formed once and doubled, then
/// the diagonal squares are added in.
#[inline]
pub(crate) fn norop_sqr(a: &[Limb; LIMB_LENGTH]) -> Wide {
    let mut r = [0; LIMB_LENGTH * 2];

    for i in 0..LIMB_LENGTH - 1 {
        let mut carry = 0;
        for j in (i + 1)..LIMB_LENGTH {
            let (t, c) = mac(r[i + j], a[i], a[j], carry);
            r[i + j] = t;
            carry = c;
        }
        r[i + LIMB_LENGTH] = carry;
    }

    let mut top = 0;
    for limb in r.iter_mut() {
        let next = *limb >> (LIMB_BITS - 1);
        *limb = (*limb << 1) | top;
        top = next;
    }

    let mut carry = 0;
    for i in 0..LIMB_LENGTH {
        let (lo, c) = mac(r[2 * i], a[i], a[i], carry);
        r[2 * i] = lo;
        let (hi, c) = adc(r[2 * i + 1], 0, c);
        r[2 * i + 1] = hi;
        carry = c;
    }
    r
}

/// Shifts `a` right by one bit, feeding `hi` (0 or 1) into the top bit.
#[inline]
pub(crate) fn norop_rshift1(a: &[Limb; LIMB_LENGTH], hi: Limb) -> [Limb; LIMB_LENGTH] {
    let mut r = [0; LIMB_LENGTH];
    for i in 0..LIMB_LENGTH - 1 {
        r[i] = (a[i] >> 1) | (a[i + 1] << (LIMB_BITS - 1));
    }
    r[LIMB_LENGTH - 1] = (a[LIMB_LENGTH - 1] >> 1) | (hi << (LIMB_BITS - 1));
    r
}

/// All ones when `a` is zero.
#[inline]
pub(crate) fn norop_is_zero(a: &[Limb; LIMB_LENGTH]) -> Limb {
    let mut acc = 0;
    for limb in a.iter() {
        acc |= *limb;
    }
    !limb_nonzero_mask(acc)
}

/// All ones when `a == b`.
#[inline]
pub(crate) fn norop_eq(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> Limb {
    let mut acc = 0;
    for i in 0..LIMB_LENGTH {
        acc |= a[i] ^ b[i];
    }
    !limb_nonzero_mask(acc)
}

/// All ones when `a < b`.
#[inline]
pub(crate) fn norop_less_than(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> Limb {
    let (_, borrow) = norop_sub(a, b);
    limb_mask(borrow)
}

/// -1, 0 or 1 as `a` is below, equal to or above `b`.
#[inline]
pub(crate) fn norop_cmp(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> i32 {
    let (_, lt) = norop_sub(a, b);
    let (_, gt) = norop_sub(b, a);
    gt as i32 - lt as i32
}

/// Parses a big-endian byte string of at most 32 bytes. Shorter inputs are
/// treated as if left-padded with zeros.
pub(crate) fn parse_big_endian(output: &mut [Limb], input: &[u8]) -> Result<(), Error> {
    let mut bytes_in_current_limb = input.len() % LIMB_BYTES;
    if bytes_in_current_limb == 0 {
        bytes_in_current_limb = LIMB_BYTES;
    }

    let num_encoded_limbs =
        (input.len() / LIMB_BYTES) + (bytes_in_current_limb != LIMB_BYTES) as usize;

    if num_encoded_limbs > output.len() {
        return Err(Error::invalid_encoding());
    }

    for r in output.iter_mut() {
        *r = 0;
    }

    let mut index = 0;
    for i in 0..num_encoded_limbs {
        let mut limb: Limb = 0;
        for j in 0..bytes_in_current_limb {
            limb = (limb << 8) | Limb::from(input[index + j]);
        }
        output[num_encoded_limbs - i - 1] = limb;
        index += bytes_in_current_limb;
        bytes_in_current_limb = LIMB_BYTES;
    }

    Ok(())
}

pub(crate) fn big_endian_from_limbs(limbs: &[Limb], out: &mut [u8]) {
    let num_limbs = limbs.len();
    assert_eq!(out.len(), num_limbs * LIMB_BYTES);
    for (i, limb) in limbs.iter().enumerate() {
        let bytes = limb.to_be_bytes();
        let start = (num_limbs - i - 1) * LIMB_BYTES;
        out[start..start + LIMB_BYTES].copy_from_slice(&bytes);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::limb::{LIMB_FULL, ONE, ZERO};
    use num_bigint::BigUint;
    use proptest::prelude::*;

    fn to_big(a: &[Limb]) -> BigUint {
        let mut bytes = Vec::with_capacity(a.len() * LIMB_BYTES);
        for limb in a {
            bytes.extend_from_slice(&limb.to_le_bytes());
        }
        BigUint::from_bytes_le(&bytes)
    }

    #[test]
    fn add_carries_out() {
        let max = [LIMB_FULL; LIMB_LENGTH];
        let (r, carry) = norop_add(&max, &ONE);
        assert_eq!(r, ZERO);
        assert_eq!(carry, 1);
    }

    #[test]
    fn sub_borrows_out() {
        let (r, borrow) = norop_sub(&ZERO, &ONE);
        assert_eq!(r, [LIMB_FULL; LIMB_LENGTH]);
        assert_eq!(borrow, 1);
    }

    #[test]
    fn cond_ops_respect_mask() {
        let a = [5, 6, 7, 8];
        let m = [1, 2, 3, 4];
        assert_eq!(norop_cond_add(&a, &m, 0).0, a);
        assert_eq!(norop_cond_add(&a, &m, LIMB_FULL).0, [6, 8, 10, 12]);
        assert_eq!(norop_cond_sub(&a, &m, 0).0, a);
        assert_eq!(norop_cond_sub(&a, &m, LIMB_FULL).0, [4, 4, 4, 4]);
    }

    #[test]
    fn compare() {
        let a = [0, 0, 0, 1];
        let b = [LIMB_FULL, LIMB_FULL, LIMB_FULL, 0];
        assert_eq!(norop_cmp(&a, &b), 1);
        assert_eq!(norop_cmp(&b, &a), -1);
        assert_eq!(norop_cmp(&a, &a), 0);
        assert_eq!(norop_less_than(&b, &a), LIMB_FULL);
        assert_eq!(norop_less_than(&a, &b), 0);
        assert_eq!(norop_eq(&a, &a), LIMB_FULL);
        assert_eq!(norop_eq(&a, &b), 0);
        assert_eq!(norop_is_zero(&ZERO), LIMB_FULL);
        assert_eq!(norop_is_zero(&a), 0);
    }

    #[test]
    fn rshift_feeds_top_bit() {
        let a = [2, 1, 0, 0];
        assert_eq!(norop_rshift1(&a, 0), [1 << 63 | 1, 0, 0, 0]);
        assert_eq!(norop_rshift1(&ZERO, 1), [0, 0, 0, 1 << 63]);
    }

    #[test]
    fn big_endian_round_trip_short_input() {
        let mut limbs = [0; LIMB_LENGTH];
        parse_big_endian(&mut limbs, &[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(limbs, [0x010203, 0, 0, 0]);

        let mut out = [0u8; 32];
        big_endian_from_limbs(&[0x1122334455667788, 0, 0, 0xaa], &mut out);
        assert_eq!(out[7], 0xaa);
        assert_eq!(&out[24..], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]);
    }

    #[test]
    fn parse_rejects_long_input() {
        let mut limbs = [0; LIMB_LENGTH];
        assert!(parse_big_endian(&mut limbs, &[1u8; 33]).is_err());
    }

    proptest! {
        #[test]
        fn mul_matches_bigint(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            prop_assert_eq!(to_big(&norop_mul(&a, &b)), to_big(&a) * to_big(&b));
        }

        #[test]
        fn sqr_matches_mul(a in any::<[u64; 4]>()) {
            prop_assert_eq!(norop_sqr(&a), norop_mul(&a, &a));
        }
    }
}
