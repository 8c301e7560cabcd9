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

//! Constant-time inversion by Fermat's little theorem, `a^-1 = a^(m - 2)`.
//!
//! The exponents are public, so every path below performs the same sequence
//! of squarings and multiplications whatever `a` is. Inputs and outputs are
//! in Montgomery form, and zero maps to zero.

use crate::limb::{limb_mask, limb_select, Limb, LIMB_BITS, LIMB_LENGTH};
use crate::sm2p256::{Modulus, N256, P256};

/// Inverse modulo `p` by addition chain.
pub(crate) fn p256_inv(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    // The exponent (p - 2) is:
    //
    //    0xfffffffeffffffffffffffffffffffffffffffff00000000fffffffffffffffd
    let sqr_mul = P256::sqr_mul;

    let x2 = P256::sqr(a);
    let x3 = P256::mul(&x2, a); // 0x3
    let xc = P256::sqr_n(&x3, 2);
    let xd = P256::mul(&xc, a);
    let xf = P256::mul(&x3, &xc);

    let xf0 = P256::sqr_n(&xf, 4);
    let xfd = P256::mul(&xd, &xf0);
    let xff = P256::mul(&xf, &xf0);

    let xff00 = P256::sqr_n(&xff, 8);
    let xfffd = P256::mul(&xfd, &xff00);
    let xffff = P256::mul(&xff, &xff00);

    let xffff0000 = P256::sqr_n(&xffff, 16);
    let xfffffffd = P256::mul(&xfffd, &xffff0000);
    let xfffffffe = P256::mul(&xfffffffd, a);
    let xffffffff = P256::mul(&xfffffffe, a);

    // fffffffeffffffff
    let acc = sqr_mul(&xfffffffe, &xffffffff, 32);
    // fffffffeffffffffffffffff
    let acc = sqr_mul(&acc, &xffffffff, 32);
    // fffffffeffffffffffffffffffffffff
    let acc = sqr_mul(&acc, &xffffffff, 32);
    // ...ffffffffffffffff
    let acc = sqr_mul(&acc, &xffffffff, 32);
    // ...ffffffff00000000ffffffff
    let acc = sqr_mul(&acc, &xffffffff, 64);
    // ...fffffffd
    sqr_mul(&acc, &xfffffffd, 32)
}

/// Inverse modulo `n` by addition chain.
pub(crate) fn n256_inv(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    // The exponent (n - 2) is:
    //
    //    0xfffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54121

    // Indexes into `d`.
    const B_1: usize = 0;
    const B_10: usize = 1;
    const B_11: usize = 2;
    const B_101: usize = 3;
    const B_111: usize = 4;
    const B_1111: usize = 5;
    const B_10101: usize = 6;
    const DIGIT_COUNT: usize = 7;

    let sqr_mul = N256::sqr_mul;
    let mut d = [[0; LIMB_LENGTH]; DIGIT_COUNT];

    d[B_1] = *a;
    d[B_10] = N256::sqr(&d[B_1]);
    d[B_11] = N256::mul(&d[B_10], &d[B_1]);
    d[B_101] = N256::mul(&d[B_10], &d[B_11]);
    d[B_111] = N256::mul(&d[B_101], &d[B_10]);
    let b_1010 = N256::sqr(&d[B_101]);
    d[B_1111] = N256::mul(&b_1010, &d[B_101]);
    d[B_10101] = sqr_mul(&b_1010, &d[B_1], 1);
    let b_101010 = N256::sqr(&d[B_10101]);
    let b_111111 = N256::mul(&b_101010, &d[B_10101]);
    let b_1111111 = sqr_mul(&b_111111, &d[B_1], 1);

    let ff = sqr_mul(&b_111111, &d[B_11], 2);
    let ffff = sqr_mul(&ff, &ff, 8);
    let ffffffff = sqr_mul(&ffff, &ffff, 16);

    // ffffff
    let mut acc = sqr_mul(&ffff, &ff, 8);
    // fffffff_111
    acc = sqr_mul(&acc, &b_1111111, 7);
    // fffffffe
    acc = N256::sqr(&acc);
    // fffffffeffffffff
    acc = sqr_mul(&acc, &ffffffff, 32);
    // fffffffeffffffffffffffff
    acc = sqr_mul(&acc, &ffffffff, 32);
    // fffffffeffffffffffffffffffffffff
    acc = sqr_mul(&acc, &ffffffff, 32);

    // The rest of the exponent, in binary, is:
    //
    //    0111,001,00000001111,01111,101,10101,1,001,0000111,00011,000000101,0010101,
    //    10101,00111,0111,01111,11,01,0000001,001,00111,00111,010101,01,000001,001,00001
    static REMAINING_WINDOWS: [(usize, usize); 27] = [
        (1 + 3, B_111),
        (2 + 1, B_1),
        (7 + 4, B_1111),
        (1 + 4, B_1111),
        (3, B_101),
        (5, B_10101),
        (1, B_1),
        (2 + 1, B_1),
        (4 + 3, B_111),
        (3 + 2, B_11),
        (6 + 3, B_101),
        (2 + 5, B_10101),
        (5, B_10101),
        (2 + 3, B_111),
        (1 + 3, B_111),
        (1 + 4, B_1111),
        (2, B_11),
        (1 + 1, B_1),
        (6 + 1, B_1),
        (2 + 1, B_1),
        (2 + 3, B_111),
        (2 + 3, B_111),
        (1 + 5, B_10101),
        (1 + 1, B_1),
        (5 + 1, B_1),
        (2 + 1, B_1),
        (4 + 1, B_1),
    ];

    for &(squarings, digit) in REMAINING_WINDOWS.iter() {
        acc = sqr_mul(&acc, &d[digit], squarings);
    }

    acc
}

/// `a^exp` by square-and-multiply over all 256 bits of a public exponent,
/// Montgomery form in and out.
pub(crate) fn mont_pow<M: Modulus>(
    a: &[Limb; LIMB_LENGTH],
    exp: &[Limb; LIMB_LENGTH],
) -> [Limb; LIMB_LENGTH] {
    let mut r = M::R;
    for i in (0..LIMB_LENGTH * LIMB_BITS).rev() {
        r = M::sqr(&r);
        let t = M::mul(&r, a);
        let bit = limb_mask((exp[i / LIMB_BITS] >> (i % LIMB_BITS)) & 1);
        for j in 0..LIMB_LENGTH {
            r[j] = limb_select(bit, t[j], r[j]);
        }
    }
    r
}

/// Inverse over every bit of `m - 2`. Slower than the chains but shared by
/// both moduli.
pub(crate) fn inv_small<M: Modulus>(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
    mont_pow::<M>(a, &M::MODULUS_MINUS_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limb::{ONE, ZERO};
    use crate::sm2p256::tests::{from_big, to_big};
    use proptest::prelude::*;

    fn field_elem(a: [u64; 4]) -> [Limb; LIMB_LENGTH] {
        from_big(&(to_big(&a) % to_big(&P256::MODULUS)))
    }

    fn order_elem(a: [u64; 4]) -> [Limb; LIMB_LENGTH] {
        from_big(&(to_big(&a) % to_big(&N256::MODULUS)))
    }

    #[test]
    fn zero_has_zero_inverse() {
        assert_eq!(p256_inv(&ZERO), ZERO);
        assert_eq!(n256_inv(&ZERO), ZERO);
        assert_eq!(inv_small::<P256>(&ZERO), ZERO);
        assert_eq!(inv_small::<N256>(&ZERO), ZERO);
        assert_eq!(P256::inv(&ZERO), ZERO);
    }

    #[test]
    fn one_is_self_inverse() {
        assert_eq!(p256_inv(&P256::R), P256::R);
        assert_eq!(n256_inv(&N256::R), N256::R);
    }

    #[test]
    fn two_inverse_is_half() {
        let two = P256::to_mont(&[2, 0, 0, 0]);
        let half = P256::div2(&P256::R);
        assert_eq!(p256_inv(&two), half);
        assert_eq!(P256::from_mont(&P256::mul(&two, &p256_inv(&two))), ONE);
    }

    proptest! {
        #[test]
        fn field_inverse(a in any::<[u64; 4]>()) {
            let a = field_elem(a);
            prop_assume!(a != ZERO);
            let inv = p256_inv(&a);
            prop_assert_eq!(P256::mul(&a, &inv), P256::R);
            prop_assert_eq!(inv_small::<P256>(&a), inv);
        }

        #[test]
        fn order_inverse(a in any::<[u64; 4]>()) {
            let a = order_elem(a);
            prop_assume!(a != ZERO);
            let inv = n256_inv(&a);
            prop_assert_eq!(N256::mul(&a, &inv), N256::R);
            prop_assert_eq!(inv_small::<N256>(&a), inv);
        }
    }
}
