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

//! Montgomery arithmetic modulo the SM2 prime `p` and the curve order `n`.
//!
//! Every value handed in or out is four little-endian limbs, fully reduced.
//! Values named Montgomery form carry one factor of R = 2^256.

use crate::elem::{Elem, R};
use crate::limb::{limb_mask, limb_select, Limb, LIMB_LENGTH};
use crate::norop::{
    adc, mac, norop_add, norop_cmp, norop_cond_add, norop_cond_sub, norop_is_zero, norop_mul,
    norop_rshift1, norop_sqr, norop_sub, sbb, Wide,
};
use core::marker::PhantomData;

pub struct CurveParams {
    pub a: Elem<P256, R>,
    pub b: Elem<P256, R>,
    pub gx: Elem<P256, R>,
    pub gy: Elem<P256, R>,
    pub p: [Limb; LIMB_LENGTH],
    pub n: [Limb; LIMB_LENGTH],
    /// -n^-1 mod 2^64. The prime's counterpart is 1.
    pub n0: Limb,
    pub r_p: [Limb; LIMB_LENGTH],
    pub rr_p: [Limb; LIMB_LENGTH],
    pub r_n: [Limb; LIMB_LENGTH],
    pub rr_n: [Limb; LIMB_LENGTH],
}

pub static CURVE_PARAMS: CurveParams = CurveParams {
    a: Elem {
        limbs: [
            0xfffffffffffffffc,
            0xfffffffc00000003,
            0xffffffffffffffff,
            0xfffffffbffffffff,
        ],
        m: PhantomData,
    },
    b: Elem {
        limbs: [
            0x90d230632bc0dd42,
            0x71cf379ae9b537ab,
            0x527981505ea51c3c,
            0x240fe188ba20e2c8,
        ],
        m: PhantomData,
    },
    gx: Elem {
        limbs: [
            0x61328990f418029e,
            0x3e7981eddca6c050,
            0xd6a1ed99ac24c3c3,
            0x91167a5ee1c13b05,
        ],
        m: PhantomData,
    },
    gy: Elem {
        limbs: [
            0xc1354e593c2d0ddd,
            0xc1f5e5788d3295fa,
            0x8d4cfb066e2a48f8,
            0x63cd65d481d735bd,
        ],
        m: PhantomData,
    },
    p: [
        0xffffffffffffffff,
        0xffffffff00000000,
        0xffffffffffffffff,
        0xfffffffeffffffff,
    ],
    n: [
        0x53bbf40939d54123,
        0x7203df6b21c6052b,
        0xffffffffffffffff,
        0xfffffffeffffffff,
    ],
    n0: 0x327f9e8872350975,
    r_p: [
        0x0000000000000001,
        0x00000000ffffffff,
        0x0000000000000000,
        0x0000000100000000,
    ],
    rr_p: [
        0x0000000200000003,
        0x00000002ffffffff,
        0x0000000100000001,
        0x0000000400000002,
    ],
    r_n: [
        0xac440bf6c62abedd,
        0x8dfc2094de39fad4,
        0x0000000000000000,
        0x0000000100000000,
    ],
    rr_n: [
        0x901192af7c114f20,
        0x3464504ade6fa2fa,
        0x620fc84c3affe0d4,
        0x1eb5e412a22b3d3b,
    ],
};

/// A modulus with Montgomery arithmetic. The two implementations differ only
/// in how a double-width product is reduced and in their inversion chain.
pub trait Modulus: Sized + 'static {
    const MODULUS: [Limb; LIMB_LENGTH];
    /// R mod m, the Montgomery form of one.
    const R: [Limb; LIMB_LENGTH];
    /// R^2 mod m.
    const RR: [Limb; LIMB_LENGTH];
    /// m - 2, the inversion exponent.
    const MODULUS_MINUS_2: [Limb; LIMB_LENGTH];

    /// Montgomery reduction: `t * R^-1 mod m` for `t < m * R`.
    fn reduce(t: &Wide) -> [Limb; LIMB_LENGTH];

    /// `a^(m - 2)` by this modulus' addition chain, Montgomery form in and out.
    fn inv_chain(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH];

    /// Brings `r + carry * 2^256`, known to be below `2m`, into `[0, m)`.
    #[inline]
    fn reduce_once(r: &[Limb; LIMB_LENGTH], carry: Limb) -> [Limb; LIMB_LENGTH] {
        let (t, borrow) = norop_sub(r, &Self::MODULUS);
        // keep r only when it did not overflow and r < m
        let keep = limb_mask(borrow & (carry ^ 1));
        let mut out = [0; LIMB_LENGTH];
        for i in 0..LIMB_LENGTH {
            out[i] = limb_select(keep, r[i], t[i]);
        }
        out
    }

    #[inline]
    fn add(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        let (r, carry) = norop_add(a, b);
        Self::reduce_once(&r, carry)
    }

    #[inline]
    fn sub(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        let (r, borrow) = norop_sub(a, b);
        Self::cond_add(&r, limb_mask(borrow))
    }

    #[inline]
    fn dbl(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        Self::add(a, a)
    }

    #[inline]
    fn tpl(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        Self::add(&Self::dbl(a), a)
    }

    #[inline]
    fn neg(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        Self::sub(&[0; LIMB_LENGTH], a)
    }

    /// `a / 2 mod m`: an odd `a` has `m` added first so the shift is exact.
    #[inline]
    fn div2(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        let (t, carry) = norop_cond_add(a, &Self::MODULUS, limb_mask(a[0] & 1));
        norop_rshift1(&t, carry)
    }

    /// `a + m` under `mask`, modulo 2^256.
    #[inline]
    fn cond_add(a: &[Limb; LIMB_LENGTH], mask: Limb) -> [Limb; LIMB_LENGTH] {
        norop_cond_add(a, &Self::MODULUS, mask).0
    }

    /// `a - m` under `mask`, modulo 2^256.
    #[inline]
    fn cond_sub(a: &[Limb; LIMB_LENGTH], mask: Limb) -> [Limb; LIMB_LENGTH] {
        norop_cond_sub(a, &Self::MODULUS, mask).0
    }

    #[inline]
    fn cmp(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> i32 {
        norop_cmp(a, b)
    }

    #[inline]
    fn is_zero(a: &[Limb; LIMB_LENGTH]) -> Limb {
        norop_is_zero(a)
    }

    #[inline]
    fn mul(a: &[Limb; LIMB_LENGTH], b: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        Self::reduce(&norop_mul(a, b))
    }

    #[inline]
    fn sqr(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        Self::reduce(&norop_sqr(a))
    }

    fn sqr_n(a: &[Limb; LIMB_LENGTH], squarings: usize) -> [Limb; LIMB_LENGTH] {
        let mut r = *a;
        for _ in 0..squarings {
            r = Self::sqr(&r);
        }
        r
    }

    /// `a^(2^squarings) * b`.
    fn sqr_mul(
        a: &[Limb; LIMB_LENGTH],
        b: &[Limb; LIMB_LENGTH],
        squarings: usize,
    ) -> [Limb; LIMB_LENGTH] {
        Self::mul(&Self::sqr_n(a, squarings), b)
    }

    #[inline]
    fn to_mont(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        Self::mul(a, &Self::RR)
    }

    #[inline]
    fn from_mont(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        let mut t = [0; LIMB_LENGTH * 2];
        t[..LIMB_LENGTH].copy_from_slice(a);
        Self::reduce(&t)
    }

    /// Inverse in Montgomery form. Zero maps to zero.
    #[inline]
    fn inv(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        if cfg!(feature = "small-inv") {
            crate::inv::inv_small::<Self>(a)
        } else {
            Self::inv_chain(a)
        }
    }
}

/// The field prime `p = 2^256 - 2^224 - 2^96 + 2^64 - 1`.
#[derive(Copy, Clone)]
pub enum P256 {}

/// The curve order `n`.
#[derive(Copy, Clone)]
pub enum N256 {}

impl Modulus for P256 {
    const MODULUS: [Limb; LIMB_LENGTH] = CURVE_PARAMS_P;
    const R: [Limb; LIMB_LENGTH] = [0x1, 0xffffffff, 0x0, 0x100000000];
    const RR: [Limb; LIMB_LENGTH] = [0x200000003, 0x2ffffffff, 0x100000001, 0x400000002];
    const MODULUS_MINUS_2: [Limb; LIMB_LENGTH] = [
        0xfffffffffffffffd,
        0xffffffff00000000,
        0xffffffffffffffff,
        0xfffffffeffffffff,
    ];

    // p = -1 mod 2^64, so each round's multiplier is the low limb itself, and
    // (p + 1) / 2^64 = 2^192 - 2^160 - 2^32 + 1 turns `+= m * p` into four
    // shifted additions and subtractions.
    fn reduce(t: &Wide) -> [Limb; LIMB_LENGTH] {
        let mut w = [0; LIMB_LENGTH * 2 + 1];
        w[..LIMB_LENGTH * 2].copy_from_slice(t);

        for i in 0..LIMB_LENGTH {
            let m = w[i];
            w[i] = 0;
            add_at(&mut w, i + 1, &[m, 0, 0, m]);
            sub_at(&mut w, i + 1, &[m << 32, m >> 32, m << 32, m >> 32]);
        }

        let mut r = [0; LIMB_LENGTH];
        r.copy_from_slice(&w[LIMB_LENGTH..LIMB_LENGTH * 2]);
        Self::reduce_once(&r, w[LIMB_LENGTH * 2])
    }

    fn inv_chain(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        crate::inv::p256_inv(a)
    }
}

impl Modulus for N256 {
    const MODULUS: [Limb; LIMB_LENGTH] = CURVE_PARAMS_N;
    const R: [Limb; LIMB_LENGTH] = [
        0xac440bf6c62abedd,
        0x8dfc2094de39fad4,
        0x0000000000000000,
        0x0000000100000000,
    ];
    const RR: [Limb; LIMB_LENGTH] = [
        0x901192af7c114f20,
        0x3464504ade6fa2fa,
        0x620fc84c3affe0d4,
        0x1eb5e412a22b3d3b,
    ];
    const MODULUS_MINUS_2: [Limb; LIMB_LENGTH] = [
        0x53bbf40939d54121,
        0x7203df6b21c6052b,
        0xffffffffffffffff,
        0xfffffffeffffffff,
    ];

    fn reduce(t: &Wide) -> [Limb; LIMB_LENGTH] {
        let mut w = [0; LIMB_LENGTH * 2 + 1];
        w[..LIMB_LENGTH * 2].copy_from_slice(t);

        for i in 0..LIMB_LENGTH {
            let m = w[i].wrapping_mul(CURVE_PARAMS.n0);
            let mut carry = 0;
            for j in 0..LIMB_LENGTH {
                let (x, c) = mac(w[i + j], m, CURVE_PARAMS_N[j], carry);
                w[i + j] = x;
                carry = c;
            }
            for limb in w.iter_mut().skip(i + LIMB_LENGTH) {
                let (x, c) = adc(*limb, carry, 0);
                *limb = x;
                carry = c;
            }
        }

        let mut r = [0; LIMB_LENGTH];
        r.copy_from_slice(&w[LIMB_LENGTH..LIMB_LENGTH * 2]);
        Self::reduce_once(&r, w[LIMB_LENGTH * 2])
    }

    fn inv_chain(a: &[Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        crate::inv::n256_inv(a)
    }
}

const CURVE_PARAMS_P: [Limb; LIMB_LENGTH] = [
    0xffffffffffffffff,
    0xffffffff00000000,
    0xffffffffffffffff,
    0xfffffffeffffffff,
];

const CURVE_PARAMS_N: [Limb; LIMB_LENGTH] = [
    0x53bbf40939d54123,
    0x7203df6b21c6052b,
    0xffffffffffffffff,
    0xfffffffeffffffff,
];

#[inline(always)]
fn add_at(w: &mut [Limb; LIMB_LENGTH * 2 + 1], offset: usize, v: &[Limb; LIMB_LENGTH]) {
    let mut carry = 0;
    for j in offset..w.len() {
        let x = if j - offset < LIMB_LENGTH { v[j - offset] } else { 0 };
        let (r, c) = adc(w[j], x, carry);
        w[j] = r;
        carry = c;
    }
}

#[inline(always)]
fn sub_at(w: &mut [Limb; LIMB_LENGTH * 2 + 1], offset: usize, v: &[Limb; LIMB_LENGTH]) {
    let mut borrow = 0;
    for j in offset..w.len() {
        let x = if j - offset < LIMB_LENGTH { v[j - offset] } else { 0 };
        let (r, b) = sbb(w[j], x, borrow);
        w[j] = r;
        borrow = b;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::limb::{LIMB_BYTES, ONE, ZERO};
    use num_bigint::BigUint;
    use num_traits::One;
    use proptest::prelude::*;

    pub(crate) fn to_big(a: &[Limb; LIMB_LENGTH]) -> BigUint {
        let mut bytes = Vec::with_capacity(LIMB_LENGTH * LIMB_BYTES);
        for limb in a {
            bytes.extend_from_slice(&limb.to_le_bytes());
        }
        BigUint::from_bytes_le(&bytes)
    }

    pub(crate) fn from_big(a: &BigUint) -> [Limb; LIMB_LENGTH] {
        let mut bytes = a.to_bytes_le();
        bytes.resize(LIMB_LENGTH * LIMB_BYTES, 0);
        let mut r = [0; LIMB_LENGTH];
        for (i, chunk) in bytes.chunks(LIMB_BYTES).enumerate() {
            let mut limb = [0u8; LIMB_BYTES];
            limb.copy_from_slice(chunk);
            r[i] = Limb::from_le_bytes(limb);
        }
        r
    }

    fn reduced<M: Modulus>(a: [Limb; LIMB_LENGTH]) -> [Limb; LIMB_LENGTH] {
        from_big(&(to_big(&a) % to_big(&M::MODULUS)))
    }

    fn r_inv<M: Modulus>() -> BigUint {
        let m = to_big(&M::MODULUS);
        // R^-1 = R^(m - 2) for prime m
        let r: BigUint = BigUint::one() << 256;
        r.modpow(&(&m - 2u32), &m)
    }

    #[test]
    fn curve_constants_agree() {
        let p = to_big(&P256::MODULUS);
        let n = to_big(&N256::MODULUS);
        let r = BigUint::one() << 256;
        assert_eq!(to_big(&P256::R), &r % &p);
        assert_eq!(to_big(&P256::RR), (&r * &r) % &p);
        assert_eq!(to_big(&N256::R), &r % &n);
        assert_eq!(to_big(&N256::RR), (&r * &r) % &n);
        assert_eq!(to_big(&CURVE_PARAMS.p), p);
        assert_eq!(to_big(&CURVE_PARAMS.n), n);
        assert_eq!(CURVE_PARAMS.r_p, P256::R);
        assert_eq!(CURVE_PARAMS.rr_p, P256::RR);
        assert_eq!(CURVE_PARAMS.r_n, N256::R);
        assert_eq!(CURVE_PARAMS.rr_n, N256::RR);
        assert_eq!(
            CURVE_PARAMS.n[0].wrapping_mul(CURVE_PARAMS.n0),
            Limb::MAX
        );
    }

    #[test]
    fn field_boundaries() {
        let p_minus_1 = P256::sub(&ZERO, &ONE);
        assert_eq!(to_big(&p_minus_1), to_big(&P256::MODULUS) - 1u32);
        assert_eq!(P256::add(&p_minus_1, &ONE), ZERO);
        assert_eq!(P256::neg(&ZERO), ZERO);
        assert_eq!(P256::dbl(&p_minus_1), P256::sub(&p_minus_1, &ONE));

        let n_minus_1 = N256::sub(&ZERO, &ONE);
        assert_eq!(to_big(&n_minus_1), to_big(&N256::MODULUS) - 1u32);
        assert_eq!(N256::add(&n_minus_1, &ONE), ZERO);
    }

    #[test]
    fn montgomery_round_trip() {
        let a = [0x1234, 0x5678, 0x9abc, 0xdef0];
        assert_eq!(P256::from_mont(&P256::to_mont(&a)), a);
        assert_eq!(N256::from_mont(&N256::to_mont(&a)), a);
        assert_eq!(P256::to_mont(&ONE), P256::R);
        assert_eq!(N256::to_mont(&ONE), N256::R);
    }

    #[test]
    fn reduce_handles_top_of_range() {
        // (p - 1)^2 is the largest product two field elements can form.
        let p_minus_1 = P256::sub(&ZERO, &ONE);
        let p = to_big(&P256::MODULUS);
        let expected = (to_big(&p_minus_1) * to_big(&p_minus_1) * r_inv::<P256>()) % &p;
        assert_eq!(to_big(&P256::mul(&p_minus_1, &p_minus_1)), expected);

        let n_minus_1 = N256::sub(&ZERO, &ONE);
        let n = to_big(&N256::MODULUS);
        let expected = (to_big(&n_minus_1) * to_big(&n_minus_1) * r_inv::<N256>()) % &n;
        assert_eq!(to_big(&N256::mul(&n_minus_1, &n_minus_1)), expected);
    }

    #[test]
    fn cond_ops_and_compare() {
        let a = [7, 0, 0, 0];
        assert_eq!(P256::cond_add(&a, 0), a);
        assert_eq!(P256::cond_sub(&P256::cond_add(&a, !0), !0), a);
        assert_eq!(P256::cmp(&a, &ONE), 1);
        assert_eq!(P256::cmp(&ONE, &a), -1);
        assert_eq!(P256::cmp(&a, &a), 0);
        assert_eq!(P256::is_zero(&ZERO), !0);
        assert_eq!(P256::is_zero(&a), 0);
    }

    proptest! {
        #[test]
        fn add_then_sub(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            let a = reduced::<P256>(a);
            let b = reduced::<P256>(b);
            prop_assert_eq!(P256::sub(&P256::add(&a, &b), &b), a);
            let p = to_big(&P256::MODULUS);
            prop_assert_eq!(to_big(&P256::add(&a, &b)), (to_big(&a) + to_big(&b)) % &p);
        }

        #[test]
        fn order_add_then_sub(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            let a = reduced::<N256>(a);
            let b = reduced::<N256>(b);
            prop_assert_eq!(N256::sub(&N256::add(&a, &b), &b), a);
        }

        #[test]
        fn mul_matches_bigint(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            let a = reduced::<P256>(a);
            let b = reduced::<P256>(b);
            let p = to_big(&P256::MODULUS);
            let expected = (to_big(&a) * to_big(&b) * r_inv::<P256>()) % &p;
            prop_assert_eq!(to_big(&P256::mul(&a, &b)), expected);
        }

        #[test]
        fn order_mul_matches_bigint(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            let a = reduced::<N256>(a);
            let b = reduced::<N256>(b);
            let n = to_big(&N256::MODULUS);
            let expected = (to_big(&a) * to_big(&b) * r_inv::<N256>()) % &n;
            prop_assert_eq!(to_big(&N256::mul(&a, &b)), expected);
        }

        #[test]
        fn sqr_is_self_mul(a in any::<[u64; 4]>()) {
            let a = reduced::<P256>(a);
            prop_assert_eq!(P256::sqr(&a), P256::mul(&a, &a));
            let a = reduced::<N256>(a);
            prop_assert_eq!(N256::sqr(&a), N256::mul(&a, &a));
        }

        #[test]
        fn halving_and_tripling(a in any::<[u64; 4]>()) {
            let a = reduced::<P256>(a);
            prop_assert_eq!(P256::dbl(&P256::div2(&a)), a);
            prop_assert_eq!(P256::tpl(&a), P256::add(&P256::dbl(&a), &a));
            prop_assert_eq!(P256::add(&a, &P256::neg(&a)), ZERO);
            prop_assert!(to_big(&P256::div2(&a)) < to_big(&P256::MODULUS));
        }

        #[test]
        fn sqr_n_repeats(a in any::<[u64; 4]>()) {
            let a = reduced::<P256>(a);
            prop_assert_eq!(P256::sqr_n(&a, 3), P256::sqr(&P256::sqr(&P256::sqr(&a))));
            prop_assert_eq!(P256::sqr_mul(&a, &a, 1), P256::mul(&P256::sqr(&a), &a));
            prop_assert_eq!(P256::sqr_n(&a, 0), a);
        }
    }
}
