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

use crate::limb::{Limb, LIMB_BYTES, LIMB_LENGTH, ONE};
use crate::norop::{big_endian_from_limbs, norop_eq, norop_is_zero, parse_big_endian};
use crate::sm2p256::{Modulus, N256, P256};
use crate::err::Error;
use core::marker::PhantomData;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

// Indicates that the element is not encoded; there is no *R* factor
// that needs to be canceled out.
#[derive(Copy, Clone)]
pub enum Unencoded {}

// Indicates that the element is encoded; the value has one *R*
// factor that needs to be canceled out.
#[derive(Copy, Clone)]
pub enum R {}

// Indicates the element is encoded twice; the value has two *R*
// factors that need to be canceled out.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone)]
pub enum RR {}

// Indicates the element is inversely encoded; the value has one
// 1/*R* factor that needs to be canceled out.
#[derive(Copy, Clone)]
pub enum RInverse {}

pub trait Encoding {}

impl Encoding for RR {}
impl Encoding for R {}
impl Encoding for Unencoded {}
impl Encoding for RInverse {}

/// The encoding of the result of a reduction.
pub trait ReductionEncoding {
    type Output: Encoding;
}

impl ReductionEncoding for RR {
    type Output = R;
}
impl ReductionEncoding for R {
    type Output = Unencoded;
}
impl ReductionEncoding for Unencoded {
    type Output = RInverse;
}

/// The encoding of the result of a multiplication.
pub trait ProductEncoding {
    type Output: Encoding;
}

impl<E: ReductionEncoding> ProductEncoding for (Unencoded, E) {
    type Output = E::Output;
}

impl<E: Encoding> ProductEncoding for (R, E) {
    type Output = E;
}

impl<E: ReductionEncoding> ProductEncoding for (RInverse, E)
where
    E::Output: ReductionEncoding,
{
    type Output = <<E as ReductionEncoding>::Output as ReductionEncoding>::Output;
}

// XXX: Rust doesn't allow overlapping impls,
// TODO (if/when Rust allows it):
// impl<E1, E2: ReductionEncoding> ProductEncoding for
//         (E1, E2) {
//     type Output = <(E2, E1) as ProductEncoding>::Output;
// }
impl ProductEncoding for (RR, Unencoded) {
    type Output = <(Unencoded, RR) as ProductEncoding>::Output;
}
impl ProductEncoding for (RR, RInverse) {
    type Output = <(RInverse, RR) as ProductEncoding>::Output;
}

/// Elements are always fully reduced with respect to *m*; i.e.
/// the 0 <= x < m for every value x.
pub struct Elem<M, E> {
    pub limbs: [Limb; LIMB_LENGTH],

    /// The modulus *m* for the ring ℤ/mℤ for which this element is a value,
    /// and the encoding of the value.
    pub m: PhantomData<(M, E)>,
}

/// A coordinate of a curve point, in Montgomery form unless stated.
pub type FieldElem<E = R> = Elem<P256, E>;

/// A scalar. Its value is in [0, n). Zero-valued scalars are forbidden in most
/// contexts.
pub type Scalar<E = Unencoded> = Elem<N256, E>;

impl<M, E> Clone for Elem<M, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, E> Copy for Elem<M, E> {}

impl<M, E> core::fmt::Debug for Elem<M, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Elem").field("limbs", &self.limbs).finish()
    }
}

impl<M, E> Elem<M, E> {
    pub const fn from_limbs(limbs: [Limb; LIMB_LENGTH]) -> Self {
        Elem {
            limbs,
            m: PhantomData,
        }
    }

    pub const fn zero() -> Self {
        Self::from_limbs([0; LIMB_LENGTH])
    }

    pub fn is_zero(&self) -> bool {
        norop_is_zero(&self.limbs) != 0
    }

    pub fn is_equal(&self, other: &Self) -> bool {
        norop_eq(&self.limbs, &other.limbs) != 0
    }
}

impl<M: Modulus> Elem<M, Unencoded> {
    /// Parses a big-endian value, rejecting anything not below the modulus.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut limbs = [0; LIMB_LENGTH];
        parse_big_endian(&mut limbs, bytes)?;
        if M::cmp(&limbs, &M::MODULUS) >= 0 {
            return Err(Error::invalid_encoding());
        }
        Ok(Self::from_limbs(limbs))
    }

    pub fn to_be_bytes(&self) -> [u8; LIMB_LENGTH * LIMB_BYTES] {
        let mut out = [0; LIMB_LENGTH * LIMB_BYTES];
        big_endian_from_limbs(&self.limbs, &mut out);
        out
    }
}

impl<M, E> ConstantTimeEq for Elem<M, E> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.limbs[..].ct_eq(&other.limbs[..])
    }
}

impl<M, E> ConditionallySelectable for Elem<M, E> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0; LIMB_LENGTH];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = Limb::conditional_select(&a.limbs[i], &b.limbs[i], choice);
        }
        Self::from_limbs(limbs)
    }
}

impl<M, E> Zeroize for Elem<M, E> {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
    }
}

pub fn elem_mul<M: Modulus, EA: Encoding, EB: Encoding>(
    a: &Elem<M, EA>,
    b: &Elem<M, EB>,
) -> Elem<M, <(EA, EB) as ProductEncoding>::Output>
where
    (EA, EB): ProductEncoding,
{
    Elem::from_limbs(M::mul(&a.limbs, &b.limbs))
}

pub fn elem_sqr<M: Modulus>(a: &Elem<M, R>) -> Elem<M, R> {
    Elem::from_limbs(M::sqr(&a.limbs))
}

pub fn elem_add<M: Modulus, E: Encoding>(a: &Elem<M, E>, b: &Elem<M, E>) -> Elem<M, E> {
    Elem::from_limbs(M::add(&a.limbs, &b.limbs))
}

pub fn elem_sub<M: Modulus, E: Encoding>(a: &Elem<M, E>, b: &Elem<M, E>) -> Elem<M, E> {
    Elem::from_limbs(M::sub(&a.limbs, &b.limbs))
}

/// `a^-1` in Montgomery form; the inverse of zero is zero.
pub fn elem_inv<M: Modulus>(a: &Elem<M, R>) -> Elem<M, R> {
    Elem::from_limbs(M::inv(&a.limbs))
}

pub fn elem_to_mont<M: Modulus>(a: &Elem<M, Unencoded>) -> Elem<M, R> {
    Elem::from_limbs(M::to_mont(&a.limbs))
}

pub fn elem_to_unencoded<M: Modulus>(a: &Elem<M, R>) -> Elem<M, Unencoded> {
    Elem::from_limbs(M::mul(&a.limbs, &ONE))
}

/// Reduces a field value, or any value below 2n, modulo n.
pub fn elem_reduced_to_scalar(e: &Elem<P256, Unencoded>) -> Scalar {
    Scalar::from_limbs(N256::reduce_once(&e.limbs, 0))
}

/// Reinterprets a scalar as a field value; n < p so it stays reduced.
pub fn scalar_to_elem(e: &Scalar) -> Elem<P256, Unencoded> {
    Elem::from_limbs(e.limbs)
}
