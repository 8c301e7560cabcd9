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

use crate::ec::digest_to_scalar;
use crate::elem::{
    elem_add, elem_mul, elem_sqr, elem_sub, elem_to_unencoded, scalar_to_elem, Elem, FieldElem,
    Scalar, Unencoded,
};
use crate::err::Error;
use crate::jacobian::exchange::verify_jacobian_point_is_on_the_curve;
use crate::jacobian::mul::twin_mul;
use crate::key::public::PublicKey;
use crate::limb::{LIMB_BYTES, LIMB_LENGTH};
use crate::norop::{norop_add, norop_less_than};
use crate::sm2p256::{CURVE_PARAMS, P256};
use crate::za::{message_digest, DEFAULT_USER_ID};

pub const SIGNATURE_LEN: usize = 2 * LIMB_LENGTH * LIMB_BYTES;

/// An SM2 signature `(r, s)` with both components in [1, n).
#[derive(Clone, Copy, Debug)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.r.is_equal(&other.r) && self.s.is_equal(&other.s)
    }
}

impl Eq for Signature {}

impl Signature {
    pub fn new(r: &[u8], s: &[u8]) -> Result<Self, Error> {
        let r = Scalar::from_be_bytes(r)?;
        let s = Scalar::from_be_bytes(s)?;
        if r.is_zero() || s.is_zero() {
            return Err(Error::zero_error());
        }
        Ok(Signature { r, s })
    }

    /// Parses the raw 64-byte `r || s` form.
    pub fn from_slice(sig: &[u8]) -> Result<Self, Error> {
        if sig.len() != SIGNATURE_LEN {
            return Err(Error::invalid_encoding());
        }
        Self::new(
            &sig[..LIMB_LENGTH * LIMB_BYTES],
            &sig[LIMB_LENGTH * LIMB_BYTES..],
        )
    }

    pub(crate) fn from_scalars(r: Scalar, s: Scalar) -> Self {
        Signature { r, s }
    }

    pub fn r(&self) -> [u8; LIMB_LENGTH * LIMB_BYTES] {
        self.r.to_be_bytes()
    }

    pub fn s(&self) -> [u8; LIMB_LENGTH * LIMB_BYTES] {
        self.s.to_be_bytes()
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0; SIGNATURE_LEN];
        out[..LIMB_LENGTH * LIMB_BYTES].copy_from_slice(&self.r());
        out[LIMB_LENGTH * LIMB_BYTES..].copy_from_slice(&self.s());
        out
    }

    /// Verifies a signature over `msg` made with the default user id.
    pub fn verify(&self, pk: &PublicKey, msg: &[u8]) -> Result<(), Error> {
        self.verify_with_id(pk, DEFAULT_USER_ID, msg)
    }

    pub fn verify_with_id(&self, pk: &PublicKey, id: &[u8], msg: &[u8]) -> Result<(), Error> {
        let digest = message_digest(id, pk, msg)?;
        self.verify_digest(pk, &digest)
    }

    /// Verifies against a precomputed digest `e`.
    pub fn verify_digest(&self, pk: &PublicKey, digest: &[u8]) -> Result<(), Error> {
        if self.r.is_zero() || self.s.is_zero() {
            return Err(Error::verify_error());
        }

        let e = digest_to_scalar(digest)?;

        let t = elem_add(&self.r, &self.s);
        if t.is_zero() {
            return Err(Error::verify_error());
        }

        let point = twin_mul(&self.s, &t, &pk.to_point());

        verify_jacobian_point_is_on_the_curve(&point).map_err(|_| Error::verify_error())?;

        // x1 = r - e (mod n) and x1 < p, so x1 is v or v + n.
        let v = elem_sub(&self.r, &e);
        let z2 = elem_sqr(&point.z);

        if sig_r_equals_x(&scalar_to_elem(&v), &point.x, &z2) {
            return Ok(());
        }

        let (v_plus_n, carry) = norop_add(&v.limbs, &CURVE_PARAMS.n);
        if carry == 0 && norop_less_than(&v_plus_n, &CURVE_PARAMS.p) != 0 {
            let v_plus_n = Elem::<P256, Unencoded>::from_limbs(v_plus_n);
            if sig_r_equals_x(&v_plus_n, &point.x, &z2) {
                return Ok(());
            }
        }

        Err(Error::verify_error())
    }
}

/// Compares `r` with the affine x of a Jacobian point without inverting:
/// `X == r * Z^2`.
fn sig_r_equals_x(r: &Elem<P256, Unencoded>, x: &FieldElem, z2: &FieldElem) -> bool {
    let r_jacobian = elem_mul(z2, r);
    let x = elem_to_unencoded(x);
    r_jacobian.is_equal(&x)
}

/// `sm2_verify`: true when `sig` is a valid signature over `digest` for
/// `pk`.
pub fn sm2_verify(digest: &[u8], pk: &PublicKey, sig: &Signature) -> bool {
    sig.verify_digest(pk, digest).is_ok()
}
