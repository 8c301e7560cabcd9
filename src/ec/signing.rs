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

use crate::ec::verification::Signature;
use crate::ec::{digest_to_scalar, SIGN_MAX_ATTEMPTS};
use crate::elem::{
    elem_add, elem_inv, elem_mul, elem_reduced_to_scalar, elem_sub, elem_to_mont,
    elem_to_unencoded, FieldElem, Scalar, R,
};
use crate::err::Error;
use crate::jacobian::exchange::{big_endian_affine_from_jacobian, FIELD_BYTES};
use crate::jacobian::mul::{base_point_mul, point_mul};
use crate::key::private::{check_private_key, create_private_key, gen_k};
use crate::key::public::PublicKey;
use crate::limb::{LIMB_BYTES, LIMB_LENGTH, ONE};
use crate::norop::parse_big_endian;
use crate::rand::SecureRandom;
use crate::za::{message_digest, DEFAULT_USER_ID};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

static SCALAR_ONE: Scalar = Scalar::from_limbs(ONE);

/// Why a single signing attempt was thrown away.
#[derive(Debug, PartialEq)]
enum Rejected {
    RIsZero,
    RPlusKIsZero,
    SIsZero,
}

/// A private scalar `d` in [1, n - 2] together with its public point.
/// `(1 + d)^-1` is computed once, at construction.
pub struct KeyPair {
    d: Scalar,
    dp1_inv: Scalar<R>, // *R*
    public: PublicKey,
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.d.zeroize();
        self.dp1_inv.zeroize();
    }
}

impl KeyPair {
    pub fn new(private_key: &[u8; LIMB_LENGTH * LIMB_BYTES]) -> Result<Self, Error> {
        let mut key_limb = [0; LIMB_LENGTH];
        parse_big_endian(&mut key_limb, private_key)?;
        let d = Scalar::from_limbs(key_limb);
        key_limb.zeroize();
        KeyPair::from_scalar(d)
    }

    /// Generates a fresh key pair.
    pub fn generate(rng: &mut dyn SecureRandom) -> Result<Self, Error> {
        let d = create_private_key(rng)?;
        KeyPair::from_scalar(d)
    }

    fn from_scalar(mut d: Scalar) -> Result<Self, Error> {
        if let Err(e) = check_private_key(&d) {
            d.zeroize();
            return Err(e);
        }

        let public = PublicKey::public_from_private(&d)?;
        let dp1_inv = elem_inv(&elem_to_mont(&elem_add(&d, &SCALAR_ONE)));

        Ok(KeyPair { d, dp1_inv, public })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Checks `d * G == Q` and the public key itself.
    pub fn check_key(&self) -> Result<(), Error> {
        self.public.check_key()?;
        let q = base_point_mul(&self.d.limbs);
        if !bool::from(q.ct_eq(&self.public.to_point())) {
            return Err(Error::key_mismatch());
        }
        Ok(())
    }

    /// Signs `message` under the default user id.
    pub fn sign(&self, rng: &mut dyn SecureRandom, message: &[u8]) -> Result<Signature, Error> {
        self.sign_with_id(rng, DEFAULT_USER_ID, message)
    }

    pub fn sign_with_id(
        &self,
        rng: &mut dyn SecureRandom,
        id: &[u8],
        message: &[u8],
    ) -> Result<Signature, Error> {
        let digest = message_digest(id, &self.public, message)?;
        self.sign_digest(rng, &digest)
    }

    /// Signs a digest, drawing a new `k` for every attempt. A failing random
    /// source ends signing at once.
    pub fn sign_digest(
        &self,
        rng: &mut dyn SecureRandom,
        digest: &[u8],
    ) -> Result<Signature, Error> {
        let e = digest_to_scalar(digest)?;

        for attempt in 0..SIGN_MAX_ATTEMPTS {
            let mut k = gen_k(rng)?;
            let signed = self.sign_with_k(&e, &k);
            k.zeroize();

            match signed? {
                Ok(sig) => return Ok(sig),
                Err(reason) => log::trace!("signing attempt {} rejected: {:?}", attempt, reason),
            }
        }

        log::debug!("no signature after {} attempts", SIGN_MAX_ATTEMPTS);
        Err(Error::sign_retries_error())
    }

    /// Signs a digest with a caller-chosen `k` in [1, n). A `k` that the
    /// signing equation rejects is reported as `ZeroError`; nothing is
    /// retried.
    pub fn sign_digest_with_k(
        &self,
        digest: &[u8],
        k: &[u8; LIMB_LENGTH * LIMB_BYTES],
    ) -> Result<Signature, Error> {
        let e = digest_to_scalar(digest)?;
        let mut k = Scalar::from_be_bytes(k)?;
        if k.is_zero() {
            return Err(Error::zero_error());
        }

        let signed = self.sign_with_k(&e, &k);
        k.zeroize();
        signed?.map_err(|reason| {
            log::trace!("signing with a fixed k rejected: {:?}", reason);
            Error::zero_error()
        })
    }

    /// One attempt:
    /// r = (e + x1) mod n, s = (1 + d)^-1 * (k - r * d) mod n.
    fn sign_with_k(&self, e: &Scalar, k: &Scalar) -> Result<Result<Signature, Rejected>, Error> {
        let (x1, _) = base_point_mul(&k.limbs).to_affine()?;
        Ok(self.finish_signature(e, k, &x1))
    }

    fn finish_signature(
        &self,
        e: &Scalar,
        k: &Scalar,
        x1: &FieldElem,
    ) -> Result<Signature, Rejected> {
        let x1 = elem_reduced_to_scalar(&elem_to_unencoded(x1));

        let r = elem_add(e, &x1);
        if r.is_zero() {
            return Err(Rejected::RIsZero);
        }
        if elem_add(&r, k).is_zero() {
            return Err(Rejected::RPlusKIsZero);
        }

        let rd = elem_mul(&elem_to_mont(&r), &self.d);
        let s = elem_mul(&self.dp1_inv, &elem_sub(k, &rd));
        if s.is_zero() {
            return Err(Rejected::SIsZero);
        }

        Ok(Signature::from_scalars(r, s))
    }

    /// Key agreement: the big-endian x-coordinate of `d * Q`.
    pub fn shared_secret(&self, peer: &PublicKey) -> Result<[u8; FIELD_BYTES], Error> {
        let shared = point_mul(&peer.to_point(), &self.d.limbs);
        let mut x = [0; FIELD_BYTES];
        let mut y = [0; FIELD_BYTES];
        let result = big_endian_affine_from_jacobian(&mut x, &mut y, &shared);
        y.zeroize();
        result?;
        Ok(x)
    }
}
