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

//! SM2 signatures: key pairs, signing and verification over a digest
//! `e = SM3(Z_A || M)`.

pub mod signing;
pub mod verification;

pub use signing::KeyPair;
pub use verification::{sm2_verify, Signature, SIGNATURE_LEN};

use crate::elem::Scalar;
use crate::err::Error;
use crate::limb::{LIMB_BYTES, LIMB_LENGTH};
use crate::norop::parse_big_endian;
use crate::rand::SecureRandom;
use crate::sm2p256::{Modulus, N256};

/// Upper bound on signing attempts before giving up.
pub const SIGN_MAX_ATTEMPTS: usize = 64;

/// `sm2_sign`: signs a precomputed digest with a fresh ephemeral scalar.
pub fn sm2_sign(
    digest: &[u8],
    key_pair: &KeyPair,
    rng: &mut dyn SecureRandom,
) -> Result<Signature, Error> {
    key_pair.sign_digest(rng, digest)
}

/// The leftmost 256 bits of the digest, reduced modulo n. Any 256-bit value
/// is below 2n, so one conditional subtraction suffices.
pub(crate) fn digest_to_scalar(digest: &[u8]) -> Result<Scalar, Error> {
    let len = core::cmp::min(digest.len(), LIMB_LENGTH * LIMB_BYTES);
    let mut limbs = [0; LIMB_LENGTH];
    parse_big_endian(&mut limbs, &digest[..len])?;
    Ok(Scalar::from_limbs(N256::reduce_once(&limbs, 0)))
}
