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

use crate::elem::Scalar;
use crate::err::Error;
use crate::limb::{Limb, LIMB_BYTES, LIMB_LENGTH, ONE};
use crate::norop::{norop_add, norop_cmp, parse_big_endian};
use crate::rand::SecureRandom;
use crate::sm2p256::CURVE_PARAMS;
use zeroize::Zeroize;

pub const GEN_K_MAX_ATTEMPTS: usize = 100;

/// n - 2, the largest candidate `gen_k` accepts.
const N_MINUS_2: [Limb; LIMB_LENGTH] = [
    0x53bbf40939d54121,
    0x7203df6b21c6052b,
    0xffffffffffffffff,
    0xfffffffeffffffff,
];

/// n - 3, the largest candidate for a private key.
const N_MINUS_3: [Limb; LIMB_LENGTH] = [
    0x53bbf40939d54120,
    0x7203df6b21c6052b,
    0xffffffffffffffff,
    0xfffffffeffffffff,
];

/// Draws 32 random bytes until the value is at most `max` and returns it
/// plus one.
fn sample_scalar(rng: &mut dyn SecureRandom, max: &[Limb; LIMB_LENGTH]) -> Result<Scalar, Error> {
    let mut seed = [0; LIMB_LENGTH * LIMB_BYTES];
    let mut candidate = [0; LIMB_LENGTH];

    for _ in 0..GEN_K_MAX_ATTEMPTS {
        rng.fill(&mut seed)?;
        parse_big_endian(&mut candidate, &seed)?;

        if norop_cmp(&candidate, max) <= 0 {
            let (k, _) = norop_add(&candidate, &ONE);
            seed.zeroize();
            candidate.zeroize();
            return Ok(Scalar::from_limbs(k));
        }
    }

    seed.zeroize();
    candidate.zeroize();
    log::debug!("no scalar in range after {} draws", GEN_K_MAX_ATTEMPTS);
    Err(Error::seed_error())
}

/// An ephemeral signing scalar in [1, n - 1].
pub(crate) fn gen_k(rng: &mut dyn SecureRandom) -> Result<Scalar, Error> {
    sample_scalar(rng, &N_MINUS_2)
}

/// A private key in [1, n - 2]; n - 1 is excluded because 1 + d must be
/// invertible.
pub(crate) fn create_private_key(rng: &mut dyn SecureRandom) -> Result<Scalar, Error> {
    sample_scalar(rng, &N_MINUS_3)
}

/// Checks that a private scalar lies in [1, n - 2].
pub(crate) fn check_private_key(d: &Scalar) -> Result<(), Error> {
    if d.is_zero() {
        return Err(Error::zero_error());
    }
    if norop_cmp(&d.limbs, &N_MINUS_2) > 0 {
        return Err(Error::invalid_private_key());
    }
    debug_assert!(norop_cmp(&d.limbs, &CURVE_PARAMS.n) < 0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::tests::{BrokenRng, ReplayRng};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn be(limbs: &[Limb; LIMB_LENGTH]) -> [u8; 32] {
        Scalar::from_limbs(*limbs).to_be_bytes()
    }

    #[test]
    fn bounds_are_order_offsets() {
        let two = [2, 0, 0, 0];
        let three = [3, 0, 0, 0];
        let (n_minus_2, _) = crate::norop::norop_sub(&CURVE_PARAMS.n, &two);
        let (n_minus_3, _) = crate::norop::norop_sub(&CURVE_PARAMS.n, &three);
        assert_eq!(n_minus_2, N_MINUS_2);
        assert_eq!(n_minus_3, N_MINUS_3);
    }

    #[test]
    fn candidate_shifted_by_one() {
        let mut rng = ReplayRng(vec![[0; 32]]);
        assert_eq!(gen_k(&mut rng).unwrap().limbs, ONE);

        // n - 1 is out of range, n - 2 becomes n - 1
        let (n_minus_1, _) = crate::norop::norop_sub(&CURVE_PARAMS.n, &ONE);
        let mut rng = ReplayRng(vec![be(&n_minus_1), be(&N_MINUS_2)]);
        assert_eq!(gen_k(&mut rng).unwrap().limbs, n_minus_1);

        let mut rng = ReplayRng(vec![be(&N_MINUS_2), be(&N_MINUS_3)]);
        assert_eq!(create_private_key(&mut rng).unwrap().limbs, N_MINUS_2);
    }

    #[test]
    fn rng_failure_propagates() {
        assert_eq!(gen_k(&mut BrokenRng).unwrap_err(), Error::rng_error());
    }

    #[test]
    fn gives_up_after_bounded_draws() {
        let mut rng = ReplayRng(vec![[0xff; 32]; GEN_K_MAX_ATTEMPTS]);
        assert_eq!(gen_k(&mut rng).unwrap_err(), Error::seed_error());
    }

    #[test]
    fn random_keys_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..32 {
            let d = create_private_key(&mut rng).unwrap();
            check_private_key(&d).unwrap();
        }
    }

    #[test]
    fn private_key_range() {
        assert_eq!(
            check_private_key(&Scalar::zero()).unwrap_err(),
            Error::zero_error()
        );
        let (n_minus_1, _) = crate::norop::norop_sub(&CURVE_PARAMS.n, &ONE);
        assert_eq!(
            check_private_key(&Scalar::from_limbs(n_minus_1)).unwrap_err(),
            Error::invalid_private_key()
        );
        check_private_key(&Scalar::from_limbs(N_MINUS_2)).unwrap();
    }
}
