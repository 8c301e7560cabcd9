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

//! SM2 signatures and key agreement over the SM2 recommended 256-bit curve,
//! with the SM3 hash, in constant time.
//!
//! ```
//! use rand::SeedableRng;
//! use sm2_core::{sm2_verify, KeyPair, Sm3};
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let key_pair = KeyPair::generate(&mut rng).unwrap();
//! let sig = key_pair.sign(&mut rng, b"hello").unwrap();
//! sig.verify(key_pair.public_key(), b"hello").unwrap();
//!
//! let digest = Sm3::digest(b"abc");
//! let sig = key_pair.sign_digest(&mut rng, &digest).unwrap();
//! assert!(sm2_verify(&digest, key_pair.public_key(), &sig));
//! ```

#![deny(unstable_features, unused_qualifications, variant_size_differences)]
#![forbid(
    anonymous_parameters,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![warn(unused_results)]

mod ec;
pub mod elem;
mod err;
mod inv;
pub mod jacobian;
mod key;
pub mod limb;
mod norop;
mod rand;
pub mod sm2p256;
pub mod sm3;
pub mod za;

pub use crate::rand::SecureRandom;
pub use ec::{sm2_sign, sm2_verify, KeyPair, Signature, SIGNATURE_LEN, SIGN_MAX_ATTEMPTS};
pub use err::Error;
pub use key::private::GEN_K_MAX_ATTEMPTS;
pub use key::public::{PublicKey, COMPRESSED_PUBLIC_KEY_LEN, PUBLIC_KEY_LEN};
pub use sm3::Sm3;
pub use za::DEFAULT_USER_ID;
