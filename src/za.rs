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

//! The user-identity digest Z_A and the message representative e.

use crate::elem::{elem_to_unencoded, FieldElem};
use crate::err::Error;
use crate::key::public::PublicKey;
use crate::sm2p256::CURVE_PARAMS;
use crate::sm3::{Sm3, DIGEST_LEN};

/// The identity used when the signer does not name one.
pub const DEFAULT_USER_ID: &[u8] = b"1234567812345678";

/// ENTL_A is a 16-bit count of identity bits.
const MAX_ID_LEN: usize = (u16::MAX / 8) as usize;

fn plain_bytes(e: &FieldElem) -> [u8; 32] {
    elem_to_unencoded(e).to_be_bytes()
}

/// `Z_A = SM3(ENTL_A || ID || a || b || x_G || y_G || x_A || y_A)`.
pub fn compute_za(id: &[u8], public_key: &PublicKey) -> Result<[u8; DIGEST_LEN], Error> {
    if id.len() > MAX_ID_LEN {
        return Err(Error::invalid_encoding());
    }
    let entl = ((id.len() * 8) as u16).to_be_bytes();

    let mut hasher = Sm3::new();
    hasher.update(&entl);
    hasher.update(id);
    hasher.update(&plain_bytes(&CURVE_PARAMS.a));
    hasher.update(&plain_bytes(&CURVE_PARAMS.b));
    hasher.update(&plain_bytes(&CURVE_PARAMS.gx));
    hasher.update(&plain_bytes(&CURVE_PARAMS.gy));
    hasher.update(public_key.x());
    hasher.update(public_key.y());
    Ok(hasher.finalize())
}

/// `e = SM3(Z_A || M)`, the digest that is actually signed.
pub fn message_digest(
    id: &[u8],
    public_key: &PublicKey,
    message: &[u8],
) -> Result<[u8; DIGEST_LEN], Error> {
    let za = compute_za(id, public_key)?;
    let mut hasher = Sm3::new();
    hasher.update(&za);
    hasher.update(message);
    Ok(hasher.finalize())
}
