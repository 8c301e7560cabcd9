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
use crate::jacobian::exchange::{
    big_endian_affine_from_jacobian, point_from_affine_bytes, point_from_compressed, FIELD_BYTES,
};
use crate::jacobian::mul::{base_point_mul, point_mul};
use crate::jacobian::Point;
use crate::sm2p256::CURVE_PARAMS;

pub const PUBLIC_KEY_LEN: usize = 1 + (2 * FIELD_BYTES);
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 1 + FIELD_BYTES;

const TAG_UNCOMPRESSED: u8 = 0x04;
const TAG_EVEN: u8 = 0x02;
const TAG_ODD: u8 = 0x03;

/// An affine curve point other than infinity, kept in its uncompressed
/// SEC1 form. Construction checks that it lies on the curve.
#[derive(Copy, Clone, Debug)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LEN],
    point: Point,
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes[..] == other.bytes[..]
    }
}

impl Eq for PublicKey {}

impl PublicKey {
    pub fn new(x: &[u8; FIELD_BYTES], y: &[u8; FIELD_BYTES]) -> Result<Self, Error> {
        let point = point_from_affine_bytes(x, y)?;

        let mut bytes = [0; PUBLIC_KEY_LEN];
        bytes[0] = TAG_UNCOMPRESSED;
        bytes[1..1 + FIELD_BYTES].copy_from_slice(x);
        bytes[1 + FIELD_BYTES..].copy_from_slice(y);

        Ok(PublicKey { bytes, point })
    }

    /// Parses `04 || x || y` or `02/03 || x`.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match (bytes.first(), bytes.len()) {
            (Some(&TAG_UNCOMPRESSED), PUBLIC_KEY_LEN) => {
                let mut x = [0; FIELD_BYTES];
                let mut y = [0; FIELD_BYTES];
                x.copy_from_slice(&bytes[1..1 + FIELD_BYTES]);
                y.copy_from_slice(&bytes[1 + FIELD_BYTES..]);
                PublicKey::new(&x, &y)
            }
            (Some(&tag), COMPRESSED_PUBLIC_KEY_LEN) if tag == TAG_EVEN || tag == TAG_ODD => {
                let point = point_from_compressed(&bytes[1..], tag == TAG_ODD)?;
                PublicKey::from_point(&point)
            }
            _ => {
                log::debug!("rejected public key encoding of {} bytes", bytes.len());
                Err(Error::invalid_encoding())
            }
        }
    }

    pub(crate) fn from_point(point: &Point) -> Result<Self, Error> {
        let mut x = [0; FIELD_BYTES];
        let mut y = [0; FIELD_BYTES];
        big_endian_affine_from_jacobian(&mut x, &mut y, point)?;
        PublicKey::new(&x, &y)
    }

    pub fn public_from_private(d: &Scalar) -> Result<Self, Error> {
        PublicKey::from_point(&base_point_mul(&d.limbs))
    }

    pub fn bytes_less_safe(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_LEN] {
        let mut out = [0; COMPRESSED_PUBLIC_KEY_LEN];
        out[0] = TAG_EVEN | (self.bytes[PUBLIC_KEY_LEN - 1] & 1);
        out[1..].copy_from_slice(self.x());
        out
    }

    pub fn x(&self) -> &[u8] {
        &self.bytes[1..1 + FIELD_BYTES]
    }

    pub fn y(&self) -> &[u8] {
        &self.bytes[1 + FIELD_BYTES..]
    }

    pub fn to_point(&self) -> Point {
        self.point
    }

    /// Full validation: on the curve (checked at construction), not
    /// infinity, and of order n.
    pub fn check_key(&self) -> Result<(), Error> {
        if bool::from(self.point.is_infinity()) {
            return Err(Error::infinity_error());
        }
        if !bool::from(point_mul(&self.point, &CURVE_PARAMS.n).is_infinity()) {
            log::debug!("public key is not of order n");
            return Err(Error::invalid_order());
        }
        Ok(())
    }
}
