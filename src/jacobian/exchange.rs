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

use crate::elem::{
    elem_add, elem_inv, elem_mul, elem_sqr, elem_to_mont, elem_to_unencoded, FieldElem, Unencoded,
};
use crate::err::Error;
use crate::inv::mont_pow;
use crate::jacobian::Point;
use crate::limb::{limb_mask, limb_select, Limb, LIMB_BYTES, LIMB_LENGTH};
use crate::norop::big_endian_from_limbs;
use crate::sm2p256::{Modulus, CURVE_PARAMS, P256};

pub const FIELD_BYTES: usize = LIMB_LENGTH * LIMB_BYTES;

/// (p + 1) / 4. p = 3 mod 4, so `c^((p + 1) / 4)` is a square root of any
/// square `c`.
const SQRT_EXP: [Limb; LIMB_LENGTH] = [
    0x4000000000000000,
    0xffffffffc0000000,
    0xffffffffffffffff,
    0x3fffffffbfffffff,
];

pub fn big_endian_affine_from_jacobian(
    x_out: &mut [u8; FIELD_BYTES],
    y_out: &mut [u8; FIELD_BYTES],
    point: &Point,
) -> Result<(), Error> {
    let (x_aff, y_aff) = affine_from_jacobian(point)?;
    let x = elem_to_unencoded(&x_aff);
    big_endian_from_limbs(&x.limbs, x_out);
    let y = elem_to_unencoded(&y_aff);
    big_endian_from_limbs(&y.limbs, y_out);

    Ok(())
}

/// Maps a point to affine coordinates, still in Montgomery form, with one
/// inversion of Z.
pub fn affine_from_jacobian(point: &Point) -> Result<(FieldElem, FieldElem), Error> {
    if bool::from(point.is_infinity()) {
        return Err(Error::infinity_error());
    }

    let z_inv = elem_inv(&point.z);
    let zz_inv = elem_sqr(&z_inv);

    let x_aff = elem_mul(&point.x, &zz_inv);
    let y_aff = {
        let zzz_inv = elem_mul(&zz_inv, &z_inv);
        elem_mul(&point.y, &zzz_inv)
    };

    verify_affine_point_is_on_the_curve((&x_aff, &y_aff), &CURVE_PARAMS.a, &CURVE_PARAMS.b)?;

    Ok((x_aff, y_aff))
}

pub fn verify_jacobian_point_is_on_the_curve(point: &Point) -> Result<(), Error> {
    if bool::from(point.is_infinity()) {
        return Err(Error::infinity_error());
    }

    let z2 = elem_sqr(&point.z);
    let z4 = elem_sqr(&z2);
    let z4_a = elem_mul(&z4, &CURVE_PARAMS.a);
    let z6 = elem_mul(&z4, &z2);
    let z6_b = elem_mul(&z6, &CURVE_PARAMS.b);

    verify_affine_point_is_on_the_curve((&point.x, &point.y), &z4_a, &z6_b)
}

pub fn verify_affine_point_is_on_the_curve(
    (x, y): (&FieldElem, &FieldElem),
    a: &FieldElem,
    b: &FieldElem,
) -> Result<(), Error> {
    let lhs = elem_sqr(y);
    let rhs = curve_rhs(x, a, b);

    if !lhs.is_equal(&rhs) {
        return Err(Error::not_on_curve_error());
    }
    Ok(())
}

/// x^3 + a x + b
fn curve_rhs(x: &FieldElem, a: &FieldElem, b: &FieldElem) -> FieldElem {
    let x2 = elem_sqr(x);
    let x2_a = elem_add(&x2, a);
    let x2_a_x = elem_mul(&x2_a, x);
    elem_add(&x2_a_x, b)
}

/// Builds a point from big-endian affine coordinates, checking range and
/// curve membership.
pub fn point_from_affine_bytes(x: &[u8], y: &[u8]) -> Result<Point, Error> {
    let x = elem_to_mont(&FieldElem::<Unencoded>::from_be_bytes(x)?);
    let y = elem_to_mont(&FieldElem::<Unencoded>::from_be_bytes(y)?);
    verify_affine_point_is_on_the_curve((&x, &y), &CURVE_PARAMS.a, &CURVE_PARAMS.b)?;
    Ok(Point::from_affine(&x, &y))
}

/// True when `(x, y)` are both below p and satisfy the curve equation.
pub fn is_point(x: &[u8], y: &[u8]) -> bool {
    point_from_affine_bytes(x, y).is_ok()
}

/// Square root in Montgomery form, if `c` is a square.
pub fn sqrt(c: &FieldElem) -> Result<FieldElem, Error> {
    let r = FieldElem::from_limbs(mont_pow::<P256>(&c.limbs, &SQRT_EXP));
    if !elem_sqr(&r).is_equal(c) {
        return Err(Error::no_square_root());
    }
    Ok(r)
}

/// Recovers the point with x-coordinate `x` whose y has the parity `odd`.
pub fn point_from_compressed(x: &[u8], odd: bool) -> Result<Point, Error> {
    let x = elem_to_mont(&FieldElem::<Unencoded>::from_be_bytes(x)?);
    let y = sqrt(&curve_rhs(&x, &CURVE_PARAMS.a, &CURVE_PARAMS.b))?;

    let y_plain = P256::from_mont(&y.limbs);
    let flip = limb_mask((y_plain[0] & 1) ^ Limb::from(odd));
    let y_neg = P256::neg(&y.limbs);
    let mut limbs = [0; LIMB_LENGTH];
    for i in 0..LIMB_LENGTH {
        limbs[i] = limb_select(flip, y_neg[i], y.limbs[i]);
    }
    Ok(Point::from_affine(&x, &FieldElem::from_limbs(limbs)))
}
