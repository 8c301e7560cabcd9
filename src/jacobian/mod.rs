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

//! Points in Jacobian coordinates `(X, Y, Z)` for the affine point
//! `(X / Z^2, Y / Z^3)`, coordinates in Montgomery form. `Z = 0` is the point
//! at infinity.

pub mod exchange;
pub mod mul;

use crate::elem::FieldElem;
use crate::err::Error;
use crate::limb::Limb;
use crate::sm2p256::{Modulus, CURVE_PARAMS, P256};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub x: FieldElem,
    pub y: FieldElem,
    pub z: FieldElem,
}

impl Point {
    pub const fn identity() -> Self {
        Point {
            x: FieldElem::zero(),
            y: FieldElem::zero(),
            z: FieldElem::zero(),
        }
    }

    pub fn generator() -> Self {
        Point::from_affine(&CURVE_PARAMS.gx, &CURVE_PARAMS.gy)
    }

    pub fn from_affine(x: &FieldElem, y: &FieldElem) -> Self {
        Point {
            x: *x,
            y: *y,
            z: FieldElem::from_limbs(P256::R),
        }
    }

    pub fn is_infinity(&self) -> Choice {
        mask_choice(P256::is_zero(&self.z.limbs))
    }

    /// Affine `(x, y)`, still in Montgomery form.
    pub fn to_affine(&self) -> Result<(FieldElem, FieldElem), Error> {
        exchange::affine_from_jacobian(self)
    }
}

impl ConditionallySelectable for Point {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Point {
            x: FieldElem::conditional_select(&a.x, &b.x, choice),
            y: FieldElem::conditional_select(&a.y, &b.y, choice),
            z: FieldElem::conditional_select(&a.z, &b.z, choice),
        }
    }
}

/// Equality of the represented points, not of the coordinates.
impl ConstantTimeEq for Point {
    fn ct_eq(&self, other: &Self) -> Choice {
        let z1z1 = P256::sqr(&self.z.limbs);
        let z2z2 = P256::sqr(&other.z.limbs);
        let x1 = P256::mul(&self.x.limbs, &z2z2);
        let x2 = P256::mul(&other.x.limbs, &z1z1);
        let y1 = P256::mul(&self.y.limbs, &P256::mul(&z2z2, &other.z.limbs));
        let y2 = P256::mul(&other.y.limbs, &P256::mul(&z1z1, &self.z.limbs));

        let self_inf = self.is_infinity();
        let other_inf = other.is_infinity();
        let coords = x1[..].ct_eq(&x2[..]) & y1[..].ct_eq(&y2[..]);
        (self_inf & other_inf) | (!self_inf & !other_inf & coords)
    }
}

#[inline]
fn mask_choice(mask: Limb) -> Choice {
    Choice::from((mask & 1) as u8)
}

pub fn point_neg(p: &Point) -> Point {
    Point {
        x: p.x,
        y: FieldElem::from_limbs(P256::neg(&p.y.limbs)),
        z: p.z,
    }
}

/// Doubling for curves with a = -3.
pub fn point_double(p: &Point) -> Point {
    let (x, y, z) = (&p.x.limbs, &p.y.limbs, &p.z.limbs);

    let zz = P256::sqr(z);
    let z3 = P256::dbl(&P256::mul(y, z));

    // m = 3 (x - z^2)(x + z^2)
    let m = P256::tpl(&P256::mul(&P256::add(x, &zz), &P256::sub(x, &zz)));

    let yy4 = P256::sqr(&P256::dbl(y));
    let yyyy8 = P256::div2(&P256::sqr(&yy4));
    let s = P256::mul(&yy4, x);

    let x3 = P256::sub(&P256::sqr(&m), &P256::dbl(&s));
    let y3 = P256::sub(&P256::mul(&m, &P256::sub(&s, &x3)), &yyyy8);

    Point {
        x: FieldElem::from_limbs(x3),
        y: FieldElem::from_limbs(y3),
        z: FieldElem::from_limbs(z3),
    }
}

/// Complete addition. Either input may be infinity and the inputs may be
/// equal; every case runs the same operations and the result is chosen by
/// mask.
pub fn point_add(p: &Point, q: &Point) -> Point {
    let (x1, y1, z1) = (&p.x.limbs, &p.y.limbs, &p.z.limbs);
    let (x2, y2, z2) = (&q.x.limbs, &q.y.limbs, &q.z.limbs);

    let z1z1 = P256::sqr(z1);
    let z2z2 = P256::sqr(z2);
    let u1 = P256::mul(x1, &z2z2);
    let u2 = P256::mul(x2, &z1z1);
    let s1 = P256::mul(y1, &P256::mul(&z2z2, z2));
    let s2 = P256::mul(y2, &P256::mul(&z1z1, z1));

    let h = P256::sub(&u2, &u1);
    let r = P256::sub(&s2, &s1);

    let hh = P256::sqr(&h);
    let hhh = P256::mul(&hh, &h);
    let v = P256::mul(&u1, &hh);

    let x3 = P256::sub(&P256::sub(&P256::sqr(&r), &hhh), &P256::dbl(&v));
    let y3 = P256::sub(
        &P256::mul(&r, &P256::sub(&v, &x3)),
        &P256::mul(&s1, &hhh),
    );
    let z3 = P256::mul(&h, &P256::mul(z1, z2));

    let sum = Point {
        x: FieldElem::from_limbs(x3),
        y: FieldElem::from_limbs(y3),
        z: FieldElem::from_limbs(z3),
    };

    let p_inf = p.is_infinity();
    let q_inf = q.is_infinity();
    let same = mask_choice(P256::is_zero(&h) & P256::is_zero(&r)) & !p_inf & !q_inf;

    let mut out = Point::conditional_select(&sum, &point_double(p), same);
    out.conditional_assign(p, q_inf);
    out.conditional_assign(q, p_inf);
    out
}
