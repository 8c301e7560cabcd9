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
use crate::jacobian::{point_add, point_double, Point};
use crate::limb::{Limb, LIMB_BITS, LIMB_LENGTH};
use subtle::{ConditionallySelectable, ConstantTimeEq};

const WINDOW_BITS: usize = 4;
const WINDOW_MASK: Limb = (1 << WINDOW_BITS) - 1;
const WINDOWS: usize = LIMB_LENGTH * LIMB_BITS / WINDOW_BITS;
const TABLE_LEN: usize = (1 << WINDOW_BITS) - 1;

#[inline]
fn window(k: &[Limb; LIMB_LENGTH], index: usize) -> Limb {
    let bit = index * WINDOW_BITS;
    (k[bit / LIMB_BITS] >> (bit % LIMB_BITS)) & WINDOW_MASK
}

/// Reads `table[digit - 1]`, or infinity for a zero digit, touching every
/// entry.
#[inline]
fn select(table: &[Point; TABLE_LEN], digit: Limb) -> Point {
    let mut t = Point::identity();
    for (i, entry) in table.iter().enumerate() {
        t.conditional_assign(entry, (i as Limb + 1).ct_eq(&digit));
    }
    t
}

/// `k * p` for any 256-bit `k`, with a fixed 4-bit window: four doublings
/// and one addition per window whatever the scalar bits are.
pub fn point_mul(p: &Point, k: &[Limb; LIMB_LENGTH]) -> Point {
    let mut table = [Point::identity(); TABLE_LEN];
    table[0] = *p;
    for i in 1..TABLE_LEN {
        table[i] = if i % 2 == 1 {
            point_double(&table[i / 2])
        } else {
            point_add(&table[i - 1], p)
        };
    }

    let mut acc = Point::identity();
    for index in (0..WINDOWS).rev() {
        for _ in 0..WINDOW_BITS {
            acc = point_double(&acc);
        }
        acc = point_add(&acc, &select(&table, window(k, index)));
    }
    acc
}

#[cfg(feature = "precomputed-table")]
mod table {
    use super::{select, window, TABLE_LEN, WINDOWS, WINDOW_BITS};
    use crate::jacobian::{point_add, point_double, Point};
    use crate::limb::{Limb, LIMB_LENGTH};
    use once_cell::sync::Lazy;

    /// Row `w` holds `j * 16^w * G` for `j = 1..=15`.
    static BASE_TABLE: Lazy<Vec<[Point; TABLE_LEN]>> = Lazy::new(build);

    fn build() -> Vec<[Point; TABLE_LEN]> {
        log::debug!("building base point table: {} windows", WINDOWS);
        let mut rows = Vec::with_capacity(WINDOWS);
        let mut base = Point::generator();
        for _ in 0..WINDOWS {
            let mut row = [Point::identity(); TABLE_LEN];
            row[0] = base;
            for j in 1..TABLE_LEN {
                row[j] = point_add(&row[j - 1], &base);
            }
            // 16 * base
            base = row[(1 << (WINDOW_BITS - 1)) - 1];
            base = point_double(&base);
            rows.push(row);
        }
        rows
    }

    pub(super) fn base_point_mul(k: &[Limb; LIMB_LENGTH]) -> Point {
        let mut acc = Point::identity();
        for (index, row) in BASE_TABLE.iter().enumerate() {
            acc = point_add(&acc, &select(row, window(k, index)));
        }
        acc
    }
    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::jacobian::mul::point_mul;
        use subtle::ConstantTimeEq;

        #[test]
        fn rows_step_by_sixteen() {
            assert_eq!(BASE_TABLE.len(), WINDOWS);
            let sixteen_g = point_mul(&Point::generator(), &[16, 0, 0, 0]);
            assert!(bool::from(BASE_TABLE[1][0].ct_eq(&sixteen_g)));
            let fifteen_g = point_mul(&Point::generator(), &[15, 0, 0, 0]);
            assert!(bool::from(BASE_TABLE[0][TABLE_LEN - 1].ct_eq(&fifteen_g)));
        }
    }
}

/// `k * G`.
#[cfg(feature = "precomputed-table")]
pub fn base_point_mul(k: &[Limb; LIMB_LENGTH]) -> Point {
    table::base_point_mul(k)
}

/// `k * G`.
#[cfg(not(feature = "precomputed-table"))]
pub fn base_point_mul(k: &[Limb; LIMB_LENGTH]) -> Point {
    point_mul(&Point::generator(), k)
}

/// `g_scalar * G + p_scalar * q`.
pub fn twin_mul(g_scalar: &Scalar, p_scalar: &Scalar, q: &Point) -> Point {
    let g_point = base_point_mul(&g_scalar.limbs);
    let p_point = point_mul(q, &p_scalar.limbs);
    point_add(&g_point, &p_point)
}
