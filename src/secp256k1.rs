//! Point arithmetic on the secp256k1 curve `y^2 = x^3 + 7` over `F_p`,
//! `p = 2^256 - 2^32 - 977`, plus x-coordinate recovery from
//! `(r, recovery_id)`.
//!
//! Field operations (`add_mod`/`sub_mod`/`mul_mod`/`mod_inverse`) run in
//! [`crate::bigint::U256`]. Scalar multiplication by a secret scalar uses a
//! Montgomery ladder: every bit of the scalar performs the same add-and-
//! double work and a constant-time mask selects which accumulator receives
//! which result, so the number and shape of field operations never depends
//! on the scalar's bit pattern. Public-path recovery is variable-time — it
//! never touches secret material.

use crate::bigint::U256;
use crate::error::{Error, Result};

#[inline]
fn field(hex: &str) -> U256 {
    U256::from_be_bytes(&crate::hex::decode_to_array::<32>(hex).expect("valid built-in constant"))
}

/// The field prime `p = 2^256 - 2^32 - 977`.
pub fn p() -> U256 {
    field("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f")
}

/// The group order `n`.
pub fn n() -> U256 {
    field("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
}

/// `G.x`.
fn gx() -> U256 {
    field("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
}

/// `G.y`.
fn gy() -> U256 {
    field("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8")
}

/// A point on the curve in affine coordinates, or the point at infinity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Point {
    Infinity,
    Affine(U256, U256),
}

impl Point {
    pub fn generator() -> Point {
        Point::Affine(gx(), gy())
    }

    pub fn x(&self) -> Option<U256> {
        match self {
            Point::Affine(x, _) => Some(*x),
            Point::Infinity => None,
        }
    }

    pub fn y(&self) -> Option<U256> {
        match self {
            Point::Affine(_, y) => Some(*y),
            Point::Infinity => None,
        }
    }

    /// 64-byte uncompressed encoding (`x || y`, no `0x04` prefix), as used
    /// for Ethereum address derivation.
    pub fn to_uncompressed(&self) -> Result<[u8; 64]> {
        match self {
            Point::Affine(x, y) => {
                let mut out = [0u8; 64];
                out[..32].copy_from_slice(&x.to_be_bytes());
                out[32..].copy_from_slice(&y.to_be_bytes());
                Ok(out)
            }
            Point::Infinity => Err(Error::InvalidRange),
        }
    }

    /// 33-byte SEC1 compressed encoding.
    pub fn to_compressed(&self) -> Result<[u8; 33]> {
        match self {
            Point::Affine(x, y) => {
                let mut out = [0u8; 33];
                out[0] = if y.bit(0) { 0x03 } else { 0x02 };
                out[1..].copy_from_slice(&x.to_be_bytes());
                Ok(out)
            }
            Point::Infinity => Err(Error::InvalidRange),
        }
    }

    pub fn is_on_curve(&self) -> bool {
        match self {
            Point::Infinity => true,
            Point::Affine(x, y) => {
                let p = p();
                let lhs = y.mul_mod(y, &p);
                let x2 = x.mul_mod(x, &p);
                let x3 = x2.mul_mod(x, &p);
                let rhs = x3.add_mod(&U256::from_u64(7), &p);
                lhs == rhs
            }
        }
    }
}

/// Conditionally swaps two points in constant time based on `bit` (0 or 1).
fn cswap(bit: u8, a: &mut Point, b: &mut Point) {
    let mask = 0u64.wrapping_sub(bit as u64);
    let (ax, ay) = match *a {
        Point::Affine(x, y) => (x, y),
        Point::Infinity => (U256::ZERO, U256::ZERO),
    };
    let (bx, by) = match *b {
        Point::Affine(x, y) => (x, y),
        Point::Infinity => (U256::ZERO, U256::ZERO),
    };
    let a_is_inf = matches!(a, Point::Infinity);
    let b_is_inf = matches!(b, Point::Infinity);

    let new_ax = select_u256(mask, bx, ax);
    let new_ay = select_u256(mask, by, ay);
    let new_bx = select_u256(mask, ax, bx);
    let new_by = select_u256(mask, ay, by);
    let new_a_inf = if bit == 1 { b_is_inf } else { a_is_inf };
    let new_b_inf = if bit == 1 { a_is_inf } else { b_is_inf };

    *a = if new_a_inf {
        Point::Infinity
    } else {
        Point::Affine(new_ax, new_ay)
    };
    *b = if new_b_inf {
        Point::Infinity
    } else {
        Point::Affine(new_bx, new_by)
    };
}

fn select_u256(mask: u64, a: U256, b: U256) -> U256 {
    let mut out = [0u64; 4];
    for i in 0..4 {
        out[i] = (a.0[i] & mask) | (b.0[i] & !mask);
    }
    U256(out)
}

/// Point doubling.
pub fn double(pt: &Point) -> Point {
    match pt {
        Point::Infinity => Point::Infinity,
        Point::Affine(x, y) => {
            if y.is_zero() {
                return Point::Infinity;
            }
            let p = p();
            let three_x2 = U256::from_u64(3).mul_mod(&x.mul_mod(x, &p), &p);
            let two_y = U256::from_u64(2).mul_mod(y, &p);
            let inv_two_y = match two_y.mod_inverse(&p) {
                Some(v) => v,
                None => return Point::Infinity,
            };
            let lambda = three_x2.mul_mod(&inv_two_y, &p);
            let lambda2 = lambda.mul_mod(&lambda, &p);
            let x3 = lambda2.sub_mod(&x.add_mod(x, &p), &p);
            let y3 = lambda.mul_mod(&x.sub_mod(&x3, &p), &p).sub_mod(y, &p);
            Point::Affine(x3, y3)
        }
    }
}

/// Point addition.
pub fn add(a: &Point, b: &Point) -> Point {
    match (a, b) {
        (Point::Infinity, _) => *b,
        (_, Point::Infinity) => *a,
        (Point::Affine(x1, y1), Point::Affine(x2, y2)) => {
            let p = p();
            if x1 == x2 {
                if y1 == y2 {
                    return double(a);
                }
                // y1 == -y2 mod p: sum is the point at infinity.
                return Point::Infinity;
            }
            let dx = x2.sub_mod(x1, &p);
            let dy = y2.sub_mod(y1, &p);
            let inv_dx = match dx.mod_inverse(&p) {
                Some(v) => v,
                None => return Point::Infinity,
            };
            let lambda = dy.mul_mod(&inv_dx, &p);
            let lambda2 = lambda.mul_mod(&lambda, &p);
            let x3 = lambda2.sub_mod(x1, &p).sub_mod(x2, &p);
            let y3 = lambda.mul_mod(&x1.sub_mod(&x3, &p), &p).sub_mod(y1, &p);
            Point::Affine(x3, y3)
        }
    }
}

/// Scalar multiplication `scalar * point` via a Montgomery ladder — see the
/// module doc for the constant-time rationale. Always performs exactly 256
/// ladder steps regardless of `scalar`.
pub fn scalar_mul(point: &Point, scalar: &U256) -> Point {
    let mut r0 = Point::Infinity;
    let mut r1 = *point;
    for i in (0..256).rev() {
        let bit = scalar.bit(i) as u8;
        cswap(bit, &mut r0, &mut r1);
        r1 = add(&r0, &r1);
        r0 = double(&r0);
        cswap(bit, &mut r0, &mut r1);
    }
    r0
}

/// `scalar * G`.
pub fn scalar_mul_base(scalar: &U256) -> Point {
    scalar_mul(&Point::generator(), scalar)
}

/// Recovers the candidate public-key point from `(r, recovery_id)` and the
/// message hash, per SEC1 §4.1.6 / Ethereum's `ecrecover` convention.
///
/// `recovery_id` bit 0 selects the parity of `R.y`; bit 1 (`>= 2`) signals
/// `R.x = r + n` (the "x overflowed the field" case, astronomically rare
/// but must be handled correctly per spec.md 4.5 step 5).
pub fn recover_point(r: &U256, recovery_id: u8) -> Result<Point> {
    let p = p();
    let n = n();
    let mut x = *r;
    if recovery_id & 2 != 0 {
        x = x.checked_add(&n).ok_or(Error::InvalidRange)?;
        if x >= p {
            return Err(Error::InvalidRange);
        }
    }
    if x.is_zero() || x >= p {
        return Err(Error::InvalidRange);
    }

    let x2 = x.mul_mod(&x, &p);
    let x3 = x2.mul_mod(&x, &p);
    let rhs = x3.add_mod(&U256::from_u64(7), &p);

    // p = 3 mod 4, so a modular square root is rhs^((p+1)/4) mod p.
    let exp = p
        .wrapping_add(&U256::ONE)
        .shr(2);
    let candidate_y = rhs.pow_mod(&exp, &p);
    if candidate_y.mul_mod(&candidate_y, &p) != rhs {
        return Err(Error::InvalidSignature);
    }

    let y_is_odd = candidate_y.bit(0);
    let want_odd = recovery_id & 1 != 0;
    let y = if y_is_odd == want_odd {
        candidate_y
    } else {
        p.wrapping_sub(&candidate_y)
    };

    let point = Point::Affine(x, y);
    if !point.is_on_curve() {
        return Err(Error::InvalidSignature);
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_on_curve() {
        assert!(Point::generator().is_on_curve());
    }

    #[test]
    fn doubling_matches_addition() {
        let g = Point::generator();
        let doubled = double(&g);
        let added = add(&g, &g);
        assert_eq!(doubled, added);
        assert!(doubled.is_on_curve());
    }

    #[test]
    fn scalar_mul_one_is_identity() {
        let g = Point::generator();
        assert_eq!(scalar_mul(&g, &U256::ONE), g);
    }

    #[test]
    fn scalar_mul_two_matches_double() {
        let g = Point::generator();
        assert_eq!(scalar_mul(&g, &U256::from_u64(2)), double(&g));
    }

    #[test]
    fn scalar_mul_base_matches_direct() {
        let k = U256::from_u64(12345);
        assert_eq!(scalar_mul_base(&k), scalar_mul(&Point::generator(), &k));
    }
}
