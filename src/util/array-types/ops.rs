/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Add, Sub, AddAssign, SubAssign, Neg};
use std::ops::{Mul, Div, MulAssign, DivAssign};

use crate::{V3, M33};

// Operators are generated for every combination of owned and borrowed operands.
macro_rules! impl_binop_variants {
    ($Trait:ident $method:ident, $Lhs:ty, $Rhs:ty, $Out:ty, |$a:ident, $b:ident| $body:expr) => {
        impl $Trait<$Rhs> for $Lhs {
            type Output = $Out;
            #[inline]
            fn $method(self, other: $Rhs) -> $Out { let ($a, $b) = (&self, &other); $body }
        }
        impl<'a> $Trait<$Rhs> for &'a $Lhs {
            type Output = $Out;
            #[inline]
            fn $method(self, other: $Rhs) -> $Out { let ($a, $b) = (self, &other); $body }
        }
        impl<'b> $Trait<&'b $Rhs> for $Lhs {
            type Output = $Out;
            #[inline]
            fn $method(self, other: &'b $Rhs) -> $Out { let ($a, $b) = (&self, other); $body }
        }
        impl<'a, 'b> $Trait<&'b $Rhs> for &'a $Lhs {
            type Output = $Out;
            #[inline]
            fn $method(self, other: &'b $Rhs) -> $Out { let ($a, $b) = (self, other); $body }
        }
    };
}

// ---------------------------------------------------------------------------
// vector-vector

impl_binop_variants!{Add add, V3, V3, V3, |a, b| V3::from_fn(|k| a[k] + b[k])}
impl_binop_variants!{Sub sub, V3, V3, V3, |a, b| V3::from_fn(|k| a[k] - b[k])}

impl<'b> AddAssign<&'b V3> for V3 {
    #[inline]
    fn add_assign(&mut self, other: &'b V3) { *self = *self + other; }
}

impl AddAssign<V3> for V3 {
    #[inline]
    fn add_assign(&mut self, other: V3) { *self += &other; }
}

impl<'b> SubAssign<&'b V3> for V3 {
    #[inline]
    fn sub_assign(&mut self, other: &'b V3) { *self = *self - other; }
}

impl SubAssign<V3> for V3 {
    #[inline]
    fn sub_assign(&mut self, other: V3) { *self -= &other; }
}

impl Neg for V3 {
    type Output = V3;
    #[inline]
    fn neg(self) -> V3 { self.map(|x| -x) }
}

impl<'a> Neg for &'a V3 {
    type Output = V3;
    #[inline]
    fn neg(self) -> V3 { self.map(|x| -x) }
}

// ---------------------------------------------------------------------------
// vector-scalar

impl Mul<f64> for V3 {
    type Output = V3;
    #[inline]
    fn mul(self, scalar: f64) -> V3 { self.map(|x| x * scalar) }
}

impl<'a> Mul<f64> for &'a V3 {
    type Output = V3;
    #[inline]
    fn mul(self, scalar: f64) -> V3 { self.map(|x| x * scalar) }
}

impl Mul<V3> for f64 {
    type Output = V3;
    #[inline]
    fn mul(self, vector: V3) -> V3 { vector * self }
}

impl<'a> Mul<&'a V3> for f64 {
    type Output = V3;
    #[inline]
    fn mul(self, vector: &'a V3) -> V3 { vector * self }
}

impl Div<f64> for V3 {
    type Output = V3;
    #[inline]
    fn div(self, scalar: f64) -> V3 { self.map(|x| x / scalar) }
}

impl<'a> Div<f64> for &'a V3 {
    type Output = V3;
    #[inline]
    fn div(self, scalar: f64) -> V3 { self.map(|x| x / scalar) }
}

impl MulAssign<f64> for V3 {
    #[inline]
    fn mul_assign(&mut self, scalar: f64) { *self = *self * scalar; }
}

impl DivAssign<f64> for V3 {
    #[inline]
    fn div_assign(&mut self, scalar: f64) { *self = *self / scalar; }
}

// ---------------------------------------------------------------------------
// matrices

// row-vector times matrix; this is how fractional coords become cartesian
// when the rows of the matrix are lattice vectors.
impl_binop_variants!{Mul mul, V3, M33, V3, |v, m| V3::from_fn(|c| (0..3).map(|r| v[r] * m[r][c]).sum())}

// matrix times column-vector
impl_binop_variants!{Mul mul, M33, V3, V3, |m, v| V3::from_fn(|r| m[r].dot(v))}

impl_binop_variants!{Mul mul, M33, M33, M33, |a, b| M33::from_fn(|r, c| (0..3).map(|k| a[r][k] * b[k][c]).sum())}
impl_binop_variants!{Add add, M33, M33, M33, |a, b| M33::from_fn(|r, c| a[r][c] + b[r][c])}
impl_binop_variants!{Sub sub, M33, M33, M33, |a, b| M33::from_fn(|r, c| a[r][c] - b[r][c])}

impl Mul<f64> for M33 {
    type Output = M33;
    #[inline]
    fn mul(self, scalar: f64) -> M33 { M33::from_fn(|r, c| self[r][c] * scalar) }
}

impl Div<f64> for M33 {
    type Output = M33;
    #[inline]
    fn div(self, scalar: f64) -> M33 { M33::from_fn(|r, c| self[r][c] / scalar) }
}
