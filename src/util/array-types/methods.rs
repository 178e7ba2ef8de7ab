/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{V3, M3, M33};

impl<X> V3<X> {
    /// Construct a vector from a function on indices.
    #[inline(always)]
    pub fn from_fn<F: FnMut(usize) -> X>(mut f: F) -> Self
    { V3([f(0), f(1), f(2)]) }

    /// Apply a function to each element.
    #[inline(always)]
    pub fn map<Y, F: FnMut(X) -> Y>(self, mut f: F) -> V3<Y>
    where X: Copy,
    { V3([f(self.0[0]), f(self.0[1]), f(self.0[2])]) }
}

impl V3 {
    #[inline(always)]
    pub fn zero() -> Self { V3([0.0; 3]) }

    #[inline]
    pub fn dot(&self, other: &V3) -> f64
    { self[0] * other[0] + self[1] * other[1] + self[2] * other[2] }

    #[inline]
    pub fn sqnorm(&self) -> f64 { self.dot(self) }

    #[inline]
    pub fn norm(&self) -> f64 { self.sqnorm().sqrt() }

    /// Get the unit vector in this direction.
    ///
    /// The output will contain NaN for a zero vector.
    #[inline]
    pub fn unit(&self) -> V3 { self / self.norm() }

    #[inline]
    pub fn cross(&self, other: &V3) -> V3 {
        V3([
            self[1] * other[2] - self[2] * other[1],
            self[2] * other[0] - self[0] * other[2],
            self[0] * other[1] - self[1] * other[0],
        ])
    }
}

impl<X: Copy> M3<V3<X>> {
    /// Construct a matrix from a function on `(row, col)` indices.
    #[inline(always)]
    pub fn from_fn<F: FnMut(usize, usize) -> X>(mut f: F) -> Self
    { M3([V3::from_fn(|c| f(0, c)), V3::from_fn(|c| f(1, c)), V3::from_fn(|c| f(2, c))]) }

    #[inline]
    pub fn t(&self) -> Self
    { M3::from_fn(|r, c| self[c][r]) }
}

impl M33 {
    #[inline]
    pub fn eye() -> Self
    { M33::from_fn(|r, c| if r == c { 1.0 } else { 0.0 }) }

    #[inline]
    pub fn zero() -> Self
    { M3([V3::zero(); 3]) }

    #[inline]
    pub fn from_array(arr: [[f64; 3]; 3]) -> Self
    { M3([V3(arr[0]), V3(arr[1]), V3(arr[2])]) }

    #[inline]
    pub fn det(&self) -> f64
    { self[0].dot(&self[1].cross(&self[2])) }

    /// Matrix inverse, or `None` if the determinant is zero.
    pub fn inv(&self) -> Option<M33> {
        let det = self.det();
        if det == 0.0 {
            return None;
        }
        // the columns of the inverse are the cross products of the rows
        let cofactor_t = M3([
            self[1].cross(&self[2]),
            self[2].cross(&self[0]),
            self[0].cross(&self[1]),
        ]);
        Some(cofactor_t.t() / det)
    }
}

/// Flatten a list of vectors into `[x0, y0, z0, x1, ...]`.
pub fn flatten(vs: &[V3]) -> Vec<f64>
{ vs.iter().flat_map(|v| v.0.iter().cloned()).collect() }
