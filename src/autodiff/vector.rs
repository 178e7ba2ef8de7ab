/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Add, Sub};

use mmdiff_array_types::V3;

use crate::{DerivOrder, DomainError, DomainResult, Scalar};

/// Three [`Scalar`]s over a shared parameter space.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector3(pub [Scalar; 3]);

impl Vector3 {
    /// A point whose coordinates are the parameters `first_index..first_index + 3`.
    pub fn param(size: usize, deriv: DerivOrder, position: V3, first_index: usize) -> Vector3 {
        Vector3([
            Scalar::param(size, deriv, position[0], first_index),
            Scalar::param(size, deriv, position[1], first_index + 1),
            Scalar::param(size, deriv, position[2], first_index + 2),
        ])
    }

    pub fn constant(size: usize, deriv: DerivOrder, value: V3) -> Vector3 {
        Vector3([
            Scalar::constant(size, deriv, value[0]),
            Scalar::constant(size, deriv, value[1]),
            Scalar::constant(size, deriv, value[2]),
        ])
    }

    pub fn values(&self) -> V3
    { V3::from_fn(|k| self.0[k].value()) }

    pub fn size(&self) -> usize { self.0[0].size() }
    pub fn deriv(&self) -> DerivOrder { self.0[0].deriv() }

    /// Multiply each component by a scalar.
    pub fn scaled(&self, factor: &Scalar) -> Vector3 {
        let [x, y, z] = &self.0;
        Vector3([x * factor, y * factor, z * factor])
    }

    /// Divide each component by a scalar.
    pub fn try_div_scalar(&self, divisor: &Scalar) -> DomainResult<Vector3> {
        let recip = divisor.recip()?;
        Ok(self.scaled(&recip))
    }

    pub fn sqnorm(&self) -> Scalar
    { dot(self, self) }

    /// Euclidean norm; fails for an exactly zero vector.
    pub fn norm(&self) -> DomainResult<Scalar> {
        let sqnorm = self.sqnorm();
        if sqnorm.value() == 0.0 {
            return Err(DomainError::ZeroLength);
        }
        sqnorm.sqrt()
    }

    /// The unit vector in this direction.
    pub fn normalized(&self) -> DomainResult<Vector3> {
        let norm = self.norm()?;
        self.try_div_scalar(&norm)
    }
}

pub fn dot(a: &Vector3, b: &Vector3) -> Scalar {
    let mut out = &a.0[0] * &b.0[0];
    out += &(&a.0[1] * &b.0[1]);
    out += &(&a.0[2] * &b.0[2]);
    out
}

pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
    let [ax, ay, az] = &a.0;
    let [bx, by, bz] = &b.0;
    Vector3([
        ay * bz - &(az * by),
        az * bx - &(ax * bz),
        ax * by - &(ay * bx),
    ])
}

impl<'a, 'b> Add<&'b Vector3> for &'a Vector3 {
    type Output = Vector3;

    fn add(self, other: &'b Vector3) -> Vector3 {
        let [ax, ay, az] = &self.0;
        let [bx, by, bz] = &other.0;
        Vector3([ax + bx, ay + by, az + bz])
    }
}

impl<'a, 'b> Sub<&'b Vector3> for &'a Vector3 {
    type Output = Vector3;

    fn sub(self, other: &'b Vector3) -> Vector3 {
        let [ax, ay, az] = &self.0;
        let [bx, by, bz] = &other.0;
        Vector3([ax - bx, ay - by, az - bz])
    }
}
