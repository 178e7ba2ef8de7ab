/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::sync::Arc;

use mmdiff_array_types::{V3, M33};

/// A parallelepiped cell, periodic along any subset of its lattice vectors.
///
/// Along a non-periodic axis the lattice vector still defines the fractional
/// coordinate system, but no images are ever generated along it.
#[derive(Debug, Clone)]
pub struct UnitCell {
    // rows are the lattice vectors
    matrix: Arc<M33>,
    inverse: Arc<M33>,
    periodic: [bool; 3],
}

#[derive(Debug, Fail)]
#[fail(display = "unit cell matrix is singular: {:?}", matrix)]
pub struct SingularCellError {
    pub matrix: M33,
}

// the inverse is derived data
impl PartialEq for UnitCell {
    fn eq(&self, other: &UnitCell) -> bool {
        self.matrix == other.matrix && self.periodic == other.periodic
    }
}

impl UnitCell {
    /// Construct from a matrix whose rows are the lattice vectors.
    pub fn new(matrix: M33, periodic: [bool; 3]) -> Result<Self, SingularCellError> {
        let inverse = matrix.inv().ok_or(SingularCellError { matrix })?;
        Ok(UnitCell {
            matrix: Arc::new(matrix),
            inverse: Arc::new(inverse),
            periodic,
        })
    }

    /// A cell for isolated molecules.
    pub fn non_periodic() -> Self {
        UnitCell {
            matrix: Arc::new(M33::eye()),
            inverse: Arc::new(M33::eye()),
            periodic: [false; 3],
        }
    }

    /// Fully periodic orthorhombic cell.
    ///
    /// # Panics
    ///
    /// Panics if any length is zero.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        let matrix = M33::from_array([[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]]);
        match UnitCell::new(matrix, [true; 3]) {
            Ok(cell) => cell,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fully periodic cubic cell.
    pub fn cubic(a: f64) -> Self { UnitCell::orthorhombic(a, a, a) }

    pub fn with_periodicity(self, periodic: [bool; 3]) -> Self
    { UnitCell { periodic, ..self } }

    pub fn matrix(&self) -> &M33 { &self.matrix }
    pub fn inverse_matrix(&self) -> &M33 { &self.inverse }
    pub fn vectors(&self) -> &[V3; 3] { &self.matrix.0 }
    pub fn periodicity(&self) -> [bool; 3] { self.periodic }

    /// True if periodic along at least one axis.
    pub fn is_periodic(&self) -> bool { self.periodic.iter().any(|&p| p) }

    pub fn volume(&self) -> f64 { self.matrix.det().abs() }

    pub fn to_fracs(&self, cart: V3) -> V3 { cart * &*self.inverse }
    pub fn to_carts(&self, frac: V3) -> V3 { frac * &*self.matrix }

    /// Distance between adjacent lattice planes, for each lattice vector.
    pub fn plane_spacings(&self) -> [f64; 3] {
        // the columns of the inverse are the reciprocal vectors (without 2 pi)
        let recip = self.inverse.t();
        [1.0 / recip[0].norm(), 1.0 / recip[1].norm(), 1.0 / recip[2].norm()]
    }
}
