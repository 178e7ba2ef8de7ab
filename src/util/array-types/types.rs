/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Deref, DerefMut};
use std::fmt;

/// A 3-dimensional vector with operations for linear algebra.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct V3<X=f64>(pub [X; 3]);

/// A linear algebra dense matrix with 3 rows and fixed width.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct M3<V>(pub [V; 3]);

/// A square dense 3x3 matrix.
pub type M33<X=f64> = M3<V3<X>>;

macro_rules! impl_array_like {
    ($Cn:ident $T:ident) => {
        impl<$T> Deref for $Cn<$T> {
            type Target = [$T; 3];

            #[inline(always)]
            fn deref(&self) -> &Self::Target
            { &self.0 }
        }

        impl<$T> DerefMut for $Cn<$T> {
            #[inline(always)]
            fn deref_mut(&mut self) -> &mut Self::Target
            { &mut self.0 }
        }

        impl<'a, $T> IntoIterator for &'a $Cn<$T> {
            type Item = &'a $T;
            type IntoIter = std::slice::Iter<'a, $T>;

            #[inline(always)]
            fn into_iter(self) -> Self::IntoIter
            { self.0.iter() }
        }

        // no surrounding "V3(...)", so that debug output is valid JSON
        impl<$T: fmt::Debug> fmt::Debug for $Cn<$T> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
            { fmt::Debug::fmt(&self.0, f) }
        }
    };
}

impl_array_like!{V3 X}
impl_array_like!{M3 V}

impl<X> From<[X; 3]> for V3<X> {
    #[inline(always)]
    fn from(arr: [X; 3]) -> Self { V3(arr) }
}

impl mmdiff_assert_close::CheckClose for V3 {
    type Scalar = f64;

    fn check_close(
        &self,
        other: &Self,
        tol: mmdiff_assert_close::Tolerances,
    ) -> Result<(), mmdiff_assert_close::CheckCloseError<f64>> {
        self.0.check_close(&other.0, tol)
    }
}
