/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Add, Sub, Mul, Neg, AddAssign, SubAssign, MulAssign};

use crate::{DerivOrder, DomainError, DomainResult};

/// Arguments of `acos`/`asin` this far beyond `±1` are treated as rounding
/// error and clamped; anything further out is a [`DomainError`].
pub const ARC_CLAMP_TOL: f64 = 1e-12;

/// A value with its gradient and Hessian over a parameter space of fixed size.
///
/// The Hessian is dense, row-major and symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    size: usize,
    deriv: DerivOrder,
    value: f64,
    // `size` elements when gradients are tracked, else empty
    d: Vec<f64>,
    // `size * size` elements when Hessians are tracked, else empty
    dd: Vec<f64>,
}

/// The derivatives of a [`Scalar`], detached from the AD machinery.
#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    pub value: f64,
    pub gradient: Option<Vec<f64>>,
    /// Row-major.
    pub hessian: Option<Vec<f64>>,
}

impl Results {
    pub fn deriv(&self) -> DerivOrder {
        match (&self.gradient, &self.hessian) {
            (_, Some(_)) => DerivOrder::Hessian,
            (Some(_), None) => DerivOrder::Gradient,
            (None, None) => DerivOrder::Value,
        }
    }
}

impl Scalar {
    /// A quantity that does not depend on any parameter.
    pub fn constant(size: usize, deriv: DerivOrder, value: f64) -> Scalar {
        Scalar {
            size, deriv, value,
            d: match deriv.has_gradient() {
                true => vec![0.0; size],
                false => vec![],
            },
            dd: match deriv.has_hessian() {
                true => vec![0.0; size * size],
                false => vec![],
            },
        }
    }

    /// The parameter at `index`: unit gradient, zero Hessian.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    pub fn param(size: usize, deriv: DerivOrder, value: f64, index: usize) -> Scalar {
        assert!(index < size, "parameter index {} out of range for size {}", index, size);
        let mut out = Scalar::constant(size, deriv, value);
        if deriv.has_gradient() {
            out.d[index] = 1.0;
        }
        out
    }

    /// A constant over the same parameter space as `self`.
    pub fn constant_like(&self, value: f64) -> Scalar
    { Scalar::constant(self.size, self.deriv, value) }

    #[inline] pub fn size(&self) -> usize { self.size }
    #[inline] pub fn deriv(&self) -> DerivOrder { self.deriv }
    #[inline] pub fn value(&self) -> f64 { self.value }

    pub fn gradient(&self) -> Option<&[f64]> {
        match self.deriv.has_gradient() {
            true => Some(&self.d),
            false => None,
        }
    }

    pub fn hessian(&self) -> Option<&[f64]> {
        match self.deriv.has_hessian() {
            true => Some(&self.dd),
            false => None,
        }
    }

    pub fn into_results(self) -> Results {
        let Scalar { deriv, value, d, dd, .. } = self;
        Results {
            value,
            gradient: if deriv.has_gradient() { Some(d) } else { None },
            hessian: if deriv.has_hessian() { Some(dd) } else { None },
        }
    }

    fn assert_compatible(&self, other: &Scalar) {
        assert_eq!(
            (self.size, self.deriv), (other.size, other.deriv),
            "operands live in different parameter spaces",
        );
    }

    /// Replace `x` by `f(x)`, given `f(x)`, `f'(x)` and `f''(x)`.
    ///
    /// Derivatives that are not tracked are ignored, so they may be garbage.
    pub fn apply(&mut self, value: f64, d_x: f64, dd_x_x: f64) {
        let n = self.size;
        // needs the old gradient, so it comes first
        if self.deriv.has_hessian() {
            for i in 0..n {
                for j in 0..n {
                    let k = i * n + j;
                    self.dd[k] = d_x * self.dd[k] + dd_x_x * self.d[i] * self.d[j];
                }
            }
        }
        for d in &mut self.d {
            *d *= d_x;
        }
        self.value = value;
    }

    /// Multiply by a constant in place.
    pub fn scale(&mut self, factor: f64) {
        self.value *= factor;
        self.d.iter_mut().for_each(|x| *x *= factor);
        self.dd.iter_mut().for_each(|x| *x *= factor);
    }

    pub fn square(&self) -> Scalar {
        let x = self.value;
        let mut out = self.clone();
        out.apply(x * x, 2.0 * x, 2.0);
        out
    }

    /// `1 / self`.
    pub fn recip(&self) -> DomainResult<Scalar> {
        let x = self.value;
        if x == 0.0 {
            return Err(DomainError::DivisionByZero);
        }
        let mut out = self.clone();
        out.apply(1.0 / x, -1.0 / (x * x), 2.0 / (x * x * x));
        Ok(out)
    }

    /// Quotient rule, applied in place.
    pub fn try_div_assign(&mut self, other: &Scalar) -> DomainResult<()> {
        self.assert_compatible(other);
        let recip = other.recip()?;
        *self *= &recip;
        Ok(())
    }

    pub fn try_div(&self, other: &Scalar) -> DomainResult<Scalar> {
        let mut out = self.clone();
        out.try_div_assign(other)?;
        Ok(out)
    }

    /// Square root.
    ///
    /// Zero is only accepted when no derivatives are tracked, since the
    /// derivative diverges there.
    pub fn sqrt(&self) -> DomainResult<Scalar> {
        let x = self.value;
        let with_derivatives = self.deriv.has_gradient();
        if !(x > 0.0 || (x == 0.0 && !with_derivatives)) {
            return Err(DomainError::Sqrt { value: x, with_derivatives });
        }
        let root = x.sqrt();
        let mut out = self.clone();
        match with_derivatives {
            true => out.apply(root, 0.5 / root, -0.25 / (root * x)),
            false => out.value = root,
        }
        Ok(out)
    }

    /// Arc cosine, with the clamping policy described at [`ARC_CLAMP_TOL`].
    pub fn acos(&self) -> DomainResult<Scalar> {
        let x = self.arc_argument("acos")?;
        let mut out = self.clone();
        match self.deriv.has_gradient() {
            true => {
                let s = 1.0 - x * x;
                let r = 1.0 / s.sqrt();
                out.apply(x.acos(), -r, -x * r / s);
            },
            false => out.value = x.acos(),
        }
        Ok(out)
    }

    /// Arc sine, with the clamping policy described at [`ARC_CLAMP_TOL`].
    pub fn asin(&self) -> DomainResult<Scalar> {
        let x = self.arc_argument("asin")?;
        let mut out = self.clone();
        match self.deriv.has_gradient() {
            true => {
                let s = 1.0 - x * x;
                let r = 1.0 / s.sqrt();
                out.apply(x.asin(), r, x * r / s);
            },
            false => out.value = x.asin(),
        }
        Ok(out)
    }

    fn arc_argument(&self, function: &'static str) -> DomainResult<f64> {
        let value = self.value;
        // (negated to also catch NaN)
        if !(value.abs() <= 1.0 + ARC_CLAMP_TOL) {
            return Err(DomainError::ArcArgument { function, value });
        }
        let x = value.max(-1.0).min(1.0);
        if self.deriv.has_gradient() && x.abs() == 1.0 {
            return Err(DomainError::ArcSingular { function, value });
        }
        Ok(x)
    }
}

// ---------------------------------------------------------------------------

impl<'a> AddAssign<&'a Scalar> for Scalar {
    fn add_assign(&mut self, other: &'a Scalar) {
        self.assert_compatible(other);
        self.value += other.value;
        self.d.iter_mut().zip(&other.d).for_each(|(a, b)| *a += b);
        self.dd.iter_mut().zip(&other.dd).for_each(|(a, b)| *a += b);
    }
}

impl<'a> SubAssign<&'a Scalar> for Scalar {
    fn sub_assign(&mut self, other: &'a Scalar) {
        self.assert_compatible(other);
        self.value -= other.value;
        self.d.iter_mut().zip(&other.d).for_each(|(a, b)| *a -= b);
        self.dd.iter_mut().zip(&other.dd).for_each(|(a, b)| *a -= b);
    }
}

impl<'a> MulAssign<&'a Scalar> for Scalar {
    fn mul_assign(&mut self, other: &'a Scalar) {
        self.assert_compatible(other);
        let n = self.size;
        let (a, b) = (self.value, other.value);
        if self.deriv.has_hessian() {
            for i in 0..n {
                for j in 0..n {
                    let k = i * n + j;
                    self.dd[k] = b * self.dd[k] + a * other.dd[k]
                        + self.d[i] * other.d[j] + other.d[i] * self.d[j];
                }
            }
        }
        self.d.iter_mut().zip(&other.d).for_each(|(da, db)| *da = b * *da + a * db);
        self.value = a * b;
    }
}

impl AddAssign<f64> for Scalar {
    fn add_assign(&mut self, other: f64) { self.value += other; }
}

impl SubAssign<f64> for Scalar {
    fn sub_assign(&mut self, other: f64) { self.value -= other; }
}

impl MulAssign<f64> for Scalar {
    fn mul_assign(&mut self, other: f64) { self.scale(other); }
}

macro_rules! impl_binop_from_assign {
    ($($Trait:ident $method:ident $op_assign:tt;)*) => {$(
        impl<'a, 'b> $Trait<&'b Scalar> for &'a Scalar {
            type Output = Scalar;

            fn $method(self, other: &'b Scalar) -> Scalar {
                let mut out = self.clone();
                out $op_assign other;
                out
            }
        }

        impl<'b> $Trait<&'b Scalar> for Scalar {
            type Output = Scalar;

            fn $method(mut self, other: &'b Scalar) -> Scalar {
                self $op_assign other;
                self
            }
        }

        impl<'a> $Trait<f64> for &'a Scalar {
            type Output = Scalar;

            fn $method(self, other: f64) -> Scalar {
                let mut out = self.clone();
                out $op_assign other;
                out
            }
        }

        impl $Trait<f64> for Scalar {
            type Output = Scalar;

            fn $method(mut self, other: f64) -> Scalar {
                self $op_assign other;
                self
            }
        }
    )*};
}

impl_binop_from_assign! {
    Add add +=;
    Sub sub -=;
    Mul mul *=;
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(mut self) -> Scalar {
        self.scale(-1.0);
        self
    }
}

impl<'a> Neg for &'a Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar { -self.clone() }
}
