/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Energies as functions of a single internal coordinate.

use std::fmt;

use mmdiff_autodiff::DerivOrder;

/// An energy and its first two derivatives with respect to an internal coordinate.
///
/// Derivatives beyond the requested order may be left at zero.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct EnergyDerivs {
    pub value: f64,
    pub d_q: f64,
    pub dd_q_q: f64,
}

/// A scalar energy `E(q)`.
///
/// Implementations are shared between force fields and threads, so they
/// must not carry mutable state.
pub trait EnergyFunction: fmt::Debug + Send + Sync {
    fn evaluate(&self, q: f64, deriv: DerivOrder) -> EnergyDerivs;
}

/// `E(q) = sum_k c_k q^p_k`, with possibly negative integer powers.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSeries {
    terms: Vec<(i32, f64)>,
}

impl PowerSeries {
    /// `terms` are `(power, coefficient)` pairs.
    pub fn new(terms: Vec<(i32, f64)>) -> PowerSeries
    { PowerSeries { terms } }

    pub fn terms(&self) -> &[(i32, f64)]
    { &self.terms }
}

impl EnergyFunction for PowerSeries {
    fn evaluate(&self, q: f64, deriv: DerivOrder) -> EnergyDerivs {
        let mut out = EnergyDerivs::default();
        for &(power, coeff) in &self.terms {
            let p = f64::from(power);
            out.value += coeff * q.powi(power);
            if deriv.has_gradient() {
                out.d_q += coeff * p * q.powi(power - 1);
            }
            if deriv.has_hessian() {
                out.dd_q_q += coeff * p * (p - 1.0) * q.powi(power - 2);
            }
        }
        out
    }
}

/// `E(q) = k (q - q0)^2 / 2`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Harmonic {
    pub force_constant: f64,
    pub rest_value: f64,
}

impl EnergyFunction for Harmonic {
    fn evaluate(&self, q: f64, _: DerivOrder) -> EnergyDerivs {
        let Harmonic { force_constant: k, rest_value } = *self;
        let dq = q - rest_value;
        EnergyDerivs {
            value: 0.5 * k * dq * dq,
            d_q: k * dq,
            dd_q_q: k,
        }
    }
}

/// `E(r) = q_i q_j / r`, in whatever units `charge_product` carries.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Coulomb {
    pub charge_product: f64,
}

impl EnergyFunction for Coulomb {
    fn evaluate(&self, r: f64, _: DerivOrder) -> EnergyDerivs {
        let value = self.charge_product / r;
        EnergyDerivs {
            value,
            d_q: -value / r,
            dd_q_q: 2.0 * value / (r * r),
        }
    }
}

/// Adapts a closure into an [`EnergyFunction`].
#[derive(Clone)]
pub struct FnEnergy<F>(pub F);

impl<F> fmt::Debug for FnEnergy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { f.write_str("FnEnergy(..)") }
}

impl<F> EnergyFunction for FnEnergy<F>
where F: Fn(f64, DerivOrder) -> EnergyDerivs + Send + Sync,
{
    fn evaluate(&self, q: f64, deriv: DerivOrder) -> EnergyDerivs
    { (self.0)(q, deriv) }
}

#[cfg(test)]
mod tests {
    use super::*;

    // central differences of value and d_q
    fn check_derivs(energy: &dyn EnergyFunction, q: f64) {
        let h = 1e-5;
        let at = |q| energy.evaluate(q, DerivOrder::Hessian);
        let (lo, mid, hi) = (at(q - h), at(q), at(q + h));
        assert_close!(rel=1e-6, mid.d_q, (hi.value - lo.value) / (2.0 * h));
        assert_close!(rel=1e-6, mid.dd_q_q, (hi.d_q - lo.d_q) / (2.0 * h));
    }

    #[test]
    fn power_series() {
        let series = PowerSeries::new(vec![(-2, 1.5), (0, 3.0), (1, -1.0), (3, 0.25)]);
        let out = series.evaluate(2.0, DerivOrder::Hessian);
        assert_close!(out.value, 1.5 / 4.0 + 3.0 - 2.0 + 2.0);
        assert_close!(out.d_q, -3.0 / 8.0 - 1.0 + 3.0);
        check_derivs(&series, 1.7);

        let value_only = series.evaluate(2.0, DerivOrder::Value);
        assert_eq!(value_only.value, out.value);
        assert_eq!((value_only.d_q, value_only.dd_q_q), (0.0, 0.0));
    }

    #[test]
    fn singular_power_is_not_finite() {
        let out = PowerSeries::new(vec![(-1, 1.0)]).evaluate(0.0, DerivOrder::Value);
        assert!(!out.value.is_finite());
    }

    #[test]
    fn closed_forms() {
        let harmonic = Harmonic { force_constant: 2.0, rest_value: 1.0 };
        assert_eq!(harmonic.evaluate(3.0, DerivOrder::Hessian), EnergyDerivs { value: 4.0, d_q: 4.0, dd_q_q: 2.0 });
        check_derivs(&Coulomb { charge_product: -0.7 }, 2.3);
        check_derivs(&FnEnergy(|q: f64, _: DerivOrder| EnergyDerivs { value: q.sin(), d_q: q.cos(), dd_q_q: -q.sin() }), 0.4);
    }
}
