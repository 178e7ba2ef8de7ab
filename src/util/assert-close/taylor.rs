/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Finite-difference consistency checks for analytic derivatives.
//!
//! Given a function evaluated at two nearby points `x` and `x + delta`, the
//! trapezoid rule predicts the change in value from the average gradient,
//! and the change in gradient from the average Hessian. Both predictions are
//! exact up to third order in `delta`, so for small steps the discrepancy
//! should be tiny relative to the size of the change itself.
//!
//! Hessians are dense and row-major.

/// The outcome of a finite-difference comparison.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Discrepancy {
    /// Difference between the observed and predicted change.
    pub error: f64,
    /// Size of the observed change.
    pub scale: f64,
}

#[derive(Debug, Fail)]
#[fail(display = "derivatives disagree with finite differences: error {:e} vs change {:e} (relative {:e} > {:e})", error, scale, relative, tol)]
pub struct TaylorError {
    pub error: f64,
    pub scale: f64,
    pub relative: f64,
    pub tol: f64,
}

impl Discrepancy {
    pub fn relative(&self) -> f64 {
        match self.error {
            e if e == 0.0 => 0.0,
            e => e / self.scale,
        }
    }

    /// Succeeds when the error is below `tol` times the observed change.
    pub fn check(&self, tol: f64) -> Result<(), TaylorError> {
        let relative = self.relative();
        if relative < tol {
            Ok(())
        } else {
            Err(TaylorError { error: self.error, scale: self.scale, relative, tol })
        }
    }
}

/// Checks `f(x+δ) - f(x) ≈ ½ (∇f(x) + ∇f(x+δ))·δ`.
pub fn first_order(
    delta: &[f64],
    (value_a, grad_a): (f64, &[f64]),
    (value_b, grad_b): (f64, &[f64]),
) -> Discrepancy {
    assert_eq!(delta.len(), grad_a.len());
    assert_eq!(delta.len(), grad_b.len());

    let observed = value_b - value_a;
    let predicted: f64 = {
        delta.iter().zip(grad_a).zip(grad_b)
            .map(|((d, ga), gb)| 0.5 * (ga + gb) * d)
            .sum()
    };
    Discrepancy {
        error: (observed - predicted).abs(),
        scale: observed.abs(),
    }
}

/// Checks `∇f(x+δ) - ∇f(x) ≈ ½ (H(x) + H(x+δ))·δ`, measured as a root mean square.
pub fn second_order(
    delta: &[f64],
    (grad_a, hess_a): (&[f64], &[f64]),
    (grad_b, hess_b): (&[f64], &[f64]),
) -> Discrepancy {
    let n = delta.len();
    assert_eq!(grad_a.len(), n);
    assert_eq!(grad_b.len(), n);
    assert_eq!(hess_a.len(), n * n);
    assert_eq!(hess_b.len(), n * n);

    let mut sq_error = 0.0;
    let mut sq_scale = 0.0;
    for row in 0..n {
        let observed = grad_b[row] - grad_a[row];
        let predicted: f64 = {
            (0..n).map(|col| 0.5 * (hess_a[row * n + col] + hess_b[row * n + col]) * delta[col])
                .sum()
        };
        sq_error += (observed - predicted).powi(2);
        sq_scale += observed.powi(2);
    }
    Discrepancy {
        error: (sq_error / n as f64).sqrt(),
        scale: (sq_scale / n as f64).sqrt(),
    }
}
