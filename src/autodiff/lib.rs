/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Forward-mode automatic differentiation to second order.
//!
//! A [`Scalar`] carries a value together with its gradient and Hessian with
//! respect to a small, fixed-size parameter space (typically the flattened
//! Cartesian coordinates of the two to four atoms defining one internal
//! coordinate). A [`Vector3`] is three such scalars over the same space.
//!
//! The [`DerivOrder`] chosen when the inputs are constructed decides what is
//! tracked: with `Value` no derivative storage is allocated at all, with
//! `Gradient` the Hessian is skipped. Every operation respects the order of
//! its operands, and operands of different orders or sizes may not be mixed.
//!
//! Operations that are undefined at the given input (division by an exact
//! zero, roots of negative numbers, arc functions outside `[-1, 1]`) fail
//! with a [`DomainError`] rather than producing infinities or NaN.

#[macro_use]
extern crate failure;

#[cfg(test)]
#[macro_use]
extern crate mmdiff_assert_close;

mod deriv;
mod error;
mod scalar;
mod vector;

pub use crate::deriv::DerivOrder;
pub use crate::error::{DomainError, InvalidDerivOrder};
pub use crate::scalar::{Scalar, Results, ARC_CLAMP_TOL};
pub use crate::vector::{Vector3, dot, cross};

pub type DomainResult<T> = Result<T, DomainError>;
