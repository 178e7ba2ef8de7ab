/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Molecular mechanics force fields with analytic gradients and Hessians.
//!
//! A [`ForceField`] is a list of [`Term`]s bound to a [`MolecularGraph`] and
//! [`UnitCell`]. Each term is an [`EnergyFunction`] of one internal
//! coordinate (see [`ic`]), applied to every tuple of atoms that its
//! predicates select. Evaluation sums the terms' energies, gradients and
//! Hessians into global Cartesian quantities.
//!
//! [`MolecularGraph`]: mmdiff_structure::MolecularGraph
//! [`UnitCell`]: mmdiff_structure::UnitCell

#[cfg(test)] #[macro_use] extern crate mmdiff_assert_close;

#[macro_use] extern crate failure;
#[macro_use] extern crate log;

pub mod ic;
pub mod energy;
mod term;
mod force_field;
mod from_config;
#[cfg(test)] pub(crate) mod util;

pub use crate::energy::{EnergyDerivs, EnergyFunction, PowerSeries, Harmonic, Coulomb, FnEnergy};
pub use crate::term::{Term, TermKind, PairFilter, TermFailure};
pub use crate::force_field::{ForceField, Evaluation, Hessian};

pub use mmdiff_autodiff::{DerivOrder, DomainError, Results};

pub type FailResult<T> = Result<T, failure::Error>;

/// Failure to build or evaluate a [`ForceField`].
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "term '{}' on atoms {:?}: {}", label, atoms, cause)]
    Domain {
        label: String,
        atoms: Vec<usize>,
        #[fail(cause)] cause: DomainError,
    },

    #[fail(display = "term '{}' on atoms {:?}: non-finite energy derivative {} at internal coordinate {}", label, atoms, value, ic)]
    NumericFault {
        label: String,
        atoms: Vec<usize>,
        ic: f64,
        value: f64,
    },

    #[fail(display = "term '{}': {}", label, message)]
    Configuration {
        label: String,
        message: String,
    },

    #[fail(display = "expected coordinates for {} atoms, got {}", expected, actual)]
    AtomCount {
        expected: usize,
        actual: usize,
    },
}
