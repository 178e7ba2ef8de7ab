/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Molecular mechanics force fields with exact gradients and Hessians.
//!
//! Internal coordinates are built from a small forward-mode automatic
//! differentiation core, so every term of a force field yields its energy,
//! Cartesian gradient and Cartesian Hessian from one evaluation, without
//! any hand-derived formulas.
//!
//! This crate re-exports the workspace members and adds process-level
//! setup: logging, and loading a force field description from disk.

#[macro_use] extern crate log;

pub mod logging;

pub use mmdiff_array_types as array_types;
pub use mmdiff_autodiff as autodiff;
pub use mmdiff_structure as structure;
pub use mmdiff_config as config;
pub use mmdiff_potentials as potentials;

pub use mmdiff_array_types::{V3, M33};
pub use mmdiff_autodiff::{DerivOrder, DomainError, Results};
pub use mmdiff_structure::{MolecularGraph, Predicate, UnitCell};
pub use mmdiff_potentials::{
    Error, Evaluation, ForceField, Hessian, PairFilter, Term, TermKind,
    EnergyFunction, EnergyDerivs,
};

use std::fs::File;
use std::path::Path;

use failure::ResultExt;
use mmdiff_config::YamlRead;

pub type FailResult<T> = Result<T, failure::Error>;

/// Read a YAML force field description and bind it to a structure.
pub fn load_force_field(
    path: impl AsRef<Path>,
    graph: MolecularGraph,
    cell: UnitCell,
) -> FailResult<ForceField> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|_| format!("could not open {}", path.display()))?;
    let config = {
        config::ForceField::from_reader(file)
            .with_context(|_| format!("could not read force field from {}", path.display()))?
    };
    info!("Read {} terms from {}", config.terms.len(), path.display());

    Ok(ForceField::from_config(graph, cell, &config)?)
}
