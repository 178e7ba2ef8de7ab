/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The static description of a system: the periodic cell it lives in, the
//! bond graph between its atoms, and predicates that classify atoms by their
//! place in that graph.
//!
//! Coordinates are not part of this crate's data; they are passed around as
//! plain `&[V3]` by whoever evaluates a force field.

#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[cfg(test)] #[macro_use] extern crate mmdiff_assert_close;

mod cell;
mod image;
mod graph;
mod predicate;

pub use crate::cell::{UnitCell, SingularCellError};
pub use crate::image::Image;
pub use crate::graph::{MolecularGraph, GraphError};
pub use crate::predicate::Predicate;
