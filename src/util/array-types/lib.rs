/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense 3-vectors and 3x3 matrices.
//!
//! Only what the rest of the workspace needs is provided: `V3` for positions,
//! displacements and gradients, and `M33` for lattices.

#[cfg(test)]
#[macro_use]
extern crate mmdiff_assert_close;

#[cfg(feature = "serde-support")]
#[macro_use]
extern crate serde_derive;

mod types;
mod ops;
mod methods;

pub use crate::types::*;
pub use crate::methods::*;
