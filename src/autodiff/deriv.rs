/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::error::InvalidDerivOrder;

/// How many orders of derivatives are tracked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DerivOrder {
    /// Only the value.
    Value = 0,
    /// Value and gradient.
    Gradient = 1,
    /// Value, gradient and Hessian.
    Hessian = 2,
}

impl DerivOrder {
    pub fn from_int(order: u32) -> Result<Self, InvalidDerivOrder> {
        match order {
            0 => Ok(DerivOrder::Value),
            1 => Ok(DerivOrder::Gradient),
            2 => Ok(DerivOrder::Hessian),
            _ => Err(InvalidDerivOrder(order)),
        }
    }

    #[inline(always)]
    pub fn to_int(self) -> u32 { self as u32 }

    #[inline(always)]
    pub fn has_gradient(self) -> bool { self >= DerivOrder::Gradient }

    #[inline(always)]
    pub fn has_hessian(self) -> bool { self >= DerivOrder::Hessian }
}

impl Default for DerivOrder {
    fn default() -> Self { DerivOrder::Gradient }
}
