/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

/// An operation was applied outside of the domain where it (or its
/// derivative) is defined.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum DomainError {
    #[fail(display = "division by zero")]
    DivisionByZero,

    #[fail(display = "square root of {} (derivatives requested: {})", value, with_derivatives)]
    Sqrt { value: f64, with_derivatives: bool },

    #[fail(display = "norm of a zero-length vector")]
    ZeroLength,

    #[fail(display = "{} argument {} is outside of [-1, 1]", function, value)]
    ArcArgument { function: &'static str, value: f64 },

    #[fail(display = "derivative of {} is singular at argument {}", function, value)]
    ArcSingular { function: &'static str, value: f64 },
}

#[derive(Debug, Fail, Clone, PartialEq)]
#[fail(display = "derivative order must be 0, 1, or 2 (got {})", _0)]
pub struct InvalidDerivOrder(pub u32);
