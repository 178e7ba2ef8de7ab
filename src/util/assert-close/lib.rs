/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Approximate comparisons for tests.
//!
//! `assert_close!` compares floats (and anything implementing [`CheckClose`])
//! with relative and absolute tolerances. The [`taylor`] module checks that
//! analytic derivatives agree with finite differences.

#[macro_use]
extern crate failure;

mod close;
pub mod taylor;

pub use crate::close::{CheckClose, CheckCloseError, Tolerances, is_close};

pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

/// Assert that two values are close.
///
/// ```text
/// assert_close!(a, b);
/// assert_close!(abs=1e-12, a, b);
/// assert_close!(rel=1e-4, abs=1e-10, a, b, "at step {}", i);
/// ```
///
/// The default is a relative tolerance of `DEFAULT_NONZERO_TOL` and no
/// absolute tolerance, so comparisons against exactly zero need `abs=`.
#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {
        $crate::__assert_close_parse!{
            [$($t)*]
            [rel: $crate::DEFAULT_NONZERO_TOL, abs: 0.0]
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __assert_close_parse {
    ([rel=$tol:expr, $($rest:tt)*] [rel: $_r:expr, abs: $abs:expr]) => {
        $crate::__assert_close_parse!{[$($rest)*] [rel: $tol, abs: $abs]}
    };
    ([abs=$tol:expr, $($rest:tt)*] [rel: $rel:expr, abs: $_a:expr]) => {
        $crate::__assert_close_parse!{[$($rest)*] [rel: $rel, abs: $tol]}
    };
    ([$a:expr, $b:expr $(,)*] $tols:tt) => {
        $crate::__assert_close_parse!{@go [$a, $b] $tols ["not nearly equal!"]}
    };
    ([$a:expr, $b:expr, $($fmt:tt)+] $tols:tt) => {
        $crate::__assert_close_parse!{@go [$a, $b] $tols [$($fmt)+]}
    };
    (@go [$a:expr, $b:expr] [rel: $rel:expr, abs: $abs:expr] [$($fmt:tt)+]) => {{
        let (a, b) = (&$a, &$b);
        let tol = $crate::Tolerances { rel: $rel, abs: $abs };
        if let Err(e) = $crate::CheckClose::check_close(a, b, tol) {
            panic!(
                "{} (tolerances: rel={}, abs={})\n left: {:?}\nright: {:?}\n{}",
                format!($($fmt)+), tol.rel, tol.abs, a, b, e,
            );
        }
    }};
}
