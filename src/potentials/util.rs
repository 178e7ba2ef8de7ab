/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Random geometry helpers for the unit tests.

use mmdiff_array_types::V3;
use rand::Rng;

pub(crate) fn uniform(a: f64, b: f64) -> f64 { rand::thread_rng().gen_range(a..b) }

pub(crate) fn random_v3(a: f64, b: f64) -> V3 { V3::from_fn(|_| uniform(a, b)) }

fn cos_between(a: V3, b: V3) -> f64 { a.unit().dot(&b.unit()) }

// Far enough from the singular configurations of every internal coordinate
// that finite differences behave.
fn is_well_conditioned(p: &[V3]) -> bool {
    for i in 0..p.len() {
        for j in 0..i {
            if (p[i] - p[j]).norm() < 0.7 {
                return false;
            }
        }
    }
    let bent = |a: V3, b: V3| cos_between(a, b).abs() < 0.95;
    if p.len() >= 3 && !bent(p[0] - p[1], p[2] - p[1]) {
        return false;
    }
    if p.len() >= 4 {
        if !bent(p[1] - p[2], p[3] - p[2]) || !bent(p[1] - p[0], p[2] - p[0]) {
            return false;
        }
        let normal = (p[1] - p[0]).cross(&(p[2] - p[0]));
        if cos_between(normal, p[3] - p[0]).abs() > 0.95 {
            return false;
        }
    }
    true
}

/// Random points in a small box, avoiding near-degenerate geometries.
pub(crate) fn random_points<const N: usize>() -> [V3; N] {
    loop {
        let mut out = [V3::zero(); N];
        for p in &mut out {
            *p = random_v3(-3.0, 3.0);
        }
        if is_well_conditioned(&out) {
            return out;
        }
    }
}

/// Displace each coordinate by up to `eps`, returning the new points and the flat displacement.
pub(crate) fn perturbed<const N: usize>(points: &[V3; N], eps: f64) -> ([V3; N], Vec<f64>) {
    let mut out = *points;
    let mut delta = Vec::with_capacity(3 * N);
    for p in &mut out {
        for k in 0..3 {
            let d = uniform(-eps, eps);
            p[k] += d;
            delta.push(d);
        }
    }
    (out, delta)
}
