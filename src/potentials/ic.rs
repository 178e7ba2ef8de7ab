/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Internal coordinates with their Cartesian gradients and Hessians.
//!
//! Every function takes the positions of the atoms defining the coordinate
//! and returns [`Results`] over their flattened coordinates, so atom `k` owns
//! parameters `3k..3k + 3`. Nothing here differentiates by hand; each
//! coordinate is a composition of autodiff operations.

use std::f64::consts::PI;

use mmdiff_array_types::V3;
use mmdiff_autodiff::{DerivOrder, DomainResult, Results, Scalar, Vector3, dot, cross};

fn tag_atoms(positions: &[V3], deriv: DerivOrder) -> Vec<Vector3> {
    let size = 3 * positions.len();
    positions.iter().enumerate()
        .map(|(i, &pos)| Vector3::param(size, deriv, pos, 3 * i))
        .collect()
}

/// Distance between two atoms.
pub fn bond_length(p: &[V3; 2], deriv: DerivOrder) -> DomainResult<Results> {
    let x = tag_atoms(p, deriv);
    Ok((&x[0] - &x[1]).norm()?.into_results())
}

fn bend_cos_scalar(p: &[V3; 3], deriv: DerivOrder) -> DomainResult<Scalar> {
    let x = tag_atoms(p, deriv);
    let a = (&x[0] - &x[1]).normalized()?;
    let c = (&x[2] - &x[1]).normalized()?;
    Ok(dot(&a, &c))
}

/// Cosine of the angle at `p[1]`.
pub fn bend_cos(p: &[V3; 3], deriv: DerivOrder) -> DomainResult<Results>
{ Ok(bend_cos_scalar(p, deriv)?.into_results()) }

/// The angle at `p[1]`, in `[0, pi]`.
///
/// With derivatives, fails for exactly linear or folded geometries.
pub fn bend_angle(p: &[V3; 3], deriv: DerivOrder) -> DomainResult<Results>
{ Ok(bend_cos_scalar(p, deriv)?.acos()?.into_results()) }

// unit normals of the planes (p1, p2, p3) and (p2, p3, p4), and the axis p2 -> p3
fn dihed_frame(p: &[V3; 4], deriv: DerivOrder) -> DomainResult<(Vector3, Vector3, Vector3)> {
    let x = tag_atoms(p, deriv);
    let a = &x[0] - &x[1];
    let b = &x[2] - &x[1];
    let c = &x[3] - &x[2];
    let n1 = cross(&a, &b).normalized()?;
    let n2 = cross(&c, &b).normalized()?;
    Ok((n1, n2, b))
}

/// Cosine of the torsion about the `p[1]`–`p[2]` bond.
pub fn dihed_cos(p: &[V3; 4], deriv: DerivOrder) -> DomainResult<Results> {
    let (n1, n2, _) = dihed_frame(p, deriv)?;
    Ok(dot(&n1, &n2).into_results())
}

/// Torsion about the `p[1]`–`p[2]` bond, in `[-pi, pi]`.
///
/// Zero when `p[0]` and `p[3]` are eclipsed. Positive when
/// `((p0 - p1) x (p3 - p2)) . (p2 - p1) > 0`, that is, counter-clockwise
/// when looking from `p[2]` back towards `p[1]`.
///
/// Near `0` and `pi` the angle is computed from its sine instead of its
/// cosine, so it stays differentiable for planar geometries.
pub fn dihed_angle(p: &[V3; 4], deriv: DerivOrder) -> DomainResult<Results> {
    let (n1, n2, axis) = dihed_frame(p, deriv)?;
    let cos = dot(&n1, &n2);

    let angle = if cos.value().abs() < 0.5 {
        let mut angle = cos.acos()?;
        let (a, b, c) = (p[0] - p[1], p[2] - p[1], p[3] - p[2]);
        if a.cross(&c).dot(&b) < 0.0 {
            angle.scale(-1.0);
        }
        angle
    } else {
        let sin = dot(&cross(&n1, &n2), &axis.normalized()?);
        let mut angle = sin.asin()?;
        if cos.value() < 0.0 {
            angle.scale(-1.0);
            angle += if sin.value() >= 0.0 { PI } else { -PI };
        }
        angle
    };
    Ok(angle.into_results())
}

// sine of the angle between p4 - p1 and the plane through p1, p2, p3
fn opbend_sin(p: &[V3; 4], deriv: DerivOrder) -> DomainResult<Scalar> {
    let x = tag_atoms(p, deriv);
    let a = &x[1] - &x[0];
    let b = &x[2] - &x[0];
    let c = &x[3] - &x[0];
    let normal = cross(&a, &b).normalized()?;
    Ok(dot(&normal, &c.normalized()?))
}

/// Cosine of the angle between `p[3] - p[0]` and the plane of `p[0..3]`.
pub fn opbend_cos(p: &[V3; 4], deriv: DerivOrder) -> DomainResult<Results> {
    let sin = opbend_sin(p, deriv)?;
    let mut cos_sq = -sin.square();
    cos_sq += 1.0;
    Ok(cos_sq.sqrt()?.into_results())
}

/// Angle between `p[3] - p[0]` and the plane of `p[0..3]`, in
/// `[-pi/2, pi/2]`. Positive on the side of `(p1 - p0) x (p2 - p0)`.
pub fn opbend_angle(p: &[V3; 4], deriv: DerivOrder) -> DomainResult<Results>
{ Ok(opbend_sin(p, deriv)?.asin()?.into_results()) }

/// Re-express results computed for some atoms over a larger tuple of atoms.
///
/// Atom `i` of `results` becomes atom `slots[i]` of a tuple of `num_atoms`.
pub fn embed(results: Results, slots: &[usize], num_atoms: usize) -> Results {
    let n_in = 3 * slots.len();
    let n_out = 3 * num_atoms;
    let index: Vec<usize> = {
        slots.iter()
            .flat_map(|&slot| (0..3).map(move |k| 3 * slot + k))
            .collect()
    };
    assert!(index.iter().all(|&i| i < n_out), "slot out of range");

    let gradient = results.gradient.map(|local| {
        let mut out = vec![0.0; n_out];
        for (i, x) in local.into_iter().enumerate() {
            out[index[i]] += x;
        }
        out
    });
    let hessian = results.hessian.map(|local| {
        let mut out = vec![0.0; n_out * n_out];
        for i in 0..n_in {
            for j in 0..n_in {
                out[index[i] * n_out + index[j]] += local[i * n_in + j];
            }
        }
        out
    });
    Results { value: results.value, gradient, hessian }
}
