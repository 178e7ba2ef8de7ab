//! Structures and force fields shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use mmdiff::array_types::flatten;
use mmdiff::potentials::{Coulomb, Harmonic, PowerSeries};
use mmdiff::{DerivOrder, EnergyFunction, ForceField, MolecularGraph, PairFilter, Predicate};
use mmdiff::{Term, TermKind, UnitCell, V3};
use mmdiff_assert_close::taylor;

pub const H: u32 = 1;
pub const C: u32 = 6;

pub struct System {
    pub graph: MolecularGraph,
    pub cell: UnitCell,
    pub coords: Vec<V3>,
}

// small fixed distortion, so no coordinate sits on a symmetric special value
fn jitter(coords: &mut [V3], amount: f64) {
    for (i, p) in coords.iter_mut().enumerate() {
        let x = i as f64;
        *p += V3([(1.3 * x).sin(), (2.1 * x + 0.4).cos(), (0.7 * x + 1.0).sin()]) * amount;
    }
}

/// Planar ethene along x: `C0 H1 H2 C3 H4 H5`, with H1 and H4 on the `+y` side.
pub fn ethene() -> System {
    let graph = MolecularGraph::new(
        vec![C, H, H, C, H, H],
        &[(0, 1), (0, 2), (0, 3), (3, 4), (3, 5)],
    ).unwrap();
    let coords = vec![
        V3([0.0, 0.0, 0.0]),
        V3([-1.0, 1.75, 0.0]),
        V3([-1.0, -1.75, 0.0]),
        V3([2.5, 0.0, 0.0]),
        V3([3.5, 1.75, 0.0]),
        V3([3.5, -1.75, 0.0]),
    ];
    System { graph, cell: UnitCell::non_periodic(), coords }
}

/// Staggered ethane: `C0 C1`, then three hydrogens on each carbon.
pub fn ethane() -> System {
    let graph = MolecularGraph::new(
        vec![C, C, H, H, H, H, H, H],
        &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7)],
    ).unwrap();

    let third = 2.0 * std::f64::consts::PI / 3.0;
    let mut coords = vec![V3([-0.765, 0.0, 0.0]), V3([0.765, 0.0, 0.0])];
    for k in 0..3 {
        let phi = third * k as f64;
        coords.push(V3([-1.16, 1.02 * phi.cos(), 1.02 * phi.sin()]));
    }
    for k in 0..3 {
        let phi = third * k as f64 + 0.5 * third;
        coords.push(V3([1.16, 1.02 * phi.cos(), 1.02 * phi.sin()]));
    }
    jitter(&mut coords, 0.03);
    System { graph, cell: UnitCell::non_periodic(), coords }
}

pub const ETHANE_BOX: f64 = 8.956;

/// Ethane in a periodic cube, placed near a corner and wrapped into the
/// cell so that several bonds cross its faces.
pub fn ethane_in_box() -> System {
    let System { graph, mut coords, .. } = ethane();
    let corner = V3([0.3, 0.2, ETHANE_BOX - 0.2]);
    for p in &mut coords {
        *p = (*p + corner).map(|x| x.rem_euclid(ETHANE_BOX));
    }
    System { graph, cell: UnitCell::cubic(ETHANE_BOX), coords }
}

pub const CHAIN_PERIOD: f64 = 5.1;

/// A zigzag polyethylene chain along x: four carbons and eight hydrogens
/// per cell, periodic along x only. The bond from C3 to C0 crosses the cell
/// boundary.
pub fn polyethylene() -> System {
    let numbers = vec![C, C, C, C, H, H, H, H, H, H, H, H];
    let mut bonds = vec![(0, 1), (1, 2), (2, 3), (3, 0)];
    let mut coords = vec![];
    for k in 0..4 {
        let y = if k % 2 == 0 { 0.43 } else { -0.43 };
        coords.push(V3([1.275 * k as f64, y, 0.0]));
    }
    for k in 0..4 {
        let carbon = coords[k];
        let y = carbon[1] + carbon[1].signum() * 0.63;
        coords.push(V3([carbon[0], y, 0.89]));
        coords.push(V3([carbon[0], y, -0.89]));
        bonds.push((k, 4 + 2 * k));
        bonds.push((k, 5 + 2 * k));
    }
    jitter(&mut coords, 0.02);

    let graph = MolecularGraph::new(numbers, &bonds).unwrap();
    let cell = UnitCell::orthorhombic(CHAIN_PERIOD, 20.0, 20.0).with_periodicity([true, false, false]);
    System { graph, cell, coords }
}

fn harmonic(force_constant: f64, rest_value: f64) -> Arc<dyn EnergyFunction>
{ Arc::new(Harmonic { force_constant, rest_value }) }

fn series(terms: &[(i32, f64)]) -> Arc<dyn EnergyFunction>
{ Arc::new(PowerSeries::new(terms.to_vec())) }

/// A hydrocarbon force field using every kind of term.
pub fn hydrocarbon_terms(cutoff: f64) -> Vec<Term> {
    let c = || Predicate::AtomNumber(C);
    let h = || Predicate::AtomNumber(H);
    let any = || Predicate::Any;
    vec![
        Term::new(TermKind::BondStretch, "CH_bond", harmonic(0.7, 1.09), vec![c(), h()]),
        Term::new(TermKind::BondStretch, "CC_bond", series(&[(2, 0.4), (3, -0.05)]), vec![c(), c()]),
        Term::new(TermKind::BendCos, "HCH_bend", harmonic(0.3, -0.33), vec![h(), c(), h()]),
        Term::new(TermKind::BendAngle, "CCH_bend", harmonic(0.4, 1.91), vec![c(), c(), h()]),
        Term::new(TermKind::UreyBradley, "HCH_ub", harmonic(0.1, 1.78), vec![h(), c(), h()]),
        Term::new(TermKind::DihedCos, "HCCH_torsion", series(&[(1, 0.05), (3, 0.02)]), vec![h(), c(), c(), h()]),
        Term::new(TermKind::DihedAngle, "XCCX_torsion", series(&[(2, 0.01)]), vec![any(), c(), c(), any()]),
        Term::new(TermKind::OneFour, "HH_14", series(&[(-6, -0.5), (-12, 0.3)]), vec![h(), c(), c(), h()]),
        Term::new(TermKind::OutOfPlane, "C_oop", harmonic(0.05, 0.0), vec![c(), any(), any(), h()]),
        Term::new(TermKind::Nonbond, "nonbond", series(&[(-12, 20.0), (-6, -8.0)]), vec![any(), any()])
            .with_cutoff(cutoff)
            .with_filter(PairFilter::MinSeparation(3)),
        Term::new(TermKind::Nonbond, "HH_coulomb", Arc::new(Coulomb { charge_product: 0.02 }), vec![h(), h()])
            .with_cutoff(cutoff),
    ]
}

/// The YAML equivalent of [`hydrocarbon_terms`].
pub fn hydrocarbon_yaml(cutoff: f64) -> String {
    format!(r#"
cutoff: {:?}
atom-types:
  C: {{ atom-number: 6 }}
  H: {{ atom-number: 1 }}
terms:
  - {{ label: CH_bond, kind: bond-stretch, atoms: [C, H], energy: {{ harmonic: {{ force-constant: 0.7, rest-value: 1.09 }} }} }}
  - {{ label: CC_bond, kind: bond-stretch, atoms: [C, C], energy: {{ power-series: [[2, 0.4], [3, -0.05]] }} }}
  - {{ label: HCH_bend, kind: bend-cos, atoms: [H, C, H], energy: {{ harmonic: {{ force-constant: 0.3, rest-value: -0.33 }} }} }}
  - {{ label: CCH_bend, kind: bend-angle, atoms: [C, C, H], energy: {{ harmonic: {{ force-constant: 0.4, rest-value: 1.91 }} }} }}
  - {{ label: HCH_ub, kind: urey-bradley, atoms: [H, C, H], energy: {{ harmonic: {{ force-constant: 0.1, rest-value: 1.78 }} }} }}
  - {{ label: HCCH_torsion, kind: dihed-cos, atoms: [H, C, C, H], energy: {{ power-series: [[1, 0.05], [3, 0.02]] }} }}
  - {{ label: XCCX_torsion, kind: dihed-angle, atoms: ["*", C, C, "*"], energy: {{ power-series: [[2, 0.01]] }} }}
  - {{ label: HH_14, kind: one-four, atoms: [H, C, C, H], energy: {{ power-series: [[-6, -0.5], [-12, 0.3]] }} }}
  - {{ label: C_oop, kind: out-of-plane, atoms: [C, "*", "*", H], energy: {{ harmonic: {{ force-constant: 0.05, rest-value: 0.0 }} }} }}
  - {{ label: nonbond, kind: nonbond, atoms: ["*", "*"], min-separation: 3, energy: {{ power-series: [[-12, 20.0], [-6, -8.0]] }} }}
  - {{ label: HH_coulomb, kind: nonbond, atoms: [H, H], energy: {{ coulomb: {{ charge-product: 0.02 }} }} }}
"#, cutoff)
}

pub fn hydrocarbon_force_field(system: &System, cutoff: f64) -> ForceField {
    ForceField::new(system.graph.clone(), system.cell.clone(), hydrocarbon_terms(cutoff)).unwrap()
}

/// Compare the analytic gradient and Hessian against a random displacement
/// of every coordinate by up to `eps`.
pub fn check_derivatives(ff: &ForceField, coords: &[V3], eps: f64, tol: f64) {
    let delta: Vec<V3> = {
        coords.iter()
            .map(|_| V3::from_fn(|_| eps * (2.0 * rand::random::<f64>() - 1.0)))
            .collect()
    };
    let moved: Vec<V3> = coords.iter().zip(&delta).map(|(a, d)| a + d).collect();

    let a = ff.evaluate(coords, DerivOrder::Hessian).unwrap();
    let b = ff.evaluate(&moved, DerivOrder::Hessian).unwrap();
    let delta = flatten(&delta);
    let grad_a = flatten(a.gradient.as_ref().unwrap());
    let grad_b = flatten(b.gradient.as_ref().unwrap());
    let hess_a = a.hessian.as_ref().unwrap().as_slice();
    let hess_b = b.hessian.as_ref().unwrap().as_slice();

    taylor::first_order(&delta, (a.energy, &grad_a[..]), (b.energy, &grad_b[..])).check(tol).unwrap();
    taylor::second_order(&delta, (&grad_a[..], hess_a), (&grad_b[..], hess_b)).check(tol).unwrap();
}
