#[macro_use] extern crate mmdiff_assert_close;

use mmdiff::{DerivOrder, V3};

mod shared;
use self::shared::*;

#[test]
fn ethane_in_box_derivatives() {
    // beyond half the cell, so some pairs meet more than one image
    let cutoff = 7.0;
    let system = ethane_in_box();
    let ff = hydrocarbon_force_field(&system, cutoff);
    for _ in 0..5 {
        check_derivatives(&ff, &system.coords, 1e-5, 1e-2);
    }
}

#[test]
fn polyethylene_derivatives() {
    // longer than the period, so atoms also meet their own images
    let cutoff = 6.0;
    let system = polyethylene();
    let ff = hydrocarbon_force_field(&system, cutoff);
    for _ in 0..5 {
        check_derivatives(&ff, &system.coords, 1e-5, 1e-2);
    }
}

#[test]
fn wrapping_does_not_matter() {
    // the same molecule, unwrapped in the middle of a box that is too big to see images
    let cutoff = 4.0;
    let wrapped = ethane_in_box();
    let mut free = ethane();
    free.cell = mmdiff::UnitCell::cubic(100.0);
    let offset = V3([50.0, 50.0, 50.0]);
    for p in &mut free.coords {
        *p += offset;
    }

    let wrapped_out = hydrocarbon_force_field(&wrapped, cutoff).evaluate(&wrapped.coords, DerivOrder::Hessian).unwrap();
    let free_out = hydrocarbon_force_field(&free, cutoff).evaluate(&free.coords, DerivOrder::Hessian).unwrap();

    assert_close!(rel=1e-9, wrapped_out.energy, free_out.energy);
    for (a, b) in wrapped_out.term_energies.iter().zip(&free_out.term_energies) {
        assert_close!(rel=1e-8, abs=1e-12, *a, *b);
    }
    let (ga, gb) = (wrapped_out.gradient.unwrap(), free_out.gradient.unwrap());
    for (a, b) in ga.iter().zip(&gb) {
        assert_close!(rel=1e-8, abs=1e-10, a.0, b.0);
    }
    assert_close!(
        rel=1e-7, abs=1e-9,
        wrapped_out.hessian.unwrap().into_vec(),
        free_out.hessian.unwrap().into_vec(),
    );
}

#[test]
fn lattice_translations_are_symmetries() {
    let system = polyethylene();
    let ff = hydrocarbon_force_field(&system, 6.0);
    let reference = ff.evaluate(&system.coords, DerivOrder::Gradient).unwrap();

    let mut coords = system.coords.clone();
    coords[2][0] += CHAIN_PERIOD;
    coords[7][0] -= 2.0 * CHAIN_PERIOD;
    let moved = ff.evaluate(&coords, DerivOrder::Gradient).unwrap();

    assert_close!(rel=1e-10, moved.energy, reference.energy);
    for (a, b) in moved.gradient.unwrap().iter().zip(&reference.gradient.unwrap()) {
        assert_close!(rel=1e-8, abs=1e-10, a.0, b.0);
    }
}

#[test]
fn translation_invariance() {
    for system in vec![ethane_in_box(), polyethylene()] {
        let ff = hydrocarbon_force_field(&system, 6.0);
        let out = ff.evaluate(&system.coords, DerivOrder::Hessian).unwrap();

        let net_force = out.gradient.unwrap().iter().fold(V3::zero(), |acc, g| acc + g);
        assert_close!(abs=1e-10, net_force.0, [0.0; 3]);

        let hessian = out.hessian.unwrap();
        assert!(hessian.asymmetry() < 1e-10);
        // each row sums to zero over the x components of all atoms
        for row in 0..hessian.dim() {
            let sum: f64 = (0..hessian.dim()).step_by(3).map(|col| hessian.get(row, col)).sum();
            assert_close!(abs=1e-9, sum, 0.0);
        }
    }
}

#[test]
fn every_term_applies() {
    for system in vec![ethane_in_box(), polyethylene()] {
        let ff = hydrocarbon_force_field(&system, 6.0);
        for (i, term) in ff.terms().iter().enumerate() {
            assert!(!ff.tuples(i).is_empty(), "{}", term.label());
        }
        let out = ff.evaluate(&system.coords, DerivOrder::Value).unwrap();
        let total: f64 = out.term_energies.iter().sum();
        assert_close!(rel=1e-10, abs=1e-12, total, out.energy);
    }
}

#[test]
fn each_term_alone() {
    let system = ethane_in_box();
    for term in hydrocarbon_terms(7.0) {
        let label = term.label().to_string();
        let ff = mmdiff::ForceField::new(system.graph.clone(), system.cell.clone(), vec![term]).unwrap();
        let energy = ff.energy(&system.coords).unwrap();
        assert!(energy.is_finite(), "{}", label);
        check_derivatives(&ff, &system.coords, 1e-5, 1e-2);
    }
}
