/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use mmdiff_array_types::V3;
use mmdiff_autodiff::{DerivOrder, Results};
use mmdiff_structure::{MolecularGraph, UnitCell};

use slice_of_array::prelude::*;

use crate::term::{Term, TermFailure, Topology};
use crate::Error;

/// A dense, row-major `3N x 3N` second-derivative matrix.
///
/// Row `3i + a` holds derivatives with respect to component `a` of atom `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hessian {
    dim: usize,
    data: Vec<f64>,
}

impl Hessian {
    pub fn zeros(dim: usize) -> Hessian
    { Hessian { dim, data: vec![0.0; dim * dim] } }

    pub fn dim(&self) -> usize { self.dim }

    pub fn get(&self, row: usize, col: usize) -> f64
    { self.data[row * self.dim + col] }

    pub fn row(&self, row: usize) -> &[f64]
    { &self.data[row * self.dim..(row + 1) * self.dim] }

    pub fn as_slice(&self) -> &[f64] { &self.data }
    pub fn into_vec(self) -> Vec<f64> { self.data }

    /// Largest `|H[i][j] - H[j][i]|`.
    pub fn asymmetry(&self) -> f64 {
        let mut out = 0.0f64;
        for i in 0..self.dim {
            for j in 0..i {
                out = out.max((self.get(i, j) - self.get(j, i)).abs());
            }
        }
        out
    }

    fn add(&mut self, row: usize, col: usize, x: f64)
    { self.data[row * self.dim + col] += x; }
}

/// Total energy and derivatives of a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub energy: f64,
    /// Contribution of each term, in the force field's term order.
    pub term_energies: Vec<f64>,
    /// Present when at least first derivatives were requested.
    pub gradient: Option<Vec<V3>>,
    /// Present when second derivatives were requested.
    pub hessian: Option<Hessian>,
}

/// A list of terms bound to one bond graph and cell.
///
/// The tuples each term applies to are found once, up front. Evaluation
/// only takes coordinates, so a single `ForceField` can be shared between
/// threads and evaluated many times.
#[derive(Debug, Clone)]
pub struct ForceField {
    graph: MolecularGraph,
    cell: UnitCell,
    terms: Vec<Term>,
    // for each term, its tuples in the order their atoms match the predicates
    tuples: Vec<Vec<Vec<usize>>>,
}

impl ForceField {
    pub fn new(graph: MolecularGraph, cell: UnitCell, terms: Vec<Term>) -> Result<ForceField, Error> {
        for term in &terms {
            term.validate()?;
        }

        let tuples = terms.iter().map(|term| {
            let tuples = matching_tuples(&graph, &cell, term);
            if tuples.is_empty() {
                warn!("Term '{}' does not apply to any atoms (possible typo?)", term.label());
            }
            debug!("Term '{}' ({:?}): {} tuples", term.label(), term.kind(), tuples.len());
            tuples
        }).collect();

        Ok(ForceField { graph, cell, terms, tuples })
    }

    pub fn graph(&self) -> &MolecularGraph { &self.graph }
    pub fn cell(&self) -> &UnitCell { &self.cell }
    pub fn terms(&self) -> &[Term] { &self.terms }
    pub fn num_atoms(&self) -> usize { self.graph.num_atoms() }

    /// The tuples a term applies to, with atoms ordered to match its predicates.
    pub fn tuples(&self, term: usize) -> &[Vec<usize>] { &self.tuples[term] }

    /// Energy and derivatives up to `deriv`, summed over every term, tuple
    /// and periodic image.
    ///
    /// Any failing tuple aborts the whole evaluation; there are no partial
    /// results.
    pub fn evaluate(&self, coords: &[V3], deriv: DerivOrder) -> Result<Evaluation, Error> {
        let num_atoms = self.num_atoms();
        if coords.len() != num_atoms {
            return Err(Error::AtomCount { expected: num_atoms, actual: coords.len() });
        }

        let mut acc = Accumulator::new(num_atoms, deriv);
        let mut term_energies = Vec::with_capacity(self.terms.len());
        let mut num_evaluations = 0;
        for (term, tuples) in self.terms.iter().zip(&self.tuples) {
            let mut term_energy = 0.0;
            for tuple in tuples {
                for positions in self.tuple_geometries(term, tuple, coords) {
                    let out = {
                        term.compute(&positions, deriv)
                            .map_err(|e| attribute(term, tuple, e))?
                    };
                    term_energy += out.value;
                    acc.add(tuple, &out);
                    num_evaluations += 1;
                }
            }
            term_energies.push(term_energy);
        }
        trace!("Evaluated {} term instances, energy {}", num_evaluations, acc.energy);

        Ok(Evaluation {
            energy: acc.energy,
            term_energies,
            gradient: acc.gradient,
            hessian: acc.hessian,
        })
    }

    pub fn energy(&self, coords: &[V3]) -> Result<f64, Error>
    { Ok(self.evaluate(coords, DerivOrder::Value)?.energy) }

    pub fn energy_gradient(&self, coords: &[V3]) -> Result<(f64, Vec<V3>), Error> {
        // `DerivOrder::Gradient` always produces a gradient.
        match self.evaluate(coords, DerivOrder::Gradient)? {
            Evaluation { energy, gradient: Some(gradient), .. } => Ok((energy, gradient)),
            Evaluation { energy, gradient: None, .. } => Ok((energy, vec![V3::zero(); coords.len()])),
        }
    }

    // Positions for each evaluation of `term` on `tuple`.
    //
    // Bonded tuples are evaluated once, on the images closest to each other
    // along the bond path. Pairs are evaluated once per image within the cutoff.
    fn tuple_geometries(&self, term: &Term, tuple: &[usize], coords: &[V3]) -> Vec<Vec<V3>> {
        let cell = &self.cell;
        let topology = term.kind().topology();
        if topology == Topology::Pair {
            let (i, j) = (tuple[0], tuple[1]);
            // validated
            let cutoff = term.cutoff().unwrap_or(std::f64::INFINITY);
            let delta = coords[j] - coords[i];
            if !cell.is_periodic() {
                return match delta.sqnorm() <= cutoff * cutoff {
                    true => vec![vec![coords[i], coords[j]]],
                    false => vec![],
                };
            }
            return {
                cell.images_within(delta, cutoff, i == j).into_iter()
                    .map(|image| vec![coords[i], coords[i] + image.vector])
                    .collect()
            };
        }

        if !cell.is_periodic() {
            return vec![tuple.iter().map(|&atom| coords[atom]).collect()];
        }
        let mut positions = Vec::with_capacity(tuple.len());
        positions.push(coords[tuple[0]]);
        match topology {
            Topology::OutOfPlane => {
                let center = coords[tuple[0]];
                for &atom in &tuple[1..] {
                    positions.push(center + cell.shortest_vector(coords[atom] - center));
                }
            },
            _ => {
                for pair in tuple.windows(2) {
                    let prev = positions[positions.len() - 1];
                    positions.push(prev + cell.shortest_vector(coords[pair[1]] - coords[pair[0]]));
                }
            },
        }
        vec![positions]
    }
}

fn attribute(term: &Term, tuple: &[usize], failure: TermFailure) -> Error {
    let label = term.label().to_string();
    let atoms = tuple.to_vec();
    match failure {
        TermFailure::Domain(cause) => Error::Domain { label, atoms, cause },
        TermFailure::NonFinite { ic, value } => Error::NumericFault { label, atoms, ic, value },
    }
}

// Tuples from the graph whose atoms satisfy the term's predicates, either
// as enumerated or in the equivalent reversed order.
fn matching_tuples(graph: &MolecularGraph, cell: &UnitCell, term: &Term) -> Vec<Vec<usize>> {
    let predicates = term.predicates();
    let matches = |tuple: &[usize]| {
        tuple.iter().zip(predicates).all(|(&atom, pred)| pred.matches(graph, atom))
    };
    let orient = |tuple: &[usize]| -> Option<Vec<usize>> {
        let mut tuple = tuple.to_vec();
        if matches(&tuple) {
            return Some(tuple);
        }
        match term.kind().topology() {
            // swapping the in-plane atoms is the only other ordering
            Topology::OutOfPlane => tuple.swap(1, 2),
            _ => tuple.reverse(),
        }
        match matches(&tuple) {
            true => Some(tuple),
            false => None,
        }
    };

    match term.kind().topology() {
        Topology::Bond => graph.bonds().iter().filter_map(|t| orient(&t[..])).collect(),
        Topology::Bend => graph.bends().iter().filter_map(|t| orient(&t[..])).collect(),
        Topology::Dihedral => graph.dihedrals().iter().filter_map(|t| orient(&t[..])).collect(),
        Topology::OutOfPlane => graph.out_of_planes().iter().filter_map(|t| orient(&t[..])).collect(),
        Topology::Pair => {
            let filter = term.filter();
            let n = graph.num_atoms();
            let mut out = vec![];
            for i in 0..n {
                // an atom only meets itself through periodic images
                let first = if cell.is_periodic() { i } else { i + 1 };
                for j in first..n {
                    if filter.accepts(graph.distance(i, j)) {
                        out.extend(orient(&[i, j][..]));
                    }
                }
            }
            out
        },
    }
}

struct Accumulator {
    energy: f64,
    gradient: Option<Vec<V3>>,
    hessian: Option<Hessian>,
}

impl Accumulator {
    fn new(num_atoms: usize, deriv: DerivOrder) -> Self {
        Accumulator {
            energy: 0.0,
            gradient: match deriv.has_gradient() {
                true => Some(vec![V3::zero(); num_atoms]),
                false => None,
            },
            hessian: match deriv.has_hessian() {
                true => Some(Hessian::zeros(3 * num_atoms)),
                false => None,
            },
        }
    }

    fn add(&mut self, tuple: &[usize], out: &Results) {
        self.energy += out.value;

        if let (Some(gradient), Some(local)) = (&mut self.gradient, &out.gradient) {
            for (&atom, row) in tuple.iter().zip(local.nest::<[f64; 3]>()) {
                gradient[atom] += V3(*row);
            }
        }

        if let (Some(hessian), Some(local)) = (&mut self.hessian, &out.hessian) {
            let n = 3 * tuple.len();
            for (si, &ai) in tuple.iter().enumerate() {
                for (sj, &aj) in tuple.iter().enumerate() {
                    for a in 0..3 {
                        for b in 0..3 {
                            hessian.add(3 * ai + a, 3 * aj + b, local[(3 * si + a) * n + 3 * sj + b]);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use mmdiff_autodiff::DomainError;
    use mmdiff_structure::Predicate;
    use crate::energy::{EnergyDerivs, FnEnergy, Harmonic, PowerSeries};
    use crate::term::{TermKind, PairFilter};

    const C: u32 = 6;
    const H: u32 = 1;

    // H0 - C1 - C2 - H3, roughly trans
    fn chain() -> (MolecularGraph, Vec<V3>) {
        let graph = MolecularGraph::new(vec![H, C, C, H], &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let coords = vec![
            V3([-0.6, 1.0, 0.1]),
            V3([0.0, 0.0, 0.0]),
            V3([1.5, 0.0, 0.0]),
            V3([2.1, -1.0, 0.2]),
        ];
        (graph, coords)
    }

    fn linear() -> Arc<PowerSeries> { Arc::new(PowerSeries::new(vec![(1, 1.0)])) }

    #[test]
    fn orientation_follows_predicates() {
        let (graph, _) = chain();
        let ch = Term::new(
            TermKind::BondStretch, "C-H", linear(),
            vec![Predicate::AtomNumber(C), Predicate::AtomNumber(H)],
        );
        let ff = ForceField::new(graph, UnitCell::non_periodic(), vec![ch]).unwrap();
        assert_eq!(ff.tuples(0), &[vec![1usize, 0], vec![2, 3]]);
    }

    #[test]
    fn pairs_and_filters() {
        let (graph, coords) = chain();
        let pair = |filter| {
            Term::new(TermKind::Nonbond, "pair", linear(), vec![Predicate::Any; 2])
                .with_cutoff(100.0)
                .with_filter(filter)
        };
        let ff = ForceField::new(graph.clone(), UnitCell::non_periodic(), vec![
            pair(PairFilter::All),
            pair(PairFilter::MinSeparation(3)),
        ]).unwrap();
        assert_eq!(ff.tuples(0).len(), 6);
        assert_eq!(ff.tuples(1), &[vec![0usize, 3]]);

        let out = ff.evaluate(&coords, DerivOrder::Value).unwrap();
        assert_eq!(out.term_energies[1], (coords[3] - coords[0]).norm());

        // a cutoff that excludes the 1-4 pair
        let short = Term::new(TermKind::Nonbond, "short", linear(), vec![Predicate::Any; 2])
            .with_cutoff(2.0)
            .with_filter(PairFilter::MinSeparation(3));
        let ff = ForceField::new(graph, UnitCell::non_periodic(), vec![short]).unwrap();
        assert_eq!(ff.evaluate(&coords, DerivOrder::Hessian).unwrap().energy, 0.0);
    }

    #[test]
    fn sums_over_terms() {
        let (graph, coords) = chain();
        let bond = Term::new(TermKind::BondStretch, "bond", linear(), vec![Predicate::Any; 2]);
        let spring = Arc::new(Harmonic { force_constant: 1.0, rest_value: 2.0 });
        let bend = Term::new(TermKind::BendAngle, "bend", spring, vec![Predicate::Any; 3]);
        let ff = ForceField::new(graph, UnitCell::non_periodic(), vec![bond, bend]).unwrap();

        let out = ff.evaluate(&coords, DerivOrder::Hessian).unwrap();
        let lengths: f64 = (0..3).map(|i| (coords[i + 1] - coords[i]).norm()).sum();
        assert_close!(out.term_energies[0], lengths);
        assert_close!(out.energy, out.term_energies[0] + out.term_energies[1]);

        // translation invariance
        let total: V3 = out.gradient.unwrap().iter().fold(V3::zero(), |a, &b| a + b);
        assert_close!(abs=1e-12, total.0, [0.0; 3]);
        assert!(out.hessian.unwrap().asymmetry() < 1e-12);

        assert_eq!(ff.energy(&coords).unwrap(), out.energy);
    }

    #[test]
    fn errors_name_the_term_and_atoms() {
        let (graph, mut coords) = chain();
        let bond = Term::new(TermKind::BondStretch, "bond", linear(), vec![Predicate::Any; 2]);
        let ff = ForceField::new(graph, UnitCell::non_periodic(), vec![bond]).unwrap();

        coords[2] = coords[1];
        match ff.evaluate(&coords, DerivOrder::Gradient) {
            Err(Error::Domain { label, atoms, cause }) => {
                assert_eq!(label, "bond");
                assert_eq!(atoms, vec![1, 2]);
                assert_eq!(cause, DomainError::ZeroLength);
            },
            other => panic!("{:?}", other),
        }

        match ff.evaluate(&coords[..3], DerivOrder::Value) {
            Err(Error::AtomCount { expected: 4, actual: 3 }) => {},
            other => panic!("{:?}", other),
        }

        // only the C-C bond is long enough to reach the NaN
        let (graph, coords) = chain();
        let nan_past = FnEnergy(|q: f64, _: DerivOrder| match q > 1.4 {
            true => EnergyDerivs { value: f64::NAN, ..EnergyDerivs::default() },
            false => EnergyDerivs { value: q, d_q: 1.0, dd_q_q: 0.0 },
        });
        let bond = Term::new(TermKind::BondStretch, "stretch", Arc::new(nan_past), vec![Predicate::Any; 2]);
        let ff = ForceField::new(graph, UnitCell::non_periodic(), vec![bond]).unwrap();
        match ff.evaluate(&coords, DerivOrder::Hessian) {
            Err(Error::NumericFault { label, atoms, ic, value }) => {
                assert_eq!(label, "stretch");
                assert_eq!(atoms, vec![1, 2]);
                assert_close!(ic, 1.5);
                assert!(value.is_nan());
            },
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn invalid_terms_are_rejected() {
        let (graph, _) = chain();
        let bad = Term::new(TermKind::DihedCos, "bad", linear(), vec![Predicate::Any; 3]);
        match ForceField::new(graph, UnitCell::non_periodic(), vec![bad]) {
            Err(Error::Configuration { label, .. }) => assert_eq!(label, "bad"),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn deriv_orders_agree() {
        let (graph, coords) = chain();
        let terms = vec![
            Term::new(TermKind::DihedAngle, "torsion", linear(), vec![Predicate::Any; 4]),
            Term::new(TermKind::BendCos, "bend", linear(), vec![Predicate::Any; 3]),
        ];
        let ff = ForceField::new(graph, UnitCell::non_periodic(), terms).unwrap();
        let value = ff.evaluate(&coords, DerivOrder::Value).unwrap();
        let grad = ff.evaluate(&coords, DerivOrder::Gradient).unwrap();
        let hess = ff.evaluate(&coords, DerivOrder::Hessian).unwrap();
        assert_eq!(value.energy, grad.energy);
        assert_eq!(value.gradient, None);
        assert_eq!(grad.hessian, None);
        assert_eq!(grad.gradient, hess.gradient);
        assert_eq!(hess.hessian.unwrap().dim(), 12);

        let (energy, gradient) = ff.energy_gradient(&coords).unwrap();
        assert_eq!(energy, value.energy);
        assert_eq!(Some(gradient), grad.gradient);
        assert_eq!(ff.energy(&coords).unwrap(), value.energy);
    }
}
