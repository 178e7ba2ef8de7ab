/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::sync::Arc;

use mmdiff_array_types::V3;
use mmdiff_autodiff::{DerivOrder, DomainError, DomainResult, Results};
use mmdiff_structure::Predicate;

use crate::energy::{EnergyDerivs, EnergyFunction};
use crate::ic;
use crate::Error;

/// The internal coordinate a [`Term`] is a function of, together with the
/// way its atoms are found in the bond graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Bond length of a bonded pair.
    BondStretch,
    /// Cosine of the angle in a path `i-j-k`.
    BendCos,
    /// Angle in a path `i-j-k`.
    BendAngle,
    /// Distance between the ends of a path `i-j-k`.
    UreyBradley,
    /// Torsion cosine of a path `i-j-k-l`.
    DihedCos,
    /// Torsion angle of a path `i-j-k-l`.
    DihedAngle,
    /// Distance between the ends of a path `i-j-k-l`.
    OneFour,
    /// Out-of-plane angle of `[center, a, b, d]`, where `a`, `b` and `d` are
    /// bonded to `center`.
    OutOfPlane,
    /// Distance between any two atoms within a cutoff, including periodic images.
    Nonbond,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Topology { Bond, Bend, Dihedral, OutOfPlane, Pair }

impl TermKind {
    /// Number of atoms in each tuple.
    pub fn arity(self) -> usize {
        match self.topology() {
            Topology::Bond | Topology::Pair => 2,
            Topology::Bend => 3,
            Topology::Dihedral | Topology::OutOfPlane => 4,
        }
    }

    pub fn is_pairwise(self) -> bool { self == TermKind::Nonbond }

    pub(crate) fn topology(self) -> Topology {
        match self {
            TermKind::BondStretch => Topology::Bond,
            TermKind::BendCos |
            TermKind::BendAngle |
            TermKind::UreyBradley => Topology::Bend,
            TermKind::DihedCos |
            TermKind::DihedAngle |
            TermKind::OneFour => Topology::Dihedral,
            TermKind::OutOfPlane => Topology::OutOfPlane,
            TermKind::Nonbond => Topology::Pair,
        }
    }

    /// Evaluate the internal coordinate on the tuple's positions.
    ///
    /// # Panics
    ///
    /// Panics if `positions.len()` is not the arity.
    pub fn internal_coordinate(self, positions: &[V3], deriv: DerivOrder) -> DomainResult<Results> {
        assert_eq!(positions.len(), self.arity(), "wrong number of positions for {:?}", self);
        let p = positions;
        match self {
            TermKind::BondStretch |
            TermKind::Nonbond => ic::bond_length(&[p[0], p[1]], deriv),
            TermKind::BendCos => ic::bend_cos(&[p[0], p[1], p[2]], deriv),
            TermKind::BendAngle => ic::bend_angle(&[p[0], p[1], p[2]], deriv),
            TermKind::UreyBradley => {
                let inner = ic::bond_length(&[p[0], p[2]], deriv)?;
                Ok(ic::embed(inner, &[0, 2], 3))
            },
            TermKind::DihedCos => ic::dihed_cos(&[p[0], p[1], p[2], p[3]], deriv),
            TermKind::DihedAngle => ic::dihed_angle(&[p[0], p[1], p[2], p[3]], deriv),
            TermKind::OneFour => {
                let inner = ic::bond_length(&[p[0], p[3]], deriv)?;
                Ok(ic::embed(inner, &[0, 3], 4))
            },
            TermKind::OutOfPlane => ic::opbend_angle(&[p[0], p[1], p[2], p[3]], deriv),
        }
    }
}

/// Which candidate pairs a pairwise term keeps, based on their separation
/// in the bond graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PairFilter {
    All,
    /// Keep pairs at least this many bonds apart. Disconnected pairs, and
    /// an atom paired with its own periodic images, have separation 0 and
    /// are always kept.
    MinSeparation(u32),
}

impl PairFilter {
    pub fn accepts(self, separation: u32) -> bool {
        match self {
            PairFilter::All => true,
            PairFilter::MinSeparation(min) => separation == 0 || separation >= min,
        }
    }
}

impl Default for PairFilter {
    fn default() -> Self { PairFilter::All }
}

/// Why a single term evaluation failed, before it is attributed to atoms.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum TermFailure {
    #[fail(display = "{}", _0)]
    Domain(#[fail(cause)] DomainError),
    #[fail(display = "non-finite energy derivative {} at internal coordinate {}", value, ic)]
    NonFinite { ic: f64, value: f64 },
}

impl From<DomainError> for TermFailure {
    fn from(e: DomainError) -> Self { TermFailure::Domain(e) }
}

/// An energy function of one internal coordinate, applied to every tuple
/// of atoms whose atoms satisfy `predicates` slot by slot.
#[derive(Debug, Clone)]
pub struct Term {
    kind: TermKind,
    label: String,
    energy: Arc<dyn EnergyFunction>,
    predicates: Vec<Predicate>,
    filter: Option<PairFilter>,
    cutoff: Option<f64>,
}

impl Term {
    pub fn new(
        kind: TermKind,
        label: impl Into<String>,
        energy: Arc<dyn EnergyFunction>,
        predicates: Vec<Predicate>,
    ) -> Term {
        Term {
            kind, energy, predicates,
            label: label.into(),
            filter: None,
            cutoff: None,
        }
    }

    /// Set the graph-separation filter. Only valid for pairwise terms.
    pub fn with_filter(mut self, filter: PairFilter) -> Term
    { self.filter = Some(filter); self }

    /// Set the interaction cutoff. Required for pairwise terms and invalid otherwise.
    pub fn with_cutoff(mut self, cutoff: f64) -> Term
    { self.cutoff = Some(cutoff); self }

    pub fn kind(&self) -> TermKind { self.kind }
    pub fn label(&self) -> &str { &self.label }
    pub fn energy(&self) -> &Arc<dyn EnergyFunction> { &self.energy }
    pub fn predicates(&self) -> &[Predicate] { &self.predicates }
    pub fn filter(&self) -> PairFilter { self.filter.unwrap_or_default() }
    pub fn cutoff(&self) -> Option<f64> { self.cutoff }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let bad = |message: String| Err(Error::Configuration { label: self.label.clone(), message });

        if self.label.is_empty() {
            return bad("terms need a nonempty label".into());
        }
        if self.predicates.len() != self.kind.arity() {
            return bad(format!(
                "{:?} needs {} atom predicates, got {}",
                self.kind, self.kind.arity(), self.predicates.len(),
            ));
        }
        match (self.kind.is_pairwise(), self.cutoff) {
            (true, None) => return bad("pairwise terms need a cutoff".into()),
            (true, Some(cutoff)) => if !(cutoff.is_finite() && cutoff > 0.0) {
                return bad(format!("cutoff must be positive and finite, got {}", cutoff));
            },
            (false, Some(_)) => return bad(format!("{:?} terms do not take a cutoff", self.kind)),
            (false, None) => {},
        }
        if !self.kind.is_pairwise() && self.filter.is_some() {
            return bad(format!("{:?} terms do not take a separation filter", self.kind));
        }
        Ok(())
    }

    /// Energy and derivatives of this term for one tuple, with respect to
    /// the tuple's own flattened coordinates.
    pub fn compute(&self, positions: &[V3], deriv: DerivOrder) -> Result<Results, TermFailure> {
        let q = self.kind.internal_coordinate(positions, deriv)?;
        let EnergyDerivs { value, d_q, dd_q_q } = self.energy.evaluate(q.value, deriv);

        let check = |x: f64| match x.is_finite() {
            true => Ok(()),
            false => Err(TermFailure::NonFinite { ic: q.value, value: x }),
        };
        check(value)?;
        if deriv.has_gradient() { check(d_q)?; }
        if deriv.has_hessian() { check(dd_q_q)?; }

        // E(q(x)):  dE/dx = E' dq/dx,  d2E/dx2 = E' d2q/dx2 + E'' (dq/dx)(dq/dx)
        let gradient = q.gradient.as_ref().map(|q_d_x| {
            q_d_x.iter().map(|&g| d_q * g).collect::<Vec<_>>()
        });
        let hessian = match (&q.gradient, &q.hessian) {
            (Some(q_d_x), Some(q_dd_x_x)) => {
                let n = q_d_x.len();
                let mut out = Vec::with_capacity(n * n);
                for i in 0..n {
                    for j in 0..n {
                        out.push(d_q * q_dd_x_x[i * n + j] + dd_q_q * q_d_x[i] * q_d_x[j]);
                    }
                }
                Some(out)
            },
            _ => None,
        };
        Ok(Results { value, gradient, hessian })
    }
}
