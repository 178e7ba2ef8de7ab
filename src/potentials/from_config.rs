/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Building force fields from their YAML description.

use std::sync::Arc;

use mmdiff_config as cfg;
use mmdiff_structure::{MolecularGraph, Predicate, UnitCell};

use crate::energy::{Coulomb, EnergyFunction, Harmonic, PowerSeries};
use crate::term::{PairFilter, Term, TermKind};
use crate::{Error, ForceField};

impl ForceField {
    pub fn from_config(
        graph: MolecularGraph,
        cell: UnitCell,
        config: &cfg::ForceField,
    ) -> Result<ForceField, Error> {
        let terms = {
            config.terms.iter()
                .map(|term| Term::from_config(config, term))
                .collect::<Result<Vec<_>, _>>()?
        };
        ForceField::new(graph, cell, terms)
    }
}

impl Term {
    /// Resolve a term's atom type names against `config.atom_types`.
    ///
    /// Nonbond terms without their own cutoff take the global one.
    pub fn from_config(config: &cfg::ForceField, term: &cfg::Term) -> Result<Term, Error> {
        let predicates = {
            term.atoms.iter()
                .map(|name| match name.as_str() {
                    cfg::ANY_ATOM => Ok(Predicate::Any),
                    _ => match config.atom_types.get(name) {
                        Some(ty) => Ok(predicate(ty)),
                        None => Err(Error::Configuration {
                            label: term.label.clone(),
                            message: format!("unknown atom type '{}'", name),
                        }),
                    },
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let kind = term_kind(term.kind);
        let mut out = Term::new(kind, term.label.clone(), energy(&term.energy), predicates);
        if let Some(min) = term.min_separation {
            out = out.with_filter(PairFilter::MinSeparation(min));
        }
        match (term.cutoff, config.cutoff) {
            (Some(cutoff), _) => out = out.with_cutoff(cutoff),
            (None, Some(cutoff)) if kind.is_pairwise() => out = out.with_cutoff(cutoff),
            _ => {},
        }
        Ok(out)
    }
}

fn predicate(ty: &cfg::AtomType) -> Predicate {
    use cfg::AtomType as T;

    match ty {
        T::Any => Predicate::Any,
        T::AtomNumber(n) => Predicate::AtomNumber(*n),
        T::NeighborNumbers(ns) => Predicate::NeighborNumbers(ns.clone()),
        T::HasNeighborNumber(n) => Predicate::HasNeighborNumber(*n),
        T::NumNeighbors(n) => Predicate::NumNeighbors(*n),
        T::And(tys) => Predicate::And(tys.iter().map(predicate).collect()),
        T::Or(tys) => Predicate::Or(tys.iter().map(predicate).collect()),
        T::Not(ty) => predicate(ty).negate(),
    }
}

fn term_kind(kind: cfg::TermKind) -> TermKind {
    match kind {
        cfg::TermKind::BondStretch => TermKind::BondStretch,
        cfg::TermKind::BendCos => TermKind::BendCos,
        cfg::TermKind::BendAngle => TermKind::BendAngle,
        cfg::TermKind::UreyBradley => TermKind::UreyBradley,
        cfg::TermKind::DihedCos => TermKind::DihedCos,
        cfg::TermKind::DihedAngle => TermKind::DihedAngle,
        cfg::TermKind::OneFour => TermKind::OneFour,
        cfg::TermKind::OutOfPlane => TermKind::OutOfPlane,
        cfg::TermKind::Nonbond => TermKind::Nonbond,
    }
}

fn energy(energy: &cfg::Energy) -> Arc<dyn EnergyFunction> {
    match energy {
        cfg::Energy::Harmonic(cfg::Harmonic { force_constant, rest_value }) => {
            Arc::new(Harmonic { force_constant: *force_constant, rest_value: *rest_value })
        },
        cfg::Energy::PowerSeries(terms) => Arc::new(PowerSeries::new(terms.clone())),
        cfg::Energy::Coulomb(cfg::Coulomb { charge_product }) => {
            Arc::new(Coulomb { charge_product: *charge_product })
        },
    }
}
