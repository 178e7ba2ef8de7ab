/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::MolecularGraph;

/// A boolean test on one atom of a [`MolecularGraph`].
///
/// Composite predicates are ordinary values, so a force field can be
/// described entirely by data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every atom.
    Any,
    /// The atom has this atomic number.
    AtomNumber(u32),
    /// The atomic numbers of the atom's neighbors are exactly this multiset.
    NeighborNumbers(Vec<u32>),
    /// At least one neighbor has this atomic number.
    HasNeighborNumber(u32),
    /// The atom has exactly this many neighbors.
    NumNeighbors(usize),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn matches(&self, graph: &MolecularGraph, atom: usize) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::AtomNumber(number) => graph.atomic_number(atom) == *number,
            Predicate::NeighborNumbers(expected) => {
                let mut expected = expected.clone();
                let mut actual: Vec<_> = {
                    graph.neighbors(atom).iter()
                        .map(|&n| graph.atomic_number(n))
                        .collect()
                };
                expected.sort();
                actual.sort();
                expected == actual
            },
            Predicate::HasNeighborNumber(number) => {
                graph.neighbors(atom).iter().any(|&n| graph.atomic_number(n) == *number)
            },
            Predicate::NumNeighbors(count) => graph.neighbors(atom).len() == *count,
            Predicate::And(preds) => preds.iter().all(|p| p.matches(graph, atom)),
            Predicate::Or(preds) => preds.iter().any(|p| p.matches(graph, atom)),
            Predicate::Not(pred) => !pred.matches(graph, atom),
        }
    }

    pub fn and(self, other: Predicate) -> Predicate
    { Predicate::And(vec![self, other]) }

    pub fn or(self, other: Predicate) -> Predicate
    { Predicate::Or(vec![self, other]) }

    pub fn negate(self) -> Predicate
    { Predicate::Not(Box::new(self)) }
}

impl Default for Predicate {
    fn default() -> Self { Predicate::Any }
}
