/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};

use mmdiff_array_types::V3;

use crate::UnitCell;

/// Atoms (identified by atomic number) and the bonds between them.
///
/// Neighbor lists are kept sorted so that every enumeration derived from the
/// graph has a fixed order.
#[derive(Debug, Clone)]
pub struct MolecularGraph {
    graph: UnGraph<u32, ()>,
    neighbors: Vec<Vec<usize>>,
    // dense, row-major; 0 for an atom and itself, and for disconnected pairs
    distances: Vec<u32>,
}

#[derive(Debug, Fail)]
pub enum GraphError {
    #[fail(display = "bond ({}, {}) refers to an atom beyond the {} atoms", _0, _1, _2)]
    AtomOutOfRange(usize, usize, usize),

    #[fail(display = "atom {} is bonded to itself", _0)]
    SelfBond(usize),

    #[fail(display = "bond ({}, {}) appears more than once", _0, _1)]
    DuplicateBond(usize, usize),

    #[fail(display = "{} atomic numbers but {} positions", numbers, positions)]
    PositionCount { numbers: usize, positions: usize },
}

impl MolecularGraph {
    pub fn new(numbers: Vec<u32>, bonds: &[(usize, usize)]) -> Result<Self, GraphError> {
        let num_atoms = numbers.len();
        let mut graph = UnGraph::with_capacity(num_atoms, bonds.len());
        for &number in &numbers {
            graph.add_node(number);
        }
        for &(a, b) in bonds {
            if a >= num_atoms || b >= num_atoms {
                return Err(GraphError::AtomOutOfRange(a, b, num_atoms));
            }
            if a == b {
                return Err(GraphError::SelfBond(a));
            }
            let (na, nb) = (NodeIndex::new(a), NodeIndex::new(b));
            if graph.find_edge(na, nb).is_some() {
                return Err(GraphError::DuplicateBond(a, b));
            }
            graph.add_edge(na, nb, ());
        }

        let neighbors: Vec<Vec<usize>> = {
            (0..num_atoms)
                .map(|a| graph.neighbors(NodeIndex::new(a)).map(|n| n.index()).sorted().collect())
                .collect()
        };
        let distances = topological_distances(&graph);

        trace!("molecular graph: {} atoms, {} bonds", num_atoms, graph.edge_count());
        Ok(MolecularGraph { graph, neighbors, distances })
    }

    /// Detect bonds from interatomic distances under the minimum image.
    ///
    /// `max_bond_length(za, zb)` gives the longest distance at which atoms
    /// with those atomic numbers count as bonded, or `None` if they never
    /// bond. It must be symmetric. Distances exactly equal to the maximum
    /// are bonds.
    pub fn from_geometry(
        numbers: Vec<u32>,
        carts: &[V3],
        cell: &UnitCell,
        mut max_bond_length: impl FnMut(u32, u32) -> Option<f64>,
    ) -> Result<Self, GraphError> {
        if numbers.len() != carts.len() {
            return Err(GraphError::PositionCount { numbers: numbers.len(), positions: carts.len() });
        }
        let mut bonds = vec![];
        for (i, j) in (0..carts.len()).tuple_combinations() {
            let max = match max_bond_length(numbers[i], numbers[j]) {
                Some(max) => max,
                None => continue,
            };
            let sqnorm = cell.shortest_vector(carts[j] - carts[i]).sqnorm();
            if sqnorm <= max * max {
                bonds.push((i, j));
            }
        }
        MolecularGraph::new(numbers, &bonds)
    }

    pub fn num_atoms(&self) -> usize { self.neighbors.len() }
    pub fn num_bonds(&self) -> usize { self.graph.edge_count() }

    pub fn atomic_number(&self, atom: usize) -> u32
    { self.graph[NodeIndex::new(atom)] }

    /// Neighbors of an atom, in increasing order.
    pub fn neighbors(&self, atom: usize) -> &[usize]
    { &self.neighbors[atom] }

    /// Number of bonds on the shortest path between two atoms.
    ///
    /// By convention this is 0 both for an atom and itself and for atoms in
    /// disconnected fragments.
    pub fn distance(&self, a: usize, b: usize) -> u32
    { self.distances[a * self.num_atoms() + b] }

    pub fn petgraph(&self) -> &UnGraph<u32, ()> { &self.graph }

    /// Every bond `[i, j]` with `i < j`.
    pub fn bonds(&self) -> Vec<[usize; 2]> {
        let mut out = vec![];
        for (i, neighbors) in self.neighbors.iter().enumerate() {
            out.extend(neighbors.iter().filter(|&&j| i < j).map(|&j| [i, j]));
        }
        out
    }

    /// Every path `[i, j, k]` of two bonds, with `i < k`.
    pub fn bends(&self) -> Vec<[usize; 3]> {
        let mut out = vec![];
        for (j, neighbors) in self.neighbors.iter().enumerate() {
            out.extend(neighbors.iter().tuple_combinations().map(|(&i, &k)| [i, j, k]));
        }
        out
    }

    /// Every path `[i, j, k, l]` of three bonds through distinct atoms,
    /// each listed once (with `j < k`).
    pub fn dihedrals(&self) -> Vec<[usize; 4]> {
        let mut out = vec![];
        for [j, k] in self.bonds() {
            for &i in &self.neighbors[j] {
                if i == k {
                    continue;
                }
                for &l in &self.neighbors[k] {
                    if l != j && l != i {
                        out.push([i, j, k, l]);
                    }
                }
            }
        }
        out
    }

    /// Every `[center, a, b, d]` where `a < b` and `d` are distinct
    /// neighbors of `center`; `d` is the atom measured against the plane of
    /// the other three.
    pub fn out_of_planes(&self) -> Vec<[usize; 4]> {
        let mut out = vec![];
        for (center, neighbors) in self.neighbors.iter().enumerate() {
            if neighbors.len() < 3 {
                continue;
            }
            for &d in neighbors {
                let others = neighbors.iter().filter(|&&x| x != d);
                out.extend(others.tuple_combinations().map(|(&a, &b)| [center, a, b, d]));
            }
        }
        out
    }
}

fn topological_distances(graph: &UnGraph<u32, ()>) -> Vec<u32> {
    let n = graph.node_count();
    let mut out = vec![0; n * n];
    for start in graph.node_indices() {
        let lengths = petgraph::algo::dijkstra(graph, start, None, |_| 1u32);
        for (end, length) in lengths {
            out[start.index() * n + end.index()] = length;
        }
    }
    out
}
