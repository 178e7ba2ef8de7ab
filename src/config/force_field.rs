/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::collections::BTreeMap;

/// Root of a force field description.
///
/// ```yaml
/// cutoff: 15.0
/// atom-types:
///   C:  { atom-number: 6 }
///   Hc: { and: [ { atom-number: 1 }, { neighbor-numbers: [6] } ] }
/// terms:
///   - label: CHc_bond
///     kind: bond-stretch
///     atoms: [C, Hc]
///     energy: { harmonic: { force-constant: 0.5, rest-value: 2.0 } }
/// ```
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ForceField {
    /// Cutoff for nonbond terms that do not give their own.
    #[serde(default)]
    pub cutoff: Option<f64>,

    /// Named atom types, referred to by the `atoms` of each term.
    ///
    /// The name `*` is reserved and always means any atom.
    #[serde(default)]
    pub atom_types: BTreeMap<String, AtomType>,

    /// Evaluated in this order.
    pub terms: Vec<Term>,
}

pub const ANY_ATOM: &str = "*";

/// A test on one atom of the molecular graph.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum AtomType {
    Any,
    AtomNumber(u32),
    /// Exact multiset of neighbor atomic numbers.
    NeighborNumbers(Vec<u32>),
    /// At least one neighbor with this atomic number.
    HasNeighborNumber(u32),
    NumNeighbors(usize),
    And(Vec<AtomType>),
    Or(Vec<AtomType>),
    Not(Box<AtomType>),
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Term {
    pub label: String,
    pub kind: TermKind,
    /// One atom type name per atom of the term.
    pub atoms: Vec<String>,

    /// Nonbond only. Pairs closer than this many bonds apart are excluded;
    /// pairs in disconnected fragments are always included.
    #[serde(default)]
    pub min_separation: Option<u32>,

    /// Nonbond only. Overrides the global cutoff.
    #[serde(default)]
    pub cutoff: Option<f64>,

    pub energy: Energy,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TermKind {
    BondStretch,
    BendCos,
    BendAngle,
    UreyBradley,
    DihedCos,
    DihedAngle,
    OneFour,
    OutOfPlane,
    Nonbond,
}

/// Energy as a function of the internal coordinate `q`.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Energy {
    /// `k/2 (q - q0)^2`
    Harmonic(Harmonic),
    /// `sum c q^p` over `[p, c]` pairs; `p` may be negative.
    PowerSeries(Vec<(i32, f64)>),
    /// `qq / q`
    Coulomb(Coulomb),
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Harmonic {
    pub force_constant: f64,
    pub rest_value: f64,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Coulomb {
    pub charge_product: f64,
}
