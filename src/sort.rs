// Subsort lattice
//
//  Copyright (C) 2014-2023 Ryan Specialty, LLC.
//
//  This file is part of TAME.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Partial order over [`Sort`]s.
//!
//! Grammars declare subsort relations pairwise
//!   (`syntax Exp ::= Int` makes `Int` a subsort of `Exp`),
//!   and the relation that the disambiguation passes query is the
//!   reflexive-transitive closure of those declarations.
//! That closure is _not_ a total order:
//!   two sorts may be entirely unrelated,
//!     and a set of sorts need not have a greatest element.
//!
//! [`SortLattice`] stores the declared relation as a directed acyclic
//!   graph using [`petgraph`],
//!     with an edge from each subsort to its declared supersort,
//!   and precomputes the transitive closure once at construction as one
//!     [`FixedBitSet`] of strict supersorts per sort.
//! Every query is then a constant-time bit test.
//!
//! Although the structure is named a lattice for familiarity,
//!   joins and meets are not guaranteed to exist;
//!     callers of [`SortLattice::greatest`] must handle [`None`].

use crate::{global, grammar::Sort};
use fixedbitset::FixedBitSet;
use fxhash::FxHashMap;
use petgraph::{
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};
use std::{
    error::Error,
    fmt::{self, Display},
};


/// Builder for a [`SortLattice`].
///
/// Sorts and subsort declarations may be added in any order;
///   the relation is validated and closed only by
///   [`SortLatticeBuilder::build`].
#[derive(Debug, Default)]
pub struct SortLatticeBuilder {
    graph: DiGraph<Sort, ()>,
    index: FxHashMap<Sort, NodeIndex>,
}

impl SortLatticeBuilder {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::with_capacity(
                global::INIT_LATTICE_SORT_CAPACITY,
                global::INIT_LATTICE_SORT_CAPACITY,
            ),
            index: FxHashMap::default(),
        }
    }

    /// Declare a sort that may have no subsort relation with any other.
    ///
    /// Sorts named by [`SortLatticeBuilder::subsort`] are declared
    ///   implicitly.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.node(sort);
        self
    }

    /// Declare `sub` to be a subsort of `sup`.
    ///
    /// A declaration of a sort as a subsort of itself is redundant and
    ///   ignored.
    pub fn subsort(mut self, sub: Sort, sup: Sort) -> Self {
        let isub = self.node(sub);
        let isup = self.node(sup);

        if isub != isup {
            self.graph.update_edge(isub, isup, ());
        }

        self
    }

    fn node(&mut self, sort: Sort) -> NodeIndex {
        let graph = &mut self.graph;
        *self.index.entry(sort).or_insert_with(|| graph.add_node(sort))
    }

    /// Validate the declared relation and compute its transitive closure.
    ///
    /// A cycle of subsort declarations
    ///   (e.g. `A < B` and `B < A`)
    ///   would collapse distinct sorts into one and is rejected.
    pub fn build(self) -> Result<SortLattice, LatticeError> {
        let Self { graph, index } = self;

        let order = toposort(&graph, None).map_err(|cycle| {
            LatticeError::CyclicSubsort(graph[cycle.node_id()])
        })?;

        let mut supersorts =
            vec![FixedBitSet::with_capacity(0); graph.node_count()];

        // Topological order places every subsort before its supersorts;
        //   walking it in reverse means that the closure of each supersort
        //   is complete by the time any of its subsorts is visited.
        for &node in order.iter().rev() {
            let mut row = FixedBitSet::with_capacity(graph.node_count());

            for sup in graph.neighbors(node) {
                row.insert(sup.index());
                row.union_with(&supersorts[sup.index()]);
            }

            supersorts[node.index()] = row;
        }

        tracing::debug!(
            sorts = graph.node_count(),
            declarations = graph.edge_count(),
            "closed subsort relation"
        );

        Ok(SortLattice {
            graph,
            index,
            supersorts,
        })
    }
}

/// Reflexive-transitive subsort relation over a finite set of sorts.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug)]
pub struct SortLattice {
    /// Declared (non-transitive) subsort relation;
    ///   each edge points from a subsort to a supersort.
    graph: DiGraph<Sort, ()>,

    /// Node of each sort in `graph`.
    index: FxHashMap<Sort, NodeIndex>,

    /// Strict supersorts of each sort,
    ///   indexed by node index.
    supersorts: Vec<FixedBitSet>,
}

impl Default for SortLattice {
    fn default() -> Self {
        Self::empty()
    }
}

impl SortLattice {
    pub fn builder() -> SortLatticeBuilder {
        SortLatticeBuilder::new()
    }

    /// A lattice in which every sort is related only to itself.
    pub fn empty() -> Self {
        Self {
            graph: DiGraph::default(),
            index: FxHashMap::default(),
            supersorts: Vec::new(),
        }
    }

    /// Construct a lattice directly from `(subsort, supersort)` pairs.
    pub fn from_subsorts<I>(decls: I) -> Result<Self, LatticeError>
    where
        I: IntoIterator<Item = (Sort, Sort)>,
    {
        decls
            .into_iter()
            .fold(Self::builder(), |b, (sub, sup)| b.subsort(sub, sup))
            .build()
    }

    /// Whether the sort was declared to this lattice.
    pub fn contains(&self, sort: Sort) -> bool {
        self.index.contains_key(&sort)
    }

    /// Number of declared sorts.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared sorts in declaration order.
    pub fn sorts(&self) -> impl Iterator<Item = Sort> + '_ {
        self.graph.raw_nodes().iter().map(|node| node.weight)
    }

    /// `a < b`: `a` is a strict subsort of `b`.
    ///
    /// Sorts unknown to the lattice are related to nothing.
    pub fn less_than(&self, a: Sort, b: Sort) -> bool {
        match (self.index.get(&a), self.index.get(&b)) {
            (Some(ia), Some(ib)) => {
                self.supersorts[ia.index()].contains(ib.index())
            }
            _ => false,
        }
    }

    /// `a ≤ b`: `a` is `b` or a subsort of `b`.
    ///
    /// This holds for `a == b` even if `a` is unknown to the lattice.
    pub fn less_than_eq(&self, a: Sort, b: Sort) -> bool {
        a == b || self.less_than(a, b)
    }

    /// `a > b`: `a` is a strict supersort of `b`.
    pub fn greater_than(&self, a: Sort, b: Sort) -> bool {
        self.less_than(b, a)
    }

    /// `a ≥ b`: `a` is `b` or a supersort of `b`.
    pub fn greater_than_eq(&self, a: Sort, b: Sort) -> bool {
        self.less_than_eq(b, a)
    }

    /// Whether `a` and `b` are related in either direction.
    pub fn comparable(&self, a: Sort, b: Sort) -> bool {
        self.less_than_eq(a, b) || self.less_than_eq(b, a)
    }

    /// The element of `sorts` that is related to and no less than every
    ///   other element,
    ///     if any exists.
    ///
    /// This is a best-element search under a partial order:
    ///   a candidate is carried through the sequence and replaced whenever
    ///   it fails to dominate the next element,
    ///     after which the survivor is verified against every element.
    /// If any element is unrelated to the survivor,
    ///   there is no greatest element and the result is [`None`];
    ///     this is also the case for an empty sequence.
    /// Duplicates are permitted.
    pub fn greatest<I>(&self, sorts: I) -> Option<Sort>
    where
        I: IntoIterator<Item = Sort>,
    {
        let sorts = sorts.into_iter().collect::<Vec<_>>();

        let max = sorts.iter().copied().reduce(|max, next| {
            if self.greater_than_eq(max, next) {
                max
            } else {
                // If max is unrelated to next it cannot be the greatest,
                //   so we might as well switch.
                next
            }
        })?;

        sorts
            .iter()
            .all(|&s| self.greater_than_eq(max, s))
            .then_some(max)
    }
}

/// Error constructing a [`SortLattice`].
#[derive(Debug, PartialEq, Eq)]
pub enum LatticeError {
    /// Subsort declarations form a cycle through the given sort.
    CyclicSubsort(Sort),
}

impl Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::CyclicSubsort(sort) => write!(
                f,
                "subsort declarations for sort '{sort}' form a cycle",
            ),
        }
    }
}

impl Error for LatticeError {}
