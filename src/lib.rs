// K term disambiguation
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

//! Disambiguation of parse forests of K definitions.
//!
//! The term parser of a K definition yields a forest:
//!   every production it applied appears as a node,
//!   including subsort productions that carry no meaning,
//!   and every ambiguity it could not resolve appears as a node holding
//!   the alternatives.
//! This crate turns such a forest into the abstract syntax expected by
//!   the rest of the framework.
//!
//! The entry point is [`pipeline::disambiguate`],
//!   which runs two passes over a [`term::Term`]:
//!
//!   1. [`clean::TreeCleaner`] removes subsort wrappers and collapses
//!        degenerate groupings and ambiguities; and
//!   2. [`lists::ListCompleter`] completes bare elements found where a
//!        user-declared list sort is expected.
//!
//! Both are [`rewrite::Rewriter`]s,
//!   which thread hard failures and soft warnings through the traversal
//!   independently for each alternative of an ambiguity.
//! The grammar that drives them is described by a [`grammar::Module`],
//!   which holds the [`sort::SortLattice`] and [`lists::ListCatalog`].

// We build docs for private items.
#![allow(rustdoc::private_intra_doc_links)]

pub mod global;

#[macro_use]
extern crate static_assertions;

pub mod clean;
pub mod diagnose;
pub mod error;
pub mod grammar;
pub mod lists;
pub mod pipeline;
pub mod rewrite;
pub mod sort;
pub mod span;
pub mod sym;
pub mod term;

pub use pipeline::{disambiguate, disambiguate_with, PassConfig};
