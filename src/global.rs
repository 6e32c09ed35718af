// Global constants across the entirety of the disambiguation core
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

//! System-wide static configuration.
//!
//! This module provides a system-wide configuration.
//! Subsystems should reference these values rather than defining their own
//!   and risk incompatibilities or maintenance issues as requirements
//!   change.
//!
//! By convention,
//!   import this entire module rather than individual members and reference
//!   them as `global::foo` to emphasize their nature and risk.
//!
//! Runtime configuration of the disambiguation passes lives in
//!   [`PassConfig`](crate::pipeline::PassConfig);
//!     this module holds only what must be known at compile time.

use std::num;

/// A size capable of representing every interned string in a grammar
///   and every term parsed against it.
///
/// This includes sort names,
///   labels,
///   attribute keys,
///   constant values,
///   and source file paths.
pub type ProgSymSize = u32;

/// A non-zero equivalent of [`ProgSymSize`].
pub type NonZeroProgSymSize = num::NonZeroU32;

/// The initial capacity of global interners.
///
/// Grammars of the framework's languages routinely declare a few thousand
///   sorts and labels before any term is ever parsed.
pub const INIT_GLOBAL_INTERNER_CAPACITY: usize = 4096;

/// Size of a source file in bytes.
pub type SourceFileSize = u32;

/// The length of any source token or span in bytes.
///
/// Spans of terms cover entire sentences (rules, claims, configurations),
///   which may be considerably longer than a single token.
pub type FrontendTokenLength = u32;

/// Initial capacity of a pass's memoization cache.
///
/// Caches are cleared between traversals but keep their allocation,
///   so this only affects the first tree a pass instance sees.
pub const INIT_MEMO_CAPACITY: usize = 256;

/// Initial number of sorts allocated for a
///   [`SortLattice`](crate::sort::SortLattice).
pub const INIT_LATTICE_SORT_CAPACITY: usize = 128;
