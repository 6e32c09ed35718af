// String internment symbol objects
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

//! Symbol objects representing interned strings.
//!
//! See the [parent module](super) for more information.

use super::{DefaultInterner, Interner};
use crate::{diagnostic_panic, global};
use std::fmt::{Debug, Display};
use std::thread::LocalKey;

/// Unique symbol identifier produced by an [`Interner`].
///
/// This newtype helps to prevent other indexes from being used where a
///   symbol index is expected.
/// Note, however, that it provides no defense against mixing symbol indexes
///   between multiple [`Interner`]s;
///     you should create your own newtypes to resolve that concern.
///
/// The index `0` is never valid,
///   which allows us to have `Option<SymbolId>` at no space cost.
///
/// Symbol Strings
/// ==============
/// To resolve a [`SymbolId`] into the string that it represents,
///   see either [`GlobalSymbolResolve::lookup_str`] or
///   [`Interner::index_lookup`].
///
/// Symbols allocated using the global interner will automatically resolve
///   to strings via [`Display`].
/// _This should be done at the last moment_ before outputting,
///   such as before displaying a diagnostic to the user.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub(super) global::NonZeroProgSymSize);
assert_eq_size!(Option<SymbolId>, SymbolId);

impl SymbolId {
    /// Construct index from a raw non-zero value.
    ///
    /// This is used by [static symbols](super::st) to allocate their
    ///   identifiers at compile time.
    pub(super) const fn from_nonzero(n: global::NonZeroProgSymSize) -> Self {
        SymbolId(n)
    }

    pub fn as_usize(self) -> usize {
        self.0.get() as usize
    }

    /// Construct index from a non-zero value for testing.
    ///
    /// Panics
    /// ------
    /// Will panic if `n == 0`.
    #[cfg(test)]
    pub fn test_from_int(n: global::ProgSymSize) -> SymbolId {
        SymbolId(global::NonZeroProgSymSize::new(n).unwrap())
    }
}

impl From<SymbolId> for usize {
    fn from(value: SymbolId) -> usize {
        value.as_usize()
    }
}

type StaticInterner = DefaultInterner<'static>;

thread_local! {
    pub(super) static INTERNER: StaticInterner = super::st::fill(
        StaticInterner::with_capacity(global::INIT_GLOBAL_INTERNER_CAPACITY)
    );
}

/// Acquire a static reference to the global interner.
///
/// Global interners are static and thread-local.
/// They are created using the [`thread_local!`] macro,
///   which produces a [`LocalKey`] that provides access with a lifetime
///     that cannot exceed that of the closure.
/// This is a problem,
///   because we must return a value from the interner's storage.
///
/// This function transmutes the lifetime of [`LocalKey`] back to
///   `'static`.
/// This has the benefit of requiring no further casting of the [`Interner`],
///   since the lifetime of its storage is already `'static`,
///     and so the retrieved interner can be used to return a static string
///     slice without any further unsafe code.
///
/// This lifetime transmutation is expected to be safe,
///   because the thread-local storage is never deallocated before the
///   thread exits,
///     and the storage is only accessible to one thread.
fn with_static_interner<F, R>(key: &'static LocalKey<StaticInterner>, f: F) -> R
where
    F: FnOnce(&'static StaticInterner) -> R,
{
    key.with(|interner| {
        f(unsafe {
            // These type annotations are inferred, but please leave
            // them here; transmute is especially dangerous, and we want
            // to be sure reality always matches our expectations.
            std::mem::transmute::<&StaticInterner, &'static StaticInterner>(
                interner,
            )
        })
    })
}

/// Resolve a [`SymbolId`] to the string value it represents using the
///   global interner.
///
/// This exists as its own trait
///   (rather than simply adding to [`SymbolId`])
///   to make it easy to see what systems rely on global state.
pub trait GlobalSymbolResolve {
    /// Resolve a [`SymbolId`] allocated using the global interner.
    ///
    /// Panics
    /// ======
    /// This will panic if the symbol cannot be found.
    /// Such a situation should never occur if the interner is being used
    ///   properly and would represent a bug in the program.
    ///
    /// If a panic is a problem
    ///   (e.g. if you are looking up a symbol as _part_ of a panic),
    ///   use [`GlobalSymbolResolve::try_lookup_str`].
    fn lookup_str(&self) -> &'static str;

    /// Attempt to resolve a [`SymbolId`] allocated using the global
    ///   interner.
    ///
    /// Unlike [`GlobalSymbolResolve::lookup_str`],
    ///   this cannot panic.
    fn try_lookup_str(&self) -> Option<&'static str>;
}

impl GlobalSymbolResolve for SymbolId {
    fn lookup_str(&self) -> &'static str {
        with_static_interner(&INTERNER, |interner| {
            interner.index_lookup(*self).unwrap_or_else(|| {
                // If the system is being used properly, this should never
                // happen (we'd only look up symbols allocated through this
                // interner).
                diagnostic_panic!(
                    vec![], // no span information available
                    "failed to resolve SymbolId({}) using global \
                         interner of length {}",
                    self.0,
                    interner.len()
                )
            })
        })
    }

    fn try_lookup_str(&self) -> Option<&'static str> {
        with_static_interner(&INTERNER, |interner| {
            interner.index_lookup(*self)
        })
    }
}

impl Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.lookup_str())
    }
}

impl Debug for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // We have to be careful here when looking up the symbol, since this
        // may be called during a panic, and we don't want to panic yet
        // again if we cannot find the symbol.
        write!(
            f,
            "SymbolId({} \"{}\")",
            self.0,
            self.try_lookup_str().unwrap_or("<#!UNKNOWN_SYMBOL>")
        )
    }
}

/// Intern a string using the global interner.
///
/// This provides a convenient API that creates the appearance that string
///   interning is a core Rust language feature
///   (e.g. `"Exprs".intern()`).
pub trait GlobalSymbolIntern {
    /// Intern a string using the global interner.
    ///
    /// See [`crate::sym`] for more information.
    fn intern(self) -> SymbolId;
}

impl GlobalSymbolIntern for &str {
    fn intern(self) -> SymbolId {
        with_static_interner(&INTERNER, |interner| interner.intern(self))
    }
}

impl From<&str> for SymbolId {
    fn from(value: &str) -> Self {
        value.intern()
    }
}
