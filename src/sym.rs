// String internment
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

//! String internment system.
//!
//! Interned strings are represented by [`SymbolId`],
//!   created by an [`Interner`]:
//!
//!   - [`ArenaInterner`] - Intern pool backed by an [arena][] for fast
//!       and stable allocation.
//!   - [`DefaultInterner`] - The currently recommended intern pool
//!       configuration for symbol interning.
//!
//! Sort names,
//!   labels,
//!   attribute keys and constant values are all compared far more often
//!   than they are displayed,
//!     so every one of them is a [`SymbolId`].
//!
//! ```
//! use kdisamb::sym::{Interner, DefaultInterner};
//!
//! // Inputs to be interned
//! let a = "Exp";
//! let b = &"Exp".to_string();
//! let c = "Exps";
//! let d = &c[0..3];
//!
//! let interner = DefaultInterner::new();
//!
//! let (ia, ib, ic, id) = (
//!     interner.intern(a),
//!     interner.intern(b),
//!     interner.intern(c),
//!     interner.intern(d),
//! );
//!
//! assert_eq!(ia, ib);
//! assert_eq!(ia, id);
//! assert_ne!(ia, ic);
//!
//! // Only "Exp" and "Exps" are interned
//! assert_eq!(2, interner.len());
//! assert!(interner.contains("Exp"));
//! assert!(interner.contains("Exps"));
//! assert!(!interner.contains("something else"));
//! ```
//!
//! Global Interner
//! ===============
//! Symbols are so pervasive that passing an interner to every function
//!   that needs one would be tedious.
//! A thread-local global interner is therefore provided,
//!   accessed through [`GlobalSymbolIntern`] and [`GlobalSymbolResolve`]:
//!
//! ```
//! use kdisamb::sym::{GlobalSymbolIntern, GlobalSymbolResolve, SymbolId};
//!
//! let sym: SymbolId = "Stmts".intern();
//! assert_eq!("Stmts", sym.lookup_str());
//! assert_eq!("Stmts", sym.to_string());
//! ```
//!
//! Since the interner is thread-local,
//!   symbols must not be shared between threads.
//! Terms,
//!   which hold symbols,
//!   are confined to one thread anyway (they are [`Rc`](std::rc::Rc)-based),
//!     so each thread disambiguating its own trees has its own pool.
//!
//! Static Symbols
//! ==============
//! Labels and attributes reserved by the framework
//!   (e.g. `#KRewrite` or `bracket`)
//!   are allocated at compile time in [`st`] and filled into the global
//!   interner upon its initialization,
//!     so that they can be used in `const` contexts and compared without
//!     ever being interned at runtime.
//!
//! [arena]: bumpalo

mod interner;
mod prefill;
mod symbol;

pub use interner::{ArenaInterner, DefaultInterner, FxArenaInterner, Interner};
pub use prefill::st;
pub use symbol::{GlobalSymbolIntern, GlobalSymbolResolve, SymbolId};
