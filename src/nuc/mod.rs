//! Collections of nuclear species and views into them
//!
//! # Overview
//!
//! A [Nuc] holds species keyed by their unique names. Every species has an
//! index equal to its rank under the collection's comparator, which by default
//! orders by Z, then A, then name. The ranks stay contiguous through any
//! insertion or removal.
//!
//! ```rust
//! use nucnet::nuc::Nuc;
//! use nucnet::species::Species;
//!
//! let mut nuc = Nuc::new();
//! for (z, a) in [(26, 56), (2, 4), (28, 56), (1, 1)] {
//!     nuc.add_species(Species::new(z, a, 0.0, 0.0).unwrap()).unwrap();
//! }
//!
//! // ranks follow Z then A
//! assert_eq!(nuc.species_by_name("fe56").unwrap().index(), 2);
//!
//! // removing a species closes the gap
//! nuc.remove_species("he4").unwrap();
//! assert_eq!(nuc.species_by_name("fe56").unwrap().index(), 1);
//! ```
//!
//! A [NucView] is a read-only selection of a collection made with a
//! [Filter](crate::filter::Filter) predicate. Views borrow the collection, so
//! they can never outlive it or see it change underneath them. For an owned
//! copy use [Nuc::extract_subset] instead.
//!
//! Collections are read from and written to the `nuclear_data` XML format with
//! [read_nuc_xml](crate::read_nuc_xml) and [write_nuc_xml](crate::write_nuc_xml).

// Split into subfiles for development, but anything important is re-exported
mod core;
mod view;

// inline important the collection modules for a nice public API
#[doc(inline)]
pub use crate::nuc::core::{default_species_compare, Nuc, SpeciesCompare};

#[doc(inline)]
pub use crate::nuc::view::NucView;
