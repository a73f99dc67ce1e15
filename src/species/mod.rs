//! Nuclear species and their naming conventions
//!
//! # Overview
//!
//! A [Species] is a single nuclide (or a named state of one), identified by
//! its atomic number `Z`, mass number `A`, and an optional state label. The
//! name is always derived from these, so two species with the same name are
//! the same nuclide.
//!
//! | Z     | A     | State | Name     |
//! | ----- | ----- | ----- | -------- |
//! | 0     | 1     |       | `n`      |
//! | 1     | 1     |       | `h1`     |
//! | 2     | 4     |       | `he4`    |
//! | 13    | 26    | `g`   | `al26g`  |
//! | 117   | 294   |       | `uus294` |
//!
//! Each species also carries a mass excess (MeV), a ground state spin, an
//! optional source annotation, and an optional table of the partition
//! function against temperature.
//!
//! ```rust
//! use nucnet::species::{PartfTable, Species};
//!
//! let table = PartfTable::new(vec![1.0, 5.0, 10.0], vec![0.0, 0.2, 0.9]).unwrap();
//! let ni56 = Species::new(28, 56, -53.904, 0.0).unwrap().with_partf(table);
//!
//! // tabulated points are returned exactly
//! assert_eq!(ni56.partition_function(5.0).unwrap(), 10f64.powf(0.2));
//! ```
//!
//! Species are normally held in a [Nuc](crate::nuc::Nuc) collection, which
//! assigns each one an index.

// Split into subfiles for development, but anything important is re-exported
mod core;
mod naming;

// inline important the species-related modules for a nice public API
#[doc(inline)]
pub use crate::species::core::{PartfTable, Species};

#[doc(inline)]
pub use crate::species::naming::{
    base_name, element_symbol, species_name, upper_case_symbol,
};
