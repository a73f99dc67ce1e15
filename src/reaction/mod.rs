//! Nuclear reactions, their rates, and collections of them
//!
//! # Overview
//!
//! A [Reaction] is a list of reactants and products. Elements are either
//! nuclides, named as in [species](crate::species), or one of the
//! [PARTICLES] such as `gamma` or `neutrino_e`. The reaction string is built
//! from the elements and identifies the reaction within a [Reac] collection.
//!
//! ```text
//! c12 + he4 -> o16 + gamma
//! n -> h1 + electron + anti-neutrino_e
//! ```
//!
//! Every reaction may carry [RateData] describing how its forward rate
//! depends on temperature:
//!
//! | Kind             | Description                                        |
//! | ---------------- | -------------------------------------------------- |
//! | `single_rate`    | Constant rate                                      |
//! | `rate_table`     | Rate and enhancement factor tabulated against T9   |
//! | `non_smoker_fit` | One or more seven parameter fits                   |
//! | `user_rate`      | Function registered on the collection under a key  |
//!
//! ```rust
//! use nucnet::reaction::{RateData, Reaction};
//!
//! let reaction = Reaction::from_elements(&["h1", "h1"], &["h2", "positron", "neutrino_e"])
//!     .with_rate(RateData::SingleRate(5.0e-20));
//!
//! assert_eq!(reaction.string(), "h1 + h1 -> h2 + positron + neutrino_e");
//! assert!(reaction.is_weak() && reaction.is_beta_plus());
//! assert_eq!(reaction.compute_rate(1.0).unwrap(), 5.0e-20);
//! ```
//!
//! Collections are read from and written to the `reaction_data` XML format
//! with [read_reac_xml](crate::read_reac_xml) and
//! [write_reac_xml](crate::write_reac_xml).

// Split into subfiles for development, but anything important is re-exported
mod core;
mod rate;
mod reac;
mod view;

// inline important the reaction modules for a nice public API
#[doc(inline)]
pub use crate::reaction::core::{is_nuclide, Reaction, PARTICLES};

#[doc(inline)]
pub use crate::reaction::rate::{NonSmokerFit, RateData, RateTable, UserRate};

#[doc(inline)]
pub use crate::reaction::reac::{Reac, ReactionCompare, UserRateFn};

#[doc(inline)]
pub use crate::reaction::view::ReacView;
