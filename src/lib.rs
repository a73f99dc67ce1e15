//! # The Nucnet crate
//!
//! A library for nuclear species, reaction, and network data
//!
//! ## Installation
//!
//! Direct install from github:
//!
//! ```shell
//! cargo install --git https://github.com/repositony/nucnet.git
//! ```
//!
//! ## Overview
//!
//! The crate contains several command line tools for quickly inspecting
//! nuclear data files and the networks built from them.
//!
//! | Command line | Description                                                |
//! | ------------ | ---------------------------------------------------------- |
//! | `nucinfo`    | Summarise, filter, sort, and convert nuclear data files    |
//! | `partf`      | Tabulate partition functions and NSE factors of species    |
//! | `flows`      | Compute reaction rates and flows for the zones of a model  |
//!
//! All tools are fully documented with detailed `--help` messages, including
//! examples for common use cases.
//!
//! ### Supported data files
//!
//! | Root element      | Contents                  | Reader                             |
//! | ----------------- | ------------------------- | ---------------------------------- |
//! | `nuclear_data`    | Species                   | [read_nuc_xml]                     |
//! | `reaction_data`   | Reactions and rate data   | [read_reac_xml]                    |
//! | `nuclear_network` | Species and reactions     | [read_net_xml]                     |
//! | `zone_data`       | Labelled zone abundances  | [read_zone_xml]                    |
//!
//! Every collection can be written back out with the matching `write_*`
//! function.
//!
//! ### Supported rate data
//!
//! | Rate data                                            | Evaluated by              |
//! | ---------------------------------------------------- | ------------------------- |
//! | [RateData::SingleRate](crate::reaction::RateData)    | Constant at all T9        |
//! | [RateData::RateTable](crate::reaction::RateData)     | Log-linear interpolation  |
//! | [RateData::NonSmokerFit](crate::reaction::RateData)  | Sum of fit expressions    |
//! | [RateData::UserRate](crate::reaction::RateData)      | A registered function     |
//!
//! ## Advanced use
//!
//! The command line tools are for convenience, the crate itself is where the
//! useful functionality lives. A network can be read with a one-liner, and
//! from there the rates and flows of any reaction are available.
//!
//! ```rust
//! use nucnet::net::Net;
//! use nucnet::zone::Zone;
//!
//! let net = nucnet::read_net_xml("./data/network.xml", "", "").unwrap();
//! let zones = nucnet::read_zone_xml("./data/zone_data.xml", net.nuc()).unwrap();
//!
//! // only the reactions among light species
//! let view = net.view("z <= 8", "").unwrap();
//! let flows = zones[0].compute_flows(&view, 1.0, 1.0e4).unwrap();
//! assert_eq!(flows.len(), view.reac().len());
//! ```
//!
//! As an overview:
//! - The [species] module defines a single nuclear species and its naming.
//! - The [nuc] module holds a sorted collection of species and views of it.
//! - The [reaction] module holds reactions, their rate data, and collections.
//! - The [net] module pairs the two for validity checks, Q values, and rates.
//! - The [zone] module holds labelled abundances and computes flows, with
//!   property-driven rate modifications and energy generation rates.
//! - The [filter] module is the small predicate language used for selections.
//!
//! In the background, `quick-xml` and `serde` handle the data files, `nom`
//! parses the filter expressions, and `clap` is used for the command line
//! interface.
//!
//! All of the useful functionality from the file readers and writers is
//! re-exported for convenience.

// Public facing modules
pub mod constants;
pub mod filter;
pub mod interp;
pub mod net;
pub mod nuc;
pub mod property;
pub mod reaction;
pub mod species;
pub mod utils;
pub mod writers;
pub mod zone;

// note that docs are hidden to prevent confusing the current simple API
pub mod readers;

// Re-exports of useful data structures
#[doc(inline)]
pub use crate::readers::{read_nuc_xml, read_net_xml, read_reac_xml, read_zone_xml};

#[doc(inline)]
pub use crate::writers::{
    write_net_xml, write_nuc_xml, write_reac_xml, write_zone_xml, zones_to_xml_string,
};
