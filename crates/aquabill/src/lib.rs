//! Water bill analysis CLI tools.
//!
//! This crate provides command-line tools on top of `aquabill-core`:
//!
//! - `aquabill-analyze`: Analyse a bill against its reading cycle and history
//! - `aquabill-simulate`: Bill a monthly volume against the tariff table
//! - `aquabill-community`: Compare charged and calculated bills across a neighbourhood
//!
//! # Example Usage
//!
//! ```bash
//! aquabill-analyze residence.json --history history.csv
//! aquabill-simulate 34.5 --fixed-fee 25 --format json
//! aquabill-community neighbourhood.json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod history_csv;
pub mod report;
