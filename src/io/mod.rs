//! Feature table import and export.
//!
//! Tables are CSV with one feature per line:
//!
//! ```text
//! id,mz,rt,height,mobility,charge,comment,identity,fragment_scans
//! 1,500.0,10.0,1000,,,,Caffeine,101;102
//! ```
//!
//! `mobility`, `charge`, `comment`, `identity` and `fragment_scans` may be
//! empty; scan numbers are separated by `;`. Grouped output appends `kind`,
//! `source_ids` and `isotopes` (`mz:height` pairs separated by `;`).

mod error;
mod reader;
mod writer;


pub use error::IoError;
pub use reader::{parse_feature_table, read_feature_table};
pub use writer::{
    export_json, save_feature_table, save_grouped_table, write_feature_table,
    write_grouped_table, KIND_MERGED, KIND_PASS_THROUGH,
};
