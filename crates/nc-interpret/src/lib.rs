//! Conversion between G-code programs and tables.
//!
//! [`nc_to_dataframe`] interprets a program line by line and returns one row
//! per line with the machine state after that line, plus the final state.
//! [`dataframe_to_nc`] writes such a table back as program text, stating a
//! value only where it changed.
//!
//! ```
//! use nc_groups::shared_registry;
//! use nc_interpret::{dataframe_to_nc_string, nc_to_dataframe};
//! use nc_model::{ConvertOptions, ReverseOptions};
//!
//! let registry = shared_registry().unwrap();
//! let options = ConvertOptions::new().with_axes(["X", "Y"]);
//! let conversion = nc_to_dataframe(Some("G1 X10\nY5"), &options, registry).unwrap();
//! assert_eq!(conversion.table.height(), 2);
//!
//! let text = dataframe_to_nc_string(&conversion.table, registry, &ReverseOptions::default()).unwrap();
//! assert_eq!(text, "G1 X=10\nY=5\n");
//! ```

#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod expr;
pub mod reverse;
pub mod table;
pub mod tokenizer;
pub mod tracker;

pub use engine::{Conversion, SkippedLine, nc_to_dataframe};
pub use error::{ConvertError, Result, Source};
pub use reverse::{dataframe_to_nc, dataframe_to_nc_string};
