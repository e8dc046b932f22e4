//! Evaluation harness around [`otsu_eval_core`].
//!
//! This crate provides what the computation core leaves to its callers:
//! - synthetic test images ([`patterns`]),
//! - a timing harness that runs several pipeline strategies on one image
//!   ([`harness`]),
//! - text and JSON reports ([`report`]),
//! - (feature `cli`) the `otsu-eval` binary.
//!
//! ## Quickstart
//!
//! ```
//! use otsu_eval::harness::{compare, default_strategies};
//! use otsu_eval::patterns::Pattern;
//! use otsu_eval::report::format_text;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = Pattern::Gradient.render();
//! let runs = compare(&image, &default_strategies(), 3)?;
//! assert_eq!(runs[0].threshold, 124);
//! println!("{}", format_text(&runs));
//! # Ok(())
//! # }
//! ```

pub use otsu_eval_core as core;

pub mod config;
pub mod harness;
pub mod patterns;
pub mod report;

mod error;

pub use error::EvalError;
