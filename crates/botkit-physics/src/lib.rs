#![warn(missing_docs)]

//! Static physics validation for botkit assemblies.
//!
//! Validation is a single pass over the parts' specs that checks whether the
//! chassis can carry everything, the batteries can power everything, and the
//! chassis can climb the required slope. Failed checks are data in the
//! returned [`Verdict`], never errors.
//!
//! # Example
//!
//! ```
//! use botkit_ir::{OperatingRequirements, Specs};
//! use botkit_physics::{validate, ErrorCode};
//!
//! let parts = [Specs::Sensor {
//!     weight: 0.8,
//!     dims: [0.1, 0.1, 0.08],
//!     power: 8.0,
//!     range: None,
//!     fov_h: None,
//!     fov_v: None,
//! }];
//! let verdict = validate(&parts, &OperatingRequirements::default());
//! assert_eq!(verdict.errors, vec![ErrorCode::NoChassis]);
//! ```

mod component;
mod validate;
mod verdict;

pub use component::Component;
pub use validate::{validate, validate_tree};
pub use verdict::{Budget, ErrorCode, Metrics, Verdict};
