//! Sketch backend for packet-processing functions.
//!
//! Given a compilation unit of the restricted packet language, the backend produces
//! the input of a program synthesizer:
//! - [`sketch`]: a renamed, parameter-substituted specification of every packet function
//! - [`constants`]: the distinct integer literals of the packet function
//!
//! Both passes validate the input against the restricted grammar ([`walker`]) and fail
//! as a whole on anything outside it.

pub mod collector;
pub mod constants;
pub mod sketch;
pub mod utils;
pub mod walker;

pub use constants::ConstantSetGenerator;
pub use sketch::{SketchGenerator, Specification, sketch_backend_transform};
pub use utils::{
    conf::SketchConfig,
    error::{SketchError, SketchResult},
};
