//! # jobctx toolkit
//!
//! Step-level plumbing shared by the resolvers and the `jobctx` binary:
//!
//! - **Inputs**: `INPUT_*` lookup with trimming and required checks
//! - **Schemas**: typed validation with a YAML fallback for structured inputs
//! - **Workflow commands**: failure reporting, masking, groups and step outputs
//!
//! ## Example
//!
//! ```no_run
//! use jobctx_toolkit::{InputResolver, Typed};
//!
//! let inputs = InputResolver::from_env();
//! let tags: Option<Vec<String>> = inputs.resolve("tags", &Typed::new()).unwrap();
//! ```

pub mod command;
mod error;
mod input;
mod schema;

pub use error::{InputError, Issue, Result, ValidationError};
pub use input::{input_env_key, EnvInputs, InputResolver, InputSource};
pub use schema::{InputSchema, Typed};
