//! # jobctx workflow
//!
//! Job naming as the job list shows it.
//!
//! ```text
//! workflow-context input ──> WorkflowContextChainParser ──> [WorkflowContext]
//!                                                               │
//! job-name + #job-matrix ──────────────────────────────> absolute_job_name
//!                                                               │
//!                                         "ci / checks (20) / unit (linux)"
//! ```

mod chain;
mod context;
mod name;

pub use chain::{WorkflowContextChainParser, CHAIN_SHAPE};
pub use context::{Matrix, WorkflowContext};
pub use name::{absolute_job_name, display_name, JobIdentity};
