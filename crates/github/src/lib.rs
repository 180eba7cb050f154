//! # jobctx GitHub collaborators
//!
//! - [`GitHubApi`]: the job listing, deployment listing and deployment node
//!   queries the resolvers consume
//! - [`GitHubClient`]: `octocrab` implementation; listings are followed through
//!   every page and deployment nodes come from one GraphQL `nodes` query

mod api;
mod client;
mod error;
mod types;

pub use api::{GitHubApi, MAX_NODES_PER_QUERY};
pub use client::{ClientConfig, GitHubClient, DEFAULT_API_URL, DEFAULT_GRAPHQL_URL, DEFAULT_TIMEOUT};
pub use error::{ApiError, Result};
pub use url::Url;
pub use types::{
    BotIdentity, DeploymentNode, DeploymentState, DeploymentStatusNode, DeploymentSummary,
    JobDescriptor, BOT,
};
