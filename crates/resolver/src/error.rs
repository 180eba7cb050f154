use jobctx_github::ApiError;
use jobctx_toolkit::InputError;
use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

pub const PERMISSIONS_DOC_URL: &str = "https://docs.github.com/en/actions/security-guides/automatic-token-authentication#modifying-the-permissions-for-the-github_token";

#[derive(Error, Debug, Clone)]
pub enum EnvironmentError {
    #[error("Environment variable {0} is required but not set")]
    Missing(&'static str),

    #[error("Environment variable {name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// The workflow token lacks a job permission.
#[derive(Error, Debug, Clone)]
#[error("Ensure that GitHub job has permission: `{scope}: {permission}`. {url}", url = PERMISSIONS_DOC_URL)]
pub struct PermissionError {
    pub scope: &'static str,
    pub permission: &'static str,
    #[source]
    pub source: Arc<ApiError>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Current job '{name}' could not be found in workflow run.\n\
     If this action is used within a reusable workflow, ensure that action input 'workflow-context' \
     is set correctly and the 'workflow-context' job name matches the job name of the job that uses the reusable workflow."
)]
pub struct NotFoundError {
    pub name: String,
}

/// GitHub returned a deployment without fields its API guarantees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Deployment {deployment} is missing required field '{field}'")]
pub struct ConsistencyError {
    pub deployment: String,
    pub field: &'static str,
}

#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error(transparent)]
    Api(Arc<ApiError>),
}

impl From<ApiError> for ResolveError {
    fn from(err: ApiError) -> Self {
        Self::Api(Arc::new(err))
    }
}

/// Maps a listing failure: 403 becomes a permission hint, anything else passes through.
pub(crate) fn listing_error(err: ApiError, scope: &'static str, permission: &'static str) -> ResolveError {
    if err.is_forbidden() {
        PermissionError {
            scope,
            permission,
            source: Arc::new(err),
        }
        .into()
    } else {
        err.into()
    }
}
