use serde::{Deserialize, Serialize};

/// Identity GitHub uses for operations performed with the workflow token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotIdentity {
    pub name: &'static str,
    pub app_slug: &'static str,
}

pub const BOT: BotIdentity = BotIdentity {
    name: "github-actions[bot]",
    app_slug: "github-actions",
};

/// A job of a workflow run attempt as listed by the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub run_id: Option<u64>,
    #[serde(default)]
    pub run_attempt: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub head_sha: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub runner_name: Option<String>,
    #[serde(default)]
    pub workflow_name: Option<String>,
}

impl JobDescriptor {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            run_id: None,
            run_attempt: None,
            status: None,
            conclusion: None,
            head_sha: None,
            html_url: None,
            runner_name: None,
            workflow_name: None,
        }
    }
}

/// The parts of a REST deployment record needed to pick candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentSummary {
    pub node_id: String,
    pub creator_login: Option<String>,
    pub app_slug: Option<String>,
}

impl DeploymentSummary {
    pub fn performed_by_bot(&self) -> bool {
        self.app_slug.as_deref() == Some(BOT.app_slug)
            || self.creator_login.as_deref() == Some(BOT.name)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDeployment {
    node_id: String,
    #[serde(default)]
    creator: Option<RawLogin>,
    #[serde(default)]
    performed_via_github_app: Option<RawApp>,
}

#[derive(Debug, Deserialize)]
struct RawLogin {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawApp {
    #[serde(default)]
    slug: Option<String>,
}

impl From<RawDeployment> for DeploymentSummary {
    fn from(raw: RawDeployment) -> Self {
        Self {
            node_id: raw.node_id,
            creator_login: raw.creator.map(|c| c.login),
            app_slug: raw.performed_via_github_app.and_then(|app| app.slug),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentState {
    Abandoned,
    Active,
    Destroyed,
    Error,
    Failure,
    Inactive,
    InProgress,
    Pending,
    Queued,
    Success,
    Waiting,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentStatusNode {
    pub log_url: Option<String>,
    pub environment_url: Option<String>,
}

/// Extended deployment fields fetched through the GraphQL `nodes` query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentNode {
    pub id: Option<String>,
    pub database_id: Option<u64>,
    pub commit_oid: Option<String>,
    pub created_at: Option<String>,
    pub task: Option<String>,
    pub state: Option<DeploymentState>,
    pub latest_environment: Option<String>,
    pub latest_status: Option<DeploymentStatusNode>,
}
