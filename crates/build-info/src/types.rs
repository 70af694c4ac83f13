//! Input and output records for build-information resolution.
//!
//! [`TriggerContext`] is what the CI host hands in; [`BuildInformation`] is
//! what goes out. Both round-trip through JSON with the field names the
//! GitHub Actions toolkit uses.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{BranchName, BuildName, CommitSha, RepositoryName, RepositoryOwner};

// ---------------------------------------------------------------------------
// Trigger kinds
// ---------------------------------------------------------------------------

/// The trigger events a build can be resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// A direct push of a branch or tag.
    Push,
    /// A pull request was opened or updated.
    PullRequest,
    /// A manual run started from the Actions UI or API.
    WorkflowDispatch,
}

impl TriggerKind {
    /// Maps a GitHub event name to a trigger kind.
    ///
    /// Returns `None` for every event name other than `push`, `pull_request`
    /// and `workflow_dispatch`.
    pub fn from_event_name(event_name: &str) -> Option<Self> {
        match event_name {
            "push" => Some(Self::Push),
            "pull_request" => Some(Self::PullRequest),
            "workflow_dispatch" => Some(Self::WorkflowDispatch),
            _ => None,
        }
    }

    /// Returns the GitHub event name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::PullRequest => "pull_request",
            Self::WorkflowDispatch => "workflow_dispatch",
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Trigger context
// ---------------------------------------------------------------------------

/// The description of the event that triggered a workflow run.
///
/// Mirrors the subset of the Actions toolkit's `context` object that build
/// resolution reads. Missing string fields deserialize as empty strings and a
/// missing payload as an empty one; validation happens in
/// [`crate::EventResolver`], not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerContext {
    /// Event name, e.g. `"push"`. Not yet validated.
    #[serde(rename = "eventName", alias = "event_name", default)]
    pub event_name: String,

    /// Commit SHA the workflow runs on.
    #[serde(default)]
    pub sha: String,

    /// Fully qualified Git ref, e.g. `"refs/heads/main"`.
    #[serde(rename = "ref", default)]
    pub git_ref: String,

    /// Event-specific webhook payload.
    #[serde(default)]
    pub payload: EventPayload,
}

impl TriggerContext {
    /// Creates a context with an empty payload.
    pub fn new(
        event_name: impl Into<String>,
        sha: impl Into<String>,
        git_ref: impl Into<String>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            sha: sha.into(),
            git_ref: git_ref.into(),
            payload: EventPayload::default(),
        }
    }

    /// Replaces the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }
}

/// The parts of a webhook payload that build resolution reads.
///
/// Every other payload key is ignored on deserialization. A field read here
/// whose JSON value has an unexpected type deserializes as `None`, so odd
/// payloads surface as [`crate::ResolveError::MissingPullRequestData`] when
/// the field is needed instead of failing before the event kind is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Present for `pull_request` events.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub pull_request: Option<PullRequestPayload>,
}

/// The `pull_request` object of a pull request webhook payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestPayload {
    /// Pull request number. A numeric string such as `"21"` is accepted.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<u64>,

    /// Head (source) side of the pull request.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub head: Option<PullRequestHead>,
}

/// The `head` object of a pull request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestHead {
    /// Commit SHA at the tip of the pull request branch.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub sha: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(#[allow(dead_code)] IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(u64),
    Text(String),
    Other(#[allow(dead_code)] IgnoredAny),
}

/// Deserializes `T`, mapping `null` or a value of another type to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(value) => Some(value),
        Lenient::Other(_) => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LenientNumber::deserialize(deserializer)? {
        LenientNumber::Number(number) => Some(number),
        LenientNumber::Text(text) => text.trim().parse().ok(),
        LenientNumber::Other(_) => None,
    })
}

impl EventPayload {
    /// Builds a pull request payload with the given number and head SHA.
    pub fn pull_request(number: u64, head_sha: impl Into<String>) -> Self {
        Self {
            pull_request: Some(PullRequestPayload {
                number: Some(number),
                head: Some(PullRequestHead {
                    sha: Some(head_sha.into()),
                }),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Build name sanitisation
// ---------------------------------------------------------------------------

/// How `/` in a branch name is rewritten when forming a [`BuildName`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlashPolicy {
    /// Replace every `/` with `__`.
    #[default]
    All,
    /// Replace only the first `/` with `__`.
    ///
    /// Matches the output of earlier releases for branches with more than one
    /// slash.
    FirstOnly,
}

impl SlashPolicy {
    /// Applies the policy to a branch name.
    pub fn apply(self, branch: &str) -> String {
        match self {
            Self::All => branch.replace('/', "__"),
            Self::FirstOnly => branch.replacen('/', "__", 1),
        }
    }
}

// ---------------------------------------------------------------------------
// Output record
// ---------------------------------------------------------------------------

/// The normalised identity of one build.
///
/// Serialises to a JSON object whose keys appear in the order `build_name`,
/// `branch_name`, `commit_hash`, `repo_owner`, `repo_name`. Downstream
/// workflow steps depend on those key names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInformation {
    /// Tag- and file-name-safe build name.
    pub build_name: BuildName,
    /// Branch, tag or `pr-<number>`.
    pub branch_name: BranchName,
    /// Commit being built.
    pub commit_hash: CommitSha,
    /// Repository owner.
    pub repo_owner: RepositoryOwner,
    /// Repository name.
    pub repo_name: RepositoryName,
}
