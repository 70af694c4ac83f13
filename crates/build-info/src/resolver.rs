//! Resolution of a trigger event into [`BuildInformation`].

use tracing::{debug, warn};

use crate::{
    BranchName, BuildInformation, BuildName, CommitSha, PullRequestNumber, RepositoryIdentifier,
    RepositoryName, RepositoryOwner, ResolveError, SlashPolicy, TriggerContext, TriggerKind,
};

const HEADS_PREFIX: &str = "refs/heads/";
const TAGS_PREFIX: &str = "refs/tags/";

const PR_NUMBER_PATH: &str = "context.payload.pull_request.number";
const PR_HEAD_SHA_PATH: &str = "context.payload.pull_request.head.sha";

/// Derives the build identity of one workflow run from its trigger context.
///
/// Construction validates the repository string and the event kind; after
/// that the resolver is read-only. Every accessor recomputes its value from
/// the borrowed [`TriggerContext`], so [`EventResolver::build_information`]
/// always agrees with the individual accessors.
///
/// | Accessor | `push` / `workflow_dispatch` | `pull_request` |
/// |----------|------------------------------|----------------|
/// | [`commit_hash`](Self::commit_hash) | `context.sha` | `payload.pull_request.head.sha` |
/// | [`branch_name`](Self::branch_name) | `context.ref` without `refs/heads/` or `refs/tags/` | `pr-<number>` |
/// | [`build_name`](Self::build_name) | branch name with `/` rewritten per [`SlashPolicy`] | `pr-<number>` |
#[derive(Debug, Clone)]
pub struct EventResolver<'a> {
    context: &'a TriggerContext,
    kind: TriggerKind,
    repository: RepositoryIdentifier,
    slash_policy: SlashPolicy,
}

impl<'a> EventResolver<'a> {
    /// Validates the inputs and creates a resolver.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidRepositoryFormat`] if `repository` is not in
    ///   `"owner/name"` form.
    /// - [`ResolveError::UnsupportedEvent`] if the context's event name is not
    ///   one of the supported [`TriggerKind`]s.
    pub fn new(repository: &str, context: &'a TriggerContext) -> Result<Self, ResolveError> {
        let repository = RepositoryIdentifier::parse(repository)?;

        let kind = TriggerKind::from_event_name(&context.event_name).ok_or_else(|| {
            ResolveError::UnsupportedEvent {
                event_name: context.event_name.clone(),
            }
        })?;

        debug!(%repository, event = %kind, "Trigger context accepted");

        Ok(Self {
            context,
            kind,
            repository,
            slash_policy: SlashPolicy::default(),
        })
    }

    /// Sets how slashes are rewritten in [`build_name`](Self::build_name).
    #[must_use]
    pub fn with_slash_policy(mut self, policy: SlashPolicy) -> Self {
        self.slash_policy = policy;
        self
    }

    /// Returns the validated trigger kind.
    pub fn kind(&self) -> TriggerKind {
        self.kind
    }

    /// Returns the parsed repository.
    pub fn repository(&self) -> &RepositoryIdentifier {
        &self.repository
    }

    /// Returns the full build identity.
    ///
    /// # Errors
    ///
    /// Fails with the first error any individual accessor would return; no
    /// partial record is produced.
    pub fn build_information(&self) -> Result<BuildInformation, ResolveError> {
        Ok(BuildInformation {
            build_name: self.build_name()?,
            branch_name: self.branch_name()?,
            commit_hash: self.commit_hash()?,
            repo_owner: self.repo_owner().clone(),
            repo_name: self.repo_name().clone(),
        })
    }

    /// Returns the name used to tag the build.
    ///
    /// # Errors
    ///
    /// Same as [`branch_name`](Self::branch_name).
    pub fn build_name(&self) -> Result<BuildName, ResolveError> {
        let branch = self.branch_name()?;
        let build_name = match self.kind {
            TriggerKind::Push | TriggerKind::WorkflowDispatch => {
                self.slash_policy.apply(branch.as_str())
            }
            TriggerKind::PullRequest => branch.to_string(),
        };

        Ok(BuildName::verbatim(build_name))
    }

    /// Returns the branch or tag being built, or `pr-<number>` for a pull
    /// request.
    ///
    /// # Errors
    ///
    /// [`ResolveError::MissingPullRequestData`] if a pull request payload has
    /// no number. A push or dispatch ref is never rejected; an empty ref
    /// gives an empty branch name.
    pub fn branch_name(&self) -> Result<BranchName, ResolveError> {
        match self.kind {
            TriggerKind::Push | TriggerKind::WorkflowDispatch => {
                let git_ref = self.context.git_ref.as_str();
                let branch = git_ref
                    .strip_prefix(HEADS_PREFIX)
                    .or_else(|| git_ref.strip_prefix(TAGS_PREFIX))
                    .unwrap_or(git_ref);

                Ok(BranchName::verbatim(branch))
            }
            TriggerKind::PullRequest => {
                let number = self.pull_request_number()?;
                Ok(BranchName::verbatim(format!("pr-{number}")))
            }
        }
    }

    /// Returns the commit being built.
    ///
    /// For a pull request this is the head commit of the pull request branch,
    /// not the merge commit the workflow checks out.
    ///
    /// # Errors
    ///
    /// [`ResolveError::MissingPullRequestData`] if a pull request payload has
    /// no head SHA, or an empty one. The push or dispatch SHA is returned
    /// verbatim, even when empty.
    pub fn commit_hash(&self) -> Result<CommitSha, ResolveError> {
        match self.kind {
            TriggerKind::Push | TriggerKind::WorkflowDispatch => {
                Ok(CommitSha::verbatim(self.context.sha.as_str()))
            }
            TriggerKind::PullRequest => self
                .context
                .payload
                .pull_request
                .as_ref()
                .and_then(|pr| pr.head.as_ref())
                .and_then(|head| head.sha.as_deref())
                .and_then(CommitSha::new)
                .ok_or_else(|| missing_pull_request_data(PR_HEAD_SHA_PATH)),
        }
    }

    /// Returns the repository owner.
    pub fn repo_owner(&self) -> &RepositoryOwner {
        self.repository.owner()
    }

    /// Returns the repository name.
    pub fn repo_name(&self) -> &RepositoryName {
        self.repository.name()
    }

    fn pull_request_number(&self) -> Result<PullRequestNumber, ResolveError> {
        self.context
            .payload
            .pull_request
            .as_ref()
            .and_then(|pr| pr.number)
            .map(PullRequestNumber::new)
            .ok_or_else(|| missing_pull_request_data(PR_NUMBER_PATH))
    }
}

fn missing_pull_request_data(path: &'static str) -> ResolveError {
    warn!(path, "Pull request payload field is not defined");
    ResolveError::MissingPullRequestData { path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventPayload, PullRequestHead, PullRequestPayload};

    const SHA: &str = "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1";

    fn push(git_ref: &str) -> TriggerContext {
        TriggerContext::new("push", SHA, git_ref)
    }

    #[test]
    fn test_rejects_repository_before_event() {
        let context = TriggerContext::new("chicken", SHA, "refs/heads/main");
        let err = EventResolver::new("no-slash", &context).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRepositoryFormat { .. }));
    }

    #[test]
    fn test_rejects_unknown_event() {
        let context = TriggerContext::new("chicken", SHA, "refs/heads/main");
        let err = EventResolver::new("some/repo", &context).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnsupportedEvent {
                event_name: "chicken".to_string()
            }
        );
        assert_eq!(err.to_string(), "Unsupported event 'chicken'.");
    }

    #[test]
    fn test_strips_heads_and_tags_prefix_once() {
        let cases = [
            ("refs/heads/main", "main"),
            ("refs/tags/v1.2.3", "v1.2.3"),
            ("refs/heads/refs/tags/odd", "refs/tags/odd"),
            ("refs/pull/7/merge", "refs/pull/7/merge"),
            ("main", "main"),
        ];

        for (git_ref, expected) in cases {
            let context = push(git_ref);
            let resolver = EventResolver::new("some/repo", &context).unwrap();
            assert_eq!(
                resolver.branch_name().unwrap().as_str(),
                expected,
                "ref '{git_ref}'"
            );
        }
    }

    #[test]
    fn test_build_name_replaces_every_slash_by_default() {
        let context = push("refs/heads/user/ticket/123");
        let resolver = EventResolver::new("some/repo", &context).unwrap();
        assert_eq!(resolver.branch_name().unwrap().as_str(), "user/ticket/123");
        assert_eq!(resolver.build_name().unwrap().as_str(), "user__ticket__123");
    }

    #[test]
    fn test_build_name_first_only_policy() {
        let context = push("refs/heads/user/ticket/123");
        let resolver = EventResolver::new("some/repo", &context)
            .unwrap()
            .with_slash_policy(SlashPolicy::FirstOnly);
        assert_eq!(resolver.build_name().unwrap().as_str(), "user__ticket/123");
    }

    #[test]
    fn test_empty_ref_and_sha_pass_through() {
        let context = TriggerContext::new("workflow_dispatch", "", "refs/heads/");
        let resolver = EventResolver::new("some/repo", &context).unwrap();
        assert_eq!(resolver.branch_name().unwrap().as_str(), "");
        assert_eq!(resolver.build_name().unwrap().as_str(), "");
        assert_eq!(resolver.commit_hash().unwrap().as_str(), "");

        let context = TriggerContext::new("push", "", "");
        let info = EventResolver::new("some/repo", &context)
            .unwrap()
            .build_information()
            .unwrap();
        assert_eq!(info.branch_name.as_str(), "");
        assert_eq!(info.commit_hash.as_str(), "");
    }

    #[test]
    fn test_empty_pull_request_head_sha_is_missing() {
        let context = TriggerContext::new("pull_request", SHA, "refs/pull/4/merge")
            .with_payload(EventPayload::pull_request(4, ""));
        let resolver = EventResolver::new("some/repo", &context).unwrap();
        assert_eq!(
            resolver.commit_hash().unwrap_err(),
            ResolveError::MissingPullRequestData { path: PR_HEAD_SHA_PATH }
        );
    }

    #[test]
    fn test_pull_request_number_zero_is_present() {
        let context = TriggerContext::new("pull_request", SHA, "refs/pull/0/merge")
            .with_payload(EventPayload::pull_request(0, SHA));
        let resolver = EventResolver::new("some/repo", &context).unwrap();
        assert_eq!(resolver.branch_name().unwrap().as_str(), "pr-0");
    }

    #[test]
    fn test_pull_request_missing_fields() {
        let context = TriggerContext::new("pull_request", SHA, "refs/pull/5/merge").with_payload(
            EventPayload {
                pull_request: Some(PullRequestPayload {
                    number: None,
                    head: Some(PullRequestHead { sha: None }),
                }),
            },
        );
        let resolver = EventResolver::new("some/repo", &context).unwrap();

        assert_eq!(
            resolver.branch_name().unwrap_err(),
            ResolveError::MissingPullRequestData { path: PR_NUMBER_PATH }
        );
        assert_eq!(
            resolver.build_name().unwrap_err(),
            ResolveError::MissingPullRequestData { path: PR_NUMBER_PATH }
        );
        assert_eq!(
            resolver.commit_hash().unwrap_err(),
            ResolveError::MissingPullRequestData { path: PR_HEAD_SHA_PATH }
        );
        assert!(resolver.build_information().is_err());
    }

    #[test]
    fn test_pull_request_without_payload() {
        let context = TriggerContext::new("pull_request", SHA, "refs/pull/5/merge");
        let resolver = EventResolver::new("some/repo", &context).unwrap();
        assert!(matches!(
            resolver.commit_hash(),
            Err(ResolveError::MissingPullRequestData { .. })
        ));
    }

    #[test]
    fn test_pull_request_ignores_context_sha_and_ref() {
        let context = TriggerContext::new("pull_request", SHA, "refs/heads/pr_21")
            .with_payload(EventPayload::pull_request(21, "feedface"));
        let resolver = EventResolver::new("some/repo", &context).unwrap();
        assert_eq!(resolver.kind(), TriggerKind::PullRequest);
        assert_eq!(resolver.commit_hash().unwrap().as_str(), "feedface");
        assert_eq!(resolver.build_name().unwrap().as_str(), "pr-21");
    }

    #[test]
    fn test_resolver_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EventResolver<'static>>();
    }
}
