//! GitHub Actions trigger source.
//!
//! Implements the [`build_info::TriggerSource`] port by reading the variables
//! the Actions runner exports into every job:
//!
//! | Variable | Used for |
//! |----------|----------|
//! | `GITHUB_REPOSITORY` | repository in `owner/name` form |
//! | `GITHUB_EVENT_NAME` | [`TriggerContext::event_name`] |
//! | `GITHUB_SHA` | [`TriggerContext::sha`] |
//! | `GITHUB_REF` | [`TriggerContext::git_ref`] |
//! | `GITHUB_EVENT_PATH` | JSON file holding the webhook payload |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Unset
//! variables become empty strings and the resolver in [`build_info`] decides
//! whether that is an error.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use build_info::{EventPayload, TriggerContext, TriggerSource};
use thiserror::Error;
use tracing::{debug, warn};

/// Runner variable holding the `owner/name` repository.
pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
/// Runner variable holding the triggering event name.
pub const GITHUB_EVENT_NAME: &str = "GITHUB_EVENT_NAME";
/// Runner variable holding the commit SHA.
pub const GITHUB_SHA: &str = "GITHUB_SHA";
/// Runner variable holding the fully qualified ref.
pub const GITHUB_REF: &str = "GITHUB_REF";
/// Runner variable holding the path of the webhook payload file.
pub const GITHUB_EVENT_PATH: &str = "GITHUB_EVENT_PATH";

const VARIABLES: [&str; 5] = [
    GITHUB_REPOSITORY,
    GITHUB_EVENT_NAME,
    GITHUB_SHA,
    GITHUB_REF,
    GITHUB_EVENT_PATH,
];

/// Errors raised while reading the Actions runner environment.
#[derive(Debug, Error)]
pub enum ActionsEnvironmentError {
    /// The event payload file exists but could not be read.
    #[error("Failed to read event payload '{}'", path.display())]
    ReadEventFile {
        /// Value of `GITHUB_EVENT_PATH`.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The event payload file is not valid JSON or has the wrong shape.
    #[error("Failed to parse event payload '{}'", path.display())]
    ParseEventFile {
        /// Value of `GITHUB_EVENT_PATH`.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// A snapshot of the Actions runner variables.
///
/// Only the variables listed in the crate documentation are kept, so the
/// snapshot can be logged without leaking secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionsEnvironment {
    vars: HashMap<String, String>,
}

impl ActionsEnvironment {
    /// Captures the runner variables from the current process environment.
    pub fn from_process_env() -> Self {
        Self::from_vars(
            VARIABLES
                .iter()
                .filter_map(|key| std::env::var(key).ok().map(|value| (*key, value))),
        )
    }

    /// Builds a snapshot from explicit key/value pairs.
    ///
    /// Keys other than the runner variables this crate reads are dropped.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| VARIABLES.contains(&k.as_str()))
            .collect();
        Self { vars }
    }

    fn var(&self, key: &str) -> String {
        self.vars.get(key).cloned().unwrap_or_default()
    }

    fn event_payload(&self) -> Result<EventPayload, ActionsEnvironmentError> {
        let Some(path) = self.vars.get(GITHUB_EVENT_PATH).filter(|p| !p.is_empty()) else {
            debug!("{GITHUB_EVENT_PATH} is not set; using an empty payload");
            return Ok(EventPayload::default());
        };

        read_event_payload(Path::new(path))
    }
}

/// Reads a webhook payload file.
///
/// A file that does not exist yields an empty payload and a warning, matching
/// the Actions toolkit.
///
/// # Errors
///
/// Returns [`ActionsEnvironmentError::ReadEventFile`] for any other I/O error
/// and [`ActionsEnvironmentError::ParseEventFile`] if the content is not a
/// JSON payload.
pub fn read_event_payload(path: &Path) -> Result<EventPayload, ActionsEnvironmentError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "{GITHUB_EVENT_PATH} does not exist");
            return Ok(EventPayload::default());
        }
        Err(source) => {
            return Err(ActionsEnvironmentError::ReadEventFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content).map_err(|source| ActionsEnvironmentError::ParseEventFile {
        path: path.to_path_buf(),
        source,
    })
}

impl TriggerSource for ActionsEnvironment {
    type Error = ActionsEnvironmentError;

    fn repository_name(&self) -> Result<String, Self::Error> {
        Ok(self.var(GITHUB_REPOSITORY))
    }

    fn trigger_context(&self) -> Result<TriggerContext, Self::Error> {
        let context = TriggerContext::new(
            self.var(GITHUB_EVENT_NAME),
            self.var(GITHUB_SHA),
            self.var(GITHUB_REF),
        )
        .with_payload(self.event_payload()?);

        debug!(
            event = %context.event_name,
            sha = %context.sha,
            git_ref = %context.git_ref,
            "Read trigger context from runner environment"
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn payload_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_push_context() {
        let env = ActionsEnvironment::from_vars([
            (GITHUB_REPOSITORY, "octo-org/octo-repo"),
            (GITHUB_EVENT_NAME, "push"),
            (GITHUB_SHA, "ffac537e6cbbf934b08745a378932722df287a53"),
            (GITHUB_REF, "refs/heads/main"),
        ]);

        assert_eq!(env.repository_name().unwrap(), "octo-org/octo-repo");
        assert_eq!(
            env.trigger_context().unwrap(),
            TriggerContext::new(
                "push",
                "ffac537e6cbbf934b08745a378932722df287a53",
                "refs/heads/main"
            )
        );
    }

    #[test]
    fn test_unset_variables_are_empty() {
        let env = ActionsEnvironment::default();
        assert_eq!(env.repository_name().unwrap(), "");
        assert_eq!(env.trigger_context().unwrap(), TriggerContext::default());
    }

    #[test]
    fn test_unrelated_variables_are_dropped() {
        let env = ActionsEnvironment::from_vars([("GITHUB_TOKEN", "secret"), (GITHUB_SHA, "abc")]);
        assert_eq!(env, ActionsEnvironment::from_vars([(GITHUB_SHA, "abc")]));
    }

    #[test]
    fn test_reads_pull_request_payload() {
        let file = payload_file(
            r#"{"action":"synchronize","pull_request":{"number":7,"head":{"sha":"deadbeef"}}}"#,
        );
        let env = ActionsEnvironment::from_vars([
            (GITHUB_EVENT_NAME, "pull_request".to_string()),
            (GITHUB_EVENT_PATH, file.path().display().to_string()),
        ]);

        let context = env.trigger_context().unwrap();
        assert_eq!(context.payload, EventPayload::pull_request(7, "deadbeef"));
    }

    #[test]
    fn test_odd_payload_leaves_event_check_to_resolver() {
        let file = payload_file(r#"{"pull_request":{"number":"21","head":"unexpected"}}"#);
        let env = ActionsEnvironment::from_vars([
            (GITHUB_REPOSITORY, "owner/repo".to_string()),
            (GITHUB_EVENT_NAME, "chicken".to_string()),
            (GITHUB_EVENT_PATH, file.path().display().to_string()),
        ]);

        let context = env.trigger_context().unwrap();
        let pr = context.payload.pull_request.as_ref().unwrap();
        assert_eq!(pr.number, Some(21));
        assert_eq!(pr.head, None);

        let err = build_info::EventResolver::new("owner/repo", &context).unwrap_err();
        assert!(matches!(err, build_info::ResolveError::UnsupportedEvent { .. }));
    }

    #[test]
    fn test_missing_event_file_gives_empty_payload() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("event.json");

        assert_eq!(read_event_payload(&missing).unwrap(), EventPayload::default());
    }

    #[test]
    fn test_malformed_event_file_fails() {
        let file = payload_file("{ not json");
        let err = read_event_payload(file.path()).unwrap_err();
        assert!(matches!(err, ActionsEnvironmentError::ParseEventFile { .. }));
    }

    #[test]
    fn test_event_path_that_is_a_directory_fails_to_read() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_event_payload(dir.path()).unwrap_err();
        assert!(matches!(err, ActionsEnvironmentError::ReadEventFile { .. }));
    }
}
