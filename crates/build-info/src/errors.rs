//! Error type for build-information resolution.
//!
//! Every variant is a validation failure of the inputs handed to
//! [`crate::EventResolver`]. None of them is transient: retrying with the same
//! inputs always fails the same way, so callers should surface the error and
//! stop.

use thiserror::Error;

/// Errors produced while constructing an [`crate::EventResolver`] or reading
/// one of its accessors.
///
/// Each variant carries the offending value so callers can branch on the kind
/// and still report what was wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The repository string is missing or is not in `"owner/name"` form.
    ///
    /// Produced by: construction.
    #[error("Unexpected repository name format '{value}'.")]
    InvalidRepositoryFormat {
        /// The repository string as supplied.
        value: String,
    },

    /// The trigger event is not `push`, `pull_request` or `workflow_dispatch`.
    ///
    /// Produced by: construction.
    #[error("Unsupported event '{event_name}'.")]
    UnsupportedEvent {
        /// The event name as supplied by the trigger context.
        event_name: String,
    },

    /// A pull request trigger lacks a payload field an accessor needs.
    ///
    /// Produced by: accessors, on first use of the missing field.
    #[error("Path {path} is not defined.")]
    MissingPullRequestData {
        /// Dotted path of the missing field, e.g.
        /// `context.payload.pull_request.number`.
        path: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = ResolveError::UnsupportedEvent {
            event_name: "chicken".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported event 'chicken'.");

        let err = ResolveError::MissingPullRequestData {
            path: "context.payload.pull_request.head.sha",
        };
        assert_eq!(
            err.to_string(),
            "Path context.payload.pull_request.head.sha is not defined."
        );
    }
}
