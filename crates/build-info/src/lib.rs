//! Build identity resolution for CI trigger events.
//!
//! This crate turns the description of a CI trigger (a push, a pull request or
//! a manual dispatch) into a uniform [`BuildInformation`] record used to name
//! build artefacts and tag images.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! Reading the CI host's environment is the job of infrastructure crates that
//! implement [`TriggerSource`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype values (`BranchName`, `CommitSha`, `RepositoryIdentifier`, etc.) |
//! | [`types`] | Trigger context input, `BuildInformation` output, `SlashPolicy` |
//! | [`resolver`] | `EventResolver` |
//! | [`source`] | `TriggerSource` port trait |
//! | [`errors`] | `ResolveError` |

pub mod errors;
pub mod identifiers;
pub mod resolver;
pub mod source;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::ResolveError;
pub use identifiers::{
    BranchName, BuildName, CommitSha, PullRequestNumber, RepositoryIdentifier, RepositoryName,
    RepositoryOwner,
};
pub use resolver::EventResolver;
pub use source::{resolve_from_source, SourceResolveError, TriggerSource};
pub use types::{
    BuildInformation, EventPayload, PullRequestHead, PullRequestPayload, SlashPolicy,
    TriggerContext, TriggerKind,
};
