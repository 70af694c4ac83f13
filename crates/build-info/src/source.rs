//! Port trait for obtaining trigger data from a CI host.
//!
//! This crate never reads the environment or the filesystem. Infrastructure
//! crates implement [`TriggerSource`] for a concrete host and the binary hands
//! the result to [`crate::EventResolver`].

use crate::{BuildInformation, EventResolver, SlashPolicy, TriggerContext};

/// Supplies the repository name and trigger context of the current run.
pub trait TriggerSource {
    /// Error raised when the host data cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the repository in `"owner/name"` form.
    ///
    /// An unset value is returned as an empty string so that the resolver,
    /// not the source, decides that it is invalid.
    fn repository_name(&self) -> Result<String, Self::Error>;

    /// Returns the context of the event that triggered the run.
    fn trigger_context(&self) -> Result<TriggerContext, Self::Error>;
}

/// Errors from [`resolve_from_source`].
#[derive(Debug, thiserror::Error)]
pub enum SourceResolveError<E: std::error::Error + 'static> {
    /// The source could not supply its data.
    #[error(transparent)]
    Source(E),

    /// The supplied data did not resolve to a build identity.
    #[error(transparent)]
    Resolve(#[from] crate::ResolveError),
}

/// Reads a source and resolves its build information in one step.
///
/// # Errors
///
/// Returns [`SourceResolveError::Source`] if the source fails and
/// [`SourceResolveError::Resolve`] if resolution fails.
pub fn resolve_from_source<S: TriggerSource>(
    source: &S,
    slash_policy: SlashPolicy,
) -> Result<BuildInformation, SourceResolveError<S::Error>> {
    let repository = source.repository_name().map_err(SourceResolveError::Source)?;
    let context = source.trigger_context().map_err(SourceResolveError::Source)?;

    let resolver = EventResolver::new(&repository, &context)?.with_slash_policy(slash_policy);
    Ok(resolver.build_information()?)
}
