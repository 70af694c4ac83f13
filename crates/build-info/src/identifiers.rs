//! Newtype identifiers for the values that make up a build identity.
//!
//! Every value that appears in [`crate::BuildInformation`] is a distinct newtype
//! so that, for example, a [`BranchName`] is never passed where a [`BuildName`]
//! is expected even though both wrap a `String`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ResolveError;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, verbatim(), as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Wraps a value exactly as given. Unlike `new`, an empty value is kept.
            pub fn verbatim(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// String-backed identifiers
// ---------------------------------------------------------------------------

string_id! {
    /// The account or organisation that owns a repository (`"octo-org"`).
    RepositoryOwner
}

string_id! {
    /// The repository name below its owner.
    ///
    /// May itself contain `/` (e.g. `"group/project"`); it is kept verbatim.
    RepositoryName
}

string_id! {
    /// The branch or tag being built, or `pr-<number>` for a pull request.
    ///
    /// Slashes are preserved: `"ticket/123-branch-name"`.
    BranchName
}

string_id! {
    /// A [`BranchName`] made safe for use as a file name or image tag.
    BuildName
}

string_id! {
    /// A Git commit SHA (normally a 40-character lowercase hex string).
    ///
    /// The length and alphabet are not validated.
    CommitSha
}

// ---------------------------------------------------------------------------
// Pull request number
// ---------------------------------------------------------------------------

/// The number GitHub assigns to a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Creates a pull request number from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PullRequestNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Repository identifier
// ---------------------------------------------------------------------------

/// A repository in `"owner/name"` form.
///
/// The owner is everything before the first `/` and must not be empty. The
/// name is the remainder, which must not be empty but may contain further
/// slashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryIdentifier {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositoryIdentifier {
    /// Parses an `"owner/name"` string.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidRepositoryFormat`] if the string is
    /// empty, has no `/`, or either side of the first `/` is empty.
    pub fn parse(value: &str) -> Result<Self, ResolveError> {
        let invalid = || ResolveError::InvalidRepositoryFormat {
            value: value.to_string(),
        };

        let (owner, name) = value.split_once('/').ok_or_else(invalid)?;
        let owner = RepositoryOwner::new(owner).ok_or_else(invalid)?;
        let name = RepositoryName::new(name).ok_or_else(invalid)?;

        Ok(Self { owner, name })
    }

    /// Returns the repository owner.
    pub fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Returns the repository name.
    pub fn name(&self) -> &RepositoryName {
        &self.name
    }
}

impl FromStr for RepositoryIdentifier {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
