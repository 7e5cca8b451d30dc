//! Idempotent resource primitives (check + apply pattern).
//!
//! Every file handled by migrate or sync is wrapped in a resource. The
//! caller inspects [`Resource::current_state`] first and only calls
//! [`Resource::apply`] for [`ResourceState::Missing`], so a conflict can
//! never turn into an overwrite.
pub mod relocate;
pub mod symlink;

/// Shared helpers for resource implementations.
pub mod helpers {
    pub mod fs;
}

use anyhow::Result;
use std::path::PathBuf;

pub use relocate::RelocateResource;
pub use symlink::SymlinkResource;

/// State of a resource.
///
/// # Examples
///
/// ```
/// use dotfiles_store::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let clash = ResourceState::Conflict { reason: "source is a symlink".into() };
///
/// assert_ne!(missing, correct);
/// assert!(matches!(clash, ResourceState::Conflict { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// The change has not been made yet and can be applied safely.
    Missing,
    /// The resource already matches the desired state.
    Correct,
    /// Something else occupies the destination; applying would overwrite it.
    Conflict {
        /// Short reason, used in the rendered conflict message.
        reason: String,
    },
    /// There is nothing to do (e.g., the source does not exist).
    Invalid {
        /// Reason why the resource does not apply.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The change was made.
    Applied {
        /// Backup written before the change, if any.
        backup: Option<PathBuf>,
    },
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
}

/// Unified interface for resources that can be checked and applied.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined due to I/O
    /// failures or permission issues.
    fn current_state(&self) -> Result<ResourceState>;

    /// Apply the resource change.
    ///
    /// Callers must only invoke this after [`current_state`](Self::current_state)
    /// returned [`ResourceState::Missing`].
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be made.
    fn apply(&self) -> Result<ResourceChange>;
}
