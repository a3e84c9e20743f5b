use crate::error::{VcsError, VcsResult};

/// Branches involved in publishing the changelog commit.
///
/// A detached checkout (typical on CI) cannot push directly: the commit is
/// parked on `temp_branch`, merged into `target_branch`, and that is pushed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushPlan {
    pub target_branch: String,
    pub temp_branch: String,
}

impl Default for PushPlan {
    fn default() -> Self {
        Self {
            target_branch: "master".into(),
            temp_branch: "temp-changelog".into(),
        }
    }
}

/// Operations the orchestrator needs from version control.
///
/// Methods return the tool's standard output so callers can log it.
pub trait VersionControl: Send + Sync {
    /// Set the author identity used for the changelog commit.
    fn configure_identity(&self, email: &str, name: &str) -> VcsResult<Vec<String>>;

    /// Stage every change in the working tree.
    fn stage_all(&self) -> VcsResult<String>;

    /// Commit staged changes with `message`.
    fn commit(&self, message: &str) -> VcsResult<String>;

    /// Whether the working tree is on a detached HEAD.
    fn is_detached(&self) -> VcsResult<bool>;

    /// Publish the current commit according to `plan`.
    fn push(&self, plan: &PushPlan) -> VcsResult<Vec<String>>;
}

/// Reject empty identity fields before touching version control.
pub(crate) fn check_identity(email: &str, name: &str) -> VcsResult<()> {
    if email.trim().is_empty() {
        return Err(VcsError::MissingIdentity("email"));
    }
    if name.trim().is_empty() {
        return Err(VcsError::MissingIdentity("name"));
    }
    Ok(())
}

pub(crate) fn check_message(message: &str) -> VcsResult<()> {
    if message.trim().is_empty() {
        return Err(VcsError::EmptyMessage);
    }
    Ok(())
}
