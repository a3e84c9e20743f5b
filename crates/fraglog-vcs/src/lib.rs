//! Version control collaborator for fraglog.
//!
//! After a changelog has been rewritten the orchestrator stages, commits,
//! and pushes the result. This crate hides how that happens behind
//! [`VersionControl`].
//!
//! - [`GitCli`] -- drives the `git` executable
//! - [`RecordingVcs`] -- records calls instead of running them

pub mod error;
pub mod git;
pub mod recording;
pub mod traits;

pub use error::{VcsError, VcsResult};
pub use git::GitCli;
pub use recording::{RecordingVcs, VcsCall};
pub use traits::{PushPlan, VersionControl};
