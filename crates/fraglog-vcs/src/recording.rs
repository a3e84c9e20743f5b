use std::sync::Mutex;

use crate::error::{VcsError, VcsResult};
use crate::traits::{check_identity, check_message, PushPlan, VersionControl};

/// One recorded [`VersionControl`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VcsCall {
    ConfigureIdentity { email: String, name: String },
    StageAll,
    Commit(String),
    Push(PushPlan),
}

/// [`VersionControl`] that records calls instead of running anything.
///
/// Used by tests and by embedders that publish the changelog themselves.
#[derive(Debug, Default)]
pub struct RecordingVcs {
    calls: Mutex<Vec<VcsCall>>,
    detached: bool,
    fail_push: bool,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a detached HEAD from [`VersionControl::is_detached`].
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Make [`VersionControl::push`] fail, as a rejected push would.
    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// Calls so far, in order.
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn record(&self, call: VcsCall) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

impl VersionControl for RecordingVcs {
    fn configure_identity(&self, email: &str, name: &str) -> VcsResult<Vec<String>> {
        check_identity(email, name)?;
        self.record(VcsCall::ConfigureIdentity {
            email: email.into(),
            name: name.into(),
        });
        Ok(Vec::new())
    }

    fn stage_all(&self) -> VcsResult<String> {
        self.record(VcsCall::StageAll);
        Ok(String::new())
    }

    fn commit(&self, message: &str) -> VcsResult<String> {
        check_message(message)?;
        self.record(VcsCall::Commit(message.into()));
        Ok(format!("[recorded] {message}\n"))
    }

    fn is_detached(&self) -> VcsResult<bool> {
        Ok(self.detached)
    }

    fn push(&self, plan: &PushPlan) -> VcsResult<Vec<String>> {
        if self.fail_push {
            return Err(VcsError::CommandFailed {
                command: "push".into(),
                status: "exit status: 1".into(),
                stderr: "rejected".into(),
            });
        }
        self.record(VcsCall::Push(plan.clone()));
        Ok(Vec::new())
    }
}
