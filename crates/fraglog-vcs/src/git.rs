use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, instrument};

use crate::error::{VcsError, VcsResult};
use crate::traits::{check_identity, check_message, PushPlan, VersionControl};

/// [`VersionControl`] backed by the `git` executable.
///
/// Commands run in `workdir` with `LC_ALL=C` so their output can be
/// inspected reliably.
#[derive(Clone, Debug)]
pub struct GitCli {
    workdir: PathBuf,
    program: String,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self::with_program(workdir, "git")
    }

    /// Use a different executable, e.g. a wrapper script.
    pub fn with_program(workdir: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            workdir: workdir.into(),
            program: program.into(),
        }
    }

    /// Run one command and return its stdout.
    fn run(&self, args: &[&str]) -> VcsResult<String> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!(%command, "running");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .env("LC_ALL", "C")
            .output()
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Whether `git status` output (in the C locale) describes a detached HEAD.
///
/// Only the first line names the branch state; later lines list paths.
fn reports_detached_head(status: &str) -> bool {
    status
        .lines()
        .next()
        .is_some_and(|line| line.starts_with("HEAD detached"))
}

impl VersionControl for GitCli {
    #[instrument(skip(self))]
    fn configure_identity(&self, email: &str, name: &str) -> VcsResult<Vec<String>> {
        check_identity(email, name)?;
        Ok(vec![
            self.run(&["config", "user.email", email])?,
            self.run(&["config", "user.name", name])?,
        ])
    }

    fn stage_all(&self) -> VcsResult<String> {
        self.run(&["add", "."])
    }

    fn commit(&self, message: &str) -> VcsResult<String> {
        check_message(message)?;
        self.run(&["commit", "-m", message])
    }

    fn is_detached(&self) -> VcsResult<bool> {
        let status = self.run(&["status"])?;
        Ok(reports_detached_head(&status))
    }

    #[instrument(skip(self))]
    fn push(&self, plan: &PushPlan) -> VcsResult<Vec<String>> {
        if !self.is_detached()? {
            return Ok(vec![self.run(&["push"])?]);
        }

        debug!("detached HEAD, publishing through a temporary branch");
        Ok(vec![
            self.run(&["fetch"])?,
            self.run(&["switch", "-c", &plan.temp_branch])?,
            self.run(&["switch", &plan.target_branch])?,
            self.run(&["merge", &plan.temp_branch, "--no-edit"])?,
            self.run(&["push"])?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::with_program(dir.path(), "fraglog-no-such-git-binary");
        let err = git.stage_all().unwrap_err();
        assert!(matches!(err, VcsError::Spawn { .. }));
        assert!(err.to_string().contains("fraglog-no-such-git-binary add ."));
    }

    #[test]
    fn identity_validated_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::with_program(dir.path(), "fraglog-no-such-git-binary");
        assert!(matches!(
            git.configure_identity("", "Name"),
            Err(VcsError::MissingIdentity("email"))
        ));
        assert!(matches!(git.commit("  "), Err(VcsError::EmptyMessage)));
    }

    #[test]
    fn works_against_a_real_repository() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(dir.path());
        git.run(&["init", "-q"]).unwrap();

        git.configure_identity("ci@example.com", "CI Bot").unwrap();
        let email = git.run(&["config", "user.email"]).unwrap();
        assert_eq!(email.trim(), "ci@example.com");

        std::fs::write(dir.path().join("CHANGELOG.md"), "## [1.0.0]\n").unwrap();
        git.stage_all().unwrap();
        assert!(!git.is_detached().unwrap());
    }

    #[test]
    fn detached_state_read_from_first_line() {
        assert!(reports_detached_head("HEAD detached at 1a2b3c4\nnothing to commit\n"));
        assert!(reports_detached_head("HEAD detached from origin/master\n"));
        assert!(!reports_detached_head(
            "On branch feature\nUntracked files:\n\tdetached_notes.md\n"
        ));
        assert!(!reports_detached_head(""));
    }

    #[test]
    fn file_named_detached_does_not_fool_branch_check() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(dir.path());
        git.run(&["init", "-q"]).unwrap();
        git.run(&["checkout", "-q", "-b", "feature"]).unwrap();
        git.configure_identity("ci@example.com", "CI Bot").unwrap();

        std::fs::write(dir.path().join("CHANGELOG.md"), "## [1.0.0]\n").unwrap();
        git.stage_all().unwrap();
        git.run(&["-c", "commit.gpgsign=false", "commit", "-q", "-m", "initial"]).unwrap();

        std::fs::write(dir.path().join("detached_notes.md"), "notes\n").unwrap();
        assert!(!git.is_detached().unwrap());

        git.run(&["checkout", "-q", "--detach"]).unwrap();
        assert!(git.is_detached().unwrap());
    }

    #[test]
    fn failing_command_reports_stderr() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(dir.path());
        git.run(&["init", "-q"]).unwrap();
        let err = git.run(&["switch", "no-such-branch-anywhere"]).unwrap_err();
        assert!(matches!(err, VcsError::CommandFailed { .. }));
    }
}
