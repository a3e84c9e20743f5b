use std::fs;
use std::path::{Path, PathBuf};

use fraglog_vcs::PushPlan;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// What to do with a fragment whose header cannot be parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Stop before anything is written.
    #[default]
    Abort,
    /// Leave the fragment on disk, report it, and continue without it.
    Skip,
}

/// Settings for a generation run.
///
/// Loaded from `fraglog.toml`; every key is optional. Command-line flags
/// override file values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FraglogConfig {
    /// Directory holding pending `*.md` fragments.
    pub fragments_dir: PathBuf,
    /// The changelog to merge into.
    pub changelog_path: PathBuf,
    /// Run history file, newest run first.
    pub history_path: PathBuf,
    /// Compute and preview the merge without writing, deleting, or committing.
    pub dry_run: bool,
    /// Commit author email.
    pub author_email: String,
    /// Commit author name.
    pub author_name: String,
    pub commit_message: String,
    /// Branch that receives the commit when the checkout is detached.
    pub target_branch: String,
    pub temp_branch: String,
    /// Push after committing.
    pub push: bool,
    pub on_malformed: MalformedPolicy,
}

impl Default for FraglogConfig {
    fn default() -> Self {
        Self {
            fragments_dir: PathBuf::from(".an_changelog_meta"),
            changelog_path: PathBuf::from("CHANGELOG.md"),
            history_path: PathBuf::from(".an_changelog_meta/CHANGELOG_HISTORY.log"),
            dry_run: false,
            author_email: "devops.pipeline@example.com".into(),
            author_name: "DevOps Pipeline".into(),
            commit_message: ":memo: :loud_sound: auto-update changelog [skip ci]".into(),
            target_branch: "master".into(),
            temp_branch: "temp-changelog".into(),
            push: true,
            on_malformed: MalformedPolicy::Abort,
        }
    }
}

impl FraglogConfig {
    /// Default config file name, looked up in the working directory.
    pub const FILE_NAME: &'static str = "fraglog.toml";

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Load a config file.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> SdkResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Branch plan for publishing the changelog commit.
    pub fn push_plan(&self) -> PushPlan {
        PushPlan {
            target_branch: self.target_branch.clone(),
            temp_branch: self.temp_branch.clone(),
        }
    }

    /// Anchor relative paths at `root`.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        for path in [
            &mut self.fragments_dir,
            &mut self.changelog_path,
            &mut self.history_path,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }
}
