//! The changelog generation pipeline.
//!
//! A run reads every pending fragment, aggregates the entries, merges them
//! into the latest release section of the changelog, and publishes the
//! result. The new document is computed completely before anything is
//! written, so a failure up to the merge leaves every file as it was.

use std::path::Path;
use std::sync::Arc;

use fraglog_merge::{extract_latest_section, merge_into_document, preview};
use fraglog_parse::{aggregate, parse_named, split_by_category};
use fraglog_store::{
    DirFragmentStore, DocumentStore, FileDocumentStore, FragmentStore, HistoryLog,
};
use fraglog_types::{fragment_template, Category, Fragment, FRAGMENT_GRANULARITY};
use fraglog_vcs::{GitCli, VersionControl};
use tracing::{info, instrument, warn};

use crate::config::{FraglogConfig, MalformedPolicy};
use crate::error::{SdkError, SdkResult};
use crate::report::{CheckReport, GenerateReport, GenerateStatus, PendingFragment, SkippedFragment};

/// Runs the pipeline against a fragment store, a changelog, and a VCS.
pub struct Generator {
    config: FraglogConfig,
    fragments: Arc<dyn FragmentStore>,
    document: Arc<dyn DocumentStore>,
    vcs: Arc<dyn VersionControl>,
}

impl Generator {
    pub fn new(
        config: FraglogConfig,
        fragments: Arc<dyn FragmentStore>,
        document: Arc<dyn DocumentStore>,
        vcs: Arc<dyn VersionControl>,
    ) -> Self {
        Self {
            config,
            fragments,
            document,
            vcs,
        }
    }

    /// Generator over the working tree at `workdir`, using `git`.
    ///
    /// Relative paths in `config` are resolved against `workdir`.
    pub fn open(config: FraglogConfig, workdir: &Path) -> SdkResult<Self> {
        let config = config.rooted_at(workdir);
        let fragments = DirFragmentStore::open(&config.fragments_dir)?;
        let document = FileDocumentStore::new(&config.changelog_path);
        Ok(Self::new(
            config,
            Arc::new(fragments),
            Arc::new(document),
            Arc::new(GitCli::new(workdir)),
        ))
    }

    /// Like [`Generator::open`], but never creates the fragment directory.
    ///
    /// For `list` and `check`, which only read.
    pub fn open_read_only(config: FraglogConfig, workdir: &Path) -> Self {
        let config = config.rooted_at(workdir);
        let fragments = DirFragmentStore::existing(&config.fragments_dir);
        let document = FileDocumentStore::new(&config.changelog_path);
        Self::new(
            config,
            Arc::new(fragments),
            Arc::new(document),
            Arc::new(GitCli::new(workdir)),
        )
    }

    pub fn config(&self) -> &FraglogConfig {
        &self.config
    }

    pub fn fragments(&self) -> &dyn FragmentStore {
        self.fragments.as_ref()
    }

    /// Run the pipeline with a history log stamped now.
    pub fn run(&self) -> SdkResult<GenerateReport> {
        self.run_with(HistoryLog::new())
    }

    /// Run the pipeline, recording into `history`.
    #[instrument(skip_all, fields(dry_run = self.config.dry_run))]
    pub fn run_with(&self, mut history: HistoryLog) -> SdkResult<GenerateReport> {
        let mut report = GenerateReport::new(GenerateStatus::NoChanges);

        history.record("Initialize git");
        if !self.config.dry_run {
            let output = self
                .vcs
                .configure_identity(&self.config.author_email, &self.config.author_name)?;
            record_output(&mut history, &output);
            report.vcs_output.extend(output);
        }

        history.record("Start generating changelog");
        let fragments = self.load_fragments(&mut history, &mut report)?;
        let aggregated = aggregate(&fragments);
        for category in Category::ALL {
            history.record(format!(
                "Added {} entries to '{category}' section",
                aggregated.len(category)
            ));
        }
        report.count_entries(&aggregated);

        if aggregated.is_empty() {
            history.record("No changes found. Exit");
            report.history = history.lines().to_vec();
            return Ok(report);
        }

        let current = self.document.read()?;
        let outcome = merge_into_document(&current, &aggregated)?;
        report.version = Some(outcome.version.clone());

        if self.config.dry_run {
            info!(version = %outcome.version, "dry run, changelog left untouched");
            report.status = GenerateStatus::DryRun;
            report.preview = Some(preview(&current, &outcome.document));
            report.history = history.lines().to_vec();
            return Ok(report);
        }

        self.document.write(&outcome.document)?;
        history.record(format!(
            "Wrote new changelog to '{}'",
            self.config.changelog_path.display()
        ));
        for fragment in &fragments {
            self.fragments.remove(&fragment.id)?;
        }
        history.record(format!(
            "Cleaned '{}' folder",
            self.config.fragments_dir.display()
        ));
        report.status = GenerateStatus::Written;
        report.history = history.lines().to_vec();
        history.flush(&self.config.history_path)?;

        self.publish(&mut report)?;
        Ok(report)
    }

    /// Parse every pending fragment, honoring the malformed-fragment policy.
    fn load_fragments(
        &self,
        history: &mut HistoryLog,
        report: &mut GenerateReport,
    ) -> SdkResult<Vec<Fragment>> {
        let mut fragments = Vec::new();
        for raw in self.fragments.list()? {
            let fragment = match parse_named(raw.id.clone(), &raw.contents) {
                Ok(fragment) => fragment,
                Err(source) => match self.config.on_malformed {
                    MalformedPolicy::Abort => {
                        return Err(SdkError::Fragment { id: raw.id, source });
                    }
                    MalformedPolicy::Skip => {
                        warn!(id = %raw.id, error = %source, "skipping malformed fragment");
                        report.skipped.push(SkippedFragment {
                            id: raw.id,
                            reason: source.to_string(),
                        });
                        continue;
                    }
                },
            };

            history.record(format!("Add {} to changelog", fragment.id));
            for (key, value) in &fragment.metadata {
                history.record(format!("\t{key}: {value}"));
            }
            if fragment.has_placeholder_author() {
                warn!(id = %fragment.id, "fragment author is still the template placeholder");
            }
            report.fragments.push(fragment.id.clone());
            fragments.push(fragment);
        }
        Ok(fragments)
    }

    /// Stage, commit and push the changelog update.
    fn publish(&self, report: &mut GenerateReport) -> SdkResult<()> {
        info!("adding changes to git");
        report.vcs_output.push(self.vcs.stage_all()?);
        report
            .vcs_output
            .push(self.vcs.commit(&self.config.commit_message)?);

        if self.config.push {
            report
                .vcs_output
                .extend(self.vcs.push(&self.config.push_plan())?);
            report.pushed = true;
        }
        report.vcs_output.retain(|out| !out.trim().is_empty());
        Ok(())
    }

    /// Validate fragments and the changelog without changing anything.
    pub fn check(&self) -> SdkResult<CheckReport> {
        let fragments = pending(self.fragments.as_ref())?;
        let mut problems = Vec::new();
        for fragment in &fragments {
            if let Some(error) = &fragment.error {
                problems.push(format!("{}: {error}", fragment.id));
            } else if fragment.author.as_deref() == Some(fraglog_types::AUTHOR_PLACEHOLDER) {
                problems.push(format!("{}: author is still the template placeholder", fragment.id));
            }
        }

        let version = match self.document.read() {
            Ok(document) => match extract_latest_section(&document) {
                Ok(section) => Some(section.version),
                Err(e) => {
                    problems.push(format!(
                        "{}: {e}",
                        self.config.changelog_path.display()
                    ));
                    None
                }
            },
            Err(fraglog_store::StoreError::NotFound(path)) => {
                problems.push(format!("{}: not found", path.display()));
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(CheckReport {
            fragments,
            version,
            problems,
        })
    }
}

fn record_output(history: &mut HistoryLog, output: &[String]) {
    for out in output {
        let out = out.trim();
        if !out.is_empty() {
            history.record(out);
        }
    }
}

/// Create a fragment from the template and return its identifier.
pub fn new_fragment(store: &dyn FragmentStore, author: Option<&str>) -> SdkResult<String> {
    let id = store.create(&fragment_template(author))?;
    info!(%id, "created fragment");
    Ok(id)
}

/// Every pending fragment with its author and per-category bullet counts.
///
/// Malformed fragments are included with their parse error.
pub fn pending(store: &dyn FragmentStore) -> SdkResult<Vec<PendingFragment>> {
    let mut out = Vec::new();
    for raw in store.list()? {
        match parse_named(raw.id.clone(), &raw.contents) {
            Ok(fragment) => {
                let content = split_by_category(&fragment.body, FRAGMENT_GRANULARITY);
                let author = fragment.author().map(str::to_string);
                out.push(PendingFragment::parsed(fragment.id, author, &content));
            }
            Err(e) => out.push(PendingFragment::malformed(raw.id, e.to_string())),
        }
    }
    Ok(out)
}
