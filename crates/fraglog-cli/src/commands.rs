use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use fraglog_sdk::{
    new_fragment, pending, CheckReport, DiffLine, FraglogConfig, GenerateReport, GenerateStatus,
    Generator, MalformedPolicy, PendingFragment,
};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        format,
        config,
        ..
    } = cli;

    let workdir = std::env::current_dir().context("cannot determine working directory")?;
    let config = match config {
        Some(path) => FraglogConfig::load(&path)?,
        None => FraglogConfig::load_or_default(&workdir.join(FraglogConfig::FILE_NAME))?,
    };

    match command {
        Command::New(args) => cmd_new(config, &workdir, args, &format),
        Command::Generate(args) => cmd_generate(config, &workdir, args, &format),
        Command::List(_) => cmd_list(config, &workdir, &format),
        Command::Check(_) => cmd_check(config, &workdir, &format),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_new(
    config: FraglogConfig,
    workdir: &Path,
    args: NewArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let generator = Generator::open(config, workdir)?;
    let id = new_fragment(generator.fragments(), args.author.as_deref())?;
    let path = generator.config().fragments_dir.join(&id);

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "id": id,
            "path": path,
        })),
        OutputFormat::Text => {
            println!("{} Created fragment {}", "✓".green().bold(), path.display().to_string().bold());
            println!("  Fill in the {} section(s) and commit it with your change.", "Added/Changed/Fixed".cyan());
            Ok(())
        }
    }
}

fn apply_overrides(mut config: FraglogConfig, args: &GenerateArgs) -> FraglogConfig {
    if let Some(debug) = args.debug {
        config.dry_run = debug;
    }
    if let Some(user) = &args.user {
        config.author_email = user.clone();
    }
    if let Some(name) = &args.name {
        config.author_name = name.clone();
    }
    if args.no_push {
        config.push = false;
    }
    if args.skip_malformed {
        config.on_malformed = MalformedPolicy::Skip;
    }
    config
}

fn cmd_generate(
    config: FraglogConfig,
    workdir: &Path,
    args: GenerateArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    let report = Generator::open(config, workdir)?.run()?;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print_generate(&report);
            Ok(())
        }
    }
}

fn print_generate(report: &GenerateReport) {
    for skipped in &report.skipped {
        println!("{} skipped {}: {}", "!".yellow().bold(), skipped.id.yellow(), skipped.reason);
    }

    let version = report.version.as_deref().unwrap_or("?");
    match report.status {
        GenerateStatus::NoChanges => {
            println!("No changes found in {} fragment(s).", report.fragments.len());
        }
        GenerateStatus::DryRun => {
            println!(
                "{} {} entries would be added to [{}]",
                "Dry run:".cyan().bold(),
                report.total_entries(),
                version.yellow()
            );
            if let Some(preview) = &report.preview {
                print_preview(preview);
            }
        }
        GenerateStatus::Written => {
            println!(
                "{} Added {} entries to [{}] from {} fragment(s)",
                "✓".green().bold(),
                report.total_entries(),
                version.yellow().bold(),
                report.fragments.len()
            );
            for (label, count) in &report.entries {
                println!("  {label}: {count}");
            }
            if report.pushed {
                println!("  {}", "pushed".green());
            }
        }
    }
}

fn print_preview(preview: &fraglog_sdk::ChangePreview) {
    for hunk in &preview.hunks {
        println!(
            "{}",
            format!(
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            )
            .cyan()
        );
        for line in &hunk.lines {
            match line {
                DiffLine::Context(t) => println!(" {t}"),
                DiffLine::Added(t) => println!("{}", format!("+{t}").green()),
                DiffLine::Removed(t) => println!("{}", format!("-{t}").red()),
            }
        }
    }
}

fn cmd_list(config: FraglogConfig, workdir: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    let generator = Generator::open_read_only(config, workdir);
    let fragments = pending(generator.fragments())?;

    match format {
        OutputFormat::Json => print_json(&fragments),
        OutputFormat::Text => {
            if fragments.is_empty() {
                println!("No pending fragments.");
            }
            for fragment in &fragments {
                print_fragment(fragment);
            }
            Ok(())
        }
    }
}

fn print_fragment(fragment: &PendingFragment) {
    if let Some(error) = &fragment.error {
        println!("{}  {}", fragment.id.yellow(), error.red());
        return;
    }
    let author = fragment.author.as_deref().unwrap_or("(no author)");
    println!("{}  {}  {}", fragment.id.yellow(), author.bold(), fragment_summary(fragment));
}

fn fragment_summary(fragment: &PendingFragment) -> String {
    if fragment.is_empty() {
        return "empty".dimmed().to_string();
    }
    fragment
        .entries
        .iter()
        .filter(|(_, n)| **n > 0)
        .map(|(label, n)| format!("{label} {n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_check(config: FraglogConfig, workdir: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    let generator = Generator::open_read_only(config, workdir);
    let report = generator.check()?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_check(&report),
    }

    if !report.is_ok() {
        bail!("{} problem(s) found", report.problems.len());
    }
    Ok(())
}

fn print_check(report: &CheckReport) {
    match &report.version {
        Some(version) => println!("Latest release section: [{}]", version.yellow()),
        None => println!("Latest release section: {}", "missing".red()),
    }
    println!("{} pending fragment(s)", report.fragments.len());
    for problem in &report.problems {
        println!("  {} {problem}", "✗".red().bold());
    }
    if report.is_ok() {
        println!("{} Ready to generate", "✓".green().bold());
    }
}
