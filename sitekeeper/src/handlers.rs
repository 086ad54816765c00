use clap::ArgMatches;
use colored::Colorize;
use sitekeeper_core::SiteConfig;
use sitekeeper_core::anchors::{FixOutcome, FixStatus, apply_plans};
use sitekeeper_core::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG};
use sitekeeper_core::relink::{FileChange, SiteRewriteSummary, fix_index_links_site, relink_site};
use sitekeeper_core::report::{
    ReportFormat, generate_json_report, generate_text_report, save_report,
};
use sitekeeper_core::validate::{
    ValidateOptions, ValidateProgressCallback, ValidationResults, execute_validation,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

// Helper functions shared by the handlers

/// Expand `~` in a user supplied site root
pub fn resolve_site_root(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Load the config for a site, honouring an explicit `--config` path
pub fn load_site_config(root: &Path, explicit: Option<&PathBuf>) -> Result<SiteConfig, String> {
    let explicit = explicit.map(|path| resolve_site_root(&path.to_string_lossy()));
    SiteConfig::load_for_root(root, explicit.as_deref()).map_err(|e| e.to_string())
}

/// `--output` when given, otherwise the configured report file inside the site root
pub fn report_output_path(root: &Path, config: &SiteConfig, output: Option<&PathBuf>) -> PathBuf {
    match output {
        Some(path) => path.clone(),
        None => root.join(&config.site.report_file),
    }
}

/// Write the default config into `root`, creating the directory if needed
pub fn write_default_config(root: &Path) -> Result<PathBuf, String> {
    fs::create_dir_all(root)
        .map_err(|e| format!("Failed to create {}: {}", root.display(), e))?;

    let path = root.join(CONFIG_FILE_NAME);
    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    Ok(path)
}

/// One line describing a rewrite run, e.g. "3 replacements made in 2 of 5 files"
pub fn rewrite_summary_line(summary: &SiteRewriteSummary) -> String {
    let verb = if summary.dry_run { "would be made" } else { "made" };
    format!(
        "{} replacements {} in {} of {} files",
        summary.replacements(),
        verb,
        summary.updated(),
        summary.outcomes.len()
    )
}

pub fn describe_fix_status(status: &FixStatus, dry_run: bool) -> String {
    match status {
        FixStatus::Inserted(ids) => {
            let verb = if dry_run { "Would add" } else { "Added" };
            format!("{} {} sections: {}", verb, ids.len(), ids.join(", "))
        }
        FixStatus::AlreadyPresent => "All anchors already present".to_string(),
        FixStatus::NoContainer => "No <main> or <article> to insert into".to_string(),
        FixStatus::MissingFile => "File not found".to_string(),
        FixStatus::Failed(e) => format!("Error: {}", e),
    }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_header(title: &str) {
    print_divider();
    println!("{}", format!("  {}", title).bright_white().bold());
    print_divider();
    println!();
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    let mut response = String::new();
    if io::stdout().flush().is_err() || io::stdin().read_line(&mut response).is_err() {
        return String::new();
    }
    response.trim().to_lowercase()
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "✗".red().bold(), msg);
    std::process::exit(1);
}

fn site_and_config(args: &ArgMatches) -> (PathBuf, SiteConfig) {
    let raw_root = args
        .get_one::<String>("ROOT")
        .map(String::as_str)
        .unwrap_or(".");
    let root = resolve_site_root(raw_root);
    debug!("Site root: {}", root.display());
    let config = load_site_config(&root, args.get_one::<PathBuf>("config"))
        .unwrap_or_else(|e| fail(e));
    (root, config)
}

/// `--format` for a validate run, text when absent
pub fn report_format(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text)
}

pub fn handle_validate(args: &ArgMatches, quiet: bool, verbose: bool) {
    let (root, config) = site_and_config(args);
    let format = report_format(args);
    let no_report = args.get_flag("no-report");
    // JSON on stdout must stay parseable; everything else goes to stderr
    let json_output = format == ReportFormat::Json;

    let mut options = ValidateOptions::from_config(&root, &config);
    if args.get_flag("no-anchors") {
        options.check_anchors = false;
    }
    // Spinner for normal runs; plain progress lines when debug logs are interleaved
    options.show_progress_bars = !quiet && !verbose && !json_output;

    let progress_callback: Option<ValidateProgressCallback> = match (verbose, json_output) {
        (false, _) => None,
        (true, false) => Some(Arc::new(|msg: String| {
            println!("{}", msg.dimmed());
        })),
        (true, true) => Some(Arc::new(|msg: String| {
            eprintln!("{}", msg.dimmed());
        })),
    };

    if !quiet && !json_output {
        print_header("SITE VALIDATION");
        println!(
            "{} Site root: {}",
            "→".blue(),
            root.display().to_string().bright_white()
        );
        println!();
    }

    let results = match execute_validation(options, progress_callback) {
        Ok(results) => results,
        Err(e) => fail(format!("Validation failed: {}", e)),
    };

    let json = generate_json_report(&results).unwrap_or_else(|e| fail(e));
    match format {
        ReportFormat::Text => print!("{}", generate_text_report(&results)),
        ReportFormat::Json => println!("{}", json),
    }

    if !no_report {
        let output = report_output_path(&root, &config, args.get_one::<PathBuf>("output"));
        match save_report(&json, &output) {
            Ok(()) => {
                if !quiet {
                    let notice = format!(
                        "\n{} Report saved to: {}",
                        "✓".green().bold(),
                        output.display().to_string().bright_white()
                    );
                    if json_output {
                        eprintln!("{}", notice);
                    } else {
                        println!("{}", notice);
                    }
                }
            }
            Err(e) => fail(format!("Failed to save report to {}: {}", output.display(), e)),
        }
    }

    if !results.passed() {
        print_issue_counts(&results);
        std::process::exit(1);
    }
}

fn print_issue_counts(results: &ValidationResults) {
    eprintln!(
        "{} {} broken links, {} pages with style issues, {} pages not checked",
        "✗".red().bold(),
        results.broken_links.len().to_string().red(),
        results.style_issue_count().to_string().yellow(),
        (results.missing_files.len() + results.unreadable_files.len())
            .to_string()
            .yellow()
    );
}

fn print_rewrite_summary(summary: &SiteRewriteSummary) {
    for outcome in &summary.outcomes {
        match &outcome.change {
            FileChange::Updated { replacements } => println!(
                "  {} {} ({} replacements)",
                "✓".green().bold(),
                outcome.file.bright_white(),
                replacements.to_string().cyan()
            ),
            FileChange::Failed(e) => println!(
                "  {} {}: {}",
                "✗".red().bold(),
                outcome.file.bright_white(),
                e.red()
            ),
            FileChange::Unchanged => {}
        }
    }

    println!();
    print_divider();
    println!("{}", rewrite_summary_line(summary).bright_white().bold());
    if summary.dry_run {
        println!("{} Dry run, no files were written", "ℹ".blue());
    }
    if summary.failed() > 0 {
        println!(
            "{} {} files could not be processed",
            "⚠".yellow().bold(),
            summary.failed()
        );
    }
    print_divider();
}

pub fn handle_relink(args: &ArgMatches) {
    let (root, config) = site_and_config(args);
    let dry_run = args.get_flag("dry-run");
    let mappings = &config.relink.mappings;

    print_header("RELINK MOVED PAGES");
    if mappings.is_empty() {
        println!(
            "{} No [relink.mappings] configured, nothing to do",
            "⚠".yellow().bold()
        );
        return;
    }
    println!("{} {} mapped pages", "→".blue(), mappings.len().to_string().cyan());
    println!();

    match relink_site(&root, config.site.skip_dirs.as_slice(), mappings, dry_run) {
        Ok(summary) => print_rewrite_summary(&summary),
        Err(e) => fail(format!("Relink failed: {}", e)),
    }
}

pub fn handle_fix_index_links(args: &ArgMatches) {
    let (root, config) = site_and_config(args);
    let dry_run = args.get_flag("dry-run");

    print_header("FIX INDEX ANCHOR LINKS");
    match fix_index_links_site(&root, config.site.skip_dirs.as_slice(), dry_run) {
        Ok(summary) => print_rewrite_summary(&summary),
        Err(e) => fail(format!("Fixing index links failed: {}", e)),
    }
}

pub fn handle_fix_anchors(args: &ArgMatches) {
    let (root, config) = site_and_config(args);
    let dry_run = args.get_flag("dry-run");

    print_header("ANCHOR SECTIONS");
    if config.anchors.is_empty() {
        println!("{} No [[anchors]] configured, nothing to do", "⚠".yellow().bold());
        return;
    }

    let outcomes = match apply_plans(&root, &config.anchors, dry_run) {
        Ok(outcomes) => outcomes,
        Err(e) => fail(format!("Anchor fix failed: {}", e)),
    };

    for FixOutcome { file, status } in &outcomes {
        let symbol = match status {
            FixStatus::Inserted(_) => "✓".green().bold(),
            FixStatus::AlreadyPresent => "•".blue(),
            FixStatus::NoContainer | FixStatus::MissingFile => "⚠".yellow().bold(),
            FixStatus::Failed(_) => "✗".red().bold(),
        };
        println!(
            "  {} {}: {}",
            symbol,
            file.bright_white(),
            describe_fix_status(status, dry_run)
        );
    }

    let inserted = outcomes
        .iter()
        .filter(|o| matches!(o.status, FixStatus::Inserted(_)))
        .count();
    println!();
    print_divider();
    println!(
        "{}",
        format!("{} of {} pages updated", inserted, outcomes.len())
            .bright_white()
            .bold()
    );
    if dry_run {
        println!("{} Dry run, no files were written", "ℹ".blue());
    }
    print_divider();
}

pub fn handle_init(args: &ArgMatches) {
    print_header("SITEKEEPER INITIALIZATION");

    let raw_root = args
        .get_one::<String>("ROOT")
        .map(String::as_str)
        .unwrap_or(".");
    let root = resolve_site_root(raw_root);
    let force = args.get_flag("force");
    let config_path = root.join(CONFIG_FILE_NAME);

    println!(
        "{} Target: {}",
        "→".blue(),
        config_path.display().to_string().bright_white()
    );
    println!();

    if config_path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("A config file already exists:");
        println!(
            "  {} {}",
            "•".yellow(),
            config_path.display().to_string().bright_white()
        );
        println!();

        let response = print_prompt("Do you want to overwrite it? [y/N]:");
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return;
        }
    }

    match write_default_config(&root) {
        Ok(path) => {
            println!(
                "{} Config written: {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
            println!(
                "{} Edit [relink.mappings] and [[anchors]] to match your site",
                "ℹ".blue()
            );
        }
        Err(e) => fail(e),
    }
}
