use crate::CLAP_STYLING;
use clap::{arg, command};
use std::path::PathBuf;

fn root_arg() -> clap::Arg {
    arg!([ROOT])
        .required(false)
        .help("Site root, the directory holding index.html")
        .default_value(".")
}

fn config_arg() -> clap::Arg {
    arg!(-c --"config" <PATH>)
        .required(false)
        .help("Config file (default: sitekeeper.toml in the site root, else built-in defaults)")
        .value_parser(clap::value_parser!(PathBuf))
}

fn dry_run_arg() -> clap::Arg {
    arg!(--"dry-run")
        .required(false)
        .help("Report what would change without writing any file")
        .action(clap::ArgAction::SetTrue)
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitekeeper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitekeeper")
        .about("Link and style maintenance for static HTML sites")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and progress output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging (RUST_LOG overrides)")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("validate")
                .about(
                    "Check internal links, anchors and style conventions across the site. \
                Exits with status 1 when issues are found.",
                )
                .arg(root_arg())
                .arg(config_arg())
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Console report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the JSON report (default: report_file in the site root)")
                        .value_parser(clap::value_parser!(PathBuf))
                        .conflicts_with("no-report"),
                )
                .arg(
                    arg!(--"no-anchors")
                        .required(false)
                        .help("Only check that link targets exist, not their #fragments")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"no-report")
                        .required(false)
                        .help("Do not write the JSON report file")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("relink")
                .about("Rewrite links to pages that moved into subfolders, using [relink.mappings]")
                .arg(root_arg())
                .arg(config_arg())
                .arg(dry_run_arg()),
        )
        .subcommand(
            command!("fix-index-links")
                .about("Point index.html#anchor links in nested pages back at the root index")
                .arg(root_arg())
                .arg(config_arg())
                .arg(dry_run_arg()),
        )
        .subcommand(
            command!("fix-anchors")
                .about("Insert placeholder sections for anchors the navigation links to")
                .arg(root_arg())
                .arg(config_arg())
                .arg(dry_run_arg()),
        )
        .subcommand(
            command!("init")
                .about("Writes a default sitekeeper.toml into the site root")
                .arg(root_arg())
                .arg(
                    arg!(-f - -"force")
                        .help("Overwrite an existing sitekeeper.toml without asking")
                        .required(false),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        command_argument_builder().debug_assert();
    }

    #[test]
    fn test_validate_defaults() {
        let matches = command_argument_builder()
            .try_get_matches_from(["sitekeeper", "validate"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "validate");
        assert_eq!(sub.get_one::<String>("ROOT").unwrap(), ".");
        assert_eq!(sub.get_one::<String>("format").unwrap(), "text");
        assert!(!sub.get_flag("no-anchors"));
        assert!(sub.get_one::<PathBuf>("config").is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = command_argument_builder()
            .try_get_matches_from(["sitekeeper", "relink", "site", "--dry-run", "-q"])
            .unwrap();

        assert!(matches.get_flag("quiet"));
        let (_, sub) = matches.subcommand().unwrap();
        assert!(sub.get_flag("dry-run"));
        assert_eq!(sub.get_one::<String>("ROOT").unwrap(), "site");
    }

    #[test]
    fn test_output_conflicts_with_no_report() {
        let result = command_argument_builder().try_get_matches_from([
            "sitekeeper",
            "validate",
            "-o",
            "report.json",
            "--no-report",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = command_argument_builder()
            .try_get_matches_from(["sitekeeper", "validate", "-f", "csv"]);
        assert!(result.is_err());
    }
}
