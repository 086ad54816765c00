use commands::command_argument_builder;
use sitekeeper::handlers::{
    handle_fix_anchors, handle_fix_index_links, handle_init, handle_relink, handle_validate,
    report_format,
};
use sitekeeper::init_cli_logger;
use sitekeeper_core::print_banner;
use sitekeeper_core::report::ReportFormat;

mod commands;

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    init_cli_logger(verbose);

    // Keep stdout clean for `validate -f json`
    let json_output = matches!(
        chosen_command.subcommand(),
        Some(("validate", sub)) if report_format(sub) == ReportFormat::Json
    );

    // Show banner unless --quiet flag is set
    if !quiet && !json_output {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("validate", primary_command)) => handle_validate(primary_command, quiet, verbose),
        Some(("relink", primary_command)) => handle_relink(primary_command),
        Some(("fix-index-links", primary_command)) => handle_fix_index_links(primary_command),
        Some(("fix-anchors", primary_command)) => handle_fix_anchors(primary_command),
        Some(("init", primary_command)) => handle_init(primary_command),
        // No subcommand provided, just show the banner
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
