// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;
pub mod logger;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    describe_fix_status, load_site_config, report_output_path, resolve_site_root,
    rewrite_summary_line, write_default_config,
};
pub use logger::init_cli_logger;
