pub mod anchors;
pub mod config;
pub mod error;
pub mod links;
pub mod relink;
pub mod report;
pub mod style;
pub mod validate;

pub use config::SiteConfig;
pub use error::{Result, SiteError};

const BANNER: &str = r#"
   ____  _ _       _
  / ___|(_) |_ ___| | _____  ___ _ __   ___ _ __
  \___ \| | __/ _ \ |/ / _ \/ _ \ '_ \ / _ \ '__|
   ___) | | ||  __/   <  __/  __/ |_) |  __/ |
  |____/|_|\__\___|_|\_\___|\___| .__/ \___|_|
                                |_|
"#;

pub fn print_banner() {
    println!("{}", BANNER);
    println!("  static site link & style keeper v{}\n", env!("CARGO_PKG_VERSION"));
}
