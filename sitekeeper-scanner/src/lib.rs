pub mod discover;
pub mod error;
pub mod extract;
pub mod result;

pub use discover::{DEFAULT_SKIP_DIRS, find_html_files, page_depth};
pub use error::ScanError;
pub use extract::{classify_href, collect_ids, scan_file, scan_html};
pub use result::{LinkKind, LinkRecord, PageScan};
