use crate::error::{Result, ScanError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories that never hold published pages
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "evidence",
    "archive",
    "tools",
    "docs",
    ".claude",
    ".clinerules",
];

/// Recursively collect every `.html` file under `root`, sorted by path
pub fn find_html_files<S: AsRef<str>>(root: &Path, skip_dirs: &[S]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    walk(root, skip_dirs, &mut files)?;
    files.sort();

    debug!("Found {} HTML files under {}", files.len(), root.display());
    Ok(files)
}

fn walk<S: AsRef<str>>(dir: &Path, skip_dirs: &[S], files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if skip_dirs.iter().any(|skip| skip.as_ref() == name) {
                debug!("Skipping directory {}", path.display());
                continue;
            }
            walk(&path, skip_dirs, files)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            files.push(path);
        }
    }
    Ok(())
}

/// Number of directories between `root` and `file`; 0 for pages directly in the root
pub fn page_depth(root: &Path, file: &Path) -> usize {
    file.strip_prefix(root)
        .map(|relative| relative.components().count().saturating_sub(1))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<html></html>").unwrap();
    }

    #[test]
    fn test_find_html_files_recurses_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "index.html");
        touch(dir.path(), "articles/b.html");
        touch(dir.path(), "articles/a.html");
        touch(dir.path(), "style.css");

        let files = find_html_files(dir.path(), DEFAULT_SKIP_DIRS).unwrap();

        assert_eq!(
            files,
            vec![
                dir.path().join("articles/a.html"),
                dir.path().join("articles/b.html"),
                dir.path().join("index.html"),
            ]
        );
    }

    #[test]
    fn test_find_html_files_skips_dirs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "index.html");
        touch(dir.path(), "node_modules/pkg/readme.html");
        touch(dir.path(), "archive/old.html");
        touch(dir.path(), "drafts/new.html");

        let files = find_html_files(dir.path(), &["node_modules", "archive", "drafts"]).unwrap();
        assert_eq!(files, vec![dir.path().join("index.html")]);
    }

    #[test]
    fn test_find_html_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let result = find_html_files(&dir.path().join("missing"), DEFAULT_SKIP_DIRS);
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn test_page_depth() {
        let root = Path::new("/site/public");
        assert_eq!(page_depth(root, Path::new("/site/public/index.html")), 0);
        assert_eq!(page_depth(root, Path::new("/site/public/legal/terms.html")), 1);
        assert_eq!(page_depth(root, Path::new("/site/public/a/b/c.html")), 2);
        assert_eq!(page_depth(root, Path::new("/elsewhere/x.html")), 0);
    }
}
