//! Directory scanning and file checks shared by both subcommands

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regular files directly inside `directory`, sorted by name
pub fn list_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", directory.display()))?;
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Fail unless `directory` exists, is a directory, can be listed and is writable
pub fn ensure_directory(directory: &Path) -> Result<()> {
    let metadata = match fs::metadata(directory) {
        Ok(m) => m,
        Err(_) => bail!("Directory {} does not exist.", directory.display()),
    };
    if !metadata.is_dir() {
        bail!("{} is not a directory.", directory.display());
    }
    if metadata.permissions().readonly() {
        bail!("Directory {} is not writable.", directory.display());
    }
    fs::read_dir(directory)
        .with_context(|| format!("Directory {} cannot be accessed", directory.display()))?;
    Ok(())
}

/// Why a file cannot take part in a rename
pub fn inaccessible_reason(path: &Path) -> Option<String> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => return Some(e.to_string()),
    };
    if metadata.len() == 0 {
        return Some("file is empty".to_string());
    }
    if metadata.permissions().readonly() {
        return Some("file is read-only".to_string());
    }
    File::open(path).err().map(|e| e.to_string())
}

/// File name as UTF-8, or `None` for names that are not valid UTF-8
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Extension including its dot, or an empty string
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

pub fn is_hidden(path: &Path) -> bool {
    file_name(path).is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_files_is_flat_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.png"), "a").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "c").unwrap();

        let files = list_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().filter_map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.png", "b.txt"]);
    }

    #[test]
    fn test_ensure_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_directory(dir.path()).is_ok());
        assert!(ensure_directory(&dir.path().join("missing")).is_err());

        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(ensure_directory(&file).is_err());
    }

    #[test]
    fn test_inaccessible_reason() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.png");
        fs::write(&empty, "").unwrap();
        assert_eq!(inaccessible_reason(&empty).as_deref(), Some("file is empty"));

        let fine = dir.path().join("fine.png");
        fs::write(&fine, "data").unwrap();
        assert_eq!(inaccessible_reason(&fine), None);

        assert!(inaccessible_reason(&dir.path().join("missing.png")).is_some());
    }

    #[test]
    fn test_extensions_and_hidden() {
        assert_eq!(dotted_extension(Path::new("meme.JPG")), ".JPG");
        assert_eq!(dotted_extension(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(dotted_extension(Path::new("README")), "");
        assert_eq!(dotted_extension(Path::new(".bashrc")), "");
        assert!(is_hidden(Path::new("/tmp/.DS_Store")));
        assert!(!is_hidden(Path::new("/tmp/visible.txt")));
    }
}
