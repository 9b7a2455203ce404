//! Source collection backend
//!
//! Resolves a user path into source files: a single file is taken as-is, a
//! directory is walked with the ignore crate keeping only recognized languages.

use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::core::file_reader::{read_file_with_config, FileReadConfig, FileWarning};
use crate::core::paths::display_name;
use crate::lang::{Language, LanguageOverride};

/// How to discover and read sources
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Include hidden files and directories
    pub hidden: bool,
    /// Ignore .gitignore and friends
    pub no_ignore: bool,
    pub language: LanguageOverride,
    pub read: FileReadConfig,
}

/// One readable source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Display name relative to the scan root
    pub name: String,
    pub language: Language,
    pub content: String,
    pub size: u64,
    pub truncated: bool,
}

/// Files collected from a path, plus a warning for each file skipped
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub files: Vec<SourceFile>,
    pub skipped: Vec<FileWarning>,
}

impl Scan {
    fn read(&mut self, path: &Path, root: &Path, language: Language, options: &ScanOptions) {
        let result = read_file_with_config(path, &options.read);
        for warning in &result.warnings {
            tracing::warn!(code = warning.code.as_str(), path = %path.display(), "{}", warning.message);
        }

        let name = display_name(path, root);
        match result.content {
            Some(content) => self.files.push(SourceFile {
                path: path.to_path_buf(),
                name,
                language,
                content,
                size: result.size,
                truncated: result.truncated,
            }),
            None => self.skipped.extend(result.warnings.into_iter().map(|mut w| {
                w.path = Some(name.clone());
                w
            })),
        }
    }
}

/// Collect sources under `path`, sorted by display name
pub fn collect_sources(path: &Path, options: &ScanOptions) -> Result<Scan> {
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }

    let mut scan = Scan::default();

    if path.is_file() {
        let language = options.language.resolve(path);
        let root = path.parent().unwrap_or(path);
        scan.read(path, root, language, options);
        return Ok(scan);
    }

    let mut builder = WalkBuilder::new(path);
    builder
        .hidden(!options.hidden)
        .ignore(!options.no_ignore)
        .git_ignore(!options.no_ignore)
        .git_global(!options.no_ignore)
        .git_exclude(!options.no_ignore)
        .require_git(false);

    for entry in builder.build() {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let file = entry.path();
        if !Language::from_path(file).is_recognized() {
            continue;
        }
        scan.read(file, path, options.language.resolve(file), options);
    }

    scan.files.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(
        root = %path.display(),
        files = scan.files.len(),
        skipped = scan.skipped.len(),
        "collected sources"
    );
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collect_empty_dir() {
        let temp = tempdir().unwrap();
        let scan = collect_sources(temp.path(), &ScanOptions::default()).unwrap();
        assert!(scan.files.is_empty());
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn test_collect_keeps_recognized_languages() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("A.cs"), "class A { }").unwrap();
        fs::write(temp.path().join("README.md"), "# readme").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/B.vb"), "Class B\nEnd Class").unwrap();

        let scan = collect_sources(temp.path(), &ScanOptions::default()).unwrap();
        let names: Vec<&str> = scan.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A.cs", "sub/B.vb"]);
        assert_eq!(scan.files[1].language, Language::VisualBasic);
    }

    #[test]
    fn test_collect_single_file_any_extension() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("notes.txt");
        fs::write(&file, "hello").unwrap();

        let scan = collect_sources(&file, &ScanOptions::default()).unwrap();
        assert_eq!(scan.files.len(), 1);
        assert_eq!(scan.files[0].name, "notes.txt");
        assert_eq!(scan.files[0].language, Language::Unrecognized);
    }

    #[test]
    fn test_collect_language_override() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("Script.txt");
        fs::write(&file, "Sub Main()\nEnd Sub").unwrap();

        let options = ScanOptions {
            language: LanguageOverride::Force(Language::VisualBasic),
            ..Default::default()
        };
        let scan = collect_sources(&file, &options).unwrap();
        assert_eq!(scan.files[0].language, Language::VisualBasic);
    }

    #[test]
    fn test_collect_respects_gitignore() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gitignore"), "obj/\n").unwrap();
        fs::create_dir(temp.path().join("obj")).unwrap();
        fs::write(temp.path().join("obj/Gen.cs"), "class G { }").unwrap();
        fs::write(temp.path().join("A.cs"), "class A { }").unwrap();

        let scan = collect_sources(temp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(scan.files.len(), 1);

        let options = ScanOptions {
            no_ignore: true,
            ..Default::default()
        };
        let scan = collect_sources(temp.path(), &options).unwrap();
        assert_eq!(scan.files.len(), 2);
    }

    #[test]
    fn test_collect_hidden() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join(".hidden")).unwrap();
        fs::write(temp.path().join(".hidden/H.cs"), "class H { }").unwrap();

        let scan = collect_sources(temp.path(), &ScanOptions::default()).unwrap();
        assert!(scan.files.is_empty());

        let options = ScanOptions {
            hidden: true,
            ..Default::default()
        };
        let scan = collect_sources(temp.path(), &options).unwrap();
        assert_eq!(scan.files.len(), 1);
    }

    #[test]
    fn test_collect_binary_is_skipped() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("Blob.cs"), [0u8, 1, 2]).unwrap();

        let scan = collect_sources(temp.path(), &ScanOptions::default()).unwrap();
        assert!(scan.files.is_empty());
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].path.as_deref(), Some("Blob.cs"));
    }

    #[test]
    fn test_collect_missing_path() {
        let result = collect_sources(Path::new("/nonexistent/dir"), &ScanOptions::default());
        assert!(result.is_err());
    }
}
