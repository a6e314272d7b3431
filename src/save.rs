use std::fs;
use std::io;
use std::path::Path;

use crate::target::Target;

/// What the save dialog shows for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSpec {
    pub title: &'static str,
    pub default_name: &'static str,
    pub filter: &'static str,
    pub empty_warning: &'static str,
}

impl SaveSpec {
    pub fn for_target(target: Target) -> Self {
        match target {
            Target::Code => SaveSpec {
                title: "Save Python File",
                default_name: "main.py",
                filter: "Python Files (*.py)",
                empty_warning: "⚠️ No code to save",
            },
            Target::Documentation => SaveSpec {
                title: "Save Markdown File",
                default_name: "README.md",
                filter: "Markdown Files (*.md)",
                empty_warning: "⚠️ No markdown to save",
            },
        }
    }

    pub fn success_message(&self, target: Target, path: &Path) -> String {
        match target {
            Target::Code => format!("💾 Code saved to {}", path.display()),
            Target::Documentation => format!("📄 Markdown saved to {}", path.display()),
        }
    }
}

/// Write pane content verbatim as UTF-8, replacing any existing file.
pub fn write_pane(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn documentation_defaults_to_readme() {
        let spec = SaveSpec::for_target(Target::Documentation);
        assert_eq!(spec.default_name, "README.md");
        assert!(spec.filter.contains("*.md"));
    }

    #[test]
    fn code_filter_is_python() {
        assert!(SaveSpec::for_target(Target::Code).filter.contains("*.py"));
    }

    #[test]
    fn write_is_byte_exact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.py");
        let content = "# -*- coding: utf-8 -*-\nprint('héllo ✨')\r\n\n";
        write_pane(&path, content).unwrap();
        assert_eq!(fs::read(&path).unwrap(), content.as_bytes());
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "old content that is longer").unwrap();
        write_pane(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.md");
        assert!(write_pane(&path, "x").is_err());
    }
}
