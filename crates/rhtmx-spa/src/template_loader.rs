// File: src/template_loader.rs
// Purpose: Loads component templates from the components/ directory

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extension recognised as a template
const TEMPLATE_EXTENSION: &str = "html";

/// A loaded template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Source file, if the template came from disk
    pub path: Option<PathBuf>,
    /// Component the template belongs to (dotted for nested folders)
    pub component: String,
    pub content: String,
}

/// Template store keyed by template name
///
/// Layout on disk: every folder under the components directory is a
/// component and every `*.html` file inside it a template named after its
/// file stem. Nested folders are components too (`forms/address` becomes
/// component `forms.address`).
#[derive(Debug, Clone, Default)]
pub struct TemplateLoader {
    components_dir: PathBuf,
    templates: HashMap<String, Template>,
}

impl TemplateLoader {
    pub fn new(components_dir: impl Into<PathBuf>) -> Self {
        Self {
            components_dir: components_dir.into(),
            templates: HashMap::new(),
        }
    }

    pub fn components_dir(&self) -> &Path {
        &self.components_dir
    }

    /// Loads every template below the components directory
    ///
    /// A missing directory is not an error; templates may be registered
    /// programmatically instead.
    pub fn load_all(&mut self) -> Result<usize> {
        let dir = self.components_dir.clone();
        if !dir.exists() {
            debug!(dir = %dir.display(), "components directory missing, nothing to load");
            return Ok(0);
        }

        let before = self.templates.len();
        self.scan_component_dirs(&dir, &dir)?;
        Ok(self.templates.len() - before)
    }

    fn scan_component_dirs(&mut self, root: &Path, dir: &Path) -> Result<()> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read components directory: {:?}", dir))?;

        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                self.load_component_dir(root, &path)?;
                self.scan_component_dirs(root, &path)?;
            }
        }

        Ok(())
    }

    fn load_component_dir(&mut self, root: &Path, dir: &Path) -> Result<()> {
        let component = component_name(root, dir);

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;

            info!(template = %name, component = %component, "loading template");
            self.templates.insert(
                name,
                Template {
                    path: Some(path.clone()),
                    component: component.clone(),
                    content,
                },
            );
        }

        Ok(())
    }

    /// Registers a template without touching the filesystem
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        self.templates.insert(
            name.clone(),
            Template {
                path: None,
                component: name,
                content: content.into(),
            },
        );
    }

    /// Builder-style [`TemplateLoader::insert`]
    pub fn with_template(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

/// `root/forms/address` → `forms.address`
fn component_name(root: &Path, dir: &Path) -> String {
    dir.strip_prefix(root)
        .unwrap_or(dir)
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join(".")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_loads_nothing() {
        let mut loader = TemplateLoader::new("/definitely/not/here/components");
        assert_eq!(loader.load_all().unwrap(), 0);
        assert_eq!(loader.count(), 0);
    }

    #[test]
    fn test_loads_component_folders() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("login")).unwrap();
        fs::create_dir_all(root.join("forms/address")).unwrap();
        fs::write(root.join("login/login.html"), "<form>{username}</form>").unwrap();
        fs::write(root.join("login/login.js"), "ignored").unwrap();
        fs::write(root.join("forms/address/address.html"), "<p>{street}</p>").unwrap();

        let mut loader = TemplateLoader::new(root);
        assert_eq!(loader.load_all().unwrap(), 2);
        assert_eq!(loader.names(), vec!["address", "login"]);

        let login = loader.get("login").unwrap();
        assert_eq!(login.component, "login");
        assert_eq!(login.content, "<form>{username}</form>");
        assert_eq!(loader.get("address").unwrap().component, "forms.address");
    }

    #[test]
    fn test_programmatic_templates() {
        let loader = TemplateLoader::default().with_template("example", "<p>{testkey}</p>");
        assert!(loader.contains("example"));
        assert_eq!(loader.get("example").unwrap().path, None);
    }
}
