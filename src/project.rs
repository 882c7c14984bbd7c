use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{PuliError, Result};

pub const PROJECT_FILE: &str = "puli.toml";

/// Contents of `puli.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProjectFile {
    #[serde(rename = "package", default)]
    pub packages: BTreeMap<String, Package>,
    #[serde(rename = "type", default)]
    pub types: BTreeMap<String, BindingType>,
    #[serde(rename = "binding", default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

/// An installed package.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Package {
    #[serde(rename = "install-path")]
    pub install_path: String,
    pub installer: String,
}

/// A type resources can be bound to.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct BindingType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Binds the resources matched by a query to a type.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Binding {
    pub uuid: Uuid,
    pub query: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Bindings grouped by whether they would be loaded by a build.
#[derive(Debug, Default)]
pub struct BuildReport<'a> {
    pub enabled: Vec<&'a Binding>,
    pub disabled: Vec<&'a Binding>,
    pub type_missing: Vec<&'a Binding>,
}

/// A project directory and its `puli.toml`.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    pub file: ProjectFile,
}

impl Project {
    /// Opens the project at `root`; a missing `puli.toml` yields an empty project.
    pub fn open(root: &Path) -> Result<Self> {
        let path = root.join(PROJECT_FILE);
        let file: ProjectFile = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            ProjectFile::default()
        };
        Ok(Self {
            root: root.to_path_buf(),
            file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(PROJECT_FILE)
    }

    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let content = toml::to_string_pretty(&self.file)?;
        std::fs::write(self.path(), content)?;
        Ok(())
    }

    /// Registers the package found at `path`, named after its directory
    /// unless `name` is given. Returns the package name.
    pub fn install_package(&mut self, path: &Path, name: Option<&str>) -> Result<String> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        if !absolute.is_dir() {
            return Err(PuliError::Message(format!(
                "The path {} is not a directory",
                path.display()
            )));
        }

        let name = match name {
            Some(name) => name.to_string(),
            None => absolute
                .file_name()
                .and_then(std::ffi::OsStr::to_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    PuliError::Message(format!(
                        "Cannot derive a package name from {}",
                        path.display()
                    ))
                })?,
        };
        if self.file.packages.contains_key(&name) {
            return Err(PuliError::Message(format!(
                "A package with the name \"{}\" is already installed",
                name
            )));
        }

        let install_path = absolute
            .strip_prefix(&self.root)
            .unwrap_or(absolute.as_path())
            .to_string_lossy()
            .to_string();
        self.file.packages.insert(
            name.clone(),
            Package {
                install_path,
                installer: "user".to_string(),
            },
        );
        Ok(name)
    }

    pub fn rename_package(&mut self, old: &str, new: &str) -> Result<()> {
        if self.file.packages.contains_key(new) {
            return Err(PuliError::Message(format!(
                "A package with the name \"{}\" is already installed",
                new
            )));
        }
        let package = self.file.packages.remove(old).ok_or_else(|| no_package(old))?;
        self.file.packages.insert(new.to_string(), package);
        Ok(())
    }

    pub fn remove_package(&mut self, name: &str) -> Result<Package> {
        self.file.packages.remove(name).ok_or_else(|| no_package(name))
    }

    /// Drops packages whose install path no longer exists and returns their names.
    pub fn clean_packages(&mut self) -> Vec<String> {
        let root = self.root.clone();
        let missing: Vec<String> = self
            .file
            .packages
            .iter()
            .filter(|(_, package)| !root.join(&package.install_path).exists())
            .map(|(name, _)| name.clone())
            .collect();
        for name in &missing {
            self.file.packages.remove(name);
        }
        missing
    }

    pub fn define_type(&mut self, name: &str, description: Option<String>) -> Result<()> {
        if self.file.types.contains_key(name) {
            return Err(PuliError::Message(format!(
                "The type \"{}\" is already defined",
                name
            )));
        }
        self.file
            .types
            .insert(name.to_string(), BindingType { description });
        Ok(())
    }

    pub fn remove_type(&mut self, name: &str) -> Result<()> {
        self.file
            .types
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| PuliError::Message(format!("The type \"{}\" does not exist", name)))
    }

    /// Adds an enabled binding. The type does not need to be defined yet.
    pub fn add_binding(&mut self, query: &str, type_name: &str) -> Result<Uuid> {
        if !query.starts_with('/') {
            return Err(PuliError::Message(format!(
                "The query \"{}\" must be an absolute resource path",
                query
            )));
        }
        let uuid = Uuid::new_v4();
        self.file.bindings.push(Binding {
            uuid,
            query: query.to_string(),
            type_name: type_name.to_string(),
            enabled: true,
        });
        Ok(uuid)
    }

    /// Finds the single binding whose UUID starts with `prefix`.
    pub fn find_binding(&self, prefix: &str) -> Result<usize> {
        if prefix.is_empty() {
            return Err(PuliError::Message(
                "A binding UUID prefix is required".to_string(),
            ));
        }
        let prefix = prefix.to_ascii_lowercase();
        let matches: Vec<usize> = self
            .file
            .bindings
            .iter()
            .enumerate()
            .filter(|(_, binding)| binding.uuid.to_string().starts_with(&prefix))
            .map(|(idx, _)| idx)
            .collect();
        match matches.as_slice() {
            [idx] => Ok(*idx),
            [] => Err(PuliError::Message(format!(
                "The binding \"{}\" does not exist",
                prefix
            ))),
            _ => Err(PuliError::Message(format!(
                "More than one binding matches the UUID prefix \"{}\"",
                prefix
            ))),
        }
    }

    pub fn remove_binding(&mut self, prefix: &str) -> Result<Binding> {
        let idx = self.find_binding(prefix)?;
        Ok(self.file.bindings.remove(idx))
    }

    pub fn set_binding_enabled(&mut self, prefix: &str, enabled: bool) -> Result<&Binding> {
        let idx = self.find_binding(prefix)?;
        let binding = &mut self.file.bindings[idx];
        binding.enabled = enabled;
        Ok(binding)
    }

    pub fn build_report(&self) -> BuildReport<'_> {
        let mut report = BuildReport::default();
        for binding in &self.file.bindings {
            if !self.file.types.contains_key(&binding.type_name) {
                report.type_missing.push(binding);
            } else if binding.enabled {
                report.enabled.push(binding);
            } else {
                report.disabled.push(binding);
            }
        }
        report
    }
}

fn no_package(name: &str) -> PuliError {
    PuliError::Message(format!("The package \"{}\" is not installed", name))
}
