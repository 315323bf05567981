use domain_costing::{InMemoryCatalog, ProjectMeta, RawComponent};
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::path::Path;

/// A components file is either a bare array or a project export
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ComponentsFile {
    List(Vec<RawComponent>),
    Project {
        #[serde(default)]
        project: Option<ProjectMeta>,
        components: Vec<RawComponent>,
    },
}

/// Parsed components plus whatever project metadata the file carried
#[derive(Debug)]
pub struct ComponentsInput {
    pub components: Vec<RawComponent>,
    pub project: Option<ProjectMeta>,
}

pub fn parse_components(json: &str) -> Result<ComponentsInput> {
    let file: ComponentsFile =
        serde_json::from_str(json).wrap_err("Components file is not a valid component list")?;

    Ok(match file {
        ComponentsFile::List(components) => ComponentsInput {
            components,
            project: None,
        },
        ComponentsFile::Project {
            project,
            components,
        } => ComponentsInput {
            components,
            project,
        },
    })
}

pub fn read_components(path: &Path) -> Result<ComponentsInput> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read components from {}", path.display()))?;
    parse_components(&json).wrap_err_with(|| format!("In {}", path.display()))
}

pub fn read_catalog(path: &Path) -> Result<InMemoryCatalog> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read catalog from {}", path.display()))?;
    InMemoryCatalog::from_json(&json).wrap_err_with(|| format!("Invalid catalog {}", path.display()))
}
