//! Work that has to wait until every fragment has been applied.
//!
//! Fragments register [`DeferredTask`]s on the [`RenderContext`] while they are
//! copied; the tasks run one after another in registration order and fill the
//! [`DataStore`] that the templating pass reads from.
use crate::{
    errors::{FileOperation, IoError, ParseError},
    features::Feature,
    merge::deep_merge,
    utils::PackageManager,
};
use indexmap::IndexMap;
use miette::Diagnostic;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TaskError {
    #[error("I/O error while running a deferred task")]
    #[diagnostic(code(vue_scaffold::tasks::io))]
    Io(#[from] IoError),

    #[error("Unable to parse template data")]
    #[diagnostic(code(vue_scaffold::tasks::parse))]
    Parse(#[from] ParseError),

    #[error("Unable to convert template data at '{path}'")]
    #[diagnostic(
        code(vue_scaffold::tasks::convert),
        help("Template data files must only contain values representable as JSON")
    )]
    Convert {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Template variables keyed by the final destination path of the file they render.
#[derive(Debug, Default)]
pub struct DataStore {
    entries: IndexMap<PathBuf, Value>,
}
impl DataStore {
    pub fn get(&self, destination: &Path) -> Option<&Value> {
        self.entries.get(destination)
    }

    /// Deep merges `data` onto whatever is already stored for `destination`.
    pub fn merge(&mut self, destination: PathBuf, data: Value) {
        match self.entries.get_mut(&destination) {
            Some(existing) => deep_merge(existing, data),
            None => {
                self.entries.insert(destination, data);
            }
        }
    }
}

/// Facts about the generated project handed to `README.md`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    pub project_name: String,
    pub package_manager: PackageManager,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Command {
    script: String,
    command: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeferredTask {
    /// Merge a `*.data.toml` fragment file into the entry for `destination`.
    LoadData {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Describe the finished project, reading scripts from the merged `manifest`.
    ProjectInfo {
        destination: PathBuf,
        manifest: PathBuf,
        info: ProjectInfo,
    },
}

impl DeferredTask {
    pub fn destination(&self) -> &Path {
        match self {
            Self::LoadData { destination, .. } | Self::ProjectInfo { destination, .. } => {
                destination
            }
        }
    }

    fn run(&self, store: &mut DataStore) -> Result<(), TaskError> {
        match self {
            Self::LoadData {
                source,
                destination,
            } => {
                let content = std::fs::read_to_string(source)
                    .map_err(|error| IoError::new(FileOperation::Read, source.clone(), error))?;

                let table: toml::Table = toml::from_str(&content)
                    .map_err(|error| ParseError::toml(source.clone(), error))?;

                let data = serde_json::to_value(table).map_err(|error| TaskError::Convert {
                    path: source.clone(),
                    source: error,
                })?;

                store.merge(destination.clone(), data);
            }
            Self::ProjectInfo {
                destination,
                manifest,
                info,
            } => {
                let scripts = read_scripts(manifest)?;

                let commands: Vec<Command> = std::iter::once("install".to_string())
                    .chain(scripts)
                    .map(|script| Command {
                        command: info.package_manager.command(&script),
                        script,
                    })
                    .collect();

                let data = serde_json::json!({
                    "project_name": info.project_name,
                    "package_manager": info.package_manager,
                    "features": info.features.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "commands": commands,
                });

                store.merge(destination.clone(), data);
            }
        }

        Ok(())
    }
}

fn read_scripts(manifest: &Path) -> Result<Vec<String>, TaskError> {
    let content = std::fs::read_to_string(manifest)
        .map_err(|error| IoError::new(FileOperation::Read, manifest.to_path_buf(), error))?;

    let parsed: Value = serde_json::from_str(&content)
        .map_err(|error| ParseError::json(manifest.to_path_buf(), error))?;

    Ok(parsed
        .get("scripts")
        .and_then(Value::as_object)
        .map(|scripts| scripts.keys().cloned().collect())
        .unwrap_or_default())
}

/// State shared by every stage of a single scaffolding run.
#[derive(Debug, Default)]
pub struct RenderContext {
    tasks: Vec<DeferredTask>,
    store: DataStore,
}
impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&mut self, task: DeferredTask) {
        log::debug!("defer task for {}", task.destination().display());
        self.tasks.push(task);
    }

    pub fn pending(&self) -> &[DeferredTask] {
        &self.tasks
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Drains the queue, running each task to completion before the next starts.
    pub fn run_deferred(&mut self) -> Result<(), TaskError> {
        log::info!("running {} deferred task(s)", self.tasks.len());

        for task in self.tasks.drain(..) {
            task.run(&mut self.store)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_load_data_tasks_merge_in_registration_order() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.data.toml");
        let jsx = dir.path().join("jsx.data.toml");
        fs::write(&base, "title = \"base\"\n[[plugins]]\nid = \"vue\"\n").unwrap();
        fs::write(&jsx, "title = \"jsx\"\n[[plugins]]\nid = \"vueJsx\"\n").unwrap();

        let destination = dir.path().join("out/vite.config.js");
        let mut ctx = RenderContext::new();
        ctx.defer(DeferredTask::LoadData {
            source: base,
            destination: destination.clone(),
        });
        ctx.defer(DeferredTask::LoadData {
            source: jsx,
            destination: destination.clone(),
        });

        ctx.run_deferred().unwrap();

        assert!(ctx.pending().is_empty());
        assert_eq!(
            ctx.store().get(&destination),
            Some(&json!({
                "title": "jsx",
                "plugins": [{ "id": "vue" }, { "id": "vueJsx" }]
            }))
        );
    }

    #[test]
    fn test_project_info_reads_final_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("package.json");
        fs::write(
            &manifest,
            r#"{ "name": "my-app", "scripts": { "dev": "vite", "test:unit": "vitest" } }"#,
        )
        .unwrap();

        let destination = dir.path().join("README.md");
        let mut ctx = RenderContext::new();
        ctx.defer(DeferredTask::ProjectInfo {
            destination: destination.clone(),
            manifest,
            info: ProjectInfo {
                project_name: "my-app".to_string(),
                package_manager: PackageManager::Pnpm,
                features: vec![Feature::Vitest],
            },
        });

        ctx.run_deferred().unwrap();

        let data = ctx.store().get(&destination).unwrap();
        assert_eq!(data["project_name"], "my-app");
        assert_eq!(data["package_manager"], "pnpm");
        assert_eq!(data["features"], json!(["Vitest"]));
        assert_eq!(
            data["commands"],
            json!([
                { "script": "install", "command": "pnpm install" },
                { "script": "dev", "command": "pnpm dev" },
                { "script": "test:unit", "command": "pnpm test:unit" },
            ])
        );
    }

    #[test]
    fn test_invalid_data_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.data.toml");
        fs::write(&source, "not = [valid").unwrap();

        let mut ctx = RenderContext::new();
        ctx.defer(DeferredTask::LoadData {
            source,
            destination: dir.path().join("broken"),
        });

        assert!(matches!(ctx.run_deferred(), Err(TaskError::Parse(_))));
    }
}
