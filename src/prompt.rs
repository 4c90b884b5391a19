use crate::{
    features::{Feature, FeatureFlags},
    utils::{is_valid_package_name, to_valid_package_name},
};
use inquire::{validator::Validation, Confirm, InquireError, MultiSelect, Text};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PROJECT_NAME: &str = "vue-project";

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("Operation cancelled")]
    #[diagnostic(
        code(vue_scaffold::prompt::operation_cancelled),
        help("Choose an empty directory or pass --force to overwrite")
    )]
    OperationCancelled,

    #[error("Project path is not a directory: {path}")]
    #[diagnostic(
        code(vue_scaffold::prompt::not_a_directory),
        help("Pick a target that is a directory or does not exist yet")
    )]
    NotADirectory { path: PathBuf },

    #[error("Error occurred trying to prompt user")]
    #[diagnostic(code(vue_scaffold::prompt::inquire))]
    Inquire(#[from] InquireError),
}

/// Source of the answers the scaffolder cannot derive from its arguments.
pub trait Prompter {
    fn project_name(&mut self, default: &str) -> Result<String, PromptError>;

    /// `target` is the directory as the user typed it.
    fn confirm_overwrite(&mut self, target: &str) -> Result<bool, PromptError>;

    /// Must only return valid package names.
    fn package_name(&mut self, initial: &str) -> Result<String, PromptError>;

    fn features(&mut self) -> Result<Vec<Feature>, PromptError>;
}

/// Prompts on the terminal with `inquire`.
#[derive(Debug, Default)]
pub struct InteractivePrompter;

impl Prompter for InteractivePrompter {
    fn project_name(&mut self, default: &str) -> Result<String, PromptError> {
        let answer = Text::new("Project name:")
            .with_default(default)
            .prompt()?;

        Ok(answer)
    }

    fn confirm_overwrite(&mut self, target: &str) -> Result<bool, PromptError> {
        let location = if target == "." {
            "Current directory".to_string()
        } else {
            format!("Target directory \"{}\"", target)
        };

        let answer = Confirm::new(&format!(
            "{} is not empty. Remove existing files and continue?",
            location
        ))
        .with_default(true)
        .prompt()?;

        Ok(answer)
    }

    fn package_name(&mut self, initial: &str) -> Result<String, PromptError> {
        let answer = Text::new("Package name:")
            .with_initial_value(initial)
            .with_validator(|input: &str| {
                if is_valid_package_name(input) {
                    Ok(Validation::Valid)
                } else {
                    Ok(Validation::Invalid("Invalid package.json name".into()))
                }
            })
            .prompt()?;

        Ok(answer)
    }

    fn features(&mut self) -> Result<Vec<Feature>, PromptError> {
        let answer = MultiSelect::new(
            "Select features to include in your project:",
            Feature::ALL.to_vec(),
        )
        .with_help_message("space to select, enter to confirm")
        .prompt()?;

        Ok(answer)
    }
}

/// The answers the rest of the run consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAnswers {
    /// Target directory relative to the working directory.
    pub target_dir: String,
    pub package_name: String,
    pub should_overwrite: bool,
}

/// Whether `dir` can be scaffolded into without asking: missing, empty, or
/// holding nothing but `.git`.
pub fn can_skip_emptying(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }

    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };

    let names: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.file_name())
        .collect();

    names.is_empty() || (names.len() == 1 && names[0] == ".git")
}

/// Resolves the project record, asking only for what the arguments leave open.
///
/// Declining the overwrite confirmation fails with
/// [`PromptError::OperationCancelled`] before anything touches the disk.
pub fn resolve_project<P: Prompter>(
    cwd: &Path,
    target_dir: Option<&str>,
    force: bool,
    prompter: &mut P,
) -> Result<ProjectAnswers, PromptError> {
    let target_dir = match target_dir.map(str::trim).filter(|dir| !dir.is_empty()) {
        Some(dir) => dir.to_string(),
        None => {
            let answer = prompter.project_name(DEFAULT_PROJECT_NAME)?;
            let answer = answer.trim();

            if answer.is_empty() {
                DEFAULT_PROJECT_NAME.to_string()
            } else {
                answer.to_string()
            }
        }
    };

    let root = cwd.join(&target_dir);

    if root.exists() && !root.is_dir() {
        return Err(PromptError::NotADirectory { path: root });
    }

    let should_overwrite = if can_skip_emptying(&root) {
        force
    } else if force {
        true
    } else if prompter.confirm_overwrite(&target_dir)? {
        true
    } else {
        return Err(PromptError::OperationCancelled);
    };

    let candidate = root
        .file_name()
        .or_else(|| cwd.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| target_dir.clone());

    let package_name = if is_valid_package_name(&candidate) {
        candidate
    } else {
        prompter.package_name(&to_valid_package_name(&candidate))?
    };

    Ok(ProjectAnswers {
        target_dir,
        package_name,
        should_overwrite,
    })
}

/// Uses `flags` when the user picked anything on the command line, otherwise asks.
pub fn resolve_features<P: Prompter>(
    flags: FeatureFlags,
    explicit: bool,
    prompter: &mut P,
) -> Result<FeatureFlags, PromptError> {
    if explicit {
        return Ok(flags);
    }

    Ok(prompter.features()?.into_iter().collect())
}
