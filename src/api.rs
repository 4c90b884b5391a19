use crate::{
    cleanup::{self, CleanupError},
    config::Options,
    errors::{FileOperation, IoError},
    features::{fragment_plan, Feature, FeatureFlags},
    prompt::{self, PromptError, Prompter},
    render::{self, RenderError},
    tasks::{DeferredTask, ProjectInfo, RenderContext, TaskError},
    template::{self, TemplateError},
    traverse,
    utils::PackageManager,
};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ScaffoldError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cleanup(#[from] CleanupError),
}

/// Everything [`scaffold`] needs once the questions are answered.
#[derive(Debug, Clone)]
pub struct ScaffoldPlan<'a> {
    pub root: &'a Path,
    pub template_root: &'a Path,
    pub project_name: &'a str,
    pub package_name: &'a str,
    pub features: &'a FeatureFlags,
    pub package_manager: PackageManager,
}

/// Resolves the project through `prompter`, then scaffolds it and prints the
/// next steps.
///
/// # Errors
///
/// Returns a [`ScaffoldError`] if:
///
/// - The user declines to overwrite a non-empty directory, or a prompt fails.
/// - A template fragment is missing or cannot be read.
/// - A directory or file cannot be created, written to or removed.
/// - A `package.json` or data file cannot be parsed.
/// - Tera fails to render a template.
pub fn create_project<P: Prompter>(options: Options, prompter: &mut P) -> Result<(), ScaffoldError> {
    let answers = prompt::resolve_project(
        &options.cwd,
        options.target_dir.as_deref(),
        options.force,
        prompter,
    )?;

    let features = prompt::resolve_features(options.features, options.explicit_features, prompter)?;

    let root = options.cwd.join(&answers.target_dir);

    prepare_root(&root, answers.should_overwrite)?;

    println!("\n{} {}...", "Scaffolding project in".bold(), root.display());

    let package_manager = PackageManager::from_user_agent(options.user_agent.as_deref());

    scaffold(&ScaffoldPlan {
        root: &root,
        template_root: &options.template_root,
        project_name: &answers.target_dir,
        package_name: &answers.package_name,
        features: &features,
        package_manager,
    })?;

    print_next_steps(&options.cwd, &root, &features, package_manager);

    Ok(())
}

/// Materializes the project into `plan.root`, which must already exist.
///
/// Fragments are applied in [`fragment_plan`] order, deferred tasks run next,
/// then `*.tera` files are rendered and files of the unselected language are
/// removed.
pub fn scaffold(plan: &ScaffoldPlan) -> Result<(), ScaffoldError> {
    let manifest = plan.root.join("package.json");

    render::write_json(
        &manifest,
        &serde_json::json!({ "name": plan.package_name, "version": "0.0.0" }),
    )?;

    let mut ctx = RenderContext::new();

    for fragment in fragment_plan(plan.features) {
        render::render_fragment(&plan.template_root.join(fragment), plan.root, &mut ctx)?;
    }

    ctx.defer(DeferredTask::ProjectInfo {
        destination: plan.root.join("README.md"),
        manifest,
        info: ProjectInfo {
            project_name: plan.project_name.to_string(),
            package_manager: plan.package_manager,
            features: plan.features.enabled(),
        },
    });

    ctx.run_deferred()?;

    template::render_marked_files(plan.root, ctx.store())?;

    cleanup::retain_language(plan.root, plan.features.is_enabled(Feature::TypeScript))?;

    Ok(())
}

/// Empties `root` when overwriting, creates it when missing.
fn prepare_root(root: &Path, should_overwrite: bool) -> Result<(), ScaffoldError> {
    if root.exists() && should_overwrite {
        log::info!("emptying {}", root.display());
        empty_dir(root)
    } else if !root.exists() {
        std::fs::create_dir_all(root)
            .map_err(|error| IoError::new(FileOperation::Mkdir, root.to_path_buf(), error))?;
        Ok(())
    } else {
        Ok(())
    }
}

/// Removes everything under `dir` except `.git`, keeping `dir` itself.
fn empty_dir(dir: &Path) -> Result<(), ScaffoldError> {
    traverse::post_order(
        dir,
        |directory| {
            std::fs::remove_dir(directory).map_err(|error| {
                IoError::new(FileOperation::Remove, directory.to_path_buf(), error).into()
            })
        },
        |file| {
            std::fs::remove_file(file).map_err(|error| {
                IoError::new(FileOperation::Remove, file.to_path_buf(), error).into()
            })
        },
    )
}

fn print_next_steps(cwd: &Path, root: &Path, features: &FeatureFlags, pm: PackageManager) {
    println!("\n{}\n", "Done. Now run:".bold());

    if root != cwd {
        let relative: PathBuf = root
            .strip_prefix(cwd)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| root.to_path_buf());
        let display = relative.display().to_string();
        let display = if display.contains(' ') {
            format!("\"{}\"", display)
        } else {
            display
        };

        println!("  {}", format!("cd {}", display).bold().green());
    }

    println!("  {}", pm.command("install").bold().green());

    if features.is_enabled(Feature::Prettier) {
        println!("  {}", pm.command("format").bold().green());
    }

    println!("  {}", pm.command("dev").bold().green());
    println!();
}
