use crate::{
    errors::{FileOperation, IoError, ParseError},
    merge::{deep_merge, merge_ignore_lines, merge_package_json},
    tasks::{DeferredTask, RenderContext},
    traverse,
};
use miette::Diagnostic;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("I/O error while rendering a fragment")]
    #[diagnostic(code(vue_scaffold::render::io))]
    Io(#[from] IoError),

    #[error("Unable to merge file")]
    #[diagnostic(code(vue_scaffold::render::parse))]
    Parse(#[from] ParseError),

    #[error("Fragment not found: {path}")]
    #[diagnostic(
        code(vue_scaffold::render::fragment_not_found),
        help("Check that the template root contains every fragment directory")
    )]
    FragmentNotFound { path: PathBuf },

    #[error("unable to strip prefix from directory")]
    #[diagnostic(code(vue_scaffold::render::strip_prefix))]
    StripPrefix {
        path: PathBuf,
        dir: PathBuf,
        source: std::path::StripPrefixError,
    },
}

/// Suffix of fragment files that feed template variables instead of being copied.
pub const DATA_FILE_SUFFIX: &str = ".data.toml";

const SKIPPED_DIRECTORIES: [&str; 1] = ["node_modules"];

/// How a fragment file lands in the destination tree.
#[derive(Debug, PartialEq)]
enum FileKind {
    PackageJson,
    /// JSON whose existing copy is deep merged, e.g. editor `extensions.json`.
    MergeableJson,
    /// `_`-prefixed ignore file: renamed to its dotfile and merged line by line.
    IgnoreFile,
    /// `_`-prefixed file renamed to its dotfile and copied.
    Dotfile,
    /// Feeds the data store for the file named without the suffix.
    Data,
    Plain,
}
impl FileKind {
    fn detect(file_name: &str) -> Self {
        match file_name {
            "package.json" => Self::PackageJson,
            "extensions.json" => Self::MergeableJson,
            name if name.ends_with(DATA_FILE_SUFFIX) => Self::Data,
            name if name.starts_with('_') && name.ends_with("ignore") => Self::IgnoreFile,
            name if name.starts_with('_') => Self::Dotfile,
            _ => Self::Plain,
        }
    }
}

/// Applies one fragment directory onto `destination_root`.
///
/// Later fragments win for plain files; `package.json`, `extensions.json` and
/// ignore files are merged with what earlier fragments wrote. Data files are
/// not copied but registered as deferred tasks on `ctx`.
pub fn render_fragment(
    fragment: &Path,
    destination_root: &Path,
    ctx: &mut RenderContext,
) -> Result<(), RenderError> {
    if !fragment.is_dir() {
        return Err(RenderError::FragmentNotFound {
            path: fragment.to_path_buf(),
        });
    }

    log::info!("applying fragment {}", fragment.display());

    create_directory(destination_root)?;

    traverse::pre_order(
        fragment,
        |directory| {
            let relative = relative_to(directory, fragment)?;

            if is_skipped(relative) {
                log::debug!("skip {}", directory.display());
                return Ok(());
            }

            create_directory(&destination_root.join(relative))
        },
        |file| {
            let relative = relative_to(file, fragment)?;

            if is_skipped(relative) {
                return Ok(());
            }

            render_file(file, &destination_root.join(relative), ctx)
        },
    )
}

fn relative_to<'a>(path: &'a Path, dir: &Path) -> Result<&'a Path, RenderError> {
    path.strip_prefix(dir)
        .map_err(|error| RenderError::StripPrefix {
            path: path.to_path_buf(),
            dir: dir.to_path_buf(),
            source: error,
        })
}

fn is_skipped(relative: &Path) -> bool {
    relative
        .components()
        .any(|component| SKIPPED_DIRECTORIES.iter().any(|skip| component.as_os_str() == *skip))
}

fn render_file(
    source: &Path,
    destination: &Path,
    ctx: &mut RenderContext,
) -> Result<(), RenderError> {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    match FileKind::detect(&file_name) {
        FileKind::PackageJson if destination.exists() => {
            merge_json_file(source, destination, merge_package_json)
        }
        FileKind::MergeableJson if destination.exists() => {
            merge_json_file(source, destination, deep_merge)
        }
        FileKind::Data => {
            let target_name = file_name
                .strip_suffix(DATA_FILE_SUFFIX)
                .unwrap_or(&file_name);

            ctx.defer(DeferredTask::LoadData {
                source: source.to_path_buf(),
                destination: destination.with_file_name(target_name),
            });

            Ok(())
        }
        FileKind::IgnoreFile => {
            let destination = dotfile_destination(destination, &file_name);

            if destination.exists() {
                let existing = read_to_string(&destination)?;
                let incoming = read_to_string(source)?;

                log::debug!("append {}", destination.display());

                write_file(&destination, merge_ignore_lines(&existing, &incoming))
            } else {
                copy_file(source, &destination)
            }
        }
        FileKind::Dotfile => copy_file(source, &dotfile_destination(destination, &file_name)),
        FileKind::PackageJson | FileKind::MergeableJson | FileKind::Plain => {
            copy_file(source, destination)
        }
    }
}

/// `_gitignore` → `.gitignore`
fn dotfile_destination(destination: &Path, file_name: &str) -> PathBuf {
    let renamed = format!(".{}", file_name.trim_start_matches('_'));

    destination.with_file_name(renamed)
}

fn merge_json_file(
    source: &Path,
    destination: &Path,
    merge: fn(&mut Value, Value),
) -> Result<(), RenderError> {
    let mut existing = read_json(destination)?;
    let incoming = read_json(source)?;

    merge(&mut existing, incoming);

    log::debug!("merge {}", destination.display());

    write_json(destination, &existing)
}

fn read_to_string(path: &Path) -> Result<String, RenderError> {
    let content = std::fs::read_to_string(path)
        .map_err(|error| IoError::new(FileOperation::Read, path.into(), error))?;

    Ok(content)
}

fn read_json(path: &Path) -> Result<Value, RenderError> {
    let content = read_to_string(path)?;

    let parsed = serde_json::from_str(&content)
        .map_err(|error| ParseError::json(path.to_path_buf(), error))?;

    Ok(parsed)
}

/// Writes `value` as two-space indented JSON with a trailing newline.
pub fn write_json(path: &Path, value: &Value) -> Result<(), RenderError> {
    let mut content = serde_json::to_string_pretty(value)
        .map_err(|error| ParseError::json(path.to_path_buf(), error))?;
    content.push('\n');

    write_file(path, content)
}

/// Creates all directories in the specified path if they do not exist.
pub fn create_directory(path: &Path) -> Result<(), RenderError> {
    std::fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.into(), error))?;

    Ok(())
}

/// Writes a file with the provided contents to the specified path.
fn write_file(path: &Path, contents: String) -> Result<(), RenderError> {
    std::fs::write(path, contents)
        .map_err(|error| IoError::new(FileOperation::Write, path.into(), error))?;

    Ok(())
}

fn copy_file(source: &Path, destination: &Path) -> Result<(), RenderError> {
    let verb = if destination.exists() { "overwrite" } else { "create" };

    std::fs::copy(source, destination)
        .map_err(|error| IoError::new(FileOperation::Copy, destination.into(), error))?;

    log::debug!("{} {}", verb, destination.display());

    Ok(())
}
