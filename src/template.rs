use crate::{
    errors::{FileOperation, IoError},
    tasks::DataStore,
    traverse,
};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("I/O error within template domain")]
    #[diagnostic(code(vue_scaffold::template::io))]
    Io(#[from] IoError),

    #[error("Template variables for '{path}' must be a table")]
    #[diagnostic(code(vue_scaffold::template::context))]
    Context {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("Error occurred attempting to render template '{path}'")]
    #[diagnostic(
        code(vue_scaffold::template::render),
        help("Every variable used by the template needs a value in a matching .data.toml file")
    )]
    Render {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },
}

pub const TERA_FILE_EXTENSION: &str = "tera";

fn is_tera(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == TERA_FILE_EXTENSION)
        .unwrap_or(false)
}

/// Makes a [`Tera`] [`Context`] from the data store entry for `destination`.
///
/// Files without an entry get an empty context.
fn make_tera_context(store: &DataStore, destination: &Path) -> Result<Context, TemplateError> {
    match store.get(destination) {
        Some(data) => Context::from_value(data.clone()).map_err(|error| TemplateError::Context {
            path: destination.to_path_buf(),
            source: error,
        }),
        None => Ok(Context::new()),
    }
}

/// Renders every `*.tera` file under `root` in place.
///
/// `foo.js.tera` is rendered with the variables stored for `foo.js`, written to
/// `foo.js`, and then removed.
pub fn render_marked_files(root: &Path, store: &DataStore) -> Result<(), TemplateError> {
    let mut tera = Tera::default();

    traverse::pre_order(
        root,
        |_| Ok(()),
        |path| {
            if !is_tera(path) {
                return Ok(());
            }

            let destination = path.with_extension("");

            let template_content = std::fs::read_to_string(path)
                .map_err(|error| IoError::new(FileOperation::Read, path.into(), error))?;

            let ctx = make_tera_context(store, &destination)?;

            let rendered =
                tera.render_str(&template_content, &ctx)
                    .map_err(|error| TemplateError::Render {
                        path: path.to_path_buf(),
                        source: error,
                    })?;

            std::fs::write(&destination, rendered)
                .map_err(|error| IoError::new(FileOperation::Write, destination.clone(), error))?;

            std::fs::remove_file(path)
                .map_err(|error| IoError::new(FileOperation::Remove, path.into(), error))?;

            log::debug!("render {}", destination.display());

            Ok(())
        },
    )
}
