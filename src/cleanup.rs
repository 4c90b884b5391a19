use crate::{
    errors::{FileOperation, IoError},
    traverse,
};
use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CleanupError {
    #[error("I/O error while cleaning up the generated project")]
    #[diagnostic(code(vue_scaffold::cleanup::io))]
    Io(#[from] IoError),
}

/// JavaScript files that stay JavaScript in a TypeScript project.
const KEEP_AS_JAVASCRIPT: [&str; 1] = ["eslint.config.js"];

const JSCONFIG: &str = "jsconfig.json";

const INDEX_HTML: &str = "index.html";

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().map(|ext| ext == extension).unwrap_or(false)
}

fn file_name_is(path: &Path, name: &str) -> bool {
    path.file_name().map(|file_name| file_name == name).unwrap_or(false)
}

fn remove_file(path: &Path) -> Result<(), CleanupError> {
    std::fs::remove_file(path)
        .map_err(|error| IoError::new(FileOperation::Remove, path.into(), error))?;

    log::debug!("remove {}", path.display());

    Ok(())
}

fn rename_file(from: &Path, to: &Path) -> Result<(), CleanupError> {
    std::fs::rename(from, to)
        .map_err(|error| IoError::new(FileOperation::Rename, from.into(), error))?;

    log::debug!("rename {} -> {}", from.display(), to.display());

    Ok(())
}

/// Leaves only the files of the selected language in the generated project.
///
/// For TypeScript every `.js` file becomes `.ts` unless a `.ts` twin already
/// exists (then the `.js` copy is dropped), `jsconfig.json` is removed and the
/// `index.html` entry is pointed at `src/main.ts`. Otherwise all `.ts` files are
/// removed.
pub fn retain_language(root: &Path, typescript: bool) -> Result<(), CleanupError> {
    log::info!(
        "cleaning up for {}",
        if typescript { "TypeScript" } else { "JavaScript" }
    );

    if typescript {
        traverse::pre_order(root, |_| Ok(()), |path| {
            let keep_as_js = KEEP_AS_JAVASCRIPT
                .iter()
                .any(|name| file_name_is(path, name));

            if has_extension(path, "js") && !keep_as_js {
                let ts_path = path.with_extension("ts");

                if ts_path.exists() {
                    remove_file(path)
                } else {
                    rename_file(path, &ts_path)
                }
            } else if file_name_is(path, JSCONFIG) {
                remove_file(path)
            } else {
                Ok(())
            }
        })?;

        point_entry_at_typescript(&root.join(INDEX_HTML))
    } else {
        traverse::pre_order(root, |_| Ok(()), |path| {
            if has_extension(path, "ts") {
                remove_file(path)
            } else {
                Ok(())
            }
        })
    }
}

fn point_entry_at_typescript(index_html: &Path) -> Result<(), CleanupError> {
    if !index_html.exists() {
        return Ok(());
    }

    let content = std::fs::read_to_string(index_html)
        .map_err(|error| IoError::new(FileOperation::Read, index_html.into(), error))?;

    std::fs::write(index_html, content.replace("src/main.js", "src/main.ts"))
        .map_err(|error| IoError::new(FileOperation::Write, index_html.into(), error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/router")).unwrap();
        fs::write(root.join("index.html"), r#"<script src="/src/main.js"></script>"#).unwrap();
        fs::write(root.join("jsconfig.json"), "{}").unwrap();
        fs::write(root.join("eslint.config.js"), "").unwrap();
        fs::write(root.join("vite.config.js"), "js").unwrap();
        fs::write(root.join("src/main.js"), "js").unwrap();
        fs::write(root.join("src/router/index.js"), "js").unwrap();
        fs::write(root.join("src/router/index.ts"), "ts").unwrap();
        fs::write(root.join("env.d.ts"), "").unwrap();
        dir
    }

    #[test]
    fn test_typescript_converts_javascript_files() {
        let dir = fixture();
        let root = dir.path();

        retain_language(root, true).unwrap();

        assert!(root.join("vite.config.ts").exists());
        assert!(!root.join("vite.config.js").exists());
        assert!(root.join("src/main.ts").exists());
        assert_eq!(fs::read_to_string(root.join("src/router/index.ts")).unwrap(), "ts");
        assert!(!root.join("src/router/index.js").exists());
        assert!(root.join("eslint.config.js").exists());
        assert!(!root.join("jsconfig.json").exists());
        assert!(root.join("env.d.ts").exists());
        assert_eq!(
            fs::read_to_string(root.join("index.html")).unwrap(),
            r#"<script src="/src/main.ts"></script>"#
        );
    }

    #[test]
    fn test_javascript_removes_typescript_files() {
        let dir = fixture();
        let root = dir.path();

        retain_language(root, false).unwrap();

        assert!(!root.join("env.d.ts").exists());
        assert!(!root.join("src/router/index.ts").exists());
        assert!(root.join("src/router/index.js").exists());
        assert!(root.join("jsconfig.json").exists());
        assert!(root.join("vite.config.js").exists());
    }
}
