use crate::features::FeatureFlags;
use std::path::PathBuf;

/// Environment variable pointing at an alternative template root.
pub const TEMPLATE_ROOT_ENV: &str = "VUE_SCAFFOLD_TEMPLATE_ROOT";

/// Set by npm, pnpm, yarn and bun when they run a `create` package.
pub const USER_AGENT_ENV: &str = "npm_config_user_agent";

/// Everything the command line and environment decide for a run.
#[derive(Debug, Clone)]
pub struct Options {
    pub cwd: PathBuf,
    pub target_dir: Option<String>,
    pub force: bool,
    pub features: FeatureFlags,
    /// `true` when any feature flag or `--default` was given, so no feature prompt is needed.
    pub explicit_features: bool,
    pub template_root: PathBuf,
    pub user_agent: Option<String>,
}
impl Options {
    pub fn new(cwd: PathBuf, template_root: PathBuf) -> Self {
        Self {
            cwd,
            target_dir: None,
            force: false,
            features: FeatureFlags::new(),
            explicit_features: false,
            template_root,
            user_agent: None,
        }
    }
}

/// `template/` shipped alongside the crate.
pub fn bundled_template_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("template")
}

/// Explicit argument first, then [`TEMPLATE_ROOT_ENV`], then the bundled templates.
pub fn resolve_template_root(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(TEMPLATE_ROOT_ENV).map(PathBuf::from))
        .unwrap_or_else(bundled_template_root)
}
