use serde::Serialize;
use std::fmt;

lazy_static::lazy_static! {
    static ref PACKAGE_NAME_REGEX: regex::Regex = regex::Regex::new(
        r"^(?:@[a-z0-9-*~][a-z0-9-*._~]*/)?[a-z0-9-~][a-z0-9-._~]*$"
    ).expect("a valid regex pattern");
    static ref WHITESPACE_REGEX: regex::Regex =
        regex::Regex::new(r"\s+").expect("a valid regex pattern");
    static ref LEADING_DOT_OR_UNDERSCORE_REGEX: regex::Regex =
        regex::Regex::new(r"^[._]").expect("a valid regex pattern");
    static ref INVALID_RUN_REGEX: regex::Regex =
        regex::Regex::new(r"[^a-z0-9-~]+").expect("a valid regex pattern");
}

/// Whether `name` can be published to the npm registry as is.
pub fn is_valid_package_name(name: &str) -> bool {
    PACKAGE_NAME_REGEX.is_match(name)
}

/// Best-effort conversion of a project name into a valid npm package name.
pub fn to_valid_package_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let dashed = WHITESPACE_REGEX.replace_all(&lowered, "-");
    let stripped = LEADING_DOT_OR_UNDERSCORE_REGEX.replace(&dashed, "");

    INVALID_RUN_REGEX.replace_all(&stripped, "-").into_owned()
}

/// Package manager that launched the scaffolder, used for the printed instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}
impl PackageManager {
    /// Reads the `npm_config_user_agent` value set by `npm create`, `pnpm create`, etc.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let user_agent = user_agent.unwrap_or_default();

        if user_agent.contains("pnpm") {
            Self::Pnpm
        } else if user_agent.contains("yarn") {
            Self::Yarn
        } else if user_agent.contains("bun") {
            Self::Bun
        } else {
            Self::Npm
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// The command line a user types to run `script`, `install` included.
    pub fn command(&self, script: &str) -> String {
        match (self, script) {
            (Self::Yarn, "install") => "yarn".to_string(),
            (_, "install") => format!("{} install", self),
            (Self::Npm, _) => format!("npm run {}", script),
            (_, _) => format!("{} {}", self, script),
        }
    }
}
impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_package_names() {
        assert!(is_valid_package_name("vue-project"));
        assert!(is_valid_package_name("@scope/my-app"));
        assert!(!is_valid_package_name("My App"));
        assert!(!is_valid_package_name(".hidden"));
        assert!(!is_valid_package_name(""));
    }

    #[test]
    fn test_to_valid_package_name() {
        assert_eq!(to_valid_package_name("  My Vue App "), "my-vue-app");
        assert_eq!(to_valid_package_name("_private"), "private");
        assert_eq!(to_valid_package_name("hello@world!"), "hello-world-");
        assert!(is_valid_package_name(&to_valid_package_name("Some Project")));
    }

    #[test]
    fn test_package_manager_detection() {
        assert_eq!(
            PackageManager::from_user_agent(Some("pnpm/9.1.0 npm/? node/v20.11.0 linux x64")),
            PackageManager::Pnpm
        );
        assert_eq!(
            PackageManager::from_user_agent(Some("yarn/1.22.19 npm/? node/v18.0.0")),
            PackageManager::Yarn
        );
        assert_eq!(PackageManager::from_user_agent(None), PackageManager::Npm);
    }

    #[test]
    fn test_commands_follow_package_manager_conventions() {
        assert_eq!(PackageManager::Npm.command("install"), "npm install");
        assert_eq!(PackageManager::Npm.command("dev"), "npm run dev");
        assert_eq!(PackageManager::Yarn.command("install"), "yarn");
        assert_eq!(PackageManager::Pnpm.command("test:unit"), "pnpm test:unit");
    }
}
