use indexmap::IndexSet;
use std::{fmt, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    TypeScript,
    Jsx,
    Router,
    Pinia,
    Vitest,
    Cypress,
    Playwright,
    Eslint,
    Prettier,
    DevTools,
}
impl Feature {
    pub const ALL: [Feature; 10] = [
        Feature::TypeScript,
        Feature::Jsx,
        Feature::Router,
        Feature::Pinia,
        Feature::Vitest,
        Feature::Cypress,
        Feature::Playwright,
        Feature::Eslint,
        Feature::Prettier,
        Feature::DevTools,
    ];

    fn as_str(&self) -> &str {
        match self {
            Self::TypeScript => "TypeScript",
            Self::Jsx => "JSX",
            Self::Router => "Vue Router",
            Self::Pinia => "Pinia",
            Self::Vitest => "Vitest",
            Self::Cypress => "Cypress",
            Self::Playwright => "Playwright",
            Self::Eslint => "ESLint",
            Self::Prettier => "Prettier",
            Self::DevTools => "Vue DevTools",
        }
    }
}
impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The resolved set of enabled features. Anything absent is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    enabled: IndexSet<Feature>,
}
impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, feature: Feature) -> &mut Self {
        self.enabled.insert(feature);
        self
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled.contains(&feature)
    }

    /// Enabled features in declaration order.
    pub fn enabled(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|feature| self.is_enabled(*feature))
            .collect()
    }
}
impl FromIterator<Feature> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}

const BASE_FRAGMENT: &str = "base";

/// Feature-gated configuration fragments, in application order.
const CONFIG_FRAGMENTS: [(Feature, &str); 10] = [
    (Feature::Jsx, "config/jsx"),
    (Feature::Router, "config/router"),
    (Feature::Pinia, "config/pinia"),
    (Feature::Vitest, "config/vitest"),
    (Feature::Cypress, "config/cypress"),
    (Feature::Playwright, "config/playwright"),
    (Feature::DevTools, "config/devtools"),
    (Feature::TypeScript, "config/typescript"),
    (Feature::Eslint, "config/eslint"),
    (Feature::Prettier, "config/prettier"),
];

/// `(typescript, router)` → application code fragment.
const CODE_FRAGMENTS: [((bool, bool), &str); 4] = [
    ((false, false), "code/default"),
    ((false, true), "code/router"),
    ((true, false), "code/typescript-default"),
    ((true, true), "code/typescript-router"),
];

/// `(router, pinia)` → entry point fragment.
const ENTRY_FRAGMENTS: [((bool, bool), &str); 4] = [
    ((false, false), "entry/default"),
    ((true, false), "entry/router"),
    ((false, true), "entry/pinia"),
    ((true, true), "entry/router-and-pinia"),
];

fn lookup(table: &[((bool, bool), &'static str)], key: (bool, bool)) -> &'static str {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, fragment)| *fragment)
        .unwrap_or(BASE_FRAGMENT)
}

/// Fragment directories to apply, relative to the template root.
///
/// The order is fixed: base, feature configs in table order, one code
/// fragment, one entry fragment. Flags only decide inclusion.
pub fn fragment_plan(flags: &FeatureFlags) -> Vec<PathBuf> {
    let typescript = flags.is_enabled(Feature::TypeScript);
    let router = flags.is_enabled(Feature::Router);
    let pinia = flags.is_enabled(Feature::Pinia);

    let mut plan = vec![PathBuf::from(BASE_FRAGMENT)];

    plan.extend(
        CONFIG_FRAGMENTS
            .iter()
            .filter(|(feature, _)| flags.is_enabled(*feature))
            .map(|(_, fragment)| PathBuf::from(fragment)),
    );

    plan.push(PathBuf::from(lookup(&CODE_FRAGMENTS, (typescript, router))));
    plan.push(PathBuf::from(lookup(&ENTRY_FRAGMENTS, (router, pinia))));

    plan
}
