use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use vue_scaffold::{
    config::{self, Options},
    errors::{FileOperation, IoError},
    features::{Feature, FeatureFlags},
    prompt::InteractivePrompter,
};

/// Flag id → features it enables.
const FEATURE_FLAGS: [(&str, &[Feature]); 11] = [
    ("typescript", &[Feature::TypeScript]),
    ("jsx", &[Feature::Jsx]),
    ("router", &[Feature::Router]),
    ("pinia", &[Feature::Pinia]),
    ("with-tests", &[Feature::Vitest, Feature::Cypress]),
    ("vitest", &[Feature::Vitest]),
    ("cypress", &[Feature::Cypress]),
    ("playwright", &[Feature::Playwright]),
    ("eslint", &[Feature::Eslint]),
    ("eslint-with-prettier", &[Feature::Eslint, Feature::Prettier]),
    ("devtools", &[Feature::DevTools]),
];

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .action(ArgAction::SetTrue)
}

fn cli() -> Command {
    Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .args_override_self(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("target").help("The directory where the project will be created"))
        .arg(flag("default", "Use only the features given as flags, without prompting"))
        .arg(flag("typescript", "Add TypeScript").visible_alias("ts"))
        .arg(flag("jsx", "Add JSX support"))
        .arg(flag("router", "Add Vue Router").visible_alias("vue-router"))
        .arg(flag("pinia", "Add Pinia for state management"))
        .arg(flag("with-tests", "Add Vitest and Cypress").visible_alias("tests"))
        .arg(flag("vitest", "Add Vitest for unit testing"))
        .arg(flag("cypress", "Add Cypress for end-to-end testing"))
        .arg(flag("playwright", "Add Playwright for end-to-end testing"))
        .arg(flag("eslint", "Add ESLint"))
        .arg(flag("eslint-with-prettier", "Add ESLint and Prettier"))
        .arg(flag("devtools", "Add the Vue DevTools plugin").visible_alias("vue-devtools"))
        .arg(flag("force", "Overwrite a non-empty target directory without asking"))
        .arg(
            Arg::new("template-root")
                .long("template-root")
                .value_name("DIR")
                .help("Directory holding the template fragments"),
        )
}

/// Splits out flags the command does not know so that parsing stays lenient.
///
/// Returns `(kept, ignored)`.
fn retain_known_args(command: &Command, args: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut longs: Vec<String> = vec!["help".to_string(), "version".to_string()];
    let mut shorts: Vec<char> = vec!['h', 'V'];

    for arg in command.get_arguments() {
        if let Some(names) = arg.get_long_and_visible_aliases() {
            longs.extend(names.into_iter().map(str::to_string));
        }
        if let Some(short) = arg.get_short() {
            shorts.push(short);
        }
    }

    let mut after_separator = false;
    let mut kept = Vec::with_capacity(args.len());
    let mut ignored = Vec::new();

    for (index, token) in args.into_iter().enumerate() {
        if index == 0 || after_separator {
            kept.push(token);
            continue;
        }
        if token == "--" {
            after_separator = true;
            kept.push(token);
            continue;
        }

        let known = if let Some(long) = token.strip_prefix("--") {
            let name = long.split('=').next().unwrap_or_default();
            longs.iter().any(|known| known == name)
        } else if let Some(short) = token.strip_prefix('-') {
            short.is_empty() || short.chars().all(|c| shorts.contains(&c))
        } else {
            true
        };

        if known {
            kept.push(token);
        } else {
            ignored.push(token);
        }
    }

    (kept, ignored)
}

fn init_logger(is_verbose: bool) {
    let level = if is_verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_options(matches: &ArgMatches) -> Result<Options, IoError> {
    let cwd = std::env::current_dir()
        .map_err(|error| IoError::new(FileOperation::Read, ".".into(), error))?;

    let template_root = config::resolve_template_root(
        matches
            .get_one::<String>("template-root")
            .map(String::as_str),
    );

    let mut features = FeatureFlags::new();
    let mut any_feature_flag = false;

    for (id, enables) in FEATURE_FLAGS {
        if matches.get_flag(id) {
            any_feature_flag = true;
            for feature in enables {
                features.enable(*feature);
            }
        }
    }

    let mut options = Options::new(cwd, template_root);
    options.target_dir = matches.get_one::<String>("target").cloned();
    options.force = matches.get_flag("force");
    options.features = features;
    options.explicit_features = any_feature_flag || matches.get_flag("default");
    options.user_agent = std::env::var(config::USER_AGENT_ENV).ok();

    Ok(options)
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let command = cli();
    let (args, ignored) = retain_known_args(&command, std::env::args().collect());
    let matches = command.get_matches_from(args);

    init_logger(matches.get_flag("verbose"));

    for token in ignored {
        log::debug!("ignoring unknown flag {}", token);
    }

    let options = build_options(&matches)?;

    log::debug!("resolved options: {:?}", options);

    vue_scaffold::create_project(options, &mut InteractivePrompter)?;

    Ok(())
}
