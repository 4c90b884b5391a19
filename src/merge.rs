use serde_json::{Map, Value};

/// `package.json` keys owned by the generated project rather than by any fragment.
const PROTECTED_PACKAGE_KEYS: [&str; 2] = ["name", "version"];

const DEPENDENCY_KEYS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Deep merges `incoming` into `target`.
///
/// Objects merge key by key, arrays are unioned in order of first appearance,
/// and any other value from `incoming` replaces the one in `target`.
pub fn deep_merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match target_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(target_items), Value::Array(incoming_items)) => {
            for item in incoming_items {
                if !target_items.contains(&item) {
                    target_items.push(item);
                }
            }
        }
        (target_value, incoming_value) => {
            *target_value = incoming_value;
        }
    }
}

/// Merges a `package.json` fragment onto the existing manifest.
///
/// `name` and `version` already present in `existing` are kept; everything else
/// follows [`deep_merge`]. Dependency maps come out sorted by package name.
pub fn merge_package_json(existing: &mut Value, incoming: Value) {
    let protected: Vec<(&str, Value)> = PROTECTED_PACKAGE_KEYS
        .iter()
        .filter_map(|key| existing.get(*key).map(|value| (*key, value.clone())))
        .collect();

    deep_merge(existing, incoming);

    if let Value::Object(map) = existing {
        for (key, value) in protected {
            map.insert(key.to_string(), value);
        }
    }

    sort_dependencies(existing);
}

fn sort_dependencies(manifest: &mut Value) {
    let Value::Object(map) = manifest else {
        return;
    };

    for key in DEPENDENCY_KEYS {
        if let Some(Value::Object(dependencies)) = map.get_mut(key) {
            let mut entries: Vec<(String, Value)> =
                std::mem::take(dependencies).into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            *dependencies = entries.into_iter().collect::<Map<String, Value>>();
        }
    }
}

/// Appends the lines of `incoming` that `existing` does not already contain.
///
/// Blank lines in `incoming` are kept only as section separators and never
/// duplicated back to back. The result always ends with a newline.
pub fn merge_ignore_lines(existing: &str, incoming: &str) -> String {
    let mut merged = existing.trim_end_matches('\n').to_string();
    let mut seen: Vec<&str> = existing.lines().map(str::trim_end).collect();

    let mut pending_blank = !merged.is_empty();

    for line in incoming.lines().map(str::trim_end) {
        if line.is_empty() {
            pending_blank = !merged.is_empty();
            continue;
        }

        if seen.contains(&line) {
            continue;
        }

        if pending_blank {
            merged.push('\n');
            pending_blank = false;
        }

        if !merged.is_empty() {
            merged.push('\n');
        }
        merged.push_str(line);
        seen.push(line);
    }

    merged.push('\n');
    merged
}
