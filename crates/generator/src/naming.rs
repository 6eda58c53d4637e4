//! Attribute and data source naming

/// Convert a camelCase wire name into the snake_case attribute name.
///
/// Runs of capitals are treated as one word, so `accessLogJSONFields`
/// becomes `access_log_json_fields`. Separators (`-`, `.`, `/`, space)
/// collapse into a single underscore.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '.' | '/' | ' ' | '_') {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    while out.ends_with('_') {
        out.pop();
    }

    out
}

/// Type name of the manifest data source for a CRD version, e.g.
/// `k8s_projectcontour_io_contour_configuration_v1alpha1_manifest`.
pub fn data_source_type_name(prefix: &str, group: &str, kind: &str, version: &str) -> String {
    format!(
        "{}_{}_{}_{}_manifest",
        prefix,
        to_snake_case(group),
        to_snake_case(kind),
        to_snake_case(version)
    )
}
