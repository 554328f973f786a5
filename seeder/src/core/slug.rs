//! URL-safe identifiers derived from display names.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DASHES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Convert a display name into a lowercase, dash-separated id.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let kept = DISALLOWED_RE.replace_all(&lower, "");
    let dashed = WS_RE.replace_all(&kept, "-");
    let collapsed = DASHES_RE.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// Turn the last path segment of a link into a title (`lilly-white` -> `Lilly White`).
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
