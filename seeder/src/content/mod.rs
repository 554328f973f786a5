//! Template-driven seed content.
//!
//! Text pools are TOML files compiled into the binary. Every generator takes
//! an injected RNG so output is reproducible under a fixed seed.

pub mod dynamic;
pub mod encyclopedia;
pub mod starter;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use minijinja::Environment;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A JSON file produced by a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub count: usize,
}

/// Parse one of the embedded data files.
pub(crate) fn parse_embedded<T: DeserializeOwned>(name: &str, raw: &str) -> Result<T> {
    toml::from_str(raw).with_context(|| format!("parse embedded {name}"))
}

/// Render a one-off template string (`{{ var }}` placeholders).
pub(crate) fn render<S: Serialize>(source: &str, ctx: S) -> Result<String> {
    let env = Environment::new();
    env.render_str(source, ctx)
        .with_context(|| format!("render template {source:?}"))
}

/// Pick one element, failing on an empty pool.
pub(crate) fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, pool: &'a [T], name: &str) -> Result<&'a T> {
    pool.choose(rng).ok_or_else(|| anyhow!("{name} pool is empty"))
}

/// Pick one string and clone it.
pub(crate) fn pick_string<R: Rng + ?Sized>(rng: &mut R, pool: &[String], name: &str) -> Result<String> {
    pick(rng, pool, name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn render_fills_placeholders_without_escaping() {
        let out = render("{{ ko }}({{ name }}) <b>", context! { ko => "릴리", name => "Lilly & Co" })
            .expect("render");
        assert_eq!(out, "릴리(Lilly & Co) <b>");
    }

    #[test]
    fn pick_rejects_empty_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<String> = Vec::new();
        let err = pick_string(&mut rng, &empty, "nicknames").unwrap_err();
        assert!(err.to_string().contains("nicknames"));
    }
}
