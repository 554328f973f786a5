//! Seed-data toolkit for a crested gecko community site.
//!
//! Every command runs once, gathers or fabricates content and writes JSON
//! files that the site bundles as static data:
//!
//! - **[`content`]**: template-driven generators (starter Q&A, morph list,
//!   husbandry tips, community posts, morph encyclopedia).
//! - **[`scrape`]**: best-effort scrapers for a morph wiki, a care blog and a
//!   care guide.
//! - **[`translate`]**: Korean translation pass over scraped data.
//! - **[`merge`]**: joins scraped morphs with the encyclopedia by approximate id.
//!
//! The layering follows a strict split:
//!
//! - **[`core`]**: pure string and date helpers. No I/O.
//! - **[`io`]**: config, HTTP, headless browser, caches and JSON files.

pub mod content;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod merge;
pub mod scrape;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod translate;
