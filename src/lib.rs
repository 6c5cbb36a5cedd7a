//! One-shot ingestion tool for the USACO Guide's problem data files.
//!
//! Given a problem's `cpid` on usaco.org, the `add_problem` binary fetches
//! the problem page, reads the problem and contest headings, and records the
//! problem in the three JSON documents the site renders problem lists from.

pub mod contest;
pub mod scrape;
pub mod store;
