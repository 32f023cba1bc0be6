//! The library code for `syndic`, the syndication core of my personal
//! website. The architecture can be generally broken down into two distinct
//! steps:
//!
//! 1. Loading articles from MDX source files on disk ([`crate::article`]),
//!    which extracts each document's frontmatter ([`crate::frontmatter`]).
//! 2. Writing the syndication outputs ([`crate::build`]): the RSS feed
//!    ([`crate::feed`]) and the sitemap ([`crate::sitemap`]).
//!
//! Feed bodies are not rendered by a real Markdown engine. Feed readers
//! can't execute the interactive components embedded in the article
//! sources, so [`crate::degrade`] applies a fixed, deliberately lossy set
//! of text rewrites that produce feed-safe HTML: good enough for a feed
//! reader, not full fidelity. The degradation is total and never fails;
//! unsupported constructs pass through as literal text or get dropped.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod article;
pub mod build;
pub mod config;
pub mod degrade;
pub mod feed;
pub mod frontmatter;
pub mod sitemap;
