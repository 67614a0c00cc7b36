//! Filesystem content index.
//!
//! Walks a content directory, splits every `.md`/`.mdx` file into front
//! matter and body, and answers [`ContentQuery`](blog_kit_core::ContentQuery)s
//! against the result through the [`ContentSource`](blog_kit_core::ContentSource)
//! trait.

pub mod frontmatter;
pub mod fs;

pub use fs::FsContentIndex;
