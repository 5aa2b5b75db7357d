//! Semantic analysis: reference resolution, families, and flag groups.

mod flags;
mod resolve;


pub use flags::flag_groups;
pub use resolve::resolve;
