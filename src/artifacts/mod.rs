//! Value types and algorithms
//!
//! - `objects`: blobs, commits, object IDs, and their canonical codecs
//! - `branch`: branch name validation
//! - `merge`: ancestry queries, LCA computation, three-way resolution
//! - `status`: change detection against HEAD, index, and working tree

pub mod branch;
pub mod merge;
pub mod objects;
pub mod status;
