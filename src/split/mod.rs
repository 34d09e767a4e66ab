//! Split layout for arranging tabs on screen
//!
//! This module provides the split infrastructure:
//! - `SplitNode`: Recursive node holding either tabs or child splits
//! - `SplitLayout`: The forest of top-level splits, with capacity limits
//! - `Panel`: Flattened (split, tab, size) triple for presentation
//! - `SplitId`: Unique identifier for each split

mod layout;
mod node;

pub use layout::SplitLayout;
pub use node::{Orientation, Panel, SplitContent, SplitNode};

/// Unique identifier for a split node
pub type SplitId = u64;

/// Smallest and largest share a resizable split may take, in percent.
pub const MIN_SPLIT_SIZE: f32 = 10.0;
pub const MAX_SPLIT_SIZE: f32 = 90.0;
