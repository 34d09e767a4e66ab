//! The forest of top-level splits.

use super::node::{Orientation, Panel, SplitContent, SplitNode, normalize_sizes};
use super::{MAX_SPLIT_SIZE, MIN_SPLIT_SIZE, SplitId};
use crate::config::Config;
use crate::error::{InvariantViolation, SplitError};
use crate::tab::TabId;
use std::collections::HashMap;

/// Top-level splits plus the capacity rules that govern them.
#[derive(Debug, Clone)]
pub struct SplitLayout {
    splits: Vec<SplitNode>,
    next_split_id: SplitId,
    /// Split that receives newly created tabs
    target: Option<SplitId>,
    max_splits: usize,
    max_grid_splits: usize,
    grid_primary_share: f32,
}

impl SplitLayout {
    pub fn new(max_splits: usize, max_grid_splits: usize, grid_primary_share: f32) -> Self {
        Self {
            splits: Vec::new(),
            next_split_id: 1,
            target: None,
            max_splits,
            max_grid_splits,
            grid_primary_share,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_splits,
            config.max_grid_splits,
            config.grid_primary_share,
        )
    }

    fn allocate_id(&mut self) -> SplitId {
        let id = self.next_split_id;
        self.next_split_id += 1;
        id
    }

    /// Check the capacity rule for a new split of `orientation`.
    pub fn can_create(&self, orientation: Orientation) -> Result<(), SplitError> {
        let limit = match orientation {
            Orientation::Grid => self.max_grid_splits,
            Orientation::Horizontal | Orientation::Vertical => self.max_splits,
        };
        if self.splits.len() >= limit {
            return Err(SplitError::CapacityExceeded { orientation, limit });
        }
        Ok(())
    }

    /// Add a new top-level split seeded with `seeds`.
    ///
    /// Seeds are moved out of whatever split held them. A grid split gets two
    /// nested children: the first two seeds at the primary share, the rest at
    /// the remainder. The new split becomes the target for new tabs.
    ///
    /// `size` is clamped so every existing split keeps at least the minimum
    /// size; the existing splits share what is left evenly. The first split
    /// always takes the full 100 percent.
    pub fn create_split(
        &mut self,
        orientation: Orientation,
        seeds: &[TabId],
        size: f32,
    ) -> Result<SplitId, SplitError> {
        self.can_create(orientation)?;
        if seeds.is_empty() {
            return Err(SplitError::NoSeedTabs);
        }

        for &tab in seeds {
            self.detach_tab(tab);
        }

        let id = self.allocate_id();
        let mut node = match orientation {
            Orientation::Grid => {
                let split_at = seeds.len().min(2);
                let primary = self.allocate_id();
                let secondary = self.allocate_id();
                let mut children = vec![
                    SplitNode::leaf(
                        primary,
                        Orientation::Horizontal,
                        self.grid_primary_share,
                        seeds[..split_at].to_vec(),
                    ),
                    SplitNode::leaf(
                        secondary,
                        Orientation::Horizontal,
                        100.0 - self.grid_primary_share,
                        seeds[split_at..].to_vec(),
                    ),
                ];
                for child in &mut children {
                    child.resizable = false;
                }
                children.retain(|c| !c.is_empty());
                normalize_sizes(&mut children);
                SplitNode::branch(id, Orientation::Grid, size, children)
            }
            Orientation::Horizontal | Orientation::Vertical => {
                SplitNode::leaf(id, orientation, size, seeds.to_vec())
            }
        };

        log::info!(
            "Created {} split {} with tabs {:?} (total: {})",
            orientation.as_str(),
            id,
            seeds,
            self.splits.len() + 1
        );
        node.size = self.top_level_bound(self.splits.len() + 1).map_or(100.0, |max| {
            size.clamp(MIN_SPLIT_SIZE, max)
        });
        self.splits.push(node);
        self.share_remainder(id);
        self.target = Some(id);
        Ok(id)
    }

    /// Place a new tab into the target split, creating a default split if none exists.
    pub fn insert_tab(&mut self, tab: TabId) -> SplitId {
        let target = self
            .target
            .filter(|id| self.splits.iter().any(|s| s.id == *id))
            .or_else(|| self.splits.first().map(|s| s.id));

        let leaf = target.and_then(|id| {
            self.splits
                .iter_mut()
                .find(|s| s.id == id)
                .and_then(SplitNode::first_leaf_mut)
        });

        if let Some(leaf) = leaf
            && let SplitContent::Tabs(tabs) = &mut leaf.content
        {
            tabs.push(tab);
            return leaf.id;
        }

        let id = self.allocate_id();
        log::debug!("No split available for tab {}, creating default split {}", tab, id);
        self.splits
            .push(SplitNode::leaf(id, Orientation::Horizontal, 100.0, vec![tab]));
        self.target = Some(id);
        id
    }

    /// Remove a tab from every split, pruning splits that become empty.
    ///
    /// Returns true if the tab was found.
    pub fn remove_tab(&mut self, tab: TabId) -> bool {
        let removed = self.detach_tab(tab);
        if removed {
            log::debug!("Removed tab {} from split layout", tab);
        }
        removed
    }

    fn detach_tab(&mut self, tab: TabId) -> bool {
        let mut removed = false;
        for split in &mut self.splits {
            removed |= split.remove_tab(tab);
        }

        let before = self.splits.len();
        self.splits.retain(|s| !s.is_empty());
        if self.splits.len() != before {
            log::debug!("Pruned {} empty split(s)", before - self.splits.len());
            normalize_sizes(&mut self.splits);
            if let Some(target) = self.target
                && !self.splits.iter().any(|s| s.find(target).is_some())
            {
                self.target = self.splits.first().map(|s| s.id);
            }
        }
        removed
    }

    /// Move an existing tab into another split.
    pub fn move_tab_to_split(&mut self, tab: TabId, split: SplitId) -> Result<(), SplitError> {
        let dest = self
            .find(split)
            .ok_or(SplitError::UnknownSplit(split))?;
        if dest.contains_tab(tab) {
            return Ok(());
        }

        self.detach_tab(tab);

        let leaf = self
            .splits
            .iter_mut()
            .find_map(|s| s.find_mut(split))
            .and_then(SplitNode::first_leaf_mut);
        match leaf {
            Some(SplitNode {
                content: SplitContent::Tabs(tabs),
                ..
            }) => {
                tabs.push(tab);
                log::debug!("Moved tab {} to split {}", tab, split);
                Ok(())
            }
            _ => {
                self.insert_tab(tab);
                Err(SplitError::UnknownSplit(split))
            }
        }
    }

    /// Resize a split, clamped to 10..=90 percent.
    ///
    /// Resizing a top-level split hands the remainder evenly to its siblings,
    /// and the upper bound shrinks so each sibling keeps the minimum size.
    /// Returns `Ok(false)` when the split is fixed-size or is the only
    /// top-level split.
    pub fn resize_split(&mut self, split: SplitId, size: f32) -> Result<bool, SplitError> {
        if self.splits.iter().any(|s| s.id == split) {
            let Some(max) = self.top_level_bound(self.splits.len()) else {
                return Ok(false);
            };
            if let Some(node) = self.splits.iter_mut().find(|s| s.id == split) {
                node.size = size.clamp(MIN_SPLIT_SIZE, max);
            }
            self.share_remainder(split);
            return Ok(true);
        }

        let node = self
            .splits
            .iter_mut()
            .find_map(|s| s.find_mut(split))
            .ok_or(SplitError::UnknownSplit(split))?;
        if !node.resizable {
            return Ok(false);
        }
        node.size = size.clamp(MIN_SPLIT_SIZE, MAX_SPLIT_SIZE);
        Ok(true)
    }

    /// Largest size one of `count` top-level splits may take, or `None` when
    /// it would be alone.
    fn top_level_bound(&self, count: usize) -> Option<f32> {
        if count <= 1 {
            return None;
        }
        let reserved = MIN_SPLIT_SIZE * (count - 1) as f32;
        Some((100.0 - reserved).min(MAX_SPLIT_SIZE))
    }

    /// Split what `fixed` leaves of 100 percent evenly across the other
    /// top-level splits.
    fn share_remainder(&mut self, fixed: SplitId) {
        let others = self.splits.len().saturating_sub(1);
        let Some(kept) = self.splits.iter().find(|s| s.id == fixed).map(|s| s.size) else {
            return;
        };
        if others == 0 {
            if let Some(only) = self.splits.first_mut() {
                only.size = 100.0;
            }
            return;
        }
        let share = (100.0 - kept) / others as f32;
        for split in self.splits.iter_mut().filter(|s| s.id != fixed) {
            split.size = share;
        }
    }

    /// Make `split` the destination for new tabs.
    pub fn set_target(&mut self, split: SplitId) -> Result<(), SplitError> {
        if self.find(split).is_none() {
            return Err(SplitError::UnknownSplit(split));
        }
        self.target = Some(split);
        Ok(())
    }

    /// Replace everything with one full-width horizontal split holding `tab`.
    pub fn reset_with(&mut self, tab: TabId) -> SplitId {
        self.splits.clear();
        let id = self.allocate_id();
        self.splits
            .push(SplitNode::leaf(id, Orientation::Horizontal, 100.0, vec![tab]));
        self.target = Some(id);
        id
    }

    pub fn clear(&mut self) {
        self.splits.clear();
        self.target = None;
    }

    pub fn find(&self, split: SplitId) -> Option<&SplitNode> {
        self.splits.iter().find_map(|s| s.find(split))
    }

    /// Innermost split listing `tab`
    pub fn split_of(&self, tab: TabId) -> Option<SplitId> {
        self.splits.iter().find_map(|s| s.split_of(tab))
    }

    pub fn splits(&self) -> &[SplitNode] {
        &self.splits
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    pub fn target(&self) -> Option<SplitId> {
        self.target
    }

    pub fn max_splits(&self) -> usize {
        self.max_splits
    }

    pub fn max_grid_splits(&self) -> usize {
        self.max_grid_splits
    }

    /// All tab IDs across every split, in render order
    pub fn tab_ids(&self) -> Vec<TabId> {
        self.splits.iter().flat_map(SplitNode::tab_ids).collect()
    }

    /// Flatten the forest into render order. Grid children follow their parent.
    pub fn resolve_tabs_for_render(&self) -> Vec<Panel> {
        let mut panels = Vec::new();
        for split in &self.splits {
            split.collect_panels(100.0, &mut panels);
        }
        panels
    }

    /// Verify that the splits list exactly the `open` tabs, each once.
    pub fn check_partition(&self, open: &[TabId]) -> Result<(), InvariantViolation> {
        let mut counts: HashMap<TabId, usize> = HashMap::new();
        for tab in self.tab_ids() {
            *counts.entry(tab).or_default() += 1;
        }

        for split in &self.splits {
            let mut empty = None;
            split.for_each(&mut |node| {
                if empty.is_none() && node.is_empty() {
                    empty = Some(node.id);
                }
            });
            if let Some(id) = empty {
                return Err(InvariantViolation::EmptySplit(id));
            }
        }

        for (&tab, &count) in &counts {
            if count > 1 {
                return Err(InvariantViolation::DuplicateTab(tab));
            }
            if !open.contains(&tab) {
                return Err(InvariantViolation::StrayTab(tab));
            }
        }
        for &tab in open {
            if !counts.contains_key(&tab) {
                return Err(InvariantViolation::MissingTab(tab));
            }
        }
        Ok(())
    }
}
