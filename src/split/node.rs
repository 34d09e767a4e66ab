//! Recursive split node.

use super::SplitId;
use crate::tab::TabId;
use serde::{Deserialize, Serialize};

/// How a split arranges its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
    Grid,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
            Orientation::Grid => "grid",
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "horizontal" | "h" => Ok(Orientation::Horizontal),
            "vertical" | "v" => Ok(Orientation::Vertical),
            "grid" | "g" => Ok(Orientation::Grid),
            other => Err(format!("unknown orientation '{other}'")),
        }
    }
}

/// Either the tabs a split shows directly, or nested child splits.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitContent {
    Tabs(Vec<TabId>),
    Children(Vec<SplitNode>),
}

/// A region of the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitNode {
    pub id: SplitId,
    pub orientation: Orientation,
    /// Percentage of the parent's area
    pub size: f32,
    pub resizable: bool,
    pub content: SplitContent,
}

/// One visible tab and where it lives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Panel {
    pub split_id: SplitId,
    pub tab_id: TabId,
    /// Share of the whole layout, in percent
    pub relative_size: f32,
}

impl SplitNode {
    /// Create a leaf node holding tabs
    pub fn leaf(id: SplitId, orientation: Orientation, size: f32, tabs: Vec<TabId>) -> Self {
        Self {
            id,
            orientation,
            size,
            resizable: true,
            content: SplitContent::Tabs(tabs),
        }
    }

    /// Create an internal node holding child splits
    pub fn branch(
        id: SplitId,
        orientation: Orientation,
        size: f32,
        children: Vec<SplitNode>,
    ) -> Self {
        Self {
            id,
            orientation,
            size,
            resizable: true,
            content: SplitContent::Children(children),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.content, SplitContent::Tabs(_))
    }

    /// True when no tab remains anywhere in this subtree
    pub fn is_empty(&self) -> bool {
        match &self.content {
            SplitContent::Tabs(tabs) => tabs.is_empty(),
            SplitContent::Children(children) => children.iter().all(SplitNode::is_empty),
        }
    }

    /// All tab IDs in this subtree, in pre-order
    pub fn tab_ids(&self) -> Vec<TabId> {
        match &self.content {
            SplitContent::Tabs(tabs) => tabs.clone(),
            SplitContent::Children(children) => {
                children.iter().flat_map(SplitNode::tab_ids).collect()
            }
        }
    }

    pub fn contains_tab(&self, tab: TabId) -> bool {
        match &self.content {
            SplitContent::Tabs(tabs) => tabs.contains(&tab),
            SplitContent::Children(children) => children.iter().any(|c| c.contains_tab(tab)),
        }
    }

    /// ID of the innermost node that lists `tab`
    pub fn split_of(&self, tab: TabId) -> Option<SplitId> {
        match &self.content {
            SplitContent::Tabs(tabs) => tabs.contains(&tab).then_some(self.id),
            SplitContent::Children(children) => children.iter().find_map(|c| c.split_of(tab)),
        }
    }

    /// Remove `tab` from this subtree, pruning children that become empty.
    ///
    /// Returns true if the tab was found.
    pub fn remove_tab(&mut self, tab: TabId) -> bool {
        match &mut self.content {
            SplitContent::Tabs(tabs) => {
                let before = tabs.len();
                tabs.retain(|t| *t != tab);
                tabs.len() != before
            }
            SplitContent::Children(children) => {
                let mut removed = false;
                for child in children.iter_mut() {
                    removed |= child.remove_tab(tab);
                }
                let before = children.len();
                children.retain(|c| !c.is_empty());
                if children.len() != before {
                    normalize_sizes(children);
                }
                removed
            }
        }
    }

    /// Find a node by ID (recursive)
    pub fn find(&self, id: SplitId) -> Option<&SplitNode> {
        if self.id == id {
            return Some(self);
        }
        match &self.content {
            SplitContent::Tabs(_) => None,
            SplitContent::Children(children) => children.iter().find_map(|c| c.find(id)),
        }
    }

    /// Find a mutable node by ID (recursive)
    pub fn find_mut(&mut self, id: SplitId) -> Option<&mut SplitNode> {
        if self.id == id {
            return Some(self);
        }
        match &mut self.content {
            SplitContent::Tabs(_) => None,
            SplitContent::Children(children) => children.iter_mut().find_map(|c| c.find_mut(id)),
        }
    }

    /// First leaf in pre-order; where new tabs land when this node is targeted
    pub fn first_leaf_mut(&mut self) -> Option<&mut SplitNode> {
        if self.is_leaf() {
            return Some(self);
        }
        match &mut self.content {
            SplitContent::Tabs(_) => None,
            SplitContent::Children(children) => {
                children.iter_mut().find_map(SplitNode::first_leaf_mut)
            }
        }
    }

    /// Append panels for this subtree; `scale` is the parent's share of the whole.
    pub fn collect_panels(&self, scale: f32, out: &mut Vec<Panel>) {
        let share = scale * self.size / 100.0;
        match &self.content {
            SplitContent::Tabs(tabs) => out.extend(tabs.iter().map(|&tab_id| Panel {
                split_id: self.id,
                tab_id,
                relative_size: share,
            })),
            SplitContent::Children(children) => {
                for child in children {
                    child.collect_panels(share, out);
                }
            }
        }
    }

    /// Visit every node in this subtree, in pre-order
    pub fn for_each(&self, f: &mut impl FnMut(&SplitNode)) {
        f(self);
        if let SplitContent::Children(children) = &self.content {
            for child in children {
                child.for_each(f);
            }
        }
    }
}

/// Rescale sibling sizes in proportion so they sum to 100.
pub fn normalize_sizes(nodes: &mut [SplitNode]) {
    if nodes.is_empty() {
        return;
    }
    let total: f32 = nodes.iter().map(|n| n.size).sum();
    if total <= f32::EPSILON {
        let even = 100.0 / nodes.len() as f32;
        for node in nodes.iter_mut() {
            node.size = even;
        }
        return;
    }
    for node in nodes.iter_mut() {
        node.size = node.size * 100.0 / total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SplitNode {
        SplitNode::branch(
            1,
            Orientation::Grid,
            50.0,
            vec![
                SplitNode::leaf(2, Orientation::Horizontal, 60.0, vec![10, 11]),
                SplitNode::leaf(3, Orientation::Horizontal, 40.0, vec![12]),
            ],
        )
    }

    #[test]
    fn test_tab_ids_pre_order() {
        assert_eq!(grid().tab_ids(), vec![10, 11, 12]);
    }

    #[test]
    fn test_split_of_returns_innermost() {
        let node = grid();
        assert_eq!(node.split_of(12), Some(3));
        assert_eq!(node.split_of(99), None);
    }

    #[test]
    fn test_remove_prunes_empty_child() {
        let mut node = grid();
        assert!(node.remove_tab(12));
        match &node.content {
            SplitContent::Children(children) => {
                assert_eq!(children.len(), 1);
                assert!((children[0].size - 100.0).abs() < 1e-4);
            }
            SplitContent::Tabs(_) => panic!("grid became a leaf"),
        }
        assert!(!node.remove_tab(12));
        assert!(node.remove_tab(10));
        assert!(node.remove_tab(11));
        assert!(node.is_empty());
    }

    #[test]
    fn test_panels_scale_by_parent_share() {
        let mut panels = Vec::new();
        grid().collect_panels(100.0, &mut panels);
        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0].split_id, 2);
        assert!((panels[0].relative_size - 30.0).abs() < f32::EPSILON);
        assert!((panels[2].relative_size - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_normalize_sizes_keeps_proportions() {
        let mut nodes = vec![
            SplitNode::leaf(1, Orientation::Vertical, 30.0, vec![1]),
            SplitNode::leaf(2, Orientation::Vertical, 10.0, vec![2]),
        ];
        normalize_sizes(&mut nodes);
        assert!((nodes[0].size - 75.0).abs() < 1e-4);
        assert!((nodes[1].size - 25.0).abs() < 1e-4);

        let mut zeroed = vec![
            SplitNode::leaf(1, Orientation::Vertical, 0.0, vec![1]),
            SplitNode::leaf(2, Orientation::Vertical, 0.0, vec![2]),
        ];
        normalize_sizes(&mut zeroed);
        assert!(zeroed.iter().all(|n| (n.size - 50.0).abs() < 1e-4));
    }

    #[test]
    fn test_orientation_parse() {
        assert_eq!("Grid".parse::<Orientation>(), Ok(Orientation::Grid));
        assert!("diagonal".parse::<Orientation>().is_err());
    }
}
