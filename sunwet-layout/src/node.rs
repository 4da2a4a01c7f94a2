//! Rendered output tree.
//!
//! `RenderNode` is the switchboard between containers and leaves. Each node
//! is owned by exactly one parent and replaced wholesale on re-render; the
//! only in-place edit is splicing a settled result into its loading slot.

use serde::Serialize;
use std::fmt::Write as _;
use sunwet_api::{Axis, Orientation, PlaylistEntry, SizeMode, TransAlign};

use crate::linear::LinearNode;
use crate::table::TableNode;

/// Identifies a pending `DataRows` placeholder within one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlotId(pub u64);

/// A composed piece of output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderNode {
    Linear(LinearNode),
    Table(TableNode),
    Text(TextLeaf),
    Image(ImageLeaf),
    PlayButton(PlayButtonLeaf),
    /// Placeholder for rows that are still resolving.
    Loading { slot: SlotId, align: TransAlign },
    /// A subtree that failed locally.
    Error(ErrorLeaf),
    /// Replaces the whole view when its root can't be rendered.
    ErrorBlock { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLeaf {
    pub text: String,
    /// Navigation target, when the text is a link.
    pub link: Option<String>,
    pub size: Option<String>,
    pub size_mode: SizeMode,
    pub max_extent: Option<Extent>,
    pub orientation: Orientation,
    pub align: TransAlign,
}

/// A size limit along one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extent {
    pub axis: Axis,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageLeaf {
    pub url: String,
    pub width: Option<String>,
    pub height: Option<String>,
    pub align: TransAlign,
}

/// A play control for one playlist entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayButtonLeaf {
    pub entry: PlaylistEntry,
    /// Position in the view's playlist. Reassigned whenever the tree changes.
    pub index: usize,
    pub orientation: Orientation,
    pub align: TransAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorLeaf {
    /// Error category label (`data`, `query`, ...).
    pub kind: String,
    pub message: String,
    pub align: TransAlign,
}

impl RenderNode {
    /// Alignment the node asks of its container.
    pub fn align(&self) -> TransAlign {
        match self {
            RenderNode::Linear(l) => l.align,
            RenderNode::Table(t) => t.align,
            RenderNode::Text(t) => t.align,
            RenderNode::Image(i) => i.align,
            RenderNode::PlayButton(p) => p.align,
            RenderNode::Loading { align, .. } => *align,
            RenderNode::Error(e) => e.align,
            RenderNode::ErrorBlock { .. } => TransAlign::Start,
        }
    }

    /// Text content, for text leaves.
    pub fn text(&self) -> Option<&str> {
        match self {
            RenderNode::Text(t) => Some(&t.text),
            _ => None,
        }
    }

    /// Direct children in screen order.
    pub fn children(&self) -> Vec<&RenderNode> {
        match self {
            RenderNode::Linear(l) => l.children.iter().map(|c| &c.node).collect(),
            RenderNode::Table(t) => t.cells.iter().map(|c| &c.node).collect(),
            _ => Vec::new(),
        }
    }

    /// Pre-order walk in screen order.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a RenderNode)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// All text leaves, in screen order.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.visit(&mut |node| {
            if let Some(text) = node.text() {
                out.push(text);
            }
        });
        out
    }

    /// Slots still waiting on data.
    pub fn pending_slots(&self) -> Vec<SlotId> {
        let mut out = Vec::new();
        self.visit(&mut |node| {
            if let RenderNode::Loading { slot, .. } = node {
                out.push(*slot);
            }
        });
        out
    }

    /// Pre-order walk in reading order: a reversed line is walked from its
    /// last screen child, a table by data row then element.
    pub fn visit_reading_mut(&mut self, f: &mut impl FnMut(&mut RenderNode)) {
        f(self);
        match self {
            RenderNode::Linear(l) => {
                if l.direction.is_reversed() {
                    for child in l.children.iter_mut().rev() {
                        child.node.visit_reading_mut(f);
                    }
                } else {
                    for child in l.children.iter_mut() {
                        child.node.visit_reading_mut(f);
                    }
                }
            }
            RenderNode::Table(t) => {
                let mut order: Vec<usize> = (0..t.cells.len()).collect();
                order.sort_by_key(|&i| (t.cells[i].logical_row, t.cells[i].logical_column));
                for i in order {
                    t.cells[i].node.visit_reading_mut(f);
                }
            }
            _ => {}
        }
    }

    fn slot_mut(&mut self, slot: SlotId) -> Option<&mut RenderNode> {
        if matches!(self, RenderNode::Loading { slot: s, .. } if *s == slot) {
            return Some(self);
        }
        match self {
            RenderNode::Linear(l) => l.children.iter_mut().find_map(|c| c.node.slot_mut(slot)),
            RenderNode::Table(t) => t.cells.iter_mut().find_map(|c| c.node.slot_mut(slot)),
            _ => None,
        }
    }

    /// Replace the placeholder for `slot` with `node`.
    ///
    /// Gives `node` back if the slot isn't in this tree (e.g. an enclosing
    /// subtree was already replaced).
    pub fn splice(&mut self, slot: SlotId, node: RenderNode) -> Result<(), RenderNode> {
        match self.slot_mut(slot) {
            Some(target) => {
                *target = node;
                Ok(())
            }
            None => Err(node),
        }
    }

    /// Indented, human-readable dump of the tree.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0, "");
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize, label: &str) {
        let indent = "  ".repeat(depth);
        let _ = match self {
            RenderNode::Linear(l) => writeln!(out, "{}{}linear {}", indent, label, l.direction.label()),
            RenderNode::Table(t) => writeln!(
                out,
                "{}{}table {} {}x{}",
                indent,
                label,
                t.orientation.label(),
                t.grid_rows,
                t.grid_columns
            ),
            RenderNode::Text(t) => match &t.link {
                Some(link) => writeln!(out, "{}{}text {:?} -> {}", indent, label, t.text, link),
                None => writeln!(out, "{}{}text {:?}", indent, label, t.text),
            },
            RenderNode::Image(i) => writeln!(out, "{}{}image {}", indent, label, i.url),
            RenderNode::PlayButton(p) => writeln!(out, "{}{}play #{} {}", indent, label, p.index, p.entry.file),
            RenderNode::Loading { slot, .. } => writeln!(out, "{}{}loading #{}", indent, label, slot.0),
            RenderNode::Error(e) => writeln!(out, "{}{}error ({}): {}", indent, label, e.kind, e.message),
            RenderNode::ErrorBlock { message } => writeln!(out, "{}{}error block: {}", indent, label, message),
        };
        match self {
            RenderNode::Linear(l) => {
                for child in &l.children {
                    child.node.write_outline(out, depth + 1, "");
                }
            }
            RenderNode::Table(t) => {
                for cell in &t.cells {
                    let label = format!("[{},{}] ", cell.row, cell.column);
                    cell.node.write_outline(out, depth + 1, &label);
                }
            }
            _ => {}
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;
    use sunwet_api::Direction;

    #[test]
    fn test_splice_replaces_nested_slot() {
        let inner = LinearNode::build(Direction::Right, TransAlign::Start, vec![text("a"), loading(7)]);
        let mut root = RenderNode::Linear(LinearNode::build(
            Direction::Down,
            TransAlign::Start,
            vec![RenderNode::Linear(inner), loading(3)],
        ));
        assert_eq!(root.pending_slots(), vec![SlotId(7), SlotId(3)]);

        root.splice(SlotId(7), text("b")).unwrap();
        assert_eq!(root.texts(), vec!["a", "b"]);
        assert_eq!(root.pending_slots(), vec![SlotId(3)]);
    }

    #[test]
    fn test_splice_unknown_slot_returns_node() {
        let mut root = text("a");
        let back = root.splice(SlotId(1), text("b")).unwrap_err();
        assert_eq!(back.text(), Some("b"));
        assert_eq!(root.text(), Some("a"));
    }

    #[test]
    fn test_reading_walk_follows_direction() {
        let mut root = RenderNode::Linear(LinearNode::build(
            Direction::Up,
            TransAlign::Start,
            vec![text("A"), text("B"), text("C")],
        ));
        let mut seen = Vec::new();
        root.visit_reading_mut(&mut |node| {
            if let Some(text) = node.text() {
                seen.push(text.to_string());
            }
        });
        assert_eq!(seen, vec!["A", "B", "C"]);
        assert_eq!(root.texts(), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_reading_walk_orders_table_by_data_row() {
        let rows = vec![vec![text("a0"), text("a1")], vec![text("b0"), text("b1")]];
        let mut root = RenderNode::Table(TableNode::build(Orientation::UpLeft, TransAlign::Start, 2, rows).unwrap());
        let mut seen = Vec::new();
        root.visit_reading_mut(&mut |node| {
            if let Some(text) = node.text() {
                seen.push(text.to_string());
            }
        });
        assert_eq!(seen, vec!["a0", "a1", "b0", "b1"]);
        assert_eq!(root.texts(), vec!["b1", "b0", "a1", "a0"]);
    }

    #[test]
    fn test_outline() {
        let root = RenderNode::Linear(LinearNode::build(
            Direction::Down,
            TransAlign::Start,
            vec![text("Album"), loading(0)],
        ));
        assert_eq!(root.outline(), "linear down\n  text \"Album\"\n  loading #0\n");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(text("x")).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["text"], "x");
    }
}
