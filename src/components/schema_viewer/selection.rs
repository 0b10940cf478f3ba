//! Pinned, hovered, and excluded state for every element of the diagram.

use super::index::{ColumnIdx, EdgeIdx, GraphIndex, NodeIdx};
use super::tags::SourceTag;

/// Live modifier keys, as last reported by the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
	/// Ctrl is held.
	pub ctrl: bool,
	/// Shift is held.
	pub shift: bool,
}

/// What a click on a table label means under the current modifiers.
///
/// Ctrl+Shift takes precedence over Shift, which takes precedence over a plain
/// click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickIntent {
	/// Drop the table from the rendered subgraph and navigate.
	Exclude,
	/// Re-render around this table only and navigate.
	FocusOnly,
	/// Toggle the pin locally. `ctrl` marks a newly pinned table as excluded.
	TogglePin {
		/// Ctrl was held.
		ctrl: bool,
	},
}

impl ClickIntent {
	/// Resolve the click meaning for the held modifiers.
	pub fn from_modifiers(modifiers: Modifiers) -> Self {
		match (modifiers.ctrl, modifiers.shift) {
			(true, true) => Self::Exclude,
			(false, true) => Self::FocusOnly,
			(ctrl, false) => Self::TogglePin { ctrl },
		}
	}
}

/// Interaction state of one table node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeSelection {
	/// Hovered, or restored as if hovered.
	pub hovered: bool,
	/// Clicked without modifiers, or with Ctrl.
	pub pinned: bool,
	/// Ctrl-clicked; ignores hover until clicked again.
	pub excluded: bool,
	/// Pointer is over some part of the node. Cosmetic only.
	pub pointer_over: bool,
}

impl NodeSelection {
	/// No hover, pin, or exclusion. The pointer may still be over the node.
	fn is_clear(&self) -> bool {
		!self.hovered && !self.pinned && !self.excluded
	}
}

/// Interaction state of one column label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnSelection {
	/// Pointer is over the label, or it is pinned.
	pub hovered: bool,
	/// Clicked.
	pub pinned: bool,
}

/// Interaction state of one relation edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeSelection {
	/// Pointer is over the edge, or it is pinned.
	pub hovered: bool,
	/// Clicked.
	pub pinned: bool,
}

/// Per-element selection, indexed in step with [`GraphIndex`].
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
	nodes: Vec<NodeSelection>,
	columns: Vec<ColumnSelection>,
	edges: Vec<EdgeSelection>,
}

impl SelectionState {
	/// One cleared entry per element of `index`.
	pub fn new(index: &GraphIndex) -> Self {
		Self {
			nodes: vec![NodeSelection::default(); index.node_count()],
			columns: vec![ColumnSelection::default(); index.column_count()],
			edges: vec![EdgeSelection::default(); index.edge_count()],
		}
	}

	/// State of a table node.
	pub fn node(&self, idx: NodeIdx) -> &NodeSelection {
		&self.nodes[idx.0]
	}

	/// Mutable state of a table node.
	pub fn node_mut(&mut self, idx: NodeIdx) -> &mut NodeSelection {
		&mut self.nodes[idx.0]
	}

	/// State of a column label.
	pub fn column(&self, idx: ColumnIdx) -> &ColumnSelection {
		&self.columns[idx.0]
	}

	/// Mutable state of a column label.
	pub fn column_mut(&mut self, idx: ColumnIdx) -> &mut ColumnSelection {
		&mut self.columns[idx.0]
	}

	/// State of an edge.
	pub fn edge(&self, idx: EdgeIdx) -> &EdgeSelection {
		&self.edges[idx.0]
	}

	/// Mutable state of an edge.
	pub fn edge_mut(&mut self, idx: EdgeIdx) -> &mut EdgeSelection {
		&mut self.edges[idx.0]
	}

	/// Whether the element that owns `tag` is pinned, so its highlight must
	/// survive a hover-exit.
	pub fn pins(&self, tag: &SourceTag, index: &GraphIndex) -> bool {
		match tag {
			SourceTag::Table(table) => index
				.node_by_name(table)
				.is_some_and(|node| self.node(node.idx).pinned),
			SourceTag::Column { table, column } => index
				.column_by_name(table, column)
				.is_some_and(|col| self.column(col.idx).pinned),
		}
	}

	/// Tables the user is looking at: hovered or pinned, and not excluded.
	pub fn wanted<'a>(&self, index: &'a GraphIndex) -> Vec<&'a str> {
		index
			.nodes()
			.filter(|node| {
				let sel = self.node(node.idx);
				(sel.hovered || sel.pinned) && !sel.excluded
			})
			.map(|node| node.name.as_str())
			.collect()
	}

	/// Tables marked to be hidden, in diagram order.
	pub fn excluded<'a>(&self, index: &'a GraphIndex) -> Vec<&'a str> {
		index
			.nodes()
			.filter(|node| self.node(node.idx).excluded)
			.map(|node| node.name.as_str())
			.collect()
	}

	/// Pinned tables, in diagram order.
	pub fn pinned<'a>(&self, index: &'a GraphIndex) -> Vec<&'a str> {
		index
			.nodes()
			.filter(|node| self.node(node.idx).pinned)
			.map(|node| node.name.as_str())
			.collect()
	}

	/// Back to the freshly bound state, keeping `pointer_over`.
	pub fn reset(&mut self) {
		for node in &mut self.nodes {
			*node = NodeSelection {
				pointer_over: node.pointer_over,
				..NodeSelection::default()
			};
		}
		self.columns.fill(ColumnSelection::default());
		self.edges.fill(EdgeSelection::default());
	}

	/// Nothing hovered, pinned, or excluded.
	pub fn is_pristine(&self) -> bool {
		self.nodes.iter().all(NodeSelection::is_clear)
			&& self.columns.iter().all(|s| *s == ColumnSelection::default())
			&& self.edges.iter().all(|s| *s == EdgeSelection::default())
	}
}
