//! Class names and attributes the viewer writes onto the diagram markup.
//!
//! Each interaction state maps to exactly one class or attribute; the
//! stylesheet decides what they look like.

use serde::Deserialize;

use super::state::{ColumnView, EdgeView, NodeView};

/// Class/attribute names for every display state.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Theme {
	/// Edge highlighted by at least one source.
	pub active: String,
	/// Table reached over an active edge.
	pub related: String,
	/// Table dimmed while others are related.
	pub faded: String,
	/// Hovered or pinned element.
	pub hovered: String,
	/// Table marked for removal from the next render.
	pub excluded: String,
	/// Pointer over any part of a table.
	pub pointer_over: String,
	/// Attribute set to `1` on pinned elements.
	pub pinned_attribute: String,
	/// SVG `cursor` value for edges.
	pub edge_cursor: String,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			active: "active".into(),
			related: "related-table".into(),
			faded: "faded".into(),
			hovered: "hovered".into(),
			excluded: "unwanted".into(),
			pointer_over: "mouseover".into(),
			pinned_attribute: "data-clicked".into(),
			edge_cursor: "pointer".into(),
		}
	}
}

impl Theme {
	/// `(class, present)` pairs for a table node.
	pub fn node_classes<'a>(&'a self, view: &NodeView) -> [(&'a str, bool); 5] {
		[
			(self.hovered.as_str(), view.hovered),
			(self.related.as_str(), view.related),
			(self.faded.as_str(), view.faded),
			(self.excluded.as_str(), view.excluded),
			(self.pointer_over.as_str(), view.pointer_over),
		]
	}

	/// `(class, present)` pairs for a column label.
	pub fn column_classes<'a>(&'a self, view: &ColumnView) -> [(&'a str, bool); 1] {
		[(self.hovered.as_str(), view.hovered)]
	}

	/// `(class, present)` pairs for an edge.
	pub fn edge_classes<'a>(&'a self, view: &EdgeView) -> [(&'a str, bool); 2] {
		[(self.active.as_str(), view.active), (self.hovered.as_str(), view.hovered)]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_classes_map_one_to_one() {
		let theme = Theme::default();
		let view = NodeView {
			related: true,
			excluded: true,
			..NodeView::default()
		};
		let on: Vec<&str> = theme
			.node_classes(&view)
			.into_iter()
			.filter(|(_, present)| *present)
			.map(|(class, _)| class)
			.collect();
		assert_eq!(on, vec!["related-table", "unwanted"]);
	}

	#[test]
	fn partial_override_keeps_defaults() {
		let theme: Theme = serde_json::from_str(r#"{ "faded": "dim" }"#).unwrap();
		assert_eq!(theme.faded, "dim");
		assert_eq!(theme.active, "active");
	}
}
