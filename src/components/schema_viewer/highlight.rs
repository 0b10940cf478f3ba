//! Reference-counted highlight propagation.
//!
//! Every edge and node owns a [`TagSet`] naming the interactions that currently
//! highlight it. An edge is active, and a node related, exactly while its set
//! is non-empty, so tearing down one interaction never clears a highlight that
//! another interaction still holds. Fading is derived from these sets on
//! demand and never stored.

use log::{debug, warn};

use super::index::{EdgeIdx, GraphIndex, NodeIdx};
use super::selection::SelectionState;
use super::tags::{SourceTag, TagSet};

/// Source-tag sets for every edge and node, plus pending draw-order raises.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	edge_sources: Vec<TagSet>,
	node_sources: Vec<TagSet>,
	/// Edges to move to the top of their layer, oldest first.
	raised: Vec<EdgeIdx>,
}

impl HighlightState {
	/// Empty tag sets sized to `index`.
	pub fn new(index: &GraphIndex) -> Self {
		Self {
			edge_sources: vec![TagSet::default(); index.edge_count()],
			node_sources: vec![TagSet::default(); index.node_count()],
			raised: Vec::new(),
		}
	}

	/// Highlight every relation of the tag's table (or `table.column`) and the
	/// tables at their far ends.
	///
	/// Focusing an already-focused tag changes nothing but draw order.
	pub fn focus(&mut self, index: &GraphIndex, tag: &SourceTag) {
		let table = tag.table_name();
		let edges = index.edges_touching(table, tag.column_name());
		debug!("schema-viewer: focus `{tag}` on {} edge(s)", edges.len());

		for edge in edges {
			self.raise(edge);
			self.edge_sources[edge.0].insert(tag);

			let other = match index.other_endpoint(edge, table) {
				Ok(other) => other,
				Err(err) => {
					if cfg!(debug_assertions) {
						panic!("schema-viewer: {err}");
					}
					warn!("schema-viewer: {err}");
					continue;
				}
			};
			if let Some(node) = index.edge(edge).endpoint_node(other) {
				self.node_sources[node.0].insert(tag);
			}
		}
	}

	/// Withdraw `tag` unless the element that owns it is pinned.
	///
	/// Returns `true` if anything was cleared.
	pub fn unfocus(
		&mut self,
		index: &GraphIndex,
		selection: &SelectionState,
		tag: &SourceTag,
	) -> bool {
		if selection.pins(tag, index) {
			debug!("schema-viewer: `{tag}` is pinned, keeping its highlight");
			return false;
		}
		self.release(tag)
	}

	/// Withdraw `tag` from every edge and node regardless of pins.
	///
	/// Returns `true` if the tag was present anywhere. Unknown tags are a no-op.
	pub fn release(&mut self, tag: &SourceTag) -> bool {
		let mut removed = false;
		for set in self.edge_sources.iter_mut().chain(self.node_sources.iter_mut()) {
			removed |= set.remove(tag);
		}
		if removed {
			debug!("schema-viewer: released `{tag}`");
		}
		removed
	}

	/// Queue `edge` to be drawn above every other edge.
	pub fn raise(&mut self, edge: EdgeIdx) {
		self.raised.retain(|&e| e != edge);
		self.raised.push(edge);
	}

	/// Drain queued raises in the order they should be applied.
	pub fn take_raised(&mut self) -> Vec<EdgeIdx> {
		std::mem::take(&mut self.raised)
	}

	/// The edge is highlighted by at least one tag.
	pub fn is_active(&self, edge: EdgeIdx) -> bool {
		!self.edge_sources(edge).is_empty()
	}

	/// The node sits at the far end of a highlighted edge.
	pub fn is_related(&self, node: NodeIdx) -> bool {
		!self.node_sources(node).is_empty()
	}

	/// Tags currently highlighting `edge`.
	pub fn edge_sources(&self, edge: EdgeIdx) -> &TagSet {
		&self.edge_sources[edge.0]
	}

	/// Tags currently relating `node`.
	pub fn node_sources(&self, node: NodeIdx) -> &TagSet {
		&self.node_sources[node.0]
	}

	/// Some node anywhere is related.
	pub fn any_related(&self) -> bool {
		self.node_sources.iter().any(|set| !set.is_empty())
	}

	/// A node fades while something else is related and it is neither related,
	/// hovered, nor excluded.
	pub fn is_faded(&self, node: NodeIdx, selection: &SelectionState) -> bool {
		let sel = selection.node(node);
		self.any_related() && !self.is_related(node) && !sel.hovered && !sel.excluded
	}

	/// The full fade sweep: every node that is currently faded.
	pub fn faded_nodes(&self, index: &GraphIndex, selection: &SelectionState) -> Vec<NodeIdx> {
		if !self.any_related() {
			return Vec::new();
		}
		index
			.nodes()
			.map(|node| node.idx)
			.filter(|&idx| self.is_faded(idx, selection))
			.collect()
	}

	/// Drop every tag and pending raise.
	pub fn reset(&mut self) {
		for set in self.edge_sources.iter_mut().chain(self.node_sources.iter_mut()) {
			set.clear();
		}
		self.raised.clear();
	}

	/// No tag is held anywhere.
	pub fn is_pristine(&self) -> bool {
		self.edge_sources
			.iter()
			.chain(self.node_sources.iter())
			.all(TagSet::is_empty)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::schema_viewer::types::{GraphData, RelationSpec, TableSpec};
	use proptest::prelude::*;

	fn shop() -> GraphIndex {
		GraphIndex::new(&GraphData {
			tables: vec![
				TableSpec::new("orders", ["id", "customer_id", "product_id"]),
				TableSpec::new("customers", ["id"]),
				TableSpec::new("products", ["id", "vendor_id"]),
				TableSpec::new("vendors", ["id"]),
				TableSpec::new("archive", ["id"]),
			],
			relations: vec![
				RelationSpec::new("orders", "customer_id", "customers", "id"),
				RelationSpec::new("orders", "product_id", "products", "id"),
				RelationSpec::new("products", "vendor_id", "vendors", "id"),
			],
		})
	}

	fn node(index: &GraphIndex, name: &str) -> NodeIdx {
		index.node_by_name(name).unwrap().idx
	}

	#[test]
	fn focus_twice_equals_focus_once() {
		let index = shop();
		let tag = SourceTag::table("orders");
		let mut once = HighlightState::new(&index);
		once.focus(&index, &tag);
		let mut twice = once.clone();
		twice.focus(&index, &tag);

		for edge in index.edges() {
			assert_eq!(once.edge_sources(edge.idx), twice.edge_sources(edge.idx));
		}
		for n in index.nodes() {
			assert_eq!(once.node_sources(n.idx), twice.node_sources(n.idx));
		}
	}

	#[test]
	fn shared_edge_stays_active_until_every_tag_leaves() {
		let index = shop();
		let selection = SelectionState::new(&index);
		let mut state = HighlightState::new(&index);
		let a = SourceTag::table("orders");
		let b = SourceTag::column("customers", "id");

		state.focus(&index, &a);
		state.focus(&index, &b);
		assert!(state.is_active(EdgeIdx(0)));

		assert!(state.unfocus(&index, &selection, &a));
		assert!(state.is_active(EdgeIdx(0)));
		assert!(!state.is_active(EdgeIdx(1)));
		assert!(state.is_related(node(&index, "orders")));

		assert!(state.unfocus(&index, &selection, &b));
		assert!(!state.is_active(EdgeIdx(0)));
		assert!(state.is_pristine());
	}

	#[test]
	fn unfocus_of_unknown_tag_is_noop() {
		let index = shop();
		let selection = SelectionState::new(&index);
		let mut state = HighlightState::new(&index);
		state.focus(&index, &SourceTag::table("orders"));
		let before = state.clone();
		assert!(!state.unfocus(&index, &selection, &SourceTag::table("vendors")));
		assert!(!state.unfocus(&index, &selection, &SourceTag::table("nowhere")));
		for edge in index.edges() {
			assert_eq!(before.edge_sources(edge.idx), state.edge_sources(edge.idx));
		}
	}

	#[test]
	fn pinned_owner_survives_unfocus() {
		let index = shop();
		let mut selection = SelectionState::new(&index);
		let mut state = HighlightState::new(&index);
		let orders = SourceTag::table("orders");
		selection.node_mut(node(&index, "orders")).pinned = true;

		state.focus(&index, &orders);
		assert!(!state.unfocus(&index, &selection, &orders));
		assert!(state.is_active(EdgeIdx(0)));
		assert!(state.is_related(node(&index, "customers")));

		assert!(state.release(&orders));
		assert!(!state.is_active(EdgeIdx(0)));
	}

	#[test]
	fn column_focus_only_follows_that_column() {
		let index = shop();
		let mut state = HighlightState::new(&index);
		state.focus(&index, &SourceTag::column("orders", "product_id"));
		assert!(!state.is_active(EdgeIdx(0)));
		assert!(state.is_active(EdgeIdx(1)));
		assert!(state.is_related(node(&index, "products")));
		assert!(!state.is_related(node(&index, "customers")));
	}

	#[test]
	fn fade_sweep_spares_related_hovered_and_excluded() {
		let index = shop();
		let mut selection = SelectionState::new(&index);
		let mut state = HighlightState::new(&index);
		assert!(state.faded_nodes(&index, &selection).is_empty());

		selection.node_mut(node(&index, "orders")).hovered = true;
		selection.node_mut(node(&index, "archive")).excluded = true;
		state.focus(&index, &SourceTag::table("orders"));

		assert_eq!(state.faded_nodes(&index, &selection), vec![node(&index, "vendors")]);
	}

	#[test]
	fn raise_keeps_latest_order() {
		let index = shop();
		let mut state = HighlightState::new(&index);
		state.raise(EdgeIdx(1));
		state.raise(EdgeIdx(0));
		state.raise(EdgeIdx(1));
		assert_eq!(state.take_raised(), vec![EdgeIdx(0), EdgeIdx(1)]);
		assert!(state.take_raised().is_empty());
	}

	fn tag_strategy() -> impl Strategy<Value = SourceTag> {
		prop_oneof![
			Just(SourceTag::table("orders")),
			Just(SourceTag::table("customers")),
			Just(SourceTag::table("products")),
			Just(SourceTag::table("vendors")),
			Just(SourceTag::column("orders", "customer_id")),
			Just(SourceTag::column("products", "id")),
			Just(SourceTag::column("customers", "id")),
		]
	}

	proptest! {
		#[test]
		fn active_edges_track_live_tags(
			ops in prop::collection::vec((any::<bool>(), tag_strategy()), 0..40),
			hovered in prop::collection::vec(any::<bool>(), 5),
		) {
			let index = shop();
			let mut selection = SelectionState::new(&index);
			for (i, &h) in hovered.iter().enumerate() {
				selection.node_mut(NodeIdx(i)).hovered = h;
			}
			let mut state = HighlightState::new(&index);
			let mut live: Vec<SourceTag> = Vec::new();

			for (add, tag) in ops {
				if add {
					state.focus(&index, &tag);
					if !live.contains(&tag) {
						live.push(tag);
					}
				} else {
					state.unfocus(&index, &selection, &tag);
					live.retain(|t| *t != tag);
				}

				for edge in index.edges() {
					let expected = live.iter().any(|t| {
						index.edges_touching(t.table_name(), t.column_name()).contains(&edge.idx)
					});
					prop_assert_eq!(state.is_active(edge.idx), expected);
				}

				let any_related = index.nodes().any(|n| state.is_related(n.idx));
				for n in index.nodes() {
					let sel = selection.node(n.idx);
					let expected = any_related && !state.is_related(n.idx) && !sel.hovered && !sel.excluded;
					prop_assert_eq!(state.is_faded(n.idx, &selection), expected);
				}
			}
		}
	}
}
