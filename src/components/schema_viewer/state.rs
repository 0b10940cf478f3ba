//! Diagram interaction state and event handling.
//!
//! Combines the element index with selection, highlight, and keyboard state.
//! Each handler runs to completion and leaves the state consistent; the DOM
//! layer then mirrors [`NodeView`]/[`ColumnView`]/[`EdgeView`] onto the markup
//! and follows any returned [`Navigation`].

use std::collections::HashSet;

use log::{debug, info};

use super::commands::{Command, KeyInput, KeyboardState};
use super::highlight::HighlightState;
use super::index::{ColumnIdx, EdgeIdx, GraphIndex, NodeIdx};
use super::query::{
	DEGREES_OF_SEPARATION, QueryParams, SKIP_RESULT_SOURCE_NAMES, WANTED_RESULT_SOURCE_NAMES,
};
use super::selection::{ClickIntent, SelectionState};
use super::tags::SourceTag;
use super::types::GraphData;

/// A full-page navigation to a new query string. Terminal for the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
	/// Query string to load, starting with `?`.
	pub url: String,
}

impl Navigation {
	fn to(params: &QueryParams) -> Self {
		let url = params.to_query_string();
		info!("schema-viewer: navigating to {url}");
		Self { url }
	}
}

/// Display state of one table node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeView {
	/// The table's own relations are highlighted.
	pub hovered: bool,
	/// Clicked; survives pointer leave.
	pub pinned: bool,
	/// Marked to be hidden on the next zoom.
	pub excluded: bool,
	/// At the far end of a highlighted relation.
	pub related: bool,
	/// Dimmed while something else is related.
	pub faded: bool,
	/// Pointer is somewhere over the node.
	pub pointer_over: bool,
}

/// Display state of one column label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnView {
	/// The column's relations are highlighted.
	pub hovered: bool,
	/// Clicked; survives pointer leave.
	pub pinned: bool,
}

/// Display state of one relation edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeView {
	/// At least one interaction highlights this edge.
	pub active: bool,
	/// Pointer is over the edge, or it is pinned.
	pub hovered: bool,
	/// Clicked; survives pointer leave.
	pub pinned: bool,
}

/// Snapshot of the selection for the status overlay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSummary {
	/// Pinned tables, in diagram order.
	pub pinned: Vec<String>,
	/// Tables marked to be hidden, in diagram order.
	pub excluded: Vec<String>,
	/// `degrees_of_separation` from the page's query string.
	pub degrees_of_separation: Option<String>,
}

/// Everything the viewer knows about the diagram on this page.
///
/// Created once when the diagram is bound; discarded by navigation.
pub struct DiagramState {
	/// Tables, columns, and relations of the diagram.
	pub index: GraphIndex,
	/// Which interactions highlight which edges and nodes.
	pub highlight: HighlightState,
	/// Hover, pin, and exclusion flags.
	pub selection: SelectionState,
	/// Held modifier keys.
	pub keyboard: KeyboardState,
	/// Query string the page was loaded with.
	search: String,
}

impl DiagramState {
	/// Index `data` and start with nothing selected.
	pub fn new(data: &GraphData, search: impl Into<String>) -> Self {
		Self::from_index(GraphIndex::new(data), search)
	}

	/// Start with nothing selected over an existing index.
	pub fn from_index(index: GraphIndex, search: impl Into<String>) -> Self {
		Self {
			highlight: HighlightState::new(&index),
			selection: SelectionState::new(&index),
			keyboard: KeyboardState::default(),
			search: search.into(),
			index,
		}
	}

	/// Freshly parsed parameters of the current page.
	pub fn params(&self) -> QueryParams {
		QueryParams::parse(&self.search)
	}

	/// Highlight the relations of `tag`.
	pub fn focus(&mut self, tag: &SourceTag) {
		self.highlight.focus(&self.index, tag);
	}

	/// Withdraw `tag` unless its owner is pinned.
	pub fn unfocus(&mut self, tag: &SourceTag) -> bool {
		self.highlight.unfocus(&self.index, &self.selection, tag)
	}

	fn table_tag(&self, node: NodeIdx) -> SourceTag {
		SourceTag::table(&self.index.node(node).name)
	}

	fn column_tag(&self, column: ColumnIdx) -> SourceTag {
		let column = self.index.column(column);
		SourceTag::column(&self.index.node(column.node).name, &column.name)
	}

	/// Pointer entered a table's name label.
	pub fn table_enter(&mut self, node: NodeIdx) {
		let sel = self.selection.node_mut(node);
		if sel.excluded {
			return;
		}
		sel.hovered = true;
		let tag = self.table_tag(node);
		self.focus(&tag);
	}

	/// Pointer left a table's name label. Pinned tables keep their highlight.
	pub fn table_leave(&mut self, node: NodeIdx) {
		let sel = self.selection.node_mut(node);
		if sel.excluded {
			sel.hovered = false;
		}
		if sel.pinned {
			return;
		}
		sel.hovered = false;
		let tag = self.table_tag(node);
		self.unfocus(&tag);
	}

	/// Click on a table's name label under the current modifiers.
	pub fn table_click(&mut self, node: NodeIdx) -> Option<Navigation> {
		let name = self.index.node(node).name.clone();
		match ClickIntent::from_modifiers(self.keyboard.modifiers()) {
			ClickIntent::Exclude => {
				let mut params = self.params();
				params.push_to_list(SKIP_RESULT_SOURCE_NAMES, &name);
				Some(Navigation::to(&params))
			}
			ClickIntent::FocusOnly => {
				let mut params = self.params();
				params.set(WANTED_RESULT_SOURCE_NAMES, name);
				Some(Navigation::to(&params))
			}
			ClickIntent::TogglePin { ctrl } => {
				self.toggle_pin(node, ctrl);
				None
			}
		}
	}

	fn toggle_pin(&mut self, node: NodeIdx, ctrl: bool) {
		let tag = self.table_tag(node);
		let sel = self.selection.node_mut(node);
		sel.pinned = !sel.pinned;
		debug!(
			"schema-viewer: `{tag}` {}",
			if sel.pinned { "pinned" } else { "unpinned" }
		);

		if ctrl && sel.pinned {
			sel.excluded = true;
			sel.hovered = false;
			self.highlight.release(&tag);
		} else {
			sel.excluded = false;
			self.focus(&tag);
		}
	}

	/// Pointer entered any part of a node.
	pub fn node_pointer_enter(&mut self, node: NodeIdx) {
		self.selection.node_mut(node).pointer_over = true;
	}

	/// Pointer left the node entirely.
	pub fn node_pointer_leave(&mut self, node: NodeIdx) {
		self.selection.node_mut(node).pointer_over = false;
	}

	/// Pointer entered a column label.
	pub fn column_enter(&mut self, column: ColumnIdx) {
		self.selection.column_mut(column).hovered = true;
		let tag = self.column_tag(column);
		let params = self.params();
		debug!(
			"schema-viewer: hovering `{tag}` (degrees_of_separation={:?}, wanted={:?})",
			params.get(DEGREES_OF_SEPARATION),
			params.get(WANTED_RESULT_SOURCE_NAMES),
		);
		self.focus(&tag);
	}

	/// Pointer left a column label. Pinned columns keep their highlight.
	pub fn column_leave(&mut self, column: ColumnIdx) {
		let sel = self.selection.column_mut(column);
		if sel.pinned {
			return;
		}
		sel.hovered = false;
		let tag = self.column_tag(column);
		self.unfocus(&tag);
	}

	/// Toggle a column's pin.
	pub fn column_click(&mut self, column: ColumnIdx) {
		let sel = self.selection.column_mut(column);
		sel.pinned = !sel.pinned;
	}

	/// Pointer entered an edge; it is drawn on top.
	pub fn edge_enter(&mut self, edge: EdgeIdx) {
		self.selection.edge_mut(edge).hovered = true;
		self.highlight.raise(edge);
	}

	/// Pointer left an edge. Pinned edges stay hovered.
	pub fn edge_leave(&mut self, edge: EdgeIdx) {
		let sel = self.selection.edge_mut(edge);
		if !sel.pinned {
			sel.hovered = false;
		}
	}

	/// Toggle an edge's pin.
	pub fn edge_click(&mut self, edge: EdgeIdx) {
		let sel = self.selection.edge_mut(edge);
		sel.pinned = !sel.pinned;
	}

	/// Track modifiers from a keydown event.
	pub fn key_down(&mut self, input: &KeyInput) {
		self.keyboard.key_down(input);
	}

	/// Run the command a keyup event maps to, if any.
	pub fn key_up(&mut self, input: &KeyInput) -> Option<Navigation> {
		let command = self.keyboard.key_up(input)?;
		self.run(command)
	}

	/// Execute `command`. Everything but [`Command::Reset`] navigates.
	pub fn run(&mut self, command: Command) -> Option<Navigation> {
		match command {
			Command::Reset => {
				self.reset();
				None
			}
			Command::Zoom => {
				let mut params = self.params();
				let wanted = self.selection.wanted(&self.index);
				if !wanted.is_empty() {
					params.set_list(WANTED_RESULT_SOURCE_NAMES, wanted);
				}
				for name in self.selection.excluded(&self.index) {
					params.push_to_list(SKIP_RESULT_SOURCE_NAMES, name);
				}
				Some(Navigation::to(&params))
			}
			Command::ShowAll => Some(Navigation::to(&QueryParams::default())),
			Command::Degrees(digit) => {
				let mut params = self.params();
				params.set(DEGREES_OF_SEPARATION, digit.to_string());
				Some(Navigation::to(&params))
			}
		}
	}

	/// Clear every pin, hover, exclusion, and highlight source.
	///
	/// Whether the pointer is over a node is left as is.
	pub fn reset(&mut self) {
		self.highlight.reset();
		self.selection.reset();
		debug!("schema-viewer: view reset");
	}

	/// Re-establish focus for the tables named in `wanted_result_source_names`,
	/// as if each had been hovered and clicked in turn. Names missing from the
	/// diagram are skipped, and a repeated name is restored once.
	pub fn restore_from_query(&mut self) {
		let mut restored = HashSet::new();
		for name in self.params().list(WANTED_RESULT_SOURCE_NAMES) {
			if !restored.insert(name.clone()) {
				continue;
			}
			let Some(node) = self.index.node_by_name(&name).map(|n| n.idx) else {
				debug!("schema-viewer: wanted table `{name}` is not in the diagram");
				continue;
			};
			self.table_enter(node);
			self.toggle_pin(node, false);
		}
	}

	/// Display state of a table node.
	pub fn node_view(&self, node: NodeIdx) -> NodeView {
		let sel = self.selection.node(node);
		NodeView {
			hovered: sel.hovered,
			pinned: sel.pinned,
			excluded: sel.excluded,
			related: self.highlight.is_related(node),
			faded: self.highlight.is_faded(node, &self.selection),
			pointer_over: sel.pointer_over,
		}
	}

	/// Display state of a column label.
	pub fn column_view(&self, column: ColumnIdx) -> ColumnView {
		let sel = self.selection.column(column);
		ColumnView {
			hovered: sel.hovered,
			pinned: sel.pinned,
		}
	}

	/// Display state of an edge.
	pub fn edge_view(&self, edge: EdgeIdx) -> EdgeView {
		let sel = self.selection.edge(edge);
		EdgeView {
			active: self.highlight.is_active(edge),
			hovered: sel.hovered,
			pinned: sel.pinned,
		}
	}

	/// Edges to redraw on top, in order.
	pub fn take_raised(&mut self) -> Vec<EdgeIdx> {
		self.highlight.take_raised()
	}

	/// Snapshot for the status overlay.
	pub fn summary(&self) -> SelectionSummary {
		SelectionSummary {
			pinned: to_owned(self.selection.pinned(&self.index)),
			excluded: to_owned(self.selection.excluded(&self.index)),
			degrees_of_separation: self.params().get(DEGREES_OF_SEPARATION).map(str::to_owned),
		}
	}

	/// No pins, hovers, exclusions, or highlight sources anywhere.
	pub fn is_pristine(&self) -> bool {
		self.selection.is_pristine() && self.highlight.is_pristine()
	}
}

fn to_owned(names: Vec<&str>) -> Vec<String> {
	names.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::schema_viewer::types::{RelationSpec, TableSpec};

	fn shop(search: &str) -> DiagramState {
		DiagramState::new(
			&GraphData {
				tables: vec![
					TableSpec::new("orders", ["id", "customer_id", "product_id"]),
					TableSpec::new("customers", ["id"]),
					TableSpec::new("products", ["id"]),
					TableSpec::new("archive", ["id"]),
				],
				relations: vec![
					RelationSpec::new("orders", "customer_id", "customers", "id"),
					RelationSpec::new("orders", "product_id", "products", "id"),
				],
			},
			search,
		)
	}

	fn node(state: &DiagramState, name: &str) -> NodeIdx {
		state.index.node_by_name(name).unwrap().idx
	}

	fn column(state: &DiagramState, table: &str, name: &str) -> ColumnIdx {
		state.index.column_by_name(table, name).unwrap().idx
	}

	#[test]
	fn hover_then_leave_restores_everything() {
		let mut state = shop("");
		let orders = node(&state, "orders");
		state.table_enter(orders);
		assert!(state.node_view(orders).hovered);
		assert!(state.node_view(node(&state, "customers")).related);
		assert!(state.node_view(node(&state, "archive")).faded);
		assert!(!state.node_view(orders).faded);

		state.table_leave(orders);
		assert!(state.is_pristine());
		assert!(!state.node_view(node(&state, "archive")).faded);
	}

	#[test]
	fn pinned_table_survives_leave_and_other_interactions() {
		let mut state = shop("");
		let orders = node(&state, "orders");
		let customers = node(&state, "customers");
		state.table_enter(orders);
		assert_eq!(state.table_click(orders), None);
		state.table_leave(orders);
		assert!(state.node_view(orders).hovered);
		assert!(state.node_view(customers).related);

		state.table_enter(customers);
		state.table_leave(customers);
		assert!(state.node_view(customers).related);
		assert!(state.edge_view(EdgeIdx(0)).active);
		assert!(state.edge_view(EdgeIdx(1)).active);
	}

	#[test]
	fn unpinning_then_leaving_clears_the_highlight() {
		let mut state = shop("");
		let orders = node(&state, "orders");
		state.table_enter(orders);
		state.table_click(orders);
		state.table_click(orders);
		state.table_leave(orders);
		assert!(state.is_pristine());
	}

	#[test]
	fn ctrl_click_excludes_locally() {
		let mut state = shop("");
		let orders = node(&state, "orders");
		state.key_down(&KeyInput::new(17, true, false));
		state.table_enter(orders);
		assert_eq!(state.table_click(orders), None);

		let view = state.node_view(orders);
		assert!(view.pinned && view.excluded && !view.hovered);
		assert!(!state.node_view(node(&state, "customers")).related);
		assert!(!state.edge_view(EdgeIdx(0)).active);

		// Excluded tables ignore hover.
		state.table_leave(orders);
		state.table_enter(orders);
		assert!(!state.node_view(orders).hovered);
		assert!(!state.node_view(node(&state, "customers")).related);

		// A plain click lifts the exclusion and focuses again.
		state.key_up(&KeyInput::new(17, false, false));
		state.table_click(orders);
		let view = state.node_view(orders);
		assert!(!view.pinned && !view.excluded);
		assert!(state.node_view(node(&state, "customers")).related);
	}

	#[test]
	fn shift_click_focuses_only_that_table() {
		let mut state = shop("?degrees_of_separation=1&wanted_result_source_names=customers");
		state.key_down(&KeyInput::new(16, false, true));
		let nav = state.table_click(node(&state, "orders"));
		assert_eq!(
			nav.map(|n| n.url).as_deref(),
			Some("?degrees_of_separation=1&wanted_result_source_names=orders")
		);
	}

	#[test]
	fn column_hover_is_scoped_to_the_column() {
		let mut state = shop("");
		let product_id = column(&state, "orders", "product_id");
		state.column_enter(product_id);
		assert!(state.column_view(product_id).hovered);
		assert!(state.node_view(node(&state, "products")).related);
		assert!(!state.node_view(node(&state, "customers")).related);

		state.column_click(product_id);
		state.column_leave(product_id);
		assert!(state.column_view(product_id).hovered);
		assert!(state.node_view(node(&state, "products")).related);

		state.column_click(product_id);
		state.column_leave(product_id);
		assert!(state.is_pristine());
	}

	#[test]
	fn column_and_table_share_an_edge_independently() {
		let mut state = shop("");
		let orders = node(&state, "orders");
		let customer_id = column(&state, "orders", "customer_id");
		state.column_enter(customer_id);
		state.table_enter(orders);
		state.table_leave(orders);
		assert!(state.edge_view(EdgeIdx(0)).active);
		assert!(!state.edge_view(EdgeIdx(1)).active);
		state.column_leave(customer_id);
		assert!(!state.edge_view(EdgeIdx(0)).active);
	}

	#[test]
	fn edge_pin_keeps_hover() {
		let mut state = shop("");
		let edge = EdgeIdx(1);
		state.edge_enter(edge);
		assert_eq!(state.take_raised(), vec![edge]);
		state.edge_click(edge);
		state.edge_leave(edge);
		assert!(state.edge_view(edge).hovered);
		state.edge_enter(edge);
		state.edge_click(edge);
		state.edge_leave(edge);
		assert!(!state.edge_view(edge).hovered);
		assert!(!state.edge_view(edge).active);
	}

	#[test]
	fn zoom_collects_wanted_and_skip() {
		let mut state = shop("?skip_result_source_names=legacy");
		state.table_enter(node(&state, "orders"));
		state.table_click(node(&state, "orders"));
		state.key_down(&KeyInput::new(17, true, false));
		state.table_click(node(&state, "archive"));
		state.key_up(&KeyInput::new(17, false, false));

		let nav = state.key_up(&KeyInput::new(82, false, false));
		assert_eq!(
			nav.map(|n| n.url).as_deref(),
			Some("?skip_result_source_names=legacy,archive&wanted_result_source_names=orders")
		);
	}

	#[test]
	fn zoom_without_selection_keeps_params() {
		let mut state = shop("?degrees_of_separation=3");
		let nav = state.run(Command::Zoom);
		assert_eq!(nav.map(|n| n.url).as_deref(), Some("?degrees_of_separation=3"));
	}

	#[test]
	fn show_all_drops_every_parameter() {
		let mut state = shop("?degrees_of_separation=3&wanted_result_source_names=orders");
		assert_eq!(
			state.key_up(&KeyInput::new(81, false, false)),
			Some(Navigation { url: "?".into() })
		);
	}

	#[test]
	fn restore_pins_every_wanted_table() {
		let mut state = shop("?wanted_result_source_names=customers,missing,orders");
		state.restore_from_query();
		let customers = node(&state, "customers");
		let orders = node(&state, "orders");
		assert!(state.node_view(customers).pinned && state.node_view(customers).hovered);
		assert!(state.node_view(orders).pinned && state.node_view(orders).hovered);
		assert!(state.node_view(node(&state, "products")).related);
		assert!(state.node_view(node(&state, "archive")).faded);
		assert_eq!(
			state.summary().pinned,
			vec!["orders".to_owned(), "customers".to_owned()]
		);
	}

	#[test]
	fn repeated_wanted_name_is_restored_once() {
		let mut state = shop("?wanted_result_source_names=orders,orders");
		state.restore_from_query();
		let orders = node(&state, "orders");
		assert!(state.node_view(orders).pinned);

		state.table_leave(orders);
		assert!(state.node_view(orders).hovered);
		assert!(state.node_view(node(&state, "customers")).related);
		assert!(state.edge_view(EdgeIdx(0)).active);
	}

	#[test]
	fn escape_keeps_pointer_over() {
		let mut state = shop("");
		let orders = node(&state, "orders");
		state.node_pointer_enter(orders);
		state.table_enter(orders);
		state.table_click(orders);

		state.key_up(&KeyInput::new(27, false, false));
		let view = state.node_view(orders);
		assert!(view.pointer_over);
		assert!(!view.hovered && !view.pinned);
		assert!(state.is_pristine());
	}

	#[test]
	fn summary_reports_degrees() {
		let state = shop("?degrees_of_separation=4");
		assert_eq!(state.summary().degrees_of_separation.as_deref(), Some("4"));
	}
}
