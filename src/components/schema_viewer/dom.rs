//! Binding between [`DiagramState`] and the rendered SVG diagram.
//!
//! Scans the markup once for tables, columns, and edges, wires mouse and
//! keyboard listeners, and after every handled event mirrors the state back
//! onto the elements as classes and attributes.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, KeyboardEvent};

use super::commands::KeyInput;
use super::config::ViewerConfig;
use super::index::{ColumnIdx, EdgeIdx, NodeIdx};
use super::state::{DiagramState, Navigation, SelectionSummary};
use super::theme::Theme;
use super::types::{GraphData, RelationSpec, TableSpec};

const TABLE_NAME: &str = "data-table-name";
const COLUMN_NAME: &str = "data-column-name";
const ORIGIN_TABLE: &str = "data-origin-table";
const ORIGIN_COLUMN: &str = "data-origin-column";
const DESTINATION_TABLE: &str = "data-destination-table";
const DESTINATION_COLUMN: &str = "data-destination-column";

/// Failures while attaching the viewer to the page.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
	/// Not running in a browser window.
	#[error("no window available")]
	NoWindow,
	/// The window has no document.
	#[error("no document available")]
	NoDocument,
	/// Nothing matches the configured diagram selector.
	#[error("no diagram matches `{0}`")]
	NoDiagram(String),
	/// A DOM call threw.
	#[error("DOM call failed: {0}")]
	Js(String),
}

fn js_error(err: JsValue) -> BindError {
	let message = err
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.or_else(|| err.as_string())
		.unwrap_or_else(|| format!("{err:?}"));
	BindError::Js(message)
}

/// Label elements of one column: the background polygon and the text.
#[derive(Clone, Debug, Default)]
struct ColumnElements {
	polygons: Vec<Element>,
	texts: Vec<Element>,
}

impl ColumnElements {
	fn all(&self) -> impl Iterator<Item = &Element> {
		self.polygons.iter().chain(self.texts.iter())
	}
}

/// Markup handles, index-aligned with the [`GraphIndex`](super::index::GraphIndex)
/// built from the same scan.
#[derive(Clone, Debug, Default)]
struct DiagramElements {
	nodes: Vec<Element>,
	table_labels: Vec<Vec<Element>>,
	columns: Vec<ColumnElements>,
	edges: Vec<Element>,
}

fn select_all(root: &Element, selector: &str) -> Result<Vec<Element>, BindError> {
	let list = root.query_selector_all(selector).map_err(js_error)?;
	Ok((0..list.length())
		.filter_map(|i| list.get(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect())
}

/// Collect the diagram description and element handles from the markup.
///
/// Elements lacking their identifying attributes are skipped with a warning so
/// the rest of the diagram stays interactive.
fn scan(root: &Element) -> Result<(GraphData, DiagramElements), BindError> {
	let mut data = GraphData::default();
	let mut elements = DiagramElements::default();
	let mut seen_tables = HashSet::new();

	for node in select_all(root, ".node")? {
		let Some(name) = node.get_attribute(TABLE_NAME) else {
			warn!("schema-viewer: .node without {TABLE_NAME} ignored");
			continue;
		};
		if !seen_tables.insert(name.clone()) {
			warn!("schema-viewer: duplicate table `{name}` ignored");
			continue;
		}

		let mut column_names: Vec<String> = Vec::new();
		for label in select_all(&node, &format!("[{COLUMN_NAME}]"))? {
			let Some(column) = label.get_attribute(COLUMN_NAME) else {
				continue;
			};
			let pos = match column_names.iter().position(|c| *c == column) {
				Some(pos) => pos,
				None => {
					column_names.push(column);
					elements.columns.push(ColumnElements::default());
					column_names.len() - 1
				}
			};
			let offset = elements.columns.len() - column_names.len();
			let slot = &mut elements.columns[offset + pos];
			if label.tag_name().eq_ignore_ascii_case("text") {
				slot.texts.push(label);
			} else {
				slot.polygons.push(label);
			}
		}

		elements
			.table_labels
			.push(select_all(&node, "polygon.table-name, text.table-name")?);
		elements.nodes.push(node);
		data.tables.push(TableSpec {
			name,
			columns: column_names,
		});
	}

	for edge in select_all(root, ".edge")? {
		let attr = |name: &str| edge.get_attribute(name);
		let (Some(origin_table), Some(origin_column), Some(destination_table), Some(destination_column)) = (
			attr(ORIGIN_TABLE),
			attr(ORIGIN_COLUMN),
			attr(DESTINATION_TABLE),
			attr(DESTINATION_COLUMN),
		) else {
			warn!("schema-viewer: .edge without origin/destination attributes ignored");
			continue;
		};
		data.relations.push(RelationSpec {
			origin_table,
			origin_column,
			destination_table,
			destination_column,
		});
		elements.edges.push(edge);
	}

	Ok((data, elements))
}

type SummaryCallback = Box<dyn Fn(SelectionSummary)>;

/// Page-lifetime binding of state, markup, and theme.
struct Viewer {
	state: DiagramState,
	elements: DiagramElements,
	theme: Theme,
	on_change: SummaryCallback,
}

impl Viewer {
	/// Run one event handler to completion, then mirror the result.
	fn handle(&mut self, f: impl FnOnce(&mut DiagramState) -> Option<Navigation>) {
		let navigation = f(&mut self.state);
		self.sync();
		if let Some(navigation) = navigation {
			navigate(&navigation);
		}
	}

	fn sync(&mut self) {
		for node in self.state.index.nodes() {
			let view = self.state.node_view(node.idx);
			let el = &self.elements.nodes[node.idx.0];
			apply_classes(el, self.theme.node_classes(&view));
			apply_flag(el, &self.theme.pinned_attribute, view.pinned);

			for &column in &node.columns {
				let view = self.state.column_view(column);
				let els = &self.elements.columns[column.0];
				for polygon in &els.polygons {
					apply_classes(polygon, self.theme.column_classes(&view));
				}
				for text in &els.texts {
					apply_flag(text, &self.theme.pinned_attribute, view.pinned);
				}
			}
		}

		for edge in self.state.index.edges() {
			let view = self.state.edge_view(edge.idx);
			let el = &self.elements.edges[edge.idx.0];
			apply_classes(el, self.theme.edge_classes(&view));
			apply_flag(el, &self.theme.pinned_attribute, view.pinned);
		}

		for edge in self.state.take_raised() {
			let el = &self.elements.edges[edge.0];
			if let Some(parent) = el.parent_node() {
				let _ = parent.append_child(el);
			}
		}

		(self.on_change)(self.state.summary());
	}
}

fn apply_classes<'a>(el: &Element, classes: impl IntoIterator<Item = (&'a str, bool)>) {
	let list = el.class_list();
	for (class, present) in classes {
		let _ = list.toggle_with_force(class, present);
	}
}

fn apply_flag(el: &Element, attribute: &str, present: bool) {
	if present {
		let _ = el.set_attribute(attribute, "1");
	} else {
		let _ = el.remove_attribute(attribute);
	}
}

fn navigate(navigation: &Navigation) {
	let Some(window) = web_sys::window() else {
		warn!("schema-viewer: no window to navigate");
		return;
	};
	if let Err(e) = window.location().set_href(&navigation.url) {
		warn!("schema-viewer: navigation failed: {}", js_error(e));
	}
}

/// Register `handler` for `event` on `target` for the lifetime of the page.
fn listen(
	target: &web_sys::EventTarget,
	event: &str,
	handler: impl FnMut(Event) + 'static,
) -> Result<(), BindError> {
	let closure = Closure::<dyn FnMut(Event)>::new(handler);
	target
		.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
		.map_err(js_error)?;
	closure.forget();
	Ok(())
}

/// Attach to `on(viewer, idx)` for every `(event, action)` pair on `target`.
fn listen_all<I: Copy + 'static>(
	viewer: &Rc<RefCell<Viewer>>,
	target: &Element,
	idx: I,
	actions: &[(&str, fn(&mut DiagramState, I) -> Option<Navigation>)],
) -> Result<(), BindError> {
	for &(event, action) in actions {
		let viewer = viewer.clone();
		listen(target, event, move |_| {
			if let Ok(mut viewer) = viewer.try_borrow_mut() {
				viewer.handle(|state| action(state, idx));
			}
		})?;
	}
	Ok(())
}

fn table_actions() -> [(&'static str, fn(&mut DiagramState, NodeIdx) -> Option<Navigation>); 3] {
	[
		("mouseenter", |s, n| {
			s.table_enter(n);
			None
		}),
		("mouseleave", |s, n| {
			s.table_leave(n);
			None
		}),
		("click", |s, n| s.table_click(n)),
	]
}

fn node_actions() -> [(&'static str, fn(&mut DiagramState, NodeIdx) -> Option<Navigation>); 2] {
	[
		("mouseenter", |s, n| {
			s.node_pointer_enter(n);
			None
		}),
		("mouseleave", |s, n| {
			s.node_pointer_leave(n);
			None
		}),
	]
}

fn column_actions() -> [(&'static str, fn(&mut DiagramState, ColumnIdx) -> Option<Navigation>); 3] {
	[
		("mouseenter", |s, c| {
			s.column_enter(c);
			None
		}),
		("mouseleave", |s, c| {
			s.column_leave(c);
			None
		}),
		("click", |s, c| {
			s.column_click(c);
			None
		}),
	]
}

fn edge_actions() -> [(&'static str, fn(&mut DiagramState, EdgeIdx) -> Option<Navigation>); 3] {
	[
		("mouseenter", |s, e| {
			s.edge_enter(e);
			None
		}),
		("mouseleave", |s, e| {
			s.edge_leave(e);
			None
		}),
		("click", |s, e| {
			s.edge_click(e);
			None
		}),
	]
}

fn key_input(event: &Event) -> Option<KeyInput> {
	let event = event.dyn_ref::<KeyboardEvent>()?;
	Some(KeyInput::new(
		event.key_code(),
		event.ctrl_key(),
		event.shift_key(),
	))
}

/// Attach the viewer to the diagram in `document`.
///
/// Restores focus for `wanted_result_source_names` before the first sync, so
/// the page opens with the same highlights the user navigated away with.
pub fn bind(
	document: &Document,
	config: &ViewerConfig,
	on_change: impl Fn(SelectionSummary) + 'static,
) -> Result<(), BindError> {
	let window = web_sys::window().ok_or(BindError::NoWindow)?;
	let root = document
		.query_selector(&config.diagram_selector)
		.map_err(js_error)?
		.ok_or_else(|| BindError::NoDiagram(config.diagram_selector.clone()))?;

	let (data, elements) = scan(&root)?;
	let search = window.location().search().map_err(js_error)?;
	let mut state = DiagramState::new(&data, search);
	state.restore_from_query();

	info!(
		"schema-viewer: bound {} tables, {} columns, {} relations",
		state.index.node_count(),
		state.index.column_count(),
		state.index.edge_count()
	);

	let viewer = Rc::new(RefCell::new(Viewer {
		state,
		elements,
		theme: config.theme.clone(),
		on_change: Box::new(on_change),
	}));

	{
		let v = viewer.borrow();
		for (i, node) in v.elements.nodes.iter().enumerate() {
			let idx = NodeIdx(i);
			listen_all(&viewer, node, idx, &node_actions())?;
			for label in &v.elements.table_labels[i] {
				listen_all(&viewer, label, idx, &table_actions())?;
			}
		}
		for (i, column) in v.elements.columns.iter().enumerate() {
			for label in column.all() {
				listen_all(&viewer, label, ColumnIdx(i), &column_actions())?;
			}
		}
		for (i, edge) in v.elements.edges.iter().enumerate() {
			let _ = edge.set_attribute("cursor", &v.theme.edge_cursor);
			listen_all(&viewer, edge, EdgeIdx(i), &edge_actions())?;
		}
	}

	let keys = viewer.clone();
	listen(document, "keydown", move |event| {
		if let (Some(input), Ok(mut viewer)) = (key_input(&event), keys.try_borrow_mut()) {
			viewer.handle(|state| {
				state.key_down(&input);
				None
			});
		}
	})?;
	let keys = viewer.clone();
	listen(document, "keyup", move |event| {
		if let (Some(input), Ok(mut viewer)) = (key_input(&event), keys.try_borrow_mut()) {
			viewer.handle(|state| state.key_up(&input));
		}
	})?;

	viewer.borrow_mut().sync();
	Ok(())
}
