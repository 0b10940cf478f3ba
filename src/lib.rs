//! schema-viewer: Interactive exploration of server-rendered database schema diagrams.
//!
//! This crate provides a WASM-based viewer that attaches to an SVG
//! entity-relationship diagram, highlights relations on hover and click, and
//! turns the user's selection into filter parameters for the next render.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;

pub use components::schema_viewer::{
	DiagramState, GraphData, GraphIndex, QueryParams, RelationSpec, SchemaViewer, SourceTag,
	TableSpec, ViewerConfig,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("schema-viewer: logging initialized");
}

/// Main application component.
/// Attaches the viewer to the diagram already present in the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Title text="Schema Viewer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<SchemaViewer />
	}
}
