//! Interactive entity-relationship diagram explorer.
//!
//! Binds to a server-rendered SVG schema diagram and lets the user explore it:
//! - Hovering a table or column highlights its relations and the tables at
//!   their far ends, fading everything unrelated
//! - Clicking pins a highlight so it survives mouse-leave
//! - Modifier clicks and keyboard shortcuts fold the selection into the query
//!   string and navigate, so the server can re-render a filtered subgraph
//!
//! Highlights are reference-counted by [`SourceTag`]: overlapping interactions
//! each hold their own tag, and an edge stays active until every tag is gone.
//!
//! # Example
//!
//! ```
//! use schema_viewer::{DiagramState, GraphData, RelationSpec, TableSpec};
//!
//! let data = GraphData {
//!     tables: vec![
//!         TableSpec::new("orders", ["id", "customer_id"]),
//!         TableSpec::new("customers", ["id"]),
//!     ],
//!     relations: vec![RelationSpec::new("orders", "customer_id", "customers", "id")],
//! };
//! let mut state = DiagramState::new(&data, "?degrees_of_separation=2");
//! let orders = state.index.node_by_name("orders").unwrap().idx;
//! let customers = state.index.node_by_name("customers").unwrap().idx;
//!
//! state.table_enter(orders);
//! assert!(state.node_view(customers).related);
//! state.table_leave(orders);
//! assert!(state.is_pristine());
//! ```

mod commands;
mod component;
pub mod config;
mod dom;
mod highlight;
mod index;
pub mod query;
mod selection;
mod state;
mod tags;
pub mod theme;
mod types;

pub use commands::{Command, Key, KeyInput, KeyboardState};
pub use component::{SchemaViewer, status_line};
pub use config::ViewerConfig;
pub use dom::{BindError, bind};
pub use highlight::HighlightState;
pub use index::{Column, ColumnIdx, Edge, EdgeIdx, GraphError, GraphIndex, Node, NodeIdx};
pub use query::QueryParams;
pub use selection::{
	ClickIntent, ColumnSelection, EdgeSelection, Modifiers, NodeSelection, SelectionState,
};
pub use state::{ColumnView, DiagramState, EdgeView, Navigation, NodeView, SelectionSummary};
pub use tags::{SourceTag, TagSet};
pub use theme::Theme;
pub use types::{GraphData, RelationSpec, TableSpec};
