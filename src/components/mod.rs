//! UI components.

pub mod schema_viewer;
