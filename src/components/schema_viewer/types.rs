//! Diagram data structures used to build the element index.

use serde::Deserialize;

/// A table rendered as one node of the diagram.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct TableSpec {
	/// Table name. Unique key for the node.
	pub name: String,
	/// Column labels rendered inside the node, in display order.
	#[serde(default)]
	pub columns: Vec<String>,
}

/// A foreign-key relation rendered as one edge of the diagram.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RelationSpec {
	/// Table holding the foreign key.
	pub origin_table: String,
	/// Foreign-key column.
	pub origin_column: String,
	/// Referenced table.
	pub destination_table: String,
	/// Referenced column.
	pub destination_column: String,
}

/// Complete diagram description: tables and relations.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct GraphData {
	/// Tables in markup order.
	#[serde(default)]
	pub tables: Vec<TableSpec>,
	/// Relations in markup order.
	#[serde(default)]
	pub relations: Vec<RelationSpec>,
}

impl TableSpec {
	/// Table `name` with its column labels in display order.
	pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: name.into(),
			columns: columns.into_iter().map(Into::into).collect(),
		}
	}
}

impl RelationSpec {
	/// Relation from `origin_table.origin_column` to `destination_table.destination_column`.
	pub fn new(
		origin_table: impl Into<String>,
		origin_column: impl Into<String>,
		destination_table: impl Into<String>,
		destination_column: impl Into<String>,
	) -> Self {
		Self {
			origin_table: origin_table.into(),
			origin_column: origin_column.into(),
			destination_table: destination_table.into(),
			destination_column: destination_column.into(),
		}
	}
}
