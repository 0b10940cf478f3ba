//! Read-only index over the diagram's tables, columns, and relations.
//!
//! Built once when the diagram is bound and never mutated afterwards. Every
//! record carries direct structural references (node to its columns and
//! edges, column to its node, edge to its endpoint nodes) so lookups never
//! walk the markup.

use std::collections::HashMap;

use log::warn;

use super::types::GraphData;

/// Position of a node (table) in the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub usize);

/// Position of an edge (relation) in the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIdx(pub usize);

/// Position of a column label in the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnIdx(pub usize);

/// Inconsistencies between the index and a caller's view of it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
	/// The table is neither the origin nor the destination of the edge.
	#[error("table `{table}` is not an endpoint of edge #{}", .edge.0)]
	InvalidEdgeReference {
		/// Edge that was asked about.
		edge: EdgeIdx,
		/// Table that was expected at one of its ends.
		table: String,
	},
}

/// One table of the diagram.
#[derive(Clone, Debug)]
pub struct Node {
	/// Position in the index.
	pub idx: NodeIdx,
	/// Table name.
	pub name: String,
	/// Column labels, in markup order.
	pub columns: Vec<ColumnIdx>,
	/// Edges with this table at either end. Self-relations appear once.
	pub edges: Vec<EdgeIdx>,
}

/// One column label inside a table node.
#[derive(Clone, Debug)]
pub struct Column {
	/// Position in the index.
	pub idx: ColumnIdx,
	/// Owning table.
	pub node: NodeIdx,
	/// Column name.
	pub name: String,
}

/// One foreign-key relation between two `table.column` pairs.
#[derive(Clone, Debug)]
pub struct Edge {
	/// Position in the index.
	pub idx: EdgeIdx,
	/// Table holding the foreign key.
	pub origin_table: String,
	/// Foreign-key column.
	pub origin_column: String,
	/// Referenced table.
	pub destination_table: String,
	/// Referenced column.
	pub destination_column: String,
	/// Origin node, `None` when the table is not part of the rendered subgraph.
	pub origin: Option<NodeIdx>,
	/// Destination node, `None` when the table is not part of the rendered subgraph.
	pub destination: Option<NodeIdx>,
}

impl Edge {
	/// Whether `table` (and `column`, if given) sits at either end of this edge.
	pub fn touches(&self, table: &str, column: Option<&str>) -> bool {
		let origin = self.origin_table == table && column.is_none_or(|c| self.origin_column == c);
		let destination = self.destination_table == table
			&& column.is_none_or(|c| self.destination_column == c);
		origin || destination
	}

	/// Node of the endpoint named `table`, `None` if that end is detached or
	/// `table` is not an endpoint.
	pub fn endpoint_node(&self, table: &str) -> Option<NodeIdx> {
		if self.origin_table == table {
			self.origin
		} else if self.destination_table == table {
			self.destination
		} else {
			None
		}
	}
}

/// Index of every node, column, and edge in the diagram.
#[derive(Clone, Debug, Default)]
pub struct GraphIndex {
	nodes: Vec<Node>,
	columns: Vec<Column>,
	edges: Vec<Edge>,
	by_name: HashMap<String, NodeIdx>,
	by_column: HashMap<(String, String), ColumnIdx>,
}

impl GraphIndex {
	/// Index `data`. Duplicate tables and columns keep their first occurrence.
	pub fn new(data: &GraphData) -> Self {
		let mut index = Self::default();

		for table in &data.tables {
			if index.by_name.contains_key(&table.name) {
				warn!("schema-viewer: duplicate table `{}` ignored", table.name);
				continue;
			}
			let node_idx = NodeIdx(index.nodes.len());
			let mut columns = Vec::with_capacity(table.columns.len());
			for column in &table.columns {
				let key = (table.name.clone(), column.clone());
				if index.by_column.contains_key(&key) {
					continue;
				}
				let column_idx = ColumnIdx(index.columns.len());
				index.columns.push(Column {
					idx: column_idx,
					node: node_idx,
					name: column.clone(),
				});
				index.by_column.insert(key, column_idx);
				columns.push(column_idx);
			}
			index.nodes.push(Node {
				idx: node_idx,
				name: table.name.clone(),
				columns,
				edges: Vec::new(),
			});
			index.by_name.insert(table.name.clone(), node_idx);
		}

		for relation in &data.relations {
			let edge_idx = EdgeIdx(index.edges.len());
			let origin = index.by_name.get(&relation.origin_table).copied();
			let destination = index.by_name.get(&relation.destination_table).copied();

			for node_idx in [origin, destination].into_iter().flatten() {
				let edges = &mut index.nodes[node_idx.0].edges;
				if edges.last() != Some(&edge_idx) {
					edges.push(edge_idx);
				}
			}

			index.edges.push(Edge {
				idx: edge_idx,
				origin_table: relation.origin_table.clone(),
				origin_column: relation.origin_column.clone(),
				destination_table: relation.destination_table.clone(),
				destination_column: relation.destination_column.clone(),
				origin,
				destination,
			});
		}

		index
	}

	/// Node at `idx`.
	pub fn node(&self, idx: NodeIdx) -> &Node {
		&self.nodes[idx.0]
	}

	/// Edge at `idx`.
	pub fn edge(&self, idx: EdgeIdx) -> &Edge {
		&self.edges[idx.0]
	}

	/// Column at `idx`.
	pub fn column(&self, idx: ColumnIdx) -> &Column {
		&self.columns[idx.0]
	}

	/// Node for a table name.
	pub fn node_by_name(&self, name: &str) -> Option<&Node> {
		self.by_name.get(name).map(|&idx| &self.nodes[idx.0])
	}

	/// Column for a `table.column` pair.
	pub fn column_by_name(&self, table: &str, column: &str) -> Option<&Column> {
		self.by_column
			.get(&(table.to_owned(), column.to_owned()))
			.map(|&idx| &self.columns[idx.0])
	}

	/// All edges whose origin or destination is `table`, optionally narrowed to
	/// one of its columns. Unknown tables yield an empty result.
	pub fn edges_touching(&self, table: &str, column: Option<&str>) -> Vec<EdgeIdx> {
		let Some(node) = self.node_by_name(table) else {
			return Vec::new();
		};
		node.edges
			.iter()
			.copied()
			.filter(|&idx| self.edges[idx.0].touches(table, column))
			.collect()
	}

	/// The table on the opposite side of `edge` from `table`.
	///
	/// For a self-relation the table is its own other endpoint.
	pub fn other_endpoint(&self, edge: EdgeIdx, table: &str) -> Result<&str, GraphError> {
		let e = &self.edges[edge.0];
		if e.origin_table == table {
			Ok(&e.destination_table)
		} else if e.destination_table == table {
			Ok(&e.origin_table)
		} else {
			Err(GraphError::InvalidEdgeReference {
				edge,
				table: table.to_owned(),
			})
		}
	}

	/// Nodes in markup order.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	/// Edges in markup order.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.iter()
	}

	/// Columns in markup order.
	pub fn columns(&self) -> impl Iterator<Item = &Column> {
		self.columns.iter()
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Number of columns.
	pub fn column_count(&self) -> usize {
		self.columns.len()
	}
}
