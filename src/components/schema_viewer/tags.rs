//! Highlight source tags and the sets that hold them.

use std::collections::BTreeSet;
use std::fmt;

/// Why something is highlighted: a whole table, or one `table.column` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceTag {
	/// Every relation of a table.
	Table(String),
	/// Relations of one column.
	Column {
		/// Owning table.
		table: String,
		/// Column name.
		column: String,
	},
}

impl SourceTag {
	/// Tag for a whole table.
	pub fn table(table: impl Into<String>) -> Self {
		Self::Table(table.into())
	}

	/// Tag for `table.column`.
	pub fn column(table: impl Into<String>, column: impl Into<String>) -> Self {
		Self::Column {
			table: table.into(),
			column: column.into(),
		}
	}

	/// Table the tag originates from.
	pub fn table_name(&self) -> &str {
		match self {
			Self::Table(table) | Self::Column { table, .. } => table,
		}
	}

	/// Column the tag is scoped to, if any.
	pub fn column_name(&self) -> Option<&str> {
		match self {
			Self::Table(_) => None,
			Self::Column { column, .. } => Some(column),
		}
	}
}

impl fmt::Display for SourceTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Table(table) => f.write_str(table),
			Self::Column { table, column } => write!(f, "{table}.{column}"),
		}
	}
}

/// Set of tags currently responsible for one element's highlight.
///
/// Membership, not a counter: adding a tag twice is the same as adding it once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<SourceTag>);

impl TagSet {
	/// Returns `true` if the tag was not already present.
	pub fn insert(&mut self, tag: &SourceTag) -> bool {
		if self.contains(tag) {
			return false;
		}
		self.0.insert(tag.clone())
	}

	/// Returns `true` if the tag was present.
	pub fn remove(&mut self, tag: &SourceTag) -> bool {
		self.0.remove(tag)
	}

	/// Whether `tag` is in the set.
	pub fn contains(&self, tag: &SourceTag) -> bool {
		self.0.contains(tag)
	}

	/// No tag holds the highlight.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Remove every tag.
	pub fn clear(&mut self) {
		self.0.clear();
	}
}
