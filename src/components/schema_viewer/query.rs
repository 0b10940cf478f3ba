//! Query-string codec for the filter parameters the server understands.
//!
//! The page URL is the only place selection survives a navigation, so the
//! codec has to preserve every key it does not know about. Callers re-parse the
//! current search string for each command rather than holding on to a mapping.

use std::fmt;

/// Hop limit around the focused tables, a single digit.
pub const DEGREES_OF_SEPARATION: &str = "degrees_of_separation";
/// Comma-joined tables the re-rendered subgraph is centred on.
pub const WANTED_RESULT_SOURCE_NAMES: &str = "wanted_result_source_names";
/// Comma-joined tables dropped from the re-rendered subgraph.
pub const SKIP_RESULT_SOURCE_NAMES: &str = "skip_result_source_names";

/// Flat, insertion-ordered `key → value` mapping of a query string.
///
/// A pair written without `=` keeps its key with an undefined value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
	entries: Vec<(String, Option<String>)>,
}

impl QueryParams {
	/// Parse `search`, with or without its leading `?`.
	///
	/// Empty segments are skipped. When a key repeats, the last value wins and
	/// the key keeps the position of its first occurrence.
	pub fn parse(search: &str) -> Self {
		let mut params = Self::default();
		let search = search.strip_prefix('?').unwrap_or(search);
		for pair in search.split('&').filter(|pair| !pair.is_empty()) {
			match pair.split_once('=') {
				Some((key, value)) => params.insert(key, Some(value.to_owned())),
				None => params.insert(pair, None),
			}
		}
		params
	}

	fn insert(&mut self, key: &str, value: Option<String>) {
		match self.entries.iter_mut().find(|(k, _)| k == key) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((key.to_owned(), value)),
		}
	}

	/// Value of `key`, `None` if absent or undefined.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(k, _)| k == key)
			.and_then(|(_, v)| v.as_deref())
	}

	/// Set `key` to `value`, keeping its position if already present.
	pub fn set(&mut self, key: &str, value: impl Into<String>) {
		self.insert(key, Some(value.into()));
	}

	/// Comma-separated value of `key` split into its items. Empty items are dropped.
	pub fn list(&self, key: &str) -> Vec<String> {
		self.get(key)
			.map(|value| {
				value
					.split(',')
					.filter(|item| !item.is_empty())
					.map(str::to_owned)
					.collect()
			})
			.unwrap_or_default()
	}

	/// Set `key` to `items` joined with commas.
	pub fn set_list<I, S>(&mut self, key: &str, items: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let joined = items
			.into_iter()
			.map(|item| item.as_ref().to_owned())
			.collect::<Vec<_>>()
			.join(",");
		self.set(key, joined);
	}

	/// Append `item` to the comma-joined list under `key` unless already listed.
	pub fn push_to_list(&mut self, key: &str, item: &str) {
		let mut items = self.list(key);
		if !items.iter().any(|existing| existing == item) {
			items.push(item.to_owned());
		}
		self.set_list(key, items);
	}

	/// Pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// No keys at all.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Serialize as `?k1=v1&k2=v2`. Undefined values serialize as `k=`.
	pub fn to_query_string(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for QueryParams {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("?")?;
		for (i, (key, value)) in self.entries.iter().enumerate() {
			if i > 0 {
				f.write_str("&")?;
			}
			write!(f, "{key}={}", value.as_deref().unwrap_or_default())?;
		}
		Ok(())
	}
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
	K: AsRef<str>,
	V: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut params = Self::default();
		for (key, value) in iter {
			params.set(key.as_ref(), value);
		}
		params
	}
}
