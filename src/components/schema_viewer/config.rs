//! Viewer configuration, optionally embedded in the page as JSON.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlScriptElement};

use super::theme::Theme;

/// Id of the `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "viewer-config";

/// Where the diagram lives and how states are written onto it.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewerConfig {
	/// CSS selector of the diagram root.
	pub diagram_selector: String,
	/// Class and attribute names written onto the markup.
	pub theme: Theme,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			diagram_selector: "svg".into(),
			theme: Theme::default(),
		}
	}
}

impl ViewerConfig {
	/// Parse a config object. Missing fields take their defaults.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Read overrides from the page, falling back to defaults when the element
	/// is absent or its JSON does not parse.
	pub fn load(document: &Document) -> Self {
		let Some(script) = document
			.get_element_by_id(CONFIG_ELEMENT_ID)
			.and_then(|el| el.dyn_into::<HtmlScriptElement>().ok())
		else {
			return Self::default();
		};
		let Ok(json) = script.text() else {
			return Self::default();
		};

		match Self::from_json(&json) {
			Ok(config) => {
				info!("schema-viewer: loaded config from #{CONFIG_ELEMENT_ID}");
				config
			}
			Err(e) => {
				warn!("schema-viewer: failed to parse config: {}", e);
				Self::default()
			}
		}
	}
}
