//! Leptos component attaching the viewer to the server-rendered diagram.
//!
//! The diagram itself is already in the page; the component binds to it once
//! mounted and renders a small overlay with the current selection and the
//! keyboard shortcuts.

use leptos::prelude::*;
use log::warn;

use super::config::ViewerConfig;
use super::dom::{self, BindError};
use super::state::SelectionSummary;

const SHORTCUTS: &[(&str, &str)] = &[
	("Esc", "clear highlights and pins"),
	("R", "re-render around the selection"),
	("Q", "show the whole schema"),
	("0-9", "degrees of separation"),
	("Shift+click", "focus on one table"),
	("Ctrl+Shift+click", "hide a table"),
	("Ctrl+click", "mark a table to hide"),
];

fn attach(summary: RwSignal<SelectionSummary>) -> Result<(), BindError> {
	let document = web_sys::window()
		.ok_or(BindError::NoWindow)?
		.document()
		.ok_or(BindError::NoDocument)?;
	let config = ViewerConfig::load(&document);
	dom::bind(&document, &config, move |s| summary.set(s))
}

/// One-line description of the selection for the overlay.
pub fn status_line(summary: &SelectionSummary) -> String {
	let mut parts = Vec::new();
	if !summary.pinned.is_empty() {
		parts.push(format!("pinned: {}", summary.pinned.join(", ")));
	}
	if !summary.excluded.is_empty() {
		parts.push(format!("hiding: {}", summary.excluded.join(", ")));
	}
	if let Some(degrees) = &summary.degrees_of_separation {
		parts.push(format!("degrees of separation: {degrees}"));
	}
	if parts.is_empty() {
		"Hover a table or column to follow its relations.".to_owned()
	} else {
		parts.join(" · ")
	}
}

/// Binds to the diagram matched by [`ViewerConfig::diagram_selector`] and
/// shows the selection overlay.
#[component]
pub fn SchemaViewer() -> impl IntoView {
	let summary = RwSignal::new(SelectionSummary::default());

	Effect::new(move |_| {
		if let Err(e) = attach(summary) {
			warn!("schema-viewer: not attached: {}", e);
		}
	});

	view! {
		<div class="schema-viewer-overlay">
			<p class="status">{move || status_line(&summary.get())}</p>
			<dl class="shortcuts">
				{SHORTCUTS
					.iter()
					.map(|(key, action)| view! {
						<dt>{*key}</dt>
						<dd>{*action}</dd>
					})
					.collect_view()}
			</dl>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_line_lists_selection() {
		let summary = SelectionSummary {
			pinned: vec!["orders".into(), "customers".into()],
			excluded: vec!["archive".into()],
			degrees_of_separation: Some("2".into()),
		};
		assert_eq!(
			status_line(&summary),
			"pinned: orders, customers · hiding: archive · degrees of separation: 2"
		);
	}

	#[test]
	fn status_line_hint_when_idle() {
		assert_eq!(
			status_line(&SelectionSummary::default()),
			"Hover a table or column to follow its relations."
		);
	}
}
