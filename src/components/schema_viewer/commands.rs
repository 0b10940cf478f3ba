//! Keyboard shortcuts and modifier tracking.
//!
//! Modifier flags are level-sensitive: any key-down reporting Ctrl sets the Ctrl
//! flag, and the first key-up that no longer reports it clears the flag, no
//! matter which physical key produced the event.

use super::selection::Modifiers;

const KEY_ESCAPE: u32 = 27;
const KEY_Q: u32 = b'Q' as u32;
const KEY_R: u32 = b'R' as u32;
const KEY_DIGIT_0: u32 = 48;
const KEY_DIGIT_9: u32 = 57;
const KEY_NUMPAD_0: u32 = 96;
const KEY_NUMPAD_9: u32 = 105;

/// Keys the viewer reacts to, decoded from a legacy `keyCode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
	/// Clear the view.
	Escape,
	/// Zoom to the selection.
	R,
	/// Show the whole schema.
	Q,
	/// Main-row or numpad digit.
	Digit(u8),
	/// Anything else.
	Other,
}

impl Key {
	/// Decode a `keyCode`.
	pub fn from_key_code(code: u32) -> Self {
		match code {
			KEY_ESCAPE => Self::Escape,
			KEY_R => Self::R,
			KEY_Q => Self::Q,
			KEY_DIGIT_0..=KEY_DIGIT_9 => Self::Digit((code - KEY_DIGIT_0) as u8),
			KEY_NUMPAD_0..=KEY_NUMPAD_9 => Self::Digit((code - KEY_NUMPAD_0) as u8),
			_ => Self::Other,
		}
	}
}

/// The parts of a keyboard event the viewer reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
	/// Legacy `keyCode` of the event.
	pub key_code: u32,
	/// `ctrlKey` of the event.
	pub ctrl: bool,
	/// `shiftKey` of the event.
	pub shift: bool,
}

impl KeyInput {
	/// Event fields as reported by the browser.
	pub fn new(key_code: u32, ctrl: bool, shift: bool) -> Self {
		Self {
			key_code,
			ctrl,
			shift,
		}
	}

	/// Decoded key.
	pub fn key(&self) -> Key {
		Key::from_key_code(self.key_code)
	}
}

/// Action requested by a released key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
	/// Clear every pin, hover, exclusion, and highlight.
	Reset,
	/// Re-render around the current selection.
	Zoom,
	/// Back to the unfiltered diagram.
	ShowAll,
	/// Set the hop limit around the focused tables.
	Degrees(u8),
}

/// Level-sensitive modifier flags for the current page.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyboardState {
	modifiers: Modifiers,
}

impl KeyboardState {
	/// Modifiers currently considered held.
	pub fn modifiers(&self) -> Modifiers {
		self.modifiers
	}

	/// Set the flags for modifiers the event reports.
	pub fn key_down(&mut self, input: &KeyInput) {
		if input.ctrl {
			self.modifiers.ctrl = true;
		}
		if input.shift {
			self.modifiers.shift = true;
		}
	}

	/// Resolve the command for a released key, then refresh the modifier flags.
	///
	/// Digits are ignored while Ctrl is held.
	pub fn key_up(&mut self, input: &KeyInput) -> Option<Command> {
		let command = match input.key() {
			Key::Escape => Some(Command::Reset),
			Key::R => Some(Command::Zoom),
			Key::Q => Some(Command::ShowAll),
			Key::Digit(_) if self.modifiers.ctrl => None,
			Key::Digit(digit) => Some(Command::Degrees(digit)),
			Key::Other => None,
		};

		if !input.ctrl {
			self.modifiers.ctrl = false;
		}
		if !input.shift {
			self.modifiers.shift = false;
		}
		command
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(27, Key::Escape)]
	#[case(82, Key::R)]
	#[case(81, Key::Q)]
	#[case(48, Key::Digit(0))]
	#[case(53, Key::Digit(5))]
	#[case(57, Key::Digit(9))]
	#[case(96, Key::Digit(0))]
	#[case(101, Key::Digit(5))]
	#[case(105, Key::Digit(9))]
	#[case(17, Key::Other)]
	#[case(65, Key::Other)]
	fn decodes_key_codes(#[case] code: u32, #[case] expected: Key) {
		assert_eq!(Key::from_key_code(code), expected);
	}

	#[test]
	fn modifiers_follow_event_levels_not_keys() {
		let mut keys = KeyboardState::default();
		keys.key_down(&KeyInput::new(17, true, false));
		keys.key_down(&KeyInput::new(16, true, true));
		assert_eq!(keys.modifiers(), Modifiers { ctrl: true, shift: true });

		// Releasing Shift while Ctrl is still down.
		keys.key_up(&KeyInput::new(16, true, false));
		assert_eq!(keys.modifiers(), Modifiers { ctrl: true, shift: false });

		keys.key_up(&KeyInput::new(17, false, false));
		assert_eq!(keys.modifiers(), Modifiers::default());
	}

	#[test]
	fn digits_are_ignored_while_ctrl_is_held() {
		let mut keys = KeyboardState::default();
		keys.key_down(&KeyInput::new(17, true, false));
		keys.key_down(&KeyInput::new(50, true, false));
		assert_eq!(keys.key_up(&KeyInput::new(50, true, false)), None);
		keys.key_up(&KeyInput::new(17, false, false));
		assert_eq!(
			keys.key_up(&KeyInput::new(50, false, false)),
			Some(Command::Degrees(2))
		);
	}

	#[rstest]
	#[case(27, Some(Command::Reset))]
	#[case(82, Some(Command::Zoom))]
	#[case(81, Some(Command::ShowAll))]
	#[case(103, Some(Command::Degrees(7)))]
	#[case(13, None)]
	fn key_up_maps_commands(#[case] code: u32, #[case] expected: Option<Command>) {
		let mut keys = KeyboardState::default();
		assert_eq!(keys.key_up(&KeyInput::new(code, false, false)), expected);
	}
}
