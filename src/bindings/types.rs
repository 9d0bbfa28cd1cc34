//! Binding data model
//!
//! A [`Binding`] is a chord (modifier requirements plus one trigger) and the
//! action it performs. The trigger is a sum type, so its kind and payload can
//! never disagree.

use std::fmt;

use crate::actions::CaptureMode;
use crate::hotkey::ModifierSet;

/// Mouse buttons a binding can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

/// Direction of a vertical wheel tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelDirection {
    Up,
    Down,
}

impl WheelDirection {
    /// Map a signed wheel delta to a direction; zero has none
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            d if d > 0 => Some(WheelDirection::Up),
            d if d < 0 => Some(WheelDirection::Down),
            _ => None,
        }
    }
}

/// The non-modifier event a binding listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A key press, by virtual key code
    Key(u16),
    MouseButton(MouseButton),
    Wheel(WheelDirection),
}

impl Trigger {
    /// Parse a config trigger string; `None` if unrecognized
    pub fn from_config(value: &str) -> Option<Self> {
        let trigger = match value {
            "wheel_up" => Trigger::Wheel(WheelDirection::Up),
            "wheel_down" => Trigger::Wheel(WheelDirection::Down),
            "mouse_left" => Trigger::MouseButton(MouseButton::Left),
            "mouse_right" => Trigger::MouseButton(MouseButton::Right),
            "mouse_middle" => Trigger::MouseButton(MouseButton::Middle),
            "mouse_x1" => Trigger::MouseButton(MouseButton::X1),
            "mouse_x2" => Trigger::MouseButton(MouseButton::X2),
            other => {
                let name = other.strip_prefix("key_")?;
                Trigger::Key(crate::hotkey::key_code_from_name(name)?)
            }
        };
        Some(trigger)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Key(code) => write!(f, "key_0x{:02X}", code),
            Trigger::MouseButton(MouseButton::Left) => write!(f, "mouse_left"),
            Trigger::MouseButton(MouseButton::Right) => write!(f, "mouse_right"),
            Trigger::MouseButton(MouseButton::Middle) => write!(f, "mouse_middle"),
            Trigger::MouseButton(MouseButton::X1) => write!(f, "mouse_x1"),
            Trigger::MouseButton(MouseButton::X2) => write!(f, "mouse_x2"),
            Trigger::Wheel(WheelDirection::Up) => write!(f, "wheel_up"),
            Trigger::Wheel(WheelDirection::Down) => write!(f, "wheel_down"),
        }
    }
}

/// What a matched binding does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Swallow the trigger and do nothing else
    None,
    VolumeUp,
    VolumeDown,
    VolumeMute,
    PlayPause,
    PrevTrack,
    NextTrack,
    Screenshot(CaptureMode),
}

impl Action {
    pub fn from_config(value: &str) -> Option<Self> {
        let action = match value {
            "none" => Action::None,
            "volume_up" => Action::VolumeUp,
            "volume_down" => Action::VolumeDown,
            "volume_mute" => Action::VolumeMute,
            "play_pause" => Action::PlayPause,
            "prev_track" => Action::PrevTrack,
            "next_track" => Action::NextTrack,
            "screenshot_client_clipboard" => Action::Screenshot(CaptureMode::Clipboard),
            "screenshot_client_file" => Action::Screenshot(CaptureMode::File),
            "screenshot_client_file_clipboard" => Action::Screenshot(CaptureMode::FileAndClipboard),
            _ => return None,
        };
        Some(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::None => write!(f, "none"),
            Action::VolumeUp => write!(f, "volume_up"),
            Action::VolumeDown => write!(f, "volume_down"),
            Action::VolumeMute => write!(f, "volume_mute"),
            Action::PlayPause => write!(f, "play_pause"),
            Action::PrevTrack => write!(f, "prev_track"),
            Action::NextTrack => write!(f, "next_track"),
            Action::Screenshot(CaptureMode::Clipboard) => write!(f, "screenshot_client_clipboard"),
            Action::Screenshot(CaptureMode::File) => write!(f, "screenshot_client_file"),
            Action::Screenshot(CaptureMode::FileAndClipboard) => {
                write!(f, "screenshot_client_file_clipboard")
            }
        }
    }
}

/// A chord and the action it performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub modifiers: ModifierSet,
    pub trigger: Trigger,
    pub action: Action,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} -> {}", self.modifiers, self.trigger, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::ModifierRequirement;

    #[test]
    fn test_trigger_parsing() {
        assert_eq!(
            Trigger::from_config("wheel_down"),
            Some(Trigger::Wheel(WheelDirection::Down))
        );
        assert_eq!(
            Trigger::from_config("mouse_x2"),
            Some(Trigger::MouseButton(MouseButton::X2))
        );
        assert_eq!(Trigger::from_config("key_f13"), Some(Trigger::Key(0x7C)));
        assert_eq!(Trigger::from_config("key_0x41"), Some(Trigger::Key(0x41)));
        assert_eq!(Trigger::from_config("key_bogus"), None);
        assert_eq!(Trigger::from_config("mouse_x3"), None);
        assert_eq!(Trigger::from_config("f13"), None);
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::from_config("next_track"), Some(Action::NextTrack));
        assert_eq!(
            Action::from_config("screenshot_client_file_clipboard"),
            Some(Action::Screenshot(CaptureMode::FileAndClipboard))
        );
        assert_eq!(Action::from_config("launch_rockets"), None);
    }

    #[test]
    fn test_action_display_matches_config_names() {
        for name in [
            "volume_up",
            "volume_mute",
            "prev_track",
            "screenshot_client_clipboard",
            "screenshot_client_file",
        ] {
            let action = Action::from_config(name).unwrap();
            assert_eq!(action.to_string(), name);
        }
    }

    #[test]
    fn test_wheel_direction_from_delta() {
        assert_eq!(WheelDirection::from_delta(120), Some(WheelDirection::Up));
        assert_eq!(WheelDirection::from_delta(-240), Some(WheelDirection::Down));
        assert_eq!(WheelDirection::from_delta(0), None);
    }

    #[test]
    fn test_binding_display() {
        let binding = Binding {
            modifiers: ModifierSet {
                free: ModifierRequirement::LeftOnly,
                ..Default::default()
            },
            trigger: Trigger::Wheel(WheelDirection::Up),
            action: Action::VolumeUp,
        };
        assert_eq!(binding.to_string(), "free=left + wheel_up -> volume_up");
    }
}
