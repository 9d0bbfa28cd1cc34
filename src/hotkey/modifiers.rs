//! Modifier requirements and live modifier evaluation
//!
//! A binding states, for each of the four modifier channels, which sides of
//! that modifier must be held. Evaluation always asks a [`ModifierStateSource`]
//! for the physical state at the moment of matching, never a cached snapshot.

use std::fmt;

use super::keys::vk;

/// The four modifier channels a binding can constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    /// The Windows key, used purely as a chord qualifier
    Free,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [Modifier::Ctrl, Modifier::Shift, Modifier::Alt, Modifier::Free];

    /// Key codes of the (left, right) sides of this modifier
    pub fn sides(self) -> (u16, u16) {
        match self {
            Modifier::Ctrl => (vk::LCONTROL, vk::RCONTROL),
            Modifier::Shift => (vk::LSHIFT, vk::RSHIFT),
            Modifier::Alt => (vk::LMENU, vk::RMENU),
            Modifier::Free => (vk::LWIN, vk::RWIN),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Ctrl => write!(f, "ctrl"),
            Modifier::Shift => write!(f, "shift"),
            Modifier::Alt => write!(f, "alt"),
            Modifier::Free => write!(f, "free"),
        }
    }
}

/// Which sides of a modifier must be down for a binding to match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModifierRequirement {
    /// Neither side may be down
    #[default]
    None,
    /// Left down, right up
    LeftOnly,
    /// Right down, left up
    RightOnly,
    /// At least one side down
    EitherSide,
    /// Both sides down
    BothSides,
}

impl ModifierRequirement {
    /// Parse a config value (`none`, `left`, `right`, `either`, `both`)
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "left" => Some(Self::LeftOnly),
            "right" => Some(Self::RightOnly),
            "either" => Some(Self::EitherSide),
            "both" => Some(Self::BothSides),
            _ => None,
        }
    }

    /// Check this requirement against the state of both sides
    pub fn satisfies(self, left_down: bool, right_down: bool) -> bool {
        match self {
            Self::None => !left_down && !right_down,
            Self::LeftOnly => left_down && !right_down,
            Self::RightOnly => !left_down && right_down,
            Self::EitherSide => left_down || right_down,
            Self::BothSides => left_down && right_down,
        }
    }
}

impl fmt::Display for ModifierRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::LeftOnly => write!(f, "left"),
            Self::RightOnly => write!(f, "right"),
            Self::EitherSide => write!(f, "either"),
            Self::BothSides => write!(f, "both"),
        }
    }
}

/// Live physical key state
///
/// Implementations must answer from the instantaneous hardware state, not
/// from the order in which events were delivered to the hook.
pub trait ModifierStateSource: Send + Sync {
    /// Whether the key with this code is physically down right now
    fn is_down(&self, code: u16) -> bool;

    /// Query (left, right) for a modifier, both sides read fresh
    fn sides_down(&self, modifier: Modifier) -> (bool, bool) {
        let (left, right) = modifier.sides();
        (self.is_down(left), self.is_down(right))
    }
}

/// A full set of requirements, one per channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierSet {
    pub ctrl: ModifierRequirement,
    pub shift: ModifierRequirement,
    pub alt: ModifierRequirement,
    pub free: ModifierRequirement,
}

impl ModifierSet {
    pub fn requirement(&self, modifier: Modifier) -> ModifierRequirement {
        match modifier {
            Modifier::Ctrl => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
            Modifier::Free => self.free,
        }
    }

    /// True when every channel is satisfied by the live state.
    ///
    /// Stops at the first failing channel.
    pub fn check_all(&self, source: &dyn ModifierStateSource) -> bool {
        Modifier::ALL.iter().all(|&modifier| {
            let (left, right) = source.sides_down(modifier);
            self.requirement(modifier).satisfies(left, right)
        })
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held = Modifier::ALL
            .iter()
            .filter(|m| self.requirement(**m) != ModifierRequirement::None)
            .map(|m| format!("{}={}", m, self.requirement(*m)))
            .collect::<Vec<_>>();

        if held.is_empty() {
            write!(f, "(no modifiers)")
        } else {
            write!(f, "{}", held.join(" "))
        }
    }
}
