//! Virtual key codes and the symbolic key name table
//!
//! Key codes follow the Windows virtual-key numbering, which is what the
//! low-level keyboard hook reports. Binding triggers written as `key_<name>`
//! resolve through [`key_code_from_name`].

/// Virtual key codes used by the engine
pub mod vk {
    /// Generic Shift (reported by some synthetic sources)
    pub const SHIFT: u16 = 0x10;
    /// Generic Control, also the inert key used by the suppression guard
    pub const CONTROL: u16 = 0x11;
    /// Generic Alt
    pub const MENU: u16 = 0x12;

    /// Left Windows key (the free modifier)
    pub const LWIN: u16 = 0x5B;
    /// Right Windows key (the free modifier)
    pub const RWIN: u16 = 0x5C;

    pub const LSHIFT: u16 = 0xA0;
    pub const RSHIFT: u16 = 0xA1;
    pub const LCONTROL: u16 = 0xA2;
    pub const RCONTROL: u16 = 0xA3;
    pub const LMENU: u16 = 0xA4;
    pub const RMENU: u16 = 0xA5;

    pub const VOLUME_MUTE: u16 = 0xAD;
    pub const VOLUME_DOWN: u16 = 0xAE;
    pub const VOLUME_UP: u16 = 0xAF;
    pub const MEDIA_NEXT_TRACK: u16 = 0xB0;
    pub const MEDIA_PREV_TRACK: u16 = 0xB1;
    pub const MEDIA_PLAY_PAUSE: u16 = 0xB3;
}

/// Returns true for any Ctrl, Shift, Alt or Windows key code.
///
/// Modifier keys only feed modifier evaluation and the suppression guard;
/// they are never matched as triggers.
pub fn is_modifier_key(code: u16) -> bool {
    matches!(
        code,
        vk::SHIFT
            | vk::CONTROL
            | vk::MENU
            | vk::LWIN
            | vk::RWIN
            | vk::LSHIFT
            | vk::RSHIFT
            | vk::LCONTROL
            | vk::RCONTROL
            | vk::LMENU
            | vk::RMENU
    )
}

/// Returns true if the key is either side of the free modifier.
pub fn is_free_modifier(code: u16) -> bool {
    code == vk::LWIN || code == vk::RWIN
}

const NAMED_KEYS: &[(&str, u16)] = &[
    ("backspace", 0x08),
    ("tab", 0x09),
    ("clear", 0x0C),
    ("enter", 0x0D),
    ("return", 0x0D),
    ("pause", 0x13),
    ("capslock", 0x14),
    ("escape", 0x1B),
    ("esc", 0x1B),
    ("space", 0x20),
    ("pageup", 0x21),
    ("pagedown", 0x22),
    ("end", 0x23),
    ("home", 0x24),
    ("left", 0x25),
    ("up", 0x26),
    ("right", 0x27),
    ("down", 0x28),
    ("printscreen", 0x2C),
    ("insert", 0x2D),
    ("delete", 0x2E),
    ("apps", 0x5D),
    ("sleep", 0x5F),
    ("multiply", 0x6A),
    ("add", 0x6B),
    ("separator", 0x6C),
    ("subtract", 0x6D),
    ("decimal", 0x6E),
    ("divide", 0x6F),
    ("numlock", 0x90),
    ("scrolllock", 0x91),
    ("lshift", vk::LSHIFT),
    ("rshift", vk::RSHIFT),
    ("lctrl", vk::LCONTROL),
    ("rctrl", vk::RCONTROL),
    ("lalt", vk::LMENU),
    ("ralt", vk::RMENU),
    ("lwin", vk::LWIN),
    ("rwin", vk::RWIN),
    ("browser_back", 0xA6),
    ("browser_forward", 0xA7),
    ("browser_refresh", 0xA8),
    ("browser_stop", 0xA9),
    ("browser_search", 0xAA),
    ("browser_favorites", 0xAB),
    ("browser_home", 0xAC),
    ("volume_mute", vk::VOLUME_MUTE),
    ("volume_down", vk::VOLUME_DOWN),
    ("volume_up", vk::VOLUME_UP),
    ("media_next", vk::MEDIA_NEXT_TRACK),
    ("media_prev", vk::MEDIA_PREV_TRACK),
    ("media_stop", 0xB2),
    ("media_play_pause", vk::MEDIA_PLAY_PAUSE),
    ("launch_mail", 0xB4),
    ("launch_media", 0xB5),
    ("launch_app1", 0xB6),
    ("launch_app2", 0xB7),
    ("semicolon", 0xBA),
    ("equals", 0xBB),
    ("comma", 0xBC),
    ("minus", 0xBD),
    ("period", 0xBE),
    ("slash", 0xBF),
    ("backquote", 0xC0),
    ("lbracket", 0xDB),
    ("backslash", 0xDC),
    ("rbracket", 0xDD),
    ("quote", 0xDE),
];

/// Resolve the `<name>` part of a `key_<name>` trigger to a key code.
///
/// Accepts, case-insensitively: single letters and digits, `f1`..`f24`,
/// `numpad0`..`numpad9`, the entries of the name table, and numeric codes in
/// decimal, `0x` hex or leading-zero octal. Codes outside 1..=254 are rejected.
pub fn key_code_from_name(name: &str) -> Option<u16> {
    let lower = name.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some(code) = parse_numeric(&lower) {
        return (1..=0xFE).contains(&code).then_some(code as u16);
    }

    let bytes = lower.as_bytes();
    if bytes.len() == 1 && bytes[0].is_ascii_lowercase() {
        return Some(bytes[0].to_ascii_uppercase() as u16);
    }

    if let Some(n) = lower.strip_prefix("numpad").and_then(|d| d.parse::<u16>().ok()) {
        return (n <= 9).then_some(0x60 + n);
    }

    if let Some(n) = lower.strip_prefix('f').and_then(|d| d.parse::<u16>().ok()) {
        return (1..=24).contains(&n).then_some(0x70 + n - 1);
    }

    NAMED_KEYS
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, code)| *code)
}

/// Numeric key codes: `0x1F` (hex), `017` (octal), `65` (decimal).
///
/// A lone digit is a digit key, not a code, so `key_1` means the "1" key.
fn parse_numeric(text: &str) -> Option<u32> {
    if let Some(hex) = text.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).ok();
    }
    if text.len() == 1 {
        return text
            .as_bytes()
            .first()
            .filter(|b| b.is_ascii_digit())
            .map(|b| *b as u32);
    }
    if let Some(octal) = text.strip_prefix('0') {
        return u32::from_str_radix(octal, 8).ok();
    }
    text.parse::<u32>().ok()
}
