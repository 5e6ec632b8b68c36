//! ECP key vocabulary.
//!
//! Fixed key names accepted by `/keypress`, `/keydown` and `/keyup`, plus the
//! `Lit_` encoding used to type arbitrary characters.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::protocol_constants::LITERAL_KEY_PREFIX;

// ─────────────────────────────────────────────────────────────────────────────
// Navigation
// ─────────────────────────────────────────────────────────────────────────────

pub const HOME: &str = "Home";
pub const BACK: &str = "Back";
pub const SELECT: &str = "Select";
pub const UP: &str = "Up";
pub const DOWN: &str = "Down";
pub const LEFT: &str = "Left";
pub const RIGHT: &str = "Right";

// ─────────────────────────────────────────────────────────────────────────────
// Playback
// ─────────────────────────────────────────────────────────────────────────────

pub const PLAY: &str = "Play";
pub const REV: &str = "Rev";
pub const FWD: &str = "Fwd";
pub const INSTANT_REPLAY: &str = "InstantReplay";

// ─────────────────────────────────────────────────────────────────────────────
// Info
// ─────────────────────────────────────────────────────────────────────────────

pub const INFO: &str = "Info";
pub const SEARCH: &str = "Search";

// ─────────────────────────────────────────────────────────────────────────────
// TV Control
// ─────────────────────────────────────────────────────────────────────────────

pub const VOLUME_UP: &str = "VolumeUp";
pub const VOLUME_DOWN: &str = "VolumeDown";
pub const VOLUME_MUTE: &str = "VolumeMute";
pub const POWER: &str = "Power";
pub const POWER_OFF: &str = "PowerOff";
pub const POWER_ON: &str = "PowerOn";
pub const CHANNEL_UP: &str = "ChannelUp";
pub const CHANNEL_DOWN: &str = "ChannelDown";
pub const INPUT_TUNER: &str = "InputTuner";
pub const INPUT_HDMI1: &str = "InputHDMI1";
pub const INPUT_HDMI2: &str = "InputHDMI2";
pub const INPUT_HDMI3: &str = "InputHDMI3";
pub const INPUT_HDMI4: &str = "InputHDMI4";
pub const INPUT_AV1: &str = "InputAV1";

// ─────────────────────────────────────────────────────────────────────────────
// Keyboard
// ─────────────────────────────────────────────────────────────────────────────

pub const BACKSPACE: &str = "Backspace";
pub const ENTER: &str = "Enter";

pub const FIND_REMOTE: &str = "FindRemote";

/// Every fixed key name, in vocabulary order. Excludes `Lit_` keys.
pub const ALL: &[&str] = &[
    HOME,
    BACK,
    SELECT,
    UP,
    DOWN,
    LEFT,
    RIGHT,
    PLAY,
    REV,
    FWD,
    INSTANT_REPLAY,
    INFO,
    SEARCH,
    VOLUME_UP,
    VOLUME_DOWN,
    VOLUME_MUTE,
    POWER,
    POWER_OFF,
    POWER_ON,
    CHANNEL_UP,
    CHANNEL_DOWN,
    INPUT_TUNER,
    INPUT_HDMI1,
    INPUT_HDMI2,
    INPUT_HDMI3,
    INPUT_HDMI4,
    INPUT_AV1,
    BACKSPACE,
    ENTER,
    FIND_REMOTE,
];

/// Characters escaped in a URI component: everything except `A-Za-z0-9-_.~`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encodes a character as a `Lit_` key, percent-encoding its UTF-8 bytes.
///
/// `' '` becomes `Lit_%20`, `'a'` stays `Lit_a`, `'é'` becomes `Lit_%C3%A9`.
#[must_use]
pub fn literal(c: char) -> String {
    let mut buf = [0u8; 4];
    let encoded = utf8_percent_encode(c.encode_utf8(&mut buf), URI_COMPONENT);
    format!("{}{}", LITERAL_KEY_PREFIX, encoded)
}

/// Returns true for a fixed key name or a `Lit_` key.
#[must_use]
pub fn is_known(name: &str) -> bool {
    ALL.contains(&name)
        || name
            .strip_prefix(LITERAL_KEY_PREFIX)
            .is_some_and(|rest| !rest.is_empty())
}
