//! Binding text form and key name parsing.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;
use thiserror::Error;

use super::types::*;

/// Keys whose names are not derived from a contiguous code range.
const NAMED_KEYS: &[(u32, &str)] = &[
    (0x08, "BACK"),
    (0x09, "TAB"),
    (0x0D, "RETURN"),
    (0x10, "SHIFT"),
    (0x11, "CTRL"),
    (0x12, "ALT"),
    (0x13, "PAUSE"),
    (0x14, "CAPITAL"),
    (0x1B, "ESCAPE"),
    (0x20, "SPACE"),
    (0x21, "PAGEUP"),
    (0x22, "PAGEDOWN"),
    (0x23, "END"),
    (0x24, "HOME"),
    (0x25, "LEFT"),
    (0x26, "UP"),
    (0x27, "RIGHT"),
    (0x28, "DOWN"),
    (0x2C, "SNAPSHOT"),
    (0x2D, "INSERT"),
    (0x2E, "DELETE"),
    (0x5B, "LWIN"),
    (0x5C, "RWIN"),
    (0x6A, "MULTIPLY"),
    (0x6B, "ADD"),
    (0x6C, "SEPARATOR"),
    (0x6D, "SUBTRACT"),
    (0x6E, "DECIMAL"),
    (0x6F, "DIVIDE"),
    (0x90, "NUMLOCK"),
    (0x91, "SCROLL"),
    (0xA0, "LSHIFT"),
    (0xA1, "RSHIFT"),
    (0xA2, "LCTRL"),
    (0xA3, "RCTRL"),
    (0xA4, "LALT"),
    (0xA5, "RALT"),
    (0xBA, "OEM_1"),
    (0xBB, "OEM_PLUS"),
    (0xBC, "OEM_COMMA"),
    (0xBD, "OEM_MINUS"),
    (0xBE, "OEM_PERIOD"),
    (0xBF, "OEM_2"),
    (0xC0, "OEM_3"),
    (0xDB, "OEM_4"),
    (0xDC, "OEM_5"),
    (0xDD, "OEM_6"),
    (0xDE, "OEM_7"),
    (0xDF, "OEM_8"),
    (0xE2, "OEM_102"),
];

/// Converts a virtual key code to its key name.
///
/// Unknown codes are rendered as `VK_XX` so they still round-trip.
pub fn vk_to_key_name(vk: u32) -> String {
    match vk {
        0x30..=0x39 | 0x41..=0x5A => char::from_u32(vk)
            .map(|c| c.to_string())
            .unwrap_or_default(),
        0x60..=0x69 => format!("NUMPAD{}", vk - 0x60),
        0x70..=0x87 => format!("F{}", vk - 0x70 + 1),
        _ => NAMED_KEYS
            .iter()
            .find(|(code, _)| *code == vk)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| format!("VK_{:02X}", vk)),
    }
}

/// Converts a key name (case insensitive) to a virtual key code.
pub fn key_name_to_vk(key_name: &str) -> Option<u32> {
    let key = key_name.trim().to_uppercase();

    if key.len() == 1
        && let Some(c) = key.chars().next()
        && (c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Some(c as u32);
    }

    if let Some(num) = key.strip_prefix('F')
        && let Ok(num) = num.parse::<u32>()
        && (1..=24).contains(&num)
    {
        return Some(0x70 + num - 1);
    }

    if let Some(num) = key.strip_prefix("NUMPAD")
        && let Ok(num) = num.parse::<u32>()
        && num <= 9
    {
        return Some(0x60 + num);
    }

    if let Some(hex) = key.strip_prefix("VK_") {
        return u32::from_str_radix(hex, 16).ok();
    }

    let key = match key.as_str() {
        "ESC" => "ESCAPE",
        "ENTER" => "RETURN",
        "BACKSPACE" => "BACK",
        "CAPSLOCK" => "CAPITAL",
        "CONTROL" => "CTRL",
        "LCONTROL" => "LCTRL",
        "RCONTROL" => "RCTRL",
        other => other,
    };

    NAMED_KEYS
        .iter()
        .find(|(_, name)| *name == key)
        .map(|(code, _)| *code)
}

/// Error returned when a binding string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBindingError {
    #[error("unknown key name `{0}`")]
    UnknownKey(String),
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("malformed joystick binding `{0}`")]
    MalformedJoystick(String),
    #[error("invalid joystick threshold `{0}`")]
    InvalidThreshold(String),
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::None => Ok(()),
            Binding::Key { vk, modifiers } => {
                for (flag, name) in [
                    (Modifiers::CTRL, "CTRL"),
                    (Modifiers::SHIFT, "SHIFT"),
                    (Modifiers::ALT, "ALT"),
                ] {
                    if modifiers.contains(flag) {
                        write!(f, "{}+", name)?;
                    }
                }
                write!(f, "{}", vk_to_key_name(*vk))
            }
            Binding::Joystick {
                device,
                param,
                threshold,
            } => {
                write!(f, "JOY{}_", device)?;
                match param {
                    JoyParam::Button(button) => write!(f, "BUTTON{}", button)?,
                    JoyParam::Axis { axis, direction } => {
                        let dir = match direction {
                            AxisDirection::Positive => "POS",
                            AxisDirection::Negative => "NEG",
                        };
                        write!(f, "AXIS{}_{}", axis, dir)?
                    }
                }
                write!(f, "@{}", threshold)
            }
        }
    }
}

impl FromStr for Binding {
    type Err = ParseBindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_uppercase();
        if text.is_empty() {
            return Ok(Binding::None);
        }

        if let Some(rest) = text.strip_prefix("JOY")
            && rest.starts_with(|c: char| c.is_ascii_digit())
        {
            return parse_joystick(&text, rest);
        }

        parse_key(&text)
    }
}

fn parse_key(text: &str) -> Result<Binding, ParseBindingError> {
    let parts: SmallVec<[&str; 4]> = text.split('+').collect();
    let Some((key_name, modifier_names)) = parts.split_last() else {
        return Err(ParseBindingError::UnknownKey(text.to_string()));
    };

    let mut modifiers = Modifiers::empty();
    for name in modifier_names {
        modifiers |= match name.trim() {
            "CTRL" | "CONTROL" => Modifiers::CTRL,
            "SHIFT" => Modifiers::SHIFT,
            "ALT" => Modifiers::ALT,
            other => return Err(ParseBindingError::UnknownModifier(other.to_string())),
        };
    }

    let vk = key_name_to_vk(key_name)
        .ok_or_else(|| ParseBindingError::UnknownKey(key_name.trim().to_string()))?;
    Ok(Binding::key(vk, modifiers))
}

fn parse_joystick(text: &str, rest: &str) -> Result<Binding, ParseBindingError> {
    let malformed = || ParseBindingError::MalformedJoystick(text.to_string());

    let (body, threshold) = match rest.split_once('@') {
        Some((body, threshold)) => {
            let threshold = threshold
                .parse::<u16>()
                .map_err(|_| ParseBindingError::InvalidThreshold(threshold.to_string()))?;
            (body, threshold)
        }
        None => (rest, DEFAULT_JOYSTICK_THRESHOLD),
    };

    let (device, input) = body.split_once('_').ok_or_else(malformed)?;
    let device = device.parse::<u8>().map_err(|_| malformed())?;

    let param = if let Some(button) = input.strip_prefix("BUTTON") {
        JoyParam::Button(button.parse::<u16>().map_err(|_| malformed())?)
    } else if let Some(axis) = input.strip_prefix("AXIS") {
        let (axis, direction) = axis.split_once('_').ok_or_else(malformed)?;
        let direction = match direction {
            "POS" => AxisDirection::Positive,
            "NEG" => AxisDirection::Negative,
            _ => return Err(malformed()),
        };
        JoyParam::Axis {
            axis: axis.parse::<u8>().map_err(|_| malformed())?,
            direction,
        }
    } else {
        return Err(malformed());
    };

    Ok(Binding::joystick(device, param, threshold))
}

impl TryFrom<String> for Binding {
    type Error = ParseBindingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Binding> for String {
    fn from(binding: Binding) -> Self {
        binding.to_string()
    }
}
