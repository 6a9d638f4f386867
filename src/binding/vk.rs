//! Virtual key codes used by the capture logic.

pub const BACK: u32 = 0x08;
pub const TAB: u32 = 0x09;
pub const RETURN: u32 = 0x0D;
pub const SHIFT: u32 = 0x10;
pub const CONTROL: u32 = 0x11;
pub const MENU: u32 = 0x12;
pub const ESCAPE: u32 = 0x1B;
pub const SPACE: u32 = 0x20;
pub const LEFT: u32 = 0x25;
pub const UP: u32 = 0x26;
pub const RIGHT: u32 = 0x27;
pub const DOWN: u32 = 0x28;
pub const F1: u32 = 0x70;
pub const LSHIFT: u32 = 0xA0;
pub const RSHIFT: u32 = 0xA1;
pub const LCONTROL: u32 = 0xA2;
pub const RCONTROL: u32 = 0xA3;
pub const LMENU: u32 = 0xA4;
pub const RMENU: u32 = 0xA5;

/// Returns true for the control, shift and alt keys (either side).
#[inline]
pub fn is_modifier(vk: u32) -> bool {
    matches!(
        vk,
        SHIFT | CONTROL | MENU | LSHIFT | RSHIFT | LCONTROL | RCONTROL | LMENU | RMENU
    )
}

/// Function key `n` (1-based, up to F24).
#[inline]
pub const fn function_key(n: u32) -> u32 {
    F1 + n - 1
}
