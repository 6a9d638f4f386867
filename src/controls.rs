//! Logical controls that can receive a binding.
//!
//! Joypad controls exist once per emulated controller slot. Shortcuts are
//! global emulator actions. Both enumerations are stable: their order is the
//! order in which the dialog lists and traverses them, and their names are
//! the keys used in the configuration file.

use std::fmt;
use std::str::FromStr;

use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Number of emulated controller slots.
pub const NUM_JOYPADS: usize = 8;
/// Number of joypad controls per slot.
pub const NUM_JOYPAD_LINKS: usize = JoypadControl::COUNT;
/// Number of global shortcuts.
pub const NUM_SHORTCUTS: usize = Shortcut::COUNT;
/// Total number of bindable controls shown in the dialog.
pub const NUM_EMU_LINKS: usize = NUM_JOYPAD_LINKS + NUM_SHORTCUTS;

/// Visual group a control belongs to. Focus auto-advance never crosses a
/// group boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlGroup {
    Buttons,
    Turbo,
    Sticky,
    Emulator,
    Display,
    SaveStates,
    Sound,
}

/// Common interface of [`JoypadControl`] and [`Shortcut`].
pub trait Control:
    Copy
    + Eq
    + fmt::Debug
    + IntoEnumIterator
    + EnumCount
    + Into<&'static str>
    + FromStr
    + 'static
{
    /// Position of the control inside its pool.
    fn index(self) -> usize;

    fn group(self) -> ControlGroup;

    /// Stable configuration name.
    #[inline]
    fn name(self) -> &'static str {
        self.into()
    }

    /// Looks a control up by its position inside its pool.
    fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum JoypadControl {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    L,
    R,
    Start,
    Select,
    TurboA,
    TurboB,
    TurboX,
    TurboY,
    TurboL,
    TurboR,
    StickyA,
    StickyB,
    StickyX,
    StickyY,
    StickyL,
    StickyR,
}

impl Control for JoypadControl {
    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    fn group(self) -> ControlGroup {
        use JoypadControl::*;
        match self {
            Up | Down | Left | Right | A | B | X | Y | L | R | Start | Select => {
                ControlGroup::Buttons
            }
            TurboA | TurboB | TurboX | TurboY | TurboL | TurboR => ControlGroup::Turbo,
            StickyA | StickyB | StickyX | StickyY | StickyL | StickyR => ControlGroup::Sticky,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Shortcut {
    OpenRom,
    EnableTurbo,
    ToggleTurbo,
    Pause,
    SoftReset,
    HardReset,
    Quit,
    ToggleFullscreen,
    SaveScreenshot,
    SaveSpc,
    Rewind,
    GrabMouse,
    #[strum(serialize = "swap_controllers_1_2")]
    SwapControllers12,
    SeekToFrame,

    #[strum(serialize = "toggle_bg_layer_0")]
    ToggleBgLayer0,
    #[strum(serialize = "toggle_bg_layer_1")]
    ToggleBgLayer1,
    #[strum(serialize = "toggle_bg_layer_2")]
    ToggleBgLayer2,
    #[strum(serialize = "toggle_bg_layer_3")]
    ToggleBgLayer3,
    ToggleSprites,
    DecreaseFrameRate,
    IncreaseFrameRate,
    DecreaseFrameTime,
    IncreaseFrameTime,

    #[strum(serialize = "quick_save_0")]
    QuickSave0,
    #[strum(serialize = "quick_save_1")]
    QuickSave1,
    #[strum(serialize = "quick_save_2")]
    QuickSave2,
    #[strum(serialize = "quick_save_3")]
    QuickSave3,
    #[strum(serialize = "quick_save_4")]
    QuickSave4,
    #[strum(serialize = "quick_save_5")]
    QuickSave5,
    #[strum(serialize = "quick_save_6")]
    QuickSave6,
    #[strum(serialize = "quick_save_7")]
    QuickSave7,
    #[strum(serialize = "quick_save_8")]
    QuickSave8,
    #[strum(serialize = "quick_save_9")]
    QuickSave9,
    #[strum(serialize = "quick_load_0")]
    QuickLoad0,
    #[strum(serialize = "quick_load_1")]
    QuickLoad1,
    #[strum(serialize = "quick_load_2")]
    QuickLoad2,
    #[strum(serialize = "quick_load_3")]
    QuickLoad3,
    #[strum(serialize = "quick_load_4")]
    QuickLoad4,
    #[strum(serialize = "quick_load_5")]
    QuickLoad5,
    #[strum(serialize = "quick_load_6")]
    QuickLoad6,
    #[strum(serialize = "quick_load_7")]
    QuickLoad7,
    #[strum(serialize = "quick_load_8")]
    QuickLoad8,
    #[strum(serialize = "quick_load_9")]
    QuickLoad9,
    SaveCurrentSlot,
    LoadCurrentSlot,
    IncrementSlot,
    DecrementSlot,

    Mute,
    #[strum(serialize = "sound_channel_0")]
    SoundChannel0,
    #[strum(serialize = "sound_channel_1")]
    SoundChannel1,
    #[strum(serialize = "sound_channel_2")]
    SoundChannel2,
    #[strum(serialize = "sound_channel_3")]
    SoundChannel3,
    #[strum(serialize = "sound_channel_4")]
    SoundChannel4,
    #[strum(serialize = "sound_channel_5")]
    SoundChannel5,
    #[strum(serialize = "sound_channel_6")]
    SoundChannel6,
    #[strum(serialize = "sound_channel_7")]
    SoundChannel7,
    AllSoundChannels,
}

impl Control for Shortcut {
    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    fn group(self) -> ControlGroup {
        let index = self.index();
        if index <= Shortcut::SeekToFrame.index() {
            ControlGroup::Emulator
        } else if index <= Shortcut::IncreaseFrameTime.index() {
            ControlGroup::Display
        } else if index <= Shortcut::DecrementSlot.index() {
            ControlGroup::SaveStates
        } else {
            ControlGroup::Sound
        }
    }
}
