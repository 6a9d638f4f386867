use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{fmt::Write as _, fs, path::Path};

use crate::binding::{Binding, DEFAULT_JOYSTICK_THRESHOLD, Modifiers, key_name_to_vk};
use crate::controls::{Control, ControlGroup, JoypadControl, NUM_JOYPADS, Shortcut};
use crate::pools::{BindingPool, JoypadBinding, ShortcutBindings};

/// Largest meaningful axis threshold.
pub const MAX_JOYSTICK_THRESHOLD: u16 = i16::MAX as u16;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BindingConfig {
    #[serde(default = "default_joystick_threshold")]
    pub joystick_threshold: u16,
    #[serde(default)]
    pub use_modifiers: bool,
    #[serde(default)]
    pub shortcuts: ShortcutBindings,
    #[serde(default)]
    pub joypads: Vec<JoypadBinding>,
}

fn default_joystick_threshold() -> u16 {
    DEFAULT_JOYSTICK_THRESHOLD
}

fn key(name: &str) -> Binding {
    key_with(name, Modifiers::empty())
}

fn key_with(name: &str, modifiers: Modifiers) -> Binding {
    key_name_to_vk(name).map_or(Binding::None, |vk| Binding::key(vk, modifiers))
}

impl Default for BindingConfig {
    /// Keyboard layout on the first joypad and the usual emulator hotkeys.
    fn default() -> Self {
        let mut pad = JoypadBinding::new();
        for (control, name) in [
            (JoypadControl::Up, "UP"),
            (JoypadControl::Down, "DOWN"),
            (JoypadControl::Left, "LEFT"),
            (JoypadControl::Right, "RIGHT"),
            (JoypadControl::A, "D"),
            (JoypadControl::B, "C"),
            (JoypadControl::X, "S"),
            (JoypadControl::Y, "X"),
            (JoypadControl::L, "A"),
            (JoypadControl::R, "Z"),
            (JoypadControl::Start, "RETURN"),
            (JoypadControl::Select, "SPACE"),
        ] {
            pad.set(control, key(name));
        }

        let mut shortcuts = ShortcutBindings::new();
        shortcuts.set(Shortcut::OpenRom, key_with("O", Modifiers::CTRL));
        shortcuts.set(Shortcut::EnableTurbo, key("TAB"));
        shortcuts.set(Shortcut::Pause, key("PAUSE"));
        shortcuts.set(Shortcut::SoftReset, key_with("R", Modifiers::CTRL));
        shortcuts.set(Shortcut::Quit, key_with("Q", Modifiers::CTRL));
        shortcuts.set(Shortcut::ToggleFullscreen, key("F11"));
        shortcuts.set(Shortcut::SaveScreenshot, key("F12"));
        shortcuts.set(Shortcut::Rewind, key("BACK"));
        for slot in 0..10 {
            let fkey = format!("F{}", slot + 1);
            if let Some(save) = Shortcut::from_index(Shortcut::QuickSave0.index() + slot) {
                shortcuts.set(save, key_with(&fkey, Modifiers::SHIFT));
            }
            if let Some(load) = Shortcut::from_index(Shortcut::QuickLoad0.index() + slot) {
                shortcuts.set(load, key(&fkey));
            }
        }

        let mut joypads = vec![pad];
        joypads.resize_with(NUM_JOYPADS, JoypadBinding::new);

        Self {
            joystick_threshold: DEFAULT_JOYSTICK_THRESHOLD,
            use_modifiers: false,
            shortcuts,
            joypads,
        }
    }
}

impl BindingConfig {
    /// Load config from file, or create default if not exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            let default_config = Self::default();
            default_config.save_to_file(&path)?;
            tracing::info!("Created default config at {}", path.as_ref().display());
            return Ok(default_config);
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: BindingConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.normalize();
        Ok(config)
    }

    /// Clamps values into range and fixes the profile count.
    fn normalize(&mut self) {
        self.joystick_threshold = self.joystick_threshold.clamp(1, MAX_JOYSTICK_THRESHOLD);

        if self.joypads.len() > NUM_JOYPADS {
            tracing::warn!(
                "Config has {} joypad profiles, keeping the first {}",
                self.joypads.len(),
                NUM_JOYPADS
            );
            self.joypads.truncate(NUM_JOYPADS);
        }
        self.joypads.resize_with(NUM_JOYPADS, JoypadBinding::new);
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let mut result = format!(
            "joystick_threshold = {}    # Axis travel needed before a joystick axis counts as pressed (1-32767)\n\
             use_modifiers = {}         # Allow Ctrl/Shift/Alt to be bound as joypad buttons\n\n\
             # Bindings: \"\" = unbound, keys as \"CTRL+F1\", joysticks as \"JOY0_BUTTON3@16000\" or \"JOY0_AXIS1_NEG@16000\"\n\n",
            self.joystick_threshold, self.use_modifiers,
        );

        result.push_str("[shortcuts]\n");
        write_pool(&mut result, &self.shortcuts);

        for (index, pad) in self.joypads.iter().enumerate() {
            let _ = writeln!(result, "\n# Joypad {}\n[[joypads]]", index + 1);
            write_pool(&mut result, pad);
        }

        fs::write(path.as_ref(), result)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        Ok(())
    }
}

fn write_pool<C: Control>(out: &mut String, pool: &BindingPool<C>) {
    let mut group: Option<ControlGroup> = None;
    for (control, binding) in pool.iter() {
        if group != Some(control.group()) {
            group = Some(control.group());
            let _ = writeln!(out, "# {}", group_title(control.group()));
        }
        let _ = writeln!(out, "{} = \"{}\"", control.name(), binding);
    }
}

fn group_title(group: ControlGroup) -> &'static str {
    match group {
        ControlGroup::Buttons => "Buttons",
        ControlGroup::Turbo => "Turbo buttons",
        ControlGroup::Sticky => "Sticky buttons",
        ControlGroup::Emulator => "Emulator",
        ControlGroup::Display => "Display",
        ControlGroup::SaveStates => "Save states",
        ControlGroup::Sound => "Sound",
    }
}
