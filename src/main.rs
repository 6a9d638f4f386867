use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use padbind::controls::Control;
use padbind::joystick::JoystickHub;
use padbind::pools::BindingPool;
use padbind::{BindingConfig, DialogResponse, PreferencesDialog};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "Bindings.toml";
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config_path = PathBuf::from(DEFAULT_CONFIG);
    let mut bind_target = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => bind_target = Some(args.next().context("--bind needs a control name")?),
            _ => config_path = PathBuf::from(arg),
        }
    }

    let mut config = BindingConfig::load_or_create(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    if let Some(control) = bind_target {
        capture_joystick(&mut config, &config_path, &control)?;
    }

    print_bindings(&config);
    Ok(())
}

fn open_joysticks(threshold: u16) -> JoystickHub {
    #[cfg(windows)]
    {
        JoystickHub::with_xinput(threshold)
    }
    #[cfg(not(windows))]
    {
        let _ = threshold;
        JoystickHub::new()
    }
}

/// Waits for one joystick input and binds it to `control`.
fn capture_joystick(config: &mut BindingConfig, path: &Path, control: &str) -> Result<()> {
    let mut hub = open_joysticks(config.joystick_threshold);
    if hub.is_empty() {
        bail!("No joysticks connected");
    }

    let mut dialog = PreferencesDialog::open(config, &mut hub, Some(path.to_path_buf()));
    dialog.session_mut().focus_named(control)?;
    println!("Press a joystick button or move an axis for `{}`...", control);

    let deadline = Instant::now() + CAPTURE_TIMEOUT;
    while Instant::now() < deadline {
        if dialog.tick(Instant::now()).is_some() {
            dialog.respond(DialogResponse::Ok)?;
            return Ok(());
        }
        thread::sleep(Duration::from_millis(10));
    }

    dialog.respond(DialogResponse::Cancel)?;
    bail!(
        "No joystick input within {} seconds",
        CAPTURE_TIMEOUT.as_secs()
    )
}

fn print_bindings(config: &BindingConfig) {
    println!("Shortcuts:");
    print_pool(&config.shortcuts);

    for (index, pad) in config.joypads.iter().enumerate() {
        if pad.is_empty() {
            continue;
        }
        println!("\nJoypad {}:", index + 1);
        print_pool(pad);
    }
}

fn print_pool<C: Control>(pool: &BindingPool<C>) {
    for (control, binding) in pool.iter().filter(|(_, binding)| !binding.is_empty()) {
        println!("  {:<24} {}", control.name(), binding.label());
    }
}
