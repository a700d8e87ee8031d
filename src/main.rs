// The core is exercised only by tests off macOS.
#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

mod activation;
mod app;
mod config;
mod device;
mod display;
mod error;
mod event;
mod hotkey;
#[cfg(target_os = "macos")]
mod platform;
mod presence;
mod shell;
#[cfg(test)]
mod testing;

use config::{load_config, ConfigWatcher};
use event::{ControlBus, ControlEvent};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!(
        "stowbar {}
Tuck menu bar icons behind a divider, and hide the display notch

USAGE:
    stowbar [OPTIONS]

OPTIONS:
    -h, --help            Print this help message
    -v, --version         Print version information
    --default-config      Print the default config file and exit

ENVIRONMENT:
    RUST_LOG         Set log level (error, warn, info, debug, trace)

CONFIG:
    ~/.config/stowbar/config.toml

USAGE NOTES:
    Drag the separator (|) to the left of the arrow in the menu bar.
    Icons left of the separator are hidden when collapsed. Click the arrow
    to toggle; right-click or control-click it for the menu.",
        VERSION
    );
}

fn init_logging() {
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    logger
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {:>5} {}] {}",
                chrono::Utc::now().to_rfc3339(),
                record.level(),
                record.target(),
                record.args()
            )?;
            buf.flush()
        })
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if !args.is_empty() {
        // Only the first argument is processed (flags don't combine)
        match args[0].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-v" | "--version" => {
                println!("stowbar {}", VERSION);
                return;
            }
            "--default-config" => {
                print!("{}", config::default_config_toml());
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[0]);
                eprintln!("Try 'stowbar --help' for more information.");
                std::process::exit(1);
            }
        }
    }

    init_logging();
    log::info!("Starting stowbar v{}", VERSION);

    let config = config::shared(load_config());
    match ConfigWatcher::new(config.clone()) {
        Ok(watcher) => watcher.spawn_polling(),
        Err(e) => log::warn!("Config hot-reload disabled: {}", e),
    }

    let bus = ControlBus::new();
    let quit = bus.sender();
    // Routed through the control loop so the display mode is restored first.
    if let Err(e) = ctrlc::set_handler(move || quit.send(ControlEvent::Quit)) {
        log::warn!("Failed to install signal handler: {}", e);
    }

    run(config, bus);
}

#[cfg(target_os = "macos")]
fn run(config: config::SharedConfig, bus: ControlBus) {
    platform::run(config, bus);
}

#[cfg(not(target_os = "macos"))]
fn run(_config: config::SharedConfig, _bus: ControlBus) {
    log::error!("stowbar needs the macOS menu bar");
    std::process::exit(1);
}
