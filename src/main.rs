// Sys Manager - Main Entry Point
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Sys Manager
//!
//! Command-line front end for the Wi-Fi, Bluetooth, brightness and volume
//! services.

use std::env;
use std::process::ExitCode;

use sys_manager::models::{AuthAlgorithm, CipherAlgorithm};
use sys_manager::shell::SettingsPage;
use sys_manager::storage::ConfigStore;
use sys_manager::{APP_NAME, VERSION};

/// Print version information.
fn print_version() {
    println!("{} {}", APP_NAME, VERSION);
    println!("Copyright (C) 2026 Christos A. Daggas");
    println!("License: MIT");
}

/// Print help information.
fn print_help() {
    println!(
        "Usage: {} [OPTIONS] <GROUP> <COMMAND> [ARGS]",
        env::args().next().unwrap_or_else(|| "sys-manager".to_string())
    );
    println!();
    println!("Wi-Fi, Bluetooth, brightness and volume control for Windows.");
    println!();
    println!("Options:");
    println!("  -h, --help       Show this help message and exit");
    println!("  -v, --version    Show version information and exit");
    println!("  -j, --json       Print results as JSON");
    println!("  -d, --debug      Enable debug logging");
    println!();
    println!("Commands:");
    println!("  wifi        interfaces | scan | networks | current | profiles");
    println!("              connect <profile> | join <ssid> <password> [auth] [cipher]");
    println!("              disconnect | forget <profile>");
    println!("  bluetooth   radios | devices | paired | connected");
    println!("              discoverable on|off | connectable on|off");
    println!("  brightness  get | set <n> | up [n] | down [n] | monitors | levels");
    println!("  volume      get | set <n> | up [n] | down [n] | mute | unmute | toggle");
    println!("              steps | range | step-up | step-down");
    println!("  open        network | wifi-flyout | vpn | bluetooth | pairing | sound | mixer");
    println!();
    println!("Environment variables:");
    println!("  RUST_LOG         Set log level (trace, debug, info, warn, error)");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum WifiCommand {
    Interfaces,
    Scan,
    Networks,
    Current,
    Profiles,
    Connect(String),
    Join {
        ssid: String,
        password: String,
        auth: AuthAlgorithm,
        cipher: CipherAlgorithm,
    },
    Disconnect,
    Forget(String),
}

impl WifiCommand {
    /// Commands that act on an interface and fail without one; listings
    /// print nothing instead.
    fn needs_interface(&self) -> bool {
        matches!(
            self,
            Self::Connect(_) | Self::Join { .. } | Self::Disconnect | Self::Forget(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BluetoothCommand {
    Radios,
    Devices,
    Paired,
    Connected,
    Discoverable(bool),
    Connectable(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrightnessCommand {
    Get,
    Set(u32),
    Up(Option<u32>),
    Down(Option<u32>),
    Monitors,
    Levels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VolumeCommand {
    Get,
    Set(u32),
    Up(Option<u32>),
    Down(Option<u32>),
    Mute,
    Unmute,
    Toggle,
    Steps,
    Range,
    StepUp,
    StepDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Wifi(WifiCommand),
    Bluetooth(BluetoothCommand),
    Brightness(BrightnessCommand),
    Volume(VolumeCommand),
    Open(SettingsPage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Help,
    Version,
    Run {
        command: Command,
        json: bool,
        debug: bool,
    },
}

fn parse_percent(value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("Expected a number, got '{}'", value))
}

fn parse_switch(value: Option<&str>) -> Result<bool, String> {
    match value {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        Some(other) => Err(format!("Expected 'on' or 'off', got '{}'", other)),
        None => Err("Expected 'on' or 'off'".to_string()),
    }
}

fn required<'a>(args: &[&'a str], index: usize, what: &str) -> Result<&'a str, String> {
    args.get(index)
        .copied()
        .ok_or_else(|| format!("Missing argument: {}", what))
}

fn parse_wifi(args: &[&str]) -> Result<WifiCommand, String> {
    Ok(match args.first().copied() {
        Some("interfaces") => WifiCommand::Interfaces,
        Some("scan") => WifiCommand::Scan,
        Some("networks") => WifiCommand::Networks,
        Some("current") => WifiCommand::Current,
        Some("profiles") => WifiCommand::Profiles,
        Some("connect") => WifiCommand::Connect(required(args, 1, "profile")?.to_string()),
        Some("join") => WifiCommand::Join {
            ssid: required(args, 1, "ssid")?.to_string(),
            password: required(args, 2, "password")?.to_string(),
            auth: args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(AuthAlgorithm::RsnaPsk),
            cipher: args.get(4).map(|s| s.parse()).transpose()?.unwrap_or(CipherAlgorithm::Ccmp),
        },
        Some("disconnect") => WifiCommand::Disconnect,
        Some("forget") => WifiCommand::Forget(required(args, 1, "profile")?.to_string()),
        Some(other) => return Err(format!("Unknown wifi command: {}", other)),
        None => return Err("Missing wifi command".to_string()),
    })
}

fn parse_bluetooth(args: &[&str]) -> Result<BluetoothCommand, String> {
    Ok(match args.first().copied() {
        Some("radios") => BluetoothCommand::Radios,
        Some("devices") => BluetoothCommand::Devices,
        Some("paired") => BluetoothCommand::Paired,
        Some("connected") => BluetoothCommand::Connected,
        Some("discoverable") => BluetoothCommand::Discoverable(parse_switch(args.get(1).copied())?),
        Some("connectable") => BluetoothCommand::Connectable(parse_switch(args.get(1).copied())?),
        Some(other) => return Err(format!("Unknown bluetooth command: {}", other)),
        None => return Err("Missing bluetooth command".to_string()),
    })
}

fn optional_amount(args: &[&str]) -> Result<Option<u32>, String> {
    args.get(1).map(|s| parse_percent(s)).transpose()
}

fn parse_brightness(args: &[&str]) -> Result<BrightnessCommand, String> {
    Ok(match args.first().copied() {
        Some("get") => BrightnessCommand::Get,
        Some("set") => BrightnessCommand::Set(parse_percent(required(args, 1, "percent")?)?),
        Some("up") => BrightnessCommand::Up(optional_amount(args)?),
        Some("down") => BrightnessCommand::Down(optional_amount(args)?),
        Some("monitors") => BrightnessCommand::Monitors,
        Some("levels") => BrightnessCommand::Levels,
        Some(other) => return Err(format!("Unknown brightness command: {}", other)),
        None => return Err("Missing brightness command".to_string()),
    })
}

fn parse_volume(args: &[&str]) -> Result<VolumeCommand, String> {
    Ok(match args.first().copied() {
        Some("get") => VolumeCommand::Get,
        Some("set") => VolumeCommand::Set(parse_percent(required(args, 1, "percent")?)?),
        Some("up") => VolumeCommand::Up(optional_amount(args)?),
        Some("down") => VolumeCommand::Down(optional_amount(args)?),
        Some("mute") => VolumeCommand::Mute,
        Some("unmute") => VolumeCommand::Unmute,
        Some("toggle") => VolumeCommand::Toggle,
        Some("steps") => VolumeCommand::Steps,
        Some("range") => VolumeCommand::Range,
        Some("step-up") => VolumeCommand::StepUp,
        Some("step-down") => VolumeCommand::StepDown,
        Some(other) => return Err(format!("Unknown volume command: {}", other)),
        None => return Err("Missing volume command".to_string()),
    })
}

/// Parse the arguments after the program name.
fn parse_args(args: &[String]) -> Result<Action, String> {
    let mut json = false;
    let mut debug = false;
    let mut positional: Vec<&str> = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Action::Help),
            "-v" | "--version" => return Ok(Action::Version),
            "-j" | "--json" => json = true,
            "-d" | "--debug" => debug = true,
            other if other.starts_with('-') && positional.is_empty() => {
                return Err(format!("Unknown option: {}", other));
            }
            other => positional.push(other),
        }
    }

    let Some((group, rest)) = positional.split_first() else {
        return Ok(Action::Help);
    };

    let command = match *group {
        "wifi" => Command::Wifi(parse_wifi(rest)?),
        "bluetooth" => Command::Bluetooth(parse_bluetooth(rest)?),
        "brightness" => Command::Brightness(parse_brightness(rest)?),
        "volume" => Command::Volume(parse_volume(rest)?),
        "open" => Command::Open(required(rest, 0, "page")?.parse()?),
        other => return Err(format!("Unknown command group: {}", other)),
    };

    Ok(Action::Run { command, json, debug })
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let (command, json, debug) = match parse_args(&args) {
        Ok(Action::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(Action::Version) => {
            print_version();
            return ExitCode::SUCCESS;
        }
        Ok(Action::Run { command, json, debug }) => (command, json, debug),
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Try '--help' for more information.");
            return ExitCode::FAILURE;
        }
    };

    let store = ConfigStore::new();
    let config = store.config().clone();

    // Initialize logging with appropriate level
    let log_level = if debug {
        tracing::Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(tracing::Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .init();

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);
    execute(command, json, &config)
}

#[cfg(not(windows))]
fn execute(command: Command, _json: bool, _config: &sys_manager::models::AppConfig) -> ExitCode {
    tracing::debug!("Cannot run {:?} on this platform", command);
    eprintln!("{} controls Windows native services and cannot run on this platform.", APP_NAME);
    ExitCode::FAILURE
}

#[cfg(windows)]
fn execute(command: Command, json: bool, config: &sys_manager::models::AppConfig) -> ExitCode {
    match runner::run(command, json, config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(windows)]
mod runner {
    use serde::Serialize;
    use std::fmt::Display;
    use zeroize::Zeroizing;

    use super::{BluetoothCommand, BrightnessCommand, Command, VolumeCommand, WifiCommand};
    use sys_manager::models::{AppConfig, Error, EventBus, Result};
    use sys_manager::native::win32::ShellLauncher;
    use sys_manager::services::{AudioService, BluetoothService, BrightnessService, WirelessService};
    use sys_manager::shell::open_page;

    struct Output {
        json: bool,
    }

    impl Output {
        fn value<T: Serialize + Display>(&self, value: &T) {
            if self.json {
                self.print_json(value);
            } else {
                println!("{}", value);
            }
        }

        fn list<T: Serialize>(&self, items: &[T], line: impl Fn(&T) -> String) {
            if self.json {
                self.print_json(&items);
            } else if items.is_empty() {
                println!("(none)");
            } else {
                for item in items {
                    println!("{}", line(item));
                }
            }
        }

        fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
            match serde_json::to_string_pretty(value) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("Failed to encode JSON: {}", e),
            }
        }

        /// Report a mutation; returns it for the exit code.
        fn done(&self, ok: bool) -> bool {
            if self.json {
                self.print_json(&serde_json::json!({ "success": ok }));
            } else {
                println!("{}", if ok { "OK" } else { "Failed" });
            }
            ok
        }
    }

    pub fn run(command: Command, json: bool, config: &AppConfig) -> Result<bool> {
        let out = Output { json };
        let events = EventBus::new(config.event_capacity);
        let mut rx = events.subscribe();

        let ok = match command {
            Command::Wifi(cmd) => run_wifi(cmd, &out, config, events)?,
            Command::Bluetooth(cmd) => run_bluetooth(cmd, &out, events),
            Command::Brightness(cmd) => run_brightness(cmd, &out, config, events),
            Command::Volume(cmd) => run_volume(cmd, &out, config, events),
            Command::Open(page) => out.done(open_page(&ShellLauncher, page)),
        };

        while let Ok(event) = rx.try_recv() {
            tracing::info!("{:?}", event);
        }
        Ok(ok)
    }

    fn run_wifi(cmd: WifiCommand, out: &Output, config: &AppConfig, events: EventBus) -> Result<bool> {
        let mut svc = WirelessService::open(config, events)?;
        if cmd.needs_interface() && svc.list_interfaces().is_empty() {
            return Err(Error::NoInterface);
        }

        Ok(match cmd {
            WifiCommand::Interfaces => {
                let interfaces = svc.list_interfaces();
                out.list(&interfaces, |i| format!("{}  {}  {}", i.id, i.state.display_name(), i.description));
                true
            }
            WifiCommand::Scan => {
                out.list(&svc.scan(true), |n| n.to_string());
                true
            }
            WifiCommand::Networks => {
                out.list(&svc.list_networks(), |n| n.to_string());
                true
            }
            WifiCommand::Current => {
                let current: Vec<_> = svc.current_connection().into_iter().collect();
                out.list(&current, |n| n.to_string());
                true
            }
            WifiCommand::Profiles => {
                out.list(&svc.list_saved_profiles(), |p| p.name.clone());
                true
            }
            WifiCommand::Connect(profile) => out.done(svc.connect(&profile)),
            WifiCommand::Join { ssid, password, auth, cipher } => {
                out.done(svc.connect_with_credentials(&ssid, Zeroizing::new(password), auth, cipher))
            }
            WifiCommand::Disconnect => out.done(svc.disconnect()),
            WifiCommand::Forget(profile) => out.done(svc.delete_profile(&profile)),
        })
    }

    fn run_bluetooth(cmd: BluetoothCommand, out: &Output, events: EventBus) -> bool {
        let mut svc = BluetoothService::open(events);
        let device_line = |d: &sys_manager::models::BluetoothDevice| {
            format!("{}  {:<9}  {:<12}  {}", d.address, d.status_label(), d.category().display_name(), d.name)
        };
        match cmd {
            BluetoothCommand::Radios => {
                out.list(&svc.list_radios(), |r| {
                    format!(
                        "{}  {}  manufacturer {:#06x}{}{}",
                        r.address,
                        r.name,
                        r.manufacturer,
                        if r.connectable { "  connectable" } else { "" },
                        if r.discoverable { "  discoverable" } else { "" }
                    )
                });
                true
            }
            BluetoothCommand::Devices => {
                out.list(&svc.list_devices(), device_line);
                true
            }
            BluetoothCommand::Paired => {
                out.list(&svc.list_paired(), device_line);
                true
            }
            BluetoothCommand::Connected => {
                out.list(&svc.list_connected(), device_line);
                true
            }
            BluetoothCommand::Discoverable(enable) => out.done(svc.set_discoverable(enable)),
            BluetoothCommand::Connectable(enable) => out.done(svc.set_connectable(enable)),
        }
    }

    fn run_brightness(cmd: BrightnessCommand, out: &Output, config: &AppConfig, events: EventBus) -> bool {
        let svc = BrightnessService::open(config, events);
        match cmd {
            BrightnessCommand::Get => match svc.get_brightness() {
                Some(percent) => {
                    out.value(&percent);
                    true
                }
                None => {
                    if out.json {
                        out.print_json(&serde_json::Value::Null);
                    } else {
                        println!("unknown");
                    }
                    false
                }
            },
            BrightnessCommand::Set(percent) => out.done(svc.set_brightness(percent)),
            BrightnessCommand::Up(amount) => out.done(svc.increase(amount.unwrap_or(svc.step()))),
            BrightnessCommand::Down(amount) => out.done(svc.decrease(amount.unwrap_or(svc.step()))),
            BrightnessCommand::Monitors => {
                out.list(&svc.list_monitors(), |m| {
                    format!("{:>3}%  {}  {}", m.percent(), svc.backend_kind().display_name(), m.description)
                });
                true
            }
            BrightnessCommand::Levels => {
                let levels = svc.brightness_levels();
                out.list(&levels, |l| l.to_string());
                true
            }
        }
    }

    fn run_volume(cmd: VolumeCommand, out: &Output, config: &AppConfig, events: EventBus) -> bool {
        let mut svc = AudioService::open(config, events);
        match cmd {
            VolumeCommand::Get => {
                let state = svc.state();
                if out.json {
                    out.print_json(&state);
                } else {
                    println!("{}%{}", state.percent(), if state.muted { " (muted)" } else { "" });
                }
                true
            }
            VolumeCommand::Set(percent) => out.done(svc.set_volume(percent)),
            VolumeCommand::Up(amount) => {
                let amount = amount.unwrap_or(svc.step());
                out.done(svc.increase(amount))
            }
            VolumeCommand::Down(amount) => {
                let amount = amount.unwrap_or(svc.step());
                out.done(svc.decrease(amount))
            }
            VolumeCommand::Mute => out.done(svc.set_mute(true)),
            VolumeCommand::Unmute => out.done(svc.set_mute(false)),
            VolumeCommand::Toggle => out.done(svc.toggle_mute()),
            VolumeCommand::Steps => {
                let steps = svc.get_volume_steps();
                if out.json {
                    out.print_json(&steps);
                } else {
                    println!("{} / {}", steps.current, steps.total);
                }
                true
            }
            VolumeCommand::Range => {
                let range = svc.get_volume_range();
                if out.json {
                    out.print_json(&range);
                } else {
                    println!("{} dB .. {} dB (step {} dB)", range.min_db, range.max_db, range.increment_db);
                }
                true
            }
            VolumeCommand::StepUp => out.done(svc.step_up()),
            VolumeCommand::StepDown => out.done(svc.step_down()),
        }
    }
}
