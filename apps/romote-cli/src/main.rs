//! Romote - command-line remote for Roku devices.
//!
//! Discovers devices over SSDP and sends ECP commands, one operation per
//! invocation. Command failures reported by the core are printed to stderr.

mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use romote_core::{
    bootstrap_services, validate_device_ip, Channel, Device, RemoteEvent, RemoteServices,
};
use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::CliConfig;

/// Romote - control Roku devices from the terminal.
#[derive(Parser, Debug)]
#[command(name = "romote")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE", env = "ROMOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "warn", env = "ROMOTE_LOG_LEVEL")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the local network for devices.
    Discover {
        /// How long to listen for responses (overrides config).
        #[arg(short, long)]
        timeout_ms: Option<u64>,
        /// Print devices as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Query a device's info by IP address.
    Info { ip: String },
    /// Send a key (press by default).
    Key {
        ip: String,
        key: String,
        /// Send key-down only.
        #[arg(long, conflicts_with = "up")]
        down: bool,
        /// Send key-up only.
        #[arg(long)]
        up: bool,
    },
    /// Type text character by character.
    Text { ip: String, text: String },
    /// Launch a channel by id.
    Launch { ip: String, channel_id: String },
    /// List installed channels.
    Apps {
        ip: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the channel currently in the foreground.
    Active { ip: String },
    /// Save a channel's icon to a file.
    Icon {
        ip: String,
        channel_id: String,
        out: PathBuf,
    },
    /// Print the raw media-player state document.
    Media { ip: String },
    /// Send a Wake-on-LAN packet.
    Wake { mac: String },
    /// Wake the device if possible, then toggle power.
    Power { ip: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    let config = CliConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let services =
        bootstrap_services(&config.to_core_config()).context("Failed to bootstrap services")?;
    let mut events = services.event_bridge.subscribe();

    let result = run(&services, &config, args.command).await;

    print_failures(&mut events);
    services.shutdown();
    result
}

async fn run(services: &RemoteServices, config: &CliConfig, command: Command) -> Result<()> {
    match command {
        Command::Discover { timeout_ms, json } => {
            let timeout = timeout_ms.map(Duration::from_millis);
            // Ctrl-C ends the pass early; devices found so far are still printed.
            let interrupt = cancel_on(
                async {
                    let _ = signal::ctrl_c().await;
                },
                services.cancel_token.clone(),
            );
            let devices = services
                .discovery
                .discover(timeout, &services.cancel_token)
                .await;
            interrupt.abort();
            if json {
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else if devices.is_empty() {
                println!("No devices found");
            } else {
                for device in &devices {
                    print_device(device);
                }
            }
        }
        Command::Info { ip } => {
            let device = services
                .discovery
                .validate(&ip, &services.cancel_token)
                .await
                .with_context(|| format!("No Roku device answered at {}", ip))?;
            println!("{}", serde_json::to_string_pretty(&device)?);
        }
        Command::Key { ip, key, down, up } => {
            select_device(services, config, &ip)?;
            let ok = if down {
                services.control.send_key_down(&key).await
            } else if up {
                services.control.send_key_up(&key).await
            } else {
                services.control.send_key_press(&key).await
            };
            ensure_ok(ok)?;
        }
        Command::Text { ip, text } => {
            select_device(services, config, &ip)?;
            ensure_ok(services.control.send_text(&text).await)?;
        }
        Command::Launch { ip, channel_id } => {
            select_device(services, config, &ip)?;
            ensure_ok(services.control.launch_channel(&channel_id).await)?;
        }
        Command::Apps { ip, json } => {
            select_device(services, config, &ip)?;
            let channels = services.control.get_installed_channels().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&channels)?);
            } else {
                for channel in &channels {
                    print_channel(channel);
                }
            }
        }
        Command::Active { ip } => {
            select_device(services, config, &ip)?;
            match services.control.get_active_channel().await {
                Some(channel) => print_channel(&channel),
                None => println!("No active channel"),
            }
        }
        Command::Icon {
            ip,
            channel_id,
            out,
        } => {
            select_device(services, config, &ip)?;
            let bytes = services
                .control
                .get_channel_icon(&channel_id)
                .await
                .with_context(|| format!("Failed to fetch icon for channel {}", channel_id))?;
            std::fs::write(&out, &bytes)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Wrote {} bytes to {}", bytes.len(), out.display());
        }
        Command::Media { ip } => {
            select_device(services, config, &ip)?;
            let xml = services
                .control
                .get_media_player_state()
                .await
                .context("Failed to query media player")?;
            println!("{}", xml);
        }
        Command::Wake { mac } => {
            services
                .wake
                .try_wake(&mac)
                .await
                .context("Failed to send Wake-on-LAN packet")?;
            println!("Magic packet sent");
        }
        Command::Power { ip } => {
            // Full info is needed for the MAC address; fall back to a bare
            // device so power still works when the info fetch fails.
            let device = match services.discovery.validate(&ip, &services.cancel_token).await {
                Some(device) => device,
                None => bare_device(config, &ip)?,
            };
            services.control.set_current_device(device);
            if let Some(handle) = services.control.power_toggle().await {
                handle.await.context("Power task panicked")?;
            }
        }
    }
    Ok(())
}

fn bare_device(config: &CliConfig, ip: &str) -> Result<Device> {
    let ip = validate_device_ip(ip).with_context(|| format!("Invalid device address {:?}", ip))?;
    Ok(Device::new(ip.to_string(), config.ecp_port))
}

fn select_device(services: &RemoteServices, config: &CliConfig, ip: &str) -> Result<()> {
    services.control.set_current_device(bare_device(config, ip)?);
    Ok(())
}

fn ensure_ok(ok: bool) -> Result<()> {
    if !ok {
        bail!("Command was not accepted by the device");
    }
    Ok(())
}

fn print_device(device: &Device) {
    println!(
        "{:<16} {:<6} {:<14} {:<24} {}",
        device.address,
        device.port,
        device.serial_number,
        device.display_name(),
        device.model_name
    );
}

fn print_channel(channel: &Channel) {
    println!("{:<16} {:<6} {}", channel.id, channel.kind, channel.name);
}

/// Prints command failures the core reported while the command ran.
fn print_failures(events: &mut broadcast::Receiver<RemoteEvent>) {
    while let Ok(event) = events.try_recv() {
        if let RemoteEvent::Command(event) = event {
            eprintln!("error: {}", event.reason());
        }
    }
}

/// Cancels `token` once `signal` resolves. Abort the handle to disarm.
fn cancel_on<F>(signal: F, token: CancellationToken) -> JoinHandle<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        signal.await;
        log::debug!("[CLI] Interrupted, cancelling in-flight operations");
        token.cancel();
    })
}
