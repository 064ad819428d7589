//! # Escarcha CLI
//!
//! Command-line interface for working with AC remote descriptors.
//!
//! ## Usage
//!
//! ```bash
//! # List brands and a brand's devices from the index
//! escarcha brands --index codes/index.json
//! escarcha devices --index codes/index.json FrostCo
//!
//! # Inspect a descriptor's capability surface
//! escarcha info codes/frostco_fc2000.bin
//!
//! # Encode a state and print the pulse train
//! escarcha encode codes/frostco_fc2000.bin --mode cool --temp 24 --speed medium
//!
//! # Export the complete command set as JSON
//! escarcha export codes/frostco_fc2000.bin --out fc2000.json
//!
//! # Transmit (power-on test against real hardware)
//! escarcha send codes/frostco_fc2000.bin --sender lirc --target /dev/lirc0 --power on
//! ```
//!
//! `RUST_LOG=debug` surfaces transport diagnostics.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use escarcha::catalog;
use escarcha::transport::{BroadlinkSender, HttpSender, LircSender, Sender};
use escarcha::{
    DeviceModel, DeviceState, EscarchaError, FanSpeed, Function, Mode, Power, SwingMode,
};

/// Escarcha - AC infrared remote utility
#[derive(Parser, Debug)]
#[command(name = "escarcha")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List brands from the device index
    Brands {
        /// Path to the index JSON file
        #[arg(long, default_value = "index.json")]
        index: PathBuf,
    },
    /// List a brand's devices from the device index
    Devices {
        /// Path to the index JSON file
        #[arg(long, default_value = "index.json")]
        index: PathBuf,
        /// Brand name as listed by `brands`
        brand: String,
    },
    /// Print a descriptor's capability surface
    Info {
        /// Path to the descriptor file
        descriptor: PathBuf,
    },
    /// Encode a device state and print the pulse train
    Encode {
        /// Path to the descriptor file
        descriptor: PathBuf,

        #[command(flatten)]
        state: StateArgs,

        /// Print transport-convention signed durations instead of magnitudes
        #[arg(long)]
        signed: bool,
    },
    /// Export the complete command set as JSON
    Export {
        /// Path to the descriptor file
        descriptor: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Manufacturer name recorded in the export
        #[arg(long, default_value = "generic")]
        manufacturer: String,
    },
    /// Encode a device state and transmit it
    Send {
        /// Path to the descriptor file
        descriptor: PathBuf,

        #[command(flatten)]
        state: StateArgs,

        /// Transmission backend
        #[arg(long, default_value = "lirc")]
        sender: SenderKind,

        /// Backend target: device path (lirc), URL (http) or host:port
        /// (broadlink)
        #[arg(long, default_value = "/dev/lirc0")]
        target: String,

        /// Only check whether the backend looks reachable
        #[arg(long)]
        probe_only: bool,
    },
}

/// State flags shared by `encode` and `send`.
#[derive(clap::Args, Debug)]
struct StateArgs {
    /// Power state: on or off
    #[arg(long, default_value = "on")]
    power: Power,

    /// Operating mode: cool, heat, auto, fan or dry
    #[arg(long, default_value = "auto")]
    mode: Mode,

    /// Fan speed: auto, low, medium or high
    #[arg(long, default_value = "auto")]
    speed: FanSpeed,

    /// Target temperature in degrees
    #[arg(long, default_value_t = 26)]
    temp: u8,

    /// Swing position: on or off
    #[arg(long)]
    swing: Option<SwingMode>,

    /// Function press code (1-7)
    #[arg(long)]
    function: Option<u8>,
}

impl StateArgs {
    fn to_state(&self) -> Result<DeviceState, EscarchaError> {
        let function = match self.function {
            None => Function::Power,
            Some(code) => Function::from_code(code).ok_or_else(|| {
                EscarchaError::InvalidArgument(format!("unknown function code {}", code))
            })?,
        };
        Ok(DeviceState {
            power: self.power,
            mode: self.mode,
            fan_speed: self.speed,
            temperature: self.temp,
            swing: self.swing,
            function,
        })
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SenderKind {
    Lirc,
    Http,
    Broadlink,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), EscarchaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Brands { index } => {
            let brands = catalog::load(&index)?;
            for brand in &brands {
                println!("{}", brand.name);
            }
            Ok(())
        }

        Commands::Devices { index, brand } => {
            let brands = catalog::load(&index)?;
            let brand = catalog::find_brand(&brands, &brand)?;
            for device in &brand.devices {
                println!("{}\t{}", device.name, device.bin);
            }
            Ok(())
        }

        Commands::Info { descriptor } => {
            let model = load_model(&descriptor)?;
            print_info(&model);
            Ok(())
        }

        Commands::Encode {
            descriptor,
            state,
            signed,
        } => {
            let model = load_model(&descriptor)?;
            let train = model.encode(&state.to_state()?)?;
            let rendered: Vec<String> = if signed {
                train.signed().map(|d| d.to_string()).collect()
            } else {
                train.durations().iter().map(|d| d.to_string()).collect()
            };
            println!("{}", rendered.join(","));
            Ok(())
        }

        Commands::Export {
            descriptor,
            out,
            manufacturer,
        } => {
            let model = load_model(&descriptor)?;
            let document = catalog::device_to_json(&model, &manufacturer)?;
            let text = serde_json::to_string_pretty(&document)
                .map_err(|e| EscarchaError::InvalidArgument(format!("serialization failed: {}", e)))?;
            match out {
                Some(path) => {
                    fs::write(&path, text)?;
                    println!("Wrote command set to {}", path.display());
                }
                None => println!("{}", text),
            }
            Ok(())
        }

        Commands::Send {
            descriptor,
            state,
            sender,
            target,
            probe_only,
        } => {
            let mut sender: Box<dyn Sender> = match sender {
                SenderKind::Lirc => Box::new(LircSender::new(&target)),
                SenderKind::Http => Box::new(HttpSender::new(target.as_str())?),
                SenderKind::Broadlink => Box::new(BroadlinkSender::new(&target)?),
            };

            if probe_only {
                if sender.probe_availability() {
                    println!("{}: available", target);
                    return Ok(());
                }
                return Err(EscarchaError::Transport(format!("{}: not available", target)));
            }

            let model = load_model(&descriptor)?;
            let train = model.encode(&state.to_state()?)?;
            sender.send(&train)?;
            println!("Sent {} pulses", train.len());
            Ok(())
        }
    }
}

fn load_model(path: &PathBuf) -> Result<DeviceModel, EscarchaError> {
    let bytes = fs::read(path)?;
    Ok(DeviceModel::parse(&bytes)?)
}

fn print_info(model: &DeviceModel) {
    println!(
        "frame: {} bytes, {} checksum program(s), repeat x{}",
        model.default_frame.len(),
        model.checksums.len(),
        model.timing.repeat
    );

    let modes = model.supported_modes();
    if modes.is_empty() {
        println!("no supported modes");
        return;
    }

    for mode in modes {
        let speeds: Vec<String> = model
            .supported_speeds(mode)
            .iter()
            .map(ToString::to_string)
            .collect();
        let temps = model.supported_temperatures(mode);
        let temp_range = match (temps.first(), temps.last()) {
            (Some(lo), Some(hi)) => format!("{}-{}°", lo, hi),
            _ => "none".to_owned(),
        };
        println!(
            "  {}: speeds [{}], temperatures {}",
            mode,
            speeds.join(", "),
            temp_range
        );
    }

    let swing: Vec<String> = model
        .supported_swing()
        .iter()
        .map(ToString::to_string)
        .collect();
    if !swing.is_empty() {
        println!("  swing: [{}]", swing.join(", "));
    }
}
