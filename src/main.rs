//! `irm`: command-line front end for the IrMagician driver.
//!
//!   RUST_LOG=irmagician=debug irm --port /dev/ttyACM0 temperature

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use irmagician::adapters::mock_device::MockDeviceFactory;
use irmagician::adapters::serial_port::SerialPortFactory;
use irmagician::domain::{current_platform, resolve, IrmResult, PortConfig};
use irmagician::ports::SerialFactory;
use irmagician::IrMagician;

#[derive(Parser)]
#[command(name = "irm", version, about = "Control an IrMagician infrared transceiver")]
struct Cli {
    /// Serial device path (defaults to the platform's usual device node)
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// JSON file with path, baud_rate and timeout_ms
    #[arg(short, long, global = true, conflicts_with = "port")]
    config: Option<PathBuf>,

    /// Talk to an in-memory device instead of real hardware
    #[arg(
        long,
        global = true,
        env = "IRM_MOCK",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    mock: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// List serial ports on this machine
    ListPorts,
    /// Write the resolved port configuration to a JSON file
    SaveConfig { path: PathBuf },
    /// Select memory bank (0-9)
    Bank { n: i64 },
    /// Capture an IR signal
    Capture,
    /// Replay the captured signal
    Play,
    /// Dump the byte at a position (0-63) of the selected bank
    Dump { n: i64 },
    /// Write a byte (0-255) at a position (0-63) of the selected bank
    Write { pos: i64, data: i64 },
    /// Read an information slot (0-7)
    Info { n: i64 },
    /// Set the pos-scaler (1-255)
    PosScaler { n: i64 },
    /// Switch the LED on or off
    Led {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
    /// Set the modulation (0-2)
    Modulation { n: i64 },
    /// Set the record pointer (0-65535)
    RecordPointer { n: i64 },
    /// Reset (0-1)
    Reset { n: i64 },
    /// Toggle statics mode
    Statics,
    /// Run the error-correction check
    ErrorCheck,
    /// Read the temperature sensor
    Temperature {
        /// Print the raw ADC reply instead of degrees Celsius
        #[arg(long)]
        raw: bool,
    },
    /// Print the firmware version
    Version,
}

fn port_config(cli: &Cli) -> IrmResult<PortConfig> {
    match &cli.config {
        Some(path) => PortConfig::load(path),
        None => resolve(cli.port.as_deref(), current_platform()),
    }
}

fn run_action<F: SerialFactory>(irm: &mut IrMagician<F>, action: &Action) -> IrmResult<()> {
    irm.connect()?;

    let reply = match action {
        Action::Bank { n } => irm.set_bank(*n).map(|_| None)?,
        Action::Capture => irm.capture().map(|_| None)?,
        Action::Play => irm.play().map(|_| None)?,
        Action::Write { pos, data } => irm.write(*pos, *data).map(|_| None)?,
        Action::Dump { n } => Some(irm.dump(*n)?),
        Action::Info { n } => Some(irm.information(*n)?),
        Action::PosScaler { n } => Some(irm.set_pos_scaler(*n)?),
        Action::Led { state } if state == "on" => Some(irm.led_on()?),
        Action::Led { .. } => Some(irm.led_off()?),
        Action::Modulation { n } => Some(irm.set_modulation(*n)?),
        Action::RecordPointer { n } => Some(irm.set_record_pointer(*n)?),
        Action::Reset { n } => Some(irm.reset(*n)?),
        Action::Statics => Some(irm.statics()?),
        Action::ErrorCheck => Some(irm.error_check()?),
        Action::Temperature { raw: true } => Some(irm.raw_temperature()?),
        Action::Temperature { raw: false } => Some(format!("{:.2}", irm.temperature()?)),
        Action::Version => Some(irm.version()?),
        // Handled without a device in run()
        Action::ListPorts | Action::SaveConfig { .. } => None,
    };

    if let Some(reply) = reply {
        println!("{reply}");
    }
    Ok(())
}

fn run<F: SerialFactory>(cli: &Cli, factory: F) -> IrmResult<()> {
    match &cli.action {
        Action::ListPorts => {
            for port in factory.list_ports()? {
                println!("{}\t{}", port.name, port.port_type);
            }
            Ok(())
        }
        Action::SaveConfig { path } => {
            port_config(cli)?.save(path)?;
            log::info!("Saved port configuration to {}", path.display());
            Ok(())
        }
        action => {
            let mut irm = IrMagician::with_factory(port_config(cli)?, factory);
            run_action(&mut irm, action)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = if cli.mock {
        run(&cli, MockDeviceFactory)
    } else {
        run(&cli, SerialPortFactory)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("irm: {e}");
            ExitCode::FAILURE
        }
    }
}
