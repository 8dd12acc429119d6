use anyhow::Context;
use bic2200_rs::{
    init_logger, Bic2200, Direction, SocketCanBus, TransportConfig,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bic2200")]
#[command(about = "CLI tool for MEAN WELL BIC-2200 CAN control")]
struct Cli {
    /// CAN interface name
    #[arg(short, long, default_value = "can0")]
    interface: String,

    /// Device bus address (0-7)
    #[arg(short, long, default_value_t = 0)]
    address: u8,

    /// Reply window in milliseconds
    #[arg(short, long, default_value_t = 500)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print readbacks and status flags
    Status,
    /// Print manufacturer info
    Info,
    /// Turn the output on
    On,
    /// Turn the output off
    Off,
    /// Set the output voltage in volts
    SetVoltage { volts: f32 },
    /// Set the output current limit in amps
    SetCurrent { amps: f32 },
    /// Set the power flow direction
    Direction { direction: DirectionArg },
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Forward,
    Reverse,
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    let config = TransportConfig {
        response_timeout: Duration::from_millis(cli.timeout_ms),
        ..TransportConfig::default()
    };
    let bus = SocketCanBus::new(&cli.interface);
    let mut bic = Bic2200::open(bus, cli.address, config)
        .with_context(|| format!("opening device {} on {}", cli.address, cli.interface))?;

    match cli.command {
        Commands::Status => {
            println!("operation:   {}", if bic.operation()? { "ON" } else { "OFF" });
            println!("vin:         {:.1} V", bic.read_input_voltage()?);
            println!("vout:        {:.2} V", bic.read_output_voltage()?);
            println!("iout:        {:.2} A", bic.read_output_current()?);
            println!("temperature: {:.1} °C", bic.read_temperature()?);
            println!("faults:      {:?}", bic.fault_status()?);
            println!("system:      {:?}", bic.system_status()?);
        }
        Commands::Info => {
            let info = bic.device_info()?;
            println!("manufacturer: {}", info.manufacturer);
            println!("model:        {}", info.model);
            println!("revision:     {}", info.revision);
            println!("location:     {}", info.location);
            println!("date:         {}", info.date);
            println!("serial:       {}", info.serial);
        }
        Commands::On => bic.set_operation(true)?,
        Commands::Off => bic.set_operation(false)?,
        Commands::SetVoltage { volts } => bic.set_output_voltage(volts)?,
        Commands::SetCurrent { amps } => bic.set_output_current(amps)?,
        Commands::Direction { direction } => {
            let direction = match direction {
                DirectionArg::Forward => Direction::Forward,
                DirectionArg::Reverse => Direction::Reverse,
            };
            bic.set_direction(direction)?;
        }
    }

    Ok(())
}
