//! bbspi - Bit-banged SPI register access over Linux GPIO
//!
//! Opens a software SPI bus on arbitrary GPIO pins and performs a
//! single register read or write against the attached peripheral,
//! using the 1-byte-address-plus-data convention common to simple
//! sensor ICs.

mod cli;

use clap::Parser;

use bbspi_core::{subsystem, BusConfig, Mode, TransferEngine};
use cli::{BusArgs, Cli, Commands, Width};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let result = match cli.command {
        Commands::Read { bus, reg, width } => run_read(&bus, reg, width),
        Commands::Write { bus, reg, value } => run_write(&bus, reg, value),
    };

    subsystem::shutdown();
    result
}

/// Initialize the subsystem with the selected engine and open the bus
fn open_bus(args: &BusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine: Box<dyn TransferEngine> = if args.dummy {
        Box::new(bbspi_dummy::DummyPeripheral::new())
    } else {
        Box::new(bbspi_linux_gpio::LinuxGpioEngine::new(args.dev.clone())?)
    };
    subsystem::initialize(engine)?;

    let config = BusConfig::new(args.cs, args.miso, args.mosi, args.sclk)
        .with_baud(args.baud)
        .with_mode(Mode::from_flags(args.mode));
    subsystem::registry()?.open(config)?;
    Ok(())
}

fn run_read(args: &BusArgs, reg: u8, width: Width) -> Result<(), Box<dyn std::error::Error>> {
    open_bus(args)?;
    let registry = subsystem::registry()?;

    match width {
        Width::U8 => {
            let value = registry.read8(args.cs, reg)?;
            println!("0x{:02X} ({})", value, value);
        }
        Width::U16 => {
            let value = registry.read16(args.cs, reg)?;
            println!("0x{:04X} ({})", value, value);
        }
        Width::U16Le => {
            let value = registry.read16_le(args.cs, reg)?;
            println!("0x{:04X} ({})", value, value);
        }
        Width::S16 => {
            let value = registry.read_s16(args.cs, reg)?;
            println!("0x{:04X} ({})", value as u16, value);
        }
        Width::S16Le => {
            let value = registry.read_s16_le(args.cs, reg)?;
            println!("0x{:04X} ({})", value as u16, value);
        }
        Width::U24 => {
            let value = registry.read24(args.cs, reg)?;
            println!("0x{:06X} ({})", value, value);
        }
    }

    registry.close(args.cs)?;
    Ok(())
}

fn run_write(args: &BusArgs, reg: u8, value: u8) -> Result<(), Box<dyn std::error::Error>> {
    open_bus(args)?;
    let registry = subsystem::registry()?;

    registry.write8(args.cs, reg, value)?;
    println!("wrote 0x{:02X} to register 0x{:02X}", value, reg);

    registry.close(args.cs)?;
    Ok(())
}
