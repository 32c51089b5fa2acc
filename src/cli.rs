//! CLI argument parsing

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Parse a string as a hex (0xNN) or decimal u8
pub fn parse_hex_u8(s: &str) -> Result<u8, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u8>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "bbspi")]
#[command(author, version, about = "Bit-banged SPI register access over Linux GPIO", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Bus options shared across commands
#[derive(Args, Debug, Clone)]
pub struct BusArgs {
    /// GPIO chip device path
    #[arg(long, default_value = "/dev/gpiochip0")]
    pub dev: String,

    /// Chip-select GPIO pin (identifies the bus)
    #[arg(long)]
    pub cs: u8,

    /// MISO GPIO pin
    #[arg(long)]
    pub miso: u8,

    /// MOSI GPIO pin
    #[arg(long)]
    pub mosi: u8,

    /// Clock GPIO pin
    #[arg(long)]
    pub sclk: u8,

    /// Baud rate in bits/second
    #[arg(long, default_value_t = 100_000)]
    pub baud: u32,

    /// SPI mode (0-3)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub mode: u8,

    /// Use the in-memory dummy peripheral instead of real GPIO
    #[arg(long)]
    pub dummy: bool,
}

/// Register result width/format
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Width {
    /// Unsigned 8-bit
    #[value(name = "8")]
    U8,
    /// Unsigned 16-bit, big-endian
    #[value(name = "16")]
    U16,
    /// Unsigned 16-bit, little-endian
    #[value(name = "16le")]
    U16Le,
    /// Signed 16-bit, big-endian
    #[value(name = "s16")]
    S16,
    /// Signed 16-bit, little-endian
    #[value(name = "s16le")]
    S16Le,
    /// Unsigned 24-bit, big-endian
    #[value(name = "24")]
    U24,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a register
    Read {
        #[command(flatten)]
        bus: BusArgs,

        /// Register address (0-127), hex or decimal
        #[arg(short, long, value_parser = parse_hex_u8)]
        reg: u8,

        /// Result width
        #[arg(short, long, value_enum, default_value = "8")]
        width: Width,
    },

    /// Write an 8-bit value to a register
    Write {
        #[command(flatten)]
        bus: BusArgs,

        /// Register address (0-127), hex or decimal
        #[arg(short, long, value_parser = parse_hex_u8)]
        reg: u8,

        /// Value to write, hex or decimal
        #[arg(long, value_parser = parse_hex_u8)]
        value: u8,
    },
}
