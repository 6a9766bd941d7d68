use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Parser)]
#[command(name = "hotel")]
#[command(about = "Room reservations and group blocks for a small hotel")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override storage.data_dir from the configuration
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Ids and dates stay textual here so that bad input is reported with the
/// same errors the library uses.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the room catalog with current rates
    Rooms,

    /// List rooms free for a stay
    Available {
        #[arg(long)]
        check_in: String,
        #[arg(long)]
        check_out: String,
    },

    /// Reserve a room for a stay
    Reserve {
        #[arg(long)]
        room: String,
        #[arg(long)]
        check_in: String,
        #[arg(long)]
        check_out: String,
    },

    /// List reservations occupying a room on the night of a date
    List {
        #[arg(long)]
        date: String,
    },

    /// Show the total cost of a reservation
    Cost {
        #[arg(long)]
        reservation: String,
    },

    /// Hold up to five rooms for a stay at a discount
    CreateBlock {
        #[arg(long, value_delimiter = ',', required = true)]
        rooms: Vec<String>,
        #[arg(long)]
        check_in: String,
        #[arg(long)]
        check_out: String,
        /// Fraction taken off the nightly rate, e.g. 0.1
        #[arg(long)]
        discount: Decimal,
    },

    /// List the rooms of a block nobody has claimed yet
    BlockRooms {
        #[arg(long)]
        block: String,
    },

    /// Reserve one room out of a block
    ReserveBlock {
        #[arg(long)]
        room: String,
        #[arg(long)]
        block: String,
    },

    /// Change a room's nightly rate
    SetRate {
        #[arg(long)]
        room: String,
        #[arg(long)]
        rate: Decimal,
    },
}
