//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use carnet_types::{ConnectorType, FuelKind, PaymentMethod};

/// Fuel/energy kind, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FuelKindArg {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
    Lpg,
    Other,
}

impl From<FuelKindArg> for FuelKind {
    fn from(arg: FuelKindArg) -> Self {
        match arg {
            FuelKindArg::Gasoline => FuelKind::Gasoline,
            FuelKindArg::Diesel => FuelKind::Diesel,
            FuelKindArg::Electric => FuelKind::Electric,
            FuelKindArg::Hybrid => FuelKind::Hybrid,
            FuelKindArg::Lpg => FuelKind::Lpg,
            FuelKindArg::Other => FuelKind::Other,
        }
    }
}

/// Payment method, as accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PaymentArg {
    #[default]
    Card,
    Cash,
    App,
    Other,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Card => PaymentMethod::Card,
            PaymentArg::Cash => PaymentMethod::Cash,
            PaymentArg::App => PaymentMethod::App,
            PaymentArg::Other => PaymentMethod::Other,
        }
    }
}

/// Charging connector type, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectorArg {
    Type2,
    Ccs,
    Chademo,
    Domestic,
    Other,
}

impl From<ConnectorArg> for ConnectorType {
    fn from(arg: ConnectorArg) -> Self {
        match arg {
            ConnectorArg::Type2 => ConnectorType::Type2,
            ConnectorArg::Ccs => ConnectorType::Ccs,
            ConnectorArg::Chademo => ConnectorType::Chademo,
            ConnectorArg::Domestic => ConnectorType::Domestic,
            ConnectorArg::Other => ConnectorType::Other,
        }
    }
}

#[derive(Parser)]
#[command(name = "carnet")]
#[command(author, version, about = "Fuel and EV expense tracker", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Document-store URL (overrides config), or use CARNET_SERVER env var
    #[arg(long, global = true, env = "CARNET_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage vehicles
    Vehicles {
        #[command(subcommand)]
        action: VehicleAction,
    },

    /// Manage fuel purchases
    Purchases {
        #[command(subcommand)]
        action: PurchaseAction,
    },

    /// Manage electric charging sessions
    Charges {
        #[command(subcommand)]
        action: ChargeAction,
    },

    /// Manage favorite gas stations
    Stations {
        #[command(subcommand)]
        action: StationAction,
    },

    /// Manage favorite charging stations
    Chargers {
        #[command(subcommand)]
        action: ChargerAction,
    },

    /// Manage favorite stores
    Stores {
        #[command(subcommand)]
        action: StoreAction,
    },

    /// Show a summary of recent activity and monthly spending
    Dashboard,

    /// Show statistics (monthly totals, consumption, distance)
    Stats {
        /// Restrict to one vehicle (by identifier or name)
        #[arg(long)]
        vehicle: Option<String>,
    },

    /// Export the purchase/charge history as CSV
    Export {
        /// Output file (defaults to achats-energie-<date>.csv in the
        /// current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum VehicleAction {
    /// List registered vehicles
    List,

    /// Register a new vehicle
    Add {
        /// Display name
        name: String,

        #[arg(long)]
        make: String,

        #[arg(long)]
        model: String,

        #[arg(long)]
        year: i32,

        /// License plate
        #[arg(long)]
        plate: String,

        /// Fuel kind
        #[arg(long, value_enum)]
        fuel: FuelKindArg,

        /// Stored average consumption in L/100km
        #[arg(long)]
        consumption: Option<f64>,

        /// Tank capacity in liters
        #[arg(long)]
        tank: Option<f64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Update fields of a vehicle
    Update {
        /// Vehicle identifier
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        make: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        plate: Option<String>,

        #[arg(long, value_enum)]
        fuel: Option<FuelKindArg>,

        #[arg(long)]
        consumption: Option<f64>,

        #[arg(long)]
        tank: Option<f64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a vehicle (refused while purchases or charges reference it)
    #[command(alias = "rm")]
    Remove {
        /// Vehicle identifier
        id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PurchaseAction {
    /// List fuel purchases, most recent first
    List {
        /// Restrict to one vehicle (by identifier or name)
        #[arg(long)]
        vehicle: Option<String>,
    },

    /// Log a fuel purchase
    Add {
        /// Vehicle (identifier or name)
        #[arg(long)]
        vehicle: String,

        /// Purchase date (RFC3339 or YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Quantity in liters
        #[arg(long)]
        quantity: f64,

        /// Price per liter (derived from --total when omitted)
        #[arg(long)]
        price: Option<f64>,

        /// Total price (derived from --price when omitted)
        #[arg(long)]
        total: Option<f64>,

        /// Station name (free text)
        #[arg(long)]
        station: String,

        /// Odometer reading in km
        #[arg(long)]
        mileage: Option<f64>,

        #[arg(long, value_enum)]
        fuel: FuelKindArg,

        #[arg(long, value_enum, default_value = "card")]
        payment: PaymentArg,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Update fields of a purchase
    Update {
        /// Purchase identifier
        id: String,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        quantity: Option<f64>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        total: Option<f64>,

        #[arg(long)]
        station: Option<String>,

        #[arg(long)]
        mileage: Option<f64>,

        #[arg(long, value_enum)]
        fuel: Option<FuelKindArg>,

        #[arg(long, value_enum)]
        payment: Option<PaymentArg>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a purchase
    #[command(alias = "rm")]
    Remove {
        /// Purchase identifier
        id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ChargeAction {
    /// List charging sessions, most recent first
    List {
        /// Restrict to one vehicle (by identifier or name)
        #[arg(long)]
        vehicle: Option<String>,
    },

    /// Log a charging session
    Add {
        /// Vehicle (identifier or name)
        #[arg(long)]
        vehicle: String,

        /// Session date (RFC3339 or YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Delivered energy in kWh
        #[arg(long)]
        energy: f64,

        /// Price per kWh (derived from --total when omitted)
        #[arg(long)]
        price: Option<f64>,

        /// Total price (derived from --price when omitted)
        #[arg(long)]
        total: Option<f64>,

        /// Station name (free text)
        #[arg(long)]
        station: String,

        /// Odometer reading in km
        #[arg(long)]
        mileage: Option<f64>,

        /// Charging power in kW
        #[arg(long)]
        power: Option<f64>,

        /// Session duration in minutes
        #[arg(long)]
        duration: Option<u32>,

        /// Battery level at start, percent
        #[arg(long)]
        battery_start: Option<u8>,

        /// Battery level at end, percent
        #[arg(long)]
        battery_end: Option<u8>,

        #[arg(long, value_enum, default_value = "card")]
        payment: PaymentArg,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Update fields of a charging session
    Update {
        /// Session identifier
        id: String,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        energy: Option<f64>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        total: Option<f64>,

        #[arg(long)]
        station: Option<String>,

        #[arg(long)]
        mileage: Option<f64>,

        #[arg(long)]
        power: Option<f64>,

        #[arg(long)]
        duration: Option<u32>,

        #[arg(long)]
        battery_start: Option<u8>,

        #[arg(long)]
        battery_end: Option<u8>,

        #[arg(long, value_enum)]
        payment: Option<PaymentArg>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a charging session
    #[command(alias = "rm")]
    Remove {
        /// Session identifier
        id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum StationAction {
    /// List favorite gas stations
    List,

    /// Save a gas station as a favorite
    Add {
        /// Station name
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Update fields of a favorite station
    Update {
        /// Station identifier
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,

        #[arg(long)]
        brand: Option<String>,

        /// Record an observed price per liter for a fuel kind
        #[arg(long, value_enum, requires = "price")]
        fuel: Option<FuelKindArg>,

        #[arg(long, requires = "fuel")]
        price: Option<f64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a favorite station (refused while a store links to it)
    #[command(alias = "rm")]
    Remove {
        /// Station identifier
        id: String,
    },

    /// List favorite stations within a radius of a point
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Search radius in kilometers
        #[arg(long, default_value = "10")]
        radius: f64,
    },

    /// Discover stations around a point via the places service
    Discover {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Search radius in kilometers
        #[arg(long, default_value = "10")]
        radius: f64,

        /// Narrow by name or brand
        #[arg(long)]
        query: Option<String>,

        /// Save every result as a favorite
        #[arg(long)]
        save: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ChargerAction {
    /// List favorite charging stations
    List {
        /// Include deactivated stations
        #[arg(long)]
        all: bool,
    },

    /// Save a charging station as a favorite
    Add {
        /// Station name
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        postal_code: Option<String>,

        #[arg(long)]
        operator: Option<String>,

        /// Connector types, comma-separated
        #[arg(long, value_enum, value_delimiter = ',')]
        connectors: Vec<ConnectorArg>,

        /// Maximum charging power in kW
        #[arg(long)]
        max_power: Option<f64>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        chargers: Option<u32>,

        /// Mark as a fast-charging station
        #[arg(long)]
        fast: bool,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Update fields of a favorite charging station
    Update {
        /// Station identifier
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        operator: Option<String>,

        #[arg(long)]
        max_power: Option<f64>,

        #[arg(long)]
        price: Option<f64>,

        /// Activate or deactivate the station
        #[arg(long)]
        active: Option<bool>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a favorite charging station
    #[command(alias = "rm")]
    Remove {
        /// Station identifier
        id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum StoreAction {
    /// List favorite stores
    List,

    /// Save a store as a favorite
    Add {
        /// Store name
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        chain: Option<String>,

        /// Identifier of the linked gas station, if the store has one
        #[arg(long)]
        gas_station: Option<String>,

        #[arg(long)]
        hours: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Update fields of a favorite store
    Update {
        /// Store identifier
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        chain: Option<String>,

        #[arg(long)]
        gas_station: Option<String>,

        #[arg(long)]
        hours: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a favorite store
    #[command(alias = "rm")]
    Remove {
        /// Store identifier
        id: String,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (server-url, places-url)
        key: String,
        /// Configuration value
        value: String,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_flag_is_global() {
        let cli = Cli::try_parse_from(["carnet", "vehicles", "list", "--server", "http://host:9"])
            .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://host:9"));
    }

    #[test]
    fn charge_update_accepts_session_detail_flags() {
        let cli = Cli::try_parse_from([
            "carnet",
            "charges",
            "update",
            "c1",
            "--power",
            "50",
            "--duration",
            "40",
            "--battery-start",
            "20",
            "--battery-end",
            "80",
            "--payment",
            "app",
        ])
        .unwrap();

        match cli.command {
            Commands::Charges {
                action:
                    ChargeAction::Update {
                        power,
                        duration,
                        battery_start,
                        battery_end,
                        payment,
                        ..
                    },
            } => {
                assert_eq!(power, Some(50.0));
                assert_eq!(duration, Some(40));
                assert_eq!(battery_start, Some(20));
                assert_eq!(battery_end, Some(80));
                assert_eq!(payment, Some(PaymentArg::App));
            }
            _ => panic!("expected `charges update`"),
        }
    }
}
