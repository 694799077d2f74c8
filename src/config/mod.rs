pub mod toml_config;

use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "invoice-relay")]
#[command(about = "Invoice entry server that appends submissions to a remote spreadsheet")]
pub struct CliConfig {
    #[arg(long, default_value = "invoice-relay.toml")]
    pub config: String,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, default_value = "8080")]
    pub port: u16,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
