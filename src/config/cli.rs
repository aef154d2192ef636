use crate::config::toml_config::QuoteConfig;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "freight-quote")]
#[command(about = "Freight quotation helper: CNPJ checks, package totals and quote submission")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print a (partial) CNPJ with its punctuation
    FormatTaxId { raw: String },

    /// Check the CNPJ check digits
    ValidateTaxId { raw: String },

    /// List the predefined packages
    Catalog,

    /// Show the package table and totals of a JSON package list
    Totals {
        #[arg(short, long)]
        packages: String,
    },

    /// Send a JSON package list to the quotation endpoint
    Submit {
        #[arg(short, long)]
        packages: String,

        /// Override endpoint.url from the configuration
        #[arg(long)]
        endpoint: Option<String>,

        /// Override endpoint.timeout_seconds from the configuration
        #[arg(long)]
        timeout: Option<u64>,

        /// Validate and show what would be sent without calling the endpoint
        #[arg(long)]
        dry_run: bool,
    },
}

impl CliConfig {
    /// 載入設定檔並套用命令列覆蓋
    pub fn load_config(&self) -> crate::Result<QuoteConfig> {
        let mut config = match &self.config {
            Some(path) => QuoteConfig::from_file(path)?,
            None => QuoteConfig::default(),
        };

        if let Command::Submit {
            endpoint, timeout, ..
        } = &self.command
        {
            if let Some(endpoint) = endpoint {
                tracing::info!("🔧 Endpoint overridden to: {}", endpoint);
                config.endpoint.url = Some(endpoint.clone());
            }
            if let Some(timeout) = timeout {
                config.endpoint.timeout_seconds = Some(*timeout);
            }
        }

        Ok(config)
    }

    pub fn json_logs(&self) -> bool {
        self.log_json
    }
}
