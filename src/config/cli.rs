use crate::config::toml_config::LendConfig;
use crate::domain::model::ActivityFilter;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Parser)]
#[command(name = "micro-lend")]
#[command(about = "Loan quotes and community lending from the command line")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Wallet account to send transactions from (overrides [wallet].account)
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// Annual interest rate in percent (overrides [quote].annual_rate_percent)
    #[arg(long, global = true)]
    pub rate: Option<Decimal>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the periodic repayment for an amount and loan period
    Quote {
        #[arg(long)]
        amount: Option<String>,
        /// One of 20days, 1month, 2months, 3months
        #[arg(long)]
        period: Option<String>,
    },
    /// List open loan requests
    Requests,
    /// Show one loan request with its repayment quote
    Show { id: String },
    /// List communities
    Communities,
    /// Show one community
    Community { id: String },
    /// List your lending and borrowing activity
    Activities {
        #[arg(long, default_value = "all")]
        kind: ActivityFilter,
    },
    /// Submit a loan request to the contract
    Request {
        #[arg(long)]
        purpose: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        period: Option<String>,
    },
    /// Fund an open loan request
    Fund { id: String },
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut LendConfig) {
        if let Some(account) = &self.account {
            config.wallet.account = Some(account.clone());
            tracing::info!("🔧 Wallet account overridden to: {}", account);
        }
        if let Some(rate) = self.rate {
            config.quote.annual_rate_percent = rate;
            tracing::info!("🔧 Interest rate overridden to: {}%", rate);
        }
    }
}
