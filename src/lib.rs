pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{catalog::CatalogLoanBook, contract::SimulatedContract, http::HttpLoanBook};
pub use config::LendConfig;
pub use crate::core::{lending::LendingService, quote::quote_from_form};
pub use utils::error::{LendError, Result};
