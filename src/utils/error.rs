use thiserror::Error;

#[derive(Error, Debug)]
pub enum LendError {
    #[error("Backend request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Backend returned status {status} for {url}")]
    BackendError { status: u16, url: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    #[error("Wallet is not connected")]
    WalletNotConnected,

    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("Invalid loan application: {message}")]
    ValidationError { message: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: String, id: String },

    #[error("Contract call {method} failed: {message}")]
    ContractError { method: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Wallet,
    Contract,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LendError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LendError::ApiError(_) | LendError::BackendError { .. } => ErrorCategory::Network,
            LendError::IoError(_) => ErrorCategory::System,
            LendError::ConfigValidationError { .. }
            | LendError::InvalidConfigValueError { .. }
            | LendError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LendError::SerializationError(_)
            | LendError::CatalogError { .. }
            | LendError::InvalidAmount { .. }
            | LendError::ValidationError { .. }
            | LendError::NotFound { .. } => ErrorCategory::Data,
            LendError::WalletNotConnected => ErrorCategory::Wallet,
            LendError::ContractError { .. } => ErrorCategory::Contract,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LendError::NotFound { .. } => ErrorSeverity::Low,
            // 網路與合約錯誤通常可以重試
            LendError::ApiError(_)
            | LendError::BackendError { .. }
            | LendError::ContractError { .. } => ErrorSeverity::Medium,
            LendError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LendError::ApiError(_) | LendError::BackendError { .. } => {
                "Check that the loan backend is reachable and try again".to_string()
            }
            LendError::IoError(_) => "Check file paths and permissions".to_string(),
            LendError::SerializationError(_) => {
                "The backend returned data in an unexpected shape; check the endpoint version"
                    .to_string()
            }
            LendError::ConfigValidationError { field, .. }
            | LendError::InvalidConfigValueError { field, .. }
            | LendError::MissingConfigError { field } => {
                format!("Fix the '{}' setting in the configuration file", field)
            }
            LendError::CatalogError { .. } => {
                "Check the catalog file for duplicate ids or out-of-range values".to_string()
            }
            LendError::WalletNotConnected => {
                "Connect a wallet with --account or set [wallet].account".to_string()
            }
            LendError::InvalidAmount { .. } => {
                "Enter a positive amount with at most 18 decimal places".to_string()
            }
            LendError::ValidationError { .. } => {
                "Fill in purpose, amount and loan period, then submit again".to_string()
            }
            LendError::NotFound { kind, .. } => format!("List available {}s and pick a valid id", kind),
            LendError::ContractError { .. } => {
                "Check the wallet balance and network, then retry the transaction".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LendError::WalletNotConnected => "Please connect your wallet first".to_string(),
            LendError::ApiError(_) | LendError::BackendError { .. } => {
                "Could not load data from the loan backend".to_string()
            }
            LendError::ContractError { .. } => {
                "Failed to submit the transaction. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LendError>;
