use crate::core::ConfigProvider;
use crate::domain::model::{Address, WalletSession};
use crate::utils::error::{LendError, Result};
use crate::utils::validation::{self, Validate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 支援的鏈 (chain id, 名稱)，第一個是預設鏈
pub const SUPPORTED_CHAINS: [(u64, &str); 4] = [
    (420420421, "Westend Asset Hub"),
    (11155111, "Sepolia"),
    (80001, "Polygon Mumbai"),
    (137, "Polygon"),
];

pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x62f5477Da2559EcA1Bc2412da40a3f6Bc40062d9";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LendConfig {
    #[serde(default)]
    pub quote: QuoteConfig,
    #[serde(default)]
    pub contract: ContractConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub source: SourceConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default = "default_annual_rate")]
    pub annual_rate_percent: Decimal,
    #[serde(default = "default_min_amount")]
    pub min_amount: Decimal,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            annual_rate_percent: default_annual_rate(),
            min_amount: default_min_amount(),
        }
    }
}

fn default_annual_rate() -> Decimal {
    Decimal::new(85, 1)
}

fn default_min_amount() -> Decimal {
    Decimal::from(100)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    #[serde(default = "default_contract_address")]
    pub address: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: default_contract_address(),
            chain_id: default_chain_id(),
        }
    }
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_string()
}

fn default_chain_id() -> u64 {
    SUPPORTED_CHAINS[0].0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    pub account: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Catalog,
    Http,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub r#type: SourceType,
    /// 未設定時使用內建示範資料
    pub catalog_path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl LendConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LendError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LendError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WALLET_ACCOUNT})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LendError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range(
            "quote.annual_rate_percent",
            self.quote.annual_rate_percent,
            Decimal::ZERO,
            Decimal::ONE_HUNDRED,
        )?;
        validation::validate_positive_decimal("quote.min_amount", self.quote.min_amount)?;

        validation::validate_non_empty_string("contract.address", &self.contract.address)?;
        self.contract_address()?;
        if !SUPPORTED_CHAINS.iter().any(|(id, _)| *id == self.contract.chain_id) {
            let supported: Vec<String> = SUPPORTED_CHAINS.iter().map(|(id, _)| id.to_string()).collect();
            return Err(LendError::InvalidConfigValueError {
                field: "contract.chain_id".to_string(),
                value: self.contract.chain_id.to_string(),
                reason: format!("Unsupported chain. Supported chain ids: {}", supported.join(", ")),
            });
        }

        self.wallet_session()?;

        match self.source.r#type {
            SourceType::Catalog => {
                if let Some(path) = &self.source.catalog_path {
                    validation::validate_non_empty_string("source.catalog_path", path)?;
                    validation::validate_path("source.catalog_path", path)?;
                    validation::validate_file_extensions("source.catalog_path", &[path.as_str()], &["toml"])?;
                }
            }
            SourceType::Http => {
                let endpoint = validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                validation::validate_url("source.endpoint", endpoint)?;
            }
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(LendError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn contract_address(&self) -> Result<Address> {
        self.contract
            .address
            .parse()
            .map_err(|reason| LendError::InvalidConfigValueError {
                field: "contract.address".to_string(),
                value: self.contract.address.clone(),
                reason,
            })
    }

    /// 有設定帳戶就視為已連線的錢包
    pub fn wallet_session(&self) -> Result<WalletSession> {
        match &self.wallet.account {
            None => Ok(WalletSession::disconnected()),
            Some(account) => account
                .parse()
                .map(WalletSession::connected)
                .map_err(|reason| LendError::InvalidConfigValueError {
                    field: "wallet.account".to_string(),
                    value: account.clone(),
                    reason,
                }),
        }
    }

    pub fn chain_name(&self) -> Option<&'static str> {
        SUPPORTED_CHAINS
            .iter()
            .find(|(id, _)| *id == self.contract.chain_id)
            .map(|(_, name)| *name)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for LendConfig {
    fn annual_rate_percent(&self) -> Decimal {
        self.quote.annual_rate_percent
    }

    fn min_amount(&self) -> Decimal {
        self.quote.min_amount
    }
}

impl Validate for LendConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = LendConfig::default();
        assert_eq!(config.annual_rate_percent(), dec!(8.5));
        assert_eq!(config.min_amount(), dec!(100));
        assert_eq!(config.contract.chain_id, 420420421);
        assert_eq!(config.chain_name(), Some("Westend Asset Hub"));
        assert_eq!(config.source.r#type, SourceType::Catalog);
        assert!(!config.wallet_session().unwrap().is_connected());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[quote]
annual_rate_percent = "9.2"

[contract]
chain_id = 11155111

[wallet]
account = "0x1111111111111111111111111111111111111111"

[source]
type = "http"
endpoint = "https://api.example.com/v1"

[logging]
level = "debug"
json = true
"#;

        let config = LendConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.annual_rate_percent(), dec!(9.2));
        assert_eq!(config.min_amount(), dec!(100));
        assert_eq!(config.contract.address, DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(config.source.r#type, SourceType::Http);
        assert!(config.wallet_session().unwrap().is_connected());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MICRO_LEND_TEST_ACCOUNT", "0x2222222222222222222222222222222222222222");

        let toml_content = r#"
[wallet]
account = "${MICRO_LEND_TEST_ACCOUNT}"
"#;

        let config = LendConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.wallet.account.as_deref(),
            Some("0x2222222222222222222222222222222222222222")
        );

        std::env::remove_var("MICRO_LEND_TEST_ACCOUNT");
    }

    #[test]
    fn test_config_validation() {
        let http_without_endpoint = LendConfig::from_toml_str("[source]\ntype = \"http\"\n").unwrap();
        assert!(matches!(
            http_without_endpoint.validate(),
            Err(LendError::MissingConfigError { .. })
        ));

        let bad_rate = LendConfig::from_toml_str("[quote]\nannual_rate_percent = \"120\"\n").unwrap();
        assert!(bad_rate.validate().is_err());

        let bad_chain = LendConfig::from_toml_str("[contract]\nchain_id = 1\n").unwrap();
        assert!(bad_chain.validate().is_err());

        let bad_account = LendConfig::from_toml_str("[wallet]\naccount = \"0xabc\"\n").unwrap();
        assert!(bad_account.validate().is_err());

        let bad_catalog = LendConfig::from_toml_str("[source]\ncatalog_path = \"loans.json\"\n").unwrap();
        assert!(bad_catalog.validate().is_err());

        let bad_level = LendConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_blank_values_are_rejected() {
        let blank_catalog = LendConfig::from_toml_str("[source]\ncatalog_path = \"   \"\n").unwrap();
        assert!(matches!(
            blank_catalog.validate(),
            Err(LendError::InvalidConfigValueError { ref field, ref reason, .. })
                if field == "source.catalog_path" && reason.contains("empty")
        ));

        let blank_address = LendConfig::from_toml_str("[contract]\naddress = \"\"\n").unwrap();
        assert!(matches!(
            blank_address.validate(),
            Err(LendError::InvalidConfigValueError { ref field, ref reason, .. })
                if field == "contract.address" && reason.contains("empty")
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[quote]\nmin_amount = \"500\"\n")
            .unwrap();

        let config = LendConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.min_amount(), dec!(500));
        assert_eq!(config.annual_rate_percent(), dec!(8.5));
    }
}
