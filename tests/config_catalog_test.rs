use anyhow::Result;
use micro_lend::config::toml_config::SourceType;
use micro_lend::core::ConfigProvider;
use micro_lend::utils::validation::Validate;
use micro_lend::{CatalogLoanBook, LendConfig, LendingService, SimulatedContract};
use rust_decimal_macros::dec;
use tempfile::TempDir;

#[tokio::test]
async fn test_config_with_custom_catalog() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let catalog_path = format!("{}/loans.toml", temp_path);
    tokio::fs::write(
        &catalog_path,
        r#"
[[requests]]
id = "farm-1"
loan_id = 41
borrower = "Lakshmi R."
purpose = "Seeds"
amount = "12000"
period = "3months"
interest_rate_percent = "6"
risk = "Medium"
"#,
    )
    .await?;

    let config_path = format!("{}/micro-lend.toml", temp_path);
    tokio::fs::write(
        &config_path,
        format!(
            r#"
[quote]
annual_rate_percent = "6"
min_amount = "500"

[contract]
chain_id = 11155111

[wallet]
account = "0x5555555555555555555555555555555555555555"

[source]
type = "catalog"
catalog_path = "{}"
"#,
            catalog_path
        ),
    )
    .await?;

    let config = LendConfig::from_file(&config_path)?;
    config.validate()?;
    assert_eq!(config.source.r#type, SourceType::Catalog);
    assert_eq!(config.min_amount(), dec!(500));
    assert_eq!(config.chain_name(), Some("Sepolia"));

    let book = CatalogLoanBook::from_file(config.source.catalog_path.as_deref().unwrap())?;
    let session = config.wallet_session()?;
    let contract = SimulatedContract::new(config.contract_address()?, config.contract.chain_id);
    let service = LendingService::new(book, contract, config);

    let submission = service.fund_request(&session, "farm-1").await?;
    // 12000 × 6% × 3/12 = 180 -> 12180 / 3 = 4060
    assert_eq!(submission.quote.map(|q| q.periodic_payment), Some(dec!(4060)));
    assert_eq!(service.contract().chain_id(), 11155111);

    Ok(())
}

#[test]
fn test_invalid_catalog_file_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[[requests]]\nid = \"x\"\n")?;

    assert!(CatalogLoanBook::from_file(&path).is_err());
    assert!(CatalogLoanBook::from_file(temp_dir.path().join("missing.toml")).is_err());
    Ok(())
}
