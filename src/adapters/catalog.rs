use crate::core::LoanBook;
use crate::domain::model::{Activity, ActivityFilter, ActivityStatus, Community, LoanRequest};
use crate::utils::error::{LendError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const SEED_CATALOG: &str = include_str!("../../data/seed_catalog.toml");

/// 借款需求、社群與活動紀錄的靜態目錄 (TOML)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub requests: Vec<LoanRequest>,
    #[serde(default)]
    pub communities: Vec<Community>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Catalog {
    /// 從 TOML 檔案載入目錄
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LendError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析並驗證
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content).map_err(|e| LendError::CatalogError {
            message: format!("TOML parsing error: {}", e),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// 內建示範資料
    pub fn seed() -> Result<Self> {
        Self::from_toml_str(SEED_CATALOG)
    }
}

fn ensure_unique(kind: &str, ids: impl Iterator<Item = String>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            return Err(LendError::CatalogError {
                message: format!("duplicate {} id '{}'", kind, id),
            });
        }
    }
    Ok(())
}

impl Validate for Catalog {
    fn validate(&self) -> Result<()> {
        ensure_unique("request", self.requests.iter().map(|r| r.id.clone()))?;
        ensure_unique("loan", self.requests.iter().map(|r| r.loan_id.to_string()))?;
        ensure_unique("community", self.communities.iter().map(|c| c.id.clone()))?;
        ensure_unique("activity", self.activities.iter().map(|a| a.id.to_string()))?;

        for request in &self.requests {
            if request.amount <= Decimal::ZERO {
                return Err(LendError::CatalogError {
                    message: format!("request '{}' must have a positive amount", request.id),
                });
            }
            if request.interest_rate_percent < Decimal::ZERO
                || request.interest_rate_percent > Decimal::ONE_HUNDRED
            {
                return Err(LendError::CatalogError {
                    message: format!(
                        "request '{}' has interest rate {} outside 0..=100",
                        request.id, request.interest_rate_percent
                    ),
                });
            }
        }

        for activity in &self.activities {
            if activity.repayment_progress > 100 {
                return Err(LendError::CatalogError {
                    message: format!("activity {} has repayment progress above 100", activity.id),
                });
            }
            if activity.status == ActivityStatus::Completed && activity.repayment_progress != 100 {
                return Err(LendError::CatalogError {
                    message: format!(
                        "activity {} is completed but only {}% repaid",
                        activity.id, activity.repayment_progress
                    ),
                });
            }
            if activity.due_date < activity.date {
                return Err(LendError::CatalogError {
                    message: format!("activity {} is due before it started", activity.id),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CatalogLoanBook {
    catalog: Catalog,
}

impl CatalogLoanBook {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn seeded() -> Result<Self> {
        Ok(Self::new(Catalog::seed()?))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Catalog::from_file(path)?))
    }
}

#[async_trait]
impl LoanBook for CatalogLoanBook {
    async fn list_requests(&self) -> Result<Vec<LoanRequest>> {
        Ok(self.catalog.requests.clone())
    }

    async fn request_by_id(&self, id: &str) -> Result<Option<LoanRequest>> {
        Ok(self.catalog.requests.iter().find(|r| r.id == id).cloned())
    }

    async fn list_communities(&self) -> Result<Vec<Community>> {
        Ok(self.catalog.communities.clone())
    }

    async fn community_by_id(&self, id: &str) -> Result<Option<Community>> {
        Ok(self.catalog.communities.iter().find(|c| c.id == id).cloned())
    }

    async fn list_activities(&self, filter: ActivityFilter) -> Result<Vec<Activity>> {
        Ok(self
            .catalog
            .activities
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{LoanPeriod, RiskScore};
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_seed_catalog_parses() {
        let catalog = Catalog::seed().unwrap();
        assert_eq!(catalog.requests.len(), 3);
        assert_eq!(catalog.communities.len(), 4);
        assert_eq!(catalog.activities.len(), 4);

        let first = &catalog.requests[0];
        assert_eq!(first.id, "req1");
        assert_eq!(first.period, LoanPeriod::TwoMonths);
        assert_eq!(first.interest_rate_percent, dec!(8.5));
        assert_eq!(first.risk, RiskScore::Low);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let content = r#"
[[communities]]
id = "svce"
name = "SVCE"
full_name = "Sri Venkateswara College of Engineering"
members = 1250

[[communities]]
id = "svce"
name = "SVCE again"
full_name = "Duplicate"
members = 1
"#;
        let err = Catalog::from_toml_str(content).unwrap_err();
        assert!(err.to_string().contains("duplicate community id 'svce'"));
    }

    #[test]
    fn test_completed_activity_must_be_fully_repaid() {
        let content = r#"
[[activities]]
id = 7
kind = "lend"
amount = "1000"
counterparty = "Someone"
date = "2025-01-01"
status = "completed"
repayment_progress = 40
due_date = "2025-02-01"
"#;
        assert!(matches!(
            Catalog::from_toml_str(content),
            Err(LendError::CatalogError { .. })
        ));
    }

    #[test]
    fn test_catalog_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = r#"
[[requests]]
id = "r-100"
loan_id = 100
borrower = "Meera K."
purpose = "Laptop"
amount = "40000"
period = "20days"
interest_rate_percent = "10"
risk = "High"
"#;
        temp_file.write_all(content.as_bytes()).unwrap();

        let catalog = Catalog::from_file(temp_file.path()).unwrap();
        assert_eq!(catalog.requests[0].period, LoanPeriod::TwentyDays);
        assert!(catalog.communities.is_empty());
    }

    #[tokio::test]
    async fn test_loan_book_lookups() {
        let book = CatalogLoanBook::seeded().unwrap();

        let request = book.request_by_id("req2").await.unwrap().unwrap();
        assert_eq!(request.borrower, "Priya M.");
        assert!(book.request_by_id("req9").await.unwrap().is_none());

        let community = book.community_by_id("svce").await.unwrap().unwrap();
        assert!(community.joined);

        let lends = book.list_activities(ActivityFilter::Lend).await.unwrap();
        assert_eq!(lends.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(book.list_activities(ActivityFilter::All).await.unwrap().len(), 4);
    }
}
