use crate::domain::model::{
    Activity, ActivityFilter, Address, Community, LoanRequest, TxHash,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

pub trait ConfigProvider: Send + Sync {
    fn annual_rate_percent(&self) -> Decimal;
    fn min_amount(&self) -> Decimal;
}

/// 借款需求、社群與活動紀錄的資料來源
#[async_trait]
pub trait LoanBook: Send + Sync {
    async fn list_requests(&self) -> Result<Vec<LoanRequest>>;
    async fn request_by_id(&self, id: &str) -> Result<Option<LoanRequest>>;
    async fn list_communities(&self) -> Result<Vec<Community>>;
    async fn community_by_id(&self, id: &str) -> Result<Option<Community>>;
    async fn list_activities(&self, filter: ActivityFilter) -> Result<Vec<Activity>>;
}

/// 鏈上借貸合約。實作負責簽署並送出交易
#[async_trait]
pub trait LoanContract: Send + Sync {
    /// `requestLoan(uint256 amount, string data)`
    async fn request_loan(&self, account: &Address, amount_wei: u128, purpose: &str)
        -> Result<TxHash>;

    /// `stakeForLoan(uint256 loanId)`，金額以交易的 value 送出 (payable)
    async fn stake_for_loan(&self, account: &Address, loan_id: u64, amount_wei: u128)
        -> Result<TxHash>;
}
