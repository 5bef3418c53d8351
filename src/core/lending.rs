use crate::core::quote::{parse_amount, quote, quote_from_form};
use crate::core::units::to_wei;
use crate::core::{ConfigProvider, LoanBook, LoanContract};
use crate::domain::model::{
    Address, LoanApplication, LoanPeriod, LoanQuote, LoanQuoteInput, LoanRequest, Submission,
    WalletSession,
};
use crate::utils::error::{LendError, Result};

pub struct LendingService<B: LoanBook, K: LoanContract, C: ConfigProvider> {
    book: B,
    contract: K,
    config: C,
}

impl<B: LoanBook, K: LoanContract, C: ConfigProvider> LendingService<B, K, C> {
    pub fn new(book: B, contract: K, config: C) -> Self {
        Self {
            book,
            contract,
            config,
        }
    }

    pub fn book(&self) -> &B {
        &self.book
    }

    pub fn contract(&self) -> &K {
        &self.contract
    }

    /// 以目前設定的年利率試算表單的每期還款
    pub fn quote(&self, amount: Option<&str>, period: Option<&str>) -> Option<LoanQuote> {
        quote_from_form(amount, period, self.config.annual_rate_percent())
    }

    /// 送出借款申請 (requestLoan)
    pub async fn submit_request(
        &self,
        session: &WalletSession,
        application: &LoanApplication,
    ) -> Result<Submission> {
        let account = connected_account(session)?;

        let purpose = application.purpose.trim();
        if purpose.is_empty() {
            return Err(LendError::ValidationError {
                message: "purpose is required".to_string(),
            });
        }

        let period = application
            .period
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| LendError::ValidationError {
                message: "loan period is required".to_string(),
            })?
            .parse::<LoanPeriod>()
            .map_err(|message| LendError::ValidationError { message })?;

        let principal = parse_amount(&application.amount).ok_or_else(|| LendError::InvalidAmount {
            value: application.amount.clone(),
            reason: "not a decimal number".to_string(),
        })?;
        let min_amount = self.config.min_amount();
        if principal < min_amount {
            return Err(LendError::InvalidAmount {
                value: application.amount.clone(),
                reason: format!("minimum loan amount is {}", min_amount),
            });
        }

        let amount_wei = to_wei(&application.amount)?;
        let quote = self.quote(Some(&application.amount), Some(period.key()));

        tracing::info!(
            "📝 Submitting loan request: account={}, amount={}, period={}, purpose={}",
            account,
            principal,
            period,
            purpose
        );
        let tx_hash = self.contract.request_loan(account, amount_wei, purpose).await?;
        tracing::info!("✅ requestLoan sent: {}", tx_hash);

        Ok(Submission {
            tx_hash,
            amount_wei,
            quote,
        })
    }

    /// 出資給既有的借款需求 (stakeForLoan)
    pub async fn fund_request(&self, session: &WalletSession, request_id: &str) -> Result<Submission> {
        let account = connected_account(session)?;

        let request = self
            .book
            .request_by_id(request_id)
            .await?
            .ok_or_else(|| LendError::NotFound {
                kind: "loan request".to_string(),
                id: request_id.to_string(),
            })?;

        let amount_wei = to_wei(&request.amount.to_string())?;

        tracing::info!(
            "🤝 Funding loan request {} (loan id {}) for {} from {}",
            request.id,
            request.loan_id,
            request.amount,
            account
        );
        let tx_hash = self
            .contract
            .stake_for_loan(account, request.loan_id, amount_wei)
            .await?;
        tracing::info!("✅ stakeForLoan sent: {}", tx_hash);

        Ok(Submission {
            tx_hash,
            amount_wei,
            quote: quote_for_request(&request),
        })
    }
}

/// 依借款需求本身的金額、期間與利率試算
pub fn quote_for_request(request: &LoanRequest) -> Option<LoanQuote> {
    LoanQuoteInput::new(request.amount, request.period, request.interest_rate_percent)
        .and_then(|input| quote(&input))
}

fn connected_account(session: &WalletSession) -> Result<&Address> {
    session.account().ok_or_else(|| {
        tracing::warn!("Wallet not connected, refusing to send transaction");
        LendError::WalletNotConnected
    })
}
