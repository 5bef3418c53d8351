use crate::core::LoanContract;
use crate::domain::model::{Address, TxHash};
use crate::utils::error::{LendError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    RequestLoan {
        account: Address,
        amount_wei: u128,
        purpose: String,
    },
    StakeForLoan {
        account: Address,
        loan_id: u64,
        value_wei: u128,
    },
}

impl ContractCall {
    /// ABI 上的函式名稱
    pub fn method(&self) -> &'static str {
        match self {
            ContractCall::RequestLoan { .. } => "requestLoan",
            ContractCall::StakeForLoan { .. } => "stakeForLoan",
        }
    }
}

/// 不連上鏈的合約實作：記錄每次呼叫並回傳可預期的交易 hash
#[derive(Debug)]
pub struct SimulatedContract {
    address: Address,
    chain_id: u64,
    nonce: AtomicU64,
    calls: Mutex<Vec<ContractCall>>,
    reject_reason: Option<String>,
}

impl SimulatedContract {
    pub fn new(address: Address, chain_id: u64) -> Self {
        Self {
            address,
            chain_id,
            nonce: AtomicU64::new(0),
            calls: Mutex::new(Vec::new()),
            reject_reason: None,
        }
    }

    /// 所有呼叫都以指定原因失敗 (模擬使用者在錢包拒簽)
    pub fn rejecting(mut self, reason: impl Into<String>) -> Self {
        self.reject_reason = Some(reason.into());
        self
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn send(&self, call: ContractCall) -> Result<TxHash> {
        let method = call.method();
        if let Some(reason) = &self.reject_reason {
            tracing::warn!("Simulated {} rejected: {}", method, reason);
            return Err(LendError::ContractError {
                method: method.to_string(),
                message: reason.clone(),
            });
        }

        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst) + 1;
        let tx_hash = TxHash(format!("0x{:064x}", nonce));
        tracing::debug!(
            "Simulated {} on {} (chain {}): {:?} -> {}",
            method,
            self.address,
            self.chain_id,
            call,
            tx_hash
        );

        self.calls
            .lock()
            .map_err(|_| LendError::ContractError {
                method: method.to_string(),
                message: "call log is poisoned".to_string(),
            })?
            .push(call);

        Ok(tx_hash)
    }
}

#[async_trait]
impl LoanContract for SimulatedContract {
    async fn request_loan(&self, account: &Address, amount_wei: u128, purpose: &str) -> Result<TxHash> {
        self.send(ContractCall::RequestLoan {
            account: account.clone(),
            amount_wei,
            purpose: purpose.to_string(),
        })
    }

    async fn stake_for_loan(&self, account: &Address, loan_id: u64, amount_wei: u128) -> Result<TxHash> {
        self.send(ContractCall::StakeForLoan {
            account: account.clone(),
            loan_id,
            value_wei: amount_wei,
        })
    }
}
