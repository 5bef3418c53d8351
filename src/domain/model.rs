use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 借款期間，只允許固定的四個選項
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanPeriod {
    #[serde(rename = "20days")]
    TwentyDays,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "2months")]
    TwoMonths,
    #[serde(rename = "3months")]
    ThreeMonths,
}

impl LoanPeriod {
    pub const ALL: [LoanPeriod; 4] = [
        LoanPeriod::TwentyDays,
        LoanPeriod::OneMonth,
        LoanPeriod::TwoMonths,
        LoanPeriod::ThreeMonths,
    ];

    /// 月數以分數表示 (分子, 分母)。20 天固定視為 20/30 個月
    pub fn month_fraction(self) -> (u32, u32) {
        match self {
            LoanPeriod::TwentyDays => (20, 30),
            LoanPeriod::OneMonth => (1, 1),
            LoanPeriod::TwoMonths => (2, 1),
            LoanPeriod::ThreeMonths => (3, 1),
        }
    }

    pub fn months(self) -> Decimal {
        let (numerator, denominator) = self.month_fraction();
        Decimal::from(numerator) / Decimal::from(denominator)
    }

    pub fn key(self) -> &'static str {
        match self {
            LoanPeriod::TwentyDays => "20days",
            LoanPeriod::OneMonth => "1month",
            LoanPeriod::TwoMonths => "2months",
            LoanPeriod::ThreeMonths => "3months",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoanPeriod::TwentyDays => "20 days",
            LoanPeriod::OneMonth => "1 month",
            LoanPeriod::TwoMonths => "2 months",
            LoanPeriod::ThreeMonths => "3 months",
        }
    }
}

impl FromStr for LoanPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoanPeriod::ALL
            .into_iter()
            .find(|period| period.key() == s)
            .ok_or_else(|| {
                format!(
                    "unknown loan period '{}', expected one of: 20days, 1month, 2months, 3months",
                    s
                )
            })
    }
}

impl fmt::Display for LoanPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// 計算還款金額所需的輸入，建構時即保證本金為正、利率非負
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanQuoteInput {
    principal: Decimal,
    period: LoanPeriod,
    annual_rate_percent: Decimal,
}

impl LoanQuoteInput {
    pub fn new(principal: Decimal, period: LoanPeriod, annual_rate_percent: Decimal) -> Option<Self> {
        if principal <= Decimal::ZERO || annual_rate_percent < Decimal::ZERO {
            return None;
        }
        Some(Self {
            principal,
            period,
            annual_rate_percent,
        })
    }

    pub fn principal(&self) -> Decimal {
        self.principal
    }

    pub fn period(&self) -> LoanPeriod {
        self.period
    }

    pub fn annual_rate_percent(&self) -> Decimal {
        self.annual_rate_percent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanQuote {
    pub months: Decimal,
    pub interest: Decimal,
    pub total_amount: Decimal,
    /// 四捨五入到整數貨幣單位
    pub periodic_payment: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskScore {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskScore::Low => "Low",
            RiskScore::Medium => "Medium",
            RiskScore::High => "High",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub id: String,
    /// 合約上的 loan id，出資時傳給 stakeForLoan
    pub loan_id: u64,
    pub borrower: String,
    pub purpose: String,
    pub amount: Decimal,
    pub period: LoanPeriod,
    pub interest_rate_percent: Decimal,
    pub risk: RiskScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub members: u32,
    #[serde(default)]
    pub joined: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Lend,
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u32,
    pub kind: ActivityKind,
    pub amount: Decimal,
    pub counterparty: String,
    pub date: NaiveDate,
    pub status: ActivityStatus,
    /// 0..=100
    pub repayment_progress: u8,
    pub due_date: NaiveDate,
}

/// 活動列表的分頁選擇
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    All,
    Lend,
    Request,
}

impl ActivityFilter {
    pub fn matches(self, activity: &Activity) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Lend => activity.kind == ActivityKind::Lend,
            ActivityFilter::Request => activity.kind == ActivityKind::Request,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ActivityFilter::All => "all",
            ActivityFilter::Lend => "lend",
            ActivityFilter::Request => "request",
        }
    }
}

impl FromStr for ActivityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ActivityFilter::All),
            "lend" => Ok(ActivityFilter::Lend),
            "request" => Ok(ActivityFilter::Request),
            other => Err(format!(
                "unknown activity filter '{}', expected all, lend or request",
                other
            )),
        }
    }
}

/// 以太坊帳戶地址：0x 加 40 個十六進位字元
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| format!("address '{}' must start with 0x", s))?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("address '{}' must have 40 hex digits after 0x", s));
        }
        Ok(Address(s.to_string()))
    }
}

impl TryFrom<String> for Address {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 目前連線的錢包狀態；未連線時沒有帳戶
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WalletSession {
    account: Option<Address>,
}

impl WalletSession {
    pub fn connected(account: Address) -> Self {
        Self {
            account: Some(account),
        }
    }

    pub fn disconnected() -> Self {
        Self { account: None }
    }

    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

/// 借款申請表單內容
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoanApplication {
    pub purpose: String,
    pub amount: String,
    pub period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub tx_hash: TxHash,
    pub amount_wei: u128,
    pub quote: Option<LoanQuote>,
}
