pub mod lending;
pub mod portfolio;
pub mod quote;
pub mod units;

pub use crate::domain::model::{LoanPeriod, LoanQuote, LoanQuoteInput};
pub use crate::domain::ports::{ConfigProvider, LoanBook, LoanContract};
pub use crate::utils::error::Result;
