use clap::Parser;
use micro_lend::adapters::catalog::CatalogLoanBook;
use micro_lend::config::toml_config::SourceType;
use micro_lend::core::lending::quote_for_request;
use micro_lend::core::portfolio::ActivitySummary;
use micro_lend::core::quote::format_amount;
use micro_lend::core::units::from_wei;
use micro_lend::core::LoanBook;
use micro_lend::domain::model::{LoanApplication, LoanQuote, Submission};
use micro_lend::utils::error::ErrorSeverity;
use micro_lend::utils::{logger, validation::Validate};
use micro_lend::{CliConfig, Command, HttpLoanBook, LendConfig, LendError, LendingService, SimulatedContract};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置
    let mut config = match &cli.config {
        Some(path) => match LendConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => LendConfig::default(),
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("Starting micro-lend CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 應用命令列覆蓋設定
    cli.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match config.source.r#type {
        SourceType::Catalog => {
            let book = match &config.source.catalog_path {
                Some(path) => CatalogLoanBook::from_file(path),
                None => CatalogLoanBook::seeded(),
            };
            match book {
                Ok(book) => run(book, config, cli.command).await,
                Err(e) => Err(e),
            }
        }
        SourceType::Http => {
            let endpoint = config.source.endpoint.clone().unwrap_or_default();
            let timeout = Duration::from_secs(config.source.timeout_seconds.unwrap_or(30));
            match HttpLoanBook::with_timeout(&endpoint, timeout) {
                Ok(book) => run(book, config, cli.command).await,
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = result {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run<B: LoanBook>(book: B, config: LendConfig, command: Command) -> Result<(), LendError> {
    let session = config.wallet_session()?;
    let contract = SimulatedContract::new(config.contract_address()?, config.contract.chain_id);
    let rate = config.quote.annual_rate_percent;
    let chain = config.chain_name().unwrap_or("unknown chain");
    let service = LendingService::new(book, contract, config);

    match command {
        Command::Quote { amount, period } => {
            match service.quote(amount.as_deref(), period.as_deref()) {
                Some(quote) => print_quote(&quote, rate),
                None => println!("Enter a positive amount and select a loan period to see the payment."),
            }
        }
        Command::Requests => {
            let requests = service.book().list_requests().await?;
            println!("📋 Open loan requests ({}):", requests.len());
            for request in requests {
                println!(
                    "  {:<6} ₹{:>8}  {:<9} {:>5}%  {:<7} {} ({})",
                    request.id,
                    format_amount(request.amount),
                    request.period.label(),
                    request.interest_rate_percent,
                    request.risk,
                    request.borrower,
                    request.purpose
                );
            }
        }
        Command::Show { id } => {
            let request = service
                .book()
                .request_by_id(&id)
                .await?
                .ok_or_else(|| LendError::NotFound {
                    kind: "loan request".to_string(),
                    id: id.clone(),
                })?;
            println!("📄 Loan request {}", request.id);
            println!("  Borrower: {}", request.borrower);
            println!("  Purpose: {}", request.purpose);
            println!("  Amount: ₹{}", format_amount(request.amount));
            println!("  Period: {}", request.period);
            println!("  Risk: {}", request.risk);
            if let Some(quote) = quote_for_request(&request) {
                print_quote(&quote, request.interest_rate_percent);
            }
        }
        Command::Communities => {
            let communities = service.book().list_communities().await?;
            let (mine, explore): (Vec<_>, Vec<_>) = communities.into_iter().partition(|c| c.joined);
            println!("🏠 My communities:");
            for community in &mine {
                println!("  {:<10} {} ({} members)", community.id, community.full_name, community.members);
            }
            println!("🔍 Explore:");
            for community in &explore {
                println!("  {:<10} {} ({} members)", community.id, community.full_name, community.members);
            }
        }
        Command::Community { id } => {
            let community = service
                .book()
                .community_by_id(&id)
                .await?
                .ok_or_else(|| LendError::NotFound {
                    kind: "community".to_string(),
                    id: id.clone(),
                })?;
            println!("🏠 {} - {}", community.name, community.full_name);
            println!("  Members: {}", community.members);
            println!("  Joined: {}", if community.joined { "yes" } else { "no" });
        }
        Command::Activities { kind } => {
            let activities = service.book().list_activities(kind).await?;
            for activity in &activities {
                println!(
                    "  #{:<3} {:<7} ₹{:>8}  {:<16} {}  due {}  {:>3}% repaid ({:?})",
                    activity.id,
                    format!("{:?}", activity.kind),
                    format_amount(activity.amount),
                    activity.counterparty,
                    activity.date,
                    activity.due_date,
                    activity.repayment_progress,
                    activity.status
                );
            }
            let summary = ActivitySummary::from_activities(&activities);
            println!(
                "📊 Lent ₹{}, borrowed ₹{}, {} active / {} completed, outstanding ₹{}",
                format_amount(summary.total_lent),
                format_amount(summary.total_borrowed),
                summary.active,
                summary.completed,
                format_amount(summary.outstanding)
            );
        }
        Command::Request {
            purpose,
            amount,
            period,
        } => {
            let application = LoanApplication {
                purpose,
                amount,
                period,
            };
            let submission = service.submit_request(&session, &application).await?;
            print_submission(
                "Your request has been submitted for approval",
                &submission,
                service.contract(),
                chain,
            );
        }
        Command::Fund { id } => {
            let submission = service.fund_request(&session, &id).await?;
            print_submission("Your stake has been sent", &submission, service.contract(), chain);
        }
    }

    Ok(())
}

fn print_quote(quote: &LoanQuote, rate: rust_decimal::Decimal) {
    println!("💰 Current interest rate: {}%", rate);
    println!("  Interest: ₹{}", quote.interest.round_dp(2));
    println!("  Total repayable: ₹{}", quote.total_amount.round_dp(2));
    println!("{}", payment_line(quote));
}

fn print_submission(headline: &str, submission: &Submission, contract: &SimulatedContract, chain: &str) {
    println!("✅ {}", headline);
    println!("  Contract: {} on {} ({})", contract.address(), chain, contract.chain_id());
    println!("  Amount: {} (base units: {})", from_wei(submission.amount_wei), submission.amount_wei);
    println!("  Transaction: {}", submission.tx_hash);
    if let Some(quote) = &submission.quote {
        println!("{}", payment_line(quote));
    }
}

/// 每期還款金額 (20 天方案為每月等值)
fn payment_line(quote: &LoanQuote) -> String {
    format!("  Periodic payment: ₹{}", format_amount(quote.periodic_payment))
}
