use anyhow::Context;
use clap::Parser;
use freight_quote::adapters::http::submission_page;
use freight_quote::core::page::{totals_summary, PackageRow};
use freight_quote::core::tax_id;
use freight_quote::domain::model::PackageEntry;
use freight_quote::utils::error::ErrorSeverity;
use freight_quote::utils::format::format_weight;
use freight_quote::utils::{logger, validation::Validate};
use freight_quote::{CliConfig, Command, FreightError, PackageSession, QuoteConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = cli.verbose || config.verbose_logs();
    if cli.json_logs() || config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli.command, &config).await {
        report_and_exit(e);
    }

    Ok(())
}

async fn run(command: &Command, config: &QuoteConfig) -> anyhow::Result<()> {
    match command {
        Command::FormatTaxId { raw } => {
            println!("{}", tax_id::format(raw));
        }
        Command::ValidateTaxId { raw } => {
            let formatted = tax_id::format(raw);
            if tax_id::is_valid(raw) {
                println!("✅ {} is a valid CNPJ", formatted);
            } else {
                println!("❌ {} is not a valid CNPJ", formatted);
                std::process::exit(1);
            }
        }
        Command::Catalog => {
            let catalog = config.load_catalog()?;
            println!("📦 Predefined packages:");
            for (id, package) in catalog.iter() {
                println!(
                    "  [{}] {:<8} {} x {} x {} cm, {}",
                    id,
                    package.nome,
                    package.comprimento,
                    package.altura,
                    package.largura,
                    format_weight(&package.peso_padrao)
                );
            }
        }
        Command::Totals { packages } => {
            let session = load_session(packages)?;
            print_table(&session);
        }
        Command::Submit {
            packages, dry_run, ..
        } => {
            let session = load_session(packages)?;
            let page = submission_page(config, session)?;
            print_table(page.session());

            if *dry_run {
                tracing::info!("🔍 DRY RUN MODE - nothing will be sent");
                println!("🔍 Would POST {} package lines", page.session().len());
                return Ok(());
            }

            let outcome = page.request_quotations().await?;
            tracing::info!("✅ Quotation request accepted");
            println!("✅ Quotation request accepted");
            println!("➡️  {}", outcome.redirect_url());
        }
    }

    Ok(())
}

fn load_session(path: &str) -> anyhow::Result<PackageSession> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading package list '{}'", path))?;
    let entries: Vec<PackageEntry> = serde_json::from_str(&content)
        .with_context(|| format!("parsing package list '{}'", path))?;
    tracing::info!("📁 Loaded {} package lines from {}", entries.len(), path);
    Ok(PackageSession::from_entries(entries)?)
}

fn print_table(session: &PackageSession) {
    println!("📋 Packages:");
    for row in session.entries().iter().map(PackageRow::from) {
        println!(
            "  {:<14} {:<18} {:>10} kg  x{}",
            row.name, row.dimensions, row.weight, row.quantity
        );
    }
    println!("{}", totals_summary(&session.totals()));
}

fn report_and_exit(error: anyhow::Error) -> ! {
    let Some(e) = error.downcast_ref::<FreightError>() else {
        tracing::error!("❌ {:#}", error);
        eprintln!("❌ {:#}", error);
        std::process::exit(3);
    };

    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
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
    std::process::exit(exit_code);
}

