//! CLI tool for payment form validation.
//!
//! # Usage
//!
//! ```bash
//! # Validate a full submission
//! payform check 4539148803436467 12 30 1000
//!
//! # Validate and convert at a fixed rate
//! payform check 4539148803436467 12 30 1000 --fixed-rate 0.0025
//!
//! # Validate and convert through the currency API
//! CURRCONV_API_KEY=... payform check 4539148803436467 12 30 1000 --convert
//!
//! # Single-field checks
//! payform luhn 4539148803436467
//! payform expiry 12 30
//! payform amount 1000
//!
//! # Generate test card numbers
//! payform generate --prefix 4539 --count 5
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use payment_form::{
    generate, luhn, mask, validate_amount, validate_expiry, Config, CurrConvClient,
    CurrencyConverter, FixedRateConverter, PaymentFormValidator, PaymentProcessor,
    PaymentSubmission, PaymentView, SystemClock,
};

#[derive(Parser)]
#[command(name = "payform")]
#[command(author, version, about = "Payment form validation with HUF to EUR conversion")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "PAYFORM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a full payment submission
    Check {
        /// Card number (whitespace allowed)
        card_number: String,

        /// Two-digit expiration month
        month: String,

        /// Two-digit expiration year
        year: String,

        /// Amount to pay in HUF
        amount: String,

        /// Convert the amount through the currency API
        #[arg(long)]
        convert: bool,

        /// Convert at a fixed HUF to EUR rate instead of calling the API
        #[arg(long, conflicts_with = "convert")]
        fixed_rate: Option<Decimal>,

        /// Currency API key
        #[arg(long, env = "CURRCONV_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Check if a digit string passes the Luhn algorithm
    Luhn {
        /// Digits to check (whitespace allowed)
        card_number: String,
    },

    /// Validate an expiration month and year
    Expiry {
        /// Two-digit month
        month: String,

        /// Two-digit year
        year: String,
    },

    /// Validate an amount in HUF
    Amount {
        /// Amount to check
        amount: String,
    },

    /// Generate test card numbers (for testing only)
    Generate {
        /// Leading digits
        #[arg(short, long, default_value = generate::DEFAULT_PREFIX)]
        prefix: String,

        /// Number of cards to generate
        #[arg(short, long, default_value = "1")]
        count: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Check {
            card_number,
            month,
            year,
            amount,
            convert,
            fixed_rate,
            api_key,
            output,
        } => {
            let submission = PaymentSubmission::new(card_number, month, year, amount);
            cmd_check(&config, submission, convert, fixed_rate, api_key, output).await
        }
        Commands::Luhn { card_number } => cmd_luhn(&card_number),
        Commands::Expiry { month, year } => cmd_expiry(&month, &year),
        Commands::Amount { amount } => cmd_amount(&config, &amount),
        Commands::Generate { prefix, count } => cmd_generate(&prefix, count),
    }
}

async fn cmd_check(
    config: &Config,
    submission: PaymentSubmission,
    convert: bool,
    fixed_rate: Option<Decimal>,
    api_key: Option<String>,
    output: OutputFormat,
) -> ExitCode {
    let limits = match config.form.limits() {
        Ok(limits) => limits,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let validator = PaymentFormValidator::new().limits(limits);

    let converter: Option<Arc<dyn CurrencyConverter>> = if let Some(rate) = fixed_rate {
        match FixedRateConverter::new(rate) {
            Some(converter) => Some(Arc::new(converter)),
            None => {
                eprintln!("Error: fixed rate must be positive");
                return ExitCode::FAILURE;
            }
        }
    } else if convert {
        let mut converter_config = config.converter.clone();
        if api_key.is_some() {
            converter_config.api_key = api_key;
        }
        match CurrConvClient::new(&converter_config) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let view = match converter {
        Some(converter) => {
            let processor: PaymentProcessor<SystemClock> =
                PaymentProcessor::new(validator, converter);
            PaymentView::from(&processor.process(&submission).await)
        }
        None => PaymentView::from_report(&validator.validate(&submission)),
    };

    match output {
        OutputFormat::Text => print_view(&view),
        OutputFormat::Json => match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    if view.accepted && !view.conversion_failed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_view(view: &PaymentView) {
    println!("Accepted: {}", if view.accepted { "yes" } else { "no" });
    for error in &view.errors {
        println!("Error: {}", error);
    }

    println!("Data stored:");
    println!("  Card number: {}", view.stored.card_number.as_deref().unwrap_or(""));
    println!("  MM: {}", view.stored.expiration_month.as_deref().unwrap_or(""));
    println!("  YY: {}", view.stored.expiration_year.as_deref().unwrap_or(""));
    println!(
        "  Amount (in HUF): {}",
        view.stored.amount.map(|a| a.to_string()).unwrap_or_default()
    );

    if let Some(eur) = &view.amount_eur {
        println!("Amount (in EUR): {}", eur);
    }
    if let Some(e) = &view.conversion_error {
        println!("Conversion error: {}", e);
    }
}

fn cmd_luhn(card_number: &str) -> ExitCode {
    let digits: Option<Vec<u8>> = card_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect();

    match digits {
        Some(digits) if luhn::validate(&digits) => {
            println!("Luhn check: PASS ({})", mask::mask_string(card_number));
            ExitCode::SUCCESS
        }
        Some(_) => {
            println!("Luhn check: FAIL ({})", mask::mask_string(card_number));
            ExitCode::FAILURE
        }
        None => {
            eprintln!("Error: only digits are allowed");
            ExitCode::FAILURE
        }
    }
}

fn cmd_expiry(month: &str, year: &str) -> ExitCode {
    match validate_expiry(month, year, &SystemClock) {
        Ok(exp) => {
            println!("Valid: yes");
            println!("Month: {}", exp.month_str());
            println!("Year: {}", exp.year());
            println!("Formatted: {}", exp);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_amount(config: &Config, amount: &str) -> ExitCode {
    let limits = match config.form.limits() {
        Ok(limits) => limits,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match validate_amount(amount, &limits) {
        Ok(amount) => {
            println!("Valid: yes");
            println!("Amount (in HUF): {}", amount);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_generate(prefix: &str, count: usize) -> ExitCode {
    let Some(cards) = generate::generate_cards(prefix, count) else {
        eprintln!("Error: prefix must be at most 15 digits");
        return ExitCode::FAILURE;
    };

    for card in cards {
        println!("{}", card);
    }
    ExitCode::SUCCESS
}
