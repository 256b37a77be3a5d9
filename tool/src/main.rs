//! Autosoft license operator tool.
//!
//! Issues and inspects license files outside the desktop application:
//! 1. Create `.ARL` requests for testing or on behalf of a customer
//! 2. Turn a request into an encrypted `.ASL` license
//! 3. Verify an `.ASL` and print its contents
//!
//! Usage:
//!   autosoft-tool --config licensing.toml issue --request acme.arl --out acme.asl
//!
//! Key material comes from the config file or `AUTOSOFT_AES_KEY` / `AUTOSOFT_AES_IV`.

use std::path::PathBuf;

use anyhow::Result;
use autosoft_license::RequestedLicenseType;
use autosoft_tool::{build_pipeline, inspect, issue, keygen, load_config, write_request, NewRequest};
use chrono::{DateTime, SubsecRound, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "autosoft-tool")]
#[command(about = "Issue and inspect Autosoft license files")]
struct Args {
    /// Path to licensing configuration (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base64 AES-256 key, overriding the config file
    #[arg(long, env = "AUTOSOFT_AES_KEY", hide_env_values = true, global = true)]
    aes_key: Option<String>,

    /// Base64 AES IV, overriding the config file
    #[arg(long, env = "AUTOSOFT_AES_IV", hide_env_values = true, global = true)]
    aes_iv: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a new license key
    Keygen {
        #[arg(long)]
        company: String,
        #[arg(long)]
        product: String,
        /// Deterministic seed, for reproducible keys
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write a license request (.ARL)
    Request {
        #[arg(long)]
        company: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        dealer: String,
        #[arg(long)]
        months: u32,
        #[arg(long = "type", value_enum, ignore_case = true)]
        license_type: RequestKind,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Issue a license (.ASL) for a request
    Issue {
        #[arg(short, long)]
        request: PathBuf,
        /// Start of validity (RFC 3339), defaults to now
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Module code to enable; repeatable
        #[arg(short, long = "module")]
        modules: Vec<String>,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Verify a license (.ASL) and print its record
    Inspect { artifact: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RequestKind {
    Demo,
    Paid,
}

impl From<RequestKind> for RequestedLicenseType {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Demo => Self::Demo,
            RequestKind::Paid => Self::Paid,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(
        args.config.as_deref(),
        args.aes_key.as_deref(),
        args.aes_iv.as_deref(),
    )?;

    match args.command {
        Command::Keygen {
            company,
            product,
            seed,
        } => {
            println!("{}", keygen(&config, &company, &product, seed)?);
        }
        Command::Request {
            company,
            product,
            dealer,
            months,
            license_type,
            key,
            currency,
            out,
        } => {
            let fields = NewRequest {
                company,
                product,
                dealer,
                currency,
                license_key: key,
                license_type: license_type.into(),
                months,
            };
            write_request(&fields, Utc::now().trunc_subsecs(0), &out)?;
        }
        Command::Issue {
            request,
            from,
            modules,
            out,
        } => {
            let pipeline = build_pipeline(&config)?;
            let valid_from = from.unwrap_or_else(|| Utc::now().trunc_subsecs(0));
            let issued = issue(&pipeline, &request, valid_from, &modules, &out)?;
            info!(
                "Issued {} license valid until {}",
                issued.record.license_type, issued.record.valid_to_utc
            );
            println!("{}", issued.record.license_key);
        }
        Command::Inspect { artifact } => {
            let pipeline = build_pipeline(&config)?;
            println!("{}", inspect(&pipeline, &artifact)?);
        }
    }
    Ok(())
}
