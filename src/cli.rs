// Command-line front end

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::logging::init_logging;
use crate::resolver::auth::{default_config_path, save_cookie, AuthProvider};
use crate::resolver::{
    diagnose, EnvFileAuthProvider, ExtractionResult, FailureReport, MediaResolver, ResolveError,
    ResolverConfig,
};

#[derive(Debug, Parser)]
#[command(name = "insta-grab", version, about = "Resolve Instagram post links into media URLs")]
pub struct Cli {
    /// Cookie config file (default: <config dir>/insta-grab/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SOCKS5/HTTP proxy for upstream requests
    #[arg(long, global = true, env = "INSTA_GRAB_PROXY")]
    pub proxy: Option<String>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a post/reel/tv link
    Fetch {
        url: String,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Show whether a session cookie is configured
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Save the session cookie (the browser's Cookie header)
    SetCookie { cookie: String },
}

/// Parse arguments, run, and map the outcome to an exit code.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let provider = EnvFileAuthProvider::new(&config_path);

    match cli.command {
        Command::Fetch { url, json } => {
            let config = ResolverConfig::from_env();
            let proxy = cli.proxy.or(config.proxy.clone());
            let resolver = MediaResolver::from_config(config.with_proxy(proxy), Arc::new(provider))
                .context("failed to set up HTTP client")?;

            match resolver.resolve_url(&url).await {
                Ok(result) => {
                    print_success(&result, json)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(ResolveError::InvalidReference(url)) => {
                    anyhow::bail!("not an Instagram post link: {url}")
                }
                Err(ResolveError::NoMediaFound(report)) => {
                    print_failure(&report, json)?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Status { json } => {
            let has_cookie = provider.load().is_some();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "hasCookie": has_cookie,
                        "configPath": config_path.display().to_string(),
                    }))?
                );
            } else {
                println!("config:  {}", config_path.display());
                println!(
                    "cookie:  {}",
                    if has_cookie { "configured" } else { "not configured (anonymous requests)" }
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::SetCookie { cookie } => {
            save_cookie(&config_path, &cookie)?;
            println!("Cookie saved to {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_success(result: &ExtractionResult, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let out = json!({
            "success": true,
            "strategy": result.strategy,
            "media": result.items,
            "failures": result.failures,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for item in &result.items {
        match &item.thumbnail_url {
            Some(thumb) => println!("{}\t{}\t(thumbnail: {})", item.kind, item.url, thumb),
            None => println!("{}\t{}", item.kind, item.url),
        }
    }
    Ok(())
}

fn print_failure(report: &FailureReport, as_json: bool) -> anyhow::Result<()> {
    let hint = diagnose(report);

    if as_json {
        let out = json!({
            "success": false,
            "error": hint.description(),
            "hint": hint,
            "suggestion": hint.suggestion(),
            "details": report.messages(),
            "hasCookie": report.auth_context_present,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    eprintln!("{} ({})", hint.description(), report.shortcode);
    for line in report.messages() {
        eprintln!("  - {line}");
    }
    eprintln!("\n{}", hint.suggestion());
    Ok(())
}
