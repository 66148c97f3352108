use clap::ArgMatches;
use commands::command_argument_builder;
use indicatif::{ProgressBar, ProgressStyle};
use sitegrade_core::audit::{AuditError, Auditor};
use sitegrade_core::performance::PageSpeedClient;
use sitegrade_core::print_banner;
use sitegrade_core::render::{self, ReportFormat};
use sitegrade_scanner::PageFetcher;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("audit", primary_command)) => handle_audit(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

async fn handle_audit(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = sub_matches.get_one::<Url>("url").unwrap();
    let format = sub_matches.get_one::<String>("format").unwrap();
    let output = sub_matches.get_one::<PathBuf>("output");
    let timeout = sub_matches.get_one::<u64>("timeout").unwrap_or(&30);

    // Flag wins over the environment variable
    let api_key = sub_matches
        .get_one::<String>("pagespeed-key")
        .cloned()
        .or_else(|| std::env::var("PAGESPEED_API_KEY").ok())
        .filter(|key| !key.is_empty());

    let mut auditor = Auditor::new().with_fetcher(PageFetcher::with_timeout(*timeout));
    if let Some(key) = api_key {
        auditor = auditor.with_metrics(PageSpeedClient::new(key));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Auditing {}", url));

    let result = auditor.analyze(url.as_str()).await;
    spinner.finish_and_clear();

    match result {
        Ok(audit) => {
            let report = match ReportFormat::from_str(format) {
                Some(ReportFormat::Json) => match render::generate_json_report(&audit) {
                    Ok(report) => report,
                    Err(e) => {
                        eprintln!("✗ Failed to serialize report: {}", e);
                        std::process::exit(1);
                    }
                },
                _ => render::generate_text_report(&audit),
            };

            if let Some(path) = output {
                if let Err(e) = render::save_report(&report, path) {
                    eprintln!("✗ Failed to save report to {}: {}", path.display(), e);
                    std::process::exit(1);
                }
                println!("✓ Report saved to {}", path.display());
            } else {
                print!("{}", report);
            }
        }
        Err(AuditError::Fetch(e)) => {
            eprintln!("✗ Could not fetch {}: {}", url, e);
            std::process::exit(1);
        }
        Err(AuditError::Internal(e)) => {
            eprintln!("✗ Audit failed after fetch: {}", e);
            std::process::exit(2);
        }
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
