// Report rendering: human-readable text and machine-readable JSON.

use crate::audit::AuditResult;
use crate::report::Report;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const THIN_RULE: &str =
    "────────────────────────────────────────────────────────────────────────────────\n";

pub fn generate_text_report(result: &AuditResult) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                          SITEGRADE SEO AUDIT REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("URL:          {}\n", result.url));
    report.push_str(&format!(
        "Audit Date:   {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!(
        "Overall:      {} ({})\n",
        colorize_score(result.overall_score),
        grade_label(result.overall_score)
    ));
    report.push('\n');

    let sections = [
        ("TECHNICAL SEO", &result.technical),
        ("ON-PAGE SEO", &result.on_page),
        ("PERFORMANCE", &result.performance),
        ("SECURITY", &result.security),
        ("MOBILE FRIENDLINESS", &result.mobile),
    ];

    for (name, section) in sections {
        report.push_str(&render_section(name, section));
    }

    report.push_str(RULE);
    report.push_str("                                End of Report\n");
    report.push_str(RULE);
    report.push_str("\nGenerated by Sitegrade - a single-page SEO audit engine\n\n");

    report
}

fn render_section(name: &str, section: &Report) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push_str(&format!("{}  [{}]\n", name, colorize_score(section.score)));
    out.push_str(RULE);
    out.push('\n');

    let passed = section
        .checks
        .values()
        .filter(|check| **check == Some(true))
        .count();
    let failed = section
        .checks
        .values()
        .filter(|check| **check == Some(false))
        .count();
    let skipped = section.checks.values().filter(|check| check.is_none()).count();

    out.push_str(&format!(
        "Checks: {} passed, {} failed, {} not evaluated\n\n",
        passed, failed, skipped
    ));

    if section.findings.is_empty() {
        out.push_str("  No findings.\n\n");
        return out;
    }

    for finding in &section.findings {
        out.push_str(&format!(
            "  [{}] {}\n",
            finding.kind.as_str().to_uppercase(),
            finding.message
        ));
        if let Some(ref recommendation) = finding.recommendation {
            out.push_str(&format!("          → {}\n", recommendation));
        }
    }
    out.push('\n');
    out.push_str(THIN_RULE);
    out.push('\n');

    out
}

pub fn generate_json_report(result: &AuditResult) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Sitegrade",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "audit": result
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn grade_label(score: u32) -> &'static str {
    match score {
        90..=100 => "Excellent",
        70..=89 => "Good",
        50..=69 => "Needs work",
        _ => "Poor",
    }
}

fn colorize_score(score: u32) -> String {
    let color = match score {
        90..=100 => "\x1b[32m", // green
        70..=89 => "\x1b[36m",  // cyan
        50..=69 => "\x1b[33m",  // yellow
        _ => "\x1b[31m",        // red
    };
    format!("{}{}\x1b[0m", color, score)
}
