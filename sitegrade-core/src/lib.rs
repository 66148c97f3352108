pub mod audit;
pub mod keywords;
pub mod mobile;
pub mod onpage;
pub mod performance;
pub mod probe;
pub mod render;
pub mod report;
pub mod score;
pub mod security;
pub mod technical;

pub use audit::{AuditError, AuditResult, Auditor};
pub use report::{Finding, FindingKind, Impact, Report};

pub fn print_banner() {
    println!(
        r#"
     _ _                           _
 ___(_) |_ ___  __ _ _ __ __ _  __| | ___
/ __| | __/ _ \/ _` | '__/ _` |/ _` |/ _ \
\__ \ | ||  __/ (_| | | | (_| | (_| |  __/
|___/_|\__\___|\__, |_|  \__,_|\__,_|\___|
               |___/
"#
    );
    println!(
        "Sitegrade v{} - single-page SEO audit engine\n",
        env!("CARGO_PKG_VERSION")
    );
}
