// Shared report types: findings, per-check outcomes and the deduction
// scorecard every rule-based analyzer folds its checks through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Error,
    Warning,
    Recommendation,
    Info,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::Error => "error",
            FindingKind::Warning => "warning",
            FindingKind::Recommendation => "recommendation",
            FindingKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub impact: Impact,
}

impl Finding {
    pub fn new(kind: FindingKind, code: &str, message: impl Into<String>, impact: Impact) -> Self {
        Self {
            kind,
            code: code.to_string(),
            message: message.into(),
            recommendation: None,
            impact,
        }
    }

    pub fn with_recommendation(mut self, recommendation: &str) -> Self {
        self.recommendation = Some(recommendation.to_string());
        self
    }
}

/// Result of one named check inside an analyzer.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub passed: bool,
    pub findings: Vec<Finding>,
    pub deduction: u32,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            findings: Vec::new(),
            deduction: 0,
        }
    }

    /// Passing outcome that still surfaces an advisory finding.
    pub fn note(finding: Finding) -> Self {
        Self {
            passed: true,
            findings: vec![finding],
            deduction: 0,
        }
    }

    pub fn fail(finding: Finding, deduction: u32) -> Self {
        Self {
            passed: false,
            findings: vec![finding],
            deduction,
        }
    }

    pub fn fail_all(findings: Vec<Finding>, deduction: u32) -> Self {
        Self {
            passed: false,
            findings,
            deduction,
        }
    }
}

/// One analyzer's report. `checks` maps check name to pass/fail,
/// `None` meaning the check could not be evaluated at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub score: u32,
    pub findings: Vec<Finding>,
    pub checks: BTreeMap<String, Option<bool>>,
    pub data: Map<String, Value>,
}

/// Deduction fold: start at 100, subtract per failed check, clamp at 0.
/// Findings are appended in check order, including advisory notes from
/// passing checks.
#[derive(Debug)]
pub struct Scorecard {
    score: i32,
    findings: Vec<Finding>,
    checks: BTreeMap<String, Option<bool>>,
}

impl Scorecard {
    pub fn new() -> Self {
        Self {
            score: 100,
            findings: Vec::new(),
            checks: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, name: &str, outcome: CheckOutcome) {
        self.checks.insert(name.to_string(), Some(outcome.passed));
        if !outcome.passed {
            self.score -= outcome.deduction as i32;
        }
        self.findings.extend(outcome.findings);
    }

    pub fn finish(self, data: Map<String, Value>) -> Report {
        Report {
            score: self.score.max(0) as u32,
            findings: self.findings,
            checks: self.checks,
            data,
        }
    }
}

impl Default for Scorecard {
    fn default() -> Self {
        Self::new()
    }
}
