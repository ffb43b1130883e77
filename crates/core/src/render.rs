use crate::analysis::AnalysisReport;
use crate::decision::{RiskLevel, Verdict};
use std::fmt::Write;

use crate::format::format_percent;

pub const REJECT_HEADING: &str = "Reasons for Rejection";
pub const APPROVE_HEADING: &str = "Application Strengths";
pub const APPROVE_INTRO: &str = "Your profile looks solid. Here is what helped you:";
pub const REMEDIATION_HEADING: &str = "How to get Approved";

pub fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Approve => "APPROVE APPLICATION",
        Verdict::Reject => "REJECT APPLICATION",
    }
}

pub fn risk_label(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Low",
        RiskLevel::High => "High",
    }
}

pub fn render_text(report: &AnalysisReport) -> String {
    let e = &report.explanation;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Default Probability: {}", format_percent(e.probability));
    let _ = writeln!(out, "{}", verdict_label(e.verdict));
    let _ = writeln!(out, "Risk Level: {}", risk_label(e.risk_level));
    let _ = writeln!(out);

    match e.verdict {
        Verdict::Reject => {
            let _ = writeln!(out, "{REJECT_HEADING}");
        }
        Verdict::Approve => {
            let _ = writeln!(out, "{APPROVE_HEADING}");
            let _ = writeln!(out, "{APPROVE_INTRO}");
        }
    }
    for finding in &e.findings {
        let _ = writeln!(out, "  - {}", finding.message);
    }

    if let Some(remediation) = &e.remediation {
        let _ = writeln!(out);
        let _ = writeln!(out, "{REMEDIATION_HEADING}");
        let _ = writeln!(out, "{}", remediation.headline);
        for step in &remediation.steps {
            let _ = writeln!(out, "  - {step}");
        }
    }

    out
}
