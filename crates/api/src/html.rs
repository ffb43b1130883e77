use credit_risk_core::analysis::AnalysisReport;
use credit_risk_core::decision::Verdict;
use credit_risk_core::domain::applicant::Gender;
use credit_risk_core::domain::contract::{
    ApplicantForm, MIN_ANNUITY, MIN_CREDIT_AMOUNT, MIN_INCOME,
};
use credit_risk_core::{format, render};
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;max-width:820px;margin:2rem auto;padding:0 1rem}\
fieldset{margin-bottom:1rem}label{display:block;margin:.4rem 0}\
.reject{color:#b00020}.approve{color:#1b7f3b}.metric{font-size:2rem;font-weight:bold}\
.error{background:#fde7e9;padding:.5rem}";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>AI Credit Risk Analyzer</title><style>{STYLE}</style></head>\
         <body><h1>AI Credit Risk Analyzer</h1>\
         <p>This tool helps loan officers make data-driven decisions using a gradient-boosted \
         model and bureau history.</p>{body}</body></html>"
    )
}

struct NumberField<'a> {
    label: &'a str,
    name: &'a str,
    value: f64,
    min: f64,
    max: Option<f64>,
    step: &'a str,
}

impl NumberField<'_> {
    fn write_to(&self, out: &mut String) {
        let max = self
            .max
            .map(|m| format!(" max=\"{m}\""))
            .unwrap_or_default();
        let _ = write!(
            out,
            "<label>{} <input type=\"number\" name=\"{}\" value=\"{}\" \
             min=\"{}\"{max} step=\"{}\" required></label>",
            self.label, self.name, self.value, self.min, self.step
        );
    }
}

fn form(form: &ApplicantForm) -> String {
    let gender = form.gender.unwrap_or_default();
    let mut out = String::from("<form method=\"post\" action=\"/analyze\">");

    out.push_str(
        "<fieldset><legend>1. Applicant Details</legend>\
         <label>Gender <select name=\"gender\">",
    );
    for option in [Gender::Male, Gender::Female] {
        let selected = if option == gender { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{option}\"{selected}>{option}</option>");
    }
    out.push_str("</select></label>");
    NumberField {
        label: "Age",
        name: "age",
        value: f64::from(form.age.unwrap_or(ApplicantForm::DEFAULT_AGE)),
        min: 20.0,
        max: Some(70.0),
        step: "1",
    }
    .write_to(&mut out);
    out.push_str("</fieldset>");

    // Money fields take any amount above the minimum.
    out.push_str("<fieldset><legend>2. Financial Info</legend>");
    NumberField {
        label: "Annual Income ($)",
        name: "income",
        value: form.income.unwrap_or(ApplicantForm::DEFAULT_INCOME),
        min: MIN_INCOME,
        max: None,
        step: "any",
    }
    .write_to(&mut out);
    NumberField {
        label: "Loan Amount Requested ($)",
        name: "loan_amount",
        value: form.loan_amount.unwrap_or(ApplicantForm::DEFAULT_LOAN_AMOUNT),
        min: MIN_CREDIT_AMOUNT,
        max: None,
        step: "any",
    }
    .write_to(&mut out);
    NumberField {
        label: "Loan Annuity (Monthly Payment)",
        name: "annuity",
        value: form.annuity.unwrap_or(ApplicantForm::DEFAULT_ANNUITY),
        min: MIN_ANNUITY,
        max: None,
        step: "any",
    }
    .write_to(&mut out);
    out.push_str("</fieldset>");

    out.push_str("<fieldset><legend>3. Credit History</legend>");
    NumberField {
        label: "Number of Past Loans (Bureau)",
        name: "bureau_count",
        value: f64::from(form.bureau_count.unwrap_or(ApplicantForm::DEFAULT_BUREAU_COUNT)),
        min: 0.0,
        max: Some(20.0),
        step: "1",
    }
    .write_to(&mut out);
    NumberField {
        label: "Credit Score (External Source 2)",
        name: "ext_source_2",
        value: form.ext_source_2.unwrap_or(ApplicantForm::DEFAULT_EXT_SOURCE),
        min: 0.0,
        max: Some(1.0),
        step: "0.01",
    }
    .write_to(&mut out);
    NumberField {
        label: "Credit Score (External Source 3)",
        name: "ext_source_3",
        value: form.ext_source_3.unwrap_or(ApplicantForm::DEFAULT_EXT_SOURCE),
        min: 0.0,
        max: Some(1.0),
        step: "0.01",
    }
    .write_to(&mut out);
    out.push_str("</fieldset><button type=\"submit\">Analyze Risk Profile</button></form>");
    out
}

pub fn form_page(applicant: &ApplicantForm, error: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(error) = error {
        let _ = write!(body, "<p class=\"error\">{}</p>", escape(error));
    }
    body.push_str(&form(applicant));
    page(&body)
}

pub fn result_page(applicant: &ApplicantForm, report: &AnalysisReport) -> String {
    let e = &report.explanation;
    let (class, heading) = match e.verdict {
        Verdict::Reject => ("reject", render::REJECT_HEADING),
        Verdict::Approve => ("approve", render::APPROVE_HEADING),
    };

    let mut body = form(applicant);
    body.push_str("<hr>");
    let _ = write!(
        body,
        "<p>Default Probability</p><p class=\"metric\">{}</p>\
         <h2 class=\"{class}\">{}</h2><p>Risk Level: <strong>{}</strong></p>",
        format::format_percent(e.probability),
        render::verdict_label(e.verdict),
        render::risk_label(e.risk_level),
    );

    body.push_str("<hr><h2>Decision Explanation</h2>");
    let _ = write!(body, "<h3 class=\"{class}\">{heading}</h3>");
    if e.verdict == Verdict::Approve {
        let _ = write!(body, "<p>{}</p>", escape(render::APPROVE_INTRO));
    }
    body.push_str("<ul>");
    for finding in &e.findings {
        let _ = write!(body, "<li>{}</li>", escape(&finding.message));
    }
    body.push_str("</ul>");

    if let Some(remediation) = &e.remediation {
        let _ = write!(
            body,
            "<h3>{}</h3><p>{}</p><ul>",
            render::REMEDIATION_HEADING,
            escape(&remediation.headline)
        );
        for step in &remediation.steps {
            let _ = write!(body, "<li>{}</li>", escape(step));
        }
        body.push_str("</ul>");
    }

    let _ = write!(body, "<p><small>analysis {}</small></p>", report.analysis_id);
    page(&body)
}

pub fn error_page(message: &str) -> String {
    page(&format!(
        "<p class=\"error\">{}</p><p><a href=\"/\">Back</a></p>",
        escape(message)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("<a href='x'>&</a>"),
            "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn form_marks_selected_gender() {
        let html = form_page(
            &ApplicantForm {
                gender: Some(Gender::Female),
                ..Default::default()
            },
            None,
        );
        assert!(html.contains("<option value=\"Female\" selected>Female</option>"));
        assert!(html.contains("<option value=\"Male\">Male</option>"));
    }

    #[test]
    fn form_page_shows_error() {
        let html = form_page(&ApplicantForm::default(), Some("age must be 20..=70 (got 90)"));
        assert!(html.contains("class=\"error\">age must be 20..=70 (got 90)</p>"));
    }

    #[test]
    fn money_fields_accept_any_amount() {
        let html = form_page(&ApplicantForm::default(), None);
        for name in ["income", "loan_amount", "annuity"] {
            let start = html.find(&format!("name=\"{name}\"")).unwrap();
            let tag_end = start + html[start..].find('>').unwrap();
            let tag = &html[start..tag_end];
            assert!(tag.contains("step=\"any\""), "{name}: {tag}");
        }
        assert!(html.contains("name=\"income\" value=\"50000\" min=\"10000\""));
        assert!(html.contains("name=\"age\" value=\"30\" min=\"20\" max=\"70\" step=\"1\""));
    }
}
