use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credit_risk_core::analysis::Analyzer;
use credit_risk_core::domain::applicant::Gender;
use credit_risk_core::domain::contract::ApplicantForm;
use credit_risk_core::scoring::TreeEnsembleModel;

#[derive(Debug, Parser)]
#[command(name = "credit_risk_cli", about = "Score one loan application and explain the decision")]
struct Args {
    /// Model artifact (LightGBM JSON dump). Defaults to MODEL_PATH.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Male or Female. Not used by the model.
    #[arg(long)]
    gender: Option<Gender>,

    /// Age in years (20..=70).
    #[arg(long)]
    age: Option<u32>,

    /// Annual income in dollars.
    #[arg(long)]
    income: Option<f64>,

    /// Requested loan amount in dollars.
    #[arg(long)]
    loan_amount: Option<f64>,

    /// Monthly loan annuity in dollars.
    #[arg(long)]
    annuity: Option<f64>,

    /// Number of past loans on the credit bureau record (0..=20).
    #[arg(long)]
    bureau_count: Option<u32>,

    /// External credit score 2, in [0, 1].
    #[arg(long)]
    ext_source_2: Option<f64>,

    /// External credit score 3, in [0, 1].
    #[arg(long)]
    ext_source_3: Option<f64>,

    /// Print the full report (including the feature row) as JSON.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn form(&self) -> ApplicantForm {
        ApplicantForm {
            gender: self.gender,
            age: self.age,
            income: self.income,
            loan_amount: self.loan_amount,
            annuity: self.annuity,
            bureau_count: self.bureau_count,
            ext_source_2: self.ext_source_2,
            ext_source_3: self.ext_source_3,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = credit_risk_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let input = args
        .form()
        .validate_and_into_input()
        .context("invalid applicant details")?;
    let policy = settings.policy()?;

    let model_path = args.model.clone().unwrap_or_else(|| settings.model_path.clone());
    let model = TreeEnsembleModel::load(&model_path).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        e
    })?;

    let analyzer = Analyzer::new(Arc::new(model), policy);

    if args.json {
        let report = analyzer.analyze_with_features(&input)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let report = analyzer.analyze(&input)?;
        print!("{}", credit_risk_core::render::render_text(&report));
    }

    Ok(())
}

fn init_sentry(settings: &credit_risk_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
