use anyhow::Context;
use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credit_risk_core::analysis::{AnalysisReport, Analyzer};
use credit_risk_core::domain::contract::ApplicantForm;
use credit_risk_core::scoring::TreeEnsembleModel;

mod html;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = credit_risk_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let policy = settings.policy()?;
    // Without a model there is nothing to serve.
    let model = match TreeEnsembleModel::load(&settings.model_path) {
        Ok(model) => model,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "model load failed; refusing to start");
            return Err(e);
        }
    };

    let state = AppState {
        analyzer: Analyzer::new(Arc::new(model), policy),
    };
    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, reject_threshold = policy.reject_threshold, "api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(form_page))
        .route("/analyze", post(analyze_form))
        .route("/api/analyze", post(analyze_json))
        .route("/api/schema", get(get_schema))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    analyzer: Analyzer,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

#[derive(Debug, Serialize)]
struct ApiSchema {
    features: Vec<String>,
    reject_threshold: f64,
    safe_loan_income_multiplier: f64,
}

async fn form_page() -> Html<String> {
    Html(html::form_page(&ApplicantForm::default(), None))
}

async fn analyze_form(
    State(state): State<AppState>,
    form: Result<Form<ApplicantForm>, FormRejection>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "unreadable form submission");
            return Err((
                StatusCode::BAD_REQUEST,
                Html(html::form_page(
                    &ApplicantForm::default(),
                    Some(rejection.body_text().as_str()),
                )),
            ));
        }
    };

    let input = match form.clone().validate_and_into_input() {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!(error = %e, "rejected form submission");
            return Err((
                StatusCode::BAD_REQUEST,
                Html(html::form_page(&form, Some(format!("{e:#}").as_str()))),
            ));
        }
    };

    let report = state.analyzer.analyze(&input).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "analysis failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(html::error_page("The risk model could not score this application.")),
        )
    })?;

    Ok(Html(html::result_page(&form, &report)))
}

async fn analyze_json(
    State(state): State<AppState>,
    form: Result<Json<ApplicantForm>, JsonRejection>,
) -> Result<Json<AnalysisReport>, (StatusCode, Json<ApiError>)> {
    let Json(form) = form.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: rejection.body_text(),
            }),
        )
    })?;

    let input = form.validate_and_into_input().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!("{e:#}"),
            }),
        )
    })?;

    let report = state.analyzer.analyze_with_features(&input).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "analysis failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: "analysis failed".to_string(),
            }),
        )
    })?;

    Ok(Json(report))
}

async fn get_schema(State(state): State<AppState>) -> Json<ApiSchema> {
    let policy = state.analyzer.policy();
    Json(ApiSchema {
        features: state.analyzer.scorer().feature_names().names().to_vec(),
        reject_threshold: policy.reject_threshold,
        safe_loan_income_multiplier: policy.safe_loan_income_multiplier,
    })
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
