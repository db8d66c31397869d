use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use tracing::Instrument;

use crate::core::{ParseOutcome, PipelineError, Profiler, RawInput};
use crate::models::{
    classify_json_body, classify_text_body, ErrorResponse, HealthResponse, IncompleteResponse,
    RecommendationsResponse,
};
use crate::services::{recognize_upload, TextGenerator, TextRecognizer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiler: Profiler,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub recognizer: Option<Arc<dyn TextRecognizer>>,
}

/// Pipeline step named in the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Parse,
    Factors,
    Risk,
    Recommendations,
}

impl Step {
    pub fn from_path(step: &str) -> Option<Self> {
        match step {
            "parse" => Some(Step::Parse),
            "factors" => Some(Step::Factors),
            "risk" => Some(Step::Risk),
            "recommendations" => Some(Step::Recommendations),
            _ => None,
        }
    }
}

/// Configure survey routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/{step}", web::post().to(run_step));
}

/// Service banner
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body("<h1>Health Risk Profiler</h1><p>Server is running</p>")
}

/// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run one pipeline step
///
/// POST /api/health/{step}
///
/// Accepts a JSON body (structured survey or `{"text": "..."}`), a
/// `text/plain` body, or an `image/*` body that is run through text
/// recognition first.
async fn run_step(
    state: web::Data<AppState>,
    step: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let step_name = step.into_inner();
    let Some(step) = Step::from_path(&step_name) else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "invalid_step",
            "Invalid step. Use parse | factors | risk | recommendations.",
            400,
        ));
    };

    let span = tracing::info_span!(
        "survey",
        request_id = %uuid::Uuid::new_v4(),
        step = %step_name,
    );

    async move {
        let raw = match read_input(&state, &req, &body).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return no_usable_input(),
            Err(response) => return response,
        };

        let response = match step {
            Step::Parse => match state.profiler.parse(&raw) {
                Ok(ParseOutcome::Parsed(parsed)) => HttpResponse::Ok().json(parsed),
                Ok(ParseOutcome::Incomplete) => HttpResponse::Ok().json(IncompleteResponse::default()),
                Err(e) => pipeline_error(e),
            },
            Step::Factors => match state.profiler.factors(&raw) {
                Ok(report) => HttpResponse::Ok().json(report),
                Err(e) => pipeline_error(e),
            },
            Step::Risk => match state.profiler.risk(&raw) {
                Ok(assessment) => HttpResponse::Ok().json(assessment),
                Err(e) => pipeline_error(e),
            },
            Step::Recommendations => {
                match state
                    .profiler
                    .recommendations(&raw, state.generator.as_deref())
                    .await
                {
                    Ok(report) => {
                        tracing::info!(
                            "Returning {} recommendations ({:?}, risk {})",
                            report.recommendations.len(),
                            report.source,
                            report.risk.level
                        );
                        HttpResponse::Ok().json(RecommendationsResponse {
                            risk: report.risk,
                            factors: report.factors,
                            recommendations: report.recommendations,
                            source: report.source,
                            status: "ok".to_string(),
                        })
                    }
                    Err(e) => pipeline_error(e),
                }
            }
        };

        tracing::info!("Completed step with status {}", response.status());
        response
    }
    .instrument(span)
    .await
}

/// Decide the input shape from the content type
///
/// `Ok(None)` means the body carried nothing the pipeline can use.
async fn read_input(
    state: &AppState,
    req: &HttpRequest,
    body: &web::Bytes,
) -> Result<Option<RawInput>, HttpResponse> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("image/") {
        return Ok(Some(recognize(state, body).await));
    }

    if content_type.starts_with("text/plain") {
        let text = String::from_utf8_lossy(body).into_owned();
        return classify_text_body(text).map(Some).map_err(invalid_input);
    }

    if body.is_empty() {
        return Ok(None);
    }

    let json: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        tracing::info!("Invalid JSON body: {}", e);
        HttpResponse::BadRequest().json(ErrorResponse::new(
            "invalid_json",
            format!("Invalid JSON: {}", e),
            400,
        ))
    })?;

    classify_json_body(json).map_err(invalid_input)
}

/// Run text recognition; failures degrade to empty text
async fn recognize(state: &AppState, image: &[u8]) -> RawInput {
    let Some(recognizer) = state.recognizer.as_deref() else {
        tracing::warn!("Image received but text recognition is disabled");
        return RawInput::Recognized {
            text: String::new(),
            confidence: None,
        };
    };

    match recognize_upload(recognizer, image).await {
        Ok(recognition) => RawInput::Recognized {
            text: recognition.text,
            confidence: recognition.confidence,
        },
        Err(e) => {
            tracing::warn!("Text recognition failed: {}", e);
            RawInput::Recognized {
                text: String::new(),
                confidence: None,
            }
        }
    }
}

fn no_usable_input() -> HttpResponse {
    pipeline_error(PipelineError::NoUsableInput)
}

fn pipeline_error(err: PipelineError) -> HttpResponse {
    match err {
        PipelineError::NoUsableInput => HttpResponse::BadRequest().json(ErrorResponse::new(
            "no_usable_input",
            err.to_string(),
            400,
        )),
    }
}

fn invalid_input(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("invalid_input", errors.to_string(), 400))
}
