use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use health_risk_profiler::config::{LoggingSettings, Settings};
use health_risk_profiler::core::Profiler;
use health_risk_profiler::routes::{self, AppState};
use health_risk_profiler::services::{GeminiClient, TesseractCli, TextGenerator, TextRecognizer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn build_generator(settings: &Settings) -> Option<Arc<dyn TextGenerator>> {
    let generator = &settings.generator;
    if !generator.enabled {
        info!("Text generation disabled, using rule-based recommendations");
        return None;
    }

    let Some(api_key) = generator.api_key.clone() else {
        warn!("No generator API key configured, using rule-based recommendations");
        return None;
    };

    match GeminiClient::new(
        generator.endpoint.clone(),
        api_key,
        generator.model.clone(),
        generator.timeout_secs,
    ) {
        Ok(client) => {
            info!("Text generator initialized (model: {})", generator.model);
            Some(Arc::new(client))
        }
        Err(e) => {
            error!("Failed to create generator client ({}), using rule-based recommendations", e);
            None
        }
    }
}

fn build_recognizer(settings: &Settings) -> Option<Arc<dyn TextRecognizer>> {
    if !settings.ocr.enabled {
        info!("Text recognition disabled");
        return None;
    }

    info!("Text recognition via {} ({})", settings.ocr.binary, settings.ocr.language);
    Some(Arc::new(TesseractCli::new(
        settings.ocr.binary.clone(),
        settings.ocr.language.clone(),
    )))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting Health Risk Profiler...");

    let app_state = AppState {
        profiler: Profiler::new(settings.survey.default_recognition_confidence),
        generator: build_generator(&settings),
        recognizer: build_recognizer(&settings),
    };

    let max_upload = settings.survey.max_upload_bytes;
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::PayloadConfig::new(max_upload))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
