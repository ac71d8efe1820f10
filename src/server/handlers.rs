use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::{info, warn};

use crate::languages::{Lang, detect_lang, detect_script};
use crate::providers::Provider;
use crate::settings::Settings;
use crate::speech::WhisperEngine;
use crate::{chatbot, ocr, payload, pdf, speech};

use super::error::ServerError;
use super::models::{
    ChatRequest, ChatResponse, FaqResponse, OcrImageRequest, OcrImageResponse, OcrPdfRequest,
    OcrPdfResponse, SpeechToTextRequest, SpeechToTextResponse, SpeechTranslateRequest,
    SpeechTranslateResponse, TranslateTextRequest, TranslateTextResponse,
};
use super::state::ServerState;

pub async fn run_server(settings: Settings, addr: String) -> Result<()> {
    log_engine_availability();
    let whisper = match WhisperEngine::load(settings.whisper_model.as_deref()).await {
        Ok(engine) => Some(Arc::new(engine)),
        Err(err) => {
            warn!(
                "whisper model unavailable, speech endpoints will report errors: {:#}",
                err
            );
            None
        }
    };

    let state = Arc::new(ServerState { settings, whisper });
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| "failed to bind server address")?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/translate-text", post(translate_text))
        .route("/ocr-image", post(ocr_image))
        .route("/ocr-pdf", post(ocr_pdf))
        .route("/speech-to-text", post(speech_to_text))
        .route("/speech-translate", post(speech_translate))
        .route("/chatbot/faq", get(chatbot_faq))
        .route("/chatbot/chat", post(chatbot_chat))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors_middleware))
}

fn log_engine_availability() {
    for (command, role) in [
        ("tesseract", "image OCR"),
        ("ffmpeg", "audio conversion"),
        ("espeak", "speech synthesis"),
        ("mutool", "PDF rendering"),
    ] {
        if speech::command_exists(command) {
            info!("{} available ({})", command, role);
        } else {
            warn!("{} not found ({})", command, role);
        }
    }
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok", "message": "Backend is running" })),
    )
}

async fn cors_middleware(req: Request, next: Next) -> Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type,authorization"),
    );
}

/// `axum::Json` with its rejection mapped into the `{detail}` error
/// body; malformed request JSON is a 400 like every other input error.
struct AppJson<T>(T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::bad_request(rejection.body_text()))?;
        Ok(AppJson(value))
    }
}

async fn translate_text(
    State(state): State<Arc<ServerState>>,
    AppJson(request): AppJson<TranslateTextRequest>,
) -> Result<Json<TranslateTextResponse>, ServerError> {
    let text = required_text(request.text, "text")?;
    let source = parse_source_lang(request.source_lang.as_deref())?;
    let target = parse_target_lang(request.target_lang.as_deref())?;

    let output = state
        .translator()
        .translate(&text, source, target)
        .await
        .map_err(ServerError::from)?;
    Ok(Json(TranslateTextResponse {
        translated_text: output.text,
    }))
}

async fn ocr_image(
    State(state): State<Arc<ServerState>>,
    AppJson(request): AppJson<OcrImageRequest>,
) -> Result<Json<OcrImageResponse>, ServerError> {
    let encoded = request
        .image_base64
        .ok_or_else(|| ServerError::bad_request("image_base64 must be a non-empty string"))?;
    let bytes = payload::decode_base64_field(&encoded, "image_base64")
        .map_err(|err| ServerError::bad_request(err.to_string()))?;
    if !payload::is_image(&bytes) {
        return Err(ServerError::bad_request(
            "image_base64 does not contain a recognized image",
        ));
    }
    let source = match request.source_lang.as_deref().map(str::trim) {
        None | Some("") => Lang::Ne,
        Some(code) => Lang::parse(code).map_err(|err| ServerError::bad_request(err.to_string()))?,
    };

    let languages = state.ocr_languages(source);
    let extracted = run_blocking(move || ocr::extract_text(&bytes, &languages)).await?;

    let script = detect_script(&extracted);
    let detected = detect_lang(&extracted);
    let translated_text = if extracted.trim().is_empty() || detected == Lang::En {
        None
    } else {
        let output = state
            .translator()
            .translate(&extracted, Some(detected), Lang::En)
            .await
            .map_err(ServerError::from)?;
        Some(output.text)
    };

    Ok(Json(OcrImageResponse {
        detected_script: script.label().to_string(),
        detected_language: detected.code().to_string(),
        extracted_text: extracted,
        translated_text,
    }))
}

async fn ocr_pdf(
    State(state): State<Arc<ServerState>>,
    AppJson(request): AppJson<OcrPdfRequest>,
) -> Result<Json<OcrPdfResponse>, ServerError> {
    let encoded = request
        .pdf_base64
        .ok_or_else(|| ServerError::bad_request("pdf_base64 must be a non-empty string"))?;
    let bytes = payload::decode_base64_field(&encoded, "pdf_base64")
        .map_err(|err| ServerError::bad_request(err.to_string()))?;
    if !payload::is_pdf(&bytes) {
        return Err(ServerError::bad_request(
            "pdf_base64 does not contain a PDF document",
        ));
    }

    let languages = state.pdf_ocr_languages();
    let extracted = run_blocking(move || pdf::extract_pdf_text(&bytes, &languages)).await?;
    Ok(Json(OcrPdfResponse {
        extracted_text: extracted,
    }))
}

async fn speech_to_text(
    State(state): State<Arc<ServerState>>,
    AppJson(request): AppJson<SpeechToTextRequest>,
) -> Result<Json<SpeechToTextResponse>, ServerError> {
    let language = required_language(request.language.as_deref())?;
    let transcript = transcribe_upload(
        &state,
        request.audio_base64,
        language,
        request.filename.as_deref(),
    )
    .await?;

    Ok(Json(SpeechToTextResponse {
        transcript,
        detected_language: language.code().to_string(),
    }))
}

async fn speech_translate(
    State(state): State<Arc<ServerState>>,
    AppJson(request): AppJson<SpeechTranslateRequest>,
) -> Result<Json<SpeechTranslateResponse>, ServerError> {
    let language = required_language(request.language.as_deref())?;
    let target = parse_target_lang(request.target_lang.as_deref())?;
    let transcript = transcribe_upload(
        &state,
        request.audio_base64,
        language,
        request.filename.as_deref(),
    )
    .await?;

    let mut translated_text = String::new();
    let mut tts_audio_path = None;
    let mut tts_error = None;
    if !transcript.trim().is_empty() {
        let output = state
            .translator()
            .translate(&transcript, Some(language), target)
            .await
            .map_err(ServerError::from)?;
        translated_text = output.text;

        if request.return_tts.unwrap_or(false) {
            let text = translated_text.clone();
            let tmp_dir = state.tmp_dir();
            match run_blocking(move || speech::synthesize_to_temp(&text, target, &tmp_dir)).await {
                Ok(path) => tts_audio_path = Some(path),
                Err(err) => {
                    warn!("tts synthesis failed: {}", err.message);
                    tts_error = Some(err.message);
                }
            }
        }
    }

    Ok(Json(SpeechTranslateResponse {
        transcript,
        detected_language: language.code().to_string(),
        translated_text,
        tts_audio_path,
        tts_error,
    }))
}

async fn chatbot_faq() -> Json<FaqResponse> {
    Json(FaqResponse {
        items: chatbot::faq_items(),
    })
}

async fn chatbot_chat(
    State(state): State<Arc<ServerState>>,
    AppJson(request): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let message = required_text(request.message, "message")?;
    let model = chatbot::choose_model(request.mode, &state.settings).to_string();

    let response = state
        .chat_provider(&model)
        .append_system_input(chatbot::build_system_prompt(request.mode, request.language))
        .append_user_input(message)
        .complete()
        .await
        .map_err(ServerError::from)?;
    if response.text.is_empty() {
        return Err(ServerError::internal("chat model returned an empty reply"));
    }

    let reply_lang = chatbot::reply_language(request.language, &response.text);
    Ok(Json(ChatResponse {
        reply: response.text,
        reply_language: reply_lang.code().to_string(),
        reply_language_label: reply_lang.label().to_string(),
        mode: request.mode.as_str().to_string(),
    }))
}

async fn transcribe_upload(
    state: &Arc<ServerState>,
    audio_base64: Option<String>,
    language: Lang,
    filename: Option<&str>,
) -> Result<String, ServerError> {
    let encoded = audio_base64
        .ok_or_else(|| ServerError::bad_request("audio_base64 must be a non-empty string"))?;
    let bytes = payload::decode_base64_field(&encoded, "audio_base64")
        .map_err(|err| ServerError::bad_request(err.to_string()))?;
    let Some(engine) = state.whisper.clone() else {
        return Err(ServerError::internal(
            "whisper model is not loaded; speech recognition is unavailable",
        ));
    };

    let ext = payload::audio_extension(&bytes, filename).to_string();
    run_blocking(move || {
        let dir = tempfile::tempdir().with_context(|| "failed to create temp dir for audio")?;
        let wav = speech::prepare_wav(&bytes, &ext, dir.path())?;
        engine.transcribe(&wav, language)
    })
    .await
}

async fn run_blocking<T, F>(task: F) -> Result<T, ServerError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ServerError::internal(format!("server task failed: {}", err)))?
        .map_err(ServerError::from)
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ServerError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ServerError::bad_request(format!(
            "{} must be a non-empty string",
            field
        ))),
    }
}

fn parse_source_lang(value: Option<&str>) -> Result<Option<Lang>, ServerError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    Lang::parse(raw)
        .map(Some)
        .map_err(|err| ServerError::bad_request(err.to_string()))
}

fn parse_target_lang(value: Option<&str>) -> Result<Lang, ServerError> {
    match value.map(str::trim) {
        None | Some("") => Ok(Lang::En),
        Some(code) => Lang::parse(code).map_err(|err| ServerError::bad_request(err.to_string())),
    }
}

fn required_language(value: Option<&str>) -> Result<Lang, ServerError> {
    let Some(raw) = value else {
        return Err(ServerError::bad_request(
            "language is required ('ne', 'si', or 'en')",
        ));
    };
    Lang::parse(raw).map_err(|err| ServerError::bad_request(err.to_string()))
}
