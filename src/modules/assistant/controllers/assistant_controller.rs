use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::modules::assistant::models::{ChatMessage, PendingEntry};
use crate::modules::assistant::services::AssistantService;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Session as returned to clients
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub state: &'static str,
    pub transcript: Vec<ChatMessage>,
    pub pending_entries: Vec<PendingEntry>,
}

/// POST /assistant/sessions/{id}/messages
pub async fn post_message(
    service: web::Data<Arc<AssistantService>>,
    path: web::Path<String>,
    body: web::Json<MessageRequest>,
) -> Result<HttpResponse, AppError> {
    let reply = service.handle_message(&path.into_inner(), &body.text).await?;
    Ok(HttpResponse::Ok().json(reply))
}

/// POST /assistant/sessions/{id}/closing/confirm
pub async fn confirm_closing(
    service: web::Data<Arc<AssistantService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let reply = service.confirm_closing(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reply))
}

/// POST /assistant/sessions/{id}/entries/{entry_id}/confirm
pub async fn confirm_entry(
    service: web::Data<Arc<AssistantService>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (session_id, entry_id) = path.into_inner();
    let reply = service.confirm_entry(&session_id, &entry_id).await?;
    Ok(HttpResponse::Created().json(reply))
}

/// DELETE /assistant/sessions/{id}/entries/{entry_id}
pub async fn discard_entry(
    service: web::Data<Arc<AssistantService>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (session_id, entry_id) = path.into_inner();
    let reply = service.discard_entry(&session_id, &entry_id).await?;
    Ok(HttpResponse::Ok().json(reply))
}

/// POST /assistant/sessions/{id}/reset
pub async fn reset_session(
    service: web::Data<Arc<AssistantService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.reset(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /assistant/sessions/{id}
pub async fn get_session(
    service: web::Data<Arc<AssistantService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let snapshot = service.session(&session_id).await?;
    Ok(HttpResponse::Ok().json(SessionView {
        session_id,
        state: snapshot.state.name(),
        transcript: snapshot.transcript,
        pending_entries: snapshot.pending_entries,
    }))
}

/// DELETE /assistant/sessions/{id}
pub async fn delete_session(
    service: web::Data<Arc<AssistantService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.end_session(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure assistant routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/assistant/sessions")
            .route("/{id}", web::get().to(get_session))
            .route("/{id}", web::delete().to(delete_session))
            .route("/{id}/messages", web::post().to(post_message))
            .route("/{id}/reset", web::post().to(reset_session))
            .route("/{id}/closing/confirm", web::post().to(confirm_closing))
            .route(
                "/{id}/entries/{entry_id}/confirm",
                web::post().to(confirm_entry),
            )
            .route("/{id}/entries/{entry_id}", web::delete().to(discard_entry)),
    );
}
