//! Axum route handlers for the Documents API.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::documents::payload::{
    ApiResponse, CreateDocumentRequest, DocumentPatch, RestoreRequest, Validate,
};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::document::{Document, DocumentAggregate};
use crate::models::user::Owner;
use crate::state::AppState;

/// POST /api/v1/documents/create
pub async fn handle_create(
    State(state): State<AppState>,
    owner: Owner,
    AppJson(request): AppJson<CreateDocumentRequest>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    request.validate()?;
    let document = state.documents.create(&request.title, &owner).await?;
    Ok(Json(ApiResponse::with_message(
        "Document created successfully",
        document,
    )))
}

/// PATCH /api/v1/documents/update/:document_id
///
/// Applies a partial document plus optional section lists. Falsy fields are ignored.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    owner: Owner,
    AppJson(patch): AppJson<DocumentPatch>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    patch.validate()?;
    state.documents.update(&document_id, &owner, patch).await?;
    Ok(Json(ApiResponse::message("Document updated successfully")))
}

/// PATCH /api/v1/documents/restore/archive
pub async fn handle_restore(
    State(state): State<AppState>,
    owner: Owner,
    AppJson(request): AppJson<RestoreRequest>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    request.validate()?;
    let document = state
        .documents
        .restore_from_archive(&request.document_id, &owner, &request.status)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Document restored successfully",
        document,
    )))
}

/// GET /api/v1/documents/all
pub async fn handle_list_active(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let documents = state.documents.list_active(&owner).await?;
    Ok(Json(ApiResponse::data(documents)))
}

/// GET /api/v1/documents/trash/all
pub async fn handle_list_archived(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let documents = state.documents.list_archived(&owner).await?;
    Ok(Json(ApiResponse::data(documents)))
}

/// GET /api/v1/documents/:document_id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    owner: Owner,
) -> Result<Json<ApiResponse<DocumentAggregate>>, AppError> {
    let aggregate = state.documents.get_by_id(&document_id, &owner).await?;
    Ok(Json(ApiResponse::data(aggregate)))
}

/// GET /api/v1/documents/public/doc/:document_id
///
/// No authentication; only documents with public status are returned.
pub async fn handle_get_public(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<ApiResponse<DocumentAggregate>>, AppError> {
    let aggregate = state.documents.get_public(&document_id).await?;
    Ok(Json(ApiResponse::data(aggregate)))
}
