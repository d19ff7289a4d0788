//! Code sample handlers.
//!
//! ```text
//! GET    /api/code?q=lifetimes&l=rust&page=1&pageSize=20
//! POST   /api/code      {"languageId":"rust","title":"..","description":"..","body":".."}
//! GET    /api/code/{id}
//! PUT    /api/code/{id}
//! DELETE /api/code/{id}
//! ```
//!
//! Reads are anonymous. Writes resolve the caller through the session first;
//! ownership is enforced by the command port.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CodeSample, CodeSampleDraft, CodeSamplePage, Error, SubmissionTarget};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_code_sample_id, parse_code_sample_search};

/// Submission body shared by create and update.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeSampleSubmission {
    #[schema(example = "rust")]
    pub language_id: String,
    pub title: String,
    pub description: String,
    pub body: String,
}

impl From<CodeSampleSubmission> for CodeSampleDraft {
    fn from(value: CodeSampleSubmission) -> Self {
        Self {
            language_id: value.language_id,
            title: value.title,
            description: value.description,
            body: value.body,
        }
    }
}

/// OpenAPI shape of a search response.
#[derive(ToSchema)]
#[schema(as = CodeSamplePage)]
pub struct CodeSamplePageSchema {
    /// Total matches across all pages.
    pub count: u64,
    /// This page of results, never null.
    pub results: Vec<CodeSample>,
}

/// Search code samples.
#[utoipa::path(
    get,
    path = "/api/code",
    params(
        ("q" = Option<String>, Query, description = "Web-search style text query"),
        ("l" = Option<Vec<String>>, Query, description = "Language id filter; repeatable"),
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("pageSize" = Option<u32>, Query, description = "Results per page, 1 to 50")
    ),
    responses(
        (status = 200, description = "Matching samples", body = CodeSamplePageSchema),
        (status = 422, description = "Invalid query parameters", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["code"],
    operation_id = "listCodeSamples",
    security([])
)]
#[get("/code")]
pub async fn list_code_samples(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<CodeSamplePage>> {
    let search = parse_code_sample_search(req.query_string())?;
    let page = state.code_samples.find_code_samples(&search).await?;
    Ok(web::Json(page))
}

/// Submit a new code sample owned by the session user.
#[utoipa::path(
    post,
    path = "/api/code",
    request_body = CodeSampleSubmission,
    responses(
        (status = 201, description = "Created sample", body = CodeSample),
        (status = 403, description = "No session", body = Error),
        (status = 404, description = "Unknown language or user", body = Error),
        (status = 422, description = "Malformed body", body = Error)
    ),
    tags = ["code"],
    operation_id = "createCodeSample"
)]
#[post("/code")]
pub async fn create_code_sample(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CodeSampleSubmission>,
) -> ApiResult<HttpResponse> {
    let user = session.load_user(state.credentials.as_ref()).await?;
    let sample = state
        .code_sample_commands
        .submit(&user, SubmissionTarget::Create, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(sample))
}

/// Fetch one code sample.
#[utoipa::path(
    get,
    path = "/api/code/{id}",
    params(("id" = String, Path, description = "Code sample UUID")),
    responses(
        (status = 200, description = "The sample", body = CodeSample),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "No such sample", body = Error)
    ),
    tags = ["code"],
    operation_id = "getCodeSample",
    security([])
)]
#[get("/code/{id}")]
pub async fn get_code_sample(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CodeSample>> {
    let id = parse_code_sample_id(&path)?;
    let sample = state.code_samples.get_code_sample(&id).await?;
    Ok(web::Json(sample))
}

/// Overwrite a code sample the session user owns.
#[utoipa::path(
    put,
    path = "/api/code/{id}",
    params(("id" = String, Path, description = "Code sample UUID")),
    request_body = CodeSampleSubmission,
    responses(
        (status = 200, description = "Updated sample", body = CodeSample),
        (status = 400, description = "Malformed id", body = Error),
        (status = 403, description = "No session, or not the owner", body = Error),
        (status = 404, description = "No such sample or language", body = Error)
    ),
    tags = ["code"],
    operation_id = "updateCodeSample"
)]
#[put("/code/{id}")]
pub async fn update_code_sample(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CodeSampleSubmission>,
) -> ApiResult<web::Json<CodeSample>> {
    let target_id = parse_code_sample_id(&path)?;
    let user = session.load_user(state.credentials.as_ref()).await?;
    let sample = state
        .code_sample_commands
        .submit(
            &user,
            SubmissionTarget::Update { target_id },
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(sample))
}

/// Delete a code sample the session user owns.
#[utoipa::path(
    delete,
    path = "/api/code/{id}",
    params(("id" = String, Path, description = "Code sample UUID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed id", body = Error),
        (status = 403, description = "No session, or not the owner", body = Error),
        (status = 404, description = "No such sample", body = Error)
    ),
    tags = ["code"],
    operation_id = "deleteCodeSample"
)]
#[delete("/code/{id}")]
pub async fn delete_code_sample(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_code_sample_id(&path)?;
    let user = session.load_user(state.credentials.as_ref()).await?;
    state.code_sample_commands.delete(&user, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "code_samples_tests.rs"]
mod tests;
