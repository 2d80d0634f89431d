use std::collections::HashMap;
use std::path::Path as FsPath;
use axum::{
    body::{Bytes, HttpBody},
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    BoxError, Router,
};
use serde_json::Value;
use crate::books::domain::model::{BookFields, BookPatch};
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};
use crate::catalog::command::update_book_image_cmd::{UpdateBookImageCommand, UpdateBookImageCommandRequest, UpdateBookImageCommandResponse};
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, bad_request, json_to_server_error, ServerError};
use crate::storage::upload::StagedUpload;

const IMAGE_FIELD: &str = "image";

// text fields plus the staged image of a multipart form
struct BookForm {
    fields: HashMap<String, String>,
    upload: Option<StagedUpload>,
}

impl BookForm {
    fn text(&self, name: &str) -> String {
        self.fields.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
    }

    // only the literal "true" switches a flag on
    fn flag(&self, name: &str) -> bool {
        self.fields.get(name).map(|v| v == "true").unwrap_or(false)
    }

    fn book_fields(&self) -> BookFields {
        BookFields {
            title: self.text("title"),
            description: self.text("description"),
            author: self.text("author"),
            language: self.text("language"),
            category: self.text("category"),
            featured: self.flag("featured"),
            available: self.flag("available"),
        }
    }
}

async fn read_form(upload_dir: &FsPath, mut multipart: Multipart) -> Result<BookForm, ServerError> {
    let mut form = BookForm { fields: HashMap::new(), upload: None };
    while let Some(field) = multipart.next_field().await
        .map_err(|err| bad_request(format!("Invalid multipart body: {}", err).as_str(), "multipart"))? {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
            let bytes = field.bytes().await
                .map_err(|err| bad_request(format!("Invalid image upload: {}", err).as_str(), "multipart"))?;
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            let staged = StagedUpload::stage(upload_dir, file_name.as_str(), content_type.as_str(), &bytes).await
                .map_err(|err| ServerError::from(CommandError::from(err)))?;
            form.upload = Some(staged);
        } else {
            let value = field.text().await
                .map_err(|err| bad_request(format!("Invalid form field {}: {}", name, err).as_str(), "multipart"))?;
            form.fields.insert(name, value);
        }
    }
    Ok(form)
}

fn require_upload(upload: Option<StagedUpload>) -> Result<StagedUpload, ServerError> {
    upload.ok_or_else(|| bad_request("Image file is required", "Validation"))
}

pub(crate) async fn find_books(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    let req = ListBooksCommandRequest::new(params);
    let res = ListBooksCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    multipart: Multipart) -> Result<(StatusCode, Json<AddBookCommandResponse>), ServerError> {
    let form = read_form(state.config.upload_dir.as_path(), multipart).await?;
    let fields = form.book_fields();
    let upload = require_upload(form.upload)?;
    let res = AddBookCommand::new(state.catalog).execute(AddBookCommandRequest::new(fields, upload)).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let req = GetBookCommandRequest::new(book_id.as_str());
    let res = GetBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let patch: BookPatch = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateBookCommandRequest::new(book_id.as_str(), patch);
    let res = UpdateBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn update_book_image(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    multipart: Multipart) -> Result<Json<UpdateBookImageCommandResponse>, ServerError> {
    let form = read_form(state.config.upload_dir.as_path(), multipart).await?;
    let upload = require_upload(form.upload)?;
    let req = UpdateBookImageCommandRequest::new(book_id.as_str(), upload);
    let res = UpdateBookImageCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let req = RemoveBookCommandRequest::new(book_id.as_str());
    let res = RemoveBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

// generic over the request body so the same routes serve lambda_http and a plain listener
pub fn router<B>(state: AppState) -> Router<(), B>
    where B: HttpBody + Send + 'static,
          B::Data: Into<Bytes> + Send,
          B::Error: Into<BoxError> {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/api/v1/books", get(find_books).post(add_book))
        .route("/api/v1/books/:id",
               get(find_book_by_id).patch(update_book).delete(remove_book))
        .route("/api/v1/books/:id/image", patch(update_book_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
