//! One handler per route. Each validates its input, makes a single store
//! call and maps the outcome to a status code.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{debug, info};

use crate::error::{AppError, ErrorBody, DELETE_TARGET_NOT_FOUND, ITEM_NOT_FOUND};
use crate::model::{ListQuery, NewTodoItem, StatusUpdate, TodoItem};
use crate::validation::validate_item;
use crate::AppState;

/// `Json` extractor whose rejections become 400 `AppError`s.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// List items, optionally only the open or only the completed ones.
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching items in id order", body = [TodoItem]),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<TodoItem>>, AppError> {
    let filter = query.filter();
    let items = state.store.list(filter).await?;
    debug!(?filter, count = items.len(), "listed items");
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = NewTodoItem,
    responses(
        (status = 201, description = "Item created", body = TodoItem,
            headers(("location" = String, description = "Path of the new item"))),
        (status = 400, description = "Description too long or due date in the past", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewTodoItem>,
) -> Result<impl IntoResponse, AppError> {
    validate_item(input.description.as_deref(), input.due_date, state.now())?;

    let item = state.store.insert(input).await?;
    info!(id = item.id, "created item");

    let location = format!("/items/{}", item.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = TodoItem),
        (status = 404, description = "No such item", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<TodoItem>, AppError> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(ITEM_NOT_FOUND.to_string()))
}

/// Overwrite every field of an item.
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item id; must equal the body id")),
    request_body = TodoItem,
    responses(
        (status = 204, description = "Item replaced"),
        (status = 400, description = "Id mismatch, description too long or due date in the past", body = ErrorBody),
        (status = 404, description = "No such item", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn replace_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(item): ApiJson<TodoItem>,
) -> Result<StatusCode, AppError> {
    if id != item.id {
        return Err(AppError::Validation(ITEM_NOT_FOUND.to_string()));
    }
    validate_item(item.description.as_deref(), item.due_date, state.now())?;

    state
        .store
        .replace(&item)
        .await
        .map_err(|err| AppError::from_store(err, ITEM_NOT_FOUND))?;
    info!(id, "replaced item");
    Ok(StatusCode::NO_CONTENT)
}

/// Flip an item between open and completed.
#[utoipa::path(
    put,
    path = "/items/status/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item id; must equal the body id")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Updated item", body = TodoItem),
        (status = 400, description = "Id mismatch", body = ErrorBody),
        (status = 404, description = "No such item", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn toggle_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<TodoItem>, AppError> {
    if id != update.id {
        return Err(AppError::Validation(ITEM_NOT_FOUND.to_string()));
    }

    let existing = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(ITEM_NOT_FOUND.to_string()))?;

    let completion_date = match existing.completion_date {
        None => Some(state.now()),
        Some(_) => None,
    };
    let updated = state
        .store
        .set_completion(id, completion_date)
        .await
        .map_err(|err| AppError::from_store(err, ITEM_NOT_FOUND))?;
    info!(id, completed = updated.is_completed(), "toggled item status");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "No such item", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .delete(id)
        .await
        .map_err(|err| AppError::from_store(err, DELETE_TARGET_NOT_FOUND))?;
    info!(id, "deleted item");
    Ok(StatusCode::NO_CONTENT)
}
