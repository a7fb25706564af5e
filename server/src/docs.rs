//! OpenAPI document and Swagger UI.
//!
//! The document is generated from the `#[utoipa::path]` annotations in
//! [`crate::handlers`]. The UI page is static HTML that loads swagger-ui from
//! a CDN and points it at [`OPENAPI_JSON_PATH`].

use axum::{response::Html, Json};
use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::handlers;
use crate::model::{NewTodoItem, StatusUpdate, TodoItem};

pub const OPENAPI_JSON_PATH: &str = "/swagger/v1/swagger.json";
pub const SWAGGER_UI_PATH: &str = "/swagger";

const SWAGGER_UI_HTML: &str = include_str!("swagger_ui.html");

#[derive(OpenApi)]
#[openapi(
    info(title = "Todo API", version = "v1"),
    paths(
        handlers::list_items,
        handlers::create_item,
        handlers::get_item,
        handlers::replace_item,
        handlers::toggle_status,
        handlers::delete_item,
    ),
    components(schemas(TodoItem, NewTodoItem, StatusUpdate, ErrorBody)),
    tags((name = "items", description = "To-do item management"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}
