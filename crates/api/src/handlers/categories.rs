//! Category pages, including the guarded delete.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use db::repository::categories as category_repo;
use db::CategoryInput;
use minijinja::context;
use serde::Deserialize;
use tracing::info;

use super::{from_form, from_query, AppState, IdQuery};
use crate::error::{ApiError, ApiResult};
use crate::views::{self, MovedTo, View};

/// Body of `POST /categories/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryForm {
    pub id: i64,
    pub name: String,
    pub description: String,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<View> {
    let mut conn = state.connection().await?;
    let categories = category_repo::list_categories(&mut conn).await?;
    Ok(View::ok(views::CATEGORIES, context! { categories }))
}

pub async fn new_form() -> View {
    View::ok(views::NEW_CATEGORY, context! {})
}

pub async fn insert(
    State(state): State<AppState>,
    form: Result<Form<CategoryInput>, FormRejection>,
) -> ApiResult<MovedTo> {
    let input = from_form(form)?;
    let mut conn = state.connection().await?;
    let id = category_repo::insert_category(&mut conn, &input).await?;
    info!(?id, name = %input.name, "Created category");
    Ok(MovedTo("/categories"))
}

pub async fn edit_form(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<View> {
    let IdQuery { id } = from_query(query)?;
    let mut conn = state.connection().await?;
    let category = category_repo::get_category(&mut conn, id).await?;
    Ok(View::ok(views::EDIT_CATEGORY, context! { category }))
}

pub async fn update(
    State(state): State<AppState>,
    form: Result<Form<UpdateCategoryForm>, FormRejection>,
) -> ApiResult<MovedTo> {
    let UpdateCategoryForm { id, name, description } = from_form(form)?;
    let mut conn = state.connection().await?;
    let affected =
        category_repo::update_category(&mut conn, id, &CategoryInput { name, description }).await?;
    info!(id, affected, "Updated category");
    Ok(MovedTo("/categories"))
}

/// Delete a category only when no tool references it.
///
/// Count and delete run on the same connection but not in a transaction; a
/// tool inserted between the two statements can still be orphaned.
pub async fn delete(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<MovedTo> {
    let IdQuery { id } = from_query(query)?;
    let mut conn = state.connection().await?;

    let tools = category_repo::count_tools_in_category(&mut conn, id).await?;
    if tools > 0 {
        return Err(ApiError::CategoryInUse { category_id: id, tools });
    }

    let affected = category_repo::delete_category(&mut conn, id).await?;
    info!(id, affected, "Deleted category");
    Ok(MovedTo("/categories"))
}
