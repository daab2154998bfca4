//! Tool pages: listing, detail, create/edit forms and their mutations.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use db::repository::{categories as category_repo, tools as tool_repo};
use db::ToolInput;
use minijinja::context;
use serde::Deserialize;
use tracing::info;

use super::{from_form, from_query, AppState, IdQuery};
use crate::error::ApiResult;
use crate::views::{self, MovedTo, View};

/// Body of `POST /update`; the tool id travels as `uid`.
#[derive(Debug, Deserialize)]
pub struct UpdateToolForm {
    pub uid: i64,
    pub name: String,
    pub category_id: i64,
    pub url: String,
    pub rating: i64,
    pub notes: String,
}

impl UpdateToolForm {
    fn into_parts(self) -> (i64, ToolInput) {
        let input = ToolInput {
            name: self.name,
            category_id: self.category_id,
            url: self.url,
            rating: self.rating,
            notes: self.notes,
        };
        (self.uid, input)
    }
}

pub async fn index(State(state): State<AppState>) -> ApiResult<View> {
    let mut conn = state.connection().await?;
    let tools = tool_repo::list_tools(&mut conn).await?;
    Ok(View::ok(views::INDEX, context! { tools }))
}

pub async fn show(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<View> {
    let IdQuery { id } = from_query(query)?;
    let mut conn = state.connection().await?;
    let tool = tool_repo::get_tool_with_category(&mut conn, id).await?;
    Ok(View::ok(views::SHOW, context! { tool }))
}

pub async fn new_form(State(state): State<AppState>) -> ApiResult<View> {
    let mut conn = state.connection().await?;
    let categories = category_repo::list_category_names(&mut conn).await?;
    Ok(View::ok(views::NEW, context! { categories }))
}

pub async fn edit_form(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<View> {
    let IdQuery { id } = from_query(query)?;
    let mut conn = state.connection().await?;
    let tool = tool_repo::get_tool(&mut conn, id).await?;
    let categories = category_repo::list_category_names(&mut conn).await?;
    Ok(View::ok(views::EDIT, context! { tool, categories }))
}

pub async fn insert(
    State(state): State<AppState>,
    form: Result<Form<ToolInput>, FormRejection>,
) -> ApiResult<MovedTo> {
    let input = from_form(form)?;
    let mut conn = state.connection().await?;
    let id = tool_repo::insert_tool(&mut conn, &input).await?;
    info!(?id, name = %input.name, "Created tool");
    Ok(MovedTo("/"))
}

pub async fn update(
    State(state): State<AppState>,
    form: Result<Form<UpdateToolForm>, FormRejection>,
) -> ApiResult<MovedTo> {
    let (id, input) = from_form(form)?.into_parts();
    let mut conn = state.connection().await?;
    let affected = tool_repo::update_tool(&mut conn, id, &input).await?;
    info!(id, affected, "Updated tool");
    Ok(MovedTo("/"))
}

pub async fn delete(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<MovedTo> {
    let IdQuery { id } = from_query(query)?;
    let mut conn = state.connection().await?;
    let affected = tool_repo::delete_tool(&mut conn, id).await?;
    info!(id, affected, "Deleted tool");
    Ok(MovedTo("/"))
}
