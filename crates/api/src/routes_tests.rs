//! Route-level tests driving the router in-process with `oneshot`.
//!
//! Every test gets a fresh in-memory SQLite database with the inventory
//! schema, so no MySQL server is required.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use db::repository::{categories as category_repo, tools as tool_repo};
use db::test_support::memory_pool;
use db::{Category, CategoryInput, DbPool, Tool, ToolInput};
use tower::ServiceExt;

use crate::{router, AppState};

async fn setup() -> (Router, DbPool) {
    let pool = memory_pool().await.unwrap();
    let app = router(AppState::new(pool.clone()), Duration::from_secs(5));
    (app, pool)
}

async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

// The pool holds a single connection; each helper returns it before the
// next request goes through the router.

async fn categories_in(pool: &DbPool) -> Vec<Category> {
    let mut conn = db::pool::acquire(pool).await.unwrap();
    category_repo::list_categories(&mut conn).await.unwrap()
}

async fn tools_in(pool: &DbPool) -> Vec<Tool> {
    let mut conn = db::pool::acquire(pool).await.unwrap();
    tool_repo::list_tools(&mut conn).await.unwrap()
}

async fn seed_category(pool: &DbPool, name: &str) -> i64 {
    let mut conn = db::pool::acquire(pool).await.unwrap();
    let input = CategoryInput { name: name.into(), description: format!("{name} things") };
    category_repo::insert_category(&mut conn, &input).await.unwrap().unwrap()
}

async fn seed_tool(pool: &DbPool, name: &str, category_id: i64) -> i64 {
    let mut conn = db::pool::acquire(pool).await.unwrap();
    let input = ToolInput {
        name: name.into(),
        category_id,
        url: format!("{}.example", name.to_lowercase()),
        rating: 3,
        notes: String::new(),
    };
    tool_repo::insert_tool(&mut conn, &input).await.unwrap().unwrap()
}

// ============================================================
// End-to-end scenario
// ============================================================

#[tokio::test]
async fn category_guard_scenario() {
    let (app, pool) = setup().await;

    let response = post_form(&app, "/categories/insert", "name=Editors&description=Text+editors").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/categories");

    let editors = categories_in(&pool).await;
    assert_eq!(editors.len(), 1);
    let editors_id = editors[0].id;
    assert_eq!(editors[0].description, "Text editors");

    let body = format!("name=Vim&category_id={editors_id}&url=vim.org&rating=5&notes=modal");
    let response = post_form(&app, "/insert", &body).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/");

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Vim"));
    assert!(page.contains("Editors"));

    let response = get(&app, &format!("/categories/delete?id={editors_id}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Cannot delete category that is in use by tools"));
    assert_eq!(categories_in(&pool).await.len(), 1);
    let tools = tools_in(&pool).await;
    assert_eq!(tools.len(), 1);

    let response = get(&app, &format!("/delete?id={}", tools[0].id)).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/");

    let response = get(&app, &format!("/categories/delete?id={editors_id}")).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/categories");

    let page = body_text(get(&app, "/categories").await).await;
    assert!(!page.contains("Editors"));
    assert!(categories_in(&pool).await.is_empty());
}

// ============================================================
// Tool routes
// ============================================================

#[tokio::test]
async fn index_renders_empty_listing() {
    let (app, _pool) = setup().await;
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No tools yet."));
}

#[tokio::test]
async fn show_renders_tool_with_category_name() {
    let (app, pool) = setup().await;
    let shells = seed_category(&pool, "Shells").await;
    let fish = seed_tool(&pool, "Fish", shells).await;

    let response = get(&app, &format!("/show?id={fish}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Fish"));
    assert!(page.contains("Shells"));
}

#[tokio::test]
async fn show_of_unknown_tool_is_an_error_view() {
    let (app, _pool) = setup().await;
    let response = get(&app, "/show?id=404").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("row not found"));
}

#[tokio::test]
async fn new_form_offers_category_dropdown() {
    let (app, pool) = setup().await;
    let editors = seed_category(&pool, "Editors").await;

    let page = body_text(get(&app, "/new").await).await;
    assert!(page.contains(&format!("<option value=\"{editors}\">Editors</option>")));
}

#[tokio::test]
async fn edit_form_preselects_current_category() {
    let (app, pool) = setup().await;
    let editors = seed_category(&pool, "Editors").await;
    let shells = seed_category(&pool, "Shells").await;
    let fish = seed_tool(&pool, "Fish", shells).await;

    let response = get(&app, &format!("/edit?id={fish}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains(&format!("name=\"uid\" value=\"{fish}\"")));
    assert!(page.contains(&format!("<option value=\"{shells}\" selected>Shells</option>")));
    assert!(page.contains(&format!("<option value=\"{editors}\">Editors</option>")));
}

#[tokio::test]
async fn update_rewrites_only_the_target_tool() {
    let (app, pool) = setup().await;
    let editors = seed_category(&pool, "Editors").await;
    let shells = seed_category(&pool, "Shells").await;
    let target = seed_tool(&pool, "Vim", editors).await;
    let bystander = seed_tool(&pool, "Emacs", editors).await;

    let body = format!("uid={target}&name=Fish&category_id={shells}&url=fishshell.com&rating=4&notes=friendly");
    let response = post_form(&app, "/update", &body).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/");

    let tools = tools_in(&pool).await;
    let updated = tools.iter().find(|t| t.id == target).unwrap();
    assert_eq!(updated.name, "Fish");
    assert_eq!(updated.category.name, "Shells");
    assert_eq!(updated.rating, 4);
    assert_eq!(updated.notes, "friendly");
    let untouched = tools.iter().find(|t| t.id == bystander).unwrap();
    assert_eq!(untouched.name, "Emacs");
    assert_eq!(untouched.category_id, editors);
}

#[tokio::test]
async fn non_numeric_rating_is_a_bad_request() {
    let (app, pool) = setup().await;
    let editors = seed_category(&pool, "Editors").await;

    let body = format!("name=Vim&category_id={editors}&url=vim.org&rating=great&notes=");
    let response = post_form(&app, "/insert", &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(tools_in(&pool).await.is_empty());
}

#[tokio::test]
async fn missing_id_is_a_bad_request() {
    let (app, _pool) = setup().await;
    let response = get(&app, "/edit").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Something went wrong"));
}

// ============================================================
// Category routes
// ============================================================

#[tokio::test]
async fn category_forms_render() {
    let (app, pool) = setup().await;
    let response = get(&app, "/categories/new").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("action=\"/categories/insert\""));

    let editors = seed_category(&pool, "Editors").await;
    let response = get(&app, &format!("/categories/edit?id={editors}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Editors things"));
    assert!(page.contains(&format!("name=\"id\" value=\"{editors}\"")));
}

#[tokio::test]
async fn category_update_is_reflected_in_tool_listing() {
    let (app, pool) = setup().await;
    let editors = seed_category(&pool, "Editors").await;
    seed_tool(&pool, "Vim", editors).await;

    let body = format!("id={editors}&name=Modal+editors&description=hjkl");
    let response = post_form(&app, "/categories/update", &body).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/categories");

    let tools = tools_in(&pool).await;
    assert_eq!(tools[0].category.name, "Modal editors");
    assert_eq!(tools[0].category.description, "hjkl");
}

#[tokio::test]
async fn categories_are_listed_by_name() {
    let (app, pool) = setup().await;
    seed_category(&pool, "Terminals").await;
    seed_category(&pool, "Editors").await;

    let page = body_text(get(&app, "/categories").await).await;
    let editors = page.find("Editors").unwrap();
    let terminals = page.find("Terminals").unwrap();
    assert!(editors < terminals);
}

// ============================================================
// Connection failures
// ============================================================

#[tokio::test]
async fn unreachable_database_renders_connection_error() {
    sqlx::any::install_default_drivers();
    let pool = sqlx::any::AnyPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("sqlite:/nonexistent/dir/inventory.db?mode=ro")
        .unwrap();
    let app = router(AppState::new(pool), Duration::from_secs(5));

    let response = get(&app, "/categories").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("Unable to connect to database"));

    // Routes without a database call still work.
    assert_eq!(get(&app, "/categories/new").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn slow_request_is_cut_off_with_error_view() {
    let pool = memory_pool().await.unwrap();
    let app = router(AppState::new(pool.clone()), Duration::from_millis(100));

    // Holding the pool's only connection leaves the handler waiting on acquire.
    let _held = db::pool::acquire(&pool).await.unwrap();

    let response = get(&app, "/categories").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("Request timed out"));
}
