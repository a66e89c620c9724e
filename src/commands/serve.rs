use std::net::SocketAddr;

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{MaybeUser, User};
use crate::controllers::paste;
use crate::views::{render, IndexTemplate, PasteTemplate};
use crate::App;

/// Cookie granting one-time permission to delete the most recently
/// created paste in this browser session. Holds the store key.
const DELETION_COOKIE: &str = "delid";

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], app.config.port));

    axum::Server::bind(&addr)
        .serve(router(app).into_make_service())
        .await?;

    Ok(())
}

pub fn router(app: App) -> Router {
    Router::new()
        .route("/", get(create_form))
        .route("/paste", post(save_paste))
        .route("/oops", post(delete_paste))
        .route("/:id", get(show_paste))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .route_layer(NormalizePathLayer::trim_trailing_slash())
        .with_state(app)
}

async fn create_form(_user: User) -> crate::ApiResult<Html<String>> {
    render(IndexTemplate)
}

#[derive(Deserialize)]
struct SaveForm {
    #[serde(default)]
    content: String,
    title: Option<String>,
    language: Option<String>,
}

async fn save_paste(
    State(mut app): State<App>,
    user: User,
    jar: CookieJar,
    Form(form): Form<SaveForm>,
) -> crate::ApiResult<impl IntoResponse> {
    let paste = paste::create(
        &mut app,
        form.content,
        none_if_blank(form.title),
        none_if_blank(form.language),
        &user.email,
    )
    .await?;

    let cookie = Cookie::build(DELETION_COOKIE, paste.key().to_owned())
        .path("/")
        .finish();

    Ok((jar.add(cookie), Redirect::to(&format!("/{}", paste.id()))))
}

async fn show_paste(
    State(mut app): State<App>,
    user: MaybeUser,
    jar: CookieJar,
    Path(id): Path<String>,
) -> crate::ApiResult<impl IntoResponse> {
    let entry = paste::fetch(&mut app, &id).await?;

    // The deletion cookie is single-use: surface it into the rendered
    // page once, then clear it.
    let delete_key = jar
        .get(DELETION_COOKIE)
        .map(|cookie| cookie.value().to_owned());
    let jar = match &delete_key {
        Some(_) => {
            let mut removal = Cookie::named(DELETION_COOKIE);
            removal.set_path("/");
            jar.remove(removal)
        }
        None => jar,
    };

    let template = PasteTemplate::for_viewer(entry, user.0.is_some(), delete_key);
    Ok((jar, render(template)?))
}

#[derive(Deserialize)]
struct DeleteForm {
    delid: Option<String>,
}

async fn delete_paste(
    State(mut app): State<App>,
    _user: User,
    Form(form): Form<DeleteForm>,
) -> crate::ApiResult<Redirect> {
    if let Some(delid) = form.delid {
        paste::delete(&mut app, &delid).await?;
    }

    // A stale or unknown key lands on the same redirect as a
    // successful delete.
    Ok(Redirect::to("/"))
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
