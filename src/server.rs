use std::path::PathBuf;
use std::sync::Arc;

use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::{Duration, Utc};
use indexmap::IndexMap;
use log::{debug, error, info, warn};
use reqwest::Client;
use tower_http::services::ServeDir;

use crate::badge;
use crate::config::{Config, ProjectConfig};
use crate::error::Result;
use crate::models::ProviderResult;
use crate::status;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Shared, read-only state for all request handlers.
pub struct AppState {
    pub projects: IndexMap<String, ProjectConfig>,
    pub client: Client,
    pub pages_path: PathBuf,
    pub badges_path: PathBuf,
    /// `Last-Modified` value, fixed at process start.
    pub cache_since: String,
    /// `Expires` value, fixed at process start.
    pub cache_until: String,
}

impl AppState {
    pub fn new(config: &Config, projects: IndexMap<String, ProjectConfig>) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            projects,
            client: status::build_client()?,
            pages_path: PathBuf::from(&config.pages_path),
            badges_path: PathBuf::from(&config.badges_path),
            cache_since: now.format(HTTP_DATE_FORMAT).to_string(),
            cache_until: (now + Duration::seconds(60)).format(HTTP_DATE_FORMAT).to_string(),
        })
    }
}

/// Builds the service router, nested under `base_path` when one is
/// configured.
pub fn router(state: Arc<AppState>, base_path: &str) -> Router {
    let assets_dir = state.pages_path.clone();
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/{project}", get(project_page_handler))
        .route("/{project}/badge", get(project_badge_handler))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .with_state(state);

    if base_path.is_empty() {
        app
    } else {
        Router::new().nest(base_path, app)
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    projects: Vec<ProjectLink>,
}

struct ProjectLink {
    key: String,
    name: String,
}

#[derive(Template)]
#[template(path = "project.html")]
struct ProjectTemplate<'a> {
    project_name: &'a str,
    overall: &'a ProviderResult,
    providers: Vec<&'a ProviderResult>,
}

async fn root_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Request received for project list");
    let template = IndexTemplate {
        projects: state
            .projects
            .iter()
            .map(|(key, project)| ProjectLink {
                key: key.clone(),
                name: project.name.clone(),
            })
            .collect(),
    };
    render_html(&template)
}

async fn project_page_handler(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Response {
    let project = project.to_lowercase();
    debug!("Request received for project page '{project}'");

    let Some(project_config) = state.projects.get(&project) else {
        return project_not_found(&project);
    };

    let aggregation = status::aggregate(&state.client, &project_config.statuses).await;
    let template = ProjectTemplate {
        project_name: &project_config.name,
        overall: &aggregation.overall,
        providers: aggregation.per_provider.values().collect(),
    };
    render_html(&template)
}

async fn project_badge_handler(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Response {
    let project = project.to_lowercase();
    debug!("Request received for project badge '{project}'");

    let Some(project_config) = state.projects.get(&project) else {
        return project_not_found(&project);
    };

    if project_config.badge.overlays.is_empty() {
        error!("No overlays found for project '{project}'");
        return (
            StatusCode::NOT_IMPLEMENTED,
            format!("No overlays found for project '{project}'"),
        )
            .into_response();
    }
    let Some(template) = &project_config.badge.template else {
        error!("No badge template found for project '{project}'");
        return (
            StatusCode::NOT_IMPLEMENTED,
            format!("No badge template found for project '{project}'"),
        )
            .into_response();
    };

    let aggregation = status::aggregate(&state.client, &project_config.statuses).await;

    let composed = badge::compose(
        &state.badges_path,
        template,
        &project_config.badge.overlays,
        &aggregation.per_provider,
    );
    let image = match composed {
        Ok(image) => image,
        Err(e) => {
            error!("Unable to compose badge for '{project}': {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unable to compose badge: {e}"),
            )
                .into_response();
        }
    };

    let body = match badge::encode_png(&image) {
        Ok(body) => body,
        Err(e) => {
            error!("Unable to encode badge for '{project}': {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unable to encode badge: {e}"),
            )
                .into_response();
        }
    };

    info!("Badge rendered for '{project}'");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, body.len().to_string()),
            (header::CACHE_CONTROL, "no-cache, private".to_string()),
            (header::LAST_MODIFIED, state.cache_since.clone()),
            (header::EXPIRES, state.cache_until.clone()),
        ],
        body,
    )
        .into_response()
}

fn project_not_found(project: &str) -> Response {
    warn!("Project config not found for project '{project}'");
    (
        StatusCode::NOT_FOUND,
        format!("Project config not found for project '{project}'"),
    )
        .into_response()
}

fn render_html<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Unable to render template: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unable to render page: {e}"),
            )
                .into_response()
        }
    }
}
