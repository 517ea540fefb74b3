//! HTTP side of the dashboard: the page and the two endpoints behind it.
//!
//! The server keeps no state between requests. Each request rebuilds the
//! dashboard from the shared table and the selection sent by the page.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Json};
use axum::routing::{get, post};
use axum::Router;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use constituency_shares::dashboard::Dashboard;
use constituency_shares::figure::Figure;
use constituency_shares::{ChartRules, ConstituencyOption, ProjectionTable};

use crate::dash::*;

pub const PAGE_TITLE: &str = "2024 UK Election - Projected Vote Shares";

static INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Read-only context shared by all the handlers.
#[derive(Clone)]
pub struct AppContext {
    pub table: Arc<ProjectionTable>,
    pub rules: ChartRules,
}

pub type AppState = State<AppContext>;

/// A change made on the page.
///
/// Without `constituencies`, the regions changed and the default
/// constituencies apply. With it, only the constituencies changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub regions: Vec<String>,
    #[serde(default)]
    pub constituencies: Option<Vec<String>>,
}

/// Everything the page needs to draw itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub title: String,
    pub regions: Vec<String>,
    pub selected_regions: Vec<String>,
    pub options: Vec<ConstituencyOption>,
    pub selected_constituencies: Vec<String>,
    pub figure: Figure,
}

impl DashboardView {
    fn from_dashboard(d: &Dashboard) -> DashboardView {
        DashboardView {
            title: PAGE_TITLE.to_string(),
            regions: d.regions(),
            selected_regions: d.selected_regions().to_vec(),
            options: d.options().to_vec(),
            selected_constituencies: d.selected_constituencies().to_vec(),
            figure: d.figure().clone(),
        }
    }
}

pub fn router(table: Arc<ProjectionTable>, rules: ChartRules) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/api/state", get(handle_state))
        .route("/api/update", post(handle_update))
        .with_state(AppContext { table, rules })
}

pub async fn serve(
    table: Arc<ProjectionTable>,
    rules: ChartRules,
    addr: SocketAddr,
) -> DashResult<()> {
    let app = router(table, rules);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(BindingSnafu { addr })?;
    info!("Dashboard available at http://{}/", addr);
    axum::serve(listener, app).await.context(ServingSnafu {})
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_state(State(ctx): AppState) -> Json<DashboardView> {
    let d = Dashboard::new(ctx.table.clone(), &ctx.rules);
    debug!(
        "handle_state: {} options, selected: {:?}",
        d.options().len(),
        d.selected_constituencies()
    );
    Json(DashboardView::from_dashboard(&d))
}

async fn handle_update(
    State(ctx): AppState,
    Json(req): Json<UpdateRequest>,
) -> Json<DashboardView> {
    let d = match req.constituencies.as_ref() {
        Some(ids) => Dashboard::with_selection(ctx.table.clone(), &ctx.rules, &req.regions, ids),
        None => Dashboard::with_regions(ctx.table.clone(), &ctx.rules, &req.regions),
    };
    debug!(
        "handle_update: regions: {:?} constituencies: {:?}",
        req.regions, req.constituencies
    );
    Json(DashboardView::from_dashboard(&d))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use constituency_shares::builder::Builder;
    use tower::ServiceExt;

    fn table() -> Arc<ProjectionTable> {
        let mut b = Builder::new();
        b.add_row_simple("London", "Hackney South", "E1", &[8.0, 55.5, 4.0, 22.0, 7.5]);
        b.add_row_simple("Wales", "Cardiff East", "W1", &[12.1, 41.0, 9.2, 15.0, 17.3]);
        b.add_row_simple("London", "Richmond Park", "E2", &[25.0, 10.0, 48.0, 8.0, 9.0]);
        Arc::new(b.build())
    }

    fn app() -> Router {
        router(table(), ChartRules::DEFAULT_RULES)
    }

    async fn read_view(resp: axum::response::Response) -> DashboardView {
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn update(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/update")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn index_page() {
        let resp = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains(PAGE_TITLE));
        assert!(page.contains("region-dropdown"));
        assert!(page.contains("const-dropdown"));
    }

    #[tokio::test]
    async fn initial_state() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/api/state")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let view = read_view(resp).await;
        assert_eq!(view.regions, vec!["London", "Wales"]);
        assert_eq!(view.selected_regions, vec!["London", "Wales"]);
        assert_eq!(view.selected_constituencies, vec!["E1", "W1", "E2"]);
        assert_eq!(view.figure.bar_count(), 15);
        assert_eq!(view.figure.annotation_count(), 3);
    }

    #[tokio::test]
    async fn region_change() {
        let resp = app()
            .oneshot(update(r#"{"regions": ["London"]}"#))
            .await
            .unwrap();
        let view = read_view(resp).await;
        let values: Vec<String> = view.options.iter().map(|o| o.value.clone()).collect();
        assert_eq!(values, vec!["E1", "E2"]);
        assert_eq!(view.selected_constituencies, vec!["E1", "E2"]);
        assert_eq!(view.figure.bar_count(), 10);
    }

    #[tokio::test]
    async fn constituency_change() {
        let resp = app()
            .oneshot(update(
                r#"{"regions": ["London", "Wales"], "constituencies": ["E2", "missing"]}"#,
            ))
            .await
            .unwrap();
        let view = read_view(resp).await;
        assert_eq!(view.options.len(), 3);
        assert_eq!(view.selected_constituencies, vec!["E2", "missing"]);
        assert_eq!(view.figure.bar_count(), 5);
        assert_eq!(view.figure.layout.annotations[0].text, "LibDem Wins");
    }

    #[tokio::test]
    async fn constituency_change_keeps_region_options() {
        let resp = app()
            .oneshot(update(
                r#"{"regions": ["Wales"], "constituencies": ["E1", "W1"]}"#,
            ))
            .await
            .unwrap();
        let view = read_view(resp).await;
        assert_eq!(view.selected_regions, vec!["Wales"]);
        let values: Vec<String> = view.options.iter().map(|o| o.value.clone()).collect();
        assert_eq!(values, vec!["W1"]);
        assert_eq!(view.selected_constituencies, vec!["E1", "W1"]);
        assert_eq!(view.figure.bar_count(), 10);
        assert_eq!(view.figure.data[0].x, vec!["Hackney South", "Cardiff East"]);
    }

    #[tokio::test]
    async fn no_region() {
        let resp = app().oneshot(update(r#"{"regions": []}"#)).await.unwrap();
        let view = read_view(resp).await;
        assert!(view.options.is_empty());
        assert!(view.selected_constituencies.is_empty());
        assert_eq!(view.figure.bar_count(), 0);
        assert_eq!(view.figure.annotation_count(), 0);
    }

    #[tokio::test]
    async fn malformed_update() {
        let resp = app().oneshot(update(r#"{"regions": 3}"#)).await.unwrap();
        assert!(resp.status().is_client_error());
    }
}
