//! server.rs — Servidor HTTP do dashboard
//!
//! Serve a página única (dois dropdowns e um gráfico) e a API JSON que ela
//! consulta a cada mudança de seleção.

use crate::dashboard::{Dashboard, PAGE_HEADING};
use crate::figure::Figure;
use crate::types::{DropdownOption, Selection};
use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Página embutida; o título é substituído em tempo de execução.
const INDEX_HTML: &str = include_str!("static/index.html");

/// Monta o router com o dashboard compartilhado.
pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/health", get(health_handler))
        .route("/api/view", get(view_handler))
        .route("/api/rg-options", get(rg_options_handler))
        .route("/api/vm-options", get(vm_options_handler))
        .route("/api/figure", get(figure_handler))
        .layer(CorsLayer::permissive())
        .with_state(dashboard)
}

/// Sobe o servidor e bloqueia até ele terminar.
pub async fn run_server(dashboard: Dashboard, bind_address: &str) -> anyhow::Result<()> {
    let app = router(Arc::new(dashboard));
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Dashboard disponível em http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

// --- Handlers ---

/// GET / - página do dashboard.
async fn index_handler() -> Html<String> {
    Html(INDEX_HTML.replace("{{heading}}", PAGE_HEADING))
}

/// GET /api/health
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

/// GET /api/view - estado inicial da página.
async fn view_handler(State(dashboard): State<Arc<Dashboard>>) -> Response {
    let view = dashboard.initial_view();
    match figure_value(&view.figure) {
        Ok(figure) => Json(ViewResponse {
            rg_options: view.rg_options,
            vm_options: view.vm_options,
            figure,
        })
        .into_response(),
        Err(response) => response,
    }
}

#[derive(Serialize)]
struct ViewResponse {
    rg_options: Vec<DropdownOption>,
    vm_options: Vec<DropdownOption>,
    figure: serde_json::Value,
}

/// GET /api/rg-options
async fn rg_options_handler(State(dashboard): State<Arc<Dashboard>>) -> Json<Vec<DropdownOption>> {
    Json(dashboard.rg_options())
}

#[derive(Deserialize)]
struct VmOptionsQuery {
    #[serde(default)]
    rg: Option<String>,
}

/// GET /api/vm-options?rg= - VMs do RG selecionado.
async fn vm_options_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Query(query): Query<VmOptionsQuery>,
) -> Json<Vec<DropdownOption>> {
    let rg = query.rg.filter(|rg| !rg.is_empty());
    Json(dashboard.on_rg_change(rg.as_deref()))
}

/// GET /api/figure?rg=&vm= - gráfico plotly para a seleção atual.
async fn figure_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Query(selection): Query<Selection>,
) -> Response {
    let figure = dashboard.on_selection_change(&selection.normalized());
    (
        [(header::CONTENT_TYPE, "application/json")],
        figure.to_json(),
    )
        .into_response()
}

fn figure_value(figure: &Figure) -> Result<serde_json::Value, Response> {
    serde_json::from_str(&figure.to_json()).map_err(|e| {
        error!("Falha ao serializar o gráfico: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "falha ao serializar o gráfico").into_response()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::EventTable;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const SAMPLE: &str = "\
VMName,RG,OperationName,EventTimestampIST
vm1,RG1,start vm,01-01-2024 10.00
vm1,RG1,stop vm,01-01-2024 11.00
vm2,RG2,start vm,01-01-2024 08.00
vm2,RG2,stop vm,01-01-2024 12.00
";

    fn app() -> Router {
        let table = EventTable::from_reader(SAMPLE.as_bytes()).unwrap();
        router(Arc::new(Dashboard::new(table)))
    }

    async fn get_json(uri: &str) -> serde_json::Value {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        assert_eq!(get_json("/api/health").await["status"], "ok");
    }

    #[tokio::test]
    async fn index_page_has_heading_and_dropdowns() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(PAGE_HEADING));
        assert!(html.contains("rg-dropdown"));
        assert!(html.contains("vm-dropdown"));
    }

    #[tokio::test]
    async fn vm_options_follow_rg() {
        let options = get_json("/api/vm-options?rg=RG2").await;
        assert_eq!(options, serde_json::json!([{"label": "vm2", "value": "vm2"}]));

        let all = get_json("/api/vm-options?rg=").await;
        assert_eq!(all.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rg_options_list_every_group() {
        let options = get_json("/api/rg-options").await;
        assert_eq!(options.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn figure_respects_vm_filter() {
        let figure = get_json("/api/figure?vm=vm1").await;
        let data = figure["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"], "vm1 (RG1)");
    }

    #[tokio::test]
    async fn view_bundles_options_and_figure() {
        let view = get_json("/api/view").await;
        assert_eq!(view["rg_options"].as_array().unwrap().len(), 2);
        assert_eq!(view["vm_options"].as_array().unwrap().len(), 2);
        assert_eq!(view["figure"]["data"].as_array().unwrap().len(), 2);
    }
}
