use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chainhook_manager_client::registry::{ChainhookRegistry, ChainhookRegistryClient};
use chainhook_manager_client::stacks_node::ContractInterfaceResolver;
use chainhook_manager_client::utils::Context;
use chainhook_manager_client::{try_error, try_info};
use chainhook_manager_types::{
    ChainhookDefinition, ChainhookPagination, StacksNetwork, MAX_CHAINHOOKS_PAGE_LIMIT,
};
use hiro_system_kit::slog;
use serde_json::Value as JsonValue;

use crate::config::Config;

// Shared state for the HTTP facade. Collaborator handles are immutable;
// nothing here survives a request.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn ChainhookRegistry + Send + Sync>,
    pub contracts: Arc<dyn ContractInterfaceResolver + Send + Sync>,
    pub default_network: StacksNetwork,
    pub ctx: Context,
}

fn success_response(data: JsonValue) -> Result<Json<JsonValue>, (StatusCode, Json<JsonValue>)> {
    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}

fn error_response(
    message: String,
    ctx: &Context,
) -> Result<Json<JsonValue>, (StatusCode, Json<JsonValue>)> {
    try_error!(ctx, "{message}");
    Err((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": message,
        })),
    ))
}

#[derive(Deserialize)]
pub struct PageQuery {
    offset: Option<i64>,
    limit: Option<i64>,
}

pub async fn handle_list_chainhooks(
    Extension(app_state): Extension<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<JsonValue>, (StatusCode, Json<JsonValue>)> {
    let AppState { registry, ctx, .. } = app_state;
    try_info!(ctx, "GET /api/chainhooks");

    // The page is bounded at this boundary even though the registry client
    // clamps again before sending.
    let (offset, limit) = ChainhookPagination::new(
        page.offset.unwrap_or(0),
        page.limit.unwrap_or(MAX_CHAINHOOKS_PAGE_LIMIT as i64),
    )
    .clamped();
    let pagination = ChainhookPagination::new(offset as i64, limit as i64);

    match registry.list(&pagination).await {
        Ok(chainhooks) => success_response(json!(chainhooks)),
        Err(e) => error_response(format!("unable to list chainhooks: {}", e), &ctx),
    }
}

pub async fn handle_register_chainhook(
    Extension(app_state): Extension<AppState>,
    Json(definition): Json<ChainhookDefinition>,
) -> Result<Json<JsonValue>, (StatusCode, Json<JsonValue>)> {
    let AppState { registry, ctx, .. } = app_state;
    try_info!(ctx, "POST /api/chainhooks");

    match registry.register(&definition).await {
        Ok(registered) => success_response(json!(registered)),
        Err(e) => error_response(format!("unable to register chainhook: {}", e), &ctx),
    }
}

pub async fn handle_get_chainhook(
    Extension(app_state): Extension<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<JsonValue>, (StatusCode, Json<JsonValue>)> {
    let AppState { registry, ctx, .. } = app_state;
    try_info!(ctx, "GET /api/chainhooks/{}", uuid);

    match registry.get(&uuid).await {
        Ok(chainhook) => success_response(json!(chainhook)),
        Err(e) => error_response(format!("unable to retrieve chainhook: {}", e), &ctx),
    }
}

pub async fn handle_delete_chainhook(
    Extension(app_state): Extension<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<JsonValue>, (StatusCode, Json<JsonValue>)> {
    let AppState { registry, ctx, .. } = app_state;
    try_info!(ctx, "DELETE /api/chainhooks/{}", uuid);

    // A uuid already deleted remotely surfaces as an error so the UI can
    // tell the operator, rather than pretending the delete happened twice.
    match registry.delete(&uuid).await {
        Ok(()) => success_response(json!({ "uuid": uuid })),
        Err(e) => error_response(format!("unable to delete chainhook: {}", e), &ctx),
    }
}

#[derive(Deserialize)]
pub struct InterfaceQuery {
    network: Option<String>,
}

pub async fn handle_get_contract_interface(
    Extension(app_state): Extension<AppState>,
    Path((address, contract_name)): Path<(String, String)>,
    Query(query): Query<InterfaceQuery>,
) -> Result<Json<JsonValue>, (StatusCode, Json<JsonValue>)> {
    let AppState {
        contracts,
        default_network,
        ctx,
        ..
    } = app_state;
    try_info!(ctx, "GET /api/contracts/{}.{}/interface", address, contract_name);

    let network = match &query.network {
        Some(value) => match StacksNetwork::from_str(value) {
            Ok(network) => network,
            Err(_) => {
                return error_response(format!("unsupported stacks network '{}'", value), &ctx)
            }
        },
        None => default_network,
    };

    match contracts
        .resolve_callable_functions(&network, &address, &contract_name)
        .await
    {
        Ok(functions) => success_response(json!(functions)),
        Err(e) => error_response(
            format!("unable to resolve contract interface: {}", e),
            &ctx,
        ),
    }
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/chainhooks",
            get(handle_list_chainhooks).post(handle_register_chainhook),
        )
        .route(
            "/api/chainhooks/{uuid}",
            get(handle_get_chainhook).delete(handle_delete_chainhook),
        )
        .route(
            "/api/contracts/{address}/{contract_name}/interface",
            get(handle_get_contract_interface),
        )
        .layer(Extension(app_state))
}

pub async fn start_service(config: &Config, ctx: &Context) -> Result<(), String> {
    let registry =
        ChainhookRegistryClient::new(&config.registry_base_url, &config.api_key)
            .map_err(|e| e.to_string())?;
    let app_state = AppState {
        registry: Arc::new(registry),
        contracts: Arc::new(config.stacks_node_rpc()),
        default_network: config.network,
        ctx: ctx.clone(),
    };
    let router = build_router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("unable to bind {}: {}", addr, e))?;
    try_info!(ctx, "Chainhook manager service running on http://{}", addr);
    axum::serve(listener, router)
        .await
        .map_err(|e| format!("service error: {}", e))
}
