//! HTTP API Server
//!
//! REST endpoints for the browser front-end. Each handler is a thin wrapper
//! over one [`Session`] action; failures render through the crate error's
//! `IntoResponse`.

use anyhow::Result as AnyResult;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::generator::RecipeRequest;
use crate::marketplace::ListingFilter;
use crate::models::{CollectibleListing, Recipe, UserProfile};
use crate::session::{GeneratedRecipe, Session};

/// Shared application state
pub struct AppState {
    pub session: Arc<Session>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response for list endpoints
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

/// Build the router over a session
pub fn router(session: Arc<Session>, cors_enabled: bool) -> Router {
    let state = Arc::new(AppState { session });

    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Profile
        .route("/api/v1/profile", get(get_profile))
        // Recipes
        .route("/api/v1/recipes", get(list_recipes).post(save_recipe))
        .route("/api/v1/recipes/generate", post(generate_recipe))
        // Collectibles
        .route("/api/v1/collectibles", get(list_owned))
        .route("/api/v1/collectibles/mint", post(mint_collectible))
        .route("/api/v1/marketplace", get(list_marketplace))
        .route("/api/v1/marketplace/:listing_id/purchase", post(purchase))
        // Rewards
        .route("/api/v1/rewards/daily", post(claim_daily))
        .route("/api/v1/rewards/challenge", post(complete_challenge))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app.layer(cors)
    } else {
        app
    }
}

/// Start the API server
pub async fn start_server(
    session: Arc<Session>,
    host: &str,
    port: u16,
    cors_enabled: bool,
) -> AnyResult<()> {
    let app = router(session, cors_enabled);

    let addr = format!("{}:{}", host, port);
    info!("🚀 Starting RemixCuisine API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<UserProfile>> {
    Ok(Json(state.session.profile().await?))
}

async fn list_recipes(State(state): State<Arc<AppState>>) -> Result<Json<ListResponse<Recipe>>> {
    Ok(Json(state.session.recipes().await?.into()))
}

/// Generate a recipe (+10 tokens). The recipe is returned, not saved.
async fn generate_recipe(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<Json<GeneratedRecipe>> {
    let Json(request) = payload?;
    Ok(Json(state.session.generate_recipe(&request).await?))
}

/// Save a recipe (+5 tokens)
async fn save_recipe(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Recipe>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let Json(recipe) = payload?;
    let profile = state.session.save_recipe(recipe).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Mint a recipe as a collectible (+25 tokens)
async fn mint_collectible(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Recipe>, JsonRejection>,
) -> Result<Json<UserProfile>> {
    let Json(recipe) = payload?;
    Ok(Json(state.session.mint_collectible(&recipe).await?))
}

async fn list_owned(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListResponse<CollectibleListing>>> {
    Ok(Json(state.session.owned_collectibles().await?.into()))
}

async fn list_marketplace(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<ListResponse<CollectibleListing>>> {
    Ok(Json(state.session.marketplace(&filter).await?.into()))
}

async fn purchase(
    State(state): State<Arc<AppState>>,
    listing_id: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<UserProfile>> {
    let Path(listing_id) = listing_id?;
    Ok(Json(state.session.purchase(listing_id).await?))
}

/// Claim the daily reward (+20 tokens, once per day)
async fn claim_daily(State(state): State<Arc<AppState>>) -> Result<Json<UserProfile>> {
    Ok(Json(state.session.claim_daily().await?))
}

/// Complete a challenge (+50 tokens)
async fn complete_challenge(State(state): State<Arc<AppState>>) -> Result<Json<UserProfile>> {
    Ok(Json(state.session.complete_challenge().await?))
}
