//! HTTP server: shared state, router and the JSON handlers.
//!
//! Handlers stay thin. They authenticate through [`AuthUser`], validate the
//! body, and hand off to the contacts, enrichment and network modules.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AuthUser;
use crate::config::AgaryConfig;
use crate::contacts::{store, Contact, ContactPatch, NewContact};
use crate::db::{self, SharedDb};
use crate::enrichment::{self, DiscoveryRequest, DiscoveryResponse, EnrichRequest, EnrichResponse};
use crate::error::AgaryError;
use crate::network::{self, AskRequest, AskResponse};
use crate::providers::{self, AssistantProvider, ResearchProvider};

/// Everything a handler needs, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: SharedDb,
    pub research: Arc<dyn ResearchProvider>,
    pub assistant: Option<Arc<dyn AssistantProvider>>,
    pub config: Arc<AgaryConfig>,
}

impl FromRef<AppState> for SharedDb {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.db)
    }
}

/// Open the database and build the providers from config.
pub fn build_state(config: AgaryConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    if let Ok(Some(stored)) = db::migrations::get_embedding_model(&conn) {
        if stored != config.assistant.embedding_model {
            tracing::warn!(
                stored = %stored,
                configured = %config.assistant.embedding_model,
                "embedding model changed; stored vectors may not be comparable"
            );
        }
    }

    let research = providers::create_research_provider(&config.research)?;
    let assistant = providers::create_assistant_provider(&config.assistant)?;

    Ok(AppState {
        db: db::shared(conn),
        research,
        assistant,
        config: Arc::new(config),
    })
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/enrich-contact", post(enrich_contact))
        .route("/discover-candidates", post(discover_candidates))
        .route("/ask-network", post(ask_network))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/{id}",
            get(get_contact).patch(update_contact).delete(delete_contact),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: AgaryConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let state = build_state(config)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "agary listening at http://{bind_addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn enrich_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<EnrichRequest>,
) -> Result<Json<EnrichResponse>, AgaryError> {
    let response = enrichment::enrich_contact(
        &state.db,
        state.research.as_ref(),
        &state.config.enrichment,
        &user.id,
        request,
    )
    .await?;
    Ok(Json(response))
}

async fn discover_candidates(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<DiscoveryRequest>,
) -> Result<Json<DiscoveryResponse>, AgaryError> {
    tracing::debug!(user_id = %user.id, "candidate discovery requested");
    let response = enrichment::discover_candidates(
        state.research.as_ref(),
        state.config.enrichment.max_candidates,
        request,
    )
    .await?;
    Ok(Json(response))
}

async fn ask_network(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AgaryError> {
    let response = network::ask_network(
        &state.db,
        state.assistant.as_deref(),
        &state.config.network,
        &user.id,
        request,
    )
    .await?;
    Ok(Json(response))
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(default, alias = "search")]
    q: Option<String>,
}

#[derive(Serialize)]
struct ContactList {
    contacts: Vec<Contact>,
}

async fn list_contacts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ContactList>, AgaryError> {
    let contacts = db::with_conn(&state.db, move |conn| {
        store::list_contacts(conn, &user.id, params.q.as_deref())
    })
    .await
    .map_err(|e| AgaryError::internal("Failed to list contacts", e))?;
    Ok(Json(ContactList { contacts }))
}

async fn create_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(new): Json<NewContact>,
) -> Result<(StatusCode, Json<Contact>), AgaryError> {
    if new.first_name.trim().is_empty() || new.last_name.trim().is_empty() {
        return Err(AgaryError::validation("First name and last name are required"));
    }
    let contact = db::with_conn(&state.db, move |conn| store::insert_contact(conn, &user.id, &new))
        .await
        .map_err(|e| AgaryError::internal("Failed to create contact", e))?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn get_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Contact>, AgaryError> {
    db::with_conn(&state.db, move |conn| store::get_contact(conn, &user.id, &id))
        .await
        .map_err(|e| AgaryError::internal("Failed to load contact", e))?
        .map(Json)
        .ok_or_else(contact_not_found)
}

async fn update_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(patch): Json<ContactPatch>,
) -> Result<Json<Contact>, AgaryError> {
    let blank = |name: &Option<String>| name.as_deref().is_some_and(|n| n.trim().is_empty());
    if blank(&patch.first_name) || blank(&patch.last_name) {
        return Err(AgaryError::validation("First name and last name cannot be empty"));
    }

    db::with_conn(&state.db, move |conn| store::update_contact(conn, &user.id, &id, &patch))
        .await
        .map_err(|e| AgaryError::internal("Failed to update contact", e))?
        .map(Json)
        .ok_or_else(contact_not_found)
}

async fn delete_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AgaryError> {
    let deleted = db::with_conn(&state.db, move |conn| store::delete_contact(conn, &user.id, &id))
        .await
        .map_err(|e| AgaryError::internal("Failed to delete contact", e))?;
    if !deleted {
        return Err(contact_not_found());
    }
    Ok(Json(json!({ "success": true })))
}

fn contact_not_found() -> AgaryError {
    AgaryError::not_found("Contact not found")
}
