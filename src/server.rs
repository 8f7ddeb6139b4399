/// HTTP entry point
///
/// Serves the schema over axum: `/graphql` accepts POST and GET, with
/// `/playground`, `/schema` and `/health` alongside.

use crate::config::Config;
use crate::error::{HackernewsError, Result};
use crate::schema::{create_context, AppContext, SchemaBuilder};
use crate::store;

use async_graphql::dynamic::Schema;
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub schema: Schema,
    pub app: AppContext,
    pub playground: bool,
}

/// Open the store and build the schema described by `config`
pub async fn build_state(config: &Config) -> Result<AppState> {
    let store = store::connect(&config.database).await?;
    let mut builder = SchemaBuilder::new();
    if let Some(depth) = config.graphql.max_depth {
        builder = builder.max_depth(depth);
    }
    let schema = builder.build_schema()?;

    Ok(AppState {
        schema,
        app: AppContext::new(store).with_batch_relations(config.graphql.batch_relations),
        playground: config.graphql.playground,
    })
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/graphql", get(graphql_handler).post(graphql_handler))
        .route("/schema", get(schema_sdl))
        .route("/health", get(health_check));

    if state.playground {
        router = router.route("/playground", get(graphql_playground));
    }

    router.with_state(state).layer(CorsLayer::permissive())
}

/// Bind to `bind:port` and serve until the process stops
pub async fn start_http_server(state: AppState, bind: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| HackernewsError::Config(format!("Invalid bind address '{}': {}", bind, e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        HackernewsError::Server(format!(
            "Failed to bind to port {}: {}. Port may be in use.",
            port, e
        ))
    })?;

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| HackernewsError::Server(e.to_string()))?;

    Ok(())
}

async fn graphql_handler(State(state): State<AppState>, request: GraphQLRequest) -> GraphQLResponse {
    let request = request.into_inner().data(create_context(&state.app));
    state.schema.execute(request).await.into()
}

async fn graphql_playground() -> Html<String> {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

async fn schema_sdl(State(state): State<AppState>) -> String {
    state.schema.sdl()
}

async fn health_check() -> &'static str {
    "OK"
}
