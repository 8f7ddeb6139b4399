use hackernews::error::Result;
use hackernews::server;

/// Run the serve command to start the GraphQL server
pub async fn run(config_path: String, port: Option<u16>) -> Result<()> {
    tracing::info!("📖 Loading configuration from {}", config_path);

    let config = hackernews::config::load_config(&config_path)?;

    // CLI port wins over the config file
    let server_port = port.unwrap_or(config.server.port);

    tracing::info!(
        "🔧 Opening {:?} store (relation batching: {})",
        config.database.backend,
        config.graphql.batch_relations
    );

    let state = server::build_state(&config).await?;

    tracing::info!("✅ Schema built successfully");
    tracing::info!("🚀 GraphQL server running on http://{}:{}/graphql", config.server.bind, server_port);
    if config.graphql.playground {
        tracing::info!("📊 Playground: http://localhost:{}/playground", server_port);
    }
    tracing::info!("💡 Press Ctrl+C to stop the server");

    server::start_http_server(state, &config.server.bind, server_port).await
}
