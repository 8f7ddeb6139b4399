use hackernews::config::{Config, DatabaseConfig, GraphqlConfig, ServerConfig, StoreBackend};
use hackernews::error::Result;

/// Run the init command to generate an example configuration
pub fn run(output: Option<String>) -> Result<()> {
    let config = example_config();

    // Output to stdout or file
    if let Some(output_path) = output {
        hackernews::config::save_config(&config, &output_path)?;
        tracing::info!("📝 Generated example configuration: {}", output_path);
        tracing::info!("💡 Start the server with 'cargo run -- serve --config {}'", output_path);
    } else {
        let toml_string = toml::to_string_pretty(&config)?;
        println!("{}", toml_string);
    }

    Ok(())
}

/// SQLite on disk, seeded with the tutorial links
fn example_config() -> Config {
    Config {
        server: ServerConfig {
            port: 4000,
            bind: "0.0.0.0".to_string(),
        },
        database: DatabaseConfig {
            backend: StoreBackend::Sqlite,
            url: "sqlite://hackernews.db".to_string(),
            max_connections: 5,
            seed_example_links: true,
        },
        graphql: GraphqlConfig {
            batch_relations: false,
            playground: true,
            max_depth: Some(10),
        },
    }
}
