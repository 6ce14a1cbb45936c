use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use inkweave_core::telemetry;
use inkweave_core::wizard::{WorldBuilding, WorldBuildingRequest};
use inkweave_core::{ApiClient, ClientConfig, StreamOptions, StreamOutcome};
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "xtask", version, about = "Automation helpers for Inkweave")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a lightweight smoke test that exercises the Inkweave core
    /// against a local mock backend.
    Smoke,
}

fn main() -> Result<()> {
    telemetry::init_tracing(EnvFilter::new("info"))?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Smoke => smoke_test(),
    }
}

fn smoke_test() -> Result<()> {
    let runtime = Runtime::new()?;
    runtime.block_on(async {
        let mut server = mockito::Server::new_async().await;
        let _projects = server
            .mock("GET", "/projects")
            .with_body(
                serde_json::json!([
                    {"id": "p1", "title": "Smoke Novel", "status": "planning"}
                ])
                .to_string(),
            )
            .create_async()
            .await;
        let _world = server
            .mock("POST", "/wizard-stream/world-building")
            .with_header("content-type", "text/event-stream")
            .with_body(concat!(
                "data: {\"type\": \"progress\", \"message\": \"working\", \"progress\": 50}\n\n",
                "data: {\"type\": \"result\", \"data\": {\"project_id\": \"p1\"}}\n\n",
                "data: {\"type\": \"done\"}\n\n",
            ))
            .create_async()
            .await;

        let client = ApiClient::new(ClientConfig::new(server.url())?)?;
        let projects = client.projects().list().await?;
        info!("projects" = projects.len(), "listed projects");

        let request = WorldBuildingRequest {
            title: "Smoke Novel".to_string(),
            description: "smoke".to_string(),
            theme: "smoke".to_string(),
            genre: "test".to_string(),
            narrative_perspective: None,
            target_words: None,
            chapter_count: None,
            character_count: None,
            provider: None,
            model: None,
        };
        let summary = client
            .wizard()
            .world_building(
                &request,
                StreamOptions::new().on_complete(|world: WorldBuilding| {
                    info!("project" = %world.project_id, "world building finished");
                }),
            )
            .await;
        if summary.outcome != StreamOutcome::Completed {
            return Err(anyhow!("world building smoke run did not complete"));
        }

        info!("smoke test passed");
        Ok(())
    })
}
