use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use inkweave_core::projects::ProjectCreate;
use inkweave_core::styles::{WritingStyleCreate, WritingStyleUpdate};
use inkweave_core::telemetry;
use inkweave_core::wizard::WorldBuildingRequest;
use inkweave_core::{ApiClient, ClientConfig, StreamNotice, StreamOptions, StreamOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inkweave", version, about = "Console for the Inkweave novel-writing backend")]
struct Cli {
    /// Backend base URL; overrides inkweave.yaml.
    #[arg(long, env = "INKWEAVE_BASE_URL")]
    base_url: Option<String>,
    /// Account for commands that need a session.
    #[arg(long, env = "INKWEAVE_USERNAME")]
    username: Option<String>,
    #[arg(long, env = "INKWEAVE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify credentials against the backend.
    Login,
    /// End the current session.
    Logout,
    /// Show the signed-in account.
    Whoami,
    #[command(subcommand)]
    Projects(ProjectsCommand),
    #[command(subcommand)]
    Styles(StylesCommand),
    /// Run the world-building wizard step, streaming progress.
    WizardWorld {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        theme: String,
        #[arg(long)]
        genre: String,
        #[arg(long)]
        chapters: Option<u32>,
        #[arg(long)]
        characters: Option<u32>,
    },
    /// Polish a passage of prose.
    Polish {
        text: String,
        #[arg(long)]
        style_id: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectsCommand {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        genre: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Download the chapter export to a local file.
    Export {
        id: String,
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum StylesCommand {
    List {
        project: String,
    },
    Create {
        #[arg(long)]
        project: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        #[arg(long)]
        project: String,
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
    },
    Delete {
        #[arg(long)]
        project: String,
        id: i64,
    },
    SetDefault {
        #[arg(long)]
        project: String,
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing(EnvFilter::from_default_env())?;
    let cli = Cli::parse();

    let config = match &cli.base_url {
        Some(base_url) => ClientConfig::new(base_url).map_err(|err| anyhow!(err.user_message()))?,
        None => ClientConfig::load().map_err(|err| anyhow!(err.user_message()))?,
    };
    let client = ApiClient::new(config)
        .map_err(|err| anyhow!(err.user_message()))?
        .on_session_expired(|| {
            eprintln!("session expired, sign in again with `inkweave login`");
        });

    // The session lives in a cookie, so every command signs in within the
    // same process.
    sign_in(&client, &cli).await?;
    if matches!(cli.command, Command::Login) {
        println!("signed in");
        return Ok(());
    }

    run(&client, cli.command).await
}

async fn sign_in(client: &ApiClient, cli: &Cli) -> Result<()> {
    let (Some(username), Some(password)) = (&cli.username, &cli.password) else {
        return Err(anyhow!(
            "set --username/--password or INKWEAVE_USERNAME/INKWEAVE_PASSWORD"
        ));
    };
    let response = client.auth().local_login(username, password).await?;
    if !response.success {
        return Err(anyhow!(response.message));
    }
    Ok(())
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        // Handled in main before dispatch.
        Command::Login => {}
        Command::Logout => {
            let response = client.auth().logout().await?;
            println!("{}", response.message);
        }
        Command::Whoami => {
            let user = client.auth().current_user().await?;
            let display = user.display_name.as_deref().unwrap_or(&user.username);
            println!("{display} ({})", user.user_id);
        }
        Command::Projects(command) => run_projects(client, command).await?,
        Command::Styles(command) => run_styles(client, command).await?,
        Command::WizardWorld {
            title,
            description,
            theme,
            genre,
            chapters,
            characters,
        } => {
            let request = WorldBuildingRequest {
                title,
                description,
                theme,
                genre,
                narrative_perspective: None,
                target_words: None,
                chapter_count: chapters,
                character_count: characters,
                provider: None,
                model: None,
            };
            run_world_building(client, &request).await?;
        }
        Command::Polish { text, style_id } => {
            let response = client
                .polish()
                .text(&inkweave_core::polish::PolishTextRequest {
                    text,
                    style_id,
                    requirements: None,
                    provider: None,
                    model: None,
                })
                .await?;
            println!("{}", response.polished_text);
        }
    }
    Ok(())
}

async fn run_projects(client: &ApiClient, command: ProjectsCommand) -> Result<()> {
    match command {
        ProjectsCommand::List => {
            for project in client.projects().list().await? {
                let status = project.status.as_deref().unwrap_or("unknown");
                println!("{}  {}  [{status}]", project.id, project.title);
            }
        }
        ProjectsCommand::Create {
            title,
            description,
            theme,
            genre,
        } => {
            let project = client
                .projects()
                .create(&ProjectCreate {
                    title,
                    description,
                    theme,
                    genre,
                    ..ProjectCreate::default()
                })
                .await?;
            println!("created project {}", project.id);
        }
        ProjectsCommand::Delete { id } => {
            client.projects().delete(&id).await?;
            println!("deleted {id}");
        }
        ProjectsCommand::Export { id, out } => {
            let written = client.projects().export(&id, &out).await?;
            println!("wrote {written} bytes to {}", out.display());
        }
    }
    Ok(())
}

async fn run_styles(client: &ApiClient, command: StylesCommand) -> Result<()> {
    match command {
        StylesCommand::List { project } => {
            let catalog = client.styles().for_project(&project).await?;
            for style in catalog.styles() {
                let kind = if style.is_preset() { "preset" } else { "custom" };
                let marker = if style.is_default { " (default)" } else { "" };
                println!("{:>4}  {:<24} {kind}{marker}", style.id, style.name);
            }
        }
        StylesCommand::Create {
            project,
            name,
            prompt,
            description,
        } => {
            let style = client
                .styles()
                .create(&WritingStyleCreate {
                    project_id: project,
                    name: Some(name),
                    prompt_content: Some(prompt),
                    description,
                    ..WritingStyleCreate::default()
                })
                .await?;
            println!("created style {} ({})", style.id, style.name);
        }
        StylesCommand::Update {
            project,
            id,
            name,
            prompt,
        } => {
            let catalog = client.styles().for_project(&project).await?;
            let style = catalog
                .ensure_editable(id)
                .map_err(|err| anyhow!(err.user_message()))?;
            let updated = client
                .styles()
                .update(
                    style,
                    &WritingStyleUpdate {
                        name,
                        prompt_content: prompt,
                        ..WritingStyleUpdate::default()
                    },
                )
                .await?;
            println!("updated style {}", updated.id);
        }
        StylesCommand::Delete { project, id } => {
            let catalog = client.styles().for_project(&project).await?;
            client.styles().delete(&catalog, id).await?;
            println!("deleted style {id}");
        }
        StylesCommand::SetDefault { project, id } => {
            let response = client.styles().set_default(id, &project).await?;
            println!("{}", response.message);
        }
    }
    Ok(())
}

async fn run_world_building(client: &ApiClient, request: &WorldBuildingRequest) -> Result<()> {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(std::sync::Mutex::new(Some(tx)));
    let tx_err = tx.clone();

    let options = StreamOptions::new()
        .on_progress(|notice| match notice {
            StreamNotice::Progress {
                message, percent, ..
            } => match percent {
                Some(percent) => println!("[{percent:>3}%] {message}"),
                None => println!("       {message}"),
            },
            StreamNotice::Delta { .. } => {}
        })
        .on_complete(move |world: inkweave_core::wizard::WorldBuilding| {
            if let Some(tx) = tx.lock().ok().and_then(|mut slot| slot.take()) {
                tx.send(Ok(world)).ok();
            }
        })
        .on_error(move |err| {
            if let Some(tx) = tx_err.lock().ok().and_then(|mut slot| slot.take()) {
                tx.send(Err(anyhow!(err.user_message()))).ok();
            }
        });

    let summary = client.wizard().world_building(request, options).await;
    match summary.outcome {
        StreamOutcome::Cancelled => {
            println!("cancelled");
            return Ok(());
        }
        StreamOutcome::Completed | StreamOutcome::Failed => {}
    }
    let world = rx.await.map_err(|_| anyhow!("stream ended without a verdict"))??;
    println!("project: {}", world.project_id);
    if let Some(time_period) = &world.time_period {
        println!("time period: {time_period}");
    }
    if let Some(location) = &world.location {
        println!("location: {location}");
    }
    if let Some(atmosphere) = &world.atmosphere {
        println!("atmosphere: {atmosphere}");
    }
    if let Some(rules) = &world.rules {
        println!("rules: {rules}");
    }
    Ok(())
}
