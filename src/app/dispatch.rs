use crate::cli::commands::{Cli, Commands, ReflectionCommands};
use anyhow::{Context, Result};
use palimpsest::Config;
use palimpsest::artifact::{Artifact, ArtifactKind, ArtifactStore, SqliteArtifactStore, Version};
use palimpsest::directive::RequestState;
use palimpsest::error::{ArtifactError, StoreError};
use palimpsest::llm::create_provider;
use palimpsest::memory::{
    Namespace, REFLECTION_KEY, ReflectionStore, Reflections, create_reflection_store,
};
use palimpsest::observability::create_observer;
use palimpsest::rewrite::{RewriteContext, ThemeRewriter};
use std::path::PathBuf;
use tracing::info;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::New {
            title,
            kind,
            language,
            content,
            file,
        } => create_artifact(&config, title, kind, language, content, file).await,

        Commands::Rewrite {
            id,
            assistant_id,
            language,
            reading_level,
            length,
            emojis,
        } => {
            let request = RequestState {
                language,
                reading_level,
                artifact_length: length,
                regenerate_with_emojis: emojis,
            };
            rewrite_artifact(&config, &id, assistant_id, &request).await
        }

        Commands::Show { id, version, json } => show_version(&config, &id, version, json).await,

        Commands::History { id } => show_history(&config, &id).await,

        Commands::List => list_artifacts(&config).await,

        Commands::Reflections { reflection_command } => {
            let store = create_reflection_store(&config.memory, &config.workspace_dir).await?;
            handle_reflections(store.as_ref(), reflection_command).await
        }
    }
}

async fn open_artifacts(config: &Config) -> Result<SqliteArtifactStore> {
    SqliteArtifactStore::open(&config.workspace_dir.join(&config.memory.db_file)).await
}

async fn load_artifact(store: &dyn ArtifactStore, id: &str) -> Result<Artifact> {
    store
        .load(id)
        .await?
        .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
}

async fn create_artifact(
    config: &Config,
    title: String,
    kind: ArtifactKind,
    language: Option<String>,
    content: Option<String>,
    file: Option<PathBuf>,
) -> Result<()> {
    let content = match (content, file) {
        (Some(content), _) => content,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide --content or --file"),
    };

    let mut first = Version::new(1, kind, title).with_content(content);
    if let Some(language) = language {
        first = first.with_language(language);
    }

    let store = open_artifacts(config).await?;
    let id = store.create(&Artifact::from_first(first)).await?;
    info!(artifact_id = %id, "artifact created");
    println!("{id}");
    Ok(())
}

async fn rewrite_artifact(
    config: &Config,
    id: &str,
    assistant_id: String,
    request: &RequestState,
) -> Result<()> {
    let store = open_artifacts(config).await?;
    let artifact = load_artifact(&store, id).await?;

    let provider = create_provider(&config.generation, config.api_key.as_deref())?;
    let reflections = create_reflection_store(&config.memory, &config.workspace_dir).await?;
    let rewriter = ThemeRewriter::new(provider, reflections, config.generation.clone())?
        .with_observer(create_observer(&config.observability));

    let updated = rewriter
        .rewrite(&RewriteContext::for_assistant(assistant_id), request, &artifact)
        .await?;
    store.commit(id, &updated).await?;

    info!(
        artifact_id = %id,
        current_index = updated.current_index(),
        "rewrite committed"
    );
    if let Some(version) = updated.current_version() {
        println!("{}", version.content);
    }
    Ok(())
}

async fn show_version(config: &Config, id: &str, index: Option<usize>, json: bool) -> Result<()> {
    let store = open_artifacts(config).await?;
    let artifact = load_artifact(&store, id).await?;

    let index = index.unwrap_or_else(|| artifact.current_index());
    let version = artifact
        .version(index)
        .ok_or(ArtifactError::VersionNotFound(index))?;

    if json {
        println!("{}", serde_json::to_string_pretty(version)?);
    } else {
        println!("{}", version.content);
    }
    Ok(())
}

async fn show_history(config: &Config, id: &str) -> Result<()> {
    let store = open_artifacts(config).await?;
    let artifact = load_artifact(&store, id).await?;
    print!("{}", render_history(&artifact));
    Ok(())
}

fn render_history(artifact: &Artifact) -> String {
    let mut out = String::new();
    for version in artifact.versions() {
        let marker = if version.index == artifact.current_index() {
            '*'
        } else {
            ' '
        };
        let language = version
            .language
            .as_deref()
            .map(|l| format!(" [{l}]"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{marker} v{:<3} {} ({}){language}  {} chars\n",
            version.index,
            version.title,
            version.kind,
            version.content.chars().count()
        ));
    }
    out
}

async fn list_artifacts(config: &Config) -> Result<()> {
    let store = open_artifacts(config).await?;
    let summaries = store.list().await?;
    if summaries.is_empty() {
        println!("No artifacts yet. Create one with `palimpsest new`.");
        return Ok(());
    }
    for summary in summaries {
        println!(
            "{}  {} ({})  v{}/{}  updated {}",
            summary.id,
            summary.title,
            summary.kind,
            summary.current_index,
            summary.version_count,
            summary.updated_at
        );
    }
    Ok(())
}

async fn handle_reflections(
    store: &dyn ReflectionStore,
    command: ReflectionCommands,
) -> Result<()> {
    match command {
        ReflectionCommands::Show { assistant_id } => {
            let namespace = Namespace::for_assistant(&assistant_id);
            match store.get(&namespace, REFLECTION_KEY).await? {
                Some(reflections) => println!("{}", reflections.format()),
                None => println!("No reflections stored for {assistant_id}."),
            }
        }
        ReflectionCommands::Set {
            assistant_id,
            styles,
            facts,
        } => {
            let namespace = Namespace::for_assistant(&assistant_id);
            let existing = store.get(&namespace, REFLECTION_KEY).await?;
            let updated = merge_reflections(existing, styles, facts);
            store.put(&namespace, REFLECTION_KEY, &updated).await?;
            info!(namespace = %namespace, "reflections stored");
        }
        ReflectionCommands::Clear { assistant_id } => {
            let namespace = Namespace::for_assistant(&assistant_id);
            if store.delete(&namespace, REFLECTION_KEY).await? {
                println!("Cleared reflections for {assistant_id}.");
            } else {
                println!("No reflections stored for {assistant_id}.");
            }
        }
    }
    Ok(())
}

/// Non-empty lists replace the stored ones; empty lists keep them.
fn merge_reflections(
    existing: Option<Reflections>,
    styles: Vec<String>,
    facts: Vec<String>,
) -> Reflections {
    let mut reflections = existing.unwrap_or_default();
    if !styles.is_empty() {
        reflections.style_rules = styles;
    }
    if !facts.is_empty() {
        reflections.content = facts;
    }
    reflections
}
