//! `kwabo-client` -- command-line companion for the publication wizard.
//!
//! Inspects the locally stored draft and submits it once the review step
//! passes. The interactive wizard UI drives [`kwabo_client::flow`]
//! directly; this binary covers the headless paths: checking where a
//! draft stands, submitting it, and discarding it.
//!
//! # Usage
//!
//! ```text
//! kwabo-client status    show the stored draft and its per-step state
//! kwabo-client submit    publish the stored draft
//! kwabo-client clear     discard the stored draft
//! ```
//!
//! # Environment variables
//!
//! | Variable       | Required | Default                 | Description                    |
//! |----------------|----------|-------------------------|--------------------------------|
//! | `API_BASE_URL` | no       | `http://localhost:3000` | Publish API base URL           |
//! | `DRAFT_DIR`    | no       | `.kwabo`                | Directory of the draft file    |

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kwabo_core::wizard::{validate_step, WizardStep};
use kwabo_client::config::ClientConfig;
use kwabo_client::flow::PublishFlow;
use kwabo_client::store::{DraftStore, FileDraftStore};
use kwabo_client::submit::PublishSubmitter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kwabo_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env();
    let store = FileDraftStore::new(&config.draft_dir);

    let command = std::env::args().nth(1).unwrap_or_else(|| "status".into());
    match command.as_str() {
        "status" => status(&store),
        "submit" => submit(store, &config).await,
        "clear" => clear(&store),
        other => bail!("Unknown command '{other}'. Expected: status, submit, clear"),
    }
}

/// Print the stored draft's progress, one line per step.
fn status(store: &FileDraftStore) -> anyhow::Result<()> {
    let Some((draft, step)) = store.load().context("Failed to read the stored draft")? else {
        println!("Aucun brouillon en cours.");
        return Ok(());
    };

    println!(
        "Brouillon: \"{}\" (étape actuelle: {} -- {})",
        if draft.title.is_empty() { "(sans titre)" } else { &draft.title },
        step,
        WizardStep::from_index(step).map(|s| s.label()).unwrap_or("?"),
    );
    for wizard_step in WizardStep::ALL {
        let mark = match validate_step(wizard_step, &draft) {
            Ok(()) => "ok".to_string(),
            Err(e) => format!("-- {e}"),
        };
        println!("  {:>2}. {:<16} {}", wizard_step.index(), wizard_step.label(), mark);
    }
    Ok(())
}

/// Submit the stored draft through the full flow.
async fn submit(store: FileDraftStore, config: &ClientConfig) -> anyhow::Result<()> {
    let mut flow = PublishFlow::new(store);
    if !flow.take_restore_notice() {
        bail!("Aucun brouillon en cours.");
    }

    let submitter = PublishSubmitter::new(config.api_base_url.clone());
    let published = flow
        .submit(&submitter)
        .await
        .context("La publication a échoué")?;

    println!(
        "Annonce publiée: #{} \"{}\" ({} photo(s))",
        published.id, published.title, published.images_count
    );
    Ok(())
}

/// Discard the stored draft.
fn clear(store: &FileDraftStore) -> anyhow::Result<()> {
    store.clear().context("Failed to remove the stored draft")?;
    println!("Brouillon supprimé.");
    Ok(())
}
