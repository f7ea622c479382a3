use std::io::{self, Write};
use std::process::ExitCode;

use log::warn;
use secrecy::SecretString;

use mailferry::{
    connect, run_migration, ConsoleProgress, CredentialCache, Credentials, MailboxSynchronizer,
    Result, RunConfig,
};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "mailferry.json".to_string());
    let config = RunConfig::load(&config_path)?;

    println!(
        "Welcome. This program will copy your mails from {} onto {}. \
         Before we begin, we will need some information.",
        config.source.host, config.destination.host
    );

    let cache = CredentialCache::default_location();
    let (email, password) = collect_source_credentials(cache.as_ref())?;

    println!("Connecting to {}...", config.source.host);
    let source = connect(
        &config.source,
        &Credentials {
            user: email.clone(),
            password: SecretString::from(password.clone()),
        },
    )
    .await?;

    let destination_user = config
        .destination
        .username
        .clone()
        .unwrap_or_else(|| email.clone());
    let destination_password = prompt(&format!("Password for {}: ", destination_user))?;

    println!("Connecting to {}...", config.destination.host);
    let destination = connect(
        &config.destination,
        &Credentials {
            user: destination_user,
            password: SecretString::from(destination_password),
        },
    )
    .await?;

    if let Some(cache) = &cache {
        if let Err(err) = cache.store(&email, &password) {
            warn!("could not cache credentials: {}", err);
        } else {
            println!("Credentials cached for subsequent executions.");
        }
    }

    println!(
        "\nConnections successful.\nPress enter to begin mail synchronization.\n\
         In case of an error, just rerun the program."
    );
    let _ = prompt("")?;

    println!("Listing mailboxes...");
    let mut synchronizer = MailboxSynchronizer::new(source, destination, config.batch_size);
    let report = run_migration(&mut synchronizer, &config.mailbox_pattern, &ConsoleProgress).await?;

    let failed = report.failures().count();
    println!(
        "Sync complete! Moved {} messages, skipped {} across {} mailboxes ({} failed).",
        report.total_moved(),
        report.total_skipped(),
        report.results.len(),
        failed
    );

    let (source, destination) = synchronizer.into_sessions();
    if let Some(session) = source {
        if let Err(err) = session.logout().await {
            warn!("source logout failed: {}", err);
        }
    }
    if let Err(err) = destination.logout().await {
        warn!("destination logout failed: {}", err);
    }

    Ok(())
}

/// Asks whether to reuse cached credentials, or prompts for fresh ones.
fn collect_source_credentials(cache: Option<&CredentialCache>) -> Result<(String, String)> {
    if let Some(cached) = cache.and_then(|c| c.load()) {
        let answer = prompt(&format!(
            "Reuse existing email and app password for '{}'? (yes/no, default yes): ",
            cached.email
        ))?;
        match answer.as_str() {
            "" | "yes" => return Ok((cached.email, cached.app_password)),
            "no" => {
                if let Some(cache) = cache {
                    cache.clear()?;
                }
            }
            _ => {
                return Err(
                    io::Error::new(io::ErrorKind::InvalidInput, "expected 'yes' or 'no'").into(),
                );
            }
        }
    }

    let email = prompt("Your email: ")?;
    let password = prompt("Your app password: ")?;
    Ok((email, password))
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
