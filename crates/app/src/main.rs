//! WaterTime - hydration reminders in the terminal
//!
//! Main entry point: reads line commands from stdin and prints fired
//! reminders as they ring.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use watertime_domain::Config;
use watertime_infra::{config, observability};
use watertime_lib::{execute, AppContext, Command, Reply};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = match config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("watertime: {err}; using default configuration");
            Config::default()
        }
    };
    observability::init_tracing(&config.logging).context("failed to initialise logging")?;

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    let (mut ctx, mut rings) =
        AppContext::new_with_config(config).context("failed to build application context")?;
    ctx.start().await.context("failed to start services")?;

    println!("watertime ready; type 'help' for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(Some(command)) => match execute(&mut ctx, command).await {
                        Ok(Reply::Text(text)) => println!("{text}"),
                        Ok(Reply::Quit) => break,
                        Err(err) => println!("error: {err}"),
                    },
                    Ok(None) => {}
                    Err(err) => println!("{err}"),
                }
            }
            Some(ring) = rings.recv() => {
                println!("🔔 {}: {}", ring.title, ring.body);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    ctx.shutdown();
    Ok(())
}
