//! Dev command - run the API server and the front-end dev server together

use crate::supervisor::{shutdown_signal, ManagedProcess};
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

pub struct DevOptions {
    pub server_cmd: String,
    pub frontend_cmd: String,
    pub frontend_dir: PathBuf,
    pub startup_delay: Duration,
    pub grace: Duration,
}

pub async fn run(options: DevOptions) -> Result<()> {
    println!("{}", "🔧 Starting backend...".cyan().bold());
    let mut backend = ManagedProcess::spawn("backend", &options.server_cmd, None)?;

    // Give the API a head start before the front-end begins proxying to it
    tokio::select! {
        _ = tokio::time::sleep(options.startup_delay) => {}
        status = backend.wait() => {
            println!(
                "{} {}",
                "⚠️ Backend exited during startup:".yellow(),
                describe(status)
            );
            return Ok(());
        }
        _ = shutdown_signal() => {
            println!();
            println!("{}", "👋 Stopping application...".yellow());
            stop(&mut backend, options.grace).await;
            return Ok(());
        }
    }

    println!("{}", "🔧 Starting frontend...".cyan().bold());
    let mut frontend = match ManagedProcess::spawn(
        "frontend",
        &options.frontend_cmd,
        Some(&options.frontend_dir),
    ) {
        Ok(process) => process,
        Err(e) => {
            stop(&mut backend, options.grace).await;
            return Err(e);
        }
    };

    println!();
    println!(
        "{}",
        "✅ Application running. Press Ctrl+C to stop.".green().bold()
    );

    tokio::select! {
        _ = shutdown_signal() => {
            println!();
        }
        status = backend.wait() => {
            println!("{} {}", "⚠️ Backend exited unexpectedly:".yellow(), describe(status));
        }
        status = frontend.wait() => {
            println!("{} {}", "⚠️ Frontend exited unexpectedly:".yellow(), describe(status));
        }
    }

    println!("{}", "👋 Stopping application...".yellow());
    stop(&mut frontend, options.grace).await;
    stop(&mut backend, options.grace).await;
    println!("{}", "Application stopped.".green());

    Ok(())
}

async fn stop(process: &mut ManagedProcess, grace: Duration) {
    if let Err(e) = process.shutdown(grace).await {
        println!("{} {}: {}", "❌ Failed to stop".red(), process.name(), e);
    }
}

fn describe(status: std::io::Result<std::process::ExitStatus>) -> String {
    match status {
        Ok(status) => status.to_string(),
        Err(e) => e.to_string(),
    }
}
