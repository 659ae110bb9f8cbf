//! Child process supervision
//!
//! Each child runs in its own process group so that termination reaches the
//! whole tree (e.g. `npm` and the dev server it starts).

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// How a supervised process ended up stopping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// It had already exited before shutdown was requested
    AlreadyExited,
    /// It exited within the grace period after SIGTERM
    Terminated,
    /// It was force-killed after the grace period
    Killed,
}

/// Split a command line on whitespace into program and arguments
pub fn parse_command(command: &str) -> Result<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let Some(program) = parts.next() else {
        bail!("Empty command");
    };
    Ok((program, parts.collect()))
}

pub struct ManagedProcess {
    name: String,
    child: Child,
}

impl ManagedProcess {
    /// Start `command`, inheriting stdout/stderr so output lands in this terminal
    pub fn spawn(name: &str, command: &str, cwd: Option<&Path>) -> Result<Self> {
        let (program, args) = parse_command(command)?;
        Self::spawn_args(name, &program, &args, cwd)
    }

    pub fn spawn_args<S: AsRef<str>>(
        name: &str,
        program: &str,
        args: &[S],
        cwd: Option<&Path>,
    ) -> Result<Self> {
        let command = std::iter::once(program)
            .chain(args.iter().map(AsRef::as_ref))
            .collect::<Vec<_>>()
            .join(" ");

        let mut cmd = Command::new(program);
        cmd.args(args.iter().map(AsRef::as_ref))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        #[cfg(unix)]
        {
            cmd.process_group(0);
        }

        let child = cmd
            .spawn()
            .with_context(|| format!("Failed to start {} ({})", name, command))?;
        info!("Started {} (pid {:?}): {}", name, child.id(), command);

        Ok(Self {
            name: name.to_string(),
            child,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// SIGTERM, wait up to `grace`, then SIGKILL
    pub async fn shutdown(&mut self, grace: Duration) -> Result<StopOutcome> {
        if let Some(status) = self.child.try_wait()? {
            debug!("{} already exited with {}", self.name, status);
            return Ok(StopOutcome::AlreadyExited);
        }

        info!("Stopping {}...", self.name);
        if let Err(e) = self.request_stop() {
            warn!("Failed to signal {}: {}", self.name, e);
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(status) => {
                let status = status?;
                info!("{} exited with {}", self.name, status);
                Ok(StopOutcome::Terminated)
            }
            Err(_) => {
                warn!(
                    "{} did not exit within {:?}, killing it",
                    self.name, grace
                );
                self.force_kill().await?;
                Ok(StopOutcome::Killed)
            }
        }
    }

    #[cfg(unix)]
    fn request_stop(&mut self) -> std::io::Result<()> {
        self.signal_group(libc::SIGTERM)
    }

    #[cfg(not(unix))]
    fn request_stop(&mut self) -> std::io::Result<()> {
        self.child.start_kill()
    }

    #[cfg(unix)]
    async fn force_kill(&mut self) -> std::io::Result<()> {
        if let Err(e) = self.signal_group(libc::SIGKILL) {
            debug!("Group kill for {} failed: {}", self.name, e);
        }
        self.child.kill().await
    }

    #[cfg(not(unix))]
    async fn force_kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }

    #[cfg(unix)]
    fn signal_group(&self, signal: libc::c_int) -> std::io::Result<()> {
        let Some(pid) = self.child.id() else {
            return Ok(());
        };
        // Negative pid addresses the process group led by the child
        let rc = unsafe { libc::kill(-(pid as libc::pid_t), signal) };
        if rc == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
