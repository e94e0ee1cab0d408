//! Shared command-line flags and the per-invocation session built from them

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use zeroize::Zeroizing;

use crate::config::paths::FlashbackPaths;
use crate::config::settings::{Settings, TransportKind};
use crate::context::Invocation;
use crate::error::{FlashbackError, FlashbackResult};
use crate::executor::{Executor, LocalExecutor, SshExecutor};
use crate::fleet::FleetRunner;
use crate::journal::{Journal, JournalEntry};
use crate::models::host::read_hosts_file;
use crate::models::{Host, SystemFileSet};

/// Flags accepted by every fleet command
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Host to operate on (repeatable)
    #[arg(
        short = 'H',
        long = "host",
        value_name = "HOST",
        conflicts_with = "hosts_file"
    )]
    pub hosts: Vec<String>,

    /// File with one host per line
    #[arg(short = 'f', long = "hosts-file", value_name = "FILE")]
    pub hosts_file: Option<PathBuf>,

    /// Absolute path of a system file to track (repeatable)
    #[arg(short = 'F', long = "system-file", value_name = "PATH")]
    pub system_files: Vec<String>,

    /// Archive root on each host
    #[arg(short = 'D', long = "archive-directory", value_name = "DIR")]
    pub archive_directory: Option<PathBuf>,

    /// Hosts worked on concurrently
    #[arg(short = 'w', long = "parallel-workers", value_name = "N")]
    pub parallel_workers: Option<usize>,

    /// Prompt for a sudo password and feed it to remote sudo
    #[arg(short = 'p', long = "sudo-password-prompt")]
    pub sudo_password_prompt: bool,

    /// How hosts are reached
    #[arg(long, value_enum)]
    pub transport: Option<TransportKind>,

    /// Treat <DIR>/<host> as each host's root filesystem (local transport)
    #[arg(long, value_name = "DIR")]
    pub local_root: Option<PathBuf>,
}

/// Everything a fleet command needs, resolved from flags and settings
pub struct Session {
    pub hosts: Vec<Host>,
    pub files: SystemFileSet,
    pub archive_dir: PathBuf,
    pub runner: FleetRunner,
    pub invocation: Invocation,
    pub journal: Journal,
}

impl Session {
    /// Resolve flags over settings; command-line values win
    pub fn open(
        args: &CommonArgs,
        paths: &FlashbackPaths,
        settings: &Settings,
    ) -> FlashbackResult<Self> {
        let hosts = collect_hosts(args)?;

        let files = if args.system_files.is_empty() {
            SystemFileSet::from_paths(&settings.system_files)?
        } else {
            SystemFileSet::from_paths(&args.system_files)?
        };
        if files.is_empty() {
            return Err(FlashbackError::Validation(
                "no usable system files; give absolute paths with --system-file".into(),
            ));
        }

        let archive_dir = args
            .archive_directory
            .clone()
            .unwrap_or_else(|| settings.archive_directory.clone());
        if !archive_dir.is_absolute() {
            return Err(FlashbackError::Validation(format!(
                "archive directory must be absolute: {}",
                archive_dir.display()
            )));
        }

        let executor = build_executor(args, settings)?;
        let workers = args.parallel_workers.unwrap_or(settings.parallel_workers);
        tracing::debug!(
            hosts = hosts.len(),
            workers,
            executor = %executor.describe(),
            "session ready"
        );

        let journal = if settings.journal_enabled {
            Journal::new(paths.journal_file())
        } else {
            Journal::disabled(paths.journal_file())
        };

        Ok(Self {
            hosts,
            files,
            archive_dir,
            runner: FleetRunner::new(executor, workers),
            invocation: Invocation::start(),
            journal,
        })
    }

    /// Journal entries; failures to write are only logged
    pub fn record(&self, entries: &[JournalEntry]) {
        self.journal.record_or_warn(entries);
    }
}

/// Hosts from `--host` or `--hosts-file`, duplicates dropped
fn collect_hosts(args: &CommonArgs) -> FlashbackResult<Vec<Host>> {
    let hosts = match &args.hosts_file {
        Some(path) => read_hosts_file(path)?,
        None => args
            .hosts
            .iter()
            .map(Host::new)
            .collect::<FlashbackResult<Vec<_>>>()?,
    };

    let mut unique: Vec<Host> = Vec::with_capacity(hosts.len());
    for host in hosts {
        if unique.contains(&host) {
            tracing::warn!(host = %host, "host listed more than once");
        } else {
            unique.push(host);
        }
    }

    if unique.is_empty() {
        return Err(FlashbackError::Validation(
            "no hosts given; use --host or --hosts-file".into(),
        ));
    }
    Ok(unique)
}

fn build_executor(args: &CommonArgs, settings: &Settings) -> FlashbackResult<Arc<dyn Executor>> {
    let transport = match (args.transport, &args.local_root) {
        (Some(kind), _) => kind,
        (None, Some(_)) => TransportKind::Local,
        (None, None) => settings.transport,
    };

    match transport {
        TransportKind::Local => {
            let executor = match &args.local_root {
                Some(root) => LocalExecutor::sandboxed(root),
                None => LocalExecutor::new(),
            };
            Ok(Arc::new(executor))
        }
        TransportKind::Ssh => {
            if args.local_root.is_some() {
                return Err(FlashbackError::Validation(
                    "--local-root only applies to the local transport".into(),
                ));
            }
            let mut executor = SshExecutor::new(settings.ssh.clone());
            if args.sudo_password_prompt {
                let password = rpassword::prompt_password("sudo password: ").map_err(|e| {
                    FlashbackError::Io(format!("Failed to read sudo password: {}", e))
                })?;
                executor = executor.with_sudo_password(Zeroizing::new(password));
            }
            Ok(Arc::new(executor))
        }
    }
}
