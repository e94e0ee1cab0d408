//! Executor that drives the system `ssh` client
//!
//! Each [`Operation`] maps to one fixed remote command. Every argument is
//! single-quoted before it crosses the wire, so paths and operator commands
//! are never reinterpreted by the remote shell.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use zeroize::Zeroizing;

use super::{Executor, OpOutput, Operation};
use crate::config::settings::SshSettings;
use crate::error::{FlashbackError, FlashbackResult};
use crate::models::Host;

/// ssh reserves this exit status for its own failures
const SSH_FAILURE_STATUS: i32 = 255;

const LIST_SCRIPT: &str = r#"test -d "$1" && find "$1" -type f || exit 0"#;

/// Runs operations on remote hosts over ssh
pub struct SshExecutor {
    settings: SshSettings,
    sudo_password: Option<Zeroizing<String>>,
}

impl SshExecutor {
    pub fn new(settings: SshSettings) -> Self {
        Self {
            settings,
            sudo_password: None,
        }
    }

    /// Feed this password to `sudo -S` instead of requiring passwordless sudo
    pub fn with_sudo_password(mut self, password: Zeroizing<String>) -> Self {
        self.sudo_password = Some(password);
        self
    }

    /// The remote argv for an operation, before sudo and quoting
    pub fn remote_argv(op: &Operation) -> Vec<String> {
        fn p(path: &Path) -> String {
            path.display().to_string()
        }

        match op {
            Operation::EnsureDir { path } => vec!["mkdir".into(), "-p".into(), "--".into(), p(path)],
            Operation::CopyIfNewer {
                source,
                destination,
            } => vec![
                "cp".into(),
                "-upv".into(),
                "--".into(),
                p(source),
                p(destination),
            ],
            Operation::CopyOver {
                source,
                destination,
            } => vec![
                "cp".into(),
                "-af".into(),
                "--".into(),
                p(source),
                p(destination),
            ],
            Operation::ReadFile { path } => vec!["cat".into(), "--".into(), p(path)],
            Operation::ListFiles { root } => vec![
                "sh".into(),
                "-c".into(),
                LIST_SCRIPT.into(),
                "flashback".into(),
                p(root),
            ],
            Operation::RemoveTree { path } => vec!["rm".into(), "-rf".into(), "--".into(), p(path)],
            Operation::RunCommand { command } => vec!["sh".into(), "-c".into(), command.clone()],
        }
    }

    /// The full command string the remote shell will run
    pub fn remote_command(&self, op: &Operation) -> String {
        let mut argv: Vec<String> = Vec::new();
        if self.settings.sudo {
            if self.sudo_password.is_some() {
                argv.extend(["sudo", "-S", "-p", ""].map(String::from));
            } else {
                argv.extend(["sudo", "-n"].map(String::from));
            }
        }
        argv.extend(Self::remote_argv(op));
        argv.iter().map(|arg| quote(arg)).collect::<Vec<_>>().join(" ")
    }

    /// Arguments passed to the local ssh binary
    pub fn ssh_args(&self, host: &Host, remote_command: String) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.settings.connect_timeout_secs),
        ];
        for option in &self.settings.options {
            args.push("-o".to_string());
            args.push(option.clone());
        }
        if let Some(port) = self.settings.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        if let Some(user) = &self.settings.user {
            args.push("-l".to_string());
            args.push(user.clone());
        }
        // Everything after `--` is the destination and its command, never an option
        args.push("--".to_string());
        args.push(host.to_string());
        args.push(remote_command);
        args
    }

    fn run(&self, host: &Host, op: &Operation) -> FlashbackResult<Output> {
        let args = self.ssh_args(host, self.remote_command(op));
        tracing::trace!(host = %host, op = op.name(), "ssh {}", args.join(" "));

        let stdin = if self.sudo_password.is_some() && self.settings.sudo {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut child = Command::new(&self.settings.binary)
            .args(&args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FlashbackError::Transport {
                host: host.to_string(),
                message: format!("failed to start {}: {}", self.settings.binary, e),
            })?;

        if let (Some(password), Some(mut pipe)) = (&self.sudo_password, child.stdin.take()) {
            // A closed pipe means sudo did not ask; the exit status tells the rest
            let _ = pipe.write_all(password.as_bytes());
            let _ = pipe.write_all(b"\n");
        }

        child.wait_with_output().map_err(|e| FlashbackError::Transport {
            host: host.to_string(),
            message: format!("failed waiting for ssh: {}", e),
        })
    }
}

impl Executor for SshExecutor {
    fn execute(&self, host: &Host, op: &Operation) -> FlashbackResult<OpOutput> {
        let output = self.run(host, op)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_remote_failure(host, output.status.code(), &stderr));
        }

        Ok(match op {
            Operation::CopyIfNewer { .. } => {
                // `cp -v` only reports files it actually copied
                if output.stdout.iter().any(|b| !b.is_ascii_whitespace()) {
                    OpOutput::Copied
                } else {
                    OpOutput::Skipped
                }
            }
            Operation::ReadFile { .. } => OpOutput::Contents(output.stdout),
            Operation::ListFiles { .. } => {
                OpOutput::Listing(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            _ => OpOutput::Done,
        })
    }

    fn describe(&self) -> String {
        let mut description = format!("ssh ({})", self.settings.binary);
        if self.settings.sudo {
            description.push_str(" with sudo");
        }
        description
    }
}

/// Quote one argument for a POSIX shell
pub fn quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_./=:,@+%".contains(&b))
    {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Turn a failed ssh invocation into an error category
pub fn classify_remote_failure(host: &Host, code: Option<i32>, stderr: &str) -> FlashbackError {
    let message = stderr.trim().to_string();
    let host = host.to_string();

    match code {
        None => {
            return FlashbackError::Transport {
                host,
                message: "ssh terminated by signal".into(),
            }
        }
        Some(SSH_FAILURE_STATUS) => {
            return FlashbackError::Transport {
                host,
                message: if message.is_empty() {
                    "ssh connection failed".into()
                } else {
                    message
                },
            }
        }
        Some(_) => {}
    }

    if message.contains("No such file or directory") {
        FlashbackError::NotFound {
            entity_type: "Path",
            identifier: format!("{} ({})", message, host),
        }
    } else if message.contains("Permission denied")
        || message.contains("Operation not permitted")
        || message.contains("a password is required")
        || message.contains("incorrect password")
    {
        FlashbackError::PermissionDenied(format!("{} ({})", message, host))
    } else {
        FlashbackError::Remote {
            host,
            message: if message.is_empty() {
                format!("exit status {}", code.unwrap_or_default())
            } else {
                message
            },
        }
    }
}
