//! CLI commands
//!
//! Parsing is hand-rolled over `std::env::args`; execution is generic over
//! [`Filesystem`] so it runs the same against pCloud or an in-memory remote.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use pcloudfs_vfs::{Filesystem, Namespace};

/// A single CLI invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List a directory
    Ls { path: String },
    /// Print info (basic + details) as JSON
    Stat { path: String },
    /// Write a file's content to stdout
    Cat { path: String },
    /// Upload a local file, replacing the remote one
    Put { local: PathBuf, remote: String },
    /// Append a local file to a remote one
    Append { local: PathBuf, remote: String },
    Mkdir { path: String, parents: bool },
    Rm { path: String },
    Rmdir { path: String },
    Rmtree { path: String },
    Help,
    Version,
}

pub const USAGE: &str = "\
pcloudfs - pCloud as a filesystem

USAGE:
    pcloudfs <COMMAND> [ARGS]

COMMANDS:
    ls [PATH]              List a directory (default: /)
    stat PATH              Show info about a file or directory
    cat PATH               Print a file to stdout
    put LOCAL REMOTE       Upload a local file (replaces REMOTE)
    append LOCAL REMOTE    Append a local file to REMOTE
    mkdir [-p] PATH        Create a directory (-p: with parents)
    rm PATH                Remove a file
    rmdir PATH             Remove an empty directory
    rmtree PATH            Remove a directory and its contents

GLOBAL OPTIONS:
    -h, --help             Print help information
    -v, --version          Print version

CONFIG:
    ~/.config/pcloudfs/config.toml
    PCLOUD_USERNAME, PCLOUD_PASSWORD, PCLOUD_API_HOST, PCLOUD_TIMEOUT
    PCLOUDFS_LOG (log filter, e.g. debug)";

impl Command {
    /// Parse arguments (without the program name)
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some(name) = args.first() else {
            return Ok(Self::Help);
        };
        let rest = &args[1..];
        let arg = |i: usize, what: &str| -> Result<String> {
            rest.get(i)
                .cloned()
                .with_context(|| format!("{name}: missing {what}"))
        };

        let command = match name.as_str() {
            "--help" | "-h" | "help" => Self::Help,
            "--version" | "-v" => Self::Version,
            "ls" => Self::Ls {
                path: rest.first().cloned().unwrap_or_else(|| "/".to_string()),
            },
            "stat" => Self::Stat { path: arg(0, "PATH")? },
            "cat" => Self::Cat { path: arg(0, "PATH")? },
            "put" => Self::Put {
                local: PathBuf::from(arg(0, "LOCAL")?),
                remote: arg(1, "REMOTE")?,
            },
            "append" => Self::Append {
                local: PathBuf::from(arg(0, "LOCAL")?),
                remote: arg(1, "REMOTE")?,
            },
            "mkdir" => {
                let parents = rest.first().is_some_and(|a| a == "-p");
                let path = if parents { arg(1, "PATH")? } else { arg(0, "PATH")? };
                Self::Mkdir { path, parents }
            }
            "rm" => Self::Rm { path: arg(0, "PATH")? },
            "rmdir" => Self::Rmdir { path: arg(0, "PATH")? },
            "rmtree" => Self::Rmtree { path: arg(0, "PATH")? },
            other => bail!("unknown command '{other}' (see --help)"),
        };
        Ok(command)
    }
}

/// Execute a command against `fs`, writing its output to `out`
pub async fn run<F, W>(fs: &F, command: &Command, out: &mut W) -> Result<()>
where
    F: Filesystem + ?Sized,
    W: Write,
{
    match command {
        Command::Ls { path } => {
            for name in fs.listdir(path).await? {
                writeln!(out, "{name}")?;
            }
        }
        Command::Stat { path } => {
            let info = fs.getinfo(path, &[Namespace::Details]).await?;
            let raw = serde_json::Value::Object(info.to_raw());
            writeln!(out, "{}", serde_json::to_string_pretty(&raw)?)?;
        }
        Command::Cat { path } => {
            let data = fs.readbytes(path).await?;
            out.write_all(&data)?;
        }
        Command::Put { local, remote } => {
            let data = read_local(local)?;
            fs.writebytes(remote, &data).await?;
            tracing::info!(remote = %remote, bytes = data.len(), "Uploaded");
        }
        Command::Append { local, remote } => {
            let data = read_local(local)?;
            fs.appendbytes(remote, &data).await?;
            tracing::info!(remote = %remote, bytes = data.len(), "Appended");
        }
        Command::Mkdir { path, parents } => {
            if *parents {
                fs.makedirs(path, None, true).await?;
            } else {
                fs.makedir(path, None, false).await?;
            }
        }
        Command::Rm { path } => fs.remove(path).await?,
        Command::Rmdir { path } => fs.removedir(path).await?,
        Command::Rmtree { path } => fs.removetree(path).await?,
        Command::Help => writeln!(out, "{USAGE}")?,
        Command::Version => writeln!(out, "pcloudfs {}", env!("CARGO_PKG_VERSION"))?,
    }
    Ok(())
}

fn read_local(path: &PathBuf) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    std::fs::File::open(path)
        .and_then(|mut f| f.read_to_end(&mut data))
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(data)
}
