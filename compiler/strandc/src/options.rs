//! Command-line parsing.
//!
//! Arguments are parsed by hand: the surface is one command, one file and
//! a handful of flags.

use std::path::{Path, PathBuf};

use strand_resolve::{ConfigError, ResolverConfig};

/// A driver command.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Command {
    /// Load and integrate, report errors.
    Check,
    /// As `Check`, then print dependency records.
    Deps,
    /// Print the root file's imports in canonical form.
    Imports,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "check" => Some(Command::Check),
            "deps" => Some(Command::Deps),
            "imports" => Some(Command::Imports),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Check => "check",
            Command::Deps => "deps",
            Command::Imports => "imports",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub command: Command,
    pub file: PathBuf,
    /// `-I` roots in command-line order.
    pub include: Vec<PathBuf>,
    pub json: bool,
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{0}` needs a source file")]
    MissingFile(&'static str),
    #[error("unexpected argument `{0}`: only one source file is accepted")]
    UnexpectedArgument(String),
    #[error("unknown option `{0}`")]
    UnknownFlag(String),
    #[error("`{0}` needs a value")]
    MissingValue(&'static str),
    #[error("invalid import configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("cannot encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse the arguments after the program name.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Options, CliError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(CliError::UnknownCommand(String::new()));
    };
    let command = Command::from_arg(first.as_ref())
        .ok_or_else(|| CliError::UnknownCommand(first.as_ref().to_string()))?;

    let mut file = None;
    let mut include = Vec::new();
    let mut json = false;
    let mut verbose = false;

    let mut i = 0;
    while i < rest.len() {
        let arg = rest[i].as_ref();
        match arg {
            "-I" => {
                let dir = rest.get(i + 1).ok_or(CliError::MissingValue("-I"))?;
                include.push(PathBuf::from(dir.as_ref()));
                i += 1;
            }
            "--json" => json = true,
            "-v" | "--verbose" => verbose = true,
            _ if arg.len() > 2 && arg.starts_with("-I") => include.push(PathBuf::from(&arg[2..])),
            _ if arg.starts_with('-') => return Err(CliError::UnknownFlag(arg.to_string())),
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => return Err(CliError::UnexpectedArgument(arg.to_string())),
        }
        i += 1;
    }

    Ok(Options {
        command,
        file: file.ok_or(CliError::MissingFile(command.name()))?,
        include,
        json,
        verbose,
    })
}

impl Options {
    /// Search roots: `-I` directories, then `STRAND_IMPORT_PATH`, then the
    /// directory holding the root file.
    pub fn resolver_config(&self) -> Result<ResolverConfig, CliError> {
        let own_dir = match self.file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut config = ResolverConfig::new()
            .with_roots(self.include.iter().cloned())
            .with_env_roots();
        if !config.search_roots.iter().any(|root| root == own_dir) {
            config = config.with_root(own_dir);
        }
        config.validate()?;
        Ok(config)
    }
}
