use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_MAX_LINES: usize = 5_000;

#[derive(Debug, Parser)]
#[command(
    name = "aoc-transcript-view",
    about = "Scrollable, searchable viewer for agent session transcripts"
)]
pub struct Cli {
    /// Transcript file (JSONL or plain text). Reads stdin when omitted.
    #[arg(env = "AOC_TRANSCRIPT_PATH")]
    pub path: Option<PathBuf>,

    /// Keep at most this many lines in memory (0 = unbounded).
    #[arg(long, env = "AOC_TRANSCRIPT_MAX_LINES", default_value_t = DEFAULT_MAX_LINES)]
    pub max_lines: usize,

    /// Start with follow mode off.
    #[arg(long)]
    pub no_follow: bool,

    /// Write logs to this file instead of discarding them.
    #[arg(long, env = "AOC_TRANSCRIPT_LOG")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranscriptSource {
    File(PathBuf),
    Stdin,
}

impl TranscriptSource {
    pub fn label(&self) -> String {
        match self {
            TranscriptSource::File(path) => path.display().to_string(),
            TranscriptSource::Stdin => "<stdin>".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub source: TranscriptSource,
    pub max_lines: usize,
    pub follow: bool,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        let follow_env = std::env::var("AOC_TRANSCRIPT_FOLLOW").ok();
        Self::resolve(cli, follow_env.as_deref())
    }

    fn resolve(cli: Cli, follow_env: Option<&str>) -> Self {
        let source = match cli.path {
            Some(path) if !path.as_os_str().is_empty() => TranscriptSource::File(path),
            _ => TranscriptSource::Stdin,
        };
        let follow = !cli.no_follow && follow_env.and_then(parse_bool_flag).unwrap_or(true);
        Self {
            source,
            max_lines: cli.max_lines,
            follow,
            log_file: cli.log_file,
        }
    }
}

pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn log_stdout_enabled() -> bool {
    std::env::var("AOC_LOG_STDOUT")
        .ok()
        .and_then(|value| parse_bool_flag(&value))
        .unwrap_or(false)
}
