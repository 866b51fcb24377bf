use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use super::config::ModeSetting;

/// Terminal client for a grounded question-answering backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "grounded-qa")]
#[command(version)]
#[command(about = "Ask questions against a grounded QA backend", long_about = None)]
pub struct Cli {
    /// Interaction model: single-shot chat, or ingest a site then ask.
    #[arg(long, value_enum)]
    pub mode: Option<ModeSetting>,

    /// Origin of the answering API (serves /chat and /health).
    #[arg(long, env = "GROUNDED_QA_BACKEND_URL", value_name = "URL")]
    pub backend_url: Option<String>,

    /// Origin serving /api/ingest and /api/ask.
    #[arg(long, env = "GROUNDED_QA_SITE_URL", value_name = "URL")]
    pub site_url: Option<String>,

    /// Number of passages requested per /chat query.
    #[arg(short = 'k', long)]
    pub top_k: Option<u32>,

    /// Give up on a request after this many seconds (default: wait forever).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Log file path; the terminal itself is owned by the UI.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// RON config file (default: ./grounded_qa.ron when present).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_overrides_unset() {
        let cli = Cli::parse_from(["grounded-qa"]);
        assert!(cli.mode.is_none());
        assert!(cli.top_k.is_none());
        assert!(cli.timeout.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.log_level, LevelFilter::Info);
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::parse_from([
            "grounded-qa",
            "--mode",
            "site",
            "--site-url",
            "http://localhost:4000",
            "-k",
            "6",
            "--timeout",
            "30",
            "--log-level",
            "debug",
            "-c",
            "custom.ron",
        ]);
        assert_eq!(cli.mode, Some(ModeSetting::Site));
        assert_eq!(cli.site_url.as_deref(), Some("http://localhost:4000"));
        assert_eq!(cli.top_k, Some(6));
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.log_level, LevelFilter::Debug);
        assert_eq!(cli.config, Some(PathBuf::from("custom.ron")));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let result = Cli::try_parse_from(["grounded-qa", "--log-level", "loud"]);
        assert!(result.is_err());
    }
}
