use std::path::PathBuf;

use clap::Parser;
use colloquy_config::Backend;

/// Colloquy: send one message to a Gemini chat session seeded with an
/// SQL-specialist conversation.
#[derive(Parser, Debug, Default)]
#[command(name = "colloquy", version, about)]
pub struct Args {
    /// Message to send. Defaults to `session.message` from the config.
    pub message: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive (e.g. `colloquy=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Endpoint to use: google-ai or vertex-ai.
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Model id override.
    #[arg(long)]
    pub model: Option<String>,

    /// Print the response as it streams in.
    #[arg(long)]
    pub stream: bool,

    /// Print the full transcript after the response.
    #[arg(long)]
    pub show_history: bool,

    /// Start from an empty conversation.
    #[arg(long)]
    pub no_seed: bool,

    /// Give up on the provider after this many seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "colloquy",
            "--backend",
            "vertex-ai",
            "--model",
            "gemini-1.5-flash",
            "--stream",
            "--show-history",
            "--no-seed",
            "--timeout",
            "30",
            "Explain EXPLAIN ANALYZE",
        ])
        .unwrap();

        assert_eq!(args.backend, Some(Backend::VertexAi));
        assert_eq!(args.model.as_deref(), Some("gemini-1.5-flash"));
        assert!(args.stream && args.show_history && args.no_seed);
        assert_eq!(args.timeout, Some(30));
        assert_eq!(args.message.as_deref(), Some("Explain EXPLAIN ANALYZE"));
    }

    #[test]
    fn rejects_unknown_backend_and_zero_timeout() {
        assert!(Args::try_parse_from(["colloquy", "--backend", "openai"]).is_err());
        assert!(Args::try_parse_from(["colloquy", "--timeout", "0"]).is_err());
    }
}
