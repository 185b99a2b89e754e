//! The one-shot run: credentials, banner, session, send, transcript.

use std::io::Write;
use std::time::Duration;

use colloquy_ai::{
    ChatError, ChatSession, CompletionProvider, GeminiClient, GeminiConfig, Reply,
};
use colloquy_common::{ColloquyError, Turn};
use colloquy_config::{Backend, ColloquyConfig, Credentials};
use tracing::info;

use crate::banner;
use crate::cli::Args;
use crate::seed;

/// Config file values with command-line overrides applied.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub backend: Backend,
    pub model: String,
    pub title: String,
    pub message: String,
    pub stream: bool,
    pub show_history: bool,
    pub seed: Vec<Turn>,
    pub timeout: Option<Duration>,
}

impl RunSettings {
    pub fn resolve(args: &Args, config: &ColloquyConfig) -> Self {
        let backend = args.backend.unwrap_or(config.model.backend);
        let seed = if args.no_seed {
            Vec::new()
        } else {
            config
                .session
                .seed
                .clone()
                .unwrap_or_else(seed::sql_specialist)
        };

        Self {
            backend,
            model: args.model.clone().unwrap_or_else(|| config.model.name.clone()),
            title: config.session.title.clone(),
            message: args
                .message
                .clone()
                .unwrap_or_else(|| config.session.message.clone()),
            stream: args.stream || config.session.stream,
            show_history: args.show_history
                || config
                    .session
                    .show_history
                    .unwrap_or(backend == Backend::GoogleAi),
            seed,
            timeout: args
                .timeout
                .or(config.session.timeout_secs)
                .map(Duration::from_secs),
        }
    }
}

/// Build the Gemini provider for the resolved credentials.
pub fn connect(credentials: Credentials) -> Result<Box<dyn CompletionProvider>, ChatError> {
    let config = match credentials {
        Credentials::GoogleAi { api_key } => GeminiConfig::google_ai(api_key),
        Credentials::VertexAi {
            project,
            region,
            access_token,
        } => GeminiConfig::vertex_ai(project, region, access_token),
    };
    Ok(Box::new(GeminiClient::new(config)?))
}

/// Run one exchange and write everything user-facing to `out`.
///
/// Credentials are resolved through `lookup` before `connect` is called,
/// so a missing variable fails without any provider being built.
pub async fn run<L, C>(
    args: &Args,
    config: &ColloquyConfig,
    lookup: L,
    connect: C,
    out: &mut (dyn Write + Send),
) -> colloquy_common::Result<Reply>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(Credentials) -> Result<Box<dyn CompletionProvider>, ChatError>,
{
    let settings = RunSettings::resolve(args, config);
    let credentials = Credentials::resolve(settings.backend, lookup)?;
    let provider = connect(credentials).map_err(chat_error)?;

    info!(
        backend = %settings.backend,
        model = %settings.model,
        provider = provider.name(),
        "provider ready"
    );

    banner::print_introduction(out, &settings.title)?;

    let mut session = ChatSession::new(
        settings.model.clone(),
        config.generation.clone(),
        config.safety.clone(),
        settings.seed.clone(),
    );
    if let Some(timeout) = settings.timeout {
        session = session.with_timeout(timeout);
    }
    info!(
        session = %session.id().short(),
        seeded = session.history().len(),
        timeout = ?session.timeout(),
        "session ready"
    );

    let reply = if settings.stream {
        let mut write_error = None;
        let reply = session
            .send_streaming(provider.as_ref(), settings.message.as_str(), |chunk| {
                if write_error.is_none() {
                    if let Err(e) = out.write_all(chunk.as_bytes()).and_then(|()| out.flush()) {
                        write_error = Some(e);
                    }
                }
            })
            .await
            .map_err(chat_error)?;
        if let Some(e) = write_error {
            return Err(e.into());
        }
        if reply.is_blocked() {
            writeln!(out, "{reply}")?;
        } else {
            writeln!(out)?;
        }
        reply
    } else {
        let reply = session
            .send(provider.as_ref(), settings.message.as_str())
            .await
            .map_err(chat_error)?;
        writeln!(out, "{reply}")?;
        reply
    };

    if settings.show_history {
        writeln!(out)?;
        for turn in session.history() {
            writeln!(out, "{turn}")?;
        }
    }

    let usage = session.usage();
    info!(
        session = %session.id().short(),
        input_tokens = usage.total().input_tokens,
        output_tokens = usage.total().output_tokens,
        calls = usage.call_count(),
        "token usage"
    );

    Ok(reply)
}

fn chat_error(e: ChatError) -> ColloquyError {
    ColloquyError::Chat(e.to_string())
}
