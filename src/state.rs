// Study Relay - application state
//
// Everything in here is built once at startup and never mutated; handlers
// receive a clone per request.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::relay::FileRelay;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gemini: GeminiClient,
    pub relay: FileRelay,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let gemini = GeminiClient::new(&config)?;
        let relay = FileRelay::new(gemini.clone(), config.scratch_dir.clone());

        tracing::info!(
            model = %config.model,
            variant = config.variant.as_str(),
            "AppState initialised"
        );

        Ok(Self {
            config: Arc::new(config),
            gemini,
            relay,
            start_time: Instant::now(),
        })
    }
}
