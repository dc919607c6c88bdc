//! Speech output trait

use async_trait::async_trait;

use crate::Result;

/// Text-to-speech sink
///
/// The controller only ever passes text that has already been through
/// the speech formatter.
#[async_trait]
pub trait SpeechOutput: Send + Sync + 'static {
    /// Speak a line; returns once it was spoken or interrupted
    async fn say(&self, text: &str, allow_interruptions: bool) -> Result<()>;
}
