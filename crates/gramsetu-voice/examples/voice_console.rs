//! Voice Console: type transcripts in place of a microphone.
//!
//! Each line is one listening turn: the controller starts, receives the line as the
//! finalized transcript, dispatches one intent, and returns to idle.
//!
//! Settings come from `config/voice.toml` and `GRAMSETU_VOICE__*` (see `VoiceConfig`).
//! Console commands:
//! - `:ctx <generic|customer|provider>` switch vocabulary
//! - `:mode <command|dictation>` switch dispatch mode
//! - `:examples` list example phrases, `:say <n>` play one
//! - `:quit`

use gramsetu_intent::VocabularyContext;
use gramsetu_voice::{
    DispatchMode, ScriptedCapture, SpeechSynthesis, Utterance, VoiceConfig, VoiceSessionController,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Prints instead of speaking.
struct ConsoleSynthesis;

impl SpeechSynthesis for ConsoleSynthesis {
    fn speak(&self, utterance: &Utterance) {
        println!("🔊 [{} @ {:.1}] {}", utterance.lang, utterance.rate, utterance.text);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = VoiceConfig::load()?;
    let mut voice = VoiceSessionController::from_config(ScriptedCapture::new(), &config)?
        .with_synthesis(Arc::new(ConsoleSynthesis))
        .on_intent(|intent| match intent.tab() {
            Some(tab) => println!("➡️  navigate to tab '{}'", tab),
            None => println!("➡️  {}", intent),
        });

    info!("Voice Console ({}, {:?}). Type a phrase, or :quit.", voice.context(), voice.mode());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            ":quit" => break,
            ":ctx" => match arg.parse::<VocabularyContext>() {
                Ok(ctx) => {
                    voice.set_context(ctx)?;
                    info!("Vocabulary: {}", ctx);
                }
                Err(e) => warn!("{}", e),
            },
            ":mode" => match arg.parse::<DispatchMode>() {
                Ok(mode) => {
                    voice.set_mode(mode)?;
                    info!("Mode: {}", mode);
                }
                Err(e) => warn!("{}", e),
            },
            ":examples" => {
                for (i, phrase) in voice.example_phrases().iter().enumerate() {
                    println!("  {}. {}", i, phrase);
                }
            }
            ":say" => {
                let played = arg.parse::<usize>().map(|i| voice.speak_example(i)).unwrap_or(false);
                if !played {
                    warn!("No example phrase '{}'", arg);
                }
            }
            _ => {
                if let Err(e) = voice.start_listening() {
                    warn!("Cannot listen: {}", e);
                    continue;
                }
                if let Err(e) = voice.on_transcript_finalized(line) {
                    warn!("Transcript rejected: {}", e);
                }
            }
        }
    }

    voice.stop_listening()?;
    Ok(())
}
