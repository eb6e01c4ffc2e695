//! Voice configuration loaded from `config/voice.toml` and the environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | GRAMSETU_VOICE_CONFIG | config/voice | Config file path (extension optional). |
//! | GRAMSETU_VOICE__CONTEXT | generic | generic \| customer_dashboard \| provider_dashboard |
//! | GRAMSETU_VOICE__MODE | command | command \| dictation |
//! | GRAMSETU_VOICE__MATCH_MODE | substring | substring \| whole_word |
//! | GRAMSETU_VOICE__LISTEN_TIMEOUT_SECS | unset | Stop listening after N seconds without a transcript. |
//! | GRAMSETU_VOICE__SPEECH_LANG | en-US | Language tag for example playback. |
//! | GRAMSETU_VOICE__SPEECH_RATE | 0.8 | Playback rate. |
//! | GRAMSETU_VOICE__RULES_PATH | unset | TOML file with extra keyword rules. |

use crate::controller::DispatchMode;
use crate::error::{VoiceError, VoiceResult};
use crate::synthesis::{DEFAULT_SPEECH_LANG, DEFAULT_SPEECH_RATE};
use gramsetu_intent::{CommandClassifier, MatchMode, RuleTable, VocabularyContext};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Upper bound for `listen_timeout_secs` (one day).
pub const MAX_LISTEN_TIMEOUT_SECS: u64 = 86_400;

fn default_speech_lang() -> String {
    DEFAULT_SPEECH_LANG.to_string()
}

fn default_speech_rate() -> f32 {
    DEFAULT_SPEECH_RATE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default)]
    pub context: VocabularyContext,
    #[serde(default)]
    pub mode: DispatchMode,
    #[serde(default)]
    pub match_mode: MatchMode,
    /// No timeout when unset; listening ends only on stop or transcript.
    #[serde(default)]
    pub listen_timeout_secs: Option<u64>,
    #[serde(default = "default_speech_lang")]
    pub speech_lang: String,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            context: VocabularyContext::default(),
            mode: DispatchMode::default(),
            match_mode: MatchMode::default(),
            listen_timeout_secs: None,
            speech_lang: default_speech_lang(),
            speech_rate: default_speech_rate(),
            rules_path: None,
        }
    }
}

impl VoiceConfig {
    /// Load config from file and environment. Precedence: env > file > defaults.
    pub fn load() -> VoiceResult<Self> {
        let config_path = std::env::var("GRAMSETU_VOICE_CONFIG").unwrap_or_else(|_| "config/voice".to_string());
        let built = Self::defaults_builder()?
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("GRAMSETU_VOICE").separator("__"))
            .build()?;
        let cfg: Self = built.try_deserialize()?;
        cfg.validate()?;
        info!("Voice config loaded ({}, {:?}, {})", cfg.context, cfg.mode, cfg.match_mode);
        Ok(cfg)
    }

    /// Parse a TOML document over the defaults, without consulting the environment.
    pub fn from_toml_str(source: &str) -> VoiceResult<Self> {
        let built = Self::defaults_builder()?
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        let cfg: Self = built.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn defaults_builder() -> VoiceResult<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("context", VocabularyContext::default().as_str())?
            .set_default("mode", "command")?
            .set_default("match_mode", MatchMode::default().as_str())?
            .set_default("speech_lang", DEFAULT_SPEECH_LANG)?
            .set_default("speech_rate", DEFAULT_SPEECH_RATE as f64)?)
    }

    pub fn validate(&self) -> VoiceResult<()> {
        if !self.speech_rate.is_finite() || self.speech_rate <= 0.0 || self.speech_rate > 10.0 {
            return Err(VoiceError::Invalid(format!(
                "speech_rate must be in (0, 10], got {}",
                self.speech_rate
            )));
        }
        match self.listen_timeout_secs {
            Some(0) => {
                return Err(VoiceError::Invalid(
                    "listen_timeout_secs must be positive; omit it to disable the timeout".to_string(),
                ));
            }
            Some(secs) if secs > MAX_LISTEN_TIMEOUT_SECS => {
                return Err(VoiceError::Invalid(format!(
                    "listen_timeout_secs must be at most {}, got {}",
                    MAX_LISTEN_TIMEOUT_SECS, secs
                )));
            }
            _ => {}
        }
        if self.speech_lang.trim().is_empty() {
            return Err(VoiceError::Invalid("speech_lang must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn listen_timeout(&self) -> Option<Duration> {
        self.listen_timeout_secs.map(Duration::from_secs)
    }

    /// Built-in rule table plus the overlays in `rules_path`, compiled with `match_mode`.
    pub fn build_classifier(&self) -> VoiceResult<CommandClassifier> {
        let mut table = RuleTable::builtin();
        if let Some(path) = &self.rules_path {
            let source = std::fs::read_to_string(path)?;
            table = table.with_toml_overlays(&source)?;
            info!("Loaded rule overlays from {}", path.display());
        }
        Ok(CommandClassifier::new(&table, self.match_mode)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = VoiceConfig::default();
        assert_eq!(c.context, VocabularyContext::Generic);
        assert_eq!(c.mode, DispatchMode::Command);
        assert_eq!(c.match_mode, MatchMode::Substring);
        assert_eq!(c.listen_timeout(), None);
        assert_eq!(c.speech_lang, "en-US");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn toml_overrides_defaults() {
        let c = VoiceConfig::from_toml_str(
            r#"
            context = "provider_dashboard"
            match_mode = "whole_word"
            listen_timeout_secs = 8
            "#,
        )
        .unwrap();
        assert_eq!(c.context, VocabularyContext::ProviderDashboard);
        assert_eq!(c.match_mode, MatchMode::WholeWord);
        assert_eq!(c.listen_timeout(), Some(Duration::from_secs(8)));
        assert_eq!(c.mode, DispatchMode::Command);
        assert!((c.speech_rate - 0.8).abs() < 1e-6);
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(VoiceConfig::from_toml_str("").unwrap(), VoiceConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            VoiceConfig::from_toml_str("speech_rate = 0.0"),
            Err(VoiceError::Invalid(_))
        ));
        assert!(matches!(
            VoiceConfig::from_toml_str("listen_timeout_secs = 0"),
            Err(VoiceError::Invalid(_))
        ));
        assert!(matches!(
            VoiceConfig::from_toml_str("listen_timeout_secs = 9223372036854775807"),
            Err(VoiceError::Invalid(_))
        ));
        assert!(matches!(
            VoiceConfig::from_toml_str("context = \"admin_panel\""),
            Err(VoiceError::Config(_))
        ));
    }

    #[test]
    fn timeout_bound_is_inclusive() {
        let c = VoiceConfig::from_toml_str("listen_timeout_secs = 86400").unwrap();
        assert_eq!(c.listen_timeout(), Some(Duration::from_secs(MAX_LISTEN_TIMEOUT_SECS)));

        let c = VoiceConfig {
            listen_timeout_secs: Some(MAX_LISTEN_TIMEOUT_SECS + 1),
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(VoiceError::Invalid(_))));
    }

    #[test]
    fn missing_rules_file_is_an_io_error() {
        let c = VoiceConfig {
            rules_path: Some(PathBuf::from("/nonexistent/gramsetu/rules.toml")),
            ..Default::default()
        };
        assert!(matches!(c.build_classifier(), Err(VoiceError::Io(_))));
    }
}
