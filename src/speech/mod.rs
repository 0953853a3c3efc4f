use thiserror::Error;

mod espeak;

pub use espeak::EspeakService;

/// Locale requested when no Marathi or Hindi voice is installed.
pub const TARGET_LANG: &str = "mr-IN";
pub const SPEECH_RATE: f32 = 0.8;
pub const SPEECH_PITCH: f32 = 1.1;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("speech process error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<Voice>,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

/// Host text-to-speech engine.
///
/// At most one utterance plays at a time; `speak` replaces whatever is playing.
pub trait SpeechService {
    /// May be empty while the host is still discovering voices.
    fn list_voices(&mut self) -> Result<Vec<Voice>, SpeechError>;
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;
    fn cancel(&mut self) -> Result<(), SpeechError>;
}

enum LangMatch {
    Exact(&'static str),
    Prefix(&'static str),
}

impl LangMatch {
    fn matches(&self, lang: &str) -> bool {
        match self {
            LangMatch::Exact(tag) => lang == *tag,
            LangMatch::Prefix(prefix) => lang.starts_with(prefix),
        }
    }
}

const VOICE_PREFERENCE: [LangMatch; 4] = [
    LangMatch::Exact("mr-IN"),
    LangMatch::Prefix("mr"),
    LangMatch::Exact("hi-IN"),
    LangMatch::Prefix("hi"),
];

/// First voice matching the earliest rule in the preference order.
pub fn select_voice(voices: &[Voice]) -> Option<&Voice> {
    VOICE_PREFERENCE
        .iter()
        .find_map(|rule| voices.iter().find(|voice| rule.matches(&voice.lang)))
}

pub fn build_utterance(text: &str, voices: &[Voice]) -> Utterance {
    let voice = select_voice(voices).cloned();
    let lang = voice
        .as_ref()
        .map(|v| v.lang.clone())
        .unwrap_or_else(|| TARGET_LANG.to_string());

    Utterance {
        text: text.to_string(),
        voice,
        lang,
        rate: SPEECH_RATE,
        pitch: SPEECH_PITCH,
    }
}

/// Speaks through an optional host service. Without one, every call is a no-op.
pub struct Speaker<S> {
    service: Option<S>,
}

impl<S: SpeechService> Speaker<S> {
    pub fn new(service: Option<S>) -> Self {
        Self { service }
    }

    pub fn is_available(&self) -> bool {
        self.service.is_some()
    }

    #[cfg(test)]
    pub fn service(&self) -> Option<&S> {
        self.service.as_ref()
    }

    pub fn voices(&mut self) -> Vec<Voice> {
        let Some(service) = self.service.as_mut() else {
            return Vec::new();
        };
        service.list_voices().unwrap_or_else(|e| {
            log::warn!("could not list voices: {}", e);
            Vec::new()
        })
    }

    /// Returns the utterance handed to the host, or `None` when there is no host.
    pub fn speak(&mut self, text: &str) -> Option<Utterance> {
        let Some(service) = self.service.as_mut() else {
            log::debug!("speech unavailable, ignoring '{}'", text);
            return None;
        };

        if let Err(e) = service.cancel() {
            log::warn!("could not cancel previous utterance: {}", e);
        }

        // Re-queried every time: the host may still be populating its list.
        let voices = service.list_voices().unwrap_or_else(|e| {
            log::warn!("could not list voices: {}", e);
            Vec::new()
        });

        let utterance = build_utterance(text, &voices);
        log::debug!(
            "speaking '{}' with {} ({})",
            utterance.text,
            utterance.voice.as_ref().map_or("host default", |v| v.name.as_str()),
            utterance.lang
        );

        if let Err(e) = service.speak(&utterance) {
            log::warn!("speech failed: {}", e);
        }
        Some(utterance)
    }
}
