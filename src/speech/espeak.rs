use super::{SpeechError, SpeechService, Utterance, Voice};
use std::io::Write;
use std::process::{Child, Command, Stdio};

const PROGRAMS: [&str; 2] = ["espeak-ng", "espeak"];
const DEFAULT_WPM: f32 = 175.0;
const DEFAULT_PITCH: f32 = 50.0;

/// Speech through the `espeak-ng` command line synthesizer.
///
/// The running synthesizer process is owned here so it can be killed when the
/// next utterance starts.
#[derive(Debug)]
pub struct EspeakService {
    program: &'static str,
    current: Option<Child>,
}

impl EspeakService {
    /// `None` when no synthesizer executable can be started on this host.
    pub fn detect() -> Option<Self> {
        PROGRAMS.iter().find_map(|&program| {
            let available = Command::new(program)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false);

            if available {
                log::debug!("using {} for speech", program);
                Some(Self {
                    program,
                    current: None,
                })
            } else {
                None
            }
        })
    }
}

impl SpeechService for EspeakService {
    fn list_voices(&mut self) -> Result<Vec<Voice>, SpeechError> {
        let output = Command::new(self.program)
            .arg("--voices")
            .output()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(SpeechError::Failed {
                program: self.program.to_string(),
                status: output.status.to_string(),
            });
        }

        Ok(parse_voice_table(&String::from_utf8_lossy(&output.stdout)))
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.cancel()?;

        let mut child = Command::new(self.program)
            .args(speak_args(utterance))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.to_string(),
                source,
            })?;

        // Text goes through stdin so catalog text is never read as an option.
        let stdin = child.stdin.take();
        self.current = Some(child);
        if let Some(mut stdin) = stdin {
            stdin.write_all(utterance.text.as_bytes())?;
        }
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), SpeechError> {
        if let Some(mut child) = self.current.take() {
            if child.try_wait()?.is_none() {
                child.kill()?;
                child.wait()?;
            }
        }
        Ok(())
    }
}

impl Drop for EspeakService {
    fn drop(&mut self) {
        let _ = self.cancel();
    }
}

fn speak_args(utterance: &Utterance) -> Vec<String> {
    let voice = utterance
        .voice
        .as_ref()
        .map_or(utterance.lang.as_str(), |v| v.lang.as_str())
        .to_lowercase();
    let wpm = (DEFAULT_WPM * utterance.rate).round() as u32;
    let pitch = (DEFAULT_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as u32;

    vec![
        "-v".to_string(),
        voice,
        "-s".to_string(),
        wpm.to_string(),
        "-p".to_string(),
        pitch.to_string(),
        "--stdin".to_string(),
    ]
}

/// Parses the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  mr              --/M      Marathi            inc/mr
/// ```
fn parse_voice_table(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            match columns.as_slice() {
                [_pty, lang, _age_gender, name, ..] => {
                    Some(Voice::new(*name, normalize_lang_tag(lang)))
                }
                _ => None,
            }
        })
        .collect()
}

/// `en-us` -> `en-US`; two-letter region subtags are uppercased, the rest lowercased.
///
/// Subtags after a singleton such as `x` are extensions and stay lowercase.
fn normalize_lang_tag(tag: &str) -> String {
    let mut in_extension = false;
    tag.split('-')
        .enumerate()
        .map(|(i, part)| {
            if part.len() == 1 {
                in_extension = true;
            }
            let is_region = i > 0
                && !in_extension
                && part.len() == 2
                && part.chars().all(|c| c.is_ascii_alphabetic());
            if is_region {
                part.to_ascii_uppercase()
            } else {
                part.to_ascii_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{build_utterance, select_voice};

    const VOICES: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  en-us           --/M      English_(America)  gmw/en-US            (en 10)
 5  hi              --/M      Hindi              inc/hi
 5  mr              --/M      Marathi            inc/mr
";

    #[test]
    fn test_parse_voice_table() {
        let voices = parse_voice_table(VOICES);
        assert_eq!(
            voices,
            vec![
                Voice::new("English_(America)", "en-US"),
                Voice::new("Hindi", "hi"),
                Voice::new("Marathi", "mr"),
            ]
        );
    }

    #[test]
    fn test_parse_skips_blank_and_short_lines() {
        assert!(parse_voice_table("\n  \n 5 xx\n").is_empty());
    }

    #[test]
    fn test_espeak_voices_feed_selection() {
        let voices = parse_voice_table(VOICES);
        assert_eq!(select_voice(&voices).unwrap().name, "Marathi");
    }

    #[test]
    fn test_normalize_lang_tag() {
        assert_eq!(normalize_lang_tag("en-us"), "en-US");
        assert_eq!(normalize_lang_tag("MR"), "mr");
        assert_eq!(normalize_lang_tag("en-gb-x-rp"), "en-GB-x-rp");
        assert_eq!(normalize_lang_tag("zh-yue"), "zh-yue");
    }

    #[test]
    fn test_normalize_keeps_extension_subtags_lowercase() {
        assert_eq!(normalize_lang_tag("en-gb-x-rp"), "en-GB-x-rp");
        assert_eq!(normalize_lang_tag("mr-in-u-nu-deva"), "mr-IN-u-nu-deva");
        assert_eq!(normalize_lang_tag("x-ab"), "x-ab");
    }

    #[test]
    fn test_speak_args_never_carry_text() {
        let utterance = build_utterance("-v", &[Voice::new("Marathi", "mr")]);
        let args = speak_args(&utterance);
        assert_eq!(args.last().map(String::as_str), Some("--stdin"));
        assert_eq!(args.iter().filter(|a| a.as_str() == "-v").count(), 1);
    }

    #[test]
    fn test_speak_args_scale_rate_and_pitch() {
        let utterance = build_utterance("आई", &[Voice::new("Marathi", "mr")]);
        assert_eq!(
            speak_args(&utterance),
            vec!["-v", "mr", "-s", "140", "-p", "55", "--stdin"]
        );
    }

    #[test]
    fn test_speak_args_without_voice_use_target_locale() {
        let utterance = build_utterance("आई", &[]);
        assert_eq!(&speak_args(&utterance)[..2], &["-v", "mr-in"]);
    }
}
