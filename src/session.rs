use crate::assets::AssetLocator;
use crate::catalog::Catalog;
use crate::navigation::NavigationState;
use crate::screen;
use crate::speech::{select_voice, SpeechService, Speaker, TARGET_LANG};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// 1-based number as shown on screen.
    Pick(usize),
    Back,
    Home,
    Flip,
    Next,
    Prev,
    SpeakWord,
    SpeakLetter,
    Voices,
    Redraw,
    Help,
    Quit,
}

impl Commands {
    fn help(out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "Available commands:")?;
        writeln!(out, "  <number> - Open a category, or a card inside a category")?;
        writeln!(out, "  \\b       - Close the card, or go back to the categories")?;
        writeln!(out, "  \\m       - Go back to the categories")?;
        writeln!(out, "  \\f       - Flip the open card")?;
        writeln!(out, "  \\n / \\p  - Next / previous card")?;
        writeln!(out, "  \\s       - Speak the Marathi word")?;
        writeln!(out, "  \\l       - Speak the first letter")?;
        writeln!(out, "  \\v       - List speech voices")?;
        writeln!(out, "  \\h       - Show this help message")?;
        writeln!(out, "  \\q       - Quit")
    }
}

impl FromStr for Commands {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Commands::Redraw),
            "\\b" => Ok(Commands::Back),
            "\\m" => Ok(Commands::Home),
            "\\f" => Ok(Commands::Flip),
            "\\n" => Ok(Commands::Next),
            "\\p" => Ok(Commands::Prev),
            "\\s" => Ok(Commands::SpeakWord),
            "\\l" => Ok(Commands::SpeakLetter),
            "\\v" => Ok(Commands::Voices),
            "\\h" => Ok(Commands::Help),
            "\\q" => Ok(Commands::Quit),
            _ if s.starts_with('\\') => Err("Unknown command".to_string()),
            _ => match s.parse::<usize>() {
                Ok(0) => Err("Numbers start at 1".to_string()),
                Ok(n) => Ok(Commands::Pick(n)),
                Err(_) => Err(format!("Expected a number or a command, got '{}'", s)),
            },
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

/// One interactive viewing session over a loaded catalog.
pub struct Session<S> {
    catalog: Catalog,
    nav: NavigationState,
    assets: AssetLocator,
    speaker: Speaker<S>,
}

impl<S: SpeechService> Session<S> {
    pub fn new(catalog: Catalog, assets: AssetLocator, speaker: Speaker<S>) -> Self {
        Self {
            catalog,
            nav: NavigationState::new(),
            assets,
            speaker,
        }
    }

    #[cfg(test)]
    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    /// Starts on a category screen instead of home. Returns false for unknown names.
    pub fn open_category(&mut self, name: &str) -> bool {
        if self.catalog.category(name).is_none() {
            return false;
        }
        self.nav.select_category(name);
        true
    }

    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        self.draw(&mut out)?;

        let mut lines = input.lines();
        loop {
            write!(out, "|> ")?;
            out.flush().context("Failed to flush stdout")?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break Ok(());
            };
            let line = line.context("Failed to read line from stdin")?;

            match Commands::from_str(line.trim()) {
                Ok(command) => {
                    if let Flow::Quit = self.handle(command, &mut out)? {
                        writeln!(out, "Quitting...")?;
                        break Ok(());
                    }
                }
                Err(e) => {
                    writeln!(out, "Invalid input: {}. Type \\h for help.", e)?;
                }
            }
        }
    }

    fn draw(&self, out: &mut impl Write) -> Result<()> {
        screen::render(out, &self.catalog, &self.nav, &self.assets)
            .context("Failed to draw screen")
    }

    fn handle(&mut self, command: Commands, out: &mut impl Write) -> Result<Flow> {
        match command {
            Commands::Pick(n) => self.pick(n - 1, out)?,
            Commands::Back => {
                if self.nav.active_card_index().is_some() {
                    self.nav.close_card();
                } else if !self.nav.is_home() {
                    self.nav.go_home();
                }
                self.draw(out)?;
            }
            Commands::Home => {
                self.nav.go_home();
                self.draw(out)?;
            }
            Commands::Flip => match self.nav.toggle_flip() {
                Ok(()) => self.draw(out)?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Commands::Next | Commands::Prev => {
                // Navigation controls only exist while a non-empty category has an open card.
                if self.nav.filtered_cards(&self.catalog).is_empty() {
                    writeln!(out, "Nothing to navigate here.")?;
                    return Ok(Flow::Continue);
                }
                let moved = if command == Commands::Next {
                    self.nav.next(&self.catalog)
                } else {
                    self.nav.prev(&self.catalog)
                };
                match moved {
                    Ok(()) => self.draw(out)?,
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            Commands::SpeakWord | Commands::SpeakLetter => {
                let Some(card) = self.nav.active_card(&self.catalog) else {
                    writeln!(out, "Open a card first.")?;
                    return Ok(Flow::Continue);
                };
                let text = if command == Commands::SpeakWord {
                    card.marathi.clone()
                } else {
                    card.first_letter.clone()
                };
                match self.speaker.speak(&text) {
                    Some(utterance) => writeln!(out, "🔊 {} ({})", utterance.text, utterance.lang)?,
                    None => writeln!(out, "🔇 {} (speech unavailable)", text)?,
                }
            }
            Commands::Voices => self.list_voices(out)?,
            Commands::Redraw => self.draw(out)?,
            Commands::Help => Commands::help(out)?,
            Commands::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn pick(&mut self, index: usize, out: &mut impl Write) -> Result<()> {
        if self.nav.is_home() {
            let Some(category) = self.catalog.categories().get(index) else {
                writeln!(out, "No category {}.", index + 1)?;
                return Ok(());
            };
            let name = category.name.clone();
            self.nav.select_category(name);
            return self.draw(out);
        }

        match self.nav.open_card(&self.catalog, index) {
            Ok(()) => self.draw(out),
            Err(e) => {
                writeln!(out, "{}", e)?;
                Ok(())
            }
        }
    }

    fn list_voices(&mut self, out: &mut impl Write) -> Result<()> {
        if !self.speaker.is_available() {
            writeln!(out, "Speech is not available on this system.")?;
            return Ok(());
        }

        let voices = self.speaker.voices();
        let chosen = select_voice(&voices);
        for voice in &voices {
            let marker = if Some(voice) == chosen { "*" } else { " " };
            writeln!(out, " {} {:<10} {}", marker, voice.lang, voice.name)?;
        }
        match chosen {
            Some(voice) => writeln!(out, "Speaking with {} ({}).", voice.name, voice.lang)?,
            None => writeln!(
                out,
                "No Marathi or Hindi voice installed; requesting {} from the default voice.",
                TARGET_LANG
            )?,
        }
        Ok(())
    }
}
