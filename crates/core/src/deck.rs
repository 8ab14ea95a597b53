use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{ClipdeckError, Result};

/// Receives slides in emission order. The executor never reads a sink back.
pub trait DeckSink {
    /// Full-bleed video with a poster frame; playback starts with no trigger delay.
    fn append_media_slide(&mut self, video: &Path, poster: &Path) -> Result<()>;

    /// Full-bleed still image.
    fn append_image_slide(&mut self, image: &Path) -> Result<()>;

    /// Speaker notes for the most recently appended slide.
    fn attach_note(&mut self, text: &str) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slide {
    Media {
        video: PathBuf,
        poster: PathBuf,
        trigger_delay_ms: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Image {
        image: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
}

impl Slide {
    pub fn notes(&self) -> Option<&str> {
        match self {
            Slide::Media { notes, .. } | Slide::Image { notes, .. } => notes.as_deref(),
        }
    }

    fn notes_mut(&mut self) -> &mut Option<String> {
        match self {
            Slide::Media { notes, .. } | Slide::Image { notes, .. } => notes,
        }
    }
}

/// A deck document, saved as pretty-printed JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

impl DeckSink for Deck {
    fn append_media_slide(&mut self, video: &Path, poster: &Path) -> Result<()> {
        self.slides.push(Slide::Media {
            video: video.to_path_buf(),
            poster: poster.to_path_buf(),
            trigger_delay_ms: 0,
            notes: None,
        });
        Ok(())
    }

    fn append_image_slide(&mut self, image: &Path) -> Result<()> {
        self.slides.push(Slide::Image {
            image: image.to_path_buf(),
            notes: None,
        });
        Ok(())
    }

    fn attach_note(&mut self, text: &str) -> Result<()> {
        let slide = self.slides.last_mut().ok_or(ClipdeckError::NoSlideForNote)?;
        *slide.notes_mut() = Some(text.to_string());
        Ok(())
    }
}

/// Load a deck to append to (the template)
pub async fn load_deck(path: &Path) -> Result<Deck> {
    let json_content = fs::read_to_string(path).await?;
    let deck: Deck = serde_json::from_str(&json_content)?;
    Ok(deck)
}

/// Save a deck to a file
pub async fn save_deck(deck: &Deck, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(deck)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_attach_to_the_last_slide() {
        let mut deck = Deck::new();
        deck.append_media_slide(Path::new("a.mp4"), Path::new("a.jpg")).unwrap();
        deck.append_image_slide(Path::new("b.jpg")).unwrap();
        deck.attach_note("hello there").unwrap();

        assert_eq!(deck.slides[0].notes(), None);
        assert_eq!(deck.slides[1].notes(), Some("hello there"));
    }

    #[test]
    fn note_without_slide_is_an_error() {
        let mut deck = Deck::new();
        assert!(matches!(
            deck.attach_note("orphan"),
            Err(ClipdeckError::NoSlideForNote)
        ));
    }

    #[test]
    fn media_slides_start_without_delay() {
        let mut deck = Deck::new();
        deck.append_media_slide(Path::new("a.mp4"), Path::new("a.jpg")).unwrap();
        let json = serde_json::to_value(&deck).unwrap();
        assert_eq!(json["slides"][0]["kind"], "media");
        assert_eq!(json["slides"][0]["trigger_delay_ms"], 0);
        assert!(json["slides"][0].get("notes").is_none());
    }

    #[tokio::test]
    async fn saved_deck_loads_back_as_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.deck.json");

        let mut deck = Deck::new();
        deck.append_image_slide(Path::new("title.jpg")).unwrap();
        deck.attach_note("welcome").unwrap();
        save_deck(&deck, &path).await.unwrap();

        assert_eq!(load_deck(&path).await.unwrap(), deck);
    }
}
