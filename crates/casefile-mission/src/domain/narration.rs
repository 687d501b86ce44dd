//! Narration channel selection.

use serde::{Deserialize, Serialize};

use super::model::Scene;

/// Which narration track a scene plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationChannel {
    /// Regular narration.
    #[default]
    Standard,
    /// Extended narration for visually impaired players.
    Extended,
}

impl NarrationChannel {
    /// Maps the accessibility preference onto a channel.
    #[must_use]
    pub fn from_accessibility(enabled: bool) -> Self {
        if enabled { Self::Extended } else { Self::Standard }
    }

    /// Returns `true` for the extended channel.
    #[must_use]
    pub fn is_extended(self) -> bool {
        matches!(self, Self::Extended)
    }
}

impl Scene {
    /// The narration track this scene plays on `channel`.
    ///
    /// Extended falls back to standard narration; standard never falls back
    /// to extended.
    #[must_use]
    pub fn narration(&self, channel: NarrationChannel) -> Option<&str> {
        match channel {
            NarrationChannel::Standard => self.audio.as_deref(),
            NarrationChannel::Extended => self
                .extended_audio
                .as_deref()
                .or(self.audio.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_channel_uses_audio_only() {
        let scene = Scene::new(1, "S1").with_extended_audio("long.mp3");

        assert_eq!(scene.narration(NarrationChannel::Standard), None);
    }

    #[test]
    fn test_extended_channel_prefers_extended_audio() {
        let scene = Scene::new(1, "S1")
            .with_audio("short.mp3")
            .with_extended_audio("long.mp3");

        assert_eq!(scene.narration(NarrationChannel::Extended), Some("long.mp3"));
        assert_eq!(scene.narration(NarrationChannel::Standard), Some("short.mp3"));
    }

    #[test]
    fn test_extended_channel_falls_back_to_audio() {
        let scene = Scene::new(1, "S1").with_audio("short.mp3");

        assert_eq!(scene.narration(NarrationChannel::Extended), Some("short.mp3"));
    }

    #[test]
    fn test_from_accessibility() {
        assert_eq!(
            NarrationChannel::from_accessibility(true),
            NarrationChannel::Extended
        );
        assert!(!NarrationChannel::from_accessibility(false).is_extended());
    }
}
