//! Tessera Audio
//!
//! The capability a sound backend implements for the toolkit: a handle to a
//! loaded sound that can be played, stopped and have its volume changed.
//! Decoding and mixing belong to the backend.
//!
//! ```
//! use tessera_audio::{SilentSound, SoundHandle, Volume};
//!
//! let mut click = SilentSound::new("click.ogg");
//! click.play().unwrap();
//! click.set_volume(Volume::new(0.5).unwrap()).unwrap();
//! assert!(click.is_playing());
//! ```

mod volume;

pub use volume::Volume;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AudioError {
    /// Volume outside `0.0..=1.0`, or not a number.
    #[error("volume {0} is outside 0.0..=1.0")]
    InvalidVolume(f32),

    #[error("audio backend error: {0}")]
    Backend(String),
}

pub type AudioResult<T> = Result<T, AudioError>;

/// A piece of sound ready to be played.
pub trait SoundHandle {
    fn play(&mut self) -> AudioResult<()>;

    fn stop(&mut self) -> AudioResult<()>;

    /// Change the volume, also while the sound is playing.
    fn set_volume(&mut self, volume: Volume) -> AudioResult<()>;
}

/// A sound handle that plays nothing but tracks its state.
///
/// Used where no audio device is available, such as headless runs and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct SilentSound {
    name: String,
    playing: bool,
    volume: Volume,
    plays: u32,
}

impl SilentSound {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            playing: false,
            volume: Volume::MAX,
            plays: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// How often `play` was called.
    pub fn play_count(&self) -> u32 {
        self.plays
    }
}

impl SoundHandle for SilentSound {
    fn play(&mut self) -> AudioResult<()> {
        self.playing = true;
        self.plays += 1;
        tracing::trace!(sound = %self.name, "play");
        Ok(())
    }

    fn stop(&mut self) -> AudioResult<()> {
        self.playing = false;
        tracing::trace!(sound = %self.name, "stop");
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> AudioResult<()> {
        self.volume = volume;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_and_stop() {
        let mut sound = SilentSound::new("click");
        assert!(!sound.is_playing());

        sound.play().unwrap();
        sound.play().unwrap();
        assert!(sound.is_playing());
        assert_eq!(sound.play_count(), 2);

        sound.stop().unwrap();
        assert!(!sound.is_playing());
    }

    #[test]
    fn test_volume_changes_while_playing() {
        let mut sound = SilentSound::new("music");
        sound.play().unwrap();
        sound.set_volume(Volume::new(0.25).unwrap()).unwrap();
        assert_eq!(sound.volume().get(), 0.25);
        assert!(sound.is_playing());
    }

    #[test]
    fn test_handles_are_object_safe() {
        let mut sounds: Vec<Box<dyn SoundHandle>> = vec![
            Box::new(SilentSound::new("a")),
            Box::new(SilentSound::new("b")),
        ];
        for sound in &mut sounds {
            sound.play().unwrap();
            sound.set_volume(Volume::MIN).unwrap();
        }
    }
}
