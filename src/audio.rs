//! Sound cue playback and background music
//!
//! Cues are simple synthesized tones; the sink behind the manager decides how
//! (or whether) they are actually produced. Music is a looping note sequence
//! the host advances with wall time. Playback never feeds back into the
//! simulation.

use crate::Settings;
use crate::sim::{GameEvent, SoundCue};

/// One synthesized beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub duration_ms: u32,
    /// Cue-relative loudness (0.0 - 1.0), before volume settings
    pub volume: f32,
}

impl Tone {
    const fn new(freq_hz: f32, duration_ms: u32, volume: f32) -> Self {
        Self {
            freq_hz,
            duration_ms,
            volume,
        }
    }
}

/// Tone a cue is rendered as
pub fn tone(cue: SoundCue) -> Tone {
    match cue {
        SoundCue::Move => Tone::new(392.0, 50, 0.3),
        SoundCue::Select => Tone::new(600.0, 70, 0.4),
        SoundCue::Jump => Tone::new(784.0, 80, 0.35),
        SoundCue::Coin => Tone::new(1046.0, 80, 0.3),
        SoundCue::Stomp => Tone::new(523.0, 60, 0.4),
        SoundCue::Hurt => Tone::new(262.0, 120, 0.5),
        SoundCue::Pause => Tone::new(600.0, 50, 0.3),
        SoundCue::GameOver => Tone::new(130.0, 1000, 0.5),
        SoundCue::Victory => Tone::new(1200.0, 800, 0.5),
    }
}

/// A looping sequence of `(freq_hz, duration_ms)` notes. A frequency of 0
/// is a rest.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicTrack {
    notes: Vec<(f32, u32)>,
    /// Silence before the sequence repeats
    loop_gap_ms: u32,
    /// Track-relative loudness (0.0 - 1.0)
    volume: f32,
}

impl MusicTrack {
    /// Every step lasts at least 1 ms, so a looping track always advances
    pub fn new(notes: Vec<(f32, u32)>, loop_gap_ms: u32, volume: f32) -> Self {
        Self {
            notes: notes.into_iter().map(|(f, ms)| (f.max(0.0), ms.max(1))).collect(),
            loop_gap_ms: loop_gap_ms.max(1),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// The map theme, played while the game runs
    pub fn overworld_theme() -> Self {
        Self::new(
            vec![
                (659.0, 150),
                (659.0, 150),
                (0.0, 100),
                (659.0, 150),
                (0.0, 100),
                (523.0, 150),
                (659.0, 150),
                (587.0, 300),
                (0.0, 150),
                (494.0, 150),
                (0.0, 150),
                (523.0, 150),
                (0.0, 150),
                (392.0, 300),
                (0.0, 300),
            ],
            100,
            0.25,
        )
    }

    /// Steps in one loop: every note, then the gap
    fn len(&self) -> usize {
        self.notes.len() + 1
    }

    fn step(&self, index: usize) -> (f32, u32) {
        self.notes
            .get(index)
            .copied()
            .unwrap_or((0.0, self.loop_gap_ms))
    }
}

/// Playback position within a track
#[derive(Debug, Clone)]
struct MusicPlayer {
    track: MusicTrack,
    index: usize,
    /// Time left on the current step
    remaining_ms: f32,
}

/// Output device for tones. Fire-and-forget: failures stay inside the sink.
pub trait AudioSink {
    fn play_tone(&mut self, tone: Tone, volume: f32);
}

/// Sink that only logs what it would play
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play_tone(&mut self, tone: Tone, volume: f32) {
        log::debug!(
            "tone {:.0} Hz for {} ms at {:.2}",
            tone.freq_hz,
            tone.duration_ms,
            volume
        );
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music: Option<MusicPlayer>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(sink: Option<Box<dyn AudioSink>>) -> Self {
        if sink.is_none() {
            log::warn!("No audio sink available - audio disabled");
        }
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music: None,
        }
    }

    /// Manager with volumes taken from settings
    pub fn from_settings(settings: &Settings, sink: Option<Box<dyn AudioSink>>) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Muting also stops any music
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_music();
        }
    }

    pub fn is_available(&self) -> bool {
        self.sink.is_some()
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music.is_some()
    }

    /// Start `track` from its first note, replacing any current music
    pub fn start_music(&mut self, track: MusicTrack) {
        if self.muted || self.sink.is_none() {
            log::debug!("Music not started: audio muted or unavailable");
            return;
        }
        let (freq_hz, duration_ms) = track.step(0);
        let volume = track.volume;
        self.music = Some(MusicPlayer {
            track,
            index: 0,
            remaining_ms: duration_ms as f32,
        });
        self.play_note(freq_hz, duration_ms, volume);
    }

    pub fn stop_music(&mut self) {
        if self.music.take().is_some() {
            log::debug!("Music stopped");
        }
    }

    /// Advance the music by `dt` seconds, playing every note that starts
    /// within that span. Rests play nothing; the track wraps after its gap.
    pub fn update_music(&mut self, dt: f32) {
        let Some(player) = self.music.as_mut() else { return };
        // At most one second per call
        player.remaining_ms -= dt.clamp(0.0, 1.0) * 1000.0;

        let mut started = Vec::new();
        while player.remaining_ms <= 0.0 {
            player.index = (player.index + 1) % player.track.len();
            let (freq_hz, duration_ms) = player.track.step(player.index);
            player.remaining_ms += duration_ms as f32;
            started.push((freq_hz, duration_ms));
        }
        let volume = player.track.volume;
        for (freq_hz, duration_ms) in started {
            self.play_note(freq_hz, duration_ms, volume);
        }
    }

    fn play_note(&mut self, freq_hz: f32, duration_ms: u32, volume: f32) {
        let vol = self.music_volume();
        if freq_hz <= 0.0 || vol <= 0.0 {
            return;
        }
        let Some(sink) = self.sink.as_mut() else { return };
        sink.play_tone(Tone::new(freq_hz, duration_ms, volume), volume * vol);
    }

    /// Play a cue
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = self.sink.as_mut() else { return };
        let tone = tone(cue);
        sink.play_tone(tone, tone.volume * vol);
    }

    /// Play the cue of every event that has one. A quit request stops the
    /// music.
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            if *event == GameEvent::QuitRequested {
                self.stop_music();
            }
            if let Some(cue) = event.cue() {
                self.play(cue);
            }
        }
    }
}
