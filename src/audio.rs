//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Cue tables are plain data so they can be checked without a browser.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Good order caught
    Collect,
    /// Attack caught
    Hit,
    LevelUp,
    /// Run started or resumed
    Start,
    GameOver,
}

impl SoundCue {
    /// Cue for a simulation event, if it has one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started => Some(SoundCue::Start),
            GameEvent::Collected { .. } => Some(SoundCue::Collect),
            GameEvent::Hit { .. } => Some(SoundCue::Hit),
            GameEvent::LevelUp { .. } => Some(SoundCue::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
            GameEvent::Paused | GameEvent::Restarted => None,
        }
    }

    /// Tones making up this cue
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundCue::Collect => COLLECT,
            SoundCue::Hit => HIT,
            SoundCue::LevelUp => LEVEL_UP,
            SoundCue::Start => START,
            SoundCue::GameOver => GAME_OVER,
        }
    }
}

// Two-note square chirp
const COLLECT: &[Tone] = &[
    Tone::new(740.0, 0.06, Waveform::Square, 0.08, 0.0),
    Tone::new(980.0, 0.06, Waveform::Square, 0.05, 0.0),
];
const HIT: &[Tone] = &[Tone::new(200.0, 0.12, Waveform::Sawtooth, 0.1, 0.0)];
const LEVEL_UP: &[Tone] = &[
    Tone::new(660.0, 0.08, Waveform::Triangle, 0.09, 0.0),
    Tone::new(880.0, 0.1, Waveform::Triangle, 0.09, 0.08),
];
const START: &[Tone] = &[Tone::new(520.0, 0.08, Waveform::Sine, 0.06, 0.0)];
// Falling two-step
const GAME_OVER: &[Tone] = &[
    Tone::new(300.0, 0.18, Waveform::Sawtooth, 0.12, 0.0),
    Tone::new(180.0, 0.22, Waveform::Sawtooth, 0.1, 0.16),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Seconds until the gain has decayed
    pub duration: f64,
    pub waveform: Waveform,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Start offset in seconds
    pub delay: f64,
}

impl Tone {
    const fn new(freq: f32, duration: f64, waveform: Waveform, gain: f32, delay: f64) -> Self {
        Self {
            freq,
            duration,
            waveform,
            gain,
            delay,
        }
    }
}

/// Floor of the exponential decay (the ramp target cannot be zero)
pub const SILENCE: f32 = 0.0001;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SILENCE, SoundCue, Tone, Waveform};

    impl From<Waveform> for OscillatorType {
        fn from(w: Waveform) -> Self {
            match w {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            }
        }
    }

    /// Audio manager for the game
    ///
    /// The context is created lazily on the first cue, which always follows a
    /// user gesture, so browsers do not block it.
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        failed: bool,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            Self {
                ctx: None,
                failed: false,
                volume: 0.8,
            }
        }

        /// Volume applied to cue gains (already includes mute)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        fn context(&mut self) -> Option<&AudioContext> {
            if self.ctx.is_none() && !self.failed {
                match AudioContext::new() {
                    Ok(ctx) => self.ctx = Some(ctx),
                    Err(e) => {
                        // May fail outside a secure context
                        log::warn!("Failed to create AudioContext - audio disabled: {e:?}");
                        self.failed = true;
                    }
                }
            }
            self.ctx.as_ref()
        }

        /// Create or resume the context from inside a user gesture handler
        pub fn unlock(&mut self) {
            if let Some(ctx) = self.context()
                && ctx.state() == web_sys::AudioContextState::Suspended
            {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&mut self, cue: SoundCue) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.context() else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in cue.tones() {
                play_tone(ctx, tone, vol);
            }
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, tone.freq, tone.waveform.into()) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;

        gain.gain().set_value_at_time(tone.gain * vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(SILENCE, t + tone.duration)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.duration).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cues() {
        assert_eq!(
            SoundCue::from_event(&GameEvent::Collected { score: 10 }),
            Some(SoundCue::Collect)
        );
        assert_eq!(
            SoundCue::from_event(&GameEvent::GameOver { score: 0, level: 1 }),
            Some(SoundCue::GameOver)
        );
        assert_eq!(SoundCue::from_event(&GameEvent::Paused), None);
        assert_eq!(SoundCue::from_event(&GameEvent::Restarted), None);
    }

    #[test]
    fn test_tone_tables() {
        let level = SoundCue::LevelUp.tones();
        assert_eq!(level.len(), 2);
        assert_eq!(level[0].freq, 660.0);
        assert!((level[1].delay - 0.08).abs() < 1e-9);

        let over = SoundCue::GameOver.tones();
        assert_eq!(over[1].freq, 180.0);
        assert!((over[1].delay - 0.16).abs() < 1e-9);

        for cue in [
            SoundCue::Collect,
            SoundCue::Hit,
            SoundCue::LevelUp,
            SoundCue::Start,
            SoundCue::GameOver,
        ] {
            for tone in cue.tones() {
                assert!(tone.gain > SILENCE && tone.gain <= 0.12);
                assert!(tone.duration > 0.0);
            }
        }
    }
}
