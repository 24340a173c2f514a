/// Procedural cue synthesis. Every cue is a fixed list of tones rendered
/// offline into mono `f32` PCM; there is no recorded media.
use std::f64::consts::TAU;

use crate::schedule::SoundEffect;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Level an exponential decay ends on. Silence cannot be reached exponentially.
const DECAY_FLOOR: f64 = 0.001;
/// Linear attack time of a plucked tone.
const ATTACK_SECS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// One period sampled at `phase` in [0, 1).
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

/// Amplitude over the life of a tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// Rises linearly from 0 to `volume` over 50 ms, then decays exponentially
    /// to 0.001 at the end of the tone.
    Pluck { volume: f64 },
    /// Straight line from `from` to `to` over the tone.
    Fade { from: f64, to: f64 },
}

impl Envelope {
    /// Gain at `t` seconds into a tone lasting `duration` seconds.
    pub fn gain(&self, t: f64, duration: f64) -> f64 {
        if t < 0.0 || t > duration || duration <= 0.0 {
            return 0.0;
        }
        match *self {
            Envelope::Pluck { volume } => {
                if volume <= 0.0 {
                    return 0.0;
                }
                let attack = ATTACK_SECS.min(duration);
                if t < attack {
                    return volume * t / attack;
                }
                let decay = duration - attack;
                if decay <= 0.0 {
                    return volume;
                }
                volume * (DECAY_FLOOR / volume).powf((t - attack) / decay)
            }
            Envelope::Fade { from, to } => from + (to - from) * (t / duration),
        }
    }
}

/// Frequency over the life of a tone.
#[derive(Debug, Clone, PartialEq)]
pub enum Pitch {
    Fixed(f64),
    /// Piecewise-linear `(seconds, hz)` breakpoints, sorted by time. Before
    /// the first point the first frequency holds; after the last, the last.
    Ramp(Vec<(f64, f64)>),
}

impl Pitch {
    pub fn at(&self, t: f64) -> f64 {
        match self {
            Pitch::Fixed(hz) => *hz,
            Pitch::Ramp(points) => {
                let Some(&(t0, f0)) = points.first() else {
                    return 0.0;
                };
                if t <= t0 {
                    return f0;
                }
                for pair in points.windows(2) {
                    let (ta, fa) = pair[0];
                    let (tb, fb) = pair[1];
                    if t <= tb {
                        if tb <= ta {
                            return fb;
                        }
                        return fa + (fb - fa) * (t - ta) / (tb - ta);
                    }
                }
                points.last().map(|&(_, f)| f).unwrap_or(f0)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub pitch: Pitch,
    /// Offset from the start of the cue, in seconds.
    pub start: f64,
    pub duration: f64,
    pub envelope: Envelope,
}

impl Tone {
    /// A fixed-pitch tone with the pluck envelope.
    pub fn note(hz: f64, start: f64, duration: f64, waveform: Waveform, volume: f64) -> Self {
        Self {
            waveform,
            pitch: Pitch::Fixed(hz),
            start,
            duration,
            envelope: Envelope::Pluck { volume },
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A complete audio cue: a set of overlapping tones behind one master gain.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub master_gain: f64,
    pub tones: Vec<Tone>,
}

impl Cue {
    pub fn duration(&self) -> f64 {
        self.tones.iter().map(Tone::end).fold(0.0, f64::max)
    }

    /// Mixes every tone into one mono buffer at `sample_rate`, scaled by
    /// `volume` and clamped to [-1, 1].
    pub fn render(&self, sample_rate: u32, volume: f64) -> Vec<f32> {
        let rate = f64::from(sample_rate.max(1));
        let len = (self.duration() * rate).ceil() as usize;
        let mut mix = vec![0.0f64; len];

        for tone in &self.tones {
            let first = (tone.start * rate).round().max(0.0) as usize;
            let count = (tone.duration * rate).round() as usize;
            let mut phase = 0.0f64;
            for (i, slot) in mix.iter_mut().skip(first).take(count).enumerate() {
                let t = i as f64 / rate;
                *slot += tone.waveform.sample(phase) * tone.envelope.gain(t, tone.duration);
                phase = (phase + tone.pitch.at(t) / rate).fract();
            }
        }

        let gain = self.master_gain * volume.clamp(0.0, 1.0);
        mix.into_iter()
            .map(|s| (s * gain).clamp(-1.0, 1.0) as f32)
            .collect()
    }
}

/// The fixed tone sequence for each cue.
pub fn cue_for(effect: SoundEffect) -> Cue {
    match effect {
        // E major 7 arpeggio, slow and dreamy: end of the bathroom zone.
        SoundEffect::Chime => Cue {
            master_gain: 1.0,
            tones: vec![
                Tone::note(329.63, 0.0, 6.0, Waveform::Sine, 0.15),
                Tone::note(415.30, 0.4, 6.0, Waveform::Sine, 0.15),
                Tone::note(493.88, 0.8, 6.0, Waveform::Sine, 0.15),
                Tone::note(622.25, 1.2, 6.0, Waveform::Sine, 0.15),
                Tone::note(659.25, 1.6, 8.0, Waveform::Sine, 0.2),
            ],
        },
        // Trumpet-ish call: breakfast is over.
        SoundEffect::Fanfare => Cue {
            master_gain: 0.8,
            tones: vec![
                Tone::note(523.25, 0.0, 0.4, Waveform::Triangle, 0.2),
                Tone::note(523.25, 0.4, 0.4, Waveform::Triangle, 0.2),
                Tone::note(523.25, 0.8, 0.4, Waveform::Triangle, 0.2),
                Tone::note(659.25, 1.2, 1.2, Waveform::Triangle, 0.2),
                Tone::note(783.99, 2.4, 3.0, Waveform::Triangle, 0.25),
            ],
        },
        // Urgent two-note pulse, twelve times.
        SoundEffect::Warning => Cue {
            master_gain: 1.0,
            tones: (0..12)
                .flat_map(|i| {
                    let start = f64::from(i) * 0.4;
                    [
                        Tone::note(440.0, start, 0.2, Waveform::Square, 0.1),
                        Tone::note(349.23, start + 0.2, 0.2, Waveform::Square, 0.1),
                    ]
                })
                .collect(),
        },
        // Slow siren sweeping between A4 and A5.
        SoundEffect::Alarm => Cue {
            master_gain: 1.0,
            tones: vec![Tone {
                waveform: Waveform::Sawtooth,
                pitch: Pitch::Ramp(vec![
                    (0.0, 440.0),
                    (2.0, 880.0),
                    (4.0, 440.0),
                    (6.0, 880.0),
                    (8.0, 440.0),
                ]),
                start: 0.0,
                duration: 8.0,
                envelope: Envelope::Fade { from: 0.1, to: 0.001 },
            }],
        },
        // Low gong with two harmonics and a long decay.
        SoundEffect::Gong => Cue {
            master_gain: 1.0,
            tones: vec![
                Tone::note(220.0, 0.0, 10.0, Waveform::Sine, 0.3),
                Tone::note(329.63, 0.0, 8.0, Waveform::Triangle, 0.1),
                Tone::note(440.0, 0.0, 6.0, Waveform::Sine, 0.05),
            ],
        },
    }
}
