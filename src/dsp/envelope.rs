use crate::MIN_TIME;

/*
Exponential Decay Envelope
==========================

A struck or plucked string is loudest the instant it is hit and then fades.
This envelope models exactly that and nothing else: no attack, no sustain, no
gate. It starts at full level and falls to a near-silent floor over a fixed
duration.

Vocabulary
----------

  level       The envelope's current output (start_level down to floor).
              Multiplies the oscillator to set its amplitude.

  floor       The level reached at the end of the decay. An exponential
              curve can never reach 0.0, so we stop at a value far below
              audibility instead (0.00001 is -100 dB).

  ratio       The per-sample multiplier. Every sample:

                  level = level · ratio

The Shape: Exponential Ramp
---------------------------

  Level
    1.0 ┐╲
        │ ╲
        │  ╲
        │   ╲__
        │      ╲___
  floor └──────────╲______→ Time
        0                T

Over T samples the level goes from `start` to `floor`:

    level(n) = start · (floor / start)^(n / T)

so the per-sample ratio is

    ratio = (floor / start)^(1 / T)

Equal time steps lose an equal number of decibels, which is how acoustic
sounds fade. A linear ramp spends most of its time loud and then drops off a
cliff at the end; an exponential ramp sounds natural.

A handy check: halfway through, the level is the geometric mean of the end
points, sqrt(start · floor). With start = 1.0 and floor = 0.00001 that is
0.00316 (-50 dB), half of the -100 dB journey.

Implementation Notes
--------------------

The level is kept in f64. Multiplying 72,000 times (1.5 s at 48 kHz) in f32
drifts by a fraction of a percent; f64 keeps the end point exact enough that
the last sample lands on the floor.
*/

/// Full-scale gain at the moment a tone starts.
pub const FULL_GAIN: f32 = 1.0;

/// Level the decay reaches at its scheduled end (-100 dB).
pub const DECAY_FLOOR: f32 = 0.000_01;

#[derive(Debug, Clone)]
pub struct ExpDecay {
    floor: f64,
    ratio: f64,

    // Runtime state
    level: f64,
    total_samples: u64,
    elapsed_samples: u64,
}

impl ExpDecay {
    /// Decay from `start` to `floor` over `seconds`.
    ///
    /// Both levels are clamped to be strictly positive: an exponential ramp
    /// is undefined through zero.
    pub fn new(sample_rate: f32, seconds: f32, start: f32, floor: f32) -> Self {
        let start_level = f64::from(start.max(f32::MIN_POSITIVE));
        let floor = f64::from(floor.max(f32::MIN_POSITIVE));
        let total_samples = (seconds.max(MIN_TIME) * sample_rate).round().max(1.0) as u64;
        let ratio = (floor / start_level).powf(1.0 / total_samples as f64);

        Self {
            floor,
            ratio,
            level: start_level,
            total_samples,
            elapsed_samples: 0,
        }
    }

    /// The decay every piano key uses: full gain down to [`DECAY_FLOOR`].
    pub fn piano(sample_rate: f32, seconds: f32) -> Self {
        Self::new(sample_rate, seconds, FULL_GAIN, DECAY_FLOOR)
    }

    /// Current level, then advance one sample.
    pub fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return self.floor as f32;
        }

        let out = self.level;
        self.elapsed_samples += 1;
        self.level = if self.elapsed_samples >= self.total_samples {
            self.floor
        } else {
            self.level * self.ratio
        };
        out as f32
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// True once the scheduled duration has fully elapsed.
    pub fn is_finished(&self) -> bool {
        self.elapsed_samples >= self.total_samples
    }

    pub fn level(&self) -> f32 {
        self.level as f32
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    #[test]
    fn starts_at_full_gain() {
        let mut env = ExpDecay::piano(SAMPLE_RATE, 1.5);
        assert_eq!(env.next_sample(), 1.0);
    }

    #[test]
    fn reaches_floor_on_schedule() {
        let mut env = ExpDecay::piano(SAMPLE_RATE, 1.5);
        assert_eq!(env.total_samples(), 1_500);

        let mut buffer = vec![0.0f32; 1_499];
        env.render(&mut buffer);
        assert!(!env.is_finished());

        env.next_sample();
        assert!(env.is_finished());
        assert!((env.level() - DECAY_FLOOR).abs() < 1e-9);
    }

    #[test]
    fn strictly_decreasing() {
        let mut env = ExpDecay::piano(SAMPLE_RATE, 1.5);
        let mut buffer = vec![0.0f32; 1_500];
        env.render(&mut buffer);

        assert!(buffer.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn halfway_is_geometric_midpoint() {
        let mut env = ExpDecay::piano(SAMPLE_RATE, 1.0);
        let mut buffer = vec![0.0f32; 500];
        env.render(&mut buffer);

        let expected = DECAY_FLOOR.sqrt();
        assert!(
            (env.level() - expected).abs() < 1e-5,
            "expected {expected}, got {}",
            env.level()
        );
    }

    #[test]
    fn holds_floor_after_finish() {
        let mut env = ExpDecay::piano(SAMPLE_RATE, 0.01);
        let mut buffer = vec![0.0f32; 40];
        env.render(&mut buffer);

        assert!(env.is_finished());
        assert!(buffer[10..].iter().all(|&s| s == DECAY_FLOOR));
    }
}
