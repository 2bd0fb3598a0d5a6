use std::f32::consts::TAU;

/*
Sine Oscillator
===============

The tone source of every voice. A sine is a single frequency with no
harmonics, so the pitch of a key is exactly the frequency we feed in.

Vocabulary
----------

  phase       Position inside one cycle, kept in [0.0, 1.0). 0.25 is the
              positive peak, 0.75 the negative peak.

  increment   How far the phase moves per sample:

                  increment = frequency / sample_rate

              At 440 Hz and 48 kHz that is 0.009166..., so one cycle takes
              about 109 samples.

The Math
--------

Each sample:

    out   = sin(2π · phase)
    phase = (phase + increment) mod 1.0

Keeping the phase wrapped (instead of counting samples and computing
sin(2π f n / sr) directly) keeps the argument small, so f32 precision does
not degrade on long notes.
*/

/// Phase-accumulating sine generator.
///
/// The frequency is passed per block rather than stored so the same block can
/// serve fixed-pitch and modulated sources.
#[derive(Debug, Clone, Default)]
pub struct OscillatorBlock {
    phase: f32,
}

impl OscillatorBlock {
    pub fn sine() -> Self {
        Self { phase: 0.0 }
    }

    /// Fill `out` with the next `out.len()` samples at `frequency` Hz.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        let increment = frequency / sample_rate;
        for sample in out.iter_mut() {
            *sample = (TAU * self.phase).sin();
            self.phase += increment;
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}
