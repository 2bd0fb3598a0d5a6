use std::{
    fmt,
    sync::{Arc, Mutex},
};

use crate::{
    dsp::envelope::ExpDecay,
    error::EngineError,
    graph::{
        amplify::Amplify,
        envelope::DecayNode,
        extensions::NodeExt,
        node::{GraphNode, RenderCtx},
        oscillator::OscNode,
    },
    io::context::{lock_bus, AudioContext, OutputBus},
    synth::message::VoiceId,
};

/// How long a tone takes to fade out, from trigger to automatic stop.
pub const DECAY_SECONDS: f32 = 1.5;

/// Sine source through a decaying gain stage.
type PianoGraph = Amplify<OscNode, DecayNode>;

/// One sounding tone, as the output bus sees it.
///
/// Lives inside the bus from `start` until it is stopped or its decay runs
/// out; dropping it releases the source and the gain stage together.
pub struct ToneVoice {
    id: VoiceId,
    graph: PianoGraph,
}

impl ToneVoice {
    /// Wire a new voice at `frequency` Hz into the context's output bus.
    ///
    /// Sound starts with the next rendered frame. The gain falls
    /// exponentially from full scale to -100 dB over [`DECAY_SECONDS`] and
    /// the source stops on that same frame.
    pub fn start(context: &AudioContext, frequency: f32) -> Result<VoiceHandle, EngineError> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(EngineError::InvalidFrequency(frequency));
        }

        let sample_rate = context.sample_rate();
        let decay = ExpDecay::piano(sample_rate, DECAY_SECONDS);
        let frames = decay.total_samples();
        let graph = OscNode::sine()
            .with_frequency(frequency)
            .stop_after(frames)
            .amplify(DecayNode::new(decay));

        let mut bus = context.lock();
        let id = bus.allocate_id();
        let start_frame = bus.frame();
        bus.connect(ToneVoice { id, graph });
        drop(bus);

        Ok(VoiceHandle {
            id,
            frequency,
            sample_rate,
            start_frame,
            stop_frame: start_frame + frames,
            bus: context.shared_bus(),
        })
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub(crate) fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.graph.render_block(out, ctx);
    }

    pub fn is_active(&self) -> bool {
        self.graph.is_active()
    }
}

/// Control-side handle to a started voice.
///
/// Frequency and schedule are fixed when the voice starts; the only thing a
/// handle can change is cutting the voice short with [`stop`](Self::stop).
pub struct VoiceHandle {
    id: VoiceId,
    frequency: f32,
    sample_rate: f32,
    start_frame: u64,
    stop_frame: u64,
    bus: Arc<Mutex<OutputBus>>,
}

impl VoiceHandle {
    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Context time (seconds) of the voice's first sample.
    pub fn start_time(&self) -> f64 {
        self.start_frame as f64 / self.sample_rate as f64
    }

    /// Context time (seconds) at which the voice stops on its own.
    pub fn stop_time(&self) -> f64 {
        self.stop_frame as f64 / self.sample_rate as f64
    }

    /// Silence the voice now and release its nodes.
    ///
    /// Returns false if the voice had already finished (or was already
    /// stopped), in which case nothing happens.
    pub fn stop(&self) -> bool {
        lock_bus(&self.bus).disconnect(self.id)
    }

    /// True while the voice is connected to the bus and producing sound.
    pub fn is_live(&self) -> bool {
        lock_bus(&self.bus).is_connected(self.id)
    }
}

impl fmt::Debug for VoiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceHandle")
            .field("id", &self.id)
            .field("frequency", &self.frequency)
            .field("start_frame", &self.start_frame)
            .field("stop_frame", &self.stop_frame)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn schedule_is_fixed_at_start() {
        let ctx = AudioContext::offline(SAMPLE_RATE);
        let mut buffer = vec![0.0f32; 24_000];
        ctx.render(&mut buffer);

        let voice = ToneVoice::start(&ctx, 440.0).unwrap();
        assert_eq!(voice.frequency(), 440.0);
        assert!((voice.start_time() - 0.5).abs() < 1e-9);
        assert!((voice.stop_time() - 2.0).abs() < 1e-9);
        assert!(voice.is_live());
    }

    #[test]
    fn rejects_unplayable_frequencies() {
        let ctx = AudioContext::offline(SAMPLE_RATE);
        for bad in [0.0, -440.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                ToneVoice::start(&ctx, bad),
                Err(EngineError::InvalidFrequency(_))
            ));
        }
        assert_eq!(ctx.live_voices(), 0);
    }

    #[test]
    fn sound_starts_loud_and_fades() {
        let ctx = AudioContext::offline(SAMPLE_RATE);
        let _voice = ToneVoice::start(&ctx, 440.0).unwrap();

        let mut buffer = vec![0.0f32; 72_000];
        ctx.render(&mut buffer);

        let peak = |s: &[f32]| s.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak(&buffer[..480]) > 0.9);
        assert!(peak(&buffer[36_000..36_480]) < 0.01);
        assert!(peak(&buffer[71_520..]) < 1e-4);
    }

    #[test]
    fn stop_silences_immediately() {
        let ctx = AudioContext::offline(SAMPLE_RATE);
        let voice = ToneVoice::start(&ctx, 440.0).unwrap();

        let mut buffer = vec![0.0f32; 512];
        ctx.render(&mut buffer);
        assert!(voice.stop());
        assert!(!voice.is_live());

        buffer.fill(1.0);
        ctx.render(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn stop_after_natural_end_is_noop() {
        let ctx = AudioContext::offline(SAMPLE_RATE);
        let voice = ToneVoice::start(&ctx, 440.0).unwrap();

        let mut buffer = vec![0.0f32; 72_000];
        ctx.render(&mut buffer);
        assert!(!voice.is_live());
        assert!(!voice.stop());
        assert!(!voice.stop());
    }
}
