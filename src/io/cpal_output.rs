//! Default output device, driven by cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::{
    error::EngineError,
    io::context::{lock_bus, AudioContext},
    MAX_BLOCK_SIZE,
};

impl AudioContext {
    /// Open the default output device and start rendering the bus to it.
    ///
    /// The mono mix is copied to every device channel. Any failure here means
    /// the platform has no usable audio output.
    pub fn open_default() -> Result<Self, EngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| EngineError::audio("default device", "no default output device available"))?;
        let config = device
            .default_output_config()
            .map_err(|e| EngineError::audio("output config", e))?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = usize::from(config.channels()).max(1);

        let (bus, events) = AudioContext::new_bus(sample_rate);
        let bus_handle = bus.clone();

        // Buffer reused by audio callback
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let mut bus = lock_bus(&bus_handle);
                    for out in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                        let block = &mut render_buf[..out.len() / channels];
                        bus.render(block);

                        // Duplicate mono to all channels
                        for (frame, &s) in out.chunks_mut(channels).zip(block.iter()) {
                            frame.fill(s);
                        }
                    }
                },
                |err| tracing::error!(%err, "output stream error"),
                None,
            )
            .map_err(|e| EngineError::audio("build output stream", e))?;

        stream
            .play()
            .map_err(|e| EngineError::audio("start output stream", e))?;

        tracing::info!(
            host = host.id().name(),
            device = %device.name().unwrap_or_default(),
            sample_rate,
            channels,
            "audio output opened"
        );

        Ok(AudioContext::from_parts(sample_rate, bus, events, Some(stream)))
    }
}
