//! Default cpal output device driving a `SynthEngine`.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, SampleFormat, SizedSample,
};
use log::{error, info};
use rtrb::Producer;

use crate::{
    config::SynthConfig, engine::controller::Controller, error::SynthError, SynthEngine,
    MAX_BLOCK_SIZE,
};

/// A running output stream. Audio stops when this is dropped.
pub struct OutputStream {
    _stream: cpal::Stream,
    device_name: String,
    sample_rate: f32,
    channels: usize,
}

impl OutputStream {
    /// Acquire the default output device and start rendering into it.
    ///
    /// `config`'s sample rate and channel count are replaced by the device's.
    /// When `monitor` is given, the first channel of every rendered frame is
    /// also pushed into it (dropped when full) for visualisation.
    ///
    /// Fails with `DeviceUnavailable` if there is no device or it refuses
    /// the stream. No retry is attempted.
    pub fn open(
        config: SynthConfig,
        monitor: Option<Producer<f32>>,
    ) -> Result<(Self, Controller), SynthError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| unavailable("no default output device"))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = device
            .default_output_config()
            .map_err(|err| unavailable(format!("failed to fetch default output config: {err}")))?;

        let sample_format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.into();
        let sample_rate = stream_config.sample_rate.0 as f32;
        let channels = stream_config.channels as usize;

        let (engine, controller) =
            SynthEngine::new(config.sample_rate(sample_rate).channels(channels));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, engine, monitor),
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, engine, monitor),
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, engine, monitor),
            other => Err(unavailable(format!("unsupported sample format {other:?}"))),
        }?;

        stream
            .play()
            .map_err(|err| unavailable(format!("failed to start output stream: {err}")))?;

        info!("output: {device_name}, {sample_rate} Hz, {channels} channel(s), {sample_format:?}");

        Ok((
            Self {
                _stream: stream,
                device_name,
                sample_rate,
                channels,
            },
            controller,
        ))
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut engine: SynthEngine,
    mut monitor: Option<Producer<f32>>,
) -> Result<cpal::Stream, SynthError>
where
    T: SizedSample + FromSample<f32> + Send + 'static,
{
    let channels = config.channels as usize;
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE * channels];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for chunk in data.chunks_mut(render_buf.len()) {
                    let block = &mut render_buf[..chunk.len()];
                    engine.process(block);

                    for (out, &sample) in chunk.iter_mut().zip(block.iter()) {
                        *out = T::from_sample(sample);
                    }

                    if let Some(monitor) = monitor.as_mut() {
                        for frame in block.chunks_exact(channels) {
                            let _ = monitor.push(frame[0]);
                        }
                    }
                }
            },
            |err| error!("output stream error: {err}"),
            None,
        )
        .map_err(|err| unavailable(format!("failed to build output stream: {err}")))
}

fn unavailable(reason: impl Into<String>) -> SynthError {
    SynthError::DeviceUnavailable(reason.into())
}
