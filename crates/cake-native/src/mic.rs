// ---------------- Native microphone (cpal) ----------------
use cake_core::blow::{rms, strength_from_rms};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::{Arc, Mutex};

/// Default input stream publishing the latest buffer's strength.
pub struct MicInput {
    strength: Arc<Mutex<f32>>,
    _stream: cpal::Stream,
}

impl MicInput {
    pub fn start() -> Option<Self> {
        let host = cpal::default_host();
        let device = host.default_input_device()?;
        let config = device.default_input_config().ok()?;
        let channels = config.channels() as usize;
        log::info!(
            "[mic] {} @ {} Hz, {} ch",
            device.name().unwrap_or_else(|_| "input".into()),
            config.sample_rate().0,
            channels
        );

        let strength = Arc::new(Mutex::new(0.0_f32));
        let err_fn = |err| log::error!("[mic] stream error: {err}");
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config.into(), Arc::clone(&strength), err_fn).ok()?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config.into(), Arc::clone(&strength), err_fn).ok()?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config.into(), Arc::clone(&strength), err_fn).ok()?
            }
            other => {
                log::warn!("[mic] unsupported sample format {:?}", other);
                return None;
            }
        };
        stream.play().ok()?;
        Some(Self {
            strength,
            _stream: stream,
        })
    }

    /// Most recent raw strength.
    pub fn strength(&self) -> f32 {
        self.strength.lock().map(|s| *s).unwrap_or(0.0)
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    strength: Arc<Mutex<f32>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let mut scratch: Vec<f32> = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            scratch.clear();
            scratch.extend(data.iter().map(|s| s.to_sample::<f32>()));
            if let Ok(mut s) = strength.lock() {
                *s = strength_from_rms(rms(&scratch));
            }
        },
        err_fn,
        None,
    )
}
