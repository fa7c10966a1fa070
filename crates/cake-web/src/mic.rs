//! Microphone loudness sampler: `getUserMedia` into an analyser that is read
//! on a fixed interval.

use crate::dom::js_err;
use cake_core::blow::strength_from_bins;
use cake_core::constants::{ANALYSER_FFT_SIZE, SAMPLER_INTERVAL_MS};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub struct MicSampler {
    stream: web::MediaStream,
    audio_ctx: web::AudioContext,
    _source: web::MediaStreamAudioSourceNode,
    _analyser: web::AnalyserNode,
    interval_id: Option<i32>,
    // Must outlive the interval; dropped only after `stop`.
    _tick: Closure<dyn FnMut()>,
}

impl MicSampler {
    /// Ask for the microphone and start sampling. `on_strength` receives the
    /// raw strength every interval.
    pub async fn start(mut on_strength: impl FnMut(f32) + 'static) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let devices = window.navigator().media_devices().map_err(js_err)?;
        let constraints = web::MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(js_err)?;
        let stream: web::MediaStream = JsFuture::from(promise)
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;

        let audio_ctx = web::AudioContext::new().map_err(js_err)?;
        let source = audio_ctx
            .create_media_stream_source(&stream)
            .map_err(js_err)?;
        let analyser = audio_ctx.create_analyser().map_err(js_err)?;
        analyser.set_fft_size(ANALYSER_FFT_SIZE);
        source
            .connect_with_audio_node(&analyser)
            .map_err(js_err)?;

        let mut bins = vec![0u8; analyser.frequency_bin_count() as usize];
        let analyser_tick = analyser.clone();
        let tick = Closure::wrap(Box::new(move || {
            analyser_tick.get_byte_frequency_data(&mut bins);
            on_strength(strength_from_bins(&bins));
        }) as Box<dyn FnMut()>);
        let interval_id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                SAMPLER_INTERVAL_MS,
            )
            .map_err(js_err)?;
        log::info!(
            "[mic] sampling every {} ms (fft {})",
            SAMPLER_INTERVAL_MS,
            ANALYSER_FFT_SIZE
        );
        Ok(Self {
            stream,
            audio_ctx,
            _source: source,
            _analyser: analyser,
            interval_id: Some(interval_id),
            _tick: tick,
        })
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.interval_id.is_some()
    }

    /// Clear the interval, stop every track and close the audio context.
    /// Idempotent; safe to call from inside the sampling callback.
    pub fn stop(&mut self) {
        let Some(id) = self.interval_id.take() else {
            return;
        };
        if let Some(w) = web::window() {
            w.clear_interval_with_handle(id);
        }
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<web::MediaStreamTrack>() {
                track.stop();
            }
        }
        let _ = self.audio_ctx.close();
        log::info!("[mic] stopped");
    }
}

impl Drop for MicSampler {
    fn drop(&mut self) {
        self.stop();
    }
}
