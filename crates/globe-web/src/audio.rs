use globe_core::services::SoundFx;
use web_sys as web;

/// Short synthesized blips for interface feedback.
#[derive(Clone)]
pub struct WebSound {
    ctx: web::AudioContext,
}

struct Blip {
    wave: web::OscillatorType,
    freq_hz: f32,
    level: f32,
    duration_sec: f64,
}

fn blip_for(name: &str) -> Blip {
    match name {
        "open" => Blip {
            wave: web::OscillatorType::Triangle,
            freq_hz: 660.0,
            level: 0.18,
            duration_sec: 0.22,
        },
        "pulse" => Blip {
            wave: web::OscillatorType::Sine,
            freq_hz: 880.0,
            level: 0.06,
            duration_sec: 0.12,
        },
        _ => Blip {
            wave: web::OscillatorType::Sine,
            freq_hz: 520.0,
            level: 0.08,
            duration_sec: 0.15,
        },
    }
}

impl WebSound {
    pub fn new() -> Option<Self> {
        match web::AudioContext::new() {
            Ok(ctx) => Some(Self { ctx }),
            Err(e) => {
                log::error!("[audio] AudioContext error: {:?}", e);
                None
            }
        }
    }

    /// Browsers start the context suspended until a user gesture.
    pub fn resume(&self) {
        if self.ctx.state() == web::AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }
    }

    fn schedule(&self, blip: &Blip) -> Result<(), wasm_bindgen::JsValue> {
        let src = web::OscillatorNode::new(&self.ctx)?;
        src.set_type(blip.wave);
        src.frequency().set_value(blip.freq_hz);
        let gain = web::GainNode::new(&self.ctx)?;
        gain.gain().set_value(0.0);
        let t0 = self.ctx.current_time() + 0.01;
        gain.gain().linear_ramp_to_value_at_time(blip.level, t0 + 0.02)?;
        gain.gain()
            .linear_ramp_to_value_at_time(0.0, t0 + blip.duration_sec)?;
        src.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&self.ctx.destination())?;
        src.start_with_when(t0)?;
        src.stop_with_when(t0 + blip.duration_sec + 0.02)?;
        Ok(())
    }
}

impl SoundFx for WebSound {
    fn play(&self, name: &str) {
        if let Err(e) = self.schedule(&blip_for(name)) {
            log::debug!("[audio] {} not played: {:?}", name, e);
        }
    }
}
