//! Modulation engine: byte sequence -> mono 8-bit unsigned PCM samples.
//!
//! Two interchangeable schemes, matching the two badge hardware
//! generations:
//!
//! - Amplitude-polarity: every bit is a flat run pinned to one of the
//!   two rails (0x00 / 0xFF); a polarity flag flips on every bit so a
//!   run boundary is always a rail change. Run length carries the bit
//!   value (3 samples = 0, 5 samples = 1). Sync is a 17-sample run; a
//!   short resync is re-inserted every few payload bytes.
//!
//! - Tone-burst: every bit is a sine-enveloped burst centered on the
//!   neutral rail ("short" = 0, "long" = 1), precomputed once per
//!   process. Sync is a flat run longer than any data burst; the longer
//!   sync tolerance replaces mid-stream resyncs.
//!
//! Bits are taken LSB first. The polarity flag and resync counter live
//! on the modulator instance and are cleared at the top of every
//! `encode` call, so instance reuse cannot leak state between messages.

use std::f32::consts::PI;
use std::sync::OnceLock;

use crate::hamming;
use crate::{DEFAULT_SAMPLE_RATE, SUPPORTED_SAMPLE_RATES};

/// Neutral rail: the mono 8-bit unsigned PCM midpoint.
pub const SILENCE_SAMPLE: u8 = 128;

// Amplitude-polarity timing, in samples per run.
const AP_BIT0_SAMPLES: usize = 3;
const AP_BIT1_SAMPLES: usize = 5;
const AP_SYNC_SAMPLES: usize = 17;

const AP_LOW_RAIL: u8 = 0x00;
const AP_HIGH_RAIL: u8 = 0xFF;

/// Sound cards need roughly a second of lead-in before the output
/// level is stable enough for the badge's comparator.
const AP_PREAMBLE_BURSTS: usize = 3000;
const AP_RESYNC_BURSTS: usize = 4;
const AP_POSTAMBLE_BURSTS: usize = 4;

/// Payload bytes between mid-stream resyncs. Counted over raw
/// modulated bytes, not parity triples, so with parity enabled a
/// resync can land inside a (data, data, parity) triple.
const AP_RESYNC_BYTE_INTERVAL: usize = 9;

// Tone-burst table shape, in samples.
const TB_RAMP_SAMPLES: usize = 8;
const TB_SHORT_STEADY_SAMPLES: usize = 8;
const TB_LONG_STEADY_SAMPLES: usize = 24;
const TB_SYNC_SAMPLES: usize = 48;

/// Peak excursion above the neutral rail for tone bursts.
const TB_AMPLITUDE: f32 = 100.0;

const TB_PREAMBLE_RUNS: usize = 200;
const TB_POSTAMBLE_RUNS: usize = 4;

/// The bit-to-waveform scheme a badge generation demodulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulationVariant {
    AmplitudePolarity,
    ToneBurst,
}

/// Modulation parameters. Construct through [`ModemConfig::new`] so an
/// unsupported sample rate degrades to the default instead of erroring.
#[derive(Debug, Clone, Copy)]
pub struct ModemConfig {
    pub variant: ModulationVariant,
    pub parity: bool,
    sample_rate: u32,
}

impl ModemConfig {
    pub fn new(variant: ModulationVariant, sample_rate: u32, parity: bool) -> Self {
        let sample_rate = if SUPPORTED_SAMPLE_RATES.contains(&sample_rate) {
            sample_rate
        } else {
            log::warn!("unsupported sample rate {sample_rate}, using {DEFAULT_SAMPLE_RATE}");
            DEFAULT_SAMPLE_RATE
        };
        Self {
            variant,
            parity,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self::new(ModulationVariant::AmplitudePolarity, DEFAULT_SAMPLE_RATE, true)
    }
}

/// `length` samples of the neutral rail, for inter-message gaps.
/// The engine never inserts silence on its own.
pub fn silence(length: usize) -> Vec<u8> {
    vec![SILENCE_SAMPLE; length]
}

struct ToneTables {
    short: Vec<u8>,
    long: Vec<u8>,
    sync: Vec<u8>,
}

/// Sine-squared ramp up, flat top, mirrored ramp down.
fn tone_burst(steady: usize) -> Vec<u8> {
    let mut samples = Vec::with_capacity(2 * TB_RAMP_SAMPLES + steady);
    for i in 0..TB_RAMP_SAMPLES {
        let progress = i as f32 / TB_RAMP_SAMPLES as f32;
        samples.push(tone_sample((PI * progress / 2.0).sin().powi(2)));
    }
    for _ in 0..steady {
        samples.push(tone_sample(1.0));
    }
    for i in (0..TB_RAMP_SAMPLES).rev() {
        let progress = i as f32 / TB_RAMP_SAMPLES as f32;
        samples.push(tone_sample((PI * progress / 2.0).sin().powi(2)));
    }
    samples
}

fn tone_sample(gain: f32) -> u8 {
    (SILENCE_SAMPLE as f32 + TB_AMPLITUDE * gain) as u8
}

fn tone_tables() -> &'static ToneTables {
    static TABLES: OnceLock<ToneTables> = OnceLock::new();
    TABLES.get_or_init(|| ToneTables {
        short: tone_burst(TB_SHORT_STEADY_SAMPLES),
        long: tone_burst(TB_LONG_STEADY_SAMPLES),
        sync: vec![tone_sample(1.0); TB_SYNC_SAMPLES],
    })
}

/// Converts enveloped message bytes into PCM samples.
///
/// Not reentrant: `encode` resets and then mutates the polarity and
/// resync state, so share one instance per thread at most.
pub struct Modulator {
    config: ModemConfig,
    hilo: bool,
    byte_count: usize,
}

impl Modulator {
    pub fn new(config: ModemConfig) -> Self {
        Self {
            config,
            hilo: false,
            byte_count: 0,
        }
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Clear polarity and resync state. `encode` does this itself, so
    /// calling it is only needed when driving the per-bit helpers in
    /// some future streaming mode.
    pub fn reset(&mut self) {
        self.hilo = false;
        self.byte_count = 0;
    }

    /// One pass: parity-expand (if enabled) and modulate all of `data`.
    pub fn encode(&mut self, data: &[u8]) -> Vec<u8> {
        self.reset();

        let line_bytes;
        let data = if self.config.parity {
            line_bytes = hamming::interleave_parity(data);
            &line_bytes[..]
        } else {
            data
        };

        let samples = match self.config.variant {
            ModulationVariant::AmplitudePolarity => self.encode_amplitude_polarity(data),
            ModulationVariant::ToneBurst => self.encode_tone_burst(data),
        };

        log::debug!(
            "modulated {} line bytes into {} samples ({:?}, {} Hz)",
            data.len(),
            samples.len(),
            self.config.variant,
            self.config.sample_rate
        );
        samples
    }

    fn flip_rail(&mut self) -> u8 {
        self.hilo = !self.hilo;
        if self.hilo {
            AP_HIGH_RAIL
        } else {
            AP_LOW_RAIL
        }
    }

    fn push_ap_sync_run(&mut self, out: &mut Vec<u8>, bursts: usize) {
        for _ in 0..bursts {
            let rail = self.flip_rail();
            out.resize(out.len() + AP_SYNC_SAMPLES, rail);
        }
    }

    fn push_ap_byte(&mut self, out: &mut Vec<u8>, byte: u8) {
        let mut byte = byte;
        for _ in 0..8 {
            let rail = self.flip_rail();
            let run = if byte & 0x01 == 1 {
                AP_BIT1_SAMPLES
            } else {
                AP_BIT0_SAMPLES
            };
            out.resize(out.len() + run, rail);
            byte >>= 1;
        }
    }

    fn encode_amplitude_polarity(&mut self, data: &[u8]) -> Vec<u8> {
        // Worst case every bit is a 1.
        let capacity = (AP_PREAMBLE_BURSTS + AP_POSTAMBLE_BURSTS) * AP_SYNC_SAMPLES
            + data.len() * 8 * AP_BIT1_SAMPLES
            + data.len() / AP_RESYNC_BYTE_INTERVAL * AP_RESYNC_BURSTS * AP_SYNC_SAMPLES;
        let mut out = Vec::with_capacity(capacity);

        self.push_ap_sync_run(&mut out, AP_PREAMBLE_BURSTS);
        for &byte in data {
            self.push_ap_byte(&mut out, byte);
            self.byte_count += 1;
            if self.byte_count == AP_RESYNC_BYTE_INTERVAL {
                self.push_ap_sync_run(&mut out, AP_RESYNC_BURSTS);
                self.byte_count = 0;
            }
        }
        self.push_ap_sync_run(&mut out, AP_POSTAMBLE_BURSTS);
        out
    }

    fn push_tb_byte(&mut self, out: &mut Vec<u8>, byte: u8) {
        let tables = tone_tables();
        let mut byte = byte;
        for _ in 0..8 {
            // Polarity is a symmetry point in this scheme, not an
            // amplitude flip: both phases map to the same burst shape.
            self.hilo = !self.hilo;
            let burst = if byte & 0x01 == 1 {
                &tables.long
            } else {
                &tables.short
            };
            out.extend_from_slice(burst);
            byte >>= 1;
        }
    }

    fn encode_tone_burst(&mut self, data: &[u8]) -> Vec<u8> {
        let tables = tone_tables();
        let capacity = (TB_PREAMBLE_RUNS + TB_POSTAMBLE_RUNS) * tables.sync.len()
            + data.len() * 8 * tables.long.len();
        let mut out = Vec::with_capacity(capacity);

        for _ in 0..TB_PREAMBLE_RUNS {
            out.extend_from_slice(&tables.sync);
        }
        for &byte in data {
            self.push_tb_byte(&mut out, byte);
        }
        for _ in 0..TB_POSTAMBLE_RUNS {
            out.extend_from_slice(&tables.sync);
        }
        out
    }
}
