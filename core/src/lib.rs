//! Audio-coupled content delivery for small LED badge displays
//!
//! Text and animation frames are wrapped in a protocol envelope, optionally
//! expanded with Hamming (24,16) parity, and modulated into a mono 8-bit
//! unsigned PCM sample stream the badge demodulates from its audio input.

pub mod error;
pub mod frame;
pub mod hamming;
pub mod message;
pub mod modem;

pub use error::{CodecError, Result};
pub use frame::{AnimationFrame, Frame, TextFrame};
pub use message::{MessageAssembler, ProtocolVersion};
pub use modem::{silence, ModemConfig, ModulationVariant, Modulator};

/// Sample rates the badge firmware can lock onto.
pub const SUPPORTED_SAMPLE_RATES: [u32; 6] = [16000, 22050, 24000, 32000, 44100, 48000];

/// Fallback rate when a caller asks for an unsupported one.
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Frame payloads are length-prefixed with a 12-bit field.
pub const MAX_PAYLOAD_SIZE: usize = 0xFFF;
