//! Frame model: the self-describing content units a message carries.
//!
//! Two frame kinds exist on the wire, identified by the top nibble of
//! the frame header: scrolling text (0x1) and pixel animations (0x2).
//! Speed/delay/direction fields are 4-bit values; out-of-range inputs
//! fall back to documented defaults instead of erroring, matching what
//! the badge firmware assumes.

use crate::error::{CodecError, Result};
use crate::MAX_PAYLOAD_SIZE;

/// Frame type identifier for scrolling text.
pub const TEXT_FRAME_TYPE: u8 = 0x1;
/// Frame type identifier for pixel animations.
pub const ANIMATION_FRAME_TYPE: u8 = 0x2;

/// Display columns per animation step; bitmap length must be a multiple.
pub const ANIMATION_STEP_BYTES: usize = 8;

fn clamp_speed(speed: u8) -> u8 {
    if speed < 16 {
        speed
    } else {
        1
    }
}

fn clamp_delay(delay: u8) -> u8 {
    if delay < 16 {
        delay
    } else {
        0
    }
}

fn clamp_direction(direction: u8) -> u8 {
    if direction <= 1 {
        direction
    } else {
        0
    }
}

fn check_payload_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(CodecError::PayloadTooLarge(len));
    }
    Ok(())
}

/// Scrolling text with speed, inter-repeat delay and scroll direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    text: Vec<u8>,
    speed: u8,
    delay: u8,
    direction: u8,
}

impl TextFrame {
    pub fn new(text: impl Into<Vec<u8>>, speed: u8, delay: u8, direction: u8) -> Result<Self> {
        let text = text.into();
        check_payload_len(text.len())?;
        Ok(Self {
            text,
            speed: clamp_speed(speed),
            delay: clamp_delay(delay),
            direction: clamp_direction(direction),
        })
    }

    /// Text frame parameter header: speed and delay nibble-packed into
    /// the first byte, direction in the top nibble of the second.
    pub fn header(&self) -> [u8; 2] {
        [self.speed << 4 | self.delay, self.direction << 4]
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }
}

/// Pixel animation: a bitmap of 8-byte display steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
    bitmap: Vec<u8>,
    speed: u8,
    delay: u8,
}

impl AnimationFrame {
    pub fn new(bitmap: impl Into<Vec<u8>>, speed: u8, delay: u8) -> Result<Self> {
        let bitmap = bitmap.into();
        if bitmap.len() % ANIMATION_STEP_BYTES != 0 {
            return Err(CodecError::InvalidBitmapLength(bitmap.len()));
        }
        check_payload_len(bitmap.len())?;
        Ok(Self {
            bitmap,
            speed: clamp_speed(speed),
            delay: clamp_delay(delay),
        })
    }

    /// Animation parameter header: one full byte each for speed and
    /// delay. The format difference from [`TextFrame::header`] is part
    /// of the wire protocol.
    pub fn header(&self) -> [u8; 2] {
        [self.speed, self.delay]
    }

    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }
}

/// A content unit the assembler can place on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(TextFrame),
    Animation(AnimationFrame),
}

impl Frame {
    fn type_id(&self) -> u8 {
        match self {
            Frame::Text(_) => TEXT_FRAME_TYPE,
            Frame::Animation(_) => ANIMATION_FRAME_TYPE,
        }
    }

    fn payload(&self) -> &[u8] {
        match self {
            Frame::Text(frame) => &frame.text,
            Frame::Animation(frame) => &frame.bitmap,
        }
    }

    /// Frame header: type nibble plus 12-bit payload length.
    pub fn frame_header(&self) -> [u8; 2] {
        let len = self.payload().len();
        [self.type_id() << 4 | (len >> 8) as u8, (len & 0xFF) as u8]
    }

    /// Variant-specific parameter header.
    pub fn header(&self) -> [u8; 2] {
        match self {
            Frame::Text(frame) => frame.header(),
            Frame::Animation(frame) => frame.header(),
        }
    }

    /// Full wire representation: frame header ++ header ++ payload.
    pub fn representation(&self) -> Vec<u8> {
        let payload = self.payload();
        let mut out = Vec::with_capacity(4 + payload.len());
        out.extend_from_slice(&self.frame_header());
        out.extend_from_slice(&self.header());
        out.extend_from_slice(payload);
        out
    }
}

impl From<TextFrame> for Frame {
    fn from(frame: TextFrame) -> Self {
        Frame::Text(frame)
    }
}

impl From<AnimationFrame> for Frame {
    fn from(frame: AnimationFrame) -> Self {
        Frame::Animation(frame)
    }
}
