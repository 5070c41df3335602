//! Message assembly: the protocol envelope around an ordered frame list.
//!
//! Two envelope generations are in the field. The marker byte sequences
//! are data carried by [`ProtocolVersion`], not per-call-site constants,
//! so both generations share one assembler.

use crate::frame::Frame;

/// Envelope generation the receiving firmware expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    V1,
    V2,
}

impl ProtocolVersion {
    pub fn start_marker(self) -> &'static [u8] {
        match self {
            ProtocolVersion::V1 => &[0x99, 0x99],
            ProtocolVersion::V2 => &[0xA5, 0xA5, 0xA5, 0x5A],
        }
    }

    pub fn pattern_marker(self) -> &'static [u8] {
        match self {
            ProtocolVersion::V1 => &[0xA9, 0xA9],
            ProtocolVersion::V2 => &[0x0F, 0xF0],
        }
    }

    pub fn end_marker(self) -> &'static [u8] {
        match self {
            ProtocolVersion::V1 => &[0x84, 0x84],
            ProtocolVersion::V2 => &[0x84, 0x84, 0x84],
        }
    }
}

/// Collects frames in order and emits the enveloped byte sequence.
#[derive(Debug, Clone)]
pub struct MessageAssembler {
    version: ProtocolVersion,
    frames: Vec<Frame>,
}

impl MessageAssembler {
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            frames: Vec::new(),
        }
    }

    pub fn add_frame(&mut self, frame: impl Into<Frame>) {
        self.frames.push(frame.into());
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Emit `start ++ (pattern ++ frame)* ++ end`.
    pub fn assemble(&self) -> Vec<u8> {
        let mut message = self.version.start_marker().to_vec();
        for frame in &self.frames {
            message.extend_from_slice(self.version.pattern_marker());
            message.extend_from_slice(&frame.representation());
        }
        message.extend_from_slice(self.version.end_marker());

        log::debug!(
            "assembled {:?} message: {} frames, {} bytes",
            self.version,
            self.frames.len(),
            message.len()
        );
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::TextFrame;

    #[test]
    fn test_empty_message_is_start_plus_end() {
        let v1 = MessageAssembler::new(ProtocolVersion::V1).assemble();
        assert_eq!(v1, vec![0x99, 0x99, 0x84, 0x84]);
        assert_eq!(v1.len(), 4);

        let v2 = MessageAssembler::new(ProtocolVersion::V2).assemble();
        assert_eq!(v2, vec![0xA5, 0xA5, 0xA5, 0x5A, 0x84, 0x84, 0x84]);
        assert_eq!(v2.len(), 7);
    }

    #[test]
    fn test_single_text_frame_v1() {
        let mut assembler = MessageAssembler::new(ProtocolVersion::V1);
        assembler.add_frame(TextFrame::new(b"MUZY".to_vec(), 7, 8, 1).unwrap());
        assert_eq!(
            assembler.assemble(),
            vec![
                0x99, 0x99, // start
                0xA9, 0xA9, // pattern
                0x10, 0x04, 0x78, 0x10, b'M', b'U', b'Z', b'Y',
                0x84, 0x84, // end
            ]
        );
    }

    #[test]
    fn test_every_frame_gets_a_pattern_marker() {
        let mut assembler = MessageAssembler::new(ProtocolVersion::V2);
        assembler.add_frame(TextFrame::new(b"A".to_vec(), 1, 0, 0).unwrap());
        assembler.add_frame(TextFrame::new(b"B".to_vec(), 1, 0, 0).unwrap());
        let message = assembler.assemble();

        let marker = ProtocolVersion::V2.pattern_marker();
        let count = message
            .windows(marker.len())
            .filter(|window| *window == marker)
            .count();
        assert_eq!(count, 2);
        assert!(message.starts_with(ProtocolVersion::V2.start_marker()));
        assert!(message.ends_with(ProtocolVersion::V2.end_marker()));
    }
}
