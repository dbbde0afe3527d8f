pub mod udp_segment {

    use crate::checksum::checksum;
    use crate::RudpError;
    use bit_vec::BitVec;
    use log::{debug, warn};

    /// Size of the segment header, in bytes.
    pub const HEADER_SIZE: usize = 8;

    /// Largest payload a single segment may carry. The 16-bit length field
    /// alone would allow 65527 bytes; the conventional cap leaves room for
    /// a minimal network-layer header around the segment.
    pub const MAX_PAYLOAD: usize = 65507;

    /// A datagram segment: four 16-bit big-endian header words plus payload.
    ///
    /// Fields are read-only once constructed. The length word is not stored
    /// at all: `length()` derives it from the payload, so a serialized
    /// header can never disagree with the bytes that follow it. `checksum()`
    /// is the wire value observed by `deserialize`, or 0 ("checksum unused")
    /// for a freshly built segment; `serialize` computes the outgoing
    /// checksum and hands it back instead of storing it.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UdpSegment {
        source_port: u16,
        destination_port: u16,
        checksum: u16,
        payload: Vec<u8>,
        is_valid: bool,
    }

    impl UdpSegment {
        /// Build a segment from explicit field values.
        pub fn new(
            source_port: u16,
            destination_port: u16,
            payload: Vec<u8>,
        ) -> Result<Self, RudpError> {
            if payload.len() > MAX_PAYLOAD {
                return Err(RudpError::PayloadTooLarge { len: payload.len() });
            }

            Ok(UdpSegment {
                source_port,
                destination_port,
                checksum: 0,
                payload,
                is_valid: true,
            })
        }

        /// Build a segment carrying UTF-8 text.
        pub fn from_text(
            source_port: u16,
            destination_port: u16,
            text: &str,
        ) -> Result<Self, RudpError> {
            Self::new(source_port, destination_port, text.as_bytes().to_vec())
        }

        /// Source port.
        pub fn source_port(&self) -> u16 {
            self.source_port
        }

        /// Destination port.
        pub fn destination_port(&self) -> u16 {
            self.destination_port
        }

        /// Total segment size in bytes, header included. Always derived as
        /// `8 + payload.len()`, never stored.
        pub fn length(&self) -> u16 {
            (HEADER_SIZE + self.payload.len()) as u16
        }

        /// Checksum observed on the wire, or 0 when none has been seen.
        pub fn checksum(&self) -> u16 {
            self.checksum
        }

        /// The payload bytes.
        pub fn payload(&self) -> &[u8] {
            &self.payload
        }

        /// Decoder verdict: did the stored checksum match the content?
        pub fn is_valid(&self) -> bool {
            self.is_valid
        }

        /// The payload as text, when it is valid UTF-8.
        pub fn text(&self) -> Option<&str> {
            std::str::from_utf8(&self.payload).ok()
        }

        /// One's-complement checksum over the header (with the checksum word
        /// as zero) and the payload. Never returns 0: an all-zero result maps
        /// to 0xFFFF, keeping the zero wire value reserved for "checksum
        /// unused".
        pub fn compute_checksum(&self) -> u16 {
            let mut sum = self.source_port as u32;
            sum += self.destination_port as u32;
            sum += self.length() as u32;
            sum += checksum::sum_words(&self.payload);
            checksum::finalize(sum)
        }

        /// Does the stored checksum match the segment's content?
        /// A stored checksum of 0 means "checksum unused" and always passes.
        pub fn is_checksum_valid(&self) -> bool {
            if self.checksum == 0 {
                return true;
            }
            self.checksum == self.compute_checksum()
        }

        /// Serialize to freshly allocated wire bytes. Returns the bytes
        /// together with the checksum written into them.
        pub fn serialize(&self) -> (Vec<u8>, u16) {
            let checksum = self.compute_checksum();

            let mut buf = Vec::with_capacity(HEADER_SIZE + self.payload.len());
            buf.extend_from_slice(&self.source_port.to_be_bytes());
            buf.extend_from_slice(&self.destination_port.to_be_bytes());
            buf.extend_from_slice(&self.length().to_be_bytes());
            buf.extend_from_slice(&checksum.to_be_bytes());
            buf.extend_from_slice(&self.payload);

            (buf, checksum)
        }

        /// Serialize the segment inplace, in `buf`. Returns the checksum
        /// written at offset 6.
        pub fn serialize_into(&self, buf: &mut [u8]) -> Result<u16, RudpError> {
            let total = HEADER_SIZE + self.payload.len();
            if buf.len() < total {
                return Err(RudpError::BufError("buffer too small"));
            }
            let checksum = self.compute_checksum();

            buf[0..2].copy_from_slice(&self.source_port.to_be_bytes());
            buf[2..4].copy_from_slice(&self.destination_port.to_be_bytes());
            buf[4..6].copy_from_slice(&self.length().to_be_bytes());
            buf[6..8].copy_from_slice(&checksum.to_be_bytes());
            buf[HEADER_SIZE..total].copy_from_slice(&self.payload);

            Ok(checksum)
        }

        /// Bit-level view of the serialized segment.
        pub fn to_bits(&self) -> BitVec {
            let (bytes, _) = self.serialize();
            BitVec::from_bytes(&bytes)
        }

        /// Deserialize a segment from given buffer.
        ///
        /// A checksum mismatch is not an error: the segment comes back fully
        /// parsed with `is_valid() == false`, so callers can still inspect
        /// it. A wire checksum of 0 means "checksum unused" and always
        /// validates.
        pub fn deserialize(buf: &[u8]) -> Result<Self, RudpError> {
            if buf.len() < HEADER_SIZE {
                return Err(RudpError::TruncatedHeader { have: buf.len() });
            }

            let source_port = u16::from_be_bytes(buf[0..2].try_into().unwrap());
            let destination_port = u16::from_be_bytes(buf[2..4].try_into().unwrap());
            let length = u16::from_be_bytes(buf[4..6].try_into().unwrap());
            let checksum = u16::from_be_bytes(buf[6..8].try_into().unwrap());

            if length as usize != buf.len() {
                return Err(RudpError::LengthMismatch {
                    declared: length,
                    actual: buf.len(),
                });
            }
            let payload = &buf[HEADER_SIZE..];
            if payload.len() > MAX_PAYLOAD {
                return Err(RudpError::PayloadTooLarge { len: payload.len() });
            }

            let mut segment = UdpSegment {
                source_port,
                destination_port,
                checksum,
                payload: payload.to_vec(),
                is_valid: false,
            };
            segment.is_valid = segment.is_checksum_valid();

            if !segment.is_valid {
                warn!(
                    "[DESERIALIZE]: checksum mismatch: header says {:#06x}, content sums to {:#06x}",
                    segment.checksum,
                    segment.compute_checksum()
                );
            }
            debug!(
                "[DESERIALIZE]: src={} dst={} length={} valid={}",
                segment.source_port,
                segment.destination_port,
                segment.length(),
                segment.is_valid
            );

            Ok(segment)
        }
    }

}
