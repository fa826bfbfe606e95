//! Canonical field serializer: a deterministic byte encoding of typed fields
//! that is independent of insertion order (the "Finish protocol", §4.1).

/// Type codes. All integers are encoded big-endian.
pub mod type_code {
    pub const UINT8_16: u8 = 0x10;
    pub const UINT32: u8 = 0x20;
    pub const HASH256: u8 = 0x50;
    pub const UINT64: u8 = 0x60;
    pub const VL: u8 = 0x70;
    pub const ACCOUNT_ID: u8 = 0x80;
}

/// Encode a variable-length payload's length prefix per §4.1.
///
/// - length ≤ 192: one byte equal to the length.
/// - 193..=12480: two bytes.
/// - 12481..=918744: three bytes.
///
/// Lengths above 918744 are outside the defined VL range; callers must not
/// construct VL fields larger than this.
pub fn encode_vl_length(len: usize) -> Vec<u8> {
    if len <= 192 {
        vec![len as u8]
    } else if len <= 12480 {
        let n = len - 193;
        vec![(193 + n / 256) as u8, (n % 256) as u8]
    } else if len <= 918_744 {
        let n = len - 12481;
        vec![(241 + n / 65536) as u8, ((n / 256) % 256) as u8, (n % 256) as u8]
    } else {
        panic!("VL payload length {len} exceeds the 918744-byte maximum");
    }
}

/// One field awaiting serialization: its sort key (type_code, field_code) and
/// the exact bytes to emit after the tag byte.
struct Field {
    type_code: u8,
    field_code: u8,
    payload: Vec<u8>,
}

/// Accumulates typed fields and produces their canonical byte encoding,
/// regardless of the order they were added in.
#[derive(Default)]
pub struct FieldBuilder {
    fields: Vec<Field>,
}

impl FieldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, type_code: u8, field_code: u8, payload: Vec<u8>) -> &mut Self {
        self.fields.push(Field {
            type_code,
            field_code,
            payload,
        });
        self
    }

    pub fn add_uint16(&mut self, field_code: u8, value: u16) -> &mut Self {
        self.push(type_code::UINT8_16, field_code, value.to_be_bytes().to_vec())
    }

    pub fn add_uint32(&mut self, field_code: u8, value: u32) -> &mut Self {
        self.push(type_code::UINT32, field_code, value.to_be_bytes().to_vec())
    }

    pub fn add_uint64(&mut self, field_code: u8, value: u64) -> &mut Self {
        self.push(type_code::UINT64, field_code, value.to_be_bytes().to_vec())
    }

    pub fn add_hash256(&mut self, field_code: u8, value: [u8; 32]) -> &mut Self {
        self.push(type_code::HASH256, field_code, value.to_vec())
    }

    pub fn add_account_id(&mut self, field_code: u8, value: [u8; 20]) -> &mut Self {
        self.push(type_code::ACCOUNT_ID, field_code, value.to_vec())
    }

    /// Add a variable-length field. `raw` is length-prefixed internally.
    pub fn add_vl(&mut self, field_code: u8, raw: &[u8]) -> &mut Self {
        let mut payload = encode_vl_length(raw.len());
        payload.extend_from_slice(raw);
        self.push(type_code::VL, field_code, payload)
    }

    /// Sort fields ascending by (type_code, field_code) and emit
    /// `tag_byte ‖ payload` for each, per the Finish protocol.
    pub fn finish(mut self) -> Vec<u8> {
        self.fields
            .sort_by_key(|f| (f.type_code, f.field_code));
        let mut out = Vec::new();
        for f in &self.fields {
            out.push(f.type_code | (f.field_code & 0x0F));
            out.extend_from_slice(&f.payload);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidemark_crypto::hash::sha512_half;

    #[test]
    fn canonical_vector_one_matches_spec() {
        let mut b = FieldBuilder::new();
        b.add_uint16(2, 0);
        b.add_uint32(4, 1);
        b.add_uint64(8, 10);
        let bytes = b.finish();
        assert_eq!(hex::encode(&bytes), "120000240000000168000000000000000a");

        let digest = hex::encode(sha512_half(&bytes));
        assert!(digest.starts_with("5de074b7"));
        assert!(digest.ends_with("c90"));
    }

    #[test]
    fn canonical_vector_two_matches_spec() {
        let mut b = FieldBuilder::new();
        b.add_uint16(2, 0);
        b.add_uint32(4, 1);
        b.add_uint64(8, 10);
        let mut account = [0u8; 20];
        for (i, byte) in account.iter_mut().enumerate() {
            *byte = (i + 1) as u8;
        }
        b.add_account_id(1, account);
        let bytes = b.finish();
        assert_eq!(
            hex::encode(&bytes),
            "120000240000000168000000000000000a810102030405060708090a0b0c0d0e0f1011121314"
        );

        let digest = hex::encode(sha512_half(&bytes));
        assert!(digest.starts_with("09bd8a5e"));
        assert!(digest.ends_with("2f"));
    }

    #[test]
    fn insertion_order_does_not_affect_output() {
        let mut forward = FieldBuilder::new();
        forward.add_uint16(2, 0);
        forward.add_uint32(4, 1);
        forward.add_uint64(8, 10);

        let mut backward = FieldBuilder::new();
        backward.add_uint64(8, 10);
        backward.add_uint32(4, 1);
        backward.add_uint16(2, 0);

        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn vl_length_192_is_one_byte() {
        let payload = vec![0xAB; 192];
        let mut b = FieldBuilder::new();
        b.add_vl(3, &payload);
        let bytes = b.finish();
        assert_eq!(bytes[0], 0x73);
        assert_eq!(bytes[1], 0xC0);
        assert_eq!(bytes.len(), 194);
    }

    #[test]
    fn vl_length_193_is_two_bytes() {
        let payload = vec![0xAB; 193];
        let mut b = FieldBuilder::new();
        b.add_vl(3, &payload);
        let bytes = b.finish();
        assert_eq!(bytes[0], 0x73);
        assert_eq!(bytes[1], 0xC1);
        assert_eq!(bytes[2], 0x00);
        assert_eq!(bytes.len(), 196);
    }
}
