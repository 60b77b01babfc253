//! Conversion between the authority's raw `R || S` signature and ASN.1 DER.
//!
//! Only short-form DER lengths are written and accepted. With 32-byte
//! components the SEQUENCE body never exceeds 70 bytes, so this covers
//! every P-256 signature; larger curves would need long-form lengths.
//!
//! Decoding is lenient about one redundant leading zero per INTEGER
//! (`02 02 00 01` reads as 1), matching what `encode_der` may emit.

use crate::error::{Error, Result};

pub const RAW_SIGNATURE_LEN: usize = 64;
const COMPONENT_LEN: usize = RAW_SIGNATURE_LEN / 2;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;
const LONG_FORM: u8 = 0x80;

/// Two unsigned big-endian 32-byte integers, R then S.
pub type RawSignature = [u8; RAW_SIGNATURE_LEN];

pub fn raw_from_slice(bytes: &[u8]) -> Result<RawSignature> {
    bytes
        .try_into()
        .map_err(|_| Error::InvalidSignatureLength(bytes.len()))
}

/// Encodes a raw signature as a DER `SEQUENCE { INTEGER r, INTEGER s }`.
///
/// A component whose first byte has the high bit set gets one `0x00` pad byte.
/// Redundant leading zeros are kept as they are.
pub fn encode_der(raw: &[u8]) -> Result<Vec<u8>> {
    let raw = raw_from_slice(raw)?;
    let (r, s) = raw.split_at(COMPONENT_LEN);
    let r = pad_integer(r);
    let s = pad_integer(s);

    let mut der = Vec::with_capacity(6 + r.len() + s.len());
    der.push(TAG_SEQUENCE);
    der.push((r.len() + s.len() + 4) as u8);
    push_integer(&mut der, &r);
    push_integer(&mut der, &s);
    Ok(der)
}

/// Decodes a DER signature back into its raw form.
pub fn decode_der(der: &[u8]) -> Result<RawSignature> {
    let (body, trailing) = read_tlv(der, TAG_SEQUENCE)?;
    if !trailing.is_empty() {
        return Err(Error::MalformedDer("trailing bytes after SEQUENCE"));
    }

    let (r, rest) = read_tlv(body, TAG_INTEGER)?;
    let (s, rest) = read_tlv(rest, TAG_INTEGER)?;
    if !rest.is_empty() {
        return Err(Error::MalformedDer("unexpected data inside SEQUENCE"));
    }

    let mut raw = [0u8; RAW_SIGNATURE_LEN];
    let (r_out, s_out) = raw.split_at_mut(COMPONENT_LEN);
    unpad_integer(r, r_out)?;
    unpad_integer(s, s_out)?;
    Ok(raw)
}

fn pad_integer(component: &[u8]) -> Vec<u8> {
    let mut padded = Vec::with_capacity(component.len() + 1);
    if component[0] & 0x80 != 0 {
        padded.push(0x00);
    }
    padded.extend_from_slice(component);
    padded
}

fn push_integer(der: &mut Vec<u8>, content: &[u8]) {
    der.push(TAG_INTEGER);
    der.push(content.len() as u8);
    der.extend_from_slice(content);
}

/// Splits one tag-length-value off the front of `input`, returning `(value, rest)`.
fn read_tlv(input: &[u8], tag: u8) -> Result<(&[u8], &[u8])> {
    let (&found, rest) = input
        .split_first()
        .ok_or(Error::MalformedDer("truncated before tag"))?;
    if found != tag {
        return Err(Error::MalformedDer(match tag {
            TAG_SEQUENCE => "expected SEQUENCE tag",
            _ => "expected INTEGER tag",
        }));
    }

    let (&len, rest) = rest
        .split_first()
        .ok_or(Error::MalformedDer("truncated before length"))?;
    if len & LONG_FORM != 0 {
        return Err(Error::MalformedDer("long-form length is not supported"));
    }

    let len = len as usize;
    if rest.len() < len {
        return Err(Error::MalformedDer("length exceeds available bytes"));
    }
    Ok(rest.split_at(len))
}

fn unpad_integer(content: &[u8], out: &mut [u8]) -> Result<()> {
    let (&first, tail) = content
        .split_first()
        .ok_or(Error::MalformedDer("empty INTEGER"))?;
    if content.len() > COMPONENT_LEN + 1 {
        return Err(Error::MalformedDer("INTEGER longer than 33 bytes"));
    }
    if first & 0x80 != 0 {
        return Err(Error::MalformedDer("negative INTEGER"));
    }

    let value = if first == 0x00 { tail } else { content };
    if value.len() > COMPONENT_LEN {
        return Err(Error::MalformedDer("INTEGER wider than 32 bytes"));
    }
    out[COMPONENT_LEN - value.len()..].copy_from_slice(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with(r_first: u8, s_first: u8) -> RawSignature {
        let mut raw = [0u8; RAW_SIGNATURE_LEN];
        raw[0] = r_first;
        raw[COMPONENT_LEN] = s_first;
        raw
    }

    #[test]
    fn high_bit_r_is_padded() {
        let der = encode_der(&raw_with(0x80, 0x01)).unwrap();

        let mut expected = vec![0x30, 0x46, 0x02, 0x21, 0x00, 0x80];
        expected.extend_from_slice(&[0u8; 31]);
        expected.extend_from_slice(&[0x02, 0x20, 0x01]);
        expected.extend_from_slice(&[0u8; 31]);
        assert_eq!(der, expected);
    }

    #[test]
    fn component_lengths_follow_high_bit() {
        for (r_first, s_first, r_len, s_len) in [
            (0x7f, 0x7f, 32, 32),
            (0x80, 0x7f, 33, 32),
            (0x7f, 0xff, 32, 33),
            (0xff, 0x80, 33, 33),
        ] {
            let der = encode_der(&raw_with(r_first, s_first)).unwrap();
            assert_eq!(der[1] as usize, r_len + s_len + 4);
            assert_eq!(der[3] as usize, r_len);
            assert_eq!(der[4 + r_len + 1] as usize, s_len);
            assert_eq!(der.len(), 2 + der[1] as usize);
        }
    }

    #[test]
    fn redundant_leading_zeros_are_kept() {
        let der = encode_der(&raw_with(0x00, 0x00)).unwrap();
        assert_eq!(&der[..5], &[0x30, 0x44, 0x02, 0x20, 0x00]);
    }

    #[test]
    fn encode_rejects_wrong_length() {
        assert!(matches!(encode_der(&[0u8; 63]), Err(Error::InvalidSignatureLength(63))));
        assert!(matches!(encode_der(&[0u8; 65]), Err(Error::InvalidSignatureLength(65))));
    }

    #[test]
    fn round_trip_preserves_raw() {
        let mut samples = vec![
            raw_with(0x00, 0x00),
            raw_with(0x80, 0x80),
            raw_with(0x00, 0xff),
            [0xff; RAW_SIGNATURE_LEN],
        ];
        let mut counting = [0u8; RAW_SIGNATURE_LEN];
        for (i, byte) in counting.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(37).wrapping_add(200);
        }
        samples.push(counting);

        for raw in samples {
            let der = encode_der(&raw).unwrap();
            assert_eq!(decode_der(&der).unwrap(), raw);
        }
    }

    #[test]
    fn decode_accepts_minimal_integers() {
        // r = 1, s = 0x80 (padded)
        let der = [0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0x80];
        let raw = decode_der(&der).unwrap();
        assert_eq!(raw[31], 0x01);
        assert_eq!(raw[63], 0x80);
        assert!(raw[..31].iter().all(|&b| b == 0));
        assert!(raw[32..63].iter().all(|&b| b == 0));
    }

    #[test]
    fn decode_tolerates_one_redundant_zero() {
        let der = [0x30, 0x08, 0x02, 0x02, 0x00, 0x01, 0x02, 0x02, 0x00, 0x02];
        let raw = decode_der(&der).unwrap();
        assert_eq!(raw[31], 0x01);
        assert_eq!(raw[63], 0x02);
    }

    #[test]
    fn decode_rejects_structural_violations() {
        let valid = encode_der(&raw_with(0x80, 0x01)).unwrap();

        let mut wrong_tag = valid.clone();
        wrong_tag[0] = 0x31;
        let mut wrong_length = valid.clone();
        wrong_length[1] += 1;
        let mut trailing = valid.clone();
        trailing.push(0x00);
        let mut integer_tag = valid.clone();
        integer_tag[2] = 0x03;

        let cases: Vec<(&str, Vec<u8>)> = vec![
            ("empty", vec![]),
            ("tag only", vec![0x30]),
            ("wrong tag", wrong_tag),
            ("length mismatch", wrong_length),
            ("trailing bytes", trailing),
            ("integer tag", integer_tag),
            ("long form", vec![0x30, 0x81, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01]),
            ("empty integer", vec![0x30, 0x05, 0x02, 0x00, 0x02, 0x01, 0x01]),
            ("negative", vec![0x30, 0x06, 0x02, 0x01, 0x80, 0x02, 0x01, 0x01]),
            ("missing s", vec![0x30, 0x03, 0x02, 0x01, 0x01]),
        ];

        for (name, der) in cases {
            assert!(
                matches!(decode_der(&der), Err(Error::MalformedDer(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn decode_rejects_oversized_integers() {
        let mut der = vec![0x30, 0x26, 0x02, 0x21, 0x01];
        der.extend_from_slice(&[0u8; 32]);
        der.extend_from_slice(&[0x02, 0x01, 0x01]);
        assert!(matches!(decode_der(&der), Err(Error::MalformedDer(_))));

        let mut der = vec![0x30, 0x27, 0x02, 0x22, 0x00, 0x00];
        der.extend_from_slice(&[0x01; 32]);
        der.extend_from_slice(&[0x02, 0x01, 0x01]);
        assert!(matches!(decode_der(&der), Err(Error::MalformedDer(_))));
    }
}
