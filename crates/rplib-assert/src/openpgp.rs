//! OpenPGP packet framing (RFC 4880 §4.2) for device public keys.
//!
//! Only the framing is interpreted. Key material is carried through
//! untouched, so any key algorithm `gpg` produces can be encoded.

use crate::errors::PacketError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Packet tag of a primary public key.
pub const TAG_PUBLIC_KEY: u8 = 6;

/// Packet tag of a user ID.
pub const TAG_USER_ID: u8 = 13;

/// Format prefix of an encoded public key.
pub const KEY_FORMAT: &str = "openpgp";

/// A single OpenPGP packet: tag plus body, header stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet tag (6 = public key, 13 = user ID, ...).
    pub tag: u8,
    /// Packet body without the framing header.
    pub body: Vec<u8>,
}

impl Packet {
    /// Creates a packet from a tag and body.
    pub fn new(tag: u8, body: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            body: body.into(),
        }
    }

    /// Serializes the packet with a new-format header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.body.len();
        let mut bytes = Vec::with_capacity(len + 6);
        bytes.push(0x80 | 0x40 | self.tag);
        if len < 192 {
            bytes.push(len as u8);
        } else if len < 8384 {
            let adjusted = len - 192;
            bytes.push(192 + (adjusted >> 8) as u8);
            bytes.push((adjusted & 0xff) as u8);
        } else {
            bytes.push(255);
            bytes.extend_from_slice(&(len as u32).to_be_bytes());
        }
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Splits a binary OpenPGP stream (e.g. `gpg --export` output) into packets.
///
/// Both old-format and new-format headers are accepted.
///
/// # Errors
///
/// Returns [`PacketError`] if the stream is truncated, a tag byte is invalid,
/// or a packet uses partial body lengths.
pub fn parse_packets(data: &[u8]) -> Result<Vec<Packet>, PacketError> {
    let mut packets = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let start = offset;
        let byte = data[offset];
        if byte & 0x80 == 0 {
            return Err(PacketError::InvalidTag {
                byte,
                offset: start,
            });
        }
        offset += 1;

        let (tag, len) = if byte & 0x40 == 0 {
            let tag = (byte >> 2) & 0x0f;
            let len = match byte & 0x03 {
                0 => read_be(data, &mut offset, 1, start)?,
                1 => read_be(data, &mut offset, 2, start)?,
                2 => read_be(data, &mut offset, 4, start)?,
                // Indeterminate length runs to the end of the stream
                _ => data.len() - offset,
            };
            (tag, len)
        } else {
            let tag = byte & 0x3f;
            let first = read_be(data, &mut offset, 1, start)?;
            let len = match first {
                0..=191 => first,
                192..=223 => {
                    let second = read_be(data, &mut offset, 1, start)?;
                    ((first - 192) << 8) + second + 192
                }
                255 => read_be(data, &mut offset, 4, start)?,
                _ => return Err(PacketError::PartialLength { offset: start }),
            };
            (tag, len)
        };

        let end = offset
            .checked_add(len)
            .filter(|end| *end <= data.len())
            .ok_or(PacketError::Truncated { offset: start })?;
        packets.push(Packet::new(tag, &data[offset..end]));
        offset = end;
    }

    Ok(packets)
}

fn read_be(
    data: &[u8],
    offset: &mut usize,
    width: usize,
    start: usize,
) -> Result<usize, PacketError> {
    let bytes = data
        .get(*offset..*offset + width)
        .ok_or(PacketError::Truncated { offset: start })?;
    *offset += width;
    Ok(bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize))
}

/// Name portion of a user ID (`Name (comment) <email>`).
fn user_id_name(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let end = text.find(['(', '<']).unwrap_or(text.len());
    text[..end].trim().to_string()
}

/// Finds the primary public key owning a user ID whose name is `name`.
///
/// # Errors
///
/// Returns [`PacketError::KeyNotFound`] if no such key exists.
pub fn find_primary_key<'a>(packets: &'a [Packet], name: &str) -> Result<&'a Packet, PacketError> {
    let mut primary: Option<&Packet> = None;
    for packet in packets {
        match packet.tag {
            TAG_PUBLIC_KEY => primary = Some(packet),
            TAG_USER_ID if user_id_name(&packet.body) == name => {
                if let Some(key) = primary {
                    return Ok(key);
                }
            }
            _ => {}
        }
    }
    Err(PacketError::KeyNotFound(name.to_string()))
}

/// Encodes a public key packet as `openpgp <base64 of the framed packet>`.
pub fn encode_public_key(packet: &Packet) -> String {
    format!("{KEY_FORMAT} {}", STANDARD.encode(packet.to_bytes()))
}

/// Encodes the key named `name` from an exported keyring.
///
/// The result is a single line, suitable for the `device-key` header.
pub fn encode_keyring_key(exported: &[u8], name: &str) -> Result<String, PacketError> {
    let packets = parse_packets(exported)?;
    let key = find_primary_key(&packets, name)?;
    Ok(encode_public_key(key).replace('\n', ""))
}
