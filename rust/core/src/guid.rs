// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC compressed GUIDs
//!
//! IFC stores a 128-bit UUID as 22 characters from a 64-symbol alphabet:
//! the first byte takes two characters, the remaining fifteen bytes are
//! packed three at a time into four characters each.

use crate::error::{Error, Result};
use std::fmt;
use uuid::Uuid;

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Length of a compressed GUID
pub const IFC_GUID_LEN: usize = 22;

/// A 22-character IFC GlobalId
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct IfcGuid(String);

impl IfcGuid {
    /// Fresh random GUID
    pub fn new_random() -> Self {
        Self::from_uuid(&Uuid::new_v4())
    }

    /// Deterministic GUID derived from a seed string (UUIDv5, URL namespace)
    pub fn derived(seed: &str) -> Self {
        Self::from_uuid(&Uuid::new_v5(&Uuid::NAMESPACE_URL, seed.as_bytes()))
    }

    pub fn from_uuid(uuid: &Uuid) -> Self {
        Self(compress(uuid.as_bytes()))
    }

    /// Accept an externally supplied identifier.
    ///
    /// Either 32 hex digits (dashes allowed) or an already compressed
    /// 22-character GlobalId.
    pub fn parse(external: &str) -> Result<Self> {
        let trimmed = external.trim();
        let hex: String = trimmed.chars().filter(|c| *c != '-').collect();

        if hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let uuid = Uuid::parse_str(&hex)
                .map_err(|e| Error::InvalidGuid(external.to_string(), e.to_string()))?;
            return Ok(Self::from_uuid(&uuid));
        }

        if trimmed.len() == IFC_GUID_LEN {
            expand(trimmed)
                .map_err(|reason| Error::InvalidGuid(external.to_string(), reason))?;
            return Ok(Self(trimmed.to_string()));
        }

        Err(Error::InvalidGuid(
            external.to_string(),
            "expected 32 hex digits or a 22-character IFC GUID".to_string(),
        ))
    }

    /// Decode back to the underlying UUID
    pub fn to_uuid(&self) -> Result<Uuid> {
        let bytes = expand(&self.0).map_err(|reason| Error::InvalidGuid(self.0.clone(), reason))?;
        Ok(Uuid::from_bytes(bytes))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IfcGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn push_base64(out: &mut String, value: u32, digits: u32) {
    for i in (0..digits).rev() {
        let index = (value / 64u32.pow(i)) % 64;
        out.push(ALPHABET[index as usize] as char);
    }
}

fn compress(bytes: &[u8; 16]) -> String {
    let mut out = String::with_capacity(IFC_GUID_LEN);
    push_base64(&mut out, bytes[0] as u32, 2);
    for chunk in bytes[1..].chunks_exact(3) {
        let value = ((chunk[0] as u32) << 16) | ((chunk[1] as u32) << 8) | chunk[2] as u32;
        push_base64(&mut out, value, 4);
    }
    out
}

fn decode_char(c: u8) -> std::result::Result<u32, String> {
    ALPHABET
        .iter()
        .position(|a| *a == c)
        .map(|p| p as u32)
        .ok_or_else(|| format!("invalid character '{}'", c as char))
}

fn expand(guid: &str) -> std::result::Result<[u8; 16], String> {
    let chars = guid.as_bytes();
    if chars.len() != IFC_GUID_LEN {
        return Err(format!("expected {} characters", IFC_GUID_LEN));
    }

    let mut bytes = [0u8; 16];
    let head = decode_char(chars[0])? * 64 + decode_char(chars[1])?;
    if head > 255 {
        return Err("leading character out of range".to_string());
    }
    bytes[0] = head as u8;

    for (group, quad) in chars[2..].chunks_exact(4).enumerate() {
        let mut value = 0u32;
        for c in quad {
            value = value * 64 + decode_char(*c)?;
        }
        let offset = 1 + group * 3;
        bytes[offset] = (value >> 16) as u8;
        bytes[offset + 1] = (value >> 8) as u8;
        bytes[offset + 2] = value as u8;
    }

    Ok(bytes)
}
