//! Binary configuration persistence
//!
//! The validated configuration is stored as postcard data followed by a
//! little-endian CRC32 of the payload, so a board can boot without
//! re-parsing the text file.

use serde::{Deserialize, Serialize};

use super::rail::{KinematicsConfig, CONFIG_VERSION};
use crate::error::ConfigError;

/// Magic number identifying stored kinematics configuration
pub const CONFIG_MAGIC: u32 = 0x4241_5242; // "BARB"

/// Length of the trailing checksum
const CRC_LEN: usize = 4;

#[derive(Serialize, Deserialize)]
struct StoredConfig {
    magic: u32,
    config: KinematicsConfig,
}

/// Serialize `config` into `buf`, returning the used prefix
pub fn encode<'a>(config: &KinematicsConfig, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
    if buf.len() < CRC_LEN {
        return Err(ConfigError::Encode);
    }
    let stored = StoredConfig {
        magic: CONFIG_MAGIC,
        config: config.clone(),
    };

    let payload_cap = buf.len() - CRC_LEN;
    let payload_len = postcard::to_slice(&stored, &mut buf[..payload_cap])
        .map_err(|_| ConfigError::Encode)?
        .len();

    let crc = crc32(&buf[..payload_len]);
    buf[payload_len..payload_len + CRC_LEN].copy_from_slice(&crc.to_le_bytes());
    Ok(&mut buf[..payload_len + CRC_LEN])
}

/// Deserialize a configuration written by [`encode`]
pub fn decode(bytes: &[u8]) -> Result<KinematicsConfig, ConfigError> {
    if bytes.len() < CRC_LEN {
        return Err(ConfigError::Decode);
    }
    let (payload, crc_bytes) = bytes.split_at(bytes.len() - CRC_LEN);
    let mut stored_crc = [0u8; CRC_LEN];
    stored_crc.copy_from_slice(crc_bytes);
    if u32::from_le_bytes(stored_crc) != crc32(payload) {
        return Err(ConfigError::Decode);
    }

    let stored: StoredConfig = postcard::from_bytes(payload).map_err(|_| ConfigError::Decode)?;
    if stored.magic != CONFIG_MAGIC || stored.config.version != CONFIG_VERSION {
        return Err(ConfigError::Decode);
    }
    Ok(stored.config)
}

/// CRC32 (IEEE 802.3 polynomial)
fn crc32(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = 0xFFFF_FFFFu32;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}
