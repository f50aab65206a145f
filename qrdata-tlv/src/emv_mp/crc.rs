//! CRC of EMV merchant-presented payloads
//!
//! The CRC object `63 04 XXXX` is the last object of a payload. Its value is
//! the upper-case hex CRC-16/CCITT-FALSE over all preceding bytes including
//! the `6304` tag and length.

use qrdata_core::{QrDataError, QrDataResult};

const INITIAL_CRC: u16 = 0xFFFF;
const POLYNOMIAL: u16 = 0x1021;

/// Tag and length of the CRC object
pub const CRC_PREFIX: &[u8] = b"6304";

/// Precomputed CRC table
static CRC_TABLE: once_cell::sync::Lazy<[u16; 256]> = once_cell::sync::Lazy::new(|| {
    let mut table = [0u16; 256];
    for b in 0..=0xFFu16 {
        let mut v = b << 8;
        for _ in 0..8 {
            if v & 0x8000 != 0 {
                v = (v << 1) ^ POLYNOMIAL;
            } else {
                v <<= 1;
            }
        }
        table[b as usize] = v;
    }
    table
});

/// CRC-16/CCITT-FALSE of `data`
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(INITIAL_CRC, |crc, &byte| {
        (crc << 8) ^ CRC_TABLE[(((crc >> 8) ^ byte as u16) & 0xFF) as usize]
    })
}

/// Check the trailing CRC object of a merchant-presented payload
///
/// # Error Handling
/// Returns [`QrDataError::StructuralDecode`] if the payload does not end in a
/// `6304XXXX` object and [`QrDataError::InvalidData`] if the CRC differs.
pub fn verify_crc(payload: &[u8]) -> QrDataResult<()> {
    if payload.len() < 8 || &payload[payload.len() - 8..payload.len() - 4] != CRC_PREFIX {
        return Err(QrDataError::StructuralDecode(
            "Payload does not end with a CRC object (6304XXXX)".to_string(),
        ));
    }

    let (covered, actual) = payload.split_at(payload.len() - 4);
    let actual = std::str::from_utf8(actual)
        .ok()
        .and_then(|s| u16::from_str_radix(s, 16).ok())
        .ok_or_else(|| {
            QrDataError::StructuralDecode(format!(
                "CRC value is not 4 hex digits: {}",
                String::from_utf8_lossy(actual)
            ))
        })?;

    let computed = crc16(covered);
    if computed != actual {
        log::warn!("EMV MP CRC mismatch: actual {:04X}, computed {:04X}", actual, computed);
        return Err(QrDataError::InvalidData(format!(
            "CRC mismatch. Actual: {:04X} / Computed: {:04X}",
            actual, computed
        )));
    }
    Ok(())
}

/// Append the CRC object to a payload body
pub fn append_crc(body: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(body.len() + 8);
    payload.extend_from_slice(body);
    payload.extend_from_slice(CRC_PREFIX);
    let crc = crc16(&payload);
    payload.extend_from_slice(format!("{:04X}", crc).as_bytes());
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    const QRPH_BODY: &str = "00020101021228650011ph.ppmi.p2m0111BNORPHMMXXX031091821299080410918212990805033115204531153036085406623.405802PH5917SM STORE CLARK QR6008PAMPANGA62370011ph.ppmi.p2m050624268907081330493088530012ph.ppmi.qrph0133116510000007~10202408274192141374";

    #[test]
    fn test_check_value() {
        assert_eq!(crc16(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_append_crc() {
        let payload = append_crc(QRPH_BODY.as_bytes());
        assert!(payload.ends_with(b"6304D094"));
        verify_crc(&payload).unwrap();
    }

    #[test]
    fn test_lower_case_crc_accepted() {
        let payload = format!("{}6304d094", QRPH_BODY);
        assert!(verify_crc(payload.as_bytes()).is_ok());
    }

    #[test]
    fn test_mismatch_and_missing() {
        let payload = format!("{}6304D095", QRPH_BODY);
        assert!(matches!(
            verify_crc(payload.as_bytes()),
            Err(QrDataError::InvalidData(_))
        ));
        assert!(matches!(
            verify_crc(b"000201"),
            Err(QrDataError::StructuralDecode(_))
        ));
    }
}
