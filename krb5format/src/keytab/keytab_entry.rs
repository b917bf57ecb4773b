use crate::{Keyblock, Principal, Timestamp};

pub type Kvno = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeytabEntry {
    pub principal: Principal,
    pub timestamp: Timestamp,
    pub vno8: u8,
    pub key: Keyblock,
    /// 32-bit key version, present when the record had room for it.
    pub vno: Option<Kvno>,
}

impl KeytabEntry {
    pub fn new(principal: Principal, timestamp: Timestamp, kvno: Kvno, key: Keyblock) -> Self {
        Self {
            principal,
            timestamp,
            vno8: kvno as u8,
            key,
            vno: Some(kvno),
        }
    }

    /// The 32-bit key version overrides the 8-bit one unless it is zero fill.
    pub fn kvno(&self) -> Kvno {
        match self.vno {
            Some(vno) if vno != 0 => vno,
            _ => self.vno8.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Enctype, NameType};

    fn entry(vno8: u8, vno: Option<Kvno>) -> KeytabEntry {
        KeytabEntry {
            principal: Principal::new(NameType::PRINCIPAL, b"R", &[b"user"]),
            timestamp: 0,
            vno8,
            key: Keyblock::new(Enctype::AES256_CTS_HMAC_SHA1_96, &[0; 32]),
            vno,
        }
    }

    #[test]
    fn kvno_prefers_non_zero_32_bit_version() {
        assert_eq!(entry(3, None).kvno(), 3);
        assert_eq!(entry(3, Some(0)).kvno(), 3);
        assert_eq!(entry(4, Some(260)).kvno(), 260);
    }

    #[test]
    fn new_keeps_low_byte_in_vno8() {
        let entry = KeytabEntry::new(
            Principal::from_value("user@R", Some(NameType::PRINCIPAL)),
            1_700_000_000,
            257,
            Keyblock::new(Enctype::ARCFOUR_HMAC, &[1; 16]),
        );
        assert_eq!(entry.vno8, 1);
        assert_eq!(entry.kvno(), 257);
    }
}
