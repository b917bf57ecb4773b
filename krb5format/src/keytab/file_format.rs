use super::KeytabEntry;
use crate::{
    codec::{Decoder, Encoder},
    Error, Format, Keyblock, Principal,
};
use std::mem::size_of;

/// The MIT `FILE` keytab layout.
#[derive(Debug, Clone, Copy)]
pub struct KeytabFormat;

impl Format for KeytabFormat {
    type Intro = ();
    type Entry = KeytabEntry;

    const NAME: &'static str = "keytab";
    const BAD_VERSION: &'static Error = Error::KRB5_KEYTAB_BADVNO;
    const FORMAT_ERROR: &'static Error = Error::KRB5_KT_FORMAT;

    fn read_intro(_: &mut Decoder) -> anyhow::Result<()> {
        Ok(())
    }

    // After the two-byte version indicator, the file contains a sequence of
    // signed 32-bit record lengths followed by key records or holes. A positive
    // record length indicates a key entry whose size is equal to or less than
    // the record length. A negative length indicates a hole whose size is the
    // inverse of the length. A length of 0, or fewer than 4 bytes left,
    // indicates the end of the file.
    fn read_entry(decoder: &mut Decoder) -> anyhow::Result<Option<KeytabEntry>> {
        loop {
            if decoder.at_end(size_of::<i32>()) {
                return Ok(None);
            }
            let offset = decoder.position();
            match decoder.read_i32()? {
                0 => return Ok(None),
                i32::MIN => Err(Error::KRB5_KT_FORMAT)?,
                size if size < 0 => {
                    log::debug!("skipping {}-byte hole at offset {}", -size, offset);
                    decoder.skip(size.unsigned_abs() as usize)?;
                }
                size => {
                    let mut record = decoder.split(size as usize)?;
                    return Self::read_record(&mut record).map(Some);
                }
            }
        }
    }
}

impl KeytabFormat {
    // entry ::=
    //     principal
    //     timestamp (32 bits)
    //     key version (8 bits)
    //     keyblock
    //     key version (32 bits) [if at least 4 bytes remain in the record]
    //
    // Anything left in the record after that is skipped.
    fn read_record(record: &mut Decoder) -> anyhow::Result<KeytabEntry> {
        let principal = Principal::decode(record)?;
        let timestamp = record.read_u32()?;
        let vno8 = record.read_u8()?;
        let key = Keyblock::decode(record)?;
        let vno = if record.remaining() >= size_of::<u32>() {
            Some(record.read_u32()?)
        } else {
            None
        };
        if record.remaining() > 0 {
            log::trace!(
                "ignoring {} trailing bytes at offset {}",
                record.remaining(),
                record.position()
            );
        }
        Ok(KeytabEntry {
            principal,
            timestamp,
            vno8,
            key,
            vno,
        })
    }

    pub(crate) fn write_entry(entry: &KeytabEntry, encoder: &mut Encoder) -> anyhow::Result<()> {
        let mut record = Encoder::new(encoder.version());
        entry.principal.encode(&mut record, Error::KRB5_KT_FORMAT)?;
        record.write_u32(entry.timestamp)?;
        record.write_u8(entry.vno8)?;
        entry.key.encode(&mut record, Error::KRB5_KT_FORMAT)?;
        if let Some(vno) = entry.vno {
            record.write_u32(vno)?;
        }
        let size = i32::try_from(record.len()).map_err(|_| Error::KRB5_KT_FORMAT)?;
        encoder.write_i32(size)?;
        encoder.write_bytes(&record.into_bytes());
        Ok(())
    }
}
