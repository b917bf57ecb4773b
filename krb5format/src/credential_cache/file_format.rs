use super::{CcacheIntro, Credential, Header, TicketTimes};
use crate::{codec::Decoder, Error, Format, Keyblock, Principal};

/// The MIT `FILE` credential cache layout.
#[derive(Debug, Clone, Copy)]
pub struct CcacheFormat;

impl Format for CcacheFormat {
    type Intro = CcacheIntro;
    type Entry = Credential;

    const NAME: &'static str = "credential cache";
    const BAD_VERSION: &'static Error = Error::KRB5_CCACHE_BADVNO;
    const FORMAT_ERROR: &'static Error = Error::KRB5_CC_FORMAT;

    // After the two-byte version indicator, the file has three parts:
    // - the header,
    // - the default principal name,
    // - and a sequence of credentials.
    fn read_intro(decoder: &mut Decoder) -> anyhow::Result<CcacheIntro> {
        let headers = Self::read_headers(decoder)?;
        let default_principal = Principal::decode(decoder)?;
        Ok(CcacheIntro {
            headers,
            default_principal,
        })
    }

    // credential ::=
    //     client (principal)
    //     server (principal)
    //     keyblock (keyblock)
    //     authtime, starttime, endtime, renew_till (32 bits each)
    //     is_skey (1 byte)
    //     ticket_flags (32 bits, little-endian)
    //     addresses (32-bit count, then data)
    //     authdata (32-bit count, then data)
    //     ticket (data)
    //     second_ticket (data)
    //
    // There is no count of credentials or marker at the end of the sequence;
    // it ends when the file ends.
    fn read_entry(decoder: &mut Decoder) -> anyhow::Result<Option<Credential>> {
        if decoder.at_end(Principal::leading_width(decoder)) {
            return Ok(None);
        }
        let client = Principal::decode(decoder)?;
        let server = Principal::decode(decoder)?;
        let keyblock = Keyblock::decode(decoder)?;
        let times = Self::read_ticket_times(decoder)?;
        let is_skey = decoder.read_u8()?;
        let ticket_flags = decoder.read_u32_le()?;
        let addresses = Self::read_segments(decoder)?;
        let authdata = Self::read_segments(decoder)?;
        let ticket = decoder.read_array()?;
        let second_ticket = decoder.read_array()?;
        Ok(Some(Credential {
            client,
            server,
            keyblock,
            times,
            is_skey,
            ticket_flags,
            addresses,
            authdata,
            ticket,
            second_ticket,
        }))
    }
}

impl CcacheFormat {
    // The header begins with a 16-bit integer giving the length of the entire
    // header, followed by a sequence of fields. Each field consists of a 16-bit
    // tag, a 16-bit length, and a value of the given length.
    fn read_headers(decoder: &mut Decoder) -> anyhow::Result<Vec<Header>> {
        let mut header_size = usize::from(decoder.read_u16()?);
        let mut headers = vec![];
        while header_size > 0 {
            if header_size < 4 {
                Err(Error::KRB5_CC_FORMAT)?
            }
            let tag = decoder.read_u16()?;
            let field_size = match usize::from(decoder.read_u16()?) {
                size if size <= header_size - 4 => size,
                _ => Err(Error::KRB5_CC_FORMAT)?,
            };
            let value = decoder.read_bytes(field_size)?;
            headers.push(Header { tag, value });
            header_size -= 4 + field_size;
        }
        Ok(headers)
    }

    fn read_ticket_times(decoder: &mut Decoder) -> anyhow::Result<TicketTimes> {
        Ok(TicketTimes {
            authtime: decoder.read_u32()?,
            starttime: decoder.read_u32()?,
            endtime: decoder.read_u32()?,
            renew_till: decoder.read_u32()?,
        })
    }

    fn read_segments(decoder: &mut Decoder) -> anyhow::Result<Vec<Vec<u8>>> {
        let count = decoder.read_u32()?;
        let mut segments = vec![];
        for _ in 0..count {
            segments.push(decoder.read_array()?);
        }
        Ok(segments)
    }
}
