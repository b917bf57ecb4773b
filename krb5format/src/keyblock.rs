use crate::{
    codec::{Decoder, Encoder},
    Error,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyblock {
    pub enctype: Enctype,
    /// Second 16-bit type field carried by versions after 0x0502.
    pub etype: Option<u16>,
    pub contents: Vec<u8>,
}

impl Keyblock {
    pub fn new(enctype: Enctype, contents: &[u8]) -> Self {
        Self {
            enctype,
            etype: None,
            contents: contents.to_owned(),
        }
    }

    // keyblock ::=
    //     enctype (16 bits)
    //     etype (16 bits) [versions after 0x0502]
    //     length (16 bits)
    //     contents (length bytes)
    pub(crate) fn decode(decoder: &mut Decoder) -> anyhow::Result<Self> {
        let enctype = Enctype(decoder.read_u16()?);
        let etype = if decoder.version().has_etype() {
            Some(decoder.read_u16()?)
        } else {
            None
        };
        let size = decoder.read_u16()?;
        let contents = decoder.read_bytes(size.into())?;
        Ok(Self {
            enctype,
            etype,
            contents,
        })
    }

    pub(crate) fn encode(
        &self,
        encoder: &mut Encoder,
        format_error: &'static Error,
    ) -> anyhow::Result<()> {
        encoder.write_u16(self.enctype.0)?;
        if encoder.version().has_etype() {
            encoder.write_u16(self.etype.unwrap_or(self.enctype.0))?;
        }
        let size = u16::try_from(self.contents.len()).map_err(|_| format_error)?;
        encoder.write_u16(size)?;
        encoder.write_bytes(&self.contents);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enctype(pub u16);

macro_rules! enctype {
    ($enctype:ident, $int:expr) => {
        pub const $enctype: Enctype = Enctype($int);
    };
}

impl Enctype {
    enctype!(NULL, 0x0000);
    // @deprecated no longer supported
    enctype!(DES_CBC_CRC, 0x0001);
    // @deprecated no longer supported
    enctype!(DES_CBC_MD5, 0x0003);
    enctype!(DES3_CBC_SHA1, 0x0010);
    // RFC 3962
    enctype!(AES128_CTS_HMAC_SHA1_96, 0x0011);
    // RFC 3962
    enctype!(AES256_CTS_HMAC_SHA1_96, 0x0012);
    // RFC 8009
    enctype!(AES128_CTS_HMAC_SHA256_128, 0x0013);
    // RFC 8009
    enctype!(AES256_CTS_HMAC_SHA384_192, 0x0014);
    // RFC 4757
    enctype!(ARCFOUR_HMAC, 0x0017);
    // RFC 6803
    enctype!(CAMELLIA128_CTS_CMAC, 0x0019);
    // RFC 6803
    enctype!(CAMELLIA256_CTS_CMAC, 0x001a);
}
