use crate::{Error, FormatVersion, LengthWidth, PrincipalLayout};
use byteorder::{BigEndian, WriteBytesExt};
use nom::{
    bytes::complete::take,
    number::{complete as number, Endianness},
    IResult,
};

type ParseError<'a> = nom::error::Error<&'a [u8]>;

/// Cursor over an in-memory keytab or ccache image.
///
/// Fixed-width reads that run out of input fail with `KRB5_DATA_TRUNCATED`.
/// Length-prefixed reads whose length exceeds the remaining input fail with
/// the format error given at construction.
#[derive(Debug)]
pub struct Decoder<'a> {
    input: &'a [u8],
    position: usize,
    version: FormatVersion,
    layout: PrincipalLayout,
    format_error: &'static Error,
}

macro_rules! read_int {
    ($fn:ident, $type:ident, $endianness:expr) => {
        pub(crate) fn $fn(&mut self) -> anyhow::Result<$type> {
            let parser = number::$type::<&[u8], ParseError>($endianness);
            Ok(self.parse(parser).ok_or(Error::KRB5_DATA_TRUNCATED)?)
        }
    };
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(
        input: &'a [u8],
        version: FormatVersion,
        format_error: &'static Error,
    ) -> Self {
        Self {
            input,
            position: 0,
            version,
            layout: version.principal_layout(),
            format_error,
        }
    }

    pub(crate) fn version(&self) -> FormatVersion {
        self.version
    }

    pub(crate) fn layout(&self) -> PrincipalLayout {
        self.layout
    }

    /// Offset from the start of the image this decoder was created over.
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn remaining(&self) -> usize {
        self.input.len()
    }

    /// True when fewer than `width` bytes are left, i.e. a record boundary
    /// with no room for the first field of another record.
    pub(crate) fn at_end(&self, width: usize) -> bool {
        self.input.len() < width
    }

    fn parse<T>(
        &mut self,
        parser: impl FnOnce(&'a [u8]) -> IResult<&'a [u8], T, ParseError<'a>>,
    ) -> Option<T> {
        let (rest, value) = parser(self.input).ok()?;
        self.position += self.input.len() - rest.len();
        self.input = rest;
        Some(value)
    }

    read_int!(read_u16, u16, Endianness::Big);
    read_int!(read_i32, i32, Endianness::Big);
    read_int!(read_u32, u32, Endianness::Big);
    read_int!(read_u32_le, u32, Endianness::Little);

    pub(crate) fn read_u8(&mut self) -> anyhow::Result<u8> {
        Ok(self
            .parse(number::u8::<&[u8], ParseError>)
            .ok_or(Error::KRB5_DATA_TRUNCATED)?)
    }

    /// Reads a bare length field whose width depends on the file version.
    pub(crate) fn read_length(&mut self) -> anyhow::Result<usize> {
        match self.version.array_width() {
            LengthWidth::U16 => Ok(self.read_u16()?.into()),
            LengthWidth::U32 => Ok(self.read_u32()? as usize),
        }
    }

    fn take(&mut self, size: usize) -> anyhow::Result<&'a [u8]> {
        let bytes = self
            .parse(take::<usize, &[u8], ParseError>(size))
            .ok_or(self.format_error)?;
        Ok(bytes)
    }

    pub(crate) fn read_bytes(&mut self, size: usize) -> anyhow::Result<Vec<u8>> {
        Ok(self.take(size)?.to_vec())
    }

    pub(crate) fn read_array(&mut self) -> anyhow::Result<Vec<u8>> {
        let size = self.read_length()?;
        self.read_bytes(size)
    }

    pub(crate) fn skip(&mut self, size: usize) -> anyhow::Result<()> {
        self.take(size)?;
        Ok(())
    }

    /// Splits off the next `size` bytes as a decoder of their own.
    pub(crate) fn split(&mut self, size: usize) -> anyhow::Result<Decoder<'a>> {
        let position = self.position;
        let input = self.take(size)?;
        Ok(Decoder {
            input,
            position,
            version: self.version,
            layout: self.layout,
            format_error: self.format_error,
        })
    }
}

/// Big-endian writer mirroring [`Decoder`].
#[derive(Debug)]
pub struct Encoder {
    buf: Vec<u8>,
    version: FormatVersion,
}

macro_rules! write_int {
    ($fn:ident, $type:ident) => {
        pub(crate) fn $fn(&mut self, value: $type) -> anyhow::Result<()> {
            self.buf.$fn::<BigEndian>(value)?;
            Ok(())
        }
    };
}

impl Encoder {
    pub(crate) fn new(version: FormatVersion) -> Self {
        Self {
            buf: vec![],
            version,
        }
    }

    pub(crate) fn version(&self) -> FormatVersion {
        self.version
    }

    pub(crate) fn layout(&self) -> PrincipalLayout {
        self.version.principal_layout()
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    write_int!(write_u16, u16);
    write_int!(write_i32, i32);
    write_int!(write_u32, u32);

    pub(crate) fn write_u8(&mut self, value: u8) -> anyhow::Result<()> {
        self.buf.write_u8(value)?;
        Ok(())
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn write_length(
        &mut self,
        length: usize,
        format_error: &'static Error,
    ) -> anyhow::Result<()> {
        match self.version.array_width() {
            LengthWidth::U16 => {
                let length = u16::try_from(length).map_err(|_| format_error)?;
                self.write_u16(length)?;
            }
            LengthWidth::U32 => {
                let length = u32::try_from(length).map_err(|_| format_error)?;
                self.write_u32(length)?;
            }
        }
        Ok(())
    }

    pub(crate) fn write_array(
        &mut self,
        bytes: &[u8],
        format_error: &'static Error,
    ) -> anyhow::Result<()> {
        self.write_length(bytes.len(), format_error)?;
        self.write_bytes(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(input: &[u8], version: FormatVersion) -> Decoder {
        Decoder::new(input, version, Error::KRB5_KT_FORMAT)
    }

    #[test]
    fn reads_big_endian_integers() {
        let input = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0xff, 0xff, 0xff, 0xfe];
        let mut decoder = decoder(&input, FormatVersion::V2);
        assert_eq!(decoder.read_u8().unwrap(), 0x01);
        assert_eq!(decoder.read_u16().unwrap(), 0x0203);
        assert_eq!(decoder.read_u32().unwrap(), 0x04050607);
        assert_eq!(decoder.read_i32().unwrap(), -2);
        assert_eq!(decoder.position(), input.len());
        assert!(decoder.at_end(1));
    }

    #[test]
    fn reads_little_endian_flags() {
        let input = [0x00, 0x00, 0x40, 0x50];
        let mut decoder = decoder(&input, FormatVersion::V4);
        assert_eq!(decoder.read_u32_le().unwrap(), 0x50400000);
    }

    #[test]
    fn short_fixed_width_read_is_truncation() {
        let input = [0x00, 0x01, 0x02];
        let mut decoder = decoder(&input, FormatVersion::V2);
        let err = decoder.read_u32().unwrap_err();
        assert!(Error::is(&err, Error::KRB5_DATA_TRUNCATED));
        // A failed read consumes nothing.
        assert_eq!(decoder.remaining(), 3);
    }

    #[test]
    fn array_width_follows_version() {
        let narrow = [0x00, 0x02, b'a', b'b'];
        assert_eq!(
            decoder(&narrow, FormatVersion::V2).read_array().unwrap(),
            b"ab"
        );
        let wide = [0x00, 0x00, 0x00, 0x02, b'a', b'b'];
        assert_eq!(decoder(&wide, FormatVersion::V4).read_array().unwrap(), b"ab");
    }

    #[test]
    fn overlong_array_is_format_error() {
        let input = [0x00, 0x05, b'a', b'b'];
        let err = decoder(&input, FormatVersion::V2).read_array().unwrap_err();
        assert!(Error::is(&err, Error::KRB5_KT_FORMAT));
    }

    #[test]
    fn split_keeps_absolute_positions() {
        let input = [0xaa, 0x00, 0x01, 0x02, 0xbb];
        let mut decoder = decoder(&input, FormatVersion::V2);
        decoder.skip(1).unwrap();
        let mut body = decoder.split(3).unwrap();
        assert_eq!(body.position(), 1);
        assert_eq!(body.read_u16().unwrap(), 0x0001);
        assert_eq!(body.remaining(), 1);
        assert_eq!(decoder.read_u8().unwrap(), 0xbb);
    }

    #[test]
    fn encoder_mirrors_decoder() {
        let mut encoder = Encoder::new(FormatVersion::V4);
        encoder.write_u8(0x7f).unwrap();
        encoder.write_u16(0x0102).unwrap();
        encoder.write_i32(-1).unwrap();
        encoder.write_u32(0x0a0b0c0d).unwrap();
        encoder.write_array(b"realm", Error::KRB5_KT_FORMAT).unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(
            bytes,
            [
                0x7f, 0x01, 0x02, 0xff, 0xff, 0xff, 0xff, 0x0a, 0x0b, 0x0c, 0x0d, 0x00, 0x00,
                0x00, 0x05, b'r', b'e', b'a', b'l', b'm'
            ]
        );

        let mut decoder = decoder(&bytes, FormatVersion::V4);
        assert_eq!(decoder.read_u8().unwrap(), 0x7f);
        assert_eq!(decoder.read_u16().unwrap(), 0x0102);
        assert_eq!(decoder.read_i32().unwrap(), -1);
        assert_eq!(decoder.read_u32().unwrap(), 0x0a0b0c0d);
        assert_eq!(decoder.read_array().unwrap(), b"realm");
        assert!(decoder.at_end(1));
    }

    #[test]
    fn narrow_array_length_overflow_is_rejected() {
        let mut encoder = Encoder::new(FormatVersion::V2);
        let blob = vec![0; usize::from(u16::MAX) + 1];
        let err = encoder.write_array(&blob, Error::KRB5_KT_FORMAT).unwrap_err();
        assert!(Error::is(&err, Error::KRB5_KT_FORMAT));
    }
}
