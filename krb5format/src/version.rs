use crate::Error;

/// Version tag found in the first two bytes of keytab and ccache files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormatVersion {
    V1 = 0x0501,
    V2 = 0x0502,
    V3 = 0x0503,
    V4 = 0x0504,
}

impl FormatVersion {
    pub fn from_tag(tag: u16, bad_version: &'static Error) -> anyhow::Result<Self> {
        match tag {
            0x0501 => Ok(Self::V1),
            0x0502 => Ok(Self::V2),
            0x0503 => Ok(Self::V3),
            0x0504 => Ok(Self::V4),
            _ => Err(bad_version)?,
        }
    }

    pub fn tag(self) -> u16 {
        self as u16
    }

    // Only version 4 widens array lengths to 32 bits.
    pub fn array_width(self) -> LengthWidth {
        match self {
            Self::V4 => LengthWidth::U32,
            _ => LengthWidth::U16,
        }
    }

    pub fn principal_layout(self) -> PrincipalLayout {
        match self {
            Self::V4 => PrincipalLayout::NameTypeFirst,
            _ => PrincipalLayout::NameTypeLast,
        }
    }

    pub fn has_etype(self) -> bool {
        self > Self::V2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthWidth {
    U16,
    U32,
}

impl LengthWidth {
    pub fn bytes(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// Where the 32-bit name type sits relative to a principal's components.
///
/// Chosen once per file from its version and reused for every principal in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalLayout {
    /// name type, count, realm, components
    NameTypeFirst,
    /// count, realm, components, name type
    NameTypeLast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_4_uses_wide_arrays_and_leading_name_type() {
        let version = FormatVersion::V4;
        assert_eq!(version.array_width(), LengthWidth::U32);
        assert_eq!(version.principal_layout(), PrincipalLayout::NameTypeFirst);
        assert!(version.has_etype());
    }

    #[test]
    fn older_versions_use_narrow_arrays_and_trailing_name_type() {
        for version in [FormatVersion::V1, FormatVersion::V2, FormatVersion::V3] {
            assert_eq!(version.array_width(), LengthWidth::U16);
            assert_eq!(version.principal_layout(), PrincipalLayout::NameTypeLast);
        }
        assert!(!FormatVersion::V2.has_etype());
        assert!(FormatVersion::V3.has_etype());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = FormatVersion::from_tag(0x0505, Error::KRB5_KEYTAB_BADVNO).unwrap_err();
        assert!(Error::is(&err, Error::KRB5_KEYTAB_BADVNO));
        assert_eq!(
            FormatVersion::from_tag(0x0502, Error::KRB5_KEYTAB_BADVNO).unwrap(),
            FormatVersion::V2
        );
    }
}
