use crate::{
    codec::{Decoder, Encoder},
    Error, PrincipalLayout,
};

const REALM_SEP: u8 = b'@';
const COMPONENT_SEP: u8 = b'/';
const KRB5_TGS_NAME: &str = "krbtgt";

/// A Kerberos principal as stored on disk: realm and components are opaque
/// byte strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name_type: Option<NameType>,
    pub realm: Vec<u8>,
    pub components: Vec<Vec<u8>>,
}

impl Principal {
    pub fn new(name_type: NameType, realm: &[u8], components: &[&[u8]]) -> Self {
        Self {
            name_type: Some(name_type),
            realm: realm.to_owned(),
            components: components.iter().map(|c| c.to_vec()).collect(),
        }
    }

    /// Builds a principal from its joined `comp1/comp2@REALM` form.
    ///
    /// The realm starts after the last `@`; nothing is unescaped, so a
    /// component containing `/` or `@` cannot be expressed this way. A value
    /// without `@` gets an empty realm and joins back as `name@`.
    pub fn from_value(value: &str, name_type: Option<NameType>) -> Self {
        let (name, realm) = value.rsplit_once('@').unwrap_or((value, ""));
        let components = name
            .split('/')
            .map(|c| c.as_bytes().to_owned())
            .collect();
        Self {
            name_type,
            realm: realm.as_bytes().to_owned(),
            components,
        }
    }

    /// The joined `comp1/comp2@REALM` form, with invalid UTF-8 replaced.
    pub fn value(&self) -> String {
        let name = self.components.join(&COMPONENT_SEP);
        let name = [name, self.realm.clone()].join(&REALM_SEP);
        String::from_utf8_lossy(&name).into_owned()
    }

    pub fn primary(&self) -> Option<&[u8]> {
        self.components.first().map(Vec::as_slice)
    }

    /// True for ticket-granting service principals (`krbtgt/REALM@...`).
    pub fn is_tgs(&self) -> bool {
        self.components.len() > 1 && self.primary() == Some(KRB5_TGS_NAME.as_bytes())
    }

    /// Width of the first field of an encoded principal.
    pub(crate) fn leading_width(decoder: &Decoder) -> usize {
        match decoder.layout() {
            PrincipalLayout::NameTypeFirst => 4,
            PrincipalLayout::NameTypeLast => decoder.version().array_width().bytes(),
        }
    }

    pub(crate) fn decode(decoder: &mut Decoder) -> anyhow::Result<Self> {
        let mut name_type = None;
        if decoder.layout() == PrincipalLayout::NameTypeFirst {
            name_type = Some(NameType(decoder.read_i32()?));
        }

        let component_count = decoder.read_length()?;
        let realm = decoder.read_array()?;
        let mut components = vec![];
        for _ in 0..component_count {
            components.push(decoder.read_array()?);
        }

        if decoder.layout() == PrincipalLayout::NameTypeLast {
            name_type = Some(NameType(decoder.read_i32()?));
        }

        Ok(Self {
            name_type,
            realm,
            components,
        })
    }

    pub(crate) fn encode(
        &self,
        encoder: &mut Encoder,
        format_error: &'static Error,
    ) -> anyhow::Result<()> {
        let name_type = self.name_type.unwrap_or(NameType::UNKNOWN);
        if encoder.layout() == PrincipalLayout::NameTypeFirst {
            encoder.write_i32(name_type.0)?;
        }

        encoder.write_length(self.components.len(), format_error)?;
        encoder.write_array(&self.realm, format_error)?;
        for component in &self.components {
            encoder.write_array(component, format_error)?;
        }

        if encoder.layout() == PrincipalLayout::NameTypeLast {
            encoder.write_i32(name_type.0)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameType(pub i32);

macro_rules! name_type {
    ($name_type:ident, $int:expr) => {
        pub const $name_type: NameType = NameType($int);
    };
}

impl NameType {
    // Name type not known
    name_type!(UNKNOWN, 0);
    // Just the name of the principal as in DCE, or for users
    name_type!(PRINCIPAL, 1);
    // Service and other unique instance (krbtgt)
    name_type!(SRV_INST, 2);
    // Service with host name as instance (telnet, rcommands)
    name_type!(SRV_HST, 3);
    // Service with host as remaining components
    name_type!(SRV_XHST, 4);
    // Unique ID
    name_type!(UID, 5);
    // PKINIT
    name_type!(X500_PRINCIPAL, 6);
    // Name in form of SMTP email name
    name_type!(SMTP_NAME, 7);
    // Windows 2000 UPN
    name_type!(ENTERPRISE_PRINCIPAL, 10);
    // Well-known (special) principal
    name_type!(WELLKNOWN, 11);
}
