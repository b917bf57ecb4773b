mod file_format;
mod keytab_entry;

pub use self::{
    file_format::KeytabFormat,
    keytab_entry::{KeytabEntry, Kvno},
};
use crate::{codec::Encoder, Container, Context, Error, FormatVersion};
use anyhow::Context as _;
use regex::Regex;
use std::{
    fs::{OpenOptions, Permissions},
    io::Write,
    os::unix::fs::{OpenOptionsExt, PermissionsExt},
    path::Path,
};

const KEYTAB_FILE_MODE: u32 = 0o600;

pub type Keytab = Container<KeytabFormat>;

impl Container<KeytabFormat> {
    pub fn empty(version: FormatVersion) -> Self {
        Self::new(version, ())
    }

    pub fn load_default(context: &Context) -> anyhow::Result<Self> {
        let name = context.default_keytab_name()?;
        Self::load(Context::keytab_path(&name)?)
    }

    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let mut encoder = Encoder::new(self.version());
        encoder.write_u16(self.version().tag())?;
        for entry in self {
            KeytabFormat::write_entry(entry, &mut encoder)?;
        }
        Ok(encoder.into_bytes())
    }

    /// Writes the keytab to `path`, replacing any existing file and leaving it
    /// readable and writable by the owner only.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let data = self.to_bytes()?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(KEYTAB_FILE_MODE)
            .open(path)
            .context(Error::KRB5_KT_NOWRITE)?;
        // `mode` only applies to newly created files.
        file.set_permissions(Permissions::from_mode(KEYTAB_FILE_MODE))
            .context(Error::KRB5_KT_NOWRITE)?;
        file.write_all(&data).context(Error::KRB5_KT_IOERR)?;
        file.flush().context(Error::KRB5_KT_IOERR)?;
        log::debug!("saved {} keytab entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Removes every entry whose principal does not match `pattern` at its
    /// start.
    pub fn filter(&mut self, pattern: &str) -> anyhow::Result<()> {
        let regex = Regex::new(&format!("^(?:{})", pattern))?;
        self.retain_matching(&regex);
        Ok(())
    }

    pub fn retain_matching(&mut self, regex: &Regex) {
        let before = self.len();
        self.retain(|entry| regex.is_match(&entry.principal.value()));
        log::debug!("keytab filter kept {} of {} entries", self.len(), before);
    }

    /// First entry for the given `comp/comp@REALM` principal.
    pub fn find(&self, principal: &str) -> Option<&KeytabEntry> {
        self.iter().find(|entry| entry.principal.value() == principal)
    }
}
