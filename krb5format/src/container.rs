use crate::{codec::Decoder, Error, FormatVersion};
use anyhow::Context as _;
use std::{fmt::Debug, fs, path::Path};

/// One of the on-disk layouts sharing the version-prefixed container shape.
pub trait Format {
    type Intro: Debug + Clone;
    type Entry: Debug + Clone;

    const NAME: &'static str;
    const BAD_VERSION: &'static Error;
    const FORMAT_ERROR: &'static Error;

    fn read_intro(decoder: &mut Decoder) -> anyhow::Result<Self::Intro>;

    /// Decodes the next entry, or returns `None` at a clean end of input.
    fn read_entry(decoder: &mut Decoder) -> anyhow::Result<Option<Self::Entry>>;
}

/// Decoded keytab or credential cache: file-level data plus the entries in
/// file order.
#[derive(Debug, Clone)]
pub struct Container<F: Format> {
    version: FormatVersion,
    intro: F::Intro,
    entries: Vec<F::Entry>,
}

impl<F: Format> Container<F> {
    pub fn new(version: FormatVersion, intro: F::Intro) -> Self {
        Self {
            version,
            intro,
            entries: vec![],
        }
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("while reading {}", path.display()))?;
        log::debug!("loading {} from {}", F::NAME, path.display());
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> anyhow::Result<Self> {
        let tag = match data {
            [high, low, ..] => u16::from_be_bytes([*high, *low]),
            _ => Err(F::BAD_VERSION)?,
        };
        let version = FormatVersion::from_tag(tag, F::BAD_VERSION)?;
        log::debug!("{} format version {:#06x}", F::NAME, tag);

        let mut decoder = Decoder::new(data, version, F::FORMAT_ERROR);
        decoder.skip(2)?;
        let intro = F::read_intro(&mut decoder)?;

        let mut entries = vec![];
        while let Some(entry) = F::read_entry(&mut decoder)? {
            let (count, offset) = (entries.len(), decoder.position());
            log::trace!("{} entry {} ends at offset {}", F::NAME, count, offset);
            entries.push(entry);
        }
        log::debug!("loaded {} {} entries", entries.len(), F::NAME);

        Ok(Self {
            version,
            intro,
            entries,
        })
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn intro(&self) -> &F::Intro {
        &self.intro
    }

    pub fn entries(&self) -> &[F::Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, F::Entry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&F::Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: F::Entry) {
        self.entries.push(entry);
    }

    pub fn remove(&mut self, index: usize) -> Option<F::Entry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Keeps the entries for which `keep` returns true, in their current order.
    pub fn retain(&mut self, keep: impl FnMut(&F::Entry) -> bool) {
        self.entries.retain(keep);
    }
}

impl<'a, F: Format> IntoIterator for &'a Container<F> {
    type Item = &'a F::Entry;
    type IntoIter = std::slice::Iter<'a, F::Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
