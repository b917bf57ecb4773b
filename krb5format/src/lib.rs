//! Readers and writers for the MIT Kerberos keytab and credential cache file
//! formats.

mod codec;
mod container;
mod context;
mod credential_cache;
mod error;
mod keyblock;
mod keytab;
mod principal;
mod version;

pub use self::{
    container::{Container, Format},
    context::{Conf, Context, Profile},
    credential_cache::{
        CcacheFormat, CcacheIntro, Credential, CredentialCache, Header, TicketTimes,
    },
    error::{Error, ErrorCode},
    keyblock::{Enctype, Keyblock},
    keytab::{Keytab, KeytabEntry, KeytabFormat, Kvno},
    principal::{NameType, Principal},
    version::{FormatVersion, LengthWidth, PrincipalLayout},
};
use chrono::{DateTime, Duration, Utc};
use std::path::Path;

pub type Timestamp = u32;

// Largest span `chrono::Duration::seconds` accepts.
const MAX_GRACE_SECONDS: i64 = i64::MAX / 1000;

pub fn load_keytab(path: impl AsRef<Path>) -> anyhow::Result<Keytab> {
    Keytab::load(path)
}

pub fn save_keytab(keytab: &Keytab, path: impl AsRef<Path>) -> anyhow::Result<()> {
    keytab.save(path)
}

pub fn filter_keytab(keytab: &mut Keytab, pattern: &str) -> anyhow::Result<()> {
    keytab.filter(pattern)
}

pub fn load_credential_cache(path: impl AsRef<Path>) -> anyhow::Result<CredentialCache> {
    CredentialCache::load(path)
}

/// `None` means the cache holds no ticket-granting ticket.
pub fn is_tgt_expiring(
    cache: &CredentialCache,
    now: DateTime<Utc>,
    grace_seconds: i64,
) -> Option<bool> {
    let grace_seconds = grace_seconds.clamp(-MAX_GRACE_SECONDS, MAX_GRACE_SECONDS);
    cache.is_tgt_expiring(now, Duration::seconds(grace_seconds))
}
