mod credential;
mod file_format;

pub use self::{
    credential::{Credential, Header, TicketTimes},
    file_format::CcacheFormat,
};
use crate::{Container, Context, Principal};
use chrono::{DateTime, Duration, Utc};

const FCC_TAG_DELTATIME: u16 = 1;

/// Everything in a credential cache file before the first credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcacheIntro {
    pub headers: Vec<Header>,
    pub default_principal: Principal,
}

pub type CredentialCache = Container<CcacheFormat>;

impl Container<CcacheFormat> {
    pub fn load_default(context: &Context) -> anyhow::Result<Self> {
        let name = context.default_ccache_name()?;
        Self::load(Context::ccache_path(&name)?)
    }

    pub fn default_principal(&self) -> &Principal {
        &self.intro().default_principal
    }

    pub fn headers(&self) -> &[Header] {
        &self.intro().headers
    }

    /// KDC clock offset `(seconds, microseconds)` relative to the client, from
    /// the header field with tag 1.
    pub fn kdc_time_offset(&self) -> Option<(i32, i32)> {
        let header = self
            .headers()
            .iter()
            .find(|header| header.tag == FCC_TAG_DELTATIME)?;
        if header.value.len() != 8 {
            return None;
        }
        let seconds = i32::from_be_bytes(header.value[..4].try_into().ok()?);
        let microseconds = i32::from_be_bytes(header.value[4..].try_into().ok()?);
        Some((seconds, microseconds))
    }

    /// The first ticket-granting ticket in the cache.
    pub fn find_tgt(&self) -> Option<&Credential> {
        self.iter().find(|credential| credential.server.is_tgs())
    }

    /// Whether the first TGT ends at or before `now + grace`, or `None` when
    /// the cache holds no TGT.
    pub fn is_tgt_expiring(&self, now: DateTime<Utc>, grace: Duration) -> Option<bool> {
        let tgt = self.find_tgt()?;
        let deadline = now.timestamp().saturating_add(grace.num_seconds());
        Some(i64::from(tgt.times.endtime) <= deadline)
    }

    pub fn is_tgt_expiring_now(&self, grace: Duration) -> Option<bool> {
        self.is_tgt_expiring(Utc::now(), grace)
    }
}
