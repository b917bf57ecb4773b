mod profile;

pub use self::profile::Profile;
use crate::Error;
use nix::unistd::{Uid, User};
use std::{env, path::PathBuf};

const KRB5_ENV_KTNAME: &str = "KRB5_KTNAME";
const KRB5_ENV_CCNAME: &str = "KRB5CCNAME";
const DEFKTNAME: &str = "FILE:/etc/krb5.keytab";
const DEFCCNAME: &str = "FILE:/tmp/krb5cc_%{uid}";
const DEFAULT_TMPDIR: &str = "/tmp";

pub struct Conf;

macro_rules! conf {
    ($name:ident, $value:expr) => {
        pub const $name: &'static str = $value;
    };
}

impl Conf {
    conf!(DEFAULT_CCACHE_NAME, "default_ccache_name");
    conf!(DEFAULT_KEYTAB_NAME, "default_keytab_name");
    conf!(LIBDEFAULTS, "libdefaults");
}

/// Library settings that decide where the default keytab and credential
/// cache live.
#[derive(Debug)]
pub struct Context {
    pub profile: Profile,
}

impl Context {
    pub fn init() -> anyhow::Result<Self> {
        Self::new(false)
    }

    pub fn init_secure() -> anyhow::Result<Self> {
        Self::new(true)
    }

    pub fn new(secure: bool) -> anyhow::Result<Self> {
        Ok(Self::with_profile(Profile::new(secure)?))
    }

    pub fn with_profile(profile: Profile) -> Self {
        Self { profile }
    }

    fn get_string(&self, name: &str) -> Option<String> {
        self.profile.get_string(&format!("{}.{}", Conf::LIBDEFAULTS, name))
    }

    pub fn default_keytab_name(&self) -> anyhow::Result<String> {
        if let Ok(name) = env::var(KRB5_ENV_KTNAME) {
            return Ok(name);
        }
        let name = self
            .get_string(Conf::DEFAULT_KEYTAB_NAME)
            .unwrap_or_else(|| DEFKTNAME.to_owned());
        Self::expand_path_tokens(&name)
    }

    pub fn default_ccache_name(&self) -> anyhow::Result<String> {
        if let Ok(name) = env::var(KRB5_ENV_CCNAME) {
            return Ok(name);
        }
        let name = self
            .get_string(Conf::DEFAULT_CCACHE_NAME)
            .unwrap_or_else(|| DEFCCNAME.to_owned());
        Self::expand_path_tokens(&name)
    }

    /// Path of a `FILE:` or `WRFILE:` keytab name.
    pub fn keytab_path(name: &str) -> anyhow::Result<PathBuf> {
        match Self::split_residual(name) {
            (None | Some("FILE" | "WRFILE"), path) => Ok(PathBuf::from(path)),
            _ => Err(Error::KRB5_KT_UNKNOWN_TYPE)?,
        }
    }

    /// Path of a `FILE:` credential cache name.
    pub fn ccache_path(name: &str) -> anyhow::Result<PathBuf> {
        match Self::split_residual(name) {
            (None | Some("FILE"), path) => Ok(PathBuf::from(path)),
            _ => Err(Error::KRB5_CC_UNKNOWN_TYPE)?,
        }
    }

    fn split_residual(name: &str) -> (Option<&str>, &str) {
        match name.split_once(':') {
            None => (None, name),
            // Use `FILE` when prefix is a drive letter
            Some((p, _)) if p.len() == 1 && p.as_bytes()[0].is_ascii_alphabetic() => (None, name),
            Some(_) if name.starts_with('/') => (None, name),
            Some((prefix, residual)) => (Some(prefix), residual),
        }
    }

    pub fn expand_path_tokens(path: &str) -> anyhow::Result<String> {
        let mut buf = String::new();
        let mut path_remained = path;
        while !path_remained.is_empty() {
            let token_begin = match path_remained.find("%{") {
                Some(token_begin) => {
                    buf.push_str(&path_remained[..token_begin]);
                    token_begin
                }
                None => {
                    buf.push_str(path_remained);
                    break;
                }
            };
            let token_end = match path_remained[token_begin..].find('}') {
                Some(token_end) => token_begin + token_end,
                None => Err(anyhow::anyhow!("Invalid argument"))?,
            };
            let token_value = Self::expand_token(&path_remained[token_begin + 2..token_end])?;
            buf.push_str(&token_value);
            path_remained = &path_remained[token_end + 1..];
        }
        Ok(buf)
    }

    fn expand_token(token: &str) -> anyhow::Result<String> {
        let token_value = match token {
            "euid" => Uid::effective().to_string(),
            "username" => User::from_uid(Uid::effective())?
                .map(|u| u.name)
                .unwrap_or_else(|| Uid::effective().to_string()),
            "uid" | "USERID" => Uid::current().to_string(),
            "TEMP" => env::var("TMPDIR").unwrap_or_else(|_| DEFAULT_TMPDIR.to_owned()),
            _ => Err(anyhow::anyhow!("Invalid argument"))?,
        };
        Ok(token_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn expands_uid_token() {
        let expanded = Context::expand_path_tokens("/tmp/krb5cc_%{uid}").unwrap();
        assert_eq!(expanded, format!("/tmp/krb5cc_{}", Uid::current()));
        assert_eq!(Context::expand_path_tokens("/etc/krb5.keytab").unwrap(), "/etc/krb5.keytab");
    }

    #[test]
    fn rejects_unknown_or_unterminated_tokens() {
        assert!(Context::expand_path_tokens("/tmp/%{nope}").is_err());
        assert!(Context::expand_path_tokens("/tmp/%{uid").is_err());
    }

    #[test]
    fn residual_types() {
        assert_eq!(
            Context::keytab_path("FILE:/etc/krb5.keytab").unwrap(),
            PathBuf::from("/etc/krb5.keytab")
        );
        assert_eq!(
            Context::keytab_path("WRFILE:/tmp/kt").unwrap(),
            PathBuf::from("/tmp/kt")
        );
        assert_eq!(
            Context::ccache_path("/tmp/krb5cc_0").unwrap(),
            PathBuf::from("/tmp/krb5cc_0")
        );
        let err = Context::ccache_path("KEYRING:persistent:0").unwrap_err();
        assert!(Error::is(&err, Error::KRB5_CC_UNKNOWN_TYPE));
        let err = Context::keytab_path("MEMORY:kt").unwrap_err();
        assert!(Error::is(&err, Error::KRB5_KT_UNKNOWN_TYPE));
    }

    #[test]
    fn profile_supplies_default_names() {
        let path = env::temp_dir().join(format!("krb5format-profile-{}.conf", std::process::id()));
        fs::write(
            &path,
            "[libdefaults]\ndefault_keytab_name = FILE:/srv/%{uid}.keytab\n",
        )
        .unwrap();
        let profile = Profile::from_files(&[path.to_string_lossy()]).unwrap();
        let context = Context::with_profile(profile);
        fs::remove_file(&path).unwrap();

        if env::var(KRB5_ENV_KTNAME).is_err() {
            assert_eq!(
                context.default_keytab_name().unwrap(),
                format!("FILE:/srv/{}.keytab", Uid::current())
            );
        }
        if env::var(KRB5_ENV_CCNAME).is_err() {
            assert_eq!(
                context.default_ccache_name().unwrap(),
                format!("FILE:/tmp/krb5cc_{}", Uid::current())
            );
        }
    }

    #[test]
    fn missing_profile_files_are_tolerated() {
        let profile = Profile::from_files(&["/nonexistent/krb5format/krb5.conf"]).unwrap();
        assert_eq!(profile.get_string("libdefaults.default_realm"), None);
    }
}
