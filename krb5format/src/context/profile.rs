use config::{Config, File, FileFormat};
use std::env;

const SECURE_PROFILE_PATH: &str = "/etc/krb5.conf";
const KRB5_ENV_CONFIG: &str = "KRB5_CONFIG";

/// Parsed krb5.conf files, searched in order. Relations are addressed as
/// `section.relation`, e.g. `libdefaults.default_keytab_name`.
#[derive(Debug)]
pub struct Profile {
    layers: Vec<Config>,
}

impl Profile {
    /// Loads the files named by `KRB5_CONFIG` (colon separated), or only
    /// `/etc/krb5.conf` when `secure` is set or the variable is unset.
    pub fn new(secure: bool) -> anyhow::Result<Self> {
        let paths = match env::var(KRB5_ENV_CONFIG) {
            Ok(paths) if !secure => paths,
            _ => SECURE_PROFILE_PATH.to_owned(),
        };
        Self::from_files(&paths.split(':').collect::<Vec<_>>())
    }

    /// Files that do not exist are skipped; files that fail to parse are an
    /// error.
    pub fn from_files<S: AsRef<str>>(files: &[S]) -> anyhow::Result<Self> {
        let layers: Vec<Config> = files
            .iter()
            .map(|file| load_layer(&expand_home(file.as_ref())))
            .collect::<anyhow::Result<_>>()?;
        Ok(Self { layers })
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.layers
            .iter()
            .find_map(|layer| layer.get_string(key).ok())
    }
}

fn load_layer(path: &str) -> anyhow::Result<Config> {
    log::trace!("reading profile {}", path);
    let source = File::with_name(path)
        .format(FileFormat::Ini)
        .required(false);
    Ok(Config::builder().add_source(source).build()?)
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), env::var("HOME")) {
        (Some(rest), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), rest),
        _ => path.to_owned(),
    }
}
