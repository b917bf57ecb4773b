use crate::{Keyblock, Principal, Timestamp};

const CONF_REALM: &str = "X-CACHECONF:";
const CONF_NAME: &str = "krb5_ccache_conf_data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub client: Principal,
    pub server: Principal,
    pub keyblock: Keyblock,
    pub times: TicketTimes,
    pub is_skey: u8,
    /// Stored little-endian, unlike every other integer in the file.
    pub ticket_flags: u32,
    pub addresses: Vec<Vec<u8>>,
    pub authdata: Vec<Vec<u8>>,
    pub ticket: Vec<u8>,
    pub second_ticket: Vec<u8>,
}

impl Credential {
    /// Configuration entries live under the `X-CACHECONF:` realm and carry a
    /// value in their ticket field instead of a real ticket.
    pub fn is_config(&self) -> bool {
        if self.server.realm != CONF_REALM.as_bytes() {
            return false;
        }
        self.server
            .components
            .first()
            .is_some_and(|component| component == CONF_NAME.as_bytes())
    }

    /// Returns `(key, principal, value)` of a configuration entry.
    pub fn get_config(&self) -> Option<(&[u8], Option<&[u8]>, &[u8])> {
        if !self.is_config() {
            return None;
        }
        let components = &self.server.components;
        let key = components.get(1)?.as_slice();
        let principal = components.get(2).map(Vec::as_slice);
        Some((key, principal, self.ticket.as_slice()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketTimes {
    pub authtime: Timestamp,
    pub starttime: Timestamp,
    pub endtime: Timestamp,
    pub renew_till: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub tag: u16,
    pub value: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Enctype, NameType};

    fn credential(server: Principal, ticket: &[u8]) -> Credential {
        Credential {
            client: Principal::from_value("user@R", Some(NameType::PRINCIPAL)),
            server,
            keyblock: Keyblock::new(Enctype::NULL, &[]),
            times: TicketTimes {
                authtime: 0,
                starttime: 0,
                endtime: 0,
                renew_till: 0,
            },
            is_skey: 0,
            ticket_flags: 0,
            addresses: vec![],
            authdata: vec![],
            ticket: ticket.to_owned(),
            second_ticket: vec![],
        }
    }

    #[test]
    fn config_entries_expose_key_and_value() {
        let server = Principal::new(
            NameType::UNKNOWN,
            CONF_REALM.as_bytes(),
            &[CONF_NAME.as_bytes(), b"pa_type", b"krbtgt/R@R"],
        );
        let credential = credential(server, b"2");
        assert!(credential.is_config());
        let (key, principal, value) = credential.get_config().unwrap();
        assert_eq!(key, b"pa_type");
        assert_eq!(principal, Some(&b"krbtgt/R@R"[..]));
        assert_eq!(value, b"2");
    }

    #[test]
    fn regular_entries_are_not_config() {
        let credential = credential(Principal::from_value("krbtgt/R@R", None), b"ticket");
        assert!(!credential.is_config());
        assert!(credential.get_config().is_none());
    }
}
