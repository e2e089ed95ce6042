//! Time-based codes derived from the account's secrets.
//!
//! Confirmation keys authorize a single action on the mobile confirmation endpoints. They are
//! keyed by the identity secret and mix in a [`Tag`] so a key for one action cannot be used for
//! another. Steam rejects keys whose time falls outside its own window, so the time always comes
//! from a [`TimeProvider`] corrected by the session's clock offset.

use crate::error::{ParameterError, TotpError};
use crate::time::server_time;
use std::str::FromStr;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use strum::Display;

type HmacSha1 = Hmac<Sha1>;

const AUTH_CODE_CHARS: &[u8] = b"23456789BCDFGHJKMNPQRTVWXY";

/// The action a confirmation key is generated for.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Accepting a confirmation.
    #[strum(serialize = "allow")]
    Allow,
    /// Cancelling a confirmation.
    #[strum(serialize = "cancel")]
    Cancel,
    /// Loading the confirmation list.
    #[strum(serialize = "conf")]
    Conf,
    /// Loading the details of a confirmation.
    #[strum(serialize = "details")]
    Details,
}

impl FromStr for Tag {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(Self::Allow),
            "cancel" => Ok(Self::Cancel),
            "conf" => Ok(Self::Conf),
            "details" => Ok(Self::Details),
            other => Err(ParameterError::InvalidTag(other.to_string())),
        }
    }
}

/// Yields the current unix time on Steam's servers.
pub trait TimeProvider {
    fn now(&self) -> u64;
}

/// The local clock corrected by an offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerClock {
    /// Seconds to add to local time to get Steam's time.
    pub time_offset: i64,
}

impl TimeProvider for ServerClock {
    fn now(&self) -> u64 {
        server_time(self.time_offset)
    }
}

impl<F> TimeProvider for F
where
    F: Fn() -> u64,
{
    fn now(&self) -> u64 {
        self()
    }
}

fn hmac(secret: &str, data: &[u8]) -> Result<Vec<u8>, TotpError> {
    let key = BASE64_STANDARD.decode(secret.trim())?;
    let mut mac = HmacSha1::new_from_slice(&key)
        .map_err(|_| TotpError::InvalidLength)?;

    mac.update(data);

    Ok(mac.finalize().into_bytes().to_vec())
}

/// Generates the confirmation key for `tag` at `time`.
pub fn generate_confirmation_key_for_time(
    identity_secret: &str,
    tag: Tag,
    time: u64,
) -> Result<String, TotpError> {
    let tag = tag.to_string();
    let mut data = time.to_be_bytes().to_vec();

    data.extend_from_slice(tag.as_bytes());

    let hash = hmac(identity_secret, &data)?;

    Ok(BASE64_STANDARD.encode(hash))
}

/// Generates the confirmation key for `tag` at the current server time. Returns the key along
/// with the time it was generated for, which must be sent with it.
pub fn generate_confirmation_key<T>(
    identity_secret: &str,
    tag: Tag,
    time_provider: &T,
) -> Result<(String, u64), TotpError>
where
    T: TimeProvider + ?Sized,
{
    let time = time_provider.now();
    let key = generate_confirmation_key_for_time(identity_secret, tag, time)?;

    Ok((key, time))
}

/// Generates the 5-character Steam Guard code for `time`.
pub fn generate_auth_code_for_time(
    shared_secret: &str,
    time: u64,
) -> Result<String, TotpError> {
    let hash = hmac(shared_secret, &(time / 30).to_be_bytes())?;
    let start = (hash[19] & 0x0f) as usize;
    let mut full_code = u32::from_be_bytes([
        hash[start],
        hash[start + 1],
        hash[start + 2],
        hash[start + 3],
    ]) & 0x7fff_ffff;
    let mut code = String::with_capacity(5);

    for _ in 0..5 {
        let index = (full_code as usize) % AUTH_CODE_CHARS.len();

        code.push(AUTH_CODE_CHARS[index] as char);
        full_code /= AUTH_CODE_CHARS.len() as u32;
    }

    Ok(code)
}

/// Generates the Steam Guard code for logging in at the current server time.
pub fn generate_auth_code<T>(
    shared_secret: &str,
    time_provider: &T,
) -> Result<String, TotpError>
where
    T: TimeProvider + ?Sized,
{
    generate_auth_code_for_time(shared_secret, time_provider.now())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=";

    #[test]
    fn confirmation_key_is_deterministic() {
        let a = generate_confirmation_key_for_time(SECRET, Tag::Conf, 1_600_000_000).unwrap();
        let b = generate_confirmation_key_for_time(SECRET, Tag::Conf, 1_600_000_000).unwrap();

        assert_eq!(a, b);
        // 20 byte digest in base64
        assert_eq!(a.len(), 28);
    }

    #[test]
    fn tags_produce_different_keys() {
        let keys = [Tag::Allow, Tag::Cancel, Tag::Conf, Tag::Details]
            .into_iter()
            .map(|tag| generate_confirmation_key_for_time(SECRET, tag, 1_600_000_000).unwrap())
            .collect::<std::collections::HashSet<_>>();

        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn uses_time_provider() {
        let (key, time) = generate_confirmation_key(SECRET, Tag::Allow, &|| 1_600_000_000u64).unwrap();

        assert_eq!(time, 1_600_000_000);
        assert_eq!(key, generate_confirmation_key_for_time(SECRET, Tag::Allow, time).unwrap());
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!("allow".parse::<Tag>().unwrap(), Tag::Allow);
        assert!(matches!("accept".parse::<Tag>(), Err(ParameterError::InvalidTag(_))));
    }

    #[test]
    fn auth_code_is_stable_within_step() {
        let a = generate_auth_code_for_time(SECRET, 1_600_000_020).unwrap();
        let b = generate_auth_code_for_time(SECRET, 1_600_000_029).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert!(a.bytes().all(|c| AUTH_CODE_CHARS.contains(&c)));
    }

    #[test]
    fn rejects_invalid_secret() {
        assert!(matches!(
            generate_confirmation_key_for_time("%%%", Tag::Conf, 0),
            Err(TotpError::InvalidSecret(_)),
        ));
    }
}
