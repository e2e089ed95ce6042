//! Password encryption for login and device IDs for mobile confirmations.

use crate::error::EncryptError;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use lazy_regex::regex_replace_all;
use num_traits::Num;
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPublicKey};
use sha1::{Digest, Sha1};

/// Encrypts `plaintext` with the RSA public key given as hex strings, returning the ciphertext in
/// base64.
pub fn encrypt_password(
    modulus_hex: &str,
    exponent_hex: &str,
    plaintext: &str,
) -> Result<String, EncryptError> {
    let n = BigUint::from_str_radix(modulus_hex, 16)
        .map_err(|error| EncryptError::KeyParse(format!("modulus: {error}")))?;
    let e = u32::from_str_radix(exponent_hex, 16)
        .map_err(|error| EncryptError::KeyParse(format!("exponent: {error}")))?;
    let key = RsaPublicKey::new(n, BigUint::from(e))?;
    let mut rng = rand::thread_rng();
    let encrypted = key.encrypt(&mut rng, Pkcs1v15Encrypt, plaintext.as_bytes())?;

    Ok(BASE64_STANDARD.encode(encrypted))
}

fn format_device_id(input: &[u8]) -> String {
    let hash = Sha1::digest(input)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>();
    let device_id = regex_replace_all!(
        r#"^([0-9a-f]{8})([0-9a-f]{4})([0-9a-f]{4})([0-9a-f]{4})([0-9a-f]{12}).*$"#i,
        &hash,
        |_, a, b, c, d, e| format!("{a}-{b}-{c}-{d}-{e}"),
    );

    format!("android:{device_id}")
}

/// A device ID derived from the credentials. Stable for the same account name and password.
pub fn generate_device_id(account_name: &str, password: &str) -> String {
    format_device_id(format!("{account_name}{password}").as_bytes())
}

/// A device ID derived from a Steam ID. Used for sessions restored from cookies where the
/// password is not known.
pub fn generate_device_id_from_steamid(steamid: u64) -> String {
    format_device_id(steamid.to_string().as_bytes())
}
