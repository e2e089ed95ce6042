use crate::serialize::string_or_number;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct RsaKeyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub publickey_mod: String,
    #[serde(default)]
    pub publickey_exp: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub token_gid: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub requires_twofactor: bool,
    #[serde(default)]
    pub login_complete: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub transfer_parameters: Option<TransferParameters>,
}

#[derive(Deserialize, Debug)]
pub struct TransferParameters {
    /// Older responses put the Steam ID under `string`.
    #[serde(default, alias = "string")]
    pub steamid: Option<String>,
    #[serde(default)]
    pub auth: Option<String>,
    #[serde(default)]
    pub token_secure: Option<String>,
    #[serde(default)]
    pub webcookie: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct QueryTimeResponse {
    pub response: QueryTimeBody,
}

#[derive(Deserialize, Debug)]
pub struct QueryTimeBody {
    #[serde(with = "string_or_number")]
    pub server_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steamid_from_string_key() {
        let response: LoginResponse = serde_json::from_str(r#"{
            "success": true,
            "requires_twofactor": false,
            "login_complete": true,
            "transfer_parameters": {
                "string": "76561198000000000",
                "auth": "abc",
                "token_secure": "def",
                "webcookie": "ghi"
            }
        }"#).unwrap();
        let steamid = response.transfer_parameters.and_then(|params| params.steamid);

        assert_eq!(steamid.as_deref(), Some("76561198000000000"));
    }

    #[test]
    fn parses_query_time() {
        let response: QueryTimeResponse = serde_json::from_str(r#"{
            "response": {"server_time": "1600000000", "skew_tolerance_seconds": "60"}
        }"#).unwrap();

        assert_eq!(response.response.server_time, 1_600_000_000);
    }
}
