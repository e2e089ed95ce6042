use crate::error::ParameterError;

/// Credentials for logging in.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginDetails {
    /// The account name.
    pub account_name: String,
    /// The password.
    pub password: String,
    /// A Steam Guard code, if the account requires one.
    pub two_factor_code: Option<String>,
    /// The shared secret used to generate a Steam Guard code when `two_factor_code` is not set.
    pub shared_secret: Option<String>,
}

impl std::fmt::Debug for LoginDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginDetails")
            .field("account_name", &self.account_name)
            .field("password", &"<redacted>")
            .field("two_factor_code", &self.two_factor_code)
            .field("shared_secret", &self.shared_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl LoginDetails {
    /// Creates login details from an account name and password.
    pub fn new<A, P>(account_name: A, password: P) -> Self
    where
        A: Into<String>,
        P: Into<String>,
    {
        Self {
            account_name: account_name.into(),
            password: password.into(),
            two_factor_code: None,
            shared_secret: None,
        }
    }

    /// A Steam Guard code.
    pub fn two_factor_code(mut self, code: String) -> Self {
        self.two_factor_code = Some(code);
        self
    }

    /// The shared secret for generating Steam Guard codes.
    pub fn shared_secret(mut self, shared_secret: String) -> Self {
        self.shared_secret = Some(shared_secret);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ParameterError> {
        if self.account_name.is_empty() || self.password.is_empty() {
            return Err(ParameterError::MissingCredentials);
        }

        Ok(())
    }
}
