use crate::constants::*;
use speechsign_core::Context;

/// Config for aws services.
///
/// Fields set by the caller always win; [`Config::from_env`] only fills the
/// ones left as `None`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SESSION_TOKEN`], only when neither `access_key_id`
    ///   nor `secret_access_key` was set by the caller
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use speechsign_core::utils::Redact;

        f.debug_struct("Config")
            .field("region", &self.region)
            .field(
                "access_key_id",
                &Redact::identifier(self.access_key_id.as_deref().unwrap_or_default()),
            )
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();
        // A token only belongs to the key pair it was issued with.
        let keys_from_env = self.access_key_id.is_none() && self.secret_access_key.is_none();

        if self.region.is_none() {
            self.region = envs
                .get(AWS_REGION)
                .or_else(|| envs.get(AWS_DEFAULT_REGION))
                .cloned();
        }
        if self.access_key_id.is_none() {
            self.access_key_id = envs.get(AWS_ACCESS_KEY_ID).cloned();
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = envs.get(AWS_SECRET_ACCESS_KEY).cloned();
        }
        if self.session_token.is_none() && keys_from_env {
            self.session_token = envs.get(AWS_SESSION_TOKEN).cloned();
        }

        self
    }
}

/// Build the endpoint of Amazon Polly in given region.
///
/// ```
/// assert_eq!(
///     speechsign_aws_v4::polly_endpoint("us-east-1"),
///     "https://polly.us-east-1.amazonaws.com"
/// );
/// ```
pub fn polly_endpoint(region: &str) -> String {
    format!("https://{POLLY_SERVICE}.{region}.amazonaws.com")
}
