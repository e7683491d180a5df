use crate::provide_credential::{ConfigCredentialProvider, EnvCredentialProvider};
use crate::provide_credential::ProvideCredentialChain;
use crate::{Config, Credential};
use async_trait::async_trait;
use speechsign_core::{Context, ProvideCredential, Result};
use std::sync::Arc;

/// DefaultCredentialProvider is a loader that will try to load credential via default chains.
///
/// Resolution order:
///
/// 1. Values carried by [`Config`]
/// 2. Environment variables
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new(Arc::default())
    }
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new(config: Arc<Config>) -> Self {
        let chain = ProvideCredentialChain::new()
            .push(ConfigCredentialProvider::new(config))
            .push(EnvCredentialProvider::new());

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY};
    use crate::StaticCredentialProvider;
    use speechsign_core::StaticEnv;
    use std::collections::HashMap;

    fn env_ctx() -> Context {
        Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (AWS_ACCESS_KEY_ID.to_string(), "env_access_key".to_string()),
                (
                    AWS_SECRET_ACCESS_KEY.to_string(),
                    "env_secret_key".to_string(),
                ),
            ]),
        })
    }

    #[tokio::test]
    async fn test_default_without_anything() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let provider = DefaultCredentialProvider::default();
        assert!(provider.provide_credential(&Context::new()).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_default_falls_back_to_env() -> anyhow::Result<()> {
        let provider = DefaultCredentialProvider::default();
        let cred = provider
            .provide_credential(&env_ctx())
            .await?
            .expect("credential must be loaded from env");
        assert_eq!(cred.access_key_id, "env_access_key");
        Ok(())
    }

    #[tokio::test]
    async fn test_default_prefers_config() -> anyhow::Result<()> {
        let provider = DefaultCredentialProvider::new(Arc::new(Config {
            access_key_id: Some("config_access_key".to_string()),
            secret_access_key: Some("config_secret_key".to_string()),
            ..Default::default()
        }));
        let cred = provider
            .provide_credential(&env_ctx())
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.access_key_id, "config_access_key");
        Ok(())
    }

    #[tokio::test]
    async fn test_default_with_chain() -> anyhow::Result<()> {
        let provider = DefaultCredentialProvider::with_chain(
            ProvideCredentialChain::new().push(StaticCredentialProvider::new("static", "secret")),
        );
        let cred = provider
            .provide_credential(&env_ctx())
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.access_key_id, "static");
        Ok(())
    }
}
