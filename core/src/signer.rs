use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use log::debug;
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// It asks the credential provider for a credential on every call and hands
/// it to the request signer. No credential is cached between calls.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            loader: Arc::new(loader),
            builder: Arc::new(builder),
        }
    }

    /// Get the context used by this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Signing request.
    ///
    /// Returns a credential-missing error, leaving `req` untouched, when the
    /// provider has nothing usable to offer.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        let cred = self.loader.provide_credential(&self.ctx).await?;
        if !cred.is_valid() {
            debug!("credential provider returned no valid credential");
            return Err(Error::credential_missing(
                "no valid credential found by provider",
            ));
        }

        self.builder
            .sign_request(&self.ctx, req, body, cred.as_ref())
            .await
    }
}
