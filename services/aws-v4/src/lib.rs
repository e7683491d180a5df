//! AWS SigV4 signing for speech APIs such as Amazon Polly.
//!
//! ## Example
//!
//! ```no_run
//! use speechsign_aws_v4::{polly_endpoint, Config, DefaultCredentialProvider, RequestSigner};
//! use speechsign_core::{Context, OsEnv, Result, Signer};
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let config = Config::default().from_env(&ctx);
//! let region = config.region.clone().unwrap_or_else(|| "us-east-1".to_string());
//!
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(config.into()),
//!     RequestSigner::polly(&region),
//! );
//!
//! let body = br#"{"OutputFormat":"mp3","Text":"hi","VoiceId":"Joanna"}"#.to_vec();
//! let (mut parts, body) = http::Request::builder()
//!     .method("POST")
//!     .uri(format!("{}/v1/speech", polly_endpoint(&region)))
//!     .header("content-type", "application/json")
//!     .body(body)
//!     .expect("request must be valid")
//!     .into_parts();
//!
//! signer.sign(&mut parts, &body).await?;
//! // Send `http::Request::from_parts(parts, body)` with any HTTP client, without
//! // touching the signed headers.
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::{polly_endpoint, Config};

mod credential;
pub use credential::Credential;

mod canonical;
pub use canonical::{canonical_query_string, canonical_request, CanonicalRequest};

mod sign_request;
pub use sign_request::{generate_signing_key, RequestSigner, SignatureResult};

mod provide_credential;
pub use provide_credential::*;
