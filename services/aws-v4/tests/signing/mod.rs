use super::*;
use anyhow::Result;
use http::header;
use pretty_assertions::assert_eq;
use speechsign_aws_v4::{Config, DefaultCredentialProvider, StaticCredentialProvider};
use speechsign_core::{ErrorKind, StaticEnv};
use std::collections::HashMap;
use std::sync::Arc;

fn authorization(parts: &http::request::Parts) -> &str {
    parts.headers[header::AUTHORIZATION]
        .to_str()
        .expect("authorization must be valid")
}

#[tokio::test]
async fn test_sign_polly_request() -> Result<()> {
    let signer = polly_signer(
        fixed_context(),
        StaticCredentialProvider::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY),
    );

    let (mut parts, body) = polly_request(POLLY_BODY);
    signer.sign(&mut parts, &body).await?;

    assert_eq!(
        authorization(&parts),
        format!(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240101/us-east-1/polly/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date, Signature={POLLY_SIGNATURE}"
        )
    );
    assert_eq!(parts.headers["x-amz-date"], "20240101T000000Z");
    assert_eq!(parts.headers[header::HOST], "polly.us-east-1.amazonaws.com");
    assert!(parts.headers.get("x-amz-security-token").is_none());
    Ok(())
}

#[tokio::test]
async fn test_sign_with_credential_from_env() -> Result<()> {
    let ctx = fixed_context().with_env(StaticEnv {
        envs: HashMap::from([
            ("AWS_ACCESS_KEY_ID".to_string(), ACCESS_KEY_ID.to_string()),
            (
                "AWS_SECRET_ACCESS_KEY".to_string(),
                SECRET_ACCESS_KEY.to_string(),
            ),
            ("AWS_SESSION_TOKEN".to_string(), "session/token==".to_string()),
        ]),
    });
    let config = Config::default().from_env(&ctx);
    let signer = polly_signer(ctx, DefaultCredentialProvider::new(Arc::new(config)));

    let (mut parts, body) = polly_request(POLLY_BODY);
    signer.sign(&mut parts, &body).await?;

    assert!(authorization(&parts).ends_with(POLLY_SIGNATURE));
    assert_eq!(parts.headers["x-amz-security-token"], "session/token==");
    Ok(())
}

#[tokio::test]
async fn test_sign_without_credential() {
    let signer = polly_signer(fixed_context(), DefaultCredentialProvider::default());

    let (mut parts, body) = polly_request(POLLY_BODY);
    let before = parts.headers.clone();
    let err = signer
        .sign(&mut parts, &body)
        .await
        .expect_err("signing must fail without credential");

    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    assert_eq!(parts.headers, before);
}

#[tokio::test]
async fn test_sign_with_empty_secret() {
    let signer = polly_signer(
        fixed_context(),
        StaticCredentialProvider::new(ACCESS_KEY_ID, ""),
    );

    let (mut parts, body) = polly_request(POLLY_BODY);
    let err = signer
        .sign(&mut parts, &body)
        .await
        .expect_err("signing must fail with empty secret");

    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    assert!(parts.headers.get(header::AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_sign_query_order_invariance() -> Result<()> {
    let signer = polly_signer(
        fixed_context(),
        StaticCredentialProvider::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY),
    );

    let sign = |uri: &'static str| {
        let signer = &signer;
        async move {
            let (mut parts, _) = http::Request::builder()
                .method(http::Method::GET)
                .uri(uri)
                .body(())
                .expect("request must be valid")
                .into_parts();
            signer.sign(&mut parts, &[]).await.map(|_| parts)
        }
    };

    let a = sign("https://polly.us-east-1.amazonaws.com/v1/voices?LanguageCode=en-US&Engine=neural")
        .await?;
    let b = sign("https://polly.us-east-1.amazonaws.com/v1/voices?Engine=neural&LanguageCode=en-US")
        .await?;
    let c = sign("https://polly.us-east-1.amazonaws.com/v1/voices?Engine=standard&LanguageCode=en-US")
        .await?;

    assert_eq!(authorization(&a), authorization(&b));
    assert_ne!(authorization(&a), authorization(&c));
    // The URI is left as the caller wrote it.
    assert_eq!(
        a.uri,
        "https://polly.us-east-1.amazonaws.com/v1/voices?LanguageCode=en-US&Engine=neural"
    );
    Ok(())
}

#[tokio::test]
async fn test_sign_again_after_retry() -> Result<()> {
    let provider = StaticCredentialProvider::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY)
        .with_session_token("session-token");

    let (mut parts, body) = polly_request(POLLY_BODY);
    polly_signer(fixed_context(), provider.clone())
        .sign(&mut parts, &body)
        .await?;

    let later = Context::new().with_clock(FixedClock(parse_iso8601("20240101T000005Z")?));
    let signer = polly_signer(later, provider);
    signer.sign(&mut parts, &body).await?;

    let (mut fresh, body) = polly_request(POLLY_BODY);
    signer.sign(&mut fresh, &body).await?;

    assert!(authorization(&parts)
        .contains("SignedHeaders=content-type;host;x-amz-date, Signature="));
    assert_eq!(authorization(&parts), authorization(&fresh));
    assert_eq!(parts.headers["x-amz-date"], "20240101T000005Z");
    assert_eq!(parts.headers["x-amz-security-token"], "session-token");
    Ok(())
}
