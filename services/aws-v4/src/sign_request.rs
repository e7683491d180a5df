use crate::canonical::{canonical_query_string, canonical_request};
use crate::constants::{
    AWS4_HMAC_SHA256, AWS4_REQUEST, POLLY_SERVICE, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::Credential;
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use log::{debug, warn};
use speechsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use speechsign_core::time::{format_date, format_iso8601, DateTime};
use speechsign_core::{Context, Error, Result, SignRequest, SigningCredential, SigningRequest};

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// # Errors
///
/// Missing credentials fail before the request is touched. Header values that
/// are not valid utf-8 fail as invalid request, also leaving it untouched.
/// Wrong region or service names, clock skew, or any mismatch with what the
/// server recomputes still produce a well-formed signature: the protocol
/// offers no local check, so they only show up as the remote endpoint
/// rejecting the request.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

/// The values a signature adds to one request.
///
/// Tied to the exact method, path, query, headers and body it was computed
/// for; it can't be reused for another request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureResult {
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Value of the `x-amz-date` header: `20220313T072004Z`.
    pub amz_date: String,
}

impl RequestSigner {
    /// Create a new signer for given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Create a new signer for Amazon Polly in given region.
    pub fn polly(region: &str) -> Self {
        Self::new(POLLY_SERVICE, region)
    }

    /// Calculate the signature of `req` at instant `now`.
    ///
    /// `Host` and `x-amz-date` are overwritten on `req` since they are part of
    /// the signature. `Authorization` and `x-amz-security-token` left by an
    /// earlier signing are removed and not attached again;
    /// [`SignRequest::sign_request`] does that.
    pub fn calculate(
        &self,
        req: &mut Parts,
        body: &[u8],
        cred: &Credential,
        now: DateTime,
    ) -> Result<SignatureResult> {
        let mut signed_req = SigningRequest::build(req);
        let result = self.calculate_inner(&mut signed_req, body, cred, now)?;
        signed_req.apply(req);
        Ok(result)
    }

    fn calculate_inner(
        &self,
        signed_req: &mut SigningRequest,
        body: &[u8],
        cred: &Credential,
        now: DateTime,
    ) -> Result<SignatureResult> {
        let amz_date = format_iso8601(now);

        // canonicalize context
        canonicalize_header(signed_req, &amz_date)?;

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/{AWS4_REQUEST}",
            format_date(now),
            self.region,
            self.service
        );
        debug!("calculated scope: {scope}");

        // build canonical request and string to sign.
        let payload_hash = hex_sha256(body);
        let creq = canonical_request(
            signed_req.method.as_str(),
            &signed_req.path,
            &canonical_query_string(&signed_req.query),
            signed_req.header_to_vec()?,
            &payload_hash,
        );
        debug!("calculated canonical request: {}", creq.request);
        let encoded_req = hex_sha256(creq.request.as_bytes());

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = format!("{AWS4_HMAC_SHA256}\n{amz_date}\n{scope}\n{encoded_req}");
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        Ok(SignatureResult {
            authorization: format!(
                "{AWS4_HMAC_SHA256} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
                cred.access_key_id, creq.signed_headers,
            ),
            amz_date,
        })
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential.filter(|c| c.is_valid()) else {
            return Err(Error::credential_missing(
                "access key id and secret access key are required to sign request",
            ));
        };

        // Captured once and shared by every derived value.
        let now = ctx.now();

        let mut signed_req = SigningRequest::build(req);
        let result = self.calculate_inner(&mut signed_req, body, cred, now)?;

        let mut authorization = HeaderValue::from_str(&result.authorization).map_err(|e| {
            Error::request_invalid("failed to create authorization header").with_source(e)
        })?;
        authorization.set_sensitive(true);

        // Attached after signing, so it's not part of the signed headers.
        let token = match cred.session_token() {
            Some(token) => {
                let mut value = HeaderValue::from_str(token).map_err(|e| {
                    Error::request_invalid("failed to create security token header")
                        .with_source(e)
                })?;
                // Set token value sensitive to valid leaking.
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);
        if let Some(token) = token {
            signed_req.headers.insert(X_AMZ_SECURITY_TOKEN, token);
        }

        // Apply to the request.
        signed_req.apply(req);
        Ok(())
    }
}

fn canonicalize_header(ctx: &mut SigningRequest, amz_date: &str) -> Result<()> {
    // Drop what a previous signing attached, it must never be signed.
    ctx.headers.remove(header::AUTHORIZATION);
    ctx.headers.remove(X_AMZ_SECURITY_TOKEN);

    // Always overwrite HOST with the authority we are about to connect to.
    match &ctx.authority {
        Some(authority) => {
            let host = HeaderValue::from_str(authority.as_str()).map_err(|e| {
                Error::request_invalid("failed to parse authority as header value").with_source(e)
            })?;
            ctx.headers.insert(header::HOST, host);
        }
        None => warn!("request without authority, signing the host header as given"),
    }

    // Always overwrite DATE so it matches the string to sign.
    ctx.headers.insert(X_AMZ_DATE, HeaderValue::from_str(amz_date)?);

    Ok(())
}

/// Derive the signing key scoped to `(date, region, service)`.
///
/// Every step uses the previous output as HMAC key and the scope part as
/// message.
pub fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}
