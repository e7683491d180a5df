use super::*;
use anyhow::Result;
use speechsign_aws_v4::StaticCredentialProvider;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_signing_matches_sequential() -> Result<()> {
    let signer = Arc::new(polly_signer(
        fixed_context(),
        StaticCredentialProvider::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY),
    ));

    let bodies = (0..32)
        .map(|i| format!(r#"{{"Text":"hello {i}"}}"#).into_bytes())
        .collect::<Vec<_>>();

    let mut expected = Vec::with_capacity(bodies.len());
    for body in &bodies {
        let (mut parts, body) = polly_request(body);
        signer.sign(&mut parts, &body).await?;
        expected.push(parts.headers[http::header::AUTHORIZATION].clone());
    }

    let mut tasks = Vec::with_capacity(bodies.len());
    for body in bodies {
        let signer = signer.clone();
        tasks.push(tokio::spawn(async move {
            let (mut parts, body) = polly_request(&body);
            signer.sign(&mut parts, &body).await?;
            Ok::<_, speechsign_core::Error>(parts.headers[http::header::AUTHORIZATION].clone())
        }));
    }

    let mut actual = Vec::with_capacity(tasks.len());
    for task in tasks {
        actual.push(task.await??);
    }

    assert_eq!(expected, actual);
    // Distinct bodies never share a signature.
    let mut unique = actual
        .iter()
        .map(|v| v.as_bytes().to_vec())
        .collect::<Vec<_>>();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), actual.len());
    Ok(())
}
