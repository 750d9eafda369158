use reqwest::Client;
use tracing::debug;

use crate::config::Secret;
use crate::models::ChallengeVerdict;

/// Redeems a challenge token at the Turnstile `siteverify` endpoint.
///
/// `remoteip` is only sent when the caller's address is known.
pub async fn verify_challenge(
    client: &Client,
    verify_url: &str,
    secret: &Secret,
    token: &str,
    remote_ip: Option<&str>,
) -> Result<ChallengeVerdict, String> {
    debug!(
        remote_ip_known = remote_ip.is_some(),
        "Verifying challenge token at '{}'", verify_url
    );

    let mut form = vec![("secret", secret.expose()), ("response", token)];
    if let Some(ip) = remote_ip {
        form.push(("remoteip", ip));
    }

    let verdict = client
        .post(verify_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| format!("Failed to call challenge verification endpoint: {}", e))?
        .json::<ChallengeVerdict>()
        .await
        .map_err(|e| format!("Failed to parse challenge verdict JSON: {}", e))?;

    debug!(
        success = verdict.success,
        has_cdata = verdict.cdata.is_some(),
        "Challenge verification completed"
    );
    Ok(verdict)
}
