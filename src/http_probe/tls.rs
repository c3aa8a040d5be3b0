use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::net::TcpStream;
use tokio_native_tls::TlsConnector as TokioTlsConnector;
use url::Url;
use x509_parser::parse_x509_certificate;

/// Setup a TLS connector that accepts invalid certificates, so that expired
/// or self-signed certificates can still be inspected.
pub fn setup_tls_connector() -> Result<TokioTlsConnector, native_tls::Error> {
    let mut builder = native_tls::TlsConnector::builder();
    builder.danger_accept_invalid_certs(true);
    let connector = builder.build()?;
    Ok(TokioTlsConnector::from(connector))
}

/// Days until the leaf certificate served for `url` expires.
///
/// Returns `None` for non-https URLs, for an exhausted (zero) budget, or when
/// the handshake does not complete within `timeout`.
pub async fn cert_validity_days(
    url: &Url,
    connector: &TokioTlsConnector,
    timeout: Duration,
) -> Option<i64> {
    if url.scheme() != "https" || timeout.is_zero() {
        return None;
    }
    let host = url.host_str()?;
    let port = url.port_or_known_default().unwrap_or(443);

    let not_after = tokio::time::timeout(timeout, peer_not_after(host, port, connector))
        .await
        .ok()??;

    Some(days_between(unix_now()?, not_after))
}

fn unix_now() -> Option<i64> {
    Some(SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs() as i64)
}

async fn peer_not_after(host: &str, port: u16, connector: &TokioTlsConnector) -> Option<i64> {
    let stream = TcpStream::connect((host, port)).await.ok()?;
    let tls_stream = connector.connect(host, stream).await.ok()?;

    let cert = tls_stream.get_ref().peer_certificate().ok().flatten()?;
    let cert_der = cert.to_der().ok()?;

    let (_, parsed) = parse_x509_certificate(&cert_der).ok()?;
    Some(parsed.validity().not_after.timestamp())
}

/// Whole days from `now` to `not_after`, both in unix seconds.
fn days_between(now: i64, not_after: i64) -> i64 {
    (not_after - now).div_euclid(86400)
}
