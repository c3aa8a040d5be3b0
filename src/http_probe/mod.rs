pub mod page;
pub mod probe;
pub mod result;
pub mod tls;

use std::fmt::Write;

use async_trait::async_trait;

pub mod prelude {
    pub use super::probe::{HttpProber, ProbeError, SetupError};
    pub use super::result::{ProbeFailure, ProbeResult};
    pub use super::Prober;
}

use result::ProbeResult;

/// Anything that can run one probe against a URL.
///
/// Implementations never fail: every failure ends up as an alert inside the
/// returned [`ProbeResult`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeResult;
}

/// Flattens an error and its sources into a single line, suitable for an alert.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Inner;

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct Outer(#[source] Inner);

    #[test]
    fn test_report_joins_source_chain() {
        let err = Outer(Inner);
        assert_eq!(report(&err), "error sending request: connection refused");
    }

    #[test]
    fn test_report_without_source() {
        assert_eq!(report(&Inner), "connection refused");
    }
}
