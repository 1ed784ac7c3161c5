//! One-shot data channels
// (c) 2026 ftpc contributors

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::{Error, Result};

/// Opens TCP connections, applying the configured connect timeout if there is one
pub(crate) async fn connect(host: &str, port: u16, timeout: Option<Duration>) -> Result<TcpStream> {
    let target = format!("{host}:{port}");
    trace!("connecting to {target}");
    let attempt = TcpStream::connect((host, port));
    let result = match timeout {
        Some(t) => tokio::time::timeout(t, attempt)
            .await
            .map_err(|_| Error::connection(&target, format!("timed out after {t:?}")))?,
        None => attempt.await,
    };
    let stream = result.map_err(|e| Error::connection(&target, e))?;
    // Frames are written in one go and then we wait for the peer; don't hold them back.
    stream.set_nodelay(true)?;
    Ok(stream)
}

/// Opens ephemeral channels to ports advertised by the server.
///
/// Each channel returned by [`open`](Self::open) is good for exactly one transfer.
/// The caller owns it and is responsible for closing it (dropping it is sufficient).
#[derive(Debug, Clone)]
pub struct EphemeralFactory {
    host: String,
    connect_timeout: Option<Duration>,
}

impl EphemeralFactory {
    /// Constructor
    #[must_use]
    pub fn new(host: &str, connect_timeout: Option<Duration>) -> Self {
        Self {
            host: host.to_string(),
            connect_timeout,
        }
    }

    /// Interprets a port number string received on the control channel
    pub fn parse_port(&self, port: &str) -> Result<u16> {
        let trimmed = port.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        let target = format!("{}:{trimmed}", self.host);
        match trimmed.parse::<u16>() {
            Ok(0) => Err(Error::connection(target, "port 0 is not a valid ephemeral port")),
            Ok(p) => Ok(p),
            Err(e) => Err(Error::connection(
                target,
                format!("malformed port number {port:?}: {e}"),
            )),
        }
    }

    /// Opens one connection to the advertised port
    pub async fn open(&self, port: &str) -> Result<TcpStream> {
        let port = self.parse_port(port)?;
        let stream = connect(&self.host, port, self.connect_timeout).await?;
        debug!("ephemeral channel open to {}:{port}", self.host);
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::EphemeralFactory;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[rstest]
    #[case("4321", 4321)]
    #[case(" 4321\n", 4321)]
    #[case("4321\0\0\0", 4321)]
    #[case("65535", 65535)]
    fn good_ports(#[case] input: &str, #[case] expected: u16) {
        let f = EphemeralFactory::new("localhost", None);
        assert_eq!(f.parse_port(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("0")]
    #[case("65536")]
    #[case("12ab")]
    #[case("-1")]
    fn bad_ports(#[case] input: &str) {
        let f = EphemeralFactory::new("localhost", None);
        let e = f.parse_port(input).unwrap_err();
        assert!(matches!(e, Error::Connection { .. }), "{e:?}");
    }

    #[tokio::test]
    async fn opens_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let f = EphemeralFactory::new("127.0.0.1", Some(Duration::from_secs(5)));
        let port = port.to_string();
        let (client, server) = tokio::join!(f.open(&port), listener.accept());
        let _ = client.unwrap();
        let _ = server.unwrap();
    }

    #[tokio::test]
    async fn refused() {
        // Grab a free port, then release it so nothing is listening there
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let f = EphemeralFactory::new("127.0.0.1", None);
        let e = f.open(&port.to_string()).await.unwrap_err();
        assert!(matches!(e, Error::Connection { .. }), "{e:?}");
        assert!(e.to_string().contains(&format!("127.0.0.1:{port}")));
    }
}
