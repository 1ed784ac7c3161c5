//! Scripted stand-in for the server side of the protocol, for unit tests
// (c) 2026 ftpc contributors

use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::{TcpListener, TcpStream};

use crate::control::{ControlChannel, RECEIVE_BUFFER_SIZE};
use crate::protocol::{frame::decode_exact, Encoding};

/// The server end of a control channel
pub(crate) struct FakeServer {
    stream: TcpStream,
    encoding: Encoding,
}

/// Sets up a loopback control channel
pub(crate) async fn control_pair(encoding: Encoding) -> (ControlChannel<TcpStream>, FakeServer) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (client, server) = tokio::join!(
        ControlChannel::connect("127.0.0.1", port, encoding, None),
        listener.accept()
    );
    let server = FakeServer {
        stream: server.unwrap().0,
        encoding,
    };
    (client.unwrap(), server)
}

impl FakeServer {
    /// Reads one command line
    pub(crate) async fn read_command(&mut self) -> String {
        let mut buf = vec![0u8; RECEIVE_BUFFER_SIZE];
        let n = self.stream.read(&mut buf).await.unwrap();
        self.encoding.decode_str(&buf[..n]).unwrap()
    }

    /// Listens on a fresh port and tells the client about it
    pub(crate) async fn offer_ephemeral(&mut self) -> TcpListener {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        self.send_text(&port.to_string()).await;
        listener
    }

    /// Sends arbitrary text on the control channel
    pub(crate) async fn send_text(&mut self, text: &str) {
        let wire = self.encoding.encode_str(text).unwrap();
        self.stream.write_all(&wire).await.unwrap();
    }

    /// Reads one status character
    pub(crate) async fn read_status(&mut self) -> String {
        let raw = decode_exact(&mut self.stream, self.encoding.unit_width())
            .await
            .unwrap();
        self.encoding.decode_str(&raw).unwrap()
    }

    /// Reads until the client closes, returning anything else it sent
    pub(crate) async fn read_to_close(&mut self) -> Vec<u8> {
        let mut rest = Vec::new();
        let _ = self.stream.read_to_end(&mut rest).await.unwrap();
        rest
    }
}
