//! Whole sessions against a scripted server on loopback
use std::path::Path;

use ftpc::client::{Dispatcher, Outcome, Report, State};
use ftpc::control::{ControlChannel, EphemeralFactory};
use ftpc::protocol::{frame, Encoding, Listing, ProtocolMessage as _};

use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::{TcpListener, TcpStream};

const ENCODING: Encoding = Encoding::Utf32;
const BOM: [u8; 4] = [0xFF, 0xFE, 0, 0];

/// Server-side helpers. The server sees one command line per read because the
/// client always waits for a reply before sending the next one.
struct Server {
    control: TcpStream,
}

impl Server {
    async fn command(&mut self) -> String {
        let mut buf = vec![0u8; 4096];
        let n = self.control.read(&mut buf).await.unwrap();
        ENCODING.decode_str(&buf[..n]).unwrap()
    }

    async fn say(&mut self, text: &str) {
        let wire = ENCODING.encode_str(text).unwrap();
        self.control.write_all(&wire).await.unwrap();
    }

    /// Sends the way a codec that marks byte order on every send would
    async fn say_with_bom(&mut self, text: &str) {
        let mut wire = BOM.to_vec();
        wire.extend(ENCODING.encode_str(text).unwrap());
        self.control.write_all(&wire).await.unwrap();
    }

    async fn status(&mut self) -> String {
        let raw = frame::decode_exact(&mut self.control, ENCODING.unit_width())
            .await
            .unwrap();
        ENCODING.decode_str(&raw).unwrap()
    }

    async fn ephemeral(&mut self) -> TcpStream {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        self.say(&port.to_string()).await;
        listener.accept().await.unwrap().0
    }
}

async fn connect() -> (Dispatcher<TcpStream>, Server) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (client, server) = tokio::join!(
        ControlChannel::connect("127.0.0.1", port, ENCODING, None),
        listener.accept()
    );
    let dispatcher = Dispatcher::new(client.unwrap(), EphemeralFactory::new("127.0.0.1", None));
    let server = Server {
        control: server.unwrap().0,
    };
    (dispatcher, server)
}

fn report(outcome: Outcome) -> Report {
    match outcome {
        Outcome::Continue(r) => r,
        Outcome::Terminated => panic!("session ended early"),
    }
}

fn line(verb: &str, path: &Path) -> String {
    format!("{verb} {}", path.display())
}

#[tokio::test]
async fn full_session() {
    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("notes.txt");
    std::fs::write(&upload, "caf\u{e9} au lait\n").unwrap();
    let download = dir.path().join("fetched.txt");
    let put_line = line("put", &upload);
    let get_line = line("get", &download);

    let (mut client, mut server) = connect().await;

    let server_task = tokio::spawn({
        let put_line = put_line.clone();
        let get_line = get_line.clone();
        async move {
            let mut received = Vec::new();

            assert_eq!(server.command().await, "ls");
            let mut eph = server.ephemeral().await;
            Listing::new(["one.txt", "two.txt"])
                .to_writer_async(&mut eph)
                .await
                .unwrap();
            drop(eph);

            assert_eq!(server.command().await, put_line);
            let mut eph = server.ephemeral().await;
            let payload = frame::read_frame(&mut eph, ENCODING).await.unwrap();
            received.push(payload);
            server.say("1").await;

            assert_eq!(server.command().await, get_line);
            let mut eph = server.ephemeral().await;
            let _ = frame::write_frame(&mut eph, "\u{263a} smile".as_bytes(), ENCODING)
                .await
                .unwrap();
            drop(eph);
            let status = server.status().await;

            assert_eq!(server.command().await, "quit");
            let mut rest = Vec::new();
            let _ = server.control.read_to_end(&mut rest).await.unwrap();
            (received, status, rest)
        }
    });

    let r = report(client.dispatch("ls\n").await);
    assert!(
        matches!(&r, Report::Listing(names) if names == &["one.txt", "two.txt"]),
        "{r:?}"
    );

    let r = report(client.dispatch(&put_line).await);
    assert!(
        matches!(r, Report::Uploaded { bytes: 14, accepted: true, .. }),
        "{r:?}"
    );

    let r = report(client.dispatch("bogus command").await);
    assert!(matches!(r, Report::Usage(_)), "{r:?}");
    assert_eq!(client.state(), State::Idle);

    let r = report(client.dispatch(&get_line).await);
    assert!(matches!(r, Report::Downloaded { .. }), "{r:?}");
    assert_eq!(std::fs::read_to_string(&download).unwrap(), "\u{263a} smile");

    assert!(matches!(client.dispatch("quit").await, Outcome::Terminated));
    assert_eq!(client.state(), State::Terminated);

    let (received, status, rest) = server_task.await.unwrap();
    assert_eq!(
        received,
        vec![Some("caf\u{e9} au lait\n".as_bytes().to_vec())]
    );
    assert_eq!(status, "1");
    assert!(rest.is_empty());
}

#[tokio::test]
async fn failed_download_is_reported_to_server() {
    let dir = tempfile::tempdir().unwrap();
    let get_line = line("get", &dir.path().join("absent.txt"));
    let (mut client, mut server) = connect().await;

    let server_task = tokio::spawn(async move {
        let _ = server.command().await;
        // Name a port, then never accept on it
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        server.say(&port.to_string()).await;
        server.status().await
    });

    let r = report(client.dispatch(&get_line).await);
    assert!(matches!(r, Report::Failed { .. }), "{r:?}");
    assert!(!r.is_success());
    assert_eq!(server_task.await.unwrap(), "0");
    assert_eq!(client.state(), State::Idle);
}

#[tokio::test]
async fn server_sending_byte_order_marks() {
    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("up.txt");
    std::fs::write(&upload, "abc").unwrap();
    let download = dir.path().join("down.txt");
    let put_line = line("put", &upload);
    let get_line = line("get", &download);
    let (mut client, mut server) = connect().await;

    let server_task = tokio::spawn(async move {
        let _ = server.command().await;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        server
            .say_with_bom(&listener.local_addr().unwrap().port().to_string())
            .await;
        let (mut eph, _) = listener.accept().await.unwrap();
        let _ = frame::read_frame(&mut eph, ENCODING).await.unwrap();
        server.say_with_bom("1").await;

        let _ = server.command().await;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        server
            .say_with_bom(&listener.local_addr().unwrap().port().to_string())
            .await;
        let (mut eph, _) = listener.accept().await.unwrap();
        eph.write_all(&BOM).await.unwrap();
        eph.write_all(&ENCODING.encode_str("0000000003xyz").unwrap())
            .await
            .unwrap();
        drop(eph);
        server.status().await
    });

    let r = report(client.dispatch(&put_line).await);
    assert!(
        matches!(r, Report::Uploaded { accepted: true, .. }),
        "{r:?}"
    );
    let r = report(client.dispatch(&get_line).await);
    assert!(matches!(r, Report::Downloaded { bytes: 3, .. }), "{r:?}");
    assert_eq!(std::fs::read_to_string(&download).unwrap(), "xyz");
    assert_eq!(server_task.await.unwrap(), "1");
}
