mod helpers;

use helpers::{handler, netbios_query, query, Incoming, ScriptedPacketConn, RELAY_V4};
use hickory_proto::op::Message;
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, RecordType};
use linkrelay_domain::DomainError;
use linkrelay_infrastructure::dns::transport::{serve_packet_conn, serve_tcp, serve_udp};
use linkrelay_infrastructure::dns::{run_handler_on_packet_conn, DnsResponder, MessageMapper};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(2);

async fn udp_exchange(client: &UdpSocket, server: SocketAddr, request: &Message) -> Option<Message> {
    let bytes = MessageMapper::serialize(request).unwrap();
    client.send_to(&bytes, server).await.unwrap();

    let mut buf = vec![0u8; 4096];
    match timeout(Duration::from_millis(300), client.recv_from(&mut buf)).await {
        Ok(Ok((len, _))) => Some(MessageMapper::parse(&buf[..len]).unwrap()),
        _ => None,
    }
}

async fn tcp_send(stream: &mut TcpStream, request: &Message) {
    let bytes = MessageMapper::serialize(request).unwrap();
    stream.write_all(&(bytes.len() as u16).to_be_bytes()).await.unwrap();
    stream.write_all(&bytes).await.unwrap();
}

async fn tcp_recv(stream: &mut TcpStream) -> io::Result<Message> {
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;
    let mut buf = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    stream.read_exact(&mut buf).await?;
    Ok(MessageMapper::parse(&buf).unwrap())
}

// ── UDP ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_udp_answers_and_skips_unanswerable() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let server = socket.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(serve_udp(socket, handler(), shutdown.clone()));

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    let silent = udp_exchange(&client, server, &query(1, &[("mail.example.", RecordType::MX)])).await;
    assert!(silent.is_none());

    client.send_to(&[0xde, 0xad], server).await.unwrap();

    let reply = udp_exchange(&client, server, &query(2, &[("gateway.internal.", RecordType::A)]))
        .await
        .expect("reply expected");
    assert_eq!(reply.id(), 2);
    assert_eq!(reply.answers()[0].data(), Some(&RData::A(A(RELAY_V4))));

    shutdown.cancel();
    let result = timeout(WAIT, task).await.unwrap().unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_udp_netbios_reply_without_question() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let server = socket.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    tokio::spawn(serve_udp(socket, handler(), shutdown.clone()));

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let reply = udp_exchange(&client, server, &netbios_query(3, "FILESRV", 0x20))
        .await
        .expect("reply expected");

    assert!(reply.queries().is_empty());
    assert!(!reply.checking_disabled());
    assert_eq!(reply.answers().len(), 1);

    shutdown.cancel();
}

// ── TCP ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tcp_serves_several_requests_per_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(serve_tcp(listener, handler(), shutdown.clone()));

    let mut stream = TcpStream::connect(server).await.unwrap();
    for id in [10u16, 11] {
        tcp_send(&mut stream, &query(id, &[("host.local.", RecordType::A)])).await;
        let reply = timeout(WAIT, tcp_recv(&mut stream)).await.unwrap().unwrap();
        assert_eq!(reply.id(), id);
        assert_eq!(reply.answers().len(), 1);
    }

    shutdown.cancel();
    let result = timeout(WAIT, task).await.unwrap().unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_tcp_unanswerable_request_closes_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    tokio::spawn(serve_tcp(listener, handler(), shutdown.clone()));

    let mut stream = TcpStream::connect(server).await.unwrap();
    tcp_send(&mut stream, &query(20, &[("mail.example.", RecordType::MX)])).await;

    let mut buf = [0u8; 16];
    let read = timeout(WAIT, stream.read(&mut buf)).await.unwrap();
    assert!(matches!(read, Ok(0)), "expected end of stream, got {:?}", read);

    shutdown.cancel();
}

// ── packet connections ────────────────────────────────────────────────────

#[tokio::test]
async fn test_packet_conn_runner_on_udp_socket() {
    let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());
    let server = socket.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(run_handler_on_packet_conn(socket, handler(), shutdown.clone()));

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let reply = udp_exchange(&client, server, &query(30, &[("host.local.", RecordType::A)]))
        .await
        .expect("reply expected");
    assert_eq!(reply.id(), 30);

    shutdown.cancel();
    assert!(timeout(WAIT, task).await.unwrap().unwrap().is_ok());
}

#[tokio::test]
async fn test_packet_conn_survives_transient_errors_and_stops_on_fatal() {
    let peer: SocketAddr = "192.0.2.9:5000".parse().unwrap();
    let request = MessageMapper::serialize(&query(31, &[("host.local.", RecordType::A)])).unwrap();
    let conn = Arc::new(ScriptedPacketConn::new(vec![
        Incoming::Error(io::ErrorKind::Interrupted),
        Incoming::Packet(vec![0x00], peer),
        Incoming::Packet(request, peer),
    ]));

    let result = timeout(
        WAIT,
        serve_packet_conn(conn.clone(), handler(), CancellationToken::new()),
    )
    .await
    .unwrap();

    assert!(matches!(result, Err(DomainError::ReceiveFailed(_))));
    let sent = conn.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, peer);
}

// ── orchestrator ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_responder_returns_ok_on_cancellation() {
    let responder = DnsResponder::new("127.0.0.1:0".parse().unwrap(), handler());
    let shutdown = CancellationToken::new();

    let run = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { responder.run(shutdown).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    let result = timeout(WAIT, run).await.unwrap().unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_responder_propagates_bind_failure_and_stops_sibling() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = occupied.local_addr().unwrap();

    let responder = DnsResponder::new(addr, handler());
    let shutdown = CancellationToken::new();

    let result = timeout(WAIT, responder.run(shutdown.clone())).await.unwrap();

    assert!(matches!(result, Err(DomainError::BindFailed { .. })));
    assert!(!shutdown.is_cancelled());
}
