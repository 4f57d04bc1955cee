use std::time::{Duration, Instant};
use till_printer::{
    CLOSE_WAIT, PrintDirective, PrinterEndpoint, TcpTransport, Transport, encode,
};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

async fn local_endpoint(listener: &TcpListener) -> PrinterEndpoint {
    let addr = listener.local_addr().unwrap();
    PrinterEndpoint::new("loopback", addr.ip().to_string(), addr.port())
}

/// Port that had a listener a moment ago and now refuses connections
async fn closed_endpoint() -> PrinterEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = local_endpoint(&listener).await;
    drop(listener);
    endpoint
}

#[tokio::test]
async fn test_probe_reachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = local_endpoint(&listener).await;

    assert!(
        TcpTransport
            .probe(&endpoint, Duration::from_millis(500))
            .await
    );
}

#[tokio::test]
async fn test_probe_refused() {
    let endpoint = closed_endpoint().await;

    assert!(
        !TcpTransport
            .probe(&endpoint, Duration::from_millis(500))
            .await
    );
}

#[tokio::test]
async fn test_probe_unresolvable_host() {
    let endpoint = PrinterEndpoint::new("bogus", "printer.invalid", 9100);

    assert!(!TcpTransport.probe(&endpoint, Duration::from_secs(2)).await);
}

#[tokio::test]
async fn test_send_delivers_exact_bytes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = local_endpoint(&listener).await;

    let printer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.unwrap();
        // dropping the socket closes the printer side
        received
    });

    let payload = encode(&[PrintDirective::line("Döner"), PrintDirective::CutPaper]);
    TcpTransport
        .send(&endpoint, &payload, Duration::from_secs(2))
        .await
        .unwrap();

    assert_eq!(printer.await.unwrap(), payload);
}

#[tokio::test]
async fn test_send_succeeds_when_printer_keeps_connection_open() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = local_endpoint(&listener).await;

    let printer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(socket);
        received
    });

    TcpTransport
        .send(&endpoint, b"hello", Duration::from_millis(300))
        .await
        .unwrap();

    assert_eq!(printer.await.unwrap(), b"hello");
}

#[tokio::test]
async fn test_send_refused() {
    let endpoint = closed_endpoint().await;

    let err = TcpTransport
        .send(&endpoint, b"data", Duration::from_millis(500))
        .await
        .unwrap_err();

    assert!(!err.is_timeout());
    assert!(err.to_string().contains("Connection failed"));
}

#[tokio::test]
async fn test_close_wait_is_bounded_by_close_wait_not_send_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = local_endpoint(&listener).await;

    let printer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(socket);
    });

    let started = Instant::now();
    TcpTransport
        .send(&endpoint, b"hello", Duration::from_secs(10))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed < CLOSE_WAIT + Duration::from_secs(3), "send took {elapsed:?}");
    printer.abort();
}

#[tokio::test]
async fn test_send_times_out_when_printer_stops_reading() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = local_endpoint(&listener).await;

    // accepts, then never reads so the socket buffers fill up
    let printer = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(socket);
    });

    let payload = vec![0u8; 32 * 1024 * 1024];
    let started = Instant::now();
    let err = TcpTransport
        .send(&endpoint, &payload, Duration::from_millis(500))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {err}");
    assert!(started.elapsed() < Duration::from_secs(5));
    printer.abort();
}
