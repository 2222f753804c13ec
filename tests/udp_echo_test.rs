// UDP echo endpoint tests.

use gridlogin::udp::UdpEcho;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_echoes_datagrams_until_shutdown() {
    let echo = UdpEcho::bind("127.0.0.1:0").await.unwrap();
    let addr = echo.local_addr().unwrap();
    let (shutdown, signal) = oneshot::channel();
    let handle = tokio::spawn(echo.run(signal));

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let mut buf = [0u8; 2048];

    for payload in [&b"UseCircuitCode"[..], &[0u8, 1, 2, 3][..]] {
        client.send_to(payload, addr).await.unwrap();
        let (len, from) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
            .await
            .expect("echo timed out")
            .unwrap();
        assert_eq!(from, addr);
        assert_eq!(&buf[..len], payload);
    }

    shutdown.send(()).unwrap();
    let echoed = handle.await.unwrap().unwrap();
    assert_eq!(echoed, 2);
}

#[tokio::test]
async fn test_dropped_sender_stops_echo() {
    let echo = UdpEcho::bind("127.0.0.1:0").await.unwrap();
    let (shutdown, signal) = oneshot::channel::<()>();
    let handle = tokio::spawn(echo.run(signal));

    drop(shutdown);
    let echoed = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("echo did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(echoed, 0);
}
