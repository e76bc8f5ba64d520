//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it
//! with a plain tokio-tungstenite client.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use scrawl_transport::{
        Connection, DEFAULT_MAX_MESSAGE_SIZE, Transport, TransportError, WebSocketConnection,
        WebSocketTransport,
    };
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds a transport on a random port, connects one client, and
    /// returns both ends.
    async fn connected_pair(max_message_size: usize) -> (WebSocketConnection, ClientWs) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0", max_message_size)
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have local addr");

        let server_handle =
            tokio::spawn(async move { transport.accept().await.expect("should accept") });

        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        let server_conn = server_handle.await.expect("task should complete");
        (server_conn, client)
    }

    #[tokio::test]
    async fn test_websocket_accept_and_send_receive() {
        let (server_conn, mut client) = connected_pair(DEFAULT_MAX_MESSAGE_SIZE).await;
        assert!(server_conn.id().into_inner() > 0);

        server_conn
            .send(br#"{"type":"timer-tick","remaining":3}"#)
            .await
            .expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_text(), "UTF-8 payloads go out as text frames");
        assert_eq!(
            msg.into_data().as_ref(),
            br#"{"type":"timer-tick","remaining":3}"#
        );

        client
            .send(Message::text(r#"{"type":"start-game","roomId":"AB2CD"}"#.to_owned()))
            .await
            .unwrap();
        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"type":"start-game","roomId":"AB2CD"}"#);

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_binary_frames_pass_through() {
        let (server_conn, mut client) = connected_pair(DEFAULT_MAX_MESSAGE_SIZE).await;

        client
            .send(Message::Binary(vec![0xff, 0x00, 0x7f].into()))
            .await
            .unwrap();
        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, vec![0xff, 0x00, 0x7f]);

        server_conn.send(&[0xc3, 0x28]).await.unwrap();
        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_binary());
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (server_conn, mut client) = connected_pair(DEFAULT_MAX_MESSAGE_SIZE).await;

        client.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_rejects_oversized_message() {
        let (server_conn, mut client) = connected_pair(1024).await;

        let drawing = format!(
            r#"{{"type":"submit-drawing","roomId":"AB2CD","imageData":"{}"}}"#,
            "A".repeat(4096)
        );
        client.send(Message::text(drawing)).await.unwrap();

        let err = server_conn
            .recv()
            .await
            .expect_err("oversized message should fail");
        assert!(
            matches!(err, TransportError::MessageTooLarge(_)),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_websocket_connection_ids_are_unique() {
        let (first, _c1) = connected_pair(DEFAULT_MAX_MESSAGE_SIZE).await;
        let (second, _c2) = connected_pair(DEFAULT_MAX_MESSAGE_SIZE).await;
        assert_ne!(first.id(), second.id());
    }
}
