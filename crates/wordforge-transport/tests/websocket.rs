//! Integration tests for the WebSocket listener: real sockets on an
//! OS-assigned port, a `tokio-tungstenite` client on the other end.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;
    use tokio_tungstenite::tungstenite::Message;
    use wordforge_transport::{
        Connection, OriginPolicy, Transport, TransportError, WebSocketTransport,
    };

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    #[tokio::test]
    async fn test_websocket_accept_and_send_receive() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound").to_string();

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");
        assert!(server_conn.id().into_inner() > 0);

        // JSON goes out as a text frame.
        server_conn
            .send(br#"{"type":"Health","status":"ok"}"#)
            .await
            .expect("send should succeed");
        let msg = client_ws.next().await.unwrap().unwrap();
        assert!(msg.is_text());
        assert_eq!(
            msg.into_data().as_ref(),
            br#"{"type":"Health","status":"ok"}"#
        );

        client_ws
            .send(Message::Text(r#"{"type":"NewGame"}"#.into()))
            .await
            .unwrap();
        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"type":"NewGame"}"#);

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().unwrap().to_string();

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_rejects_foreign_origin() {
        let mut transport = WebSocketTransport::bind_with_origin(
            "127.0.0.1:0",
            OriginPolicy::Exact("http://localhost:5173".into()),
        )
        .await
        .expect("should bind");
        let addr = transport.local_addr().unwrap().to_string();

        let server_handle = tokio::spawn(async move { transport.accept().await });

        let mut request = format!("ws://{addr}").into_client_request().unwrap();
        request
            .headers_mut()
            .insert("origin", "http://attacker.example".parse().unwrap());
        let client = tokio_tungstenite::connect_async(request).await;
        assert!(client.is_err(), "handshake should be refused");

        let accepted = server_handle.await.unwrap();
        assert!(matches!(
            accepted,
            Err(TransportError::OriginRejected(origin)) if origin == "http://attacker.example"
        ));
    }

    #[tokio::test]
    async fn test_websocket_accepts_configured_origin() {
        let mut transport = WebSocketTransport::bind_with_origin(
            "127.0.0.1:0",
            OriginPolicy::Exact("http://localhost:5173".into()),
        )
        .await
        .expect("should bind");
        let addr = transport.local_addr().unwrap().to_string();

        let server_handle = tokio::spawn(async move { transport.accept().await });

        let mut request = format!("ws://{addr}").into_client_request().unwrap();
        request
            .headers_mut()
            .insert("origin", "http://localhost:5173".parse().unwrap());
        let (_client, _) = tokio_tungstenite::connect_async(request)
            .await
            .expect("handshake should succeed");

        assert!(server_handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_stalled_handshake_times_out() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind")
            .with_handshake_timeout(Duration::from_millis(100));
        let addr = transport.local_addr().unwrap();

        // Connects but never sends an upgrade request.
        let _stalled = tokio::net::TcpStream::connect(addr).await.unwrap();

        let pending = transport.accept_pending().await.expect("tcp accept");
        let result = tokio::time::timeout(Duration::from_secs(5), pending.upgrade())
            .await
            .expect("upgrade should give up on its own");
        assert!(matches!(result, Err(TransportError::HandshakeTimeout(_))));
    }

    #[tokio::test]
    async fn test_pending_connection_upgrades_later() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().unwrap();

        let client = tokio::spawn(async move {
            tokio_tungstenite::connect_async(format!("ws://{addr}")).await
        });

        let pending = transport.accept_pending().await.expect("tcp accept");
        assert_eq!(pending.peer_addr().ip(), addr.ip());
        let conn = pending.upgrade().await.expect("handshake should succeed");
        assert!(conn.id().into_inner() > 0);
        assert!(client.await.unwrap().is_ok());
    }
}
