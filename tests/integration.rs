use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use rax_login_gateway::Server;
use rax_login_gateway::auth::hash_password;
use rax_login_gateway::config::GatewayConfig;

// Start a gateway on an ephemeral port with one registered user
async fn start_test_server(max_clients: usize) -> SocketAddr {
    let toml = format!(
        r#"
        [server]
        listen = "127.0.0.1:0"
        max_clients = {max_clients}

        [[users]]
        username = "zoe"
        password_hash = "{}"
        "#,
        hash_password("password").unwrap()
    );
    let config = GatewayConfig::from_toml_str(&toml).unwrap();
    let server = Server::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.start().await });
    addr
}

struct Conn {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Conn {
    async fn open(addr: SocketAddr) -> Conn {
        let (read, writer) = TcpStream::connect(addr).await.unwrap().into_split();
        Conn {
            reader: BufReader::new(read),
            writer,
        }
    }

    // Helper to send a request line and read the reply line
    async fn send(&mut self, line: &str) -> String {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
        self.read_reply().await
    }

    async fn read_reply(&mut self) -> String {
        let mut reply = String::new();
        self.reader.read_line(&mut reply).await.unwrap();
        reply.trim_end().to_string()
    }
}

#[tokio::test]
async fn empty_submission_requires_a_username() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    assert_eq!(conn.send("LOGIN").await, "400 You must enter a username");
    assert_eq!(conn.send("LOGIN\t\t").await, "400 You must enter a username");
    assert_eq!(
        conn.send("LOGIN\t\tpassword").await,
        "400 You must enter a username"
    );
}

#[tokio::test]
async fn username_alone_requires_a_password() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    assert_eq!(
        conn.send("LOGIN\tbielefeld").await,
        "400 You must enter a password"
    );
    assert_eq!(
        conn.send("LOGIN\tbielefeld\t").await,
        "400 You must enter a password"
    );
}

#[tokio::test]
async fn unknown_user_is_reported() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    for _ in 0..3 {
        assert_eq!(
            conn.send("LOGIN\tbielefeld\tpassword").await,
            "401 Could not find a user with that username"
        );
    }
}

#[tokio::test]
async fn logged_out_client_is_redirected_from_private() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    assert_eq!(
        conn.send("CHECK\t/private").await,
        "302 /login You need to login to access this page"
    );
    assert_eq!(
        conn.send("CHECK\t/private/settings\tforged-token").await,
        "302 /login You need to login to access this page"
    );
    assert_eq!(conn.send("CHECK\t/login").await, "200 Access granted");
}

#[tokio::test]
async fn login_form_has_masked_password() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    let reply = conn.send("FORM").await;
    let parts: Vec<&str> = reply.trim_start_matches("200 ").split('|').collect();
    assert_eq!(parts[0], "You need to login to access this page");
    assert!(parts.contains(&"Username:text"));
    assert!(parts.contains(&"Password:password"));
    assert_eq!(parts.last(), Some(&"Login"));
}

#[tokio::test]
async fn successful_login_opens_the_private_area() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    assert_eq!(conn.send("LOGIN\tzoe\twrong").await, "401 Incorrect password");

    let reply = conn.send("LOGIN\tzoe\tpassword").await;
    let token = reply.strip_prefix("201 ").unwrap().to_string();
    assert_eq!(token.len(), 50);

    assert_eq!(conn.send("CHECK\t/private").await, "200 Access granted");

    // The token also works from a fresh connection
    let mut other = Conn::open(addr).await;
    assert_eq!(
        other.send(&format!("CHECK\t/private\t{}", token)).await,
        "200 Access granted"
    );
    assert_eq!(
        other.send("CHECK\t/private").await,
        "302 /login You need to login to access this page"
    );
}

#[tokio::test]
async fn unknown_commands_and_quit() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    assert_eq!(conn.send("GET /private HTTP/1.1").await, "500 Unknown command");
    assert_eq!(conn.send("QUIT").await, "221 Goodbye");
    assert_eq!(conn.read_reply().await, "");
}

#[tokio::test]
async fn overlong_lines_are_rejected() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    let long = format!("LOGIN\t{}\tpassword", "a".repeat(4096));
    assert_eq!(conn.send(&long).await, "500 Command too long");
    assert_eq!(conn.send("LOGIN").await, "400 You must enter a username");
}

#[tokio::test]
async fn unterminated_flood_is_rejected_without_buffering() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    // No terminator yet: the reply must come before the line ends
    let flood = "a".repeat(64 * 1024);
    conn.writer.write_all(flood.as_bytes()).await.unwrap();
    assert_eq!(conn.read_reply().await, "500 Command too long");

    // The rest of the overlong line is skipped without further replies
    conn.writer.write_all(flood.as_bytes()).await.unwrap();
    conn.writer.write_all(b"\r\n").await.unwrap();
    assert_eq!(conn.send("LOGIN").await, "400 You must enter a username");
}

#[tokio::test]
async fn invalid_utf8_keeps_the_session() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    assert!(conn.send("LOGIN\tzoe\tpassword").await.starts_with("201 "));

    conn.writer
        .write_all(b"LOGIN\tzo\xffe\tpassword\r\n")
        .await
        .unwrap();
    assert_eq!(conn.read_reply().await, "500 Invalid request encoding");

    assert_eq!(conn.send("CHECK\t/private").await, "200 Access granted");
}

#[tokio::test]
async fn path_tricks_do_not_bypass_the_guard() {
    let addr = start_test_server(8).await;
    let mut conn = Conn::open(addr).await;

    for path in ["//private", "/./private", "/login/../private", "/%70rivate"] {
        assert_eq!(
            conn.send(&format!("CHECK\t{}", path)).await,
            "302 /login You need to login to access this page",
            "{path}"
        );
    }
}

#[tokio::test]
async fn connections_beyond_the_limit_are_refused() {
    let addr = start_test_server(1).await;
    let mut first = Conn::open(addr).await;
    assert_eq!(first.send("LOGIN").await, "400 You must enter a username");

    let mut second = Conn::open(addr).await;
    assert_eq!(
        second.read_reply().await,
        "421 Too many connections. Try again later."
    );
}

#[cfg(unix)]
#[tokio::test]
async fn serves_over_a_unix_socket() {
    use std::os::unix::fs::PermissionsExt;
    use tokio::net::UnixStream;

    let path = std::env::temp_dir().join(format!("rax-gateway-{}.sock", std::process::id()));
    let toml = format!(
        "[server]\nlisten = \"{}\"\nsocket_mode = \"600\"\n",
        path.display()
    );
    let config = GatewayConfig::from_toml_str(&toml).unwrap();
    let server = Server::bind(&config).await.unwrap();
    assert!(server.local_addr().is_none());
    tokio::spawn(async move { server.start().await });

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    let (read, mut write) = UnixStream::connect(&path).await.unwrap().into_split();
    let mut reader = BufReader::new(read);
    write.write_all(b"CHECK\t/private\r\n").await.unwrap();
    let mut reply = String::new();
    reader.read_line(&mut reply).await.unwrap();
    assert_eq!(
        reply.trim_end(),
        "302 /login You need to login to access this page"
    );

    let _ = std::fs::remove_file(&path);
}
