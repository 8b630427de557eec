//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use prost_types::Timestamp;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tonic::{Request, Response, Status};

use social_gateway::auth::Claims;
use social_gateway::backend::proto::{
    CommentDataResponse, CountResponse, DynamicListResponse, DynamicResponse, ListCommentsResponse,
    ListPostsResponse, PaginatedListRequest, PostCommentRequest, PostDataRequest, PostDataResponse, PostId,
    TopTenParameter, TopTenPostsResponse, TopTenUsersResponse, UpdatePostRequest, UserId,
};
use social_gateway::backend::{Backends, PostsBackend, RpcResult, StatisticBackend, USER_ID_METADATA};
use social_gateway::config::GatewayConfig;
use social_gateway::{GatewayServer, Shutdown};

pub const SECRET: &str = "integration-secret";

/// One call observed by the stub backend.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub user_id: Option<String>,
    pub detail: String,
}

/// In-process posts + statistic backend with canned answers.
#[derive(Default)]
pub struct StubBackend {
    calls: Mutex<Vec<Call>>,
    count: AtomicUsize,
    failure: Mutex<Option<Status>>,
}

impl StubBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent call fail with `status`.
    pub fn fail_with(&self, status: Status) {
        *self.failure.lock().unwrap() = Some(status);
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn backends(self: &Arc<Self>) -> Backends {
        Backends::new(self.clone(), self.clone())
    }

    fn record<T: std::fmt::Debug>(&self, method: &'static str, request: &Request<T>) -> Result<(), Status> {
        self.count.fetch_add(1, Ordering::SeqCst);
        let user_id = request
            .metadata()
            .get(USER_ID_METADATA)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.calls.lock().unwrap().push(Call {
            method,
            user_id,
            detail: format!("{:?}", request.get_ref()),
        });
        match self.failure.lock().unwrap().clone() {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}

pub fn sample_post(post_id: i32) -> PostDataResponse {
    PostDataResponse {
        post_id,
        post_name: "first".into(),
        post_description: "hello world".into(),
        security_flag: false,
        created_at: Some(Timestamp { seconds: 1_700_000_000, nanos: 0 }),
        updated_at: Some(Timestamp { seconds: 1_700_000_600, nanos: 0 }),
        tags: vec!["rust".into(), "grpc".into()],
        user_id: 42,
    }
}

#[async_trait]
impl PostsBackend for StubBackend {
    async fn create_post(&self, request: Request<PostDataRequest>) -> RpcResult<()> {
        self.record("CreatePost", &request)?;
        Ok(Response::new(()))
    }

    async fn delete_post(&self, request: Request<PostId>) -> RpcResult<()> {
        self.record("DeletePost", &request)?;
        Ok(Response::new(()))
    }

    async fn update_post(&self, request: Request<UpdatePostRequest>) -> RpcResult<()> {
        self.record("UpdatePost", &request)?;
        Ok(Response::new(()))
    }

    async fn get_post(&self, request: Request<PostId>) -> RpcResult<PostDataResponse> {
        self.record("GetPost", &request)?;
        Ok(Response::new(sample_post(request.get_ref().post_id)))
    }

    async fn get_post_list(&self, request: Request<PaginatedListRequest>) -> RpcResult<ListPostsResponse> {
        self.record("GetPostList", &request)?;
        Ok(Response::new(ListPostsResponse {
            posts: vec![sample_post(1), sample_post(2)],
        }))
    }

    async fn post_comment(&self, request: Request<PostCommentRequest>) -> RpcResult<()> {
        self.record("PostComment", &request)?;
        Ok(Response::new(()))
    }

    async fn post_like(&self, request: Request<PostId>) -> RpcResult<()> {
        self.record("PostLike", &request)?;
        Ok(Response::new(()))
    }

    async fn post_view(&self, request: Request<PostId>) -> RpcResult<()> {
        self.record("PostView", &request)?;
        Ok(Response::new(()))
    }

    async fn get_comment_list(&self, request: Request<PaginatedListRequest>) -> RpcResult<ListCommentsResponse> {
        self.record("GetCommentList", &request)?;
        Ok(Response::new(ListCommentsResponse {
            comments: vec![CommentDataResponse {
                comment_id: 3,
                post_id: 1,
                user_id: 42,
                comment_description: "nice".into(),
            }],
        }))
    }
}

fn series() -> DynamicListResponse {
    DynamicListResponse {
        dynamic: vec![DynamicResponse {
            count: Some(CountResponse { count: 2 }),
            data: Some(Timestamp { seconds: 1_700_000_000, nanos: 0 }),
        }],
    }
}

#[async_trait]
impl StatisticBackend for StubBackend {
    async fn get_views_count(&self, request: Request<PostId>) -> RpcResult<CountResponse> {
        self.record("GetViewsCount", &request)?;
        Ok(Response::new(CountResponse { count: 5 }))
    }

    async fn get_likes_count(&self, request: Request<PostId>) -> RpcResult<CountResponse> {
        self.record("GetLikesCount", &request)?;
        Ok(Response::new(CountResponse { count: 6 }))
    }

    async fn get_comments_count(&self, request: Request<PostId>) -> RpcResult<CountResponse> {
        self.record("GetCommentsCount", &request)?;
        Ok(Response::new(CountResponse { count: 7 }))
    }

    async fn get_views_dynamic(&self, request: Request<PostId>) -> RpcResult<DynamicListResponse> {
        self.record("GetViewsDynamic", &request)?;
        Ok(Response::new(series()))
    }

    async fn get_likes_dynamic(&self, request: Request<PostId>) -> RpcResult<DynamicListResponse> {
        self.record("GetLikesDynamic", &request)?;
        Ok(Response::new(series()))
    }

    async fn get_comments_dynamic(&self, request: Request<PostId>) -> RpcResult<DynamicListResponse> {
        self.record("GetCommentsDynamic", &request)?;
        Ok(Response::new(series()))
    }

    async fn get_top_ten_posts(&self, request: Request<TopTenParameter>) -> RpcResult<TopTenPostsResponse> {
        self.record("GetTopTenPosts", &request)?;
        Ok(Response::new(TopTenPostsResponse {
            posts: vec![PostId { post_id: 9 }, PostId { post_id: 4 }],
        }))
    }

    async fn get_top_ten_users(&self, request: Request<TopTenParameter>) -> RpcResult<TopTenUsersResponse> {
        self.record("GetTopTenUsers", &request)?;
        Ok(Response::new(TopTenUsersResponse {
            users: vec![UserId { user_id: 42 }],
        }))
    }
}

/// Config pointing at the given users upstream, signed with [`SECRET`].
pub fn test_config(users: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.auth.secret = SECRET.into();
    config.backends.users = users.into();
    config.timeouts.connect_secs = 1;
    config.timeouts.backend_secs = 2;
    config.timeouts.shutdown_secs = 1;
    config
}

/// A running gateway. Shuts down when dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Start the graceful shutdown without waiting for it.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway on an ephemeral port.
pub async fn spawn_gateway(config: GatewayConfig, backends: Backends) -> TestGateway {
    let server = GatewayServer::new(&config, backends).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Token as the users service would issue it.
pub fn sign_token(login: &str, password: &str, user_id: i64) -> String {
    let claims = Claims {
        login: login.into(),
        password: password.into(),
        user_id,
        exp: None,
        iat: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

/// Request head (lowercased) and body seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub head: String,
    pub body: String,
}

/// Start a programmable HTTP/1.1 upstream that records each request.
pub async fn start_upstream(status: u16, body: &'static str) -> (SocketAddr, Arc<Mutex<Vec<Captured>>>) {
    start_delayed_upstream(status, body, Duration::ZERO).await
}

/// Like [`start_upstream`], but waits `delay` between reading the request
/// and answering it.
pub async fn start_delayed_upstream(
    status: u16,
    body: &'static str,
    delay: Duration,
) -> (SocketAddr, Arc<Mutex<Vec<Captured>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let sink = sink.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            sink.lock().unwrap().push(request);
                        }
                        tokio::time::sleep(delay).await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            _ => "500 Internal Server Error",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, captured)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<Captured> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[head_end..]).to_string();
    Some(Captured { head, body })
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Write `request` verbatim on a fresh connection and return the response
/// status line.
pub async fn raw_request(addr: SocketAddr, request: &str) -> String {
    let mut socket = tokio::net::TcpStream::connect(addr).await.unwrap();
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(2).any(|w| w == b"\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let text = String::from_utf8_lossy(&buf);
    text.lines().next().unwrap_or_default().to_string()
}
