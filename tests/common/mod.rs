//! Shared harness for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use dialer::lifecycle::open_state;
use dialer::{DialServer, DialerConfig, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const URI: &str = "/dials";

/// A dial server running on an ephemeral port against a temporary document.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Arc<Shutdown>,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
    dir: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, URI)
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn document_path(&self) -> PathBuf {
        self.dir.path().join("dials.json")
    }

    pub fn document(&self) -> String {
        std::fs::read_to_string(self.document_path()).unwrap()
    }
}

/// Write `contents` as the settings document and start a server for it.
pub async fn start_server(contents: &str) -> TestServer {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dials.json");
    std::fs::write(&path, contents).unwrap();

    let mut config = DialerConfig::new(path.to_string_lossy(), "smp", URI, 0);
    config.bind_host = "127.0.0.1".into();

    let toggle = open_state(&config).unwrap();
    let listener = TcpListener::bind(config.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Arc::new(Shutdown::new());
    let server = DialServer::new(config, toggle, shutdown.clone());
    let handle = tokio::spawn(server.run(listener));

    TestServer {
        addr,
        shutdown,
        handle,
        dir,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
