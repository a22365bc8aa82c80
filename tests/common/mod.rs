//! Shared utilities for integration testing.

use std::net::SocketAddr;

use module_dispatcher::config::AppConfig;
use module_dispatcher::controller::ControllerRegistry;
use module_dispatcher::http::HttpServer;
use module_dispatcher::lifecycle::Shutdown;
use module_dispatcher::namespace::Aggregator;
use tokio::net::TcpListener;

/// A dispatcher running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Build the routes and start serving them in the background.
pub async fn start_server(
    config: AppConfig,
    aggregator: &dyn Aggregator,
    controllers: &ControllerRegistry,
) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, aggregator, controllers);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
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
