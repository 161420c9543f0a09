mod routes;

use actix_web::{web, App, HttpServer};
use reqwest::Url;
use std::sync::{Arc, RwLock};
use tokio::sync::oneshot;

#[derive(Clone)]
struct MockServerConfiguration {
    signing_key_id: String,
    signing_public_key: Vec<u8>,
    program_address: String,
}

#[derive(Clone, Default)]
struct MockServerStorageInner {
    /// Requests that reached the server, valid or not.
    requests: usize,
    /// Instructions accepted, in order, after signature and envelope validation.
    calls: Vec<String>,
    /// Whether `initialize` already succeeded once.
    initialized: bool,
    /// HTTP status to answer the next instruction with, instead of executing it.
    fail_next: Option<u16>,
}

/// In-memory state of the mock program.
type MockServerStorage = Arc<RwLock<MockServerStorageInner>>;

/// Simple JSON-RPC mock of a backend hosting one program, used in local integration tests.
pub struct RpcMockServer {
    url: Url,
    shutdown: Option<oneshot::Sender<()>>,
    storage: MockServerStorage,
}

impl RpcMockServer {
    pub async fn start(
        signing_key_id: &str,
        signing_public_key: Vec<u8>,
        program_address: &str,
    ) -> Self {
        let configuration = MockServerConfiguration {
            signing_key_id: signing_key_id.to_string(),
            signing_public_key,
            program_address: program_address.to_string(),
        };

        let storage = MockServerStorage::default();
        let storage_clone = storage.clone();

        // Setup the mock HTTP server and bind it to a random port
        let http_server_factory = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(configuration.clone()))
                .app_data(web::Data::new(storage.clone()))
                .service(web::resource("/").route(web::post().to(routes::rpc)))
        })
        .workers(1)
        .bind("127.0.0.1:0")
        .unwrap();

        let addr = http_server_factory.addrs().first().cloned().unwrap();

        // Kill the HTTP server when this struct is dropped
        let (shutdown_sender, shutdown_recv) = oneshot::channel();

        let http_server = http_server_factory.run();
        tokio::spawn(async move {
            tokio::select! {
                _ = http_server => panic!("HTTP server crashed"),
                _ = shutdown_recv => { /* Intentional shutdown */ }
            }
        });

        Self {
            url: Url::parse(&format!("http://{}", addr)).unwrap(),
            shutdown: Some(shutdown_sender),
            storage: storage_clone,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Number of requests that reached the server so far, including rejected ones.
    pub fn received_requests(&self) -> usize {
        self.storage.read().unwrap().requests
    }

    /// Instructions accepted by the server so far.
    pub fn received_calls(&self) -> Vec<String> {
        self.storage.read().unwrap().calls.clone()
    }

    /// Makes the next instruction fail with the given HTTP status.
    pub fn fail_next_call(&self, status: u16) {
        self.storage.write().unwrap().fail_next = Some(status);
    }
}

impl Drop for RpcMockServer {
    fn drop(&mut self) {
        let _ = self.shutdown.take().unwrap().send(());
    }
}
