// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Load adapters feeding the panels: built-in fixtures with simulated latency,
//! or a JSON HTTP API.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::models::{NewTransaction, Policy, Portfolio, Transaction, TransactionId};
use crate::settings::Settings;

const UA: &str = concat!("finboard/", env!("CARGO_PKG_VERSION"));

pub trait TransactionSource {
    fn fetch_transactions(&self) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Persist `new` and return it with its assigned id.
    fn add_transaction(
        &self,
        new: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;
}

pub trait PolicySource {
    fn fetch_policies(&self) -> impl Future<Output = Result<Vec<Policy>, Error>> + Send;
}

pub trait PortfolioSource {
    fn fetch_portfolios(&self) -> impl Future<Output = Result<Vec<Portfolio>, Error>> + Send;
}

/// Await `fut`, turning expiry of `limit` into [`Error::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => {
            tracing::warn!("request timed out after {:?}", limit);
            Err(Error::Timeout(limit))
        }
    }
}

const TRANSACTIONS_FIXTURE: &str = r#"[
  {"id": 1, "type": "credit", "amount": 50000, "description": "Salary", "category": "Salary", "date": "2024-02-15"},
  {"id": 2, "type": "debit", "amount": 15000, "description": "Rent", "category": "Bills", "date": "2024-02-14"},
  {"id": 3, "type": "debit", "amount": 5000, "description": "Utilities", "category": "Bills", "date": "2024-02-13"}
]"#;

const POLICIES_FIXTURE: &str = r#"[
  {"id": 1, "type": "Health", "provider": "AXA Mansard", "status": "Active", "premium": 250000, "coverage": 5000000, "expiryDate": "2025-02-15"},
  {"id": 2, "type": "Vehicle", "provider": "Leadway Assurance", "status": "Active", "premium": 100000, "coverage": 2000000, "expiryDate": "2025-01-20"},
  {"id": 3, "type": "Life", "provider": "AIICO Insurance", "status": "Active", "premium": 150000, "coverage": 10000000, "expiryDate": "2025-03-10"}
]"#;

const PORTFOLIOS_FIXTURE: &str = r#"[
  {"id": 1, "name": "Growth Portfolio", "type": "Stocks", "value": 1500000, "returns": "12.5", "risk": "High", "lastUpdated": "2024-02-15"},
  {"id": 2, "name": "Fixed Income", "type": "Bonds", "value": 2000000, "returns": "8.2", "risk": "Low", "lastUpdated": "2024-02-15"},
  {"id": 3, "name": "Real Estate Fund", "type": "REIT", "value": 3000000, "returns": "10.1", "risk": "Medium", "lastUpdated": "2024-02-15"}
]"#;

fn fixture<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, Error> {
    serde_json::from_str(raw).map_err(|e| Error::Source(format!("bad fixture data: {}", e)))
}

pub fn sample_transactions() -> Result<Vec<Transaction>, Error> {
    fixture(TRANSACTIONS_FIXTURE)
}

pub fn sample_policies() -> Result<Vec<Policy>, Error> {
    fixture(POLICIES_FIXTURE)
}

pub fn sample_portfolios() -> Result<Vec<Portfolio>, Error> {
    fixture(PORTFOLIOS_FIXTURE)
}

/// Serves the sample data after a fixed delay, standing in for a backend.
#[derive(Debug)]
pub struct MockBackend {
    load_latency: Duration,
    add_latency: Duration,
    failure: Option<String>,
    last_id: AtomicU64,
}

impl MockBackend {
    pub fn new(load_latency: Duration, add_latency: Duration) -> Self {
        MockBackend {
            load_latency,
            add_latency,
            failure: None,
            last_id: AtomicU64::new(0),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        MockBackend::new(settings.load_latency(), settings.add_latency())
    }

    /// Make every request fail with `message` after its usual delay.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Millisecond timestamp, bumped past the last id handed out.
    fn next_id(&self) -> TransactionId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let prev = match self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            }) {
            Ok(p) | Err(p) => p,
        };
        TransactionId(now.max(prev + 1))
    }

    async fn respond<T>(
        &self,
        delay: Duration,
        make: impl FnOnce() -> Result<T, Error>,
    ) -> Result<T, Error> {
        tokio::time::sleep(delay).await;
        match &self.failure {
            Some(msg) => Err(Error::Source(msg.clone())),
            None => make(),
        }
    }
}

impl TransactionSource for MockBackend {
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.respond(self.load_latency, sample_transactions).await
    }

    async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction, Error> {
        self.respond(self.add_latency, || Ok(new.with_id(self.next_id())))
            .await
            .inspect(|tx| tracing::debug!("mock backend assigned id {}", tx.id))
    }
}

impl PolicySource for MockBackend {
    async fn fetch_policies(&self) -> Result<Vec<Policy>, Error> {
        self.respond(self.load_latency, sample_policies).await
    }
}

impl PortfolioSource for MockBackend {
    async fn fetch_portfolios(&self) -> Result<Vec<Portfolio>, Error> {
        self.respond(self.load_latency, sample_portfolios).await
    }
}

/// JSON API client: `GET /transactions`, `POST /transactions`,
/// `GET /policies`, `GET /portfolios`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

fn transport(err: reqwest::Error) -> Error {
    Error::Source(err.to_string())
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(UA)
            .build()
            .map_err(transport)?;
        Ok(HttpBackend::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path);
        tracing::debug!("GET {}", url);
        self.client
            .get(&url)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .json::<T>()
            .await
            .map_err(transport)
    }
}

impl TransactionSource for HttpBackend {
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.get_json("transactions").await
    }

    async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction, Error> {
        let url = self.endpoint("transactions");
        tracing::debug!("POST {}", url);
        self.client
            .post(&url)
            .json(&new)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .json::<Transaction>()
            .await
            .map_err(transport)
    }
}

impl PolicySource for HttpBackend {
    async fn fetch_policies(&self) -> Result<Vec<Policy>, Error> {
        self.get_json("policies").await
    }
}

impl PortfolioSource for HttpBackend {
    async fn fetch_portfolios(&self) -> Result<Vec<Portfolio>, Error> {
        self.get_json("portfolios").await
    }
}

/// The adapter picked from [`Settings`]: HTTP when an API URL is configured.
#[derive(Debug)]
pub enum Backend {
    Mock(MockBackend),
    Http(HttpBackend),
}

impl Backend {
    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        match settings.api_base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => {
                tracing::info!("using HTTP backend at {}", url);
                Ok(Backend::Http(HttpBackend::new(url, settings.request_timeout())?))
            }
            _ => Ok(Backend::Mock(MockBackend::from_settings(settings))),
        }
    }
}

impl TransactionSource for Backend {
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, Error> {
        match self {
            Backend::Mock(b) => b.fetch_transactions().await,
            Backend::Http(b) => b.fetch_transactions().await,
        }
    }

    async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction, Error> {
        match self {
            Backend::Mock(b) => b.add_transaction(new).await,
            Backend::Http(b) => b.add_transaction(new).await,
        }
    }
}

impl PolicySource for Backend {
    async fn fetch_policies(&self) -> Result<Vec<Policy>, Error> {
        match self {
            Backend::Mock(b) => b.fetch_policies().await,
            Backend::Http(b) => b.fetch_policies().await,
        }
    }
}

impl PortfolioSource for Backend {
    async fn fetch_portfolios(&self) -> Result<Vec<Portfolio>, Error> {
        match self {
            Backend::Mock(b) => b.fetch_portfolios().await,
            Backend::Http(b) => b.fetch_portfolios().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TxKind};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };
        let body_len = text[..end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= end + 4 + body_len
    }

    /// Answer one request on a local port with `status` and `body`; the
    /// handle yields the raw request text.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            while !request_complete(&buf) {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).into_owned()
        });
        (format!("http://{}/api/", addr), handle)
    }

    fn local_backend(base_url: &str) -> HttpBackend {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpBackend::with_client(client, base_url)
    }

    fn new_tx() -> NewTransaction {
        NewTransaction {
            kind: TxKind::Debit,
            amount: Decimal::from(250),
            description: "Bus fare".into(),
            category: Category::Transportation,
            date: NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(),
        }
    }

    #[test]
    fn fixtures_parse() {
        assert_eq!(sample_transactions().unwrap().len(), 3);
        assert_eq!(sample_policies().unwrap().len(), 3);
        let portfolios = sample_portfolios().unwrap();
        assert_eq!(portfolios[1].returns, "8.2".parse::<Decimal>().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn mock_ids_are_unique_and_increasing() {
        let mock = MockBackend::new(Duration::ZERO, Duration::ZERO);
        let a = mock.add_transaction(new_tx()).await.unwrap();
        let b = mock.add_transaction(new_tx()).await.unwrap();
        let c = mock.add_transaction(new_tx()).await.unwrap();
        assert!(a.id < b.id && b.id < c.id);
        assert_eq!(a.description, "Bus fare");
    }

    #[tokio::test(start_paused = true)]
    async fn failing_mock_reports_its_message() {
        let mock = MockBackend::new(Duration::from_millis(1000), Duration::ZERO).failing("offline");
        assert_eq!(
            mock.fetch_policies().await.unwrap_err(),
            Error::Source("offline".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out() {
        let mock = MockBackend::new(Duration::from_secs(30), Duration::ZERO);
        let limit = Duration::from_secs(5);
        assert_eq!(
            with_timeout(limit, mock.fetch_transactions()).await.unwrap_err(),
            Error::Timeout(limit)
        );
    }

    #[test]
    fn backend_choice_follows_settings() {
        let mut settings = Settings::default();
        assert!(matches!(Backend::from_settings(&settings), Ok(Backend::Mock(_))));

        settings.api_base_url = Some("http://localhost:8080/api/".into());
        match Backend::from_settings(&settings) {
            Ok(Backend::Http(http)) => {
                assert_eq!(http.endpoint("transactions"), "http://localhost:8080/api/transactions")
            }
            other => panic!("expected http backend, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_get_parses_transactions() {
        let (url, server) = serve_once("200 OK", TRANSACTIONS_FIXTURE).await;
        let records = local_backend(&url).fetch_transactions().await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/transactions HTTP/1.1"));
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].kind, TxKind::Debit);
        assert_eq!(records[1].amount, Decimal::from(15000));
    }

    #[tokio::test]
    async fn http_post_sends_type_and_reads_back_the_record() {
        let reply = r#"{"id":42,"type":"debit","amount":250,"description":"Bus fare","category":"Transportation","date":"2024-02-16T00:00:00.000Z"}"#;
        let (url, server) = serve_once("201 Created", reply).await;
        let tx = local_backend(&url).add_transaction(new_tx()).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /api/transactions HTTP/1.1"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["type"], "debit");
        assert_eq!(sent["category"], "Transportation");
        assert_eq!(sent["date"], "2024-02-16");
        assert!(sent.get("kind").is_none());

        assert_eq!(tx.id, TransactionId(42));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 2, 16).unwrap());
    }

    #[tokio::test]
    async fn http_error_status_becomes_source_error() {
        let (url, server) = serve_once("503 Service Unavailable", r#"{"error":"down"}"#).await;
        let err = local_backend(&url).fetch_policies().await.unwrap_err();
        server.await.unwrap();

        match err {
            Error::Source(msg) => assert!(msg.contains("503"), "unexpected message: {}", msg),
            other => panic!("expected a source error, got {:?}", other),
        }
    }
}
