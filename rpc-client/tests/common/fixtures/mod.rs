//! Reusable test utilities:
//! - Mock node management API (wiremock)
//! - Private CA material and a mutual-TLS node endpoint
//! - Temporary TLS/config layouts
//! - Client builders with a fast retry policy

// Not every test binary uses every fixture
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod private_ca;

pub use mock_node::MockNodeServer;
pub use private_ca::{TestPki, TlsNodeServer};
pub use test_layout::TestLayout;

use rpc_client::{ReqwestTransport, RetryPolicy, RpcClient};
use std::sync::Arc;
use std::time::Duration;

/// Default attempt budget with a backoff short enough for tests
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        backoff: Duration::from_millis(10),
        ..RetryPolicy::default()
    }
}

/// Plain-HTTP client aimed at a mock server
pub fn plain_client(base_url: &str, policy: RetryPolicy) -> RpcClient {
    RpcClient::with_transport(base_url, Arc::new(ReqwestTransport::plain()), policy).unwrap()
}
