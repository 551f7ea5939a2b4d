//! Private certificate authority and a mutual-TLS node endpoint
//!
//! Mirrors a real node install: one CA signs both the daemon certificate the
//! client presents and the certificate the service answers with. The service
//! certificate is issued for `chia.net`, not for the address the client dials.

use rcgen::{
    BasicConstraints, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
    KeyUsagePurpose,
};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

pub const SERVICE_NAME: &str = "chia.net";

/// PEM files for the client side plus DER material for the service side
pub struct TestPki {
    pub ca_crt_pem: String,
    pub ca_key_pem: String,
    pub daemon_crt_pem: String,
    pub daemon_key_pem: String,
    pub ca_der: CertificateDer<'static>,
    pub service_crt_der: CertificateDer<'static>,
    pub service_key_der: Vec<u8>,
}

impl TestPki {
    pub fn generate() -> Self {
        let ca_key = KeyPair::generate().unwrap();
        let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
        ca_params
            .distinguished_name
            .push(DnType::CommonName, "Test Private CA");
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        ca_params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];
        let ca_cert = ca_params.self_signed(&ca_key).unwrap();

        let daemon_key = KeyPair::generate().unwrap();
        let mut daemon_params = CertificateParams::new(vec![SERVICE_NAME.to_string()]).unwrap();
        daemon_params
            .distinguished_name
            .push(DnType::CommonName, "Test Daemon");
        daemon_params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ClientAuth];
        let daemon_cert = daemon_params
            .signed_by(&daemon_key, &ca_cert, &ca_key)
            .unwrap();

        let service_key = KeyPair::generate().unwrap();
        let mut service_params = CertificateParams::new(vec![SERVICE_NAME.to_string()]).unwrap();
        service_params
            .distinguished_name
            .push(DnType::CommonName, "Test Full Node");
        service_params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
        let service_cert = service_params
            .signed_by(&service_key, &ca_cert, &ca_key)
            .unwrap();

        Self {
            ca_crt_pem: ca_cert.pem(),
            ca_key_pem: ca_key.serialize_pem(),
            daemon_crt_pem: daemon_cert.pem(),
            daemon_key_pem: daemon_key.serialize_pem(),
            ca_der: ca_cert.der().clone(),
            service_crt_der: service_cert.der().clone(),
            service_key_der: service_key.serialize_der(),
        }
    }

    /// Service-side config that only accepts clients holding a CA-signed cert
    fn server_config(&self) -> ServerConfig {
        let provider = Arc::new(rustls::crypto::ring::default_provider());

        let mut roots = RootCertStore::empty();
        roots.add(self.ca_der.clone()).unwrap();
        let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider.clone())
            .build()
            .unwrap();

        ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_client_cert_verifier(verifier)
            .with_single_cert(
                vec![self.service_crt_der.clone()],
                PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(self.service_key_der.clone())),
            )
            .unwrap()
    }
}

/// What the service saw of the one request it answered
#[derive(Debug)]
pub struct ReceivedRequest {
    pub client_cert_presented: bool,
    pub head: String,
    pub body: Vec<u8>,
}

/// Single-shot HTTPS endpoint requiring a client certificate
pub struct TlsNodeServer {
    pub addr: SocketAddr,
    handle: JoinHandle<ReceivedRequest>,
}

impl TlsNodeServer {
    /// Accept one connection and answer it with `response_json`
    pub async fn start(pki: &TestPki, response_json: &str) -> Self {
        let acceptor = TlsAcceptor::from(Arc::new(pki.server_config()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response_json = response_json.to_string();

        let handle = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut tls = acceptor.accept(tcp).await.unwrap();
            let client_cert_presented = tls
                .get_ref()
                .1
                .peer_certificates()
                .map(|certs| !certs.is_empty())
                .unwrap_or(false);

            let (head, body) = read_request(&mut tls).await;

            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                response_json.len(),
                response_json
            );
            tls.write_all(response.as_bytes()).await.unwrap();
            tls.shutdown().await.ok();

            ReceivedRequest {
                client_cert_presented,
                head,
                body,
            }
        });

        Self { addr, handle }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub async fn received(self) -> ReceivedRequest {
        self.handle.await.unwrap()
    }
}

async fn read_request<S: AsyncReadExt + Unpin>(stream: &mut S) -> (String, Vec<u8>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            let body_start = end + 4;
            if buf.len() >= body_start + content_length {
                let body = buf[body_start..body_start + content_length].to_vec();
                return (head, body);
            }
        }
    }

    (String::from_utf8_lossy(&buf).to_string(), Vec::new())
}
