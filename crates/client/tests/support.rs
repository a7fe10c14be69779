use std::sync::Once;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use wallet_client::WalletClient;
use wallet_domain::{ClientConfig, RetryConfig, TokenClaims, TokenHeader};
use wiremock::{MockServer, Request};

pub const EC_KEY_PEM: &[u8] = include_bytes!("fixtures/keys/ec_private_key.pem");
pub const RSA_KEY_PEM: &[u8] = include_bytes!("fixtures/keys/rsa_private_key.pem");

static TRACING: Once = Once::new();

/// Route client diagnostics through the test harness output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("wallet_client=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Configuration pointing at `server` with short retry intervals.
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        retry: RetryConfig { retry_interval: Duration::from_millis(10), ..Default::default() },
        debug: true,
        ..Default::default()
    }
}

/// Client for `config` holding the EC fixture as static credentials.
pub fn client_with_static_key(config: ClientConfig, key_id: &str) -> WalletClient {
    init_tracing();
    let client = WalletClient::new(config).expect("client should build");
    client.set_credentials(key_id, EC_KEY_PEM.to_vec());
    client
}

/// Decoded form of the bearer token carried by a captured request.
pub struct CapturedToken {
    pub signing_input: String,
    pub header: TokenHeader,
    pub claims: TokenClaims,
    pub signature: Vec<u8>,
}

/// Extract and decode the bearer token from `request`.
pub fn captured_token(request: &Request) -> CapturedToken {
    let value = request
        .headers
        .get("authorization")
        .expect("authorization header should be present")
        .to_str()
        .expect("authorization header should be ascii");
    let token = value.strip_prefix("Bearer ").expect("bearer scheme");

    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3, "compact token has three segments");

    let header = URL_SAFE_NO_PAD.decode(segments[0]).expect("header segment is base64url");
    let claims = URL_SAFE_NO_PAD.decode(segments[1]).expect("payload segment is base64url");
    let signature = URL_SAFE_NO_PAD.decode(segments[2]).expect("signature segment is base64url");

    CapturedToken {
        signing_input: format!("{}.{}", segments[0], segments[1]),
        header: serde_json::from_slice(&header).expect("header is json"),
        claims: serde_json::from_slice(&claims).expect("claims are json"),
        signature,
    }
}
