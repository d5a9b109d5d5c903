mod common;

use std::sync::Arc;

use bango_client::{BangoClient, ClientMode, get_client};
use common::FakeConnector;

fn client_for(config: &bango_client::BangoConfig) -> BangoClient {
    get_client(config, Arc::new(FakeConnector::ok())).unwrap()
}

#[test]
fn test_no_proxy() {
    let config = common::config().with_is_proxy(false);
    assert_eq!(client_for(&config).mode(), ClientMode::Direct);
}

#[test]
fn test_using_proxy() {
    let config = common::config().with_proxy("http://foo.com");
    assert_eq!(
        client_for(&config).mode(),
        ClientMode::Proxy {
            url: "http://foo.com".to_owned()
        }
    );
}

#[test]
fn test_am_proxy() {
    let config = common::config()
        .with_proxy("http://foo.com")
        .with_is_proxy(true);
    assert_eq!(client_for(&config).mode(), ClientMode::Direct);
}

#[test]
fn test_mock() {
    let config = common::config().with_mock(true);
    assert_eq!(client_for(&config).mode(), ClientMode::Mock);
}

#[test]
fn test_mock_beats_proxy() {
    let config = common::config()
        .with_mock(true)
        .with_proxy("http://foo.com");
    assert_eq!(client_for(&config).mode(), ClientMode::Mock);
}

#[test]
fn test_empty_proxy_url_is_direct() {
    let config = common::config().with_proxy("");
    assert_eq!(client_for(&config).mode(), ClientMode::Direct);
}
