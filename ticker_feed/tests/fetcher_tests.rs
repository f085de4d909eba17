use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, unbounded};
use ticker_common::TickerError;
use ticker_common::serial::SerialForwarder;
use ticker_feed::fetcher::{PriceFetcher, PriceSource};
use ticker_feed::model::backoff::Backoff;
use ticker_feed::model::listing::PriceSelection;
use ticker_feed::poller::Poller;

const LISTING_PATH: &str = "/v1/cryptocurrency/listings/latest";

const LISTING_BODY: &str = r#"{
    "status": {"error_code": 0, "error_message": null, "credit_count": 1},
    "data": [
        {"id": 1, "name": "Bitcoin", "symbol": "BTC", "quote": {"USD": {"price": 54999.999}}},
        {"id": 1027, "name": "Ethereum", "symbol": "ETH", "quote": {"USD": {"price": 2999.994}}}
    ]
}"#;

/// Reads one request head and returns it lowercased.
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).to_lowercase()
}

fn respond(stream: &mut TcpStream, status: &str, extra_headers: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
        status,
        body.len(),
        extra_headers,
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Serves a single canned response and reports the request it saw.
fn serve_once(status: &'static str, body: &'static str) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}{}", listener.local_addr().unwrap(), LISTING_PATH);
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let request = read_request(&mut stream);
            let _ = tx.send(request);
            respond(&mut stream, status, "", body);
        }
    });
    (url, rx)
}

fn fetcher(url: &str) -> PriceFetcher {
    PriceFetcher::new(url, "test-key", Duration::from_secs(5)).unwrap()
}

#[test]
fn sends_key_headers_and_fixed_query() {
    let (url, requests) = serve_once("200 OK", LISTING_BODY);

    let listing = fetcher(&url).fetch().unwrap();
    assert_eq!(listing.data.len(), 2);
    assert_eq!(listing.data[0].symbol, "BTC");

    let request = requests.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(request.starts_with(&format!(
        "get {}?start=1&limit=5000&convert=usd http/1.1",
        LISTING_PATH
    )));
    assert!(request.contains("x-cmc_pro_api_key: test-key"));
    assert!(request.contains("accepts: application/json"));
}

#[test]
fn error_status_carries_api_message() {
    let (url, _requests) = serve_once(
        "401 Unauthorized",
        r#"{"status": {"error_code": 1001, "error_message": "This API Key is invalid."}}"#,
    );

    match fetcher(&url).fetch() {
        Err(TickerError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "This API Key is invalid.");
        }
        other => panic!("Expected Api error, got {:?}", other.map(|l| l.data.len())),
    }
}

#[test]
fn malformed_body_is_a_decode_error() {
    let (url, _requests) = serve_once("200 OK", r#"{"data": "not a list"}"#);

    let err = fetcher(&url).fetch().unwrap_err();
    assert!(matches!(err, TickerError::Decode(_)));
    assert!(err.is_fetch_error());
}

#[test]
fn refused_connection_is_a_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}{}", listener.local_addr().unwrap(), LISTING_PATH);
    drop(listener);

    let err = fetcher(&url).fetch().unwrap_err();
    assert!(matches!(err, TickerError::Connect(_)), "got {:?}", err);
    assert!(err.is_fetch_error());
}

#[test]
fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}{}", listener.local_addr().unwrap(), LISTING_PATH);
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _ = read_request(&mut stream);
            thread::sleep(Duration::from_secs(3));
        }
    });

    let mut fetcher = PriceFetcher::new(&url, "test-key", Duration::from_millis(300)).unwrap();
    let err = fetcher.fetch().unwrap_err();
    assert!(matches!(err, TickerError::Timeout(_)), "got {:?}", err);
}

#[test]
fn redirect_loop_is_a_redirect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{}{}", addr, LISTING_PATH);
    let location = format!("Location: {}\r\n", url);
    thread::spawn(move || {
        for stream in listener.incoming().take(20) {
            if let Ok(mut stream) = stream {
                let _ = read_request(&mut stream);
                respond(&mut stream, "302 Found", &location, "");
            }
        }
    });

    let err = fetcher(&url).fetch().unwrap_err();
    assert!(matches!(err, TickerError::Redirect(_)), "got {:?}", err);
}

#[test]
fn poller_writes_frame_from_live_response() {
    let (url, _requests) = serve_once("200 OK", LISTING_BODY);
    let sink = SerialForwarder::new(Vec::new()).with_settle(Duration::ZERO);
    let mut poller = Poller::new(
        fetcher(&url),
        sink,
        PriceSelection::Leading(2),
        Backoff::new(Duration::from_secs(5), Duration::from_secs(60)),
    );

    let frame = poller.run_once().unwrap();
    assert_eq!(frame.as_bytes(), b"55000.0,2999.99,\n");
    assert_eq!(poller.sink().frames_sent(), 1);
}

#[test]
fn poller_skips_write_when_api_is_down() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}{}", listener.local_addr().unwrap(), LISTING_PATH);
    drop(listener);

    let sink = SerialForwarder::new(Vec::new()).with_settle(Duration::ZERO);
    let mut poller = Poller::new(
        fetcher(&url),
        sink,
        PriceSelection::Leading(2),
        Backoff::new(Duration::from_secs(5), Duration::from_secs(60)),
    );

    assert_eq!(poller.poll().unwrap(), None);
    assert_eq!(poller.failures(), 1);
    assert_eq!(poller.sink().frames_sent(), 0);
}
