//! Integration tests for registration and messaging.

mod common;

use common::TestServer;
use std::time::Duration;

const QUIET: Duration = Duration::from_millis(200);

#[tokio::test]
async fn test_nick_conflict_and_join_notice() {
    let server = TestServer::spawn(17101).await.expect("spawn server");
    let mut a = server.connect().await.expect("connect a");
    let mut b = server.connect().await.expect("connect b");

    assert_eq!(a.request("/NICK alice").await.unwrap(), "Registered nickname alice");
    assert_eq!(b.request("/NICK alice").await.unwrap(), "Name is taken!");
    assert_eq!(b.request("/NICK bob").await.unwrap(), "Registered nickname bob");

    assert_eq!(a.recv().await.unwrap(), "server: bob joined");
    b.expect_silence(QUIET).await;
}

#[tokio::test]
async fn test_messaging_before_registration() {
    let server = TestServer::spawn(17102).await.expect("spawn server");
    let mut a = server.connect().await.expect("connect a");
    let mut b = server.connect_as("bob").await.expect("connect b");

    assert_eq!(a.request("/BC hello").await.unwrap(), "Register first!");
    assert_eq!(a.request("/MSG bob hi").await.unwrap(), "Register first!");
    assert_eq!(a.request("/LIST").await.unwrap(), "Register first!");

    b.expect_silence(QUIET).await;
    assert_eq!(b.request("/LIST").await.unwrap(), "bob");
}

#[tokio::test]
async fn test_broadcast_reaches_every_other_user_once() {
    let server = TestServer::spawn(17103).await.expect("spawn server");
    let mut a = server.connect_as("alice").await.expect("connect a");
    let mut b = server.connect_as("bob").await.expect("connect b");
    let mut c = server.connect_as("carol").await.expect("connect c");
    let mut lurker = server.connect().await.expect("connect lurker");

    // Join notices.
    assert_eq!(a.recv().await.unwrap(), "server: bob joined");
    assert_eq!(a.recv().await.unwrap(), "server: carol joined");
    assert_eq!(b.recv().await.unwrap(), "server: carol joined");

    assert_eq!(a.request("/BC hello  everyone").await.unwrap(), "alice: hello  everyone");
    assert_eq!(b.recv().await.unwrap(), "alice: hello  everyone");
    assert_eq!(c.recv().await.unwrap(), "alice: hello  everyone");

    a.expect_silence(QUIET).await;
    lurker.expect_silence(QUIET).await;
}

#[tokio::test]
async fn test_direct_message() {
    let server = TestServer::spawn(17104).await.expect("spawn server");
    let mut a = server.connect_as("alice").await.expect("connect a");
    let mut b = server.connect_as("bob").await.expect("connect b");
    let mut c = server.connect_as("carol").await.expect("connect c");
    assert_eq!(a.recv().await.unwrap(), "server: bob joined");
    assert_eq!(a.recv().await.unwrap(), "server: carol joined");
    assert_eq!(b.recv().await.unwrap(), "server: carol joined");

    assert_eq!(
        a.request("/MSG bob hi there").await.unwrap(),
        "alice -> bob: hi there"
    );
    assert_eq!(b.recv().await.unwrap(), "alice: hi there");
    c.expect_silence(QUIET).await;
}

#[tokio::test]
async fn test_direct_message_errors() {
    let server = TestServer::spawn(17105).await.expect("spawn server");
    let mut a = server.connect_as("alice").await.expect("connect a");
    let mut b = server.connect_as("bob").await.expect("connect b");
    assert_eq!(a.recv().await.unwrap(), "server: bob joined");

    assert_eq!(a.request("/MSG alice hi").await.unwrap(), "Cannot message yourself!");
    assert_eq!(a.request("/MSG nobody hi").await.unwrap(), "no such user");
    assert_eq!(a.request("/MSG bob").await.unwrap(), "Invalid command: /MSG bob");

    b.expect_silence(QUIET).await;
    assert_eq!(a.request("/LIST").await.unwrap(), "alice bob");
}

#[tokio::test]
async fn test_rename_notifies_and_frees_name() {
    let server = TestServer::spawn(17106).await.expect("spawn server");
    let mut a = server.connect_as("alice").await.expect("connect a");
    let mut b = server.connect_as("bob").await.expect("connect b");
    assert_eq!(a.recv().await.unwrap(), "server: bob joined");

    assert_eq!(a.request("/NICK alice").await.unwrap(), "Name is taken!");
    assert_eq!(a.request("/NICK al").await.unwrap(), "Registered nickname al");
    assert_eq!(b.recv().await.unwrap(), "server: alice is now known as al");

    let mut c = server.connect().await.expect("connect c");
    assert_eq!(c.request("/NICK alice").await.unwrap(), "Registered nickname alice");
}

#[tokio::test]
async fn test_malformed_lines_are_echoed() {
    let server = TestServer::spawn(17107).await.expect("spawn server");
    let mut a = server.connect().await.expect("connect a");

    assert_eq!(a.request("hello").await.unwrap(), "Invalid command: hello");
    assert_eq!(a.request("/JOIN #rust").await.unwrap(), "Invalid command: /JOIN #rust");
    assert_eq!(a.request("/NICK a b").await.unwrap(), "Invalid command: /NICK a b");
    assert_eq!(a.request("/NICK server").await.unwrap(), "Name is taken!");

    // Surrounding whitespace and CRLF are stripped before parsing.
    a.send_raw(b"  /NICK alice  \r\n").await.unwrap();
    assert_eq!(a.recv().await.unwrap(), "Registered nickname alice");
}

#[tokio::test]
async fn test_concurrent_nick_race_has_one_winner() {
    const CLIENTS: usize = 12;

    let server = TestServer::spawn(17108).await.expect("spawn server");
    let mut clients = Vec::new();
    for _ in 0..CLIENTS {
        clients.push(server.connect().await.expect("connect"));
    }

    let tasks: Vec<_> = clients
        .into_iter()
        .map(|mut client| {
            tokio::spawn(async move {
                let reply = client.request("/NICK highlander").await.unwrap();
                (reply, client)
            })
        })
        .collect();

    let mut winners = 0;
    let mut survivors = Vec::new();
    for task in tasks {
        let (reply, client) = task.await.unwrap();
        match reply.as_str() {
            "Registered nickname highlander" => winners += 1,
            "Name is taken!" => {}
            other => panic!("unexpected reply {other:?}"),
        }
        survivors.push(client);
    }
    assert_eq!(winners, 1);

    let mut probe = server.connect_as("probe").await.expect("connect probe");
    assert_eq!(probe.request("/LIST").await.unwrap(), "highlander probe");
}
