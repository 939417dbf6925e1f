//! End-to-end tests for the provider host serve loop
//!
//! Drives the host over an in-memory pipe the way the engine would over
//! stdio: one JSON request frame per line, one response frame back.

use anyhow::Result;
use serde_json::{json, Value};
use static_page_provider::host::Host;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, ReadHalf, WriteHalf};

type Client = (
    WriteHalf<tokio::io::DuplexStream>,
    Lines<BufReader<ReadHalf<tokio::io::DuplexStream>>>,
);

/// Start a host on an in-memory pipe, returning the client end
fn start_host() -> (Client, tokio::task::JoinHandle<Result<()>>) {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server);
    let handle =
        tokio::spawn(Host::new().serve(BufReader::new(server_read), server_write));

    let (client_read, client_write) = tokio::io::split(client);
    let lines = BufReader::new(client_read).lines();
    ((client_write, lines), handle)
}

/// Send one request frame and read the response frame
async fn roundtrip(client: &mut Client, request: Value) -> Result<Value> {
    let mut frame = serde_json::to_string(&request)?;
    frame.push('\n');
    client.0.write_all(frame.as_bytes()).await?;
    client.0.flush().await?;

    let line = client.1.next_line().await?.expect("host closed early");
    Ok(serde_json::from_str(&line)?)
}

#[tokio::test]
async fn test_static_page_end_to_end() -> Result<()> {
    let (mut client, handle) = start_host();

    // Schema advertises the component
    let schema = roundtrip(&mut client, json!({ "method": "get-schema" })).await?;
    assert_eq!(
        schema["ok"]["components"][0]["typeToken"],
        "static-page-component:index:StaticPage"
    );

    // Construct: five declarations, endpoint output declared
    let constructed = roundtrip(
        &mut client,
        json!({
            "method": "construct",
            "type": "static-page-component:index:StaticPage",
            "name": "site",
            "inputs": { "indexContent": "<html>hi</html>" },
        }),
    )
    .await?;

    let construction = constructed["ok"]["construction"].as_str().unwrap().to_string();
    let declarations = constructed["ok"]["declarations"].as_array().unwrap();
    assert_eq!(declarations.len(), 5);
    assert_eq!(declarations[0]["name"], "site-bucket");
    assert_eq!(
        declarations[2]["properties"]["content"],
        "<html>hi</html>"
    );
    assert_eq!(declarations[4]["dependsOn"], json!(["site-public-access-block"]));
    assert_eq!(constructed["ok"]["outputs"], json!(["endpoint"]));

    // Engine reports the generated bucket name; the policy derives from it
    let resolved = roundtrip(
        &mut client,
        json!({
            "method": "resolve",
            "construction": construction,
            "resource": "site-bucket",
            "attribute": "bucket",
            "value": "site-bucket-58b40a7",
        }),
    )
    .await?;
    assert_eq!(resolved["ok"]["resolved"], true);
    assert_eq!(resolved["ok"]["failure"], Value::Null);

    // Engine reports the website endpoint; the component output follows
    roundtrip(
        &mut client,
        json!({
            "method": "resolve",
            "construction": construction,
            "resource": "site-website",
            "attribute": "websiteEndpoint",
            "value": "site-bucket-58b40a7.s3-website-us-east-2.amazonaws.com",
        }),
    )
    .await?;

    let outputs = roundtrip(
        &mut client,
        json!({ "method": "outputs", "construction": construction }),
    )
    .await?;
    let endpoint = outputs["ok"]["outputs"]["endpoint"].as_str().unwrap();
    assert!(!endpoint.is_empty());
    assert_eq!(endpoint, "site-bucket-58b40a7.s3-website-us-east-2.amazonaws.com");

    // Closing the request stream shuts the host down cleanly
    drop(client);
    handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_malformed_frame_gets_error_response() -> Result<()> {
    let (mut client, handle) = start_host();

    client.0.write_all(b"this is not json\n").await?;
    client.0.flush().await?;
    let line = client.1.next_line().await?.expect("host closed early");
    let response: Value = serde_json::from_str(&line)?;
    assert!(response["error"]
        .as_str()
        .unwrap()
        .contains("malformed request"));

    drop(client);
    handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_engine_reported_failure_fails_outputs() -> Result<()> {
    let (mut client, handle) = start_host();

    let constructed = roundtrip(
        &mut client,
        json!({
            "method": "construct",
            "type": "static-page-component:index:StaticPage",
            "name": "site",
            "inputs": { "indexContent": "<html>hi</html>" },
        }),
    )
    .await?;
    let construction = constructed["ok"]["construction"].as_str().unwrap().to_string();

    roundtrip(
        &mut client,
        json!({
            "method": "fail",
            "construction": construction,
            "resource": "site-bucket",
            "attribute": "bucket",
            "message": "BucketAlreadyExists",
        }),
    )
    .await?;

    let outputs = roundtrip(
        &mut client,
        json!({ "method": "outputs", "construction": construction }),
    )
    .await?;
    assert!(outputs["error"]
        .as_str()
        .unwrap()
        .contains("BucketAlreadyExists"));

    drop(client);
    handle.await??;
    Ok(())
}
