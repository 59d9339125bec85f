//! Demo: serve a changing topology over TCP
//!
//! Streams one snapshot per second as newline-delimited JSON. The S7 adapter
//! flaps between connected and faulted, and the cloud bridge loses its
//! mappings every few ticks, so both axes visibly change in the viewer.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example serve -- 127.0.0.1:9400
//! topowatch --connect 127.0.0.1:9400
//! ```

use std::env;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

use topowatch_types::{ConnectionState, Edge, MappingFacts, TopologySnapshot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:9400".to_string());

    let listener = TcpListener::bind(&addr).await?;
    println!("Serving topology snapshots on {}", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        println!("Viewer connected from {}", peer);
        tokio::spawn(async move {
            if let Err(e) = stream_snapshots(stream).await {
                println!("Viewer {} disconnected: {}", peer, e);
            }
        });
    }
}

async fn stream_snapshots(mut stream: TcpStream) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let mut tick: u64 = 0;

    loop {
        interval.tick().await;
        let mut line = serde_json::to_vec(&snapshot(tick))?;
        line.push(b'\n');
        stream.write_all(&line).await?;
        tick += 1;
    }
}

fn snapshot(tick: u64) -> TopologySnapshot {
    let s7_faulted = tick % 6 >= 4;
    let cloud_mappings = if tick % 10 >= 7 { 0 } else { 2 };

    TopologySnapshot::builder()
        .gateway("edge", |f| f.connected().started())
        .adapter("opcua-1", |f| f.connected().started().mappings(3))
        .adapter("modbus-1", |f| {
            f.connection(ConnectionState::Stateless).started().mappings(1)
        })
        .adapter("s7-1", |f| {
            if s7_faulted {
                f.connection(ConnectionState::Error)
                    .started()
                    .message("connection refused")
            } else {
                f.connected().started().mappings(1)
            }
        })
        .bridge("cloud", |f| f.connected().started().mappings(cloud_mappings))
        .group("line-1", ["opcua-1", "modbus-1"])
        .group("line-2", ["s7-1"])
        .combiner("oee", ["opcua-1", "s7-1"], MappingFacts::enabled(1))
        .edge("opcua-1", "edge")
        .edge("modbus-1", "edge")
        .edge("s7-1", "edge")
        .edge("line-1", "edge")
        .edge("line-2", "edge")
        .edge("oee", "edge")
        .edge_with(Edge::new("edge", "cloud").from_target())
        .build()
}
