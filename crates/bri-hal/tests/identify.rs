//! Integration tests for BriReader against a mock BRI device.
//!
//! The mock device accepts one TCP connection, emits the connect banner,
//! then answers each received command from a scripted queue of responses,
//! recording every command line it saw so tests can assert the exact wire
//! traffic.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_util::codec::Framed;

use bri_hal::{
    BriReader, HalError, HardwareAbstraction, ReadPointConfig, ReaderConfig, TransponderModels,
};
use bri_protocol::BriCodec;

/// One scripted exchange: the response lines for the next command received.
/// `None` means "close the connection instead of answering".
type Script = Vec<Option<Vec<&'static str>>>;

struct MockDevice {
    commands: Arc<StdMutex<Vec<String>>>,
}

impl MockDevice {
    /// Spawn a device serving `script` and return it with the port to dial.
    async fn spawn(script: Script) -> (Self, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let commands = Arc::new(StdMutex::new(Vec::new()));
        let seen = Arc::clone(&commands);

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut conn = Framed::new(stream, BriCodec::new());

            conn.send("BRI/0001 IF5 READY".to_string()).await.unwrap();
            conn.send("OK>".to_string()).await.unwrap();

            for response in script {
                let Some(Ok(cmd)) = conn.next().await else {
                    return;
                };
                seen.lock().unwrap().push(cmd);

                match response {
                    Some(lines) => {
                        for line in lines {
                            conn.send(line.to_string()).await.unwrap();
                        }
                        conn.send("OK>".to_string()).await.unwrap();
                    }
                    None => return,
                }
            }
        });

        (Self { commands }, port)
    }

    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

fn reader_config(port: u16) -> ReaderConfig {
    ReaderConfig {
        host: "127.0.0.1".to_string(),
        port,
        timeout_ms: 500,
        read_points: vec![
            ReadPointConfig {
                name: "R1".to_string(),
                antennas: vec![1, 2],
            },
            ReadPointConfig {
                name: "R2".to_string(),
                antennas: vec![3],
            },
        ],
    }
}

async fn connected_reader(port: u16) -> BriReader {
    let reader = BriReader::new(
        "IntermecIF5",
        &reader_config(port),
        TransponderModels::with_builtin(),
    )
    .unwrap();
    reader.initialize().await.unwrap();
    reader
}

#[tokio::test]
async fn test_identify_polls_each_read_point_with_its_antennas() {
    let (device, port) = MockDevice::spawn(vec![
        Some(vec!["Hf00d", "Hbeef"]),
        Some(vec!["Hcafe"]),
    ])
    .await;

    let reader = connected_reader(port).await;

    let observations = reader
        .identify(&["R1".to_string(), "R2".to_string()])
        .await
        .unwrap();

    assert_eq!(
        device.commands(),
        vec!["ATTRIB ANTS=1,2;R", "ATTRIB ANTS=3;R"]
    );

    assert_eq!(observations.len(), 2);

    let r1 = &observations[0];
    assert_eq!(r1.hal_name, "IntermecIF5");
    assert_eq!(r1.read_point, "R1");
    assert_eq!(r1.tag_ids, vec!["f00d", "beef"]);

    // Gen 2 tags all carry memory descriptors, so the parallel list exists.
    let descriptors = r1.tag_descriptors.as_ref().unwrap();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0].memory.epc().size, 96);

    let r2 = &observations[1];
    assert_eq!(r2.tag_ids, vec!["cafe"]);
}

#[tokio::test]
async fn test_snapshot_is_cycle_union_and_replaced_per_cycle() {
    let (_device, port) = MockDevice::spawn(vec![
        // First cycle.
        Some(vec!["Hf00d", "Hbeef"]),
        Some(vec!["Hcafe"]),
        // Second cycle: only one tag re-observed, R2 has no tag data.
        Some(vec!["Hbeef"]),
        Some(vec!["NOTAG"]),
    ])
    .await;

    let reader = connected_reader(port).await;
    let names = vec!["R1".to_string(), "R2".to_string()];

    reader.identify(&names).await.unwrap();

    let mut ids: Vec<_> = reader
        .current_inventory()
        .await
        .into_iter()
        .map(|item| item.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["beef", "cafe", "f00d"]);

    let observations = reader.identify(&names).await.unwrap();

    // A markerless response is "no tag data": an empty observation.
    assert!(observations[1].is_empty());

    // Snapshot holds exactly this cycle's tags; f00d and cafe are gone.
    let inventory = reader.current_inventory().await;
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].id, "beef");
    assert_eq!(inventory[0].read_point, "R1");
}

#[tokio::test]
async fn test_same_tag_across_read_points_last_write_wins() {
    let (_device, port) = MockDevice::spawn(vec![
        Some(vec!["Hf00d"]),
        Some(vec!["Hf00d"]),
    ])
    .await;

    let reader = connected_reader(port).await;

    reader
        .identify(&["R1".to_string(), "R2".to_string()])
        .await
        .unwrap();

    let inventory = reader.current_inventory().await;
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].read_point, "R2");
}

#[tokio::test]
async fn test_poll_failure_fails_whole_identify_keeping_prior_read_points() {
    let (_device, port) = MockDevice::spawn(vec![
        Some(vec!["Hf00d"]),
        // Device dies instead of answering R2.
        None,
    ])
    .await;

    let reader = connected_reader(port).await;

    let result = reader
        .identify(&["R1".to_string(), "R2".to_string()])
        .await;

    assert!(matches!(result, Err(HalError::Hardware { .. })));

    // R1 was recorded before the failure and stays recorded.
    let inventory = reader.current_inventory().await;
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].id, "f00d");

    // The failed exchange dropped the connection.
    assert!(!reader.is_connected());
}

#[tokio::test]
async fn test_empty_string_tag_edge_case_flows_through() {
    // A bare-marker line is a one-element list holding the empty string;
    // the orchestrator passes it through rather than coalescing it.
    let (_device, port) = MockDevice::spawn(vec![Some(vec!["H"])]).await;

    let reader = connected_reader(port).await;

    let observations = reader.identify(&["R1".to_string()]).await.unwrap();

    assert_eq!(observations[0].tag_ids, vec![""]);
    let inventory = reader.current_inventory().await;
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].id, "");
}

#[tokio::test]
async fn test_concurrent_identify_calls_serialize() {
    let (_device, port) = MockDevice::spawn(vec![
        Some(vec!["Hf00d"]),
        Some(vec!["Hbeef"]),
    ])
    .await;

    let reader = Arc::new(connected_reader(port).await);

    // Both calls poll only R1; the snapshot mutex serializes them, so each
    // cycle sees exactly its own tag.
    let a = {
        let reader = Arc::clone(&reader);
        tokio::spawn(async move { reader.identify(&["R1".to_string()]).await.unwrap() })
    };
    let b = {
        let reader = Arc::clone(&reader);
        tokio::spawn(async move { reader.identify(&["R1".to_string()]).await.unwrap() })
    };

    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    let mut seen: Vec<_> = a[0].tag_ids.iter().chain(b[0].tag_ids.iter()).collect();
    seen.sort();
    assert_eq!(seen, vec!["beef", "f00d"]);

    // The surviving snapshot belongs to whichever cycle ran second: one tag.
    assert_eq!(reader.current_inventory().await.len(), 1);
}

#[tokio::test]
async fn test_reset_reconnects() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        // Serve two consecutive connections, banner each, answer one
        // command on the second.
        for round in 0..2 {
            let (stream, _) = listener.accept().await.unwrap();
            let mut conn = Framed::new(stream, BriCodec::new());
            conn.send("BRI/0001 IF5 READY".to_string()).await.unwrap();
            conn.send("OK>".to_string()).await.unwrap();

            if round == 1 {
                let cmd = conn.next().await.unwrap().unwrap();
                assert_eq!(cmd, "ATTRIB ANTS=1,2;R");
                conn.send("Hcafe".to_string()).await.unwrap();
                conn.send("OK>".to_string()).await.unwrap();
                // Hold the connection until the client is done.
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    });

    let reader = connected_reader(port).await;

    reader.reset().await.unwrap();
    assert!(reader.is_connected());

    let observations = reader.identify(&["R1".to_string()]).await.unwrap();
    assert_eq!(observations[0].tag_ids, vec!["cafe"]);
}

#[tokio::test]
async fn test_reset_failure_leaves_reader_disconnected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        // Accept the first connection only, then stop listening.
        let (stream, _) = listener.accept().await.unwrap();
        let mut conn = Framed::new(stream, BriCodec::new());
        conn.send("OK>".to_string()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        drop(conn);
        drop(listener);
    });

    let reader = connected_reader(port).await;
    assert!(reader.is_connected());

    // Wait for the device to go away, then reset against the dead port.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let result = reader.reset().await;

    assert!(matches!(result, Err(HalError::Hardware { .. })));
    assert!(!reader.is_connected());
}
