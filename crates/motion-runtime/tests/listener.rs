//! Notification bus driving ingestion on a Tokio task.

use std::sync::Arc;
use std::time::Duration;

use motion_registry::{ManualClock, SimEngine};
use motion_runtime::{EngineNotification, MotionSession, NotificationBus};
use motion_types::{NativeXyz, RawDeviceFields};

fn at(x: f64) -> RawDeviceFields {
    RawDeviceFields {
        local_position: NativeXyz::new(x, 0.0, 0.0),
        ..RawDeviceFields::default()
    }
}

async fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test]
async fn device_updates_are_ingested_until_bus_closes() -> Result<(), Box<dyn std::error::Error>> {
    let engine = Arc::new(SimEngine::builder().with_device("dev1", at(1.0)).build());
    let session = MotionSession::with_clock(engine.clone(), Arc::new(ManualClock::new()));
    let bus = NotificationBus::new(16);
    let handle = session.listen(&bus);

    bus.device_updated("dev1")?;
    assert!(wait_for(|| session.query().device_count() == 1).await);

    engine.set_snapshot("dev1", at(7.0));
    bus.device_updated("dev1")?;
    assert!(
        wait_for(|| {
            session.query().local_position(Some("dev1")).map(|p| p.z) == Some(7.0)
        })
        .await
    );

    drop(bus);
    tokio::time::timeout(Duration::from_secs(1), handle).await??;
    Ok(())
}

#[tokio::test]
async fn authentication_failure_does_not_stop_the_listener() -> Result<(), Box<dyn std::error::Error>> {
    let engine = Arc::new(SimEngine::builder().with_device("dev1", at(1.0)).build());
    let session = MotionSession::with_clock(engine.clone(), Arc::new(ManualClock::new()));
    let bus = NotificationBus::default();
    let handle = session.listen(&bus);

    bus.publish(EngineNotification::AuthenticationFailed(
        "license key rejected".to_string(),
    ))?;
    bus.device_updated("dev1")?;
    assert!(wait_for(|| session.query().device_count() == 1).await);

    drop(bus);
    tokio::time::timeout(Duration::from_secs(1), handle).await??;
    Ok(())
}

#[tokio::test]
async fn lagging_listener_refreshes_known_devices() -> Result<(), Box<dyn std::error::Error>> {
    let engine = Arc::new(SimEngine::builder().with_device("dev1", at(1.0)).build());
    let session = MotionSession::with_clock(engine.clone(), Arc::new(ManualClock::new()));
    session.on_device_updated("dev1");

    let bus = NotificationBus::new(2);
    let handle = session.listen(&bus);

    // The listener cannot run until this task yields, so the buffer overruns
    // and the dev1 notification below is lost.
    engine.set_snapshot("dev1", at(9.0));
    bus.device_updated("dev1")?;
    for i in 0..16 {
        bus.device_updated(format!("ghost{i}"))?;
    }

    drop(bus);
    tokio::time::timeout(Duration::from_secs(1), handle).await??;

    assert_eq!(
        session.query().local_position(Some("dev1")).map(|p| p.z),
        Some(9.0)
    );
    assert_eq!(session.query().device_count(), 1);
    Ok(())
}
