//! Background tasks for telemetry polling and command dispatch.
//!
//! Both tasks run on the Embassy executor thread and talk to the UI through
//! the bounded queues defined in `main`. They are deliberately independent: a
//! slow telemetry response never delays a drive command, and the two requests
//! may be in flight concurrently.

use embassy_time::{Duration, Ticker};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::ui::{UICommand, UIRefreshState};
use crate::{UICommandQueueReceiver, UIRefreshQueueSender};

use super::client::RoverClient;
use super::direction::Direction;

/// Fixed telemetry polling period. Not configurable at runtime.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Raised when the window closes so no poll timer outlives the view.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request termination of all background tasks.
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

/// Whether termination has been requested.
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Telemetry poller: one read per tick, snapshot published wholesale.
///
/// A failed poll (network, parse, or validation) emits exactly one diagnostic
/// and publishes nothing, so the UI keeps displaying the previous snapshot.
/// The next tick proceeds normally; there is no retry or backoff.
#[embassy_executor::task]
pub async fn poll_task(client: RoverClient, ui_refresh_tx: UIRefreshQueueSender) {
    log::info!("Telemetry poller started, period {} ms", POLL_INTERVAL.as_millis());

    let mut ticker = Ticker::every(POLL_INTERVAL);
    loop {
        if shutdown_requested() {
            break;
        }

        match client.fetch_telemetry() {
            Ok(snapshot) => {
                // try_send: if the UI is gone or backed up, the update is
                // dropped rather than blocking the poll loop.
                let _ = ui_refresh_tx.try_send(UIRefreshState::TelemetryUpdated(snapshot));
            }
            Err(e) => {
                log::warn!("Telemetry poll failed: {}", e);
            }
        }

        ticker.next().await;
    }

    log::info!("Telemetry poller stopped");
}

/// Command dispatcher: consumes UI commands in issue order.
///
/// Each input event independently produces at most one dispatch; no current
/// direction is tracked across events and duplicate sends are harmless.
/// Pointer vectors with a missing component are dropped silently.
#[embassy_executor::task]
pub async fn command_task(client: RoverClient, ui_command_rx: UICommandQueueReceiver) {
    log::info!("Command dispatcher started");

    loop {
        match ui_command_rx.receive().await {
            UICommand::Drive(direction) => dispatch(&client, direction),
            UICommand::DriveVector { x, y } => {
                if let Some(direction) = Direction::from_pointer(x, y) {
                    dispatch(&client, direction);
                }
            }
            UICommand::SetSpeed(speed) => {
                if let Err(e) = client.set_speed(speed) {
                    log::warn!("Failed to send motor speed {}: {}", speed, e);
                }
            }
            UICommand::Shutdown => break,
        }
    }

    log::info!("Command dispatcher stopped");
}

fn dispatch(client: &RoverClient, direction: Direction) {
    if let Err(e) = client.send_direction(direction) {
        log::warn!("Failed to send direction {}: {}", direction, e);
    }
}
