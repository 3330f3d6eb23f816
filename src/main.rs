use eframe::egui;
use embassy_executor::{Executor, Spawner};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::Path;
use std::thread;

use crate::rover::{DashboardConfig, RoverClient};
use crate::ui::{AppState, UICommand, UIRefreshState};

mod rover;
mod ui;
mod video;

const UI_REFRESH_QUEUE_SIZE: usize = 100;
/// Bounded queue carrying refresh messages from the background tasks to the UI.
pub type UIRefreshQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;
/// Receiver side of the refresh queue.
pub type UIRefreshQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;
/// Sender side of the refresh queue.
pub type UIRefreshQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;

const UI_COMMAND_QUEUE_SIZE: usize = 100;
/// Bounded queue carrying commands from the UI to the dispatcher task.
pub type UICommandQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, UICommand, UI_COMMAND_QUEUE_SIZE>;
/// Receiver side of the command queue.
pub type UICommandQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, UICommand, UI_COMMAND_QUEUE_SIZE>;
/// Sender side of the command queue.
pub type UICommandQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, UICommand, UI_COMMAND_QUEUE_SIZE>;

fn embassy_init(spawner: Spawner, client: RoverClient, ui_refresh_tx: UIRefreshQueueSender, ui_command_rx: UICommandQueueReceiver) {
    let _ = spawner.spawn(rover::task::poll_task(client.clone(), ui_refresh_tx));
    let _ = spawner.spawn(rover::task::command_task(client, ui_command_rx));
}

fn main() {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("rover_control_dashboard"), LevelFilter::Debug)
        .init();

    info!("Starting up");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = match DashboardConfig::load(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    info!("Controlling rover at {}", config.control_base_url);

    let client = match RoverClient::new(config.clone()) {
        Ok(client) => client,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    let ui_refresh_channel: &'static UIRefreshQueue = Box::leak(Box::new(UIRefreshQueue::new()));
    let ui_command_channel: &'static UICommandQueue = Box::leak(Box::new(UICommandQueue::new()));

    let ui_refresh_tx = ui_refresh_channel.sender();
    let ui_refresh_rx = ui_refresh_channel.receiver();
    let ui_command_tx = ui_command_channel.sender();
    let ui_command_rx = ui_command_channel.receiver();

    // Video runs on its own OS thread; its blocking stream reads must not
    // share the executor with the poller and dispatcher.
    video::spawn_reader(config.video_feed_url(), ui_refresh_tx);

    // Spawn Embassy executor on a dedicated background thread
    let _embassy_handle = thread::Builder::new()
        .name("embassy-executor".to_string())
        .spawn(move || {
            // Leak the executor to satisfy the 'static lifetime required by run()
            let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
            executor.run(|spawner| embassy_init(spawner, client, ui_refresh_tx, ui_command_rx));
        })
        .expect("failed to spawn embassy thread");

    // Start the GUI on the main thread (required on macOS)
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default(),
        ..Default::default()
    };
    let _ = eframe::run_native(
        "Rover Control Dashboard",
        native_options,
        Box::new(move |cc| Ok(Box::new(AppState::new(ui_refresh_rx, ui_command_tx, cc.storage)))),
    );

    // Belt and braces for platforms where on_exit is skipped.
    rover::task::request_shutdown();
}
