use std::env;
use std::sync::mpsc;

use log::info;

use crate::catalog::CatalogClient;
use crate::control::ControlCmd;
use crate::queue::QueueManager;

mod commands;
mod event_loop;
mod mpris_sync;
mod report;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = settings::load_settings();
    log::set_max_level(settings.logging.level.to_filter());

    // `cadenza [BASE_URL]` overrides the configured backend.
    if let Some(base_url) = env::args().nth(1) {
        settings.server.base_url = base_url;
    }

    let client = CatalogClient::new(&settings.server);
    let library = startup::fetch_library(&client);
    let playback = startup::open_playback(&client, &settings.audio);

    let mut queue = QueueManager::new(playback);
    queue.set_volume(settings.audio.initial_volume);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();

    let remote = settings
        .remote
        .enabled
        .then(|| crate::remote::spawn_listener(&settings.remote, control_tx.clone()));
    let mpris = settings
        .remote
        .mpris
        .then(|| crate::mpris::spawn_mpris(control_tx.clone()));

    commands::spawn_stdin_reader(control_tx);
    println!("type `help` for commands");

    let mut state = event_loop::EventLoopState::new(&mut queue, &settings);
    let result = event_loop::run(
        &settings,
        &client,
        &library,
        &mut queue,
        remote.as_ref(),
        mpris.as_ref(),
        &control_rx,
        &mut state,
    );

    state.detach(&mut queue);
    info!("shutting down");
    result
}
