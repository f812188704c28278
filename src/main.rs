mod catalog;
mod config;
mod control;
mod error;
mod events;
mod mpris;
mod playback;
mod queue;
mod remote;
mod runtime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Everything is let through until settings narrow it down.
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Trace);
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    runtime::run()
}
