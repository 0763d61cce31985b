use log::error;

use holofield::api::{self, ApiConfig};
use holofield::config::BackdropConfig;
use holofield::error::BackdropError;

fn main() -> Result<(), BackdropError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The API serves on its own thread; the window loop owns this one.
    let api_config = ApiConfig::from_env();
    std::thread::spawn(move || {
        if let Err(err) = api::serve(api_config) {
            error!("Content API stopped: {err}");
        }
    });

    holofield::run(BackdropConfig::default())
}
