//! Dancore Editor
//!
//! Opens the editor window and runs until it is closed.

#![forbid(unsafe_code)]

use dancore_engine::foundation::logging;
use dancore_engine::prelude::*;

fn main() {
    let config = match EditorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            logging::init();
            log::error!("Failed to load configuration: {}", e);
            eprintln!("Fatal error: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_with_level(&config.engine.log_level);

    if let Err(e) = EditorApp::new(&config).and_then(|mut app| app.run()) {
        log::error!("Editor terminated: {}", e);
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }
}
