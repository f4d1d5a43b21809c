/*!
Here we go!

```text
winoom [CONFIG_FILE]
```

With no argument, `winoom.toml` in the working directory is used if it
exists; otherwise everything runs on defaults.
*/
use std::path::Path;
use std::sync::Arc;

use simplelog::{ColorChoice, TerminalMode, TermLogger};

use winoom::config::{self, Cfg};
use winoom::inter;

const DEFAULT_CONFIG_FILE: &str = "winoom.toml";

fn read_configuration() -> Result<Cfg, String> {
    match std::env::args().nth(1) {
        Some(path) => Cfg::from_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Cfg::from_file(DEFAULT_CONFIG_FILE),
        None => {
            log::info!("No configuration file; using defaults.");
            Ok(Cfg::default())
        },
    }
}

#[tokio::main]
async fn main() {
    let log_cfg = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("winoom")
        .build();
    if let Err(e) = TermLogger::init(
        winoom::log_level_from_env(),
        log_cfg,
        TerminalMode::Stdout,
        ColorChoice::Auto
    ) {
        eprintln!("Unable to start logging: {}", &e);
        std::process::exit(1);
    }
    log::info!("Logging started.");

    let cfg = match read_configuration() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("{}", &e);
            std::process::exit(1);
        },
    };
    log::info!("Configuration:\n{:#?}", &cfg);
    let addr = cfg.addr;

    let glob = match config::load_configuration(cfg) {
        Ok(glob) => Arc::new(glob),
        Err(e) => {
            log::error!("Unable to initialize: {}", &e);
            std::process::exit(1);
        },
    };

    let app = inter::router(glob);

    let server = match axum::Server::try_bind(&addr) {
        Ok(server) => server,
        Err(e) => {
            log::error!("Unable to bind {}: {}", &addr, &e);
            std::process::exit(1);
        },
    };
    log::info!("Listening on {}", &addr);

    if let Err(e) = server.serve(app.into_make_service()).await {
        log::error!("Server error: {}", &e);
        std::process::exit(1);
    }
}
