#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use winoom::config::Glob;
use winoom::inter;
use winoom::store::{Identity, Store};

pub fn ensure_logging() {
    use simplelog::{ColorChoice, TermLogger, TerminalMode};
    let log_cfg = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("winoom")
        .build();
    if TermLogger::init(
        winoom::log_level_from_env(),
        log_cfg,
        TerminalMode::Stdout,
        ColorChoice::Auto,
    ).is_ok() {
        log::info!("Test logging started.");
    }
}

pub fn seeded_glob() -> Arc<Glob> {
    Arc::new(Glob::new(Store::seeded(Identity::Record)))
}

/// Serve a freshly seeded store on an ephemeral local port.
pub fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    let app = inter::router(seeded_glob());

    tokio::spawn(async move {
        axum::Server::from_tcp(listener).unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });

    addr
}

/// An address nothing is listening on.
pub fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}
