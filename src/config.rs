/*!
Structs to hold configuration data and global variables.

Everything in the config file is optional:

```toml
host = "127.0.0.1"
port = 5000
# "record" (default): records are duplicates only if every field matches.
# "id": records are duplicates if their ID fields match.
identity = "record"
seed_file = "seed.json"
static_dir = "client/dist"
```
*/
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::store::{seed::Seeds, Identity, Store};

#[derive(Deserialize)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    identity: Option<String>,
    seed_file: Option<PathBuf>,
    static_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Cfg {
    pub addr: SocketAddr,
    pub identity: Identity,
    pub seed_file: Option<PathBuf>,
    /// Directory of front-end files served for non-API paths.
    pub static_dir: Option<PathBuf>,
}

impl std::default::Default for Cfg {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 5000),
            identity: Identity::Record,
            seed_file: None,
            static_dir: None,
        }
    }
}

impl Cfg {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        let cf: ConfigFile = toml::from_str(text)
            .map_err(|e| format!("Unable to deserialize config file: {}", &e))?;

        let mut c = Self::default();

        if let Some(s) = cf.host {
            c.addr.set_ip(
                s.parse().map_err(|e| format!(
                    "Error parsing {:?} as IP address: {}",
                    &s, &e
                ))?
            );
        }
        if let Some(n) = cf.port {
            c.addr.set_port(n);
        }
        if let Some(s) = cf.identity {
            c.identity = s.parse()?;
        }
        if let Some(p) = cf.seed_file {
            c.seed_file = Some(p);
        }
        if let Some(p) = cf.static_dir {
            c.static_dir = Some(p);
        }

        Ok(c)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let file_contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file: {}", &e))?;
        Self::from_toml(&file_contents)
    }
}

/**
This guy hauls around the state shared by every request handler, and is
passed to them in an `axum::Extension`.
*/
pub struct Glob {
    pub store: Store,
    pub static_dir: Option<PathBuf>,
}

impl Glob {
    /// State around an existing `Store`, for tests and embedding.
    pub fn new(store: Store) -> Self {
        Self { store, static_dir: None }
    }
}

/// Build the global state described by `cfg`, seeding the store.
pub fn load_configuration(cfg: Cfg) -> Result<Glob, String> {
    log::trace!("load_configuration( {:?} ) called.", &cfg);

    let seeds = match &cfg.seed_file {
        Some(path) => {
            let seeds = Seeds::from_file(path)?;
            log::info!("Seed data read from {}.", path.display());
            seeds
        },
        None => Seeds::builtin(),
    };

    let store = Store::with_seeds(cfg.identity, seeds);
    log::info!("Record store ready; identity policy {:?}.", &store.identity());

    Ok(Glob {
        store,
        static_dir: cfg.static_dir,
    })
}
