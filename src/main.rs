use std::path::PathBuf;

use diorama::{Config, flow};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Config::load_from_file(&path)?,
        None => Config::default(),
    };
    flow::run(config)
}
