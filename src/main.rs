/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io;

use anyhow::Result;
use chessmap::{Cli, Game, GameConfig, Position, Session};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log)?)
        .with_writer(io::stderr)
        .init();

    let config = GameConfig {
        free_play: cli.free_play,
        ..Default::default()
    };
    let position = if cli.empty {
        Position::new()
    } else {
        Position::standard()
    };

    let mut session = Session::new(Game::from_position(position, config));
    if let Err(e) = session.run(io::stdin().lock(), io::stdout().lock()) {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
    }

    Ok(())
}
