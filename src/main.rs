mod app;
mod archive;
mod config;
mod error;
mod parity;
mod settings;
mod tool;
mod types;
mod ui;
mod validation;

use crate::app::App;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    App::init()?.execute().await
}
