use clap::Parser;
use thiserror::Error;

mod app;
mod args;
mod config;
mod frame;
mod logging;

use app::{App, AppError};
use args::Args;
use config::{AppConfig, ConfigError, ConfigLoader};

/// Exit code for every startup or build failure.
const FAILURE: i32 = -1;

fn main() {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    logging::init_logging(args.verbose);

    let res = run(&args);

    if let Err(e) = &res {
        log::error!("{e}");
    }

    std::process::exit(exit_code(&res));
}

fn run(args: &Args) -> Result<i32, RunError> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_path(path)?,
        None => AppConfig::default(),
    };

    args.apply(&mut config);
    config.validate()?;

    let app = App::new(config)?;

    Ok(app.run()?)
}

fn exit_code(res: &Result<i32, RunError>) -> i32 {
    match res {
        Ok(code) => *code,
        Err(_) => FAILURE,
    }
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
}
