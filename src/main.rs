use clap::Parser;

use mazetree::app::{App, AppError, Cli};

fn main() -> Result<(), AppError> {
    let app = App::new(Cli::parse());
    let _guard = app.init_logging()?;
    app.run(&mut std::io::stdout().lock())
}
