use std::{
    io::{Stdout, stdout},
    path::PathBuf,
    process::ExitCode,
};

use crossterm::{
    execute,
    style::{self, Attribute, Color, Stylize},
};
use mazegen::{
    app::{App, AppError, Config, Settings},
    logging,
};

fn print_settings(stdout: &mut Stdout, settings: &Settings) -> std::io::Result<()> {
    let seed = match settings.seed {
        0 => "random".to_string(),
        seed => seed.to_string(),
    };
    execute!(
        stdout,
        style::PrintStyledContent(
            "Generating "
                .with(Color::Cyan)
                .attribute(Attribute::Bold)
        ),
        style::Print(format!(
            "{}x{} maze with {} (seed: {seed}, animate: {}, delay: {} ms)\r\n",
            settings.width,
            settings.height,
            settings.kind,
            settings.animate,
            settings.animation_delay.as_millis()
        ))
    )
}

fn run() -> Result<(), AppError> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let path = args.next().map(PathBuf::from);

    let config = Config::load_or_default(path.as_deref())?;
    let mut stdout = stdout();
    print_settings(&mut stdout, &config.normalized())?;

    let mut app = App::default();
    let report = app.run(&config)?;
    report.print(&mut stdout)?;
    Ok(())
}

fn main() -> ExitCode {
    let _guard = logging::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
