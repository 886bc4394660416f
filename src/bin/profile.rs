use mazegen::{
    app::{App, AppError},
    generators::GeneratorKind,
    logging,
};

fn main() -> Result<(), AppError> {
    let _guard = logging::init();
    let app = App::default();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let iterations = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(1);
    let kind = args
        .next()
        .and_then(|s| s.parse::<GeneratorKind>().ok())
        .unwrap_or(GeneratorKind::Prim);

    let mean = app.profile(kind, 255, 255, iterations)?;
    println!("{kind}: mean {mean:?} over {iterations} iterations");
    Ok(())
}
