use mdpage::{output, pipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("mdpage {}", env!("CARGO_PKG_VERSION"));

    let root = std::env::current_dir()?;
    let summary = pipeline::build(&root)?;
    output::print_build_output(&summary);

    Ok(())
}
