use dotf::{Builder, Dotf, DotfBuilder, FromBuilder};
use std::{env, path::Path, time::Instant};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let builder = match env::args().nth(1) {
        Some(path) => DotfBuilder::load(path)?,
        None => Dotf::builder(),
    };
    let dotf = builder.build()?;

    let now = Instant::now();
    let measurement = dotf.run()?;
    log::info!("dOTF computed in {}ms", now.elapsed().as_millis());
    println!("{}", measurement.stats);

    let maps = dotf.maps(&measurement);
    let dir = env::var("DOTF_DATA_PATH").unwrap_or_else(|_| String::from("."));
    maps.dump(Path::new(&dir).join("dotf-maps.pkl"))?;
    #[cfg(feature = "plot")]
    maps.heatmaps(&dir);

    Ok(())
}
