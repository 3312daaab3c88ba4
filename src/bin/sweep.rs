use dotf::{AberrationKind, Builder, Dotf, FromBuilder, WavefrontStats};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};

const AMPLITUDES: [f64; 4] = [0.05, 0.1, 0.24, 0.5];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let sampling = std::env::args()
        .nth(1)
        .map(|n| n.parse::<usize>())
        .transpose()?
        .unwrap_or(256);

    let cases: Vec<_> = AberrationKind::ALL
        .into_iter()
        .flat_map(|kind| AMPLITUDES.into_iter().map(move |a| (kind, a)))
        .collect();
    let pb = ProgressBar::new(cases.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{eta_precise}] {bar:50.cyan/blue} {pos:>7}/{len:7}")?,
    );
    pb.set_message(format!("dOTF sweep ({sampling}x{sampling})"));

    let mut results: Vec<(AberrationKind, f64, WavefrontStats)> = vec![];
    for (kind, amplitude) in cases.into_iter().progress_with(pb) {
        let dotf = Dotf::builder()
            .sampling(sampling)
            .aberration(kind, 0.1)
            .poke(5. * sampling as f64 / 1024., amplitude)
            .build()?;
        results.push((kind, amplitude, dotf.run()?.stats));
    }

    println!(
        "{:>12} {:>9} {:>10} {:>10} {:>10}",
        "aberration", "poke", "input", "output", "residual"
    );
    for (kind, amplitude, stats) in results {
        println!(
            "{:>12} {:>9.2} {:>10.3} {:>10.3} {:>10.3}",
            kind.to_string(),
            amplitude,
            stats.input,
            stats.output,
            stats.residual
        );
    }
    Ok(())
}
