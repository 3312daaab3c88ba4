use std::time::Instant;

use dotf::{AberrationKind, Builder, Dotf, DotfError, FromBuilder, Poke, PokeParameters};

#[test]
fn zero_poke() {
    let dotf = Dotf::builder()
        .sampling(64)
        .obscuration(0.)
        .aberration(AberrationKind::Tilt, 0.1)
        .poke(5., 0.)
        .build()
        .unwrap();
    let now = Instant::now();
    let measurement = dotf.run().unwrap();
    println!("dOTF in {:?}", now.elapsed());
    println!("{}", measurement.stats);

    assert!(measurement.dotf.amplitude().iter().all(|a| *a == 0.));
    assert!(measurement.output_phase.iter().all(|p| *p == 0.));
    assert_eq!(measurement.residual, measurement.input_phase);
    assert_eq!(measurement.stats.output, 0.);
    assert!((measurement.stats.residual - measurement.stats.input).abs() < 1e-9);
    // 0.1 wave RMS at 1µm
    assert!((measurement.stats.input - 100.).abs() < 15.);
}

#[test]
fn symmetric_lobes() {
    let dotf = Dotf::builder()
        .sampling(128)
        .obscuration(0.)
        .aberration(AberrationKind::None, 0.)
        .poke(2., 0.24)
        .build()
        .unwrap();
    let measurement = dotf.run().unwrap();
    let amplitude = measurement.dotf.amplitude();
    let max = amplitude.max();
    let c = dotf.grid().center();
    let o = dotf.offset();
    assert_eq!(o, 12);

    let (left, right) = (amplitude[(c, c - o)], amplitude[(c, c + o)]);
    println!("lobes: {left:.6e} {right:.6e}, max: {max:.6e}");
    assert!((left - right).abs() < 1e-9 * max);
    assert!(left > 1e-3);
    assert!(amplitude[(c + 2 * o, c)] < 1e-6);
    assert!(amplitude[(c, c + 3 * o)] < 1e-6);
}

#[test]
fn small_poke_recovery() {
    for obscuration in [0., 0.2] {
        for kind in AberrationKind::ALL {
            let dotf = Dotf::builder()
                .sampling(256)
                .obscuration(obscuration)
                .aberration(kind, 0.1)
                .poke(1., 0.1)
                .build()
                .unwrap();
            let now = Instant::now();
            let measurement = dotf.run().unwrap();
            let stats = measurement.stats;
            println!("{kind} ({obscuration}) in {:?}:\n{stats}", now.elapsed());
            assert!(
                stats.residual < 0.25 * stats.input,
                "{kind} ({obscuration}): {stats}"
            );
            assert!(
                (stats.output - stats.input).abs() < 0.1 * stats.input,
                "{kind} ({obscuration}): {stats}"
            );
        }
    }
}

#[test]
fn phase_is_masked() {
    let dotf = Dotf::builder()
        .sampling(128)
        .aberration(AberrationKind::Coma, 0.05)
        .poke(2., 0.1)
        .build()
        .unwrap();
    let measurement = dotf.run().unwrap();
    let aperture = dotf.aperture().as_map();
    for (a, (output, residual)) in aperture.iter().zip(
        measurement
            .output_phase
            .iter()
            .zip(measurement.residual.iter()),
    ) {
        if *a == 0. {
            assert_eq!(*output, 0.);
            assert_eq!(*residual, 0.);
        }
    }
    let pupil = &measurement.masks.pupil;
    let lobe = measurement.dotf.lobes_phase(&measurement.masks);
    assert!(lobe
        .iter()
        .zip(pupil.iter().zip(measurement.masks.conjugate.iter()))
        .all(|(p, (m, n))| *m > 0. || *n > 0. || *p == 0.));
}

#[test]
fn poke_out_of_bounds() {
    assert!(matches!(
        Poke::off_center(64, PokeParameters::default(), 40),
        Err(DotfError::PokeOutOfBounds(32, 72, 64))
    ));
    assert!(matches!(
        Dotf::builder().sampling(32).diameter(1.5).build(),
        Err(DotfError::PokeOutOfBounds(..))
    ));
}
