use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;

#[test]
fn schedule_requires_exactly_five_presets() {
    assert!(Schedule::<f64>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
    assert!(matches!(
        Schedule::<f64>::new(vec![1.0, 2.0, 3.0, 4.0]),
        Err(CorruptError::Configuration(_))
    ));
    assert!(matches!(
        Schedule::<f64>::new(vec![1.0; 6]),
        Err(CorruptError::Configuration(_))
    ));
    assert!(matches!(
        Schedule::<f64>::new(vec![]),
        Err(CorruptError::Configuration(_))
    ));
}

#[test]
fn non_finite_presets_are_rejected() {
    assert!(matches!(
        Schedule::<f64>::new(vec![1.0, 2.0, f64::NAN, 4.0, 5.0]),
        Err(CorruptError::Configuration(_))
    ));
}

#[test]
fn from_rows_checks_arity() {
    let ok = Schedule::<(f64, f64)>::from_rows(&[
        vec![3.0, 0.1],
        vec![4.0, 0.1],
        vec![5.0, 0.2],
        vec![6.0, 0.2],
        vec![7.0, 0.3],
    ])
    .unwrap();
    assert_eq!(ok.at(2).unwrap(), &(5.0, 0.2));

    let bad = Schedule::<(f64, f64)>::from_rows(&[
        vec![3.0, 0.1],
        vec![4.0],
        vec![5.0, 0.2],
        vec![6.0, 0.2],
        vec![7.0, 0.3],
    ]);
    assert!(matches!(bad, Err(CorruptError::InvalidArgument(_))));
}

#[test]
fn severity_out_of_range_is_invalid_argument() {
    let s = scalar([0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert_eq!(s.resolve(Mode::Severity(4), &mut rng).unwrap(), 0.5);
    assert!(matches!(
        s.resolve(Mode::Severity(5), &mut rng),
        Err(CorruptError::InvalidArgument(_))
    ));
}

#[test]
fn mode_from_call_mirrors_calling_convention() {
    assert_eq!(Mode::from_call(-1, true).unwrap(), Mode::Augment);
    assert_eq!(Mode::from_call(7, true).unwrap(), Mode::Augment);
    assert_eq!(Mode::from_call(2, false).unwrap(), Mode::Severity(2));
    assert!(matches!(
        Mode::from_call(-1, false),
        Err(CorruptError::InvalidArgument(_))
    ));
}

#[test]
fn augment_samples_stay_between_endpoints_per_dimension() {
    let s = pair([(7.0, 15.0), (10.0, 15.0), (12.0, 15.0), (15.0, 20.0), (17.0, 25.0)]).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..1000 {
        let (r, b) = s.resolve(Mode::Augment, &mut rng).unwrap();
        assert!((7.0..=17.0).contains(&r));
        assert!((15.0..=25.0).contains(&b));
    }
}

#[test]
fn augment_handles_decreasing_schedules() {
    let s = scalar([0.8, 0.6, 0.4, 0.3, 0.25]).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..1000 {
        let v = s.resolve(Mode::Augment, &mut rng).unwrap();
        assert!((0.25..=0.8).contains(&v));
    }
}

#[test]
fn zoom_factor_count_keeps_float_residue() {
    let z = ZoomSteps::new(1.11, 0.01);
    let f = z.factors();
    assert_eq!(f.len(), 12);
    assert!((f[0] - 1.0).abs() < 1e-12);
    assert!((z.max_factor() - 1.11).abs() < 1e-9);

    for (stop, step, count) in [(1.16, 0.01, 16), (1.21, 0.02, 11), (1.26, 0.02, 13)] {
        assert_eq!(ZoomSteps::new(stop, step).factors().len(), count, "{stop}/{step}");
    }

    let z = ZoomSteps::new(1.31, 0.03);
    assert_eq!(z.factors().len(), 11);
    assert!((z.max_factor() - 1.30).abs() < 1e-9);
}

#[test]
fn zoom_validation_rejects_non_positive_step() {
    assert!(matches!(
        Schedule::new(vec![ZoomSteps::new(1.1, 0.0); 5]),
        Err(CorruptError::Configuration(_))
    ));
}

#[test]
fn zoom_augment_samples_stay_in_range() {
    let s = zoom([
        ZoomSteps::new(1.11, 0.01),
        ZoomSteps::new(1.16, 0.01),
        ZoomSteps::new(1.21, 0.02),
        ZoomSteps::new(1.26, 0.02),
        ZoomSteps::new(1.31, 0.03),
    ])
    .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for _ in 0..200 {
        let z = s.resolve(Mode::Augment, &mut rng).unwrap();
        assert!(z.stop >= 1.0 && z.stop <= 1.30 + 1e-9);
        assert!(z.step >= 0.01 && z.step <= 0.03);
        assert!(z.factors().iter().all(|&f| f < z.stop + 1e-9));
    }
}
