use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::{
    assets::inks::Stencil,
    config::schedule::{pair, scalar, triple, zoom},
    foundation::image::ChannelLayout,
};

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn gradient(w: u32, h: u32) -> Image {
    let data = (0..w * h * 3).map(|i| (i % 251) as u8).collect();
    Image::new(w, h, ChannelLayout::Rgb, data).unwrap()
}

#[test]
fn severity_out_of_range_is_invalid_argument() {
    let mut op = Corruption::Brightness(scalar([1.1, 1.2, 1.3, 1.4, 1.5]).unwrap());
    let img = gradient(8, 8);
    let err = op.apply(&img, Mode::Severity(5), &mut rng(0)).unwrap_err();
    assert!(matches!(err, CorruptError::InvalidArgument(_)), "{err}");
    let err = op.apply_call(&img, -1, false, &mut rng(0)).unwrap_err();
    assert!(matches!(err, CorruptError::InvalidArgument(_)), "{err}");
    assert!(op.apply_call(&img, -1, true, &mut rng(0)).is_ok());
}

#[test]
fn jpeg_quality_is_truncated_and_clamped() {
    let op = Corruption::JpegCompression(scalar([50.0, 30.0, 15.0, 10.0, 7.0]).unwrap());
    assert_eq!(
        op.resolve(Mode::Severity(0), &mut rng(0)).unwrap(),
        Params::JpegCompression { quality: 50 }
    );
    let mut r = rng(1);
    for _ in 0..200 {
        let Params::JpegCompression { quality } = op.resolve(Mode::Augment, &mut r).unwrap() else {
            panic!("wrong params");
        };
        assert!((7..=50).contains(&quality));
    }
}

#[test]
fn gaussian_blur_kernel_is_forced_odd_when_sampled() {
    let op = Corruption::GaussianBlur(scalar([11.0, 13.0, 15.0, 17.0, 21.0]).unwrap());
    let mut r = rng(2);
    for _ in 0..200 {
        let Params::GaussianBlur { kernel_size } = op.resolve(Mode::Augment, &mut r).unwrap() else {
            panic!("wrong params");
        };
        assert_eq!(kernel_size % 2, 1);
        assert!((9..=21).contains(&kernel_size));
    }
}

#[test]
fn gaussian_blur_even_preset_fails_in_severity_mode() {
    let op = Corruption::GaussianBlur(scalar([3.0, 4.0, 5.0, 7.0, 9.0]).unwrap());
    assert!(op.resolve(Mode::Severity(1), &mut rng(0)).is_err());
    assert!(op.resolve(Mode::Severity(2), &mut rng(0)).is_ok());
}

#[test]
fn zoom_blur_augment_factors_start_at_one() {
    let op = Corruption::ZoomBlur(
        zoom([
            ZoomSteps::new(1.11, 0.01),
            ZoomSteps::new(1.16, 0.01),
            ZoomSteps::new(1.21, 0.02),
            ZoomSteps::new(1.26, 0.02),
            ZoomSteps::new(1.31, 0.03),
        ])
        .unwrap(),
    );
    let mut r = rng(3);
    for _ in 0..100 {
        let Params::ZoomBlur { factors } = op.resolve(Mode::Augment, &mut r).unwrap() else {
            panic!("wrong params");
        };
        if let Some(first) = factors.first() {
            assert_eq!(*first, 1.0);
        }
        assert!(factors.iter().all(|f| (1.0..=1.30 + 1e-9).contains(f)));
    }
}

#[test]
fn gray_input_stays_gray() {
    let mut op = Corruption::Pixelate(scalar([0.8, 0.6, 0.4, 0.3, 0.25]).unwrap());
    let img = Image::filled(16, 12, ChannelLayout::Gray, 77).unwrap();
    let out = op.apply(&img, Mode::Severity(4), &mut rng(0)).unwrap();
    assert_eq!(out.layout(), ChannelLayout::Gray);
    assert_eq!(out.shape(), vec![12, 16]);
    assert!(out.as_bytes().iter().all(|&v| v == 77));
}

#[test]
fn impulse_noise_owned_seed_is_reproducible() {
    let schedule = scalar([0.01, 0.03, 0.06, 0.09, 0.17]).unwrap();
    let img = gradient(32, 32);
    let mut a = Corruption::impulse_noise(schedule.clone(), 42);
    let mut b = Corruption::impulse_noise(schedule, 42);

    // The caller's generator does not influence the owned stream.
    let out_a = a.apply(&img, Mode::Severity(2), &mut rng(1)).unwrap();
    let out_b = b.apply(&img, Mode::Severity(2), &mut rng(999)).unwrap();
    assert_eq!(out_a, out_b);

    // The stream advances between calls and rewinds on reseed.
    let second = a.apply(&img, Mode::Severity(2), &mut rng(1)).unwrap();
    assert_ne!(second, out_a);
    assert!(a.reseed(42));
    assert_eq!(a.apply(&img, Mode::Severity(2), &mut rng(1)).unwrap(), out_a);
}

#[test]
fn impulse_noise_augmentation_uses_fixed_mask_seed() {
    let schedule = scalar([0.05, 0.05, 0.05, 0.05, 0.05]).unwrap();
    let mut op = Corruption::impulse_noise(schedule, 7);
    let img = gradient(16, 16);
    let a = op.apply(&img, Mode::Augment, &mut rng(1)).unwrap();
    let b = op.apply(&img, Mode::Augment, &mut rng(2)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn reseed_is_a_no_op_for_operators_without_state() {
    let mut op = Corruption::Saturate(scalar([0.05, 0.1, 0.15, 0.2, 0.25]).unwrap());
    assert!(!op.reseed(1));
    assert!(!op.owns_rng());
}

#[test]
fn stain_deposit_uses_injected_bank() {
    let stencil = Stencil {
        width: 4,
        height: 4,
        alpha: vec![255; 16],
    };
    let json = serde_json::json!({
        "version": 1,
        "buckets": { "3": [stencil.clone()], "4": [stencil] },
    });
    let bank = InkBank::from_json(json.to_string().as_bytes()).unwrap();
    let mut op = Corruption::stain_deposit(scalar([1.0, 1.0, 1.0, 1.0, 1.0]).unwrap())
        .with_inks(Arc::new(bank));
    let img = Image::filled(40, 40, ChannelLayout::Rgb, 200).unwrap();
    let out = op.apply(&img, Mode::Severity(0), &mut rng(5)).unwrap();
    assert_eq!(out.as_bytes().iter().filter(|&&v| v == 0).count(), 16 * 3);
}

#[test]
fn stain_deposit_with_packaged_bank_runs_every_severity() {
    let mut op = Corruption::stain_deposit(scalar([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap());
    let img = Image::filled(64, 64, ChannelLayout::Rgb, 180).unwrap();
    let mut r = rng(6);
    for s in 0..5 {
        let out = op.apply(&img, Mode::Severity(s), &mut r).unwrap();
        assert_eq!(out.shape(), img.shape());
        assert!(out.mean() <= img.mean());
    }
}

#[test]
fn params_values_flatten_in_order() {
    let op = Corruption::Characters(
        triple([
            (1.0, 6.0, 0.14),
            (2.0, 7.0, 0.15),
            (3.0, 8.0, 0.16),
            (4.0, 9.0, 0.17),
            (6.0, 10.0, 0.18),
        ])
        .unwrap(),
    );
    let p = op.resolve(Mode::Severity(4), &mut rng(0)).unwrap();
    assert_eq!(p.values(), vec![6.0, 10.0, 0.18]);

    let op = Corruption::Bubble(pair([(7.0, 15.0), (10.0, 15.0), (12.0, 15.0), (15.0, 20.0), (17.0, 25.0)]).unwrap());
    assert_eq!(
        op.resolve(Mode::Severity(1), &mut rng(0)).unwrap(),
        Params::Bubble {
            max_radius: 10,
            max_bubbles: 15
        }
    );
}

#[test]
fn schedule_json_lists_presets() {
    let op = Corruption::MotionBlur(pair([(5.0, 5.0), (10.0, 5.0), (15.0, 5.0), (15.0, 8.0), (15.0, 12.0)]).unwrap());
    let v = op.schedule_json().unwrap();
    assert_eq!(v.as_array().map(Vec::len), Some(5));
    assert_eq!(v[4], serde_json::json!([15.0, 12.0]));
    assert_eq!(op.kind().to_string(), "motion_blur");
    assert_eq!(op.levels(), 5);
}
