use super::*;

fn ramp() -> RgbImage {
    RgbImage::from_fn(16, 4, |x, y| {
        image::Rgb([(10 + x * 12) as u8, (20 + y * 30) as u8, (200 - x * 5) as u8])
    })
}

fn mean(img: &RgbImage) -> f64 {
    let raw = img.as_raw();
    raw.iter().map(|&v| f64::from(v)).sum::<f64>() / raw.len() as f64
}

#[test]
fn brightness_factor_one_is_identity() {
    let src = ramp();
    assert_eq!(brightness(&src, 1.0).unwrap(), src);
}

#[test]
fn brightness_scales_and_clips() {
    let src = RgbImage::from_pixel(1, 1, image::Rgb([100, 200, 0]));
    let out = brightness(&src, 1.5).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [150, 255, 0]);
    let out = brightness(&src, 0.5).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [50, 100, 0]);
}

#[test]
fn brightness_rejects_negative_factor() {
    assert!(matches!(
        brightness(&ramp(), -0.1),
        Err(CorruptError::InvalidArgument(_))
    ));
}

#[test]
fn contrast_zero_collapses_to_mean_luma() {
    let src = ramp();
    let out = contrast(&src, 0.0).unwrap();
    let first = out.get_pixel(0, 0).0;
    assert!(out.pixels().all(|p| p.0 == first));
    assert_eq!(first[0], first[1]);
}

#[test]
fn contrast_down_moves_towards_mean() {
    let src = ramp();
    let out = contrast(&src, 0.5).unwrap();
    let spread = |img: &RgbImage| {
        let m = mean(img);
        img.as_raw().iter().map(|&v| (f64::from(v) - m).abs()).sum::<f64>()
    };
    assert!(spread(&out) < spread(&src));
}

#[test]
fn gamma_one_is_identity_and_extremes_are_fixed() {
    let src = ramp();
    assert_eq!(gamma(&src, 1.0).unwrap(), src);

    let ends = RgbImage::from_raw(2, 1, vec![0, 0, 0, 255, 255, 255]).unwrap();
    for g in [0.4, 2.0] {
        assert_eq!(gamma(&ends, g).unwrap(), ends);
    }
}

#[test]
fn gamma_above_one_darkens_midtones() {
    let src = RgbImage::from_pixel(1, 1, image::Rgb([128, 128, 128]));
    let out = gamma(&src, 1.6).unwrap();
    assert!(out.get_pixel(0, 0).0[0] < 128);
    let out = gamma(&src, 0.6).unwrap();
    assert!(out.get_pixel(0, 0).0[0] > 128);
}

#[test]
fn hsv_round_trip_is_stable() {
    for rgb in [
        [0.2, 0.4, 0.6],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.5],
        [0.3, 0.3, 0.3],
        [0.9, 0.1, 0.8],
    ] {
        let back = hsv_to_rgb(rgb_to_hsv(rgb));
        for c in 0..3 {
            assert!((back[c] - rgb[c]).abs() < 1e-9, "{rgb:?} -> {back:?}");
        }
    }
}

#[test]
fn saturate_increases_saturation_and_keeps_gray_hue() {
    let src = RgbImage::from_pixel(1, 1, image::Rgb([200, 150, 150]));
    let out = saturate(&src, 0.2).unwrap();
    let p = out.get_pixel(0, 0).0;
    assert_eq!(p[0], 200);
    assert!(p[1] < 150 && p[2] < 150);

    // A neutral gray has hue 0, so added saturation tints it red.
    let gray = RgbImage::from_pixel(1, 1, image::Rgb([128, 128, 128]));
    let out = saturate(&gray, 0.25).unwrap();
    let p = out.get_pixel(0, 0).0;
    assert!(p[0] > p[1] && p[1] == p[2]);
}
