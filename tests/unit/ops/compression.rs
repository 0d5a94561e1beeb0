use super::*;

fn gradient(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        image::Rgb([(x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 77])
    })
}

#[test]
fn pixelate_preserves_dimensions() {
    let src = gradient(224, 224);
    for f in [0.8, 0.6, 0.4, 0.3, 0.25, 0.1] {
        let out = pixelate(&src, f).unwrap();
        assert_eq!(out.dimensions(), (224, 224));
    }
}

#[test]
fn pixelate_factor_one_is_identity() {
    let src = gradient(16, 9);
    assert_eq!(pixelate(&src, 1.0).unwrap(), src);
}

#[test]
fn pixelate_creates_flat_blocks() {
    let src = gradient(8, 8);
    let out = pixelate(&src, 0.25).unwrap();
    // 8 -> 2 -> 8: every 4x4 block is constant.
    for by in 0..2 {
        for bx in 0..2 {
            let first = *out.get_pixel(bx * 4, by * 4);
            for y in 0..4 {
                for x in 0..4 {
                    assert_eq!(*out.get_pixel(bx * 4 + x, by * 4 + y), first);
                }
            }
        }
    }
}

#[test]
fn pixelate_rejects_non_positive_factor() {
    let src = gradient(4, 4);
    assert!(matches!(
        pixelate(&src, 0.0),
        Err(CorruptError::InvalidArgument(_))
    ));
}

#[test]
fn box_downsample_averages_constant_runs() {
    let src = RgbImage::from_pixel(6, 3, image::Rgb([90, 10, 200]));
    let out = resize_box(&src, 2, 1);
    assert!(out.pixels().all(|p| p.0 == [90, 10, 200]));
}

#[test]
fn jpeg_round_trip_keeps_shape_and_degrades() {
    let src = gradient(32, 24);
    let q95 = jpeg_round_trip(&src, 95).unwrap();
    let q5 = jpeg_round_trip(&src, 5).unwrap();
    assert_eq!(q95.dimensions(), (32, 24));
    assert_eq!(q5.dimensions(), (32, 24));

    let err = |a: &RgbImage| -> u64 {
        a.as_raw()
            .iter()
            .zip(src.as_raw())
            .map(|(&x, &y)| u64::from(x.abs_diff(y)))
            .sum()
    };
    assert!(err(&q5) > err(&q95));
}

#[test]
fn jpeg_rejects_quality_zero() {
    let src = gradient(4, 4);
    assert!(matches!(
        jpeg_round_trip(&src, 0),
        Err(CorruptError::InvalidArgument(_))
    ));
}
