use super::*;

#[test]
fn new_rejects_mismatched_buffers() {
    assert!(Image::new(2, 2, ChannelLayout::Rgb, vec![0; 12]).is_ok());
    assert!(matches!(
        Image::new(2, 2, ChannelLayout::Rgb, vec![0; 11]),
        Err(CorruptError::InvalidArgument(_))
    ));
    assert!(matches!(
        Image::new(0, 2, ChannelLayout::Gray, vec![]),
        Err(CorruptError::InvalidArgument(_))
    ));
}

#[test]
fn shape_follows_layout() {
    let rgb = Image::filled(4, 3, ChannelLayout::Rgb, 1).unwrap();
    assert_eq!(rgb.shape(), vec![3, 4, 3]);
    let gray = Image::filled(4, 3, ChannelLayout::Gray, 1).unwrap();
    assert_eq!(gray.shape(), vec![3, 4]);
}

#[test]
fn gray_round_trips_through_rgb() {
    let gray = Image::new(3, 1, ChannelLayout::Gray, vec![0, 128, 255]).unwrap();
    let rgb = gray.to_rgb();
    assert_eq!(rgb.as_raw(), &vec![0, 0, 0, 128, 128, 128, 255, 255, 255]);
    let back = Image::from_rgb_as(rgb, ChannelLayout::Gray);
    assert_eq!(back, gray);
}

#[test]
fn luma_uses_601_weights() {
    assert_eq!(luma_601(255, 0, 0), 76);
    assert_eq!(luma_601(0, 255, 0), 150);
    assert_eq!(luma_601(0, 0, 255), 29);
    assert_eq!(luma_601(255, 255, 255), 255);

    let img = Image::new(1, 1, ChannelLayout::Rgb, vec![255, 0, 0]).unwrap();
    assert_eq!(img.to_luma().as_bytes(), &[76]);
}

#[test]
fn from_dynamic_keeps_luma_single_channel() {
    let g = image::GrayImage::from_raw(1, 1, vec![9]).unwrap();
    let img = Image::from_dynamic(image::DynamicImage::ImageLuma8(g));
    assert_eq!(img.layout(), ChannelLayout::Gray);

    let rgba = image::RgbaImage::from_raw(1, 1, vec![1, 2, 3, 4]).unwrap();
    let img = Image::from_dynamic(image::DynamicImage::ImageRgba8(rgba));
    assert_eq!(img.layout(), ChannelLayout::Rgb);
    assert_eq!(img.as_bytes(), &[1, 2, 3]);
}
