use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::{
    config::{schedule::scalar, tables::Dataset},
    foundation::image::ChannelLayout,
};

fn brightness_pool() -> Registry {
    Registry::from_entries(
        Dataset::PathMnist,
        [(
            "brightness_up",
            Corruption::Brightness(scalar([1.1, 1.2, 1.3, 1.4, 1.5]).unwrap()),
        )],
    )
    .unwrap()
}

#[test]
fn empty_pool_is_rejected() {
    let reg = Registry::for_dataset(Dataset::PathMnist).unwrap();
    let err = AugmentationSampler::new(reg.subset(&[]).unwrap()).unwrap_err();
    assert!(matches!(err, CorruptError::InvalidArgument(_)), "{err}");
}

#[test]
fn identity_returns_an_equal_image() {
    let mut sampler = AugmentationSampler::new(brightness_pool()).unwrap();
    let img = Image::filled(8, 8, ChannelLayout::Rgb, 100).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut saw_identity = false;
    let mut saw_corruption = false;
    for _ in 0..64 {
        let (out, choice) = sampler.sample_with_choice(&img, &mut rng).unwrap();
        match choice {
            Choice::Identity => {
                assert_eq!(out, img);
                saw_identity = true;
            }
            Choice::Corruption(name) => {
                assert_eq!(name, "brightness_up");
                assert!(out.mean() > img.mean());
                saw_corruption = true;
            }
        }
    }
    assert!(saw_identity && saw_corruption);
}

#[test]
fn choice_names() {
    assert_eq!(Choice::Identity.name(), "identity");
    assert_eq!(Choice::Corruption("bubble".into()).name(), "bubble");
}

#[test]
fn outcomes_include_identity() {
    let reg = Registry::for_dataset(Dataset::BreastMnist).unwrap();
    let sampler = AugmentationSampler::new(reg).unwrap();
    assert_eq!(sampler.outcomes(), 8);
    assert_eq!(sampler.names()[0], "pixelate");
}
