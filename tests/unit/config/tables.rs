use super::*;

#[test]
fn dataset_names_round_trip() {
    for d in Dataset::ALL {
        assert_eq!(d.as_str().parse::<Dataset>().unwrap(), d);
        assert_eq!(d.to_string(), d.as_str());
    }
}

#[test]
fn unknown_dataset_is_not_found() {
    let err = "cifar10".parse::<Dataset>().unwrap_err();
    assert!(matches!(err, CorruptError::NotFound(_)), "{err}");
    assert!("PathMNIST".parse::<Dataset>().is_err());
}

#[test]
fn rgb_datasets_match_the_channel_convention() {
    let rgb: Vec<_> = Dataset::ALL
        .into_iter()
        .filter(|d| d.is_rgb())
        .map(Dataset::as_str)
        .collect();
    assert_eq!(rgb, ["pathmnist", "bloodmnist", "dermamnist", "retinamnist"]);
}

#[test]
fn folds_partition_their_members() {
    let mut seen = std::collections::HashSet::new();
    for fold in Fold::ALL {
        for name in fold.members() {
            assert!(seen.insert(*name), "{name} listed twice");
            assert_eq!(Fold::of(name), Some(fold));
        }
    }
    assert_eq!(Fold::of("identity"), None);
    assert_eq!(serde_json::to_value(Fold::TaskSpecific).unwrap(), "task-specific");
}
