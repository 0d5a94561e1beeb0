use super::*;

#[test]
fn packaged_bank_is_parsed_once_and_shared() {
    let a = InkBank::packaged().unwrap();
    let b = InkBank::packaged().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.bucket_keys(), vec![3, 4]);
}

#[test]
fn bucket_key_collapses_low_severities() {
    assert_eq!(InkBank::bucket_key(None), 3);
    assert_eq!(InkBank::bucket_key(Some(0)), 3);
    assert_eq!(InkBank::bucket_key(Some(2)), 3);
    assert_eq!(InkBank::bucket_key(Some(3)), 3);
    assert_eq!(InkBank::bucket_key(Some(4)), 4);
}

#[test]
fn packaged_stencils_fit_a_224_image_with_margins() {
    let bank = InkBank::packaged().unwrap();
    for key in bank.bucket_keys() {
        for s in bank.bucket(Some(key as usize)).unwrap() {
            assert!(s.width + 20 <= 224 && s.height + 20 <= 224);
            assert!(s.alpha.iter().any(|&a| a > 0));
        }
    }
}

#[test]
fn corrupt_banks_fail_with_asset_load() {
    assert!(matches!(
        InkBank::from_json(b"not json"),
        Err(CorruptError::AssetLoad(_))
    ));
    assert!(matches!(
        InkBank::from_json(br#"{"version":2,"buckets":{}}"#),
        Err(CorruptError::AssetLoad(_))
    ));
    assert!(matches!(
        InkBank::from_json(br#"{"version":1,"buckets":{"3":[{"width":2,"height":2,"alpha":[1]}]}}"#),
        Err(CorruptError::AssetLoad(_))
    ));
    assert!(matches!(
        InkBank::from_json(br#"{"version":1,"buckets":{"4":[{"width":1,"height":1,"alpha":[1]}]}}"#),
        Err(CorruptError::AssetLoad(_))
    ));
}

#[test]
fn missing_bucket_is_reported() {
    let bank =
        InkBank::from_json(br#"{"version":1,"buckets":{"3":[{"width":1,"height":1,"alpha":[9]}]}}"#)
            .unwrap();
    assert_eq!(bank.bucket(Some(1)).unwrap().len(), 1);
    assert!(matches!(bank.bucket(Some(4)), Err(CorruptError::AssetLoad(_))));
}

#[test]
fn missing_file_is_asset_load() {
    let err = InkBank::load("/definitely/not/here/inks.json").unwrap_err();
    assert!(matches!(err, CorruptError::AssetLoad(_)));
}
