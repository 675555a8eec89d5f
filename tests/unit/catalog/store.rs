//! Tests for catalog ordering and identifier uniqueness

#[cfg(test)]
mod tests {
    use image::Rgb;
    use photomosaic::color::profile::ColorProfile;
    use photomosaic::{ColorCatalog, MosaicError};
    use std::path::Path;

    // Tests entries keep construction order
    // Verified by sorting entries in from_profiles
    #[test]
    fn test_catalog_preserves_insertion_order() {
        let catalog = ColorCatalog::from_profiles(
            vec![
                ColorProfile::new("b.jpg", Rgb([1, 1, 1])),
                ColorProfile::new("a.jpg", Rgb([2, 2, 2])),
            ],
            "images",
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).map(|p| p.identifier.as_str()), Some("b.jpg"));
        assert_eq!(catalog.get(1).map(|p| p.identifier.as_str()), Some("a.jpg"));
        assert!(catalog.get(2).is_none());
    }

    // Tests duplicate identifiers are rejected while duplicate colors are not
    // Verified by removing the uniqueness check
    #[test]
    fn test_catalog_rejects_duplicate_identifier() {
        let result = ColorCatalog::from_profiles(
            vec![
                ColorProfile::new("same.jpg", Rgb([1, 1, 1])),
                ColorProfile::new("other.jpg", Rgb([1, 1, 1])),
                ColorProfile::new("same.jpg", Rgb([9, 9, 9])),
            ],
            "images",
        );

        match result {
            Err(MosaicError::DuplicateIdentifier { identifier }) => {
                assert_eq!(identifier, "same.jpg");
            }
            _ => unreachable!("Expected DuplicateIdentifier error"),
        }
    }

    // Tests identifiers resolve against the image root
    // Verified by returning the identifier unjoined
    #[test]
    fn test_catalog_resolve() {
        let catalog = ColorCatalog::from_profiles(
            vec![ColorProfile::new("tile.png", Rgb([0, 0, 0]))],
            "/data/set/images",
        )
        .unwrap();

        assert_eq!(catalog.image_root(), Path::new("/data/set/images"));
        let profile = catalog.get(0).unwrap();
        assert_eq!(
            catalog.resolve(profile),
            Path::new("/data/set/images/tile.png")
        );
    }

    // Tests an empty catalog is constructible (index build rejects it later)
    // Verified by erroring on empty input
    #[test]
    fn test_empty_catalog_is_allowed() {
        let catalog = ColorCatalog::from_profiles(Vec::new(), "images").unwrap();
        assert!(catalog.is_empty());
    }
}
