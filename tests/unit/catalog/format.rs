//! Tests for reading and writing the catalog file

#[cfg(test)]
mod tests {
    use crate::fixtures::catalog;
    use image::Rgb;
    use photomosaic::MosaicError;
    use photomosaic::catalog::format::{
        default_image_root, parse_catalog_text, read_catalog, to_catalog_text, write_catalog,
    };
    use photomosaic::color::profile::ColorProfile;
    use photomosaic::ColorCatalog;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    // Tests the header and row layout
    // Verified by writing channels in BGR order
    #[test]
    fn test_catalog_text_layout() {
        let text = to_catalog_text(&catalog(&[[10, 20, 30], [0, 255, 7]]));
        assert_eq!(text, "image_name,r,g,b\nimg0.png,10,20,30\nimg1.png,0,255,7\n");
    }

    // Tests names with commas and quotes survive a write and read
    // Verified by writing names unquoted
    #[test]
    fn test_quoted_identifiers() {
        let original = ColorCatalog::from_profiles(
            vec![ColorProfile::new("a, \"b\".jpg", Rgb([1, 2, 3]))],
            "images",
        )
        .unwrap();

        let text = to_catalog_text(&original);
        assert!(text.contains("\"a, \"\"b\"\".jpg\""));

        let parsed = parse_catalog_text(&text, Path::new("c.csv"), PathBuf::from("images")).unwrap();
        assert_eq!(parsed.entries(), original.entries());
    }

    // Tests read_catalog resolves identifiers against the sibling images directory
    // Verified by resolving against the analysis directory
    #[test]
    fn test_write_then_read_resolves_images_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analysis").join("colors.csv");
        let written = catalog(&[[5, 6, 7]]);

        write_catalog(&written, &path).unwrap();
        let loaded = read_catalog(&path).unwrap();

        assert_eq!(loaded.entries(), written.entries());
        assert_eq!(loaded.image_root(), dir.path().join("images"));
        assert_eq!(default_image_root(&path), dir.path().join("images"));
    }

    // Tests out-of-range channels are rejected with the line number
    // Verified by clamping channel values
    #[test]
    fn test_out_of_range_channel_rejected() {
        let text = "image_name,r,g,b\nok.jpg,1,2,3\nbad.jpg,1,256,3\n";
        match parse_catalog_text(text, Path::new("c.csv"), PathBuf::from("images")) {
            Err(MosaicError::CatalogFormat { line, reason, .. }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("256"));
            }
            _ => unreachable!("Expected CatalogFormat error"),
        }
    }

    // Tests a wrong header is rejected
    // Verified by skipping header validation
    #[test]
    fn test_wrong_header_rejected() {
        let text = "name,red,green,blue\nok.jpg,1,2,3\n";
        let result = parse_catalog_text(text, Path::new("c.csv"), PathBuf::from("images"));
        assert!(matches!(result, Err(MosaicError::CatalogFormat { line: 1, .. })));
    }

    // Tests rows with the wrong field count are rejected
    // Verified by ignoring extra fields
    #[test]
    fn test_wrong_field_count_rejected() {
        let text = "image_name,r,g,b\nok.jpg,1,2\n";
        let result = parse_catalog_text(text, Path::new("c.csv"), PathBuf::from("images"));
        assert!(matches!(result, Err(MosaicError::CatalogFormat { line: 2, .. })));
    }

    // Tests blank lines and CRLF endings are tolerated
    // Verified by treating blank lines as rows
    #[test]
    fn test_blank_lines_and_crlf() {
        let text = "image_name,r,g,b\r\n\r\nx.jpg,9,8,7\r\n\n";
        let parsed = parse_catalog_text(text, Path::new("c.csv"), PathBuf::from("images")).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.entries()[0].rgb, Rgb([9, 8, 7]));
    }

    // Tests a header-only file yields an empty catalog
    // Verified by requiring at least one row
    #[test]
    fn test_header_only_is_empty_catalog() {
        let parsed =
            parse_catalog_text("image_name,r,g,b\n", Path::new("c.csv"), PathBuf::from("images"))
                .unwrap();
        assert!(parsed.is_empty());
    }

    // Tests an empty file reports a missing header
    // Verified by accepting empty input
    #[test]
    fn test_empty_file_rejected() {
        let result = parse_catalog_text("", Path::new("c.csv"), PathBuf::from("images"));
        assert!(matches!(result, Err(MosaicError::CatalogFormat { .. })));
    }
}
