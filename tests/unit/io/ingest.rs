//! Tests for tile file-name parsing and directory ingestion

#[cfg(test)]
mod tests {
    use crate::io::write_tile;
    use std::fs;
    use tempfile::TempDir;
    use tilemosaic::io::error::{ErrorKind, MosaicError};
    use tilemosaic::io::ingest::{TileName, TileScanner};
    use tilemosaic::io::raster::ImageBackend;

    // Tests identifier and origin are extracted from a tile name
    // Verified by swapping the x and y capture groups
    #[test]
    fn test_parse_tile_name() {
        let scanner = TileScanner::new().unwrap();

        let parsed = scanner.parse("0a1b-ff @(10|20).jpg").unwrap();

        assert_eq!(
            parsed,
            Some(TileName {
                id: "0a1b-ff".to_string(),
                x_pos: 10,
                y_pos: 20,
            })
        );
    }

    // Tests the operating system artifact is skipped silently
    // Verified by treating it as an invalid name
    #[test]
    fn test_parse_skips_artifact() {
        let scanner = TileScanner::new().unwrap();
        assert_eq!(scanner.parse(".DS_Store").unwrap(), None);
    }

    // Tests malformed names and oversized coordinates abort
    // Verified by saturating coordinates instead of rejecting them
    #[test]
    fn test_parse_rejects_invalid_names() {
        let scanner = TileScanner::new().unwrap();

        for name in [
            "notes.txt",
            "ABC @(1|2).jpg",
            "abc @(1|2)",
            "abc @(99999999999|0).png",
        ] {
            let err = scanner.parse(name).unwrap_err();
            assert!(
                matches!(err, MosaicError::InvalidFileName { .. }),
                "{name}"
            );
        }
    }

    // Tests directory listings are sorted and exclude subdirectories
    // Verified by returning entries in read_dir order
    #[test]
    fn test_list_files() {
        let dir = TempDir::new().unwrap();
        for name in ["c", "a", "b"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = TileScanner::list_files(dir.path()).unwrap();

        let names: Vec<_> = files
            .iter()
            .filter_map(|path| path.file_name())
            .filter_map(|name| name.to_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    // Tests a missing directory is a collaborator failure
    // Verified by returning an empty listing instead
    #[test]
    fn test_list_files_missing_directory() {
        let dir = TempDir::new().unwrap();

        let err = TileScanner::list_files(&dir.path().join("absent")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Collaborator);
    }

    // Tests tiles are grouped by identifier with decoded dimensions
    // Verified by reading dimensions from the file name instead of the image
    #[test]
    fn test_ingest_groups_tiles() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), "abc @(0|0).png", 4, 3, [255, 0, 0]);
        write_tile(dir.path(), "abc @(4|0).png", 2, 3, [0, 255, 0]);
        write_tile(dir.path(), "de-f0 @(0|0).png", 5, 5, [0, 0, 255]);
        fs::write(dir.path().join(".DS_Store"), b"\0\0").unwrap();

        let scanner = TileScanner::new().unwrap();
        let registry = scanner.ingest(dir.path(), &ImageBackend::new()).unwrap();

        assert_eq!(registry.len(), 2);
        let abc = registry.get("abc").unwrap();
        assert_eq!(abc.len(), 2);
        let sizes: Vec<_> = abc
            .tiles()
            .iter()
            .map(|tile| (tile.x_pos(), tile.width(), tile.height()))
            .collect();
        assert_eq!(sizes, vec![(0, 4, 3), (4, 2, 3)]);
        assert_eq!(registry.get("de-f0").map(|image| image.len()), Some(1));
    }

    // Tests an undecodable tile aborts ingestion
    // Verified by skipping tiles that fail to load
    #[test]
    fn test_ingest_rejects_undecodable_tile() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("abc @(0|0).png"), b"not a png").unwrap();

        let scanner = TileScanner::new().unwrap();
        let err = scanner
            .ingest(dir.path(), &ImageBackend::new())
            .unwrap_err();

        assert!(matches!(err, MosaicError::ImageLoad { .. }));
    }

    // Tests a stray file aborts ingestion
    // Verified by skipping unmatched names
    #[test]
    fn test_ingest_rejects_stray_file() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), "abc @(0|0).png", 1, 1, [0, 0, 0]);
        fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let scanner = TileScanner::new().unwrap();
        let err = scanner
            .ingest(dir.path(), &ImageBackend::new())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
