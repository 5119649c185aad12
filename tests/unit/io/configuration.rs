//! Tests for run constants and configuration types

#[cfg(test)]
mod tests {
    use regex::Regex;
    use tilemosaic::io::configuration::{
        DEFAULT_COMPRESSED_SIZE, OutputOptions, SKIPPED_FILE_NAME, TILE_FILE_PATTERN,
    };

    // Tests the tile pattern accepts hex identifiers with hyphens and any extension
    // Verified by restricting extensions to jpg
    #[test]
    fn test_tile_pattern_accepts() {
        let pattern = Regex::new(TILE_FILE_PATTERN).unwrap();

        for name in [
            "abc @(0|0).jpg",
            "0f-3a-9e @(1024|512).png",
            "deadbeef @(7|8).TIFF",
        ] {
            assert!(pattern.is_match(name), "{name}");
        }
    }

    // Tests the tile pattern rejects malformed names
    // Verified by dropping the anchors
    #[test]
    fn test_tile_pattern_rejects() {
        let pattern = Regex::new(TILE_FILE_PATTERN).unwrap();

        for name in [
            "ABC @(0|0).jpg",
            "abc@(0|0).jpg",
            "abc @(0,0).jpg",
            "abc @(-1|0).jpg",
            "abc @(0|0)",
            "abc @(0|0).jpg.bak",
            SKIPPED_FILE_NAME,
        ] {
            assert!(!pattern.is_match(name), "{name}");
        }
    }

    // Tests no output is requested by default
    // Verified by enabling full output by default
    #[test]
    fn test_output_options_default() {
        let options = OutputOptions::default();

        assert!(!options.any());
        assert!(!options.pyramid);
        assert_eq!(options.compressed_size, DEFAULT_COMPRESSED_SIZE);
    }

    // Tests either encoding enables the output stage and the pyramid alone does not
    // Verified by counting the pyramid flag as an output
    #[test]
    fn test_output_options_any() {
        let full = OutputOptions {
            save_full: true,
            ..OutputOptions::default()
        };
        let compressed = OutputOptions {
            save_compressed: true,
            ..OutputOptions::default()
        };
        let pyramid_only = OutputOptions {
            pyramid: true,
            ..OutputOptions::default()
        };

        assert!(full.any());
        assert!(compressed.any());
        assert!(!pyramid_only.any());
    }
}
