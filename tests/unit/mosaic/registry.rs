//! Tests for the identifier registry

#[cfg(test)]
mod tests {
    use crate::mosaic::{tile, two_by_two};
    use std::ptr;
    use tilemosaic::io::error::ErrorKind;
    use tilemosaic::mosaic::{ImageAggregate, ImageRegistry};

    // Tests repeated lookups return the same aggregate instance
    // Verified by inserting a fresh aggregate on every call
    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = ImageRegistry::<()>::new();

        let first: *const ImageAggregate<()> = registry.get_or_create("abc").unwrap();
        let second: *const ImageAggregate<()> = registry.get_or_create("abc").unwrap();

        assert!(ptr::eq(first, second));
        assert_eq!(registry.len(), 1);
    }

    // Tests identifiers sharing a prefix stay distinct
    // Verified by comparing only up to the stored identifier length
    #[test]
    fn test_identifiers_match_exactly() {
        let mut registry = ImageRegistry::new();

        registry
            .get_or_create("abc")
            .unwrap()
            .add_tile(tile(0, 0, 1, 1))
            .unwrap();
        registry
            .get_or_create("abcdef")
            .unwrap()
            .add_tile(tile(0, 0, 1, 1))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("abc").map(ImageAggregate::len), Some(1));
        assert_eq!(registry.get("abcdef").map(ImageAggregate::len), Some(1));
        assert!(registry.get("ab").is_none());
    }

    // Tests aggregates iterate in first-seen order
    // Verified by storing aggregates in a hash map
    #[test]
    fn test_all_preserves_insertion_order() {
        let mut registry = ImageRegistry::<()>::new();
        for id in ["ff", "00", "a1", "00", "9c"] {
            registry.get_or_create(id).unwrap();
        }

        let ids: Vec<&str> = registry.all().map(ImageAggregate::id).collect();
        assert_eq!(ids, vec!["ff", "00", "a1", "9c"]);
    }

    // Tests empty identifiers are rejected before insertion
    // Verified by removing the emptiness check
    #[test]
    fn test_get_or_create_rejects_empty_id() {
        let mut registry = ImageRegistry::<()>::new();

        let err = registry.get_or_create("").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(registry.is_empty());
    }

    // Tests every aggregate is post-processed
    // Verified by finalizing only the first aggregate
    #[test]
    fn test_finalize_all() {
        let mut registry = ImageRegistry::default();
        for id in ["abc", "def"] {
            let aggregate = registry.get_or_create(id).unwrap();
            for record in two_by_two() {
                aggregate.add_tile(record).unwrap();
            }
        }

        registry.finalize_all().unwrap();

        assert!(registry.all().all(ImageAggregate::is_validated));
    }

    // Tests the first failing aggregate stops the run
    // Verified by continuing past failures
    #[test]
    fn test_finalize_all_fails_fast() {
        let mut registry = ImageRegistry::new();
        registry
            .get_or_create("bad")
            .unwrap()
            .add_tile(tile(0, 0, 10, 10))
            .unwrap();
        registry
            .get_or_create("bad")
            .unwrap()
            .add_tile(tile(12, 0, 10, 10))
            .unwrap();
        registry
            .get_or_create("good")
            .unwrap()
            .add_tile(tile(0, 0, 10, 10))
            .unwrap();

        let err = registry.finalize_all().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert!(err.to_string().contains("'bad'"));
        assert!(registry.get("good").is_some_and(|good| !good.is_validated()));
    }

    // Tests mutable iteration reaches every aggregate
    // Verified by returning an empty iterator
    #[test]
    fn test_all_mut() {
        let mut registry = ImageRegistry::new();
        registry
            .get_or_create("abc")
            .unwrap()
            .add_tile(tile(10, 0, 10, 10))
            .unwrap();
        registry
            .get_or_create("abc")
            .unwrap()
            .add_tile(tile(0, 0, 10, 10))
            .unwrap();

        for aggregate in registry.all_mut() {
            aggregate.sort();
        }

        let first = registry.get("abc").and_then(|aggregate| aggregate.tiles().first());
        assert_eq!(first.map(|record| record.origin()), Some((0, 0)));
    }
}
