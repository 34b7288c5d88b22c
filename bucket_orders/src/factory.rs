//! Bucket order factory

use super::*;
use render_core::bucket_order::*;
use std::sync::Arc;

/// Names accepted by `create_bucket_order`. Any of them may be prefixed with
/// `inverse`, `invert` or `reverse` and whitespace to reverse the order.
pub const BUCKET_ORDER_NAMES: [&str; 6] = ["row", "column", "diagonal", "spiral", "hilbert", "random"];

/// Creates a bucket order by name. Unknown names fall back to a Hilbert
/// order.
///
/// * `name` - Name of the order, e.g. `spiral` or `reverse spiral`.
pub fn create_bucket_order(name: &str) -> ArcBucketOrder {
    let name = name.trim().to_lowercase();
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let (base, flip) = match tokens.as_slice() {
        [prefix, base] if ["inverse", "invert", "reverse"].contains(prefix) => (*base, true),
        _ => (name.as_str(), false),
    };

    let order: ArcBucketOrder = match base {
        "row" => Arc::new(RowBucketOrder),
        "column" => Arc::new(ColumnBucketOrder),
        "diagonal" => Arc::new(DiagonalBucketOrder),
        "spiral" => Arc::new(SpiralBucketOrder),
        "hilbert" => Arc::new(HilbertBucketOrder),
        "random" => Arc::new(RandomBucketOrder::default()),
        _ => {
            warn!("Unrecognized bucket ordering: '{}' - using hilbert", base);
            return Arc::new(HilbertBucketOrder);
        }
    };

    if flip {
        Arc::new(InvertedBucketOrder::new(order))
    } else {
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use render_core::geometry::*;

    fn coords(seq: &[Point2<usize>]) -> Vec<(usize, usize)> {
        seq.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn known_names_resolve() {
        for name in BUCKET_ORDER_NAMES {
            let seq = create_bucket_order(name).bucket_sequence(6, 4);
            assert!(is_complete(&seq, 6, 4), "{}", name);
        }
        assert_eq!(
            coords(&create_bucket_order("Row").bucket_sequence(3, 3)),
            coords(&RowBucketOrder.bucket_sequence(3, 3))
        );
    }

    #[test]
    fn prefixes_reverse_the_base_order() {
        for prefix in ["inverse", "invert", "reverse"] {
            for name in BUCKET_ORDER_NAMES {
                let mut base = create_bucket_order(name).bucket_sequence(5, 3);
                base.reverse();
                let flipped = create_bucket_order(&format!("{}  {}", prefix, name)).bucket_sequence(5, 3);
                assert_eq!(coords(&base), coords(&flipped), "{} {}", prefix, name);
            }
        }
    }

    #[test]
    fn unknown_names_fall_back_to_hilbert() {
        let expected = coords(&HilbertBucketOrder.bucket_sequence(5, 5));
        assert_eq!(coords(&create_bucket_order("zigzag").bucket_sequence(5, 5)), expected);
        assert_eq!(coords(&create_bucket_order("reverse zigzag").bucket_sequence(5, 5)), expected);
        assert_eq!(coords(&create_bucket_order("inverse").bucket_sequence(5, 5)), expected);
    }
}
