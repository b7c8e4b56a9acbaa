use gmatch::{
    graph::CsrGraph,
    intersection::{scalar_intersection, Intersect, IntersectionStrategy, LaneWidth},
    types::VId,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn sorted_set(max_len: usize) -> impl Strategy<Value = Vec<VId>> {
    proptest::collection::btree_set(-50..300i32, 0..max_len)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn test_every_width_matches_scalar(u in sorted_set(120), v in sorted_set(120)) {
        let expected = u
            .iter()
            .collect::<BTreeSet<_>>()
            .intersection(&v.iter().collect())
            .count();
        prop_assert_eq!(scalar_intersection(&u, &v), expected);
        for &width in LaneWidth::ALL.iter() {
            for strategy in vec![IntersectionStrategy::new(width), IntersectionStrategy::portable(width)] {
                prop_assert_eq!(strategy.intersection_size(&u, &v), expected);
                prop_assert_eq!(strategy.intersection_size(&v, &u), expected);
            }
        }
    }

    #[test]
    fn test_dense_overlap(start in 0..64i32, len in 0..80i32) {
        let u: Vec<VId> = (0..96).collect();
        let v: Vec<VId> = (start..start + len).collect();
        let expected = (start..start + len).filter(|x| *x < 96).count();
        for &width in LaneWidth::ALL.iter() {
            prop_assert_eq!(IntersectionStrategy::new(width).intersection_size(&u, &v), expected);
        }
    }
}

#[test]
fn test_early_exit_cases() {
    let strategy = IntersectionStrategy::detect();
    let low: Vec<VId> = (0..64).collect();
    let high: Vec<VId> = (64..128).collect();
    assert_eq!(strategy.intersection_size(&low, &high), 0);
    assert_eq!(strategy.intersection_size(&high, &low), 0);
    assert_eq!(strategy.intersection_size(&[], &high), 0);
    assert_eq!(strategy.intersection_size(&[63], &low), 1);
}

#[test]
fn test_detected_width_is_native() {
    let strategy = IntersectionStrategy::detect();
    if strategy.width() != LaneWidth::Scalar {
        assert!(strategy.is_native());
    }
    assert_eq!(LaneWidth::X16.lanes(), 16);
}

#[test]
fn test_neighbor_lists_of_repeated_edges() {
    // Every edge given three times, in both directions: the neighbor lists stay strictly
    // ascending, so every width still counts each common neighbor once.
    let mut edges = vec![];
    for u in 0..40 {
        for v in (u + 1..40).filter(|v| (u + v) % 3 != 0) {
            edges.extend(vec![(u, v), (v, u), (u, v)]);
        }
    }
    let graph = CsrGraph::from_edges(&edges).unwrap();
    for u in graph.vertices() {
        let neigh_u = graph.neighbors_of(u);
        assert!(neigh_u.windows(2).all(|w| w[0] < w[1]));
        for v in graph.vertices() {
            let neigh_v = graph.neighbors_of(v);
            let expected = scalar_intersection(neigh_u, neigh_v);
            for &width in LaneWidth::ALL.iter() {
                assert_eq!(
                    IntersectionStrategy::new(width).intersection_size(neigh_u, neigh_v),
                    expected
                );
            }
        }
    }
}
