//! Hand-tuned Priority-Grid layouts for 1 to 11 zones, stored as legacy
//! binary grid blobs. Each favors a larger primary zone.

pub const PRIORITY_GRID_BLOBS: [&[u8]; 11] = [
    &[0, 0, 0, 0, 0, 1, 1, 39, 16, 39, 16, 0],
    &[0, 0, 0, 0, 0, 1, 2, 39, 16, 26, 11, 13, 5, 0, 1],
    &[0, 0, 0, 0, 0, 1, 3, 39, 16, 9, 196, 19, 136, 9, 196, 0, 1, 2],
    &[
        0, 0, 0, 0, 0, 2, 3, 19, 136, 19, 136, 9, 196, 19, 136, 9, 196, 0, 1, 2, 0, 1, 3,
    ],
    &[
        0, 0, 0, 0, 0, 2, 3, 19, 136, 19, 136, 9, 196, 19, 136, 9, 196, 0, 1, 2, 3, 1, 4,
    ],
    &[
        0, 0, 0, 0, 0, 3, 3, 13, 5, 13, 6, 13, 5, 9, 196, 19, 136, 9, 196, 0, 1, 2, 0, 1, 3, 4, 1,
        5,
    ],
    &[
        0, 0, 0, 0, 0, 3, 3, 13, 5, 13, 6, 13, 5, 9, 196, 19, 136, 9, 196, 0, 1, 2, 3, 1, 4, 5, 1,
        6,
    ],
    &[
        0, 0, 0, 0, 0, 3, 4, 13, 5, 13, 6, 13, 5, 9, 196, 9, 196, 9, 196, 9, 196, 0, 1, 2, 3, 4, 1,
        2, 5, 6, 1, 2, 7,
    ],
    &[
        0, 0, 0, 0, 0, 3, 4, 13, 5, 13, 6, 13, 5, 9, 196, 9, 196, 9, 196, 9, 196, 0, 1, 2, 3, 4, 1,
        2, 5, 6, 1, 7, 8,
    ],
    &[
        0, 0, 0, 0, 0, 3, 4, 13, 5, 13, 6, 13, 5, 9, 196, 9, 196, 9, 196, 9, 196, 0, 1, 2, 3, 4, 1,
        5, 6, 7, 1, 8, 9,
    ],
    &[
        0, 0, 0, 0, 0, 3, 4, 13, 5, 13, 6, 13, 5, 9, 196, 9, 196, 9, 196, 9, 196, 0, 1, 2, 3, 4, 1,
        5, 6, 7, 8, 9, 10,
    ],
];
