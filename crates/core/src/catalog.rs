//! Shape catalog - spawn cells, colors and per-shape rotation tables
//!
//! Every shape owns its own rotation state machine. There is no shared kick
//! table and no kick search: each directed transition moves the four cells by
//! fixed per-cell deltas, and is allowed only if a fixed set of probe cells
//! (the cells the piece would newly occupy) is free.
//!
//! Cells are addressed by index 0..4. Index 0 is the reference cell used when
//! a piece is put back at its spawn position.
//!
//! Probe offsets are relative to the transition's anchor cell, the one cell
//! that stays put (or, for S/Z/L/J, the cell next to the inner corner).

use crate::types::{Color, Direction, Orientation, Pos, Shape};

/// Per-cell translation applied by a rotation.
pub type CellDeltas = [(i8, i8); 4];

/// One directed edge of a shape's rotation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Orientation index after the rotation.
    pub to: u8,
    /// Delta for each of the four cells.
    pub deltas: CellDeltas,
    /// Index of the cell the probes are measured from.
    pub anchor: usize,
    /// Offsets from the anchor that must be unblocked.
    pub probes: &'static [(i8, i8)],
}

/// Transitions for orientations 1..=4, each `[clockwise, counter-clockwise]`.
pub type RotationTable = [[Transition; 2]; 4];

/// Static definition of one shape.
#[derive(Debug, Clone, Copy)]
pub struct ShapeDef {
    pub shape: Shape,
    pub spawn: [Pos; 4],
    pub color: Color,
    /// Preview icon centering offset, in half cells.
    pub preview_offset: (i8, i8),
    /// `None` for shapes that never rotate.
    pub rotations: Option<&'static RotationTable>,
}

const fn t(
    to: u8,
    deltas: CellDeltas,
    anchor: usize,
    probes: &'static [(i8, i8)],
) -> Transition {
    Transition {
        to,
        deltas,
        anchor,
        probes,
    }
}

const fn p(col: i8, row: i8) -> Pos {
    Pos::new(col, row)
}

const Z0: (i8, i8) = (0, 0);

// [1][2][4]
//    [3]
static T_ROTATIONS: RotationTable = [
    [
        t(2, [Z0, Z0, Z0, (-1, -1)], 1, &[(0, -1)]),
        t(4, [(1, 1), Z0, (1, -1), (-1, -1)], 1, &[(0, -1)]),
    ],
    [
        t(3, [Z0, Z0, (1, -1), Z0], 1, &[(1, 0)]),
        t(1, [Z0, Z0, Z0, (1, 1)], 1, &[(1, 0)]),
    ],
    [
        t(4, [(1, 1), Z0, Z0, Z0], 1, &[(0, 1)]),
        t(2, [Z0, Z0, (-1, 1), Z0], 1, &[(0, 1)]),
    ],
    [
        t(1, [(-1, -1), Z0, (-1, 1), (1, 1)], 1, &[(-1, 0)]),
        t(3, [(-1, -1), Z0, Z0, Z0], 1, &[(-1, 0)]),
    ],
];

// [1][2][3][4], pivoting about an edge cell, so three probes in a line.
static I_ROTATIONS: RotationTable = [
    [
        t(2, [(2, 2), (1, 1), Z0, (-1, -1)], 2, &[(0, -1), (0, 1), (0, 2)]),
        t(4, [(1, -1), Z0, (-1, 1), (-2, 2)], 1, &[(0, -1), (0, 1), (0, 2)]),
    ],
    [
        t(3, [(1, -1), Z0, (-1, 1), (-2, 2)], 1, &[(1, 0), (-1, 0), (-2, 0)]),
        t(1, [(-2, -2), (-1, -1), Z0, (1, 1)], 2, &[(1, 0), (-1, 0), (-2, 0)]),
    ],
    [
        t(4, [(-2, -2), (-1, -1), Z0, (1, 1)], 2, &[(0, 1), (0, -1), (0, -2)]),
        t(2, [(-1, 1), Z0, (1, -1), (2, -2)], 1, &[(0, 1), (0, -1), (0, -2)]),
    ],
    [
        t(1, [(-1, 1), Z0, (1, -1), (2, -2)], 1, &[(-1, 0), (1, 0), (2, 0)]),
        t(3, [(2, 2), (1, 1), Z0, (-1, -1)], 2, &[(-1, 0), (1, 0), (2, 0)]),
    ],
];

//    [3][4]
// [1][2]
static S_ROTATIONS: RotationTable = [
    [
        t(2, [(1, -2), (1, 0), Z0, Z0], 3, &[(0, 1), (-1, -1)]),
        t(4, [(2, 1), (1, 0), (0, 1), (-1, 0)], 3, &[(0, 1), (0, 2)]),
    ],
    [
        t(3, [(2, 1), Z0, (0, 1), Z0], 2, &[(0, 1), (2, 0)]),
        t(1, [(-1, 2), (-1, 0), Z0, Z0], 2, &[(0, 1), (-1, 1)]),
    ],
    [
        t(4, [(-1, 2), Z0, Z0, (-1, 0)], 2, &[(0, -1), (1, 1)]),
        t(2, [(-2, -1), Z0, (0, -1), Z0], 2, &[(0, -1), (0, -2)]),
    ],
    [
        t(1, [(-2, -1), (-1, 0), (0, -1), (1, 0)], 1, &[(0, -1), (-2, 0)]),
        t(3, [(1, -2), Z0, Z0, (1, 0)], 1, &[(0, -1), (1, -1)]),
    ],
];

// [1][2]
//    [3][4]
static Z_ROTATIONS: RotationTable = [
    [
        t(2, [(2, -1), Z0, Z0, (0, -1)], 3, &[(0, -1), (0, -2)]),
        t(4, [(1, 2), (0, 1), (1, 0), (0, -1)], 3, &[(0, -1), (-1, 1)]),
    ],
    [
        t(3, [(1, 2), Z0, (1, 0), Z0], 3, &[(0, 1), (1, 1)]),
        t(1, [(-2, 1), Z0, Z0, (0, 1)], 3, &[(0, 1), (-2, 0)]),
    ],
    [
        t(4, [(-2, 1), (0, 1), Z0, Z0], 1, &[(0, 1), (0, 2)]),
        t(2, [(-1, -2), Z0, (-1, 0), Z0], 1, &[(0, 1), (1, -1)]),
    ],
    [
        t(1, [(-1, -2), (0, -1), (-1, 0), (0, 1)], 1, &[(0, -1), (-1, -1)]),
        t(3, [(2, -1), (0, -1), Z0, Z0], 1, &[(0, -1), (2, 0)]),
    ],
];

//       [4]
// [1][2][3]
// The first probe is always the elbow, the second depends on direction.
static L_ROTATIONS: RotationTable = [
    [
        t(2, [(1, -2), Z0, Z0, (-1, 0)], 1, &[(0, -1), (0, -2)]),
        t(4, [(1, -1), (1, 1), Z0, Z0], 1, &[(0, -1), (1, 1)]),
    ],
    [
        t(3, [(1, 1), Z0, (1, -1), Z0], 2, &[(0, -1), (1, -1)]),
        t(1, [(-1, 2), Z0, Z0, (1, 0)], 2, &[(0, -1), (-2, 0)]),
    ],
    [
        t(4, [(-1, 0), (1, 1), (-1, 1), (1, 0)], 0, &[(0, 1), (0, 2)]),
        t(2, [(-1, -1), Z0, (-1, 1), Z0], 0, &[(0, 1), (-1, -1)]),
    ],
    [
        t(1, [(-1, 1), (-1, -1), Z0, Z0], 0, &[(0, 1), (-1, 1)]),
        t(3, [(1, 0), (-1, -1), (1, -1), (-1, 0)], 0, &[(0, 1), (2, 0)]),
    ],
];

// [4]
// [3][2][1]
// Mirror of L with direction inverted: clockwise walks the indices 1→4→3→2.
static J_ROTATIONS: RotationTable = [
    [
        t(4, [(-1, -1), (-1, 1), Z0, Z0], 1, &[(0, -1), (-1, 1)]),
        t(2, [(-1, -2), Z0, Z0, (1, 0)], 1, &[(0, -1), (0, -2)]),
    ],
    [
        t(1, [(1, 2), Z0, Z0, (-1, 0)], 2, &[(0, -1), (2, 0)]),
        t(3, [(-1, 1), Z0, (-1, -1), Z0], 2, &[(0, -1), (-1, -1)]),
    ],
    [
        t(2, [(1, -1), Z0, (1, 1), Z0], 0, &[(0, 1), (1, -1)]),
        t(4, [(1, 0), (-1, 1), (1, 1), (-1, 0)], 0, &[(0, 1), (0, 2)]),
    ],
    [
        t(3, [(-1, 0), (1, -1), (-1, -1), (1, 0)], 0, &[(0, 1), (-2, 0)]),
        t(1, [(1, 1), (1, -1), Z0, Z0], 0, &[(0, 1), (1, 1)]),
    ],
];

static CATALOG: [ShapeDef; 7] = [
    ShapeDef {
        shape: Shape::I,
        spawn: [p(3, 0), p(4, 0), p(5, 0), p(6, 0)],
        color: Color::Cyan,
        preview_offset: (-1, -1),
        rotations: Some(&I_ROTATIONS),
    },
    ShapeDef {
        shape: Shape::O,
        spawn: [p(4, 0), p(5, 0), p(4, 1), p(5, 1)],
        color: Color::Yellow,
        preview_offset: (1, -2),
        rotations: None,
    },
    ShapeDef {
        shape: Shape::T,
        spawn: [p(3, 0), p(4, 0), p(4, 1), p(5, 0)],
        color: Color::Purple,
        preview_offset: (0, -2),
        rotations: Some(&T_ROTATIONS),
    },
    ShapeDef {
        shape: Shape::S,
        spawn: [p(3, 1), p(4, 1), p(4, 0), p(5, 0)],
        color: Color::LightGreen,
        preview_offset: (0, 0),
        rotations: Some(&S_ROTATIONS),
    },
    ShapeDef {
        shape: Shape::Z,
        spawn: [p(3, 0), p(4, 0), p(4, 1), p(5, 1)],
        color: Color::Red,
        preview_offset: (0, -2),
        rotations: Some(&Z_ROTATIONS),
    },
    ShapeDef {
        shape: Shape::J,
        spawn: [p(5, 1), p(4, 1), p(3, 1), p(3, 0)],
        color: Color::Blue,
        preview_offset: (4, 0),
        rotations: Some(&J_ROTATIONS),
    },
    ShapeDef {
        shape: Shape::L,
        spawn: [p(3, 1), p(4, 1), p(5, 1), p(5, 0)],
        color: Color::Orange,
        preview_offset: (0, 0),
        rotations: Some(&L_ROTATIONS),
    },
];

/// Look up the static definition of a shape.
pub fn shape_def(shape: Shape) -> &'static ShapeDef {
    let idx = match shape {
        Shape::I => 0,
        Shape::O => 1,
        Shape::T => 2,
        Shape::S => 3,
        Shape::Z => 4,
        Shape::J => 5,
        Shape::L => 6,
    };
    &CATALOG[idx]
}

/// Spawn cells of a shape, in cell-index order.
pub fn spawn_cells(shape: Shape) -> [Pos; 4] {
    shape_def(shape).spawn
}

pub fn color_of(shape: Shape) -> Color {
    shape_def(shape).color
}

/// The transition taken from `orientation` in `direction`, or `None` if the
/// shape does not rotate.
pub fn transition(
    shape: Shape,
    orientation: Orientation,
    direction: Direction,
) -> Option<&'static Transition> {
    let table = shape_def(shape).rotations?;
    let dir = match direction {
        Direction::Clockwise => 0,
        Direction::CounterClockwise => 1,
    };
    Some(&table[(orientation.index() - 1) as usize][dir])
}

/// Spawn cells shifted by `(dcol, drow)`.
pub fn cells_at(shape: Shape, dcol: i8, drow: i8) -> [Pos; 4] {
    spawn_cells(shape).map(|c| c.offset(dcol, drow))
}
