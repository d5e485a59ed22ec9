use quickcheck::Arbitrary;

use crate::{Location, Piece};

/// The pieces for a game and a sequence of choices among the legal moves.
#[derive(Clone, Debug)]
pub struct MoveSequence {
    pub pieces: [Piece; 2],
    /// Each entry selects a legal move, modulo the number of legal moves.
    pub choices: Vec<u8>,
}

impl quickcheck::Arbitrary for MoveSequence {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let len = usize::arbitrary(g) % 300;
        Self {
            pieces: [Piece::arbitrary(g), Piece::arbitrary(g)],
            choices: (0..len).map(|_| u8::arbitrary(g)).collect(),
        }
    }
}

impl quickcheck::Arbitrary for Piece {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&Piece::ALL).unwrap()
    }
}

impl quickcheck::Arbitrary for Location {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // Mostly on the board, sometimes just off of it
        let row = (u8::arbitrary(g) % 10) as i8 - 1;
        let col = (u8::arbitrary(g) % 10) as i8 - 1;
        Location::new(row, col)
    }
}
