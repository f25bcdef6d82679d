//! The snake's body as an arena of linked segments
//!
//! Segments live in a `Vec` and link to their neighbours by index. Segments
//! are never removed individually (a restart replaces the whole chain), so an
//! index stays valid for the life of the chain.
//!
//! Every move updates the chain head to tail in one pass: each segment
//! records where it was (`prev_pos`) and takes the spot its predecessor held
//! before this move.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::grid::Grid;
use crate::error::{SnekError, SnekResult};

/// Stable handle to a segment in its chain's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(usize);

impl SegmentId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One unit of the snake's body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub pos: IVec2,
    /// Position held before the last move (`None` until the first move)
    pub prev_pos: Option<IVec2>,
    /// Neighbour toward the head
    pub prev: Option<SegmentId>,
    /// Neighbour toward the tail
    pub next: Option<SegmentId>,
}

impl Segment {
    fn new(pos: IVec2) -> Self {
        Self {
            pos,
            prev_pos: None,
            prev: None,
            next: None,
        }
    }
}

/// Where the head would go next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextHead {
    Candidate(IVec2),
    /// The step would put the head onto the segment right behind it
    Reversal,
}

/// Result of trying to move the chain one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved {
        new_head: IVec2,
        old_head: IVec2,
        old_tail: IVec2,
    },
    /// Reversal; the chain was not touched
    Rejected,
}

/// Ordered head-to-tail chain of segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentChain {
    segments: Vec<Segment>,
    head: SegmentId,
    tail: SegmentId,
}

impl SegmentChain {
    /// Single-segment chain at `pos`
    pub fn new_at(pos: IVec2) -> Self {
        Self {
            segments: vec![Segment::new(pos)],
            head: SegmentId(0),
            tail: SegmentId(0),
        }
    }

    /// Place a head at a random spot in the upper-left third of the board
    ///
    /// The draw range is √(cells / 3) per axis. The y range is further capped
    /// so `starting_length - 1` segments fit below the head.
    pub fn create_head<R: Rng + ?Sized>(
        grid: &Grid,
        starting_length: usize,
        rng: &mut R,
    ) -> SnekResult<Self> {
        let span = ((grid.cell_count() / 3) as f64).sqrt().floor() as i32;
        let room_below = grid.rows() - (starting_length.max(1) as i32 - 1);
        let y_span = span.min(room_below);
        if span < 1 || y_span < 1 {
            return Err(SnekError::InvalidConfiguration(
                "board is too small for the starting snake",
            ));
        }

        let x = rng.random_range(0..span);
        let y = rng.random_range(0..y_span);
        Ok(Self::new_at(IVec2::new(x, y)))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head_id(&self) -> SegmentId {
        self.head
    }

    pub fn tail_id(&self) -> SegmentId {
        self.tail
    }

    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }

    pub fn head(&self) -> &Segment {
        self.segment(self.head)
    }

    pub fn tail(&self) -> &Segment {
        self.segment(self.tail)
    }

    /// Segment right behind the head
    pub fn neck(&self) -> Option<&Segment> {
        self.head().next.map(|id| self.segment(id))
    }

    /// Segments from head to tail
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            chain: self,
            cursor: Some(self.head),
        }
    }

    pub fn positions(&self) -> Vec<IVec2> {
        self.iter().map(|s| s.pos).collect()
    }

    pub fn occupies(&self, pos: IVec2) -> bool {
        self.iter().any(|s| s.pos == pos)
    }

    pub fn next_head_position(&self, direction: Direction) -> NextHead {
        let candidate = self.head().pos + direction.delta();
        match self.neck() {
            Some(neck) if neck.pos == candidate => NextHead::Reversal,
            _ => NextHead::Candidate(candidate),
        }
    }

    /// Move the head one step and pull every other segment along
    pub fn advance(&mut self, direction: Direction) -> MoveResult {
        let new_head = match self.next_head_position(direction) {
            NextHead::Candidate(pos) => pos,
            NextHead::Reversal => return MoveResult::Rejected,
        };
        let old_head = self.head().pos;
        let old_tail = self.tail().pos;

        // `target` is the position the segment ahead held before this move
        let mut target = new_head;
        let mut cursor = Some(self.head);
        while let Some(id) = cursor {
            let segment = &mut self.segments[id.0];
            let vacated = segment.pos;
            segment.prev_pos = Some(vacated);
            segment.pos = target;
            target = vacated;
            cursor = segment.next;
        }

        MoveResult::Moved {
            new_head,
            old_head,
            old_tail,
        }
    }

    /// Add one segment behind the tail
    ///
    /// Setup growth (`stationary_first_growth`) extends the line away from
    /// the head, straight down for a lone head. In-play growth reuses the cell
    /// the tail just left. Either way the new cell must be on the board and
    /// not already part of the chain.
    pub fn append_tail(&mut self, stationary_first_growth: bool, grid: &Grid) -> SnekResult<SegmentId> {
        let tail = self.tail();
        let away = match tail.prev {
            Some(pred) => tail.pos - self.segment(pred).pos,
            None => tail
                .prev_pos
                .filter(|_| !stationary_first_growth)
                .map(|prev| prev - tail.pos)
                .unwrap_or(Direction::Down.delta()),
        };

        let mut candidates = Vec::with_capacity(4);
        if !stationary_first_growth {
            candidates.extend(tail.prev_pos);
        }
        candidates.push(tail.pos + away);
        candidates.push(tail.pos + away.perp());
        candidates.push(tail.pos - away.perp());

        let pos = candidates
            .into_iter()
            .find(|&pos| grid.contains(pos) && !self.occupies(pos))
            .ok_or(SnekError::NoRoomToGrow)?;

        let id = SegmentId(self.segments.len());
        let mut segment = Segment::new(pos);
        segment.prev = Some(self.tail);
        self.segments.push(segment);
        self.segments[self.tail.0].next = Some(id);
        self.tail = id;
        Ok(id)
    }
}

/// Head-to-tail iterator following `next` links
pub struct ChainIter<'a> {
    chain: &'a SegmentChain,
    cursor: Option<SegmentId>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.chain.segment(self.cursor?);
        self.cursor = segment.next;
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid() -> Grid {
        Grid::new(1764).unwrap()
    }

    /// Vertical snake with the head on top
    fn chain_of(grid: &Grid, len: usize, head: IVec2) -> SegmentChain {
        let mut chain = SegmentChain::new_at(head);
        while chain.len() < len {
            chain.append_tail(true, grid).unwrap();
        }
        chain
    }

    #[test]
    fn test_setup_growth_extends_below_head() {
        let chain = chain_of(&grid(), 4, IVec2::new(10, 10));
        assert_eq!(
            chain.positions(),
            vec![
                IVec2::new(10, 10),
                IVec2::new(10, 11),
                IVec2::new(10, 12),
                IVec2::new(10, 13)
            ]
        );
        assert_eq!(chain.head().prev, None);
        assert_eq!(chain.tail().next, None);
    }

    #[test]
    fn test_single_segment_is_head_and_tail() {
        let chain = SegmentChain::new_at(IVec2::new(3, 3));
        assert_eq!(chain.head_id(), chain.tail_id());
        assert!(chain.neck().is_none());
        assert_eq!(
            chain.next_head_position(Direction::Down),
            NextHead::Candidate(IVec2::new(3, 4))
        );
    }

    #[test]
    fn test_create_head_stays_in_inner_third() {
        let grid = grid();
        let span = ((1764 / 3) as f64).sqrt().floor() as i32;
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let chain = SegmentChain::create_head(&grid, 4, &mut rng).unwrap();
            let pos = chain.head().pos;
            assert!((0..span).contains(&pos.x));
            assert!((0..span).contains(&pos.y));
        }
    }

    #[test]
    fn test_create_head_rejects_tiny_board() {
        let grid = Grid::new(4).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(matches!(
            SegmentChain::create_head(&grid, 4, &mut rng),
            Err(SnekError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut chain = chain_of(&grid(), 4, IVec2::new(10, 10));
        let before = chain.clone();

        assert_eq!(chain.next_head_position(Direction::Down), NextHead::Reversal);
        assert_eq!(chain.advance(Direction::Down), MoveResult::Rejected);
        assert_eq!(chain, before);
    }

    #[test]
    fn test_advance_follows_predecessor() {
        let mut chain = chain_of(&grid(), 4, IVec2::new(10, 10));
        let before = chain.positions();

        let result = chain.advance(Direction::Right);
        assert_eq!(
            result,
            MoveResult::Moved {
                new_head: IVec2::new(11, 10),
                old_head: IVec2::new(10, 10),
                old_tail: IVec2::new(10, 13),
            }
        );

        let after = chain.positions();
        assert_eq!(after[0], IVec2::new(11, 10));
        assert_eq!(&after[1..], &before[..3]);
        for (segment, old) in chain.iter().zip(&before) {
            assert_eq!(segment.prev_pos, Some(*old));
        }
    }

    #[test]
    fn test_in_play_growth_uses_vacated_cell() {
        let grid = grid();
        let mut chain = chain_of(&grid, 3, IVec2::new(10, 10));
        chain.advance(Direction::Left);

        let id = chain.append_tail(false, &grid).unwrap();
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.tail_id(), id);
        assert_eq!(chain.tail().pos, IVec2::new(10, 12));
    }

    #[test]
    fn test_growth_at_board_edge_turns_aside() {
        let grid = Grid::new(16).unwrap();
        // Head at the bottom row: nothing fits below, so growth goes sideways
        let mut chain = SegmentChain::new_at(IVec2::new(1, 3));
        chain.append_tail(true, &grid).unwrap();
        let tail = chain.tail().pos;
        assert!(grid.contains(tail));
        assert_eq!((tail - IVec2::new(1, 3)).abs().element_sum(), 1);
    }

    #[test]
    fn test_no_room_to_grow() {
        let grid = Grid::new(1).unwrap();
        let mut chain = SegmentChain::new_at(IVec2::ZERO);
        assert!(matches!(
            chain.append_tail(true, &grid),
            Err(SnekError::NoRoomToGrow)
        ));
        assert_eq!(chain.len(), 1);
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_chain_lag_holds(dirs in prop::collection::vec(direction_strategy(), 1..60)) {
            let grid = Grid::new(1_000_000).unwrap();
            let mut chain = chain_of(&grid, 6, IVec2::new(500, 500));
            for dir in dirs {
                let before = chain.positions();
                match chain.advance(dir) {
                    MoveResult::Moved { new_head, .. } => {
                        let after = chain.positions();
                        prop_assert_eq!(after[0], new_head);
                        prop_assert_eq!(new_head - before[0], dir.delta());
                        prop_assert_eq!(&after[1..], &before[..before.len() - 1]);
                    }
                    MoveResult::Rejected => {
                        prop_assert_eq!(chain.positions(), before);
                    }
                }
            }
        }

        #[test]
        fn prop_growth_adds_one_free_segment(
            dirs in prop::collection::vec(direction_strategy(), 0..30),
            grows in 1usize..6,
        ) {
            let grid = Grid::new(10_000).unwrap();
            let mut chain = chain_of(&grid, 4, IVec2::new(50, 50));
            for dir in dirs {
                chain.advance(dir);
            }
            for _ in 0..grows {
                let before = chain.positions();
                match chain.append_tail(false, &grid) {
                    Ok(_) => {
                        prop_assert_eq!(chain.len(), before.len() + 1);
                        prop_assert!(!before.contains(&chain.tail().pos));
                    }
                    Err(_) => prop_assert_eq!(chain.positions(), before),
                }
            }
        }
    }
}
