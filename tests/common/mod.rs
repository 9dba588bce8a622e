#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, PinState};
use sevenseg::{LineProvider, Wiring, RPI_SEGMENT_LINES, SEGMENT_COUNT};

pub const LINES: [u32; SEGMENT_COUNT] = RPI_SEGMENT_LINES;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Acquire(u32, bool),
    Set(u32, bool),
    Release(u32),
}

#[derive(Default)]
struct BoardState {
    high: HashSet<u32>,
    claimed: HashSet<u32>,
    unavailable: HashSet<u32>,
    failing: HashSet<u32>,
    events: Vec<Event>,
}

/// Pin bank that records every acquire, write and release.
#[derive(Clone, Default)]
pub struct MockBoard(Arc<Mutex<BoardState>>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Busy(pub u32);

pub struct MockLine {
    id: u32,
    board: MockBoard,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines that are already claimed by someone else.
    pub fn with_unavailable(ids: &[u32]) -> Self {
        let board = Self::new();
        board.0.lock().unwrap().unavailable.extend(ids);
        board
    }

    pub fn fail_writes_on(&self, id: u32) {
        self.0.lock().unwrap().failing.insert(id);
    }

    pub fn is_high(&self, id: u32) -> bool {
        self.0.lock().unwrap().high.contains(&id)
    }

    /// Pin levels of `ids` as 0/1, in order.
    pub fn levels(&self, ids: &[u32; SEGMENT_COUNT]) -> [u8; SEGMENT_COUNT] {
        let state = self.0.lock().unwrap();
        ids.map(|id| state.high.contains(&id) as u8)
    }

    pub fn claimed(&self) -> usize {
        self.0.lock().unwrap().claimed.len()
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().events.clone()
    }

    pub fn clear_events(&self) {
        self.0.lock().unwrap().events.clear();
    }

    fn set(&self, id: u32, high: bool) -> Result<(), ErrorKind> {
        let mut state = self.0.lock().unwrap();
        assert!(state.claimed.contains(&id), "write to unclaimed line {id}");
        if state.failing.contains(&id) {
            return Err(ErrorKind::Other);
        }
        if high {
            state.high.insert(id);
        } else {
            state.high.remove(&id);
        }
        state.events.push(Event::Set(id, high));
        Ok(())
    }
}

impl ErrorType for MockLine {
    type Error = ErrorKind;
}

impl OutputPin for MockLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.board.set(self.id, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.board.set(self.id, true)
    }
}

impl LineProvider for MockBoard {
    type Id = u32;
    type Line = MockLine;
    type Error = Busy;

    fn acquire(&mut self, id: u32, initial: PinState) -> Result<MockLine, Busy> {
        let mut state = self.0.lock().unwrap();
        if state.unavailable.contains(&id) || !state.claimed.insert(id) {
            return Err(Busy(id));
        }
        let high = initial == PinState::High;
        if high {
            state.high.insert(id);
        } else {
            state.high.remove(&id);
        }
        state.events.push(Event::Acquire(id, high));
        Ok(MockLine {
            id,
            board: self.clone(),
        })
    }

    fn release(&mut self, line: MockLine) {
        let mut state = self.0.lock().unwrap();
        assert!(state.claimed.remove(&line.id), "line {} released twice", line.id);
        state.events.push(Event::Release(line.id));
    }
}

pub fn wiring() -> Wiring<u32> {
    Wiring::new(LINES)
}
