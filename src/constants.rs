pub const SEGMENT_COUNT: usize = 7;
pub const DIGIT_COUNT: usize = 10;
pub const BLANK_CHAR: u8 = b'-';

/// BCM line numbers of the Raspberry Pi board the display was first wired to,
/// in pattern index order.
pub const RPI_SEGMENT_LINES: [u32; SEGMENT_COUNT] = [5, 17, 22, 23, 24, 25, 27];

// Wiring specific ordering, do not reorder to textbook abcdefg without
// checking against the board.
pub const SEGMENT_TABLE: [[u8; SEGMENT_COUNT]; DIGIT_COUNT] = [
    [1, 1, 0, 1, 1, 1, 1], // 0
    [0, 0, 0, 1, 0, 0, 1], // 1
    [0, 1, 1, 0, 1, 1, 1], // 2
    [1, 1, 1, 0, 1, 1, 0], // 3
    [1, 0, 1, 1, 1, 0, 0], // 4
    [1, 1, 1, 1, 0, 1, 0], // 5
    [1, 1, 1, 1, 0, 1, 1], // 6
    [1, 0, 0, 0, 1, 1, 0], // 7
    [1, 1, 1, 1, 1, 1, 1], // 8
    [1, 1, 1, 1, 1, 1, 0], // 9
];

// Value stored in the shared display's atomic mirror when nothing is shown.
pub(crate) const BLANK_RAW: u8 = 0xFF;
