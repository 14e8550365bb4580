/// DMX512 null start code; every frame begins with it.
pub const START_CODE: u8 = 0x00;
pub const START_CODE_OFFSET: usize = 0;
pub const DATA_OFFSET: usize = 1;
/// Slots carried by one universe.
pub const DMX_MAX_SLOTS: usize = 512;
