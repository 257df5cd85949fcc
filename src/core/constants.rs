// Format constants for MELCOR plot files

// Record framing: [u32 length][payload][u32 length]
pub const LENGTH_FIELD_SIZE: u64 = 4;

// A record whose payload is exactly this long is a tag
pub const TAG_SIZE: u32 = 4;

pub const TITLE_TAG: &[u8; 4] = b"TITL";
pub const KEY_TAG: &[u8; 4] = b"KEY ";
pub const DATA_TAG: &[u8; 4] = b".TR/";

// KEY record 1: group_count(u32) total_item_count(u32)
pub const KEY_HEADER_SIZE: u32 = 4 + 4;

// KEY record 4: one fixed-width unit string per group
pub const UNIT_WIDTH: usize = 16;

// Every catalog entry is one f32 inside a data block
pub const SAMPLE_SIZE: u64 = 4;

// Catalog entries that precede the KEY group variables, with their units
pub const FIXED_ENTRIES: [(&str, &str); 4] = [("TIME", "sec"), ("CPU", ""), ("DT", ""), ("UNKN03", "")];

pub const TIME_INDEX: usize = 0;

pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
