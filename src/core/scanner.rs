// Single forward pass over the record stream

use crate::core::constants::*;
use crate::core::error::{FormatError, PtfError, Result};
use crate::core::format::{DataBlock, KeyGroup, TimeRecordIndex};
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, trace, warn};

/// The five records of a KEY group, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyStage {
    Counts,
    Names,
    Positions,
    Units,
    Items,
}

/// What the next record means, given the records before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    AfterTitle,
    AfterKey(KeyStage),
    AfterData,
}

impl ScanState {
    fn on_tag(tag: &[u8; 4]) -> Self {
        match tag {
            TITLE_TAG => ScanState::AfterTitle,
            KEY_TAG => ScanState::AfterKey(KeyStage::Counts),
            DATA_TAG => ScanState::AfterData,
            _ => ScanState::Idle,
        }
    }

    /// State after one payload record has been consumed in this state.
    fn advance(self) -> Self {
        match self {
            ScanState::AfterKey(KeyStage::Counts) => ScanState::AfterKey(KeyStage::Names),
            ScanState::AfterKey(KeyStage::Names) => ScanState::AfterKey(KeyStage::Positions),
            ScanState::AfterKey(KeyStage::Positions) => ScanState::AfterKey(KeyStage::Units),
            ScanState::AfterKey(KeyStage::Units) => ScanState::AfterKey(KeyStage::Items),
            ScanState::AfterKey(KeyStage::Items)
            | ScanState::AfterTitle
            | ScanState::AfterData
            | ScanState::Idle => ScanState::Idle,
        }
    }
}

/// Everything the scan learns about a file.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub title: Option<String>,
    pub key: KeyGroup,
    pub index: TimeRecordIndex,
}

pub struct Scanner<'a, R> {
    reader: &'a mut R,
    stream_len: u64,
    position: u64,
    verify_trailers: bool,
}

impl<'a, R: Read + Seek> Scanner<'a, R> {
    pub fn new(reader: &'a mut R, verify_trailers: bool) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self {
            reader,
            stream_len,
            position: 0,
            verify_trailers,
        })
    }

    pub fn scan(mut self) -> Result<ScanOutput> {
        let mut state = ScanState::Idle;
        let mut title = None;
        let mut key: Option<KeyGroup> = None;
        let mut partial_key = KeyGroup::default();
        let mut blocks = Vec::new();
        let mut record_count = 0usize;

        while let Some((record_offset, len)) = self.next_prefix(record_count == 0)? {
            record_count += 1;
            let payload_offset = self.position;

            match state {
                ScanState::Idle if len == TAG_SIZE => {
                    let tag = self.read_tag()?;
                    debug!("Tag {:?} at offset {}", String::from_utf8_lossy(&tag), record_offset);
                    if &tag == KEY_TAG && key.is_some() {
                        return Err(FormatError::MultipleKeyGroups { offset: record_offset }.into());
                    }
                    state = ScanState::on_tag(&tag);
                    self.finish_record(record_offset, len)?;
                    continue;
                }
                ScanState::Idle => self.skip_payload(len)?,
                ScanState::AfterTitle => {
                    let payload = self.read_payload(record_offset, len)?;
                    title = Some(decode_text(&payload).trim().to_string());
                }
                ScanState::AfterData => {
                    trace!("Data block {} at offset {} ({} bytes)", blocks.len(), payload_offset, len);
                    blocks.push(DataBlock {
                        offset: payload_offset,
                        len: u64::from(len),
                    });
                    self.skip_payload(len)?;
                }
                ScanState::AfterKey(stage) => {
                    let payload = self.read_payload(record_offset, len)?;
                    decode_key_record(stage, &payload, record_offset, &mut partial_key)?;
                    if stage == KeyStage::Items {
                        debug!(
                            "KEY group: {} groups, {} items",
                            partial_key.group_count, partial_key.total_item_count
                        );
                        key = Some(std::mem::take(&mut partial_key));
                    }
                }
            }

            self.finish_record(record_offset, len)?;
            state = state.advance();
        }

        if record_count == 0 {
            return Err(FormatError::TruncatedRecord { offset: 0 }.into());
        }
        if state != ScanState::Idle {
            // the stream ended inside a group
            return Err(FormatError::TruncatedRecord { offset: self.position }.into());
        }
        let key = key.ok_or(FormatError::MissingKeyGroup)?;

        Ok(ScanOutput {
            title,
            key,
            index: TimeRecordIndex::new(blocks),
        })
    }

    /// Reads the next length prefix. `None` on a clean end of stream.
    fn next_prefix(&mut self, first: bool) -> Result<Option<(u64, u32)>> {
        let record_offset = self.position;
        if record_offset == self.stream_len {
            return Ok(None);
        }
        let raw = self.read_u32_raw(record_offset)?;
        let len = u32::from_le_bytes(raw);

        // every file opens with a tag record
        if first && len != TAG_SIZE && u32::from_be_bytes(raw) == TAG_SIZE {
            return Err(FormatError::UnsupportedByteOrder.into());
        }

        let needed = u64::from(len) + LENGTH_FIELD_SIZE;
        if self.stream_len - self.position < needed {
            return Err(FormatError::TruncatedRecord { offset: record_offset }.into());
        }
        Ok(Some((record_offset, len)))
    }

    fn read_u32_raw(&mut self, record_offset: u64) -> Result<[u8; 4]> {
        if self.stream_len - self.position < LENGTH_FIELD_SIZE {
            return Err(FormatError::TruncatedRecord { offset: record_offset }.into());
        }
        let mut buf = [0u8; 4];
        self.reader.read_exact(&mut buf)?;
        self.position += LENGTH_FIELD_SIZE;
        Ok(buf)
    }

    fn read_tag(&mut self) -> Result<[u8; 4]> {
        let mut tag = [0u8; 4];
        self.reader.read_exact(&mut tag)?;
        self.position += u64::from(TAG_SIZE);
        Ok(tag)
    }

    // Payload bounds were checked against the stream length by next_prefix.
    fn read_payload(&mut self, record_offset: u64, len: u32) -> Result<Vec<u8>> {
        let mut payload = vec![0u8; len as usize];
        self.reader.read_exact(&mut payload).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                PtfError::from(FormatError::TruncatedRecord { offset: record_offset })
            } else {
                PtfError::from(e)
            }
        })?;
        self.position += u64::from(len);
        Ok(payload)
    }

    fn skip_payload(&mut self, len: u32) -> Result<()> {
        self.reader.seek_relative(i64::from(len))?;
        self.position += u64::from(len);
        Ok(())
    }

    fn finish_record(&mut self, record_offset: u64, len: u32) -> Result<()> {
        let trailer = u32::from_le_bytes(self.read_u32_raw(record_offset)?);
        if trailer != len {
            if self.verify_trailers {
                return Err(FormatError::LengthMismatch {
                    offset: record_offset,
                    expected: u64::from(len),
                    found: u64::from(trailer),
                }
                .into());
            }
            warn!(
                "Record at offset {}: trailer {} does not match prefix {}",
                record_offset, trailer, len
            );
        }
        Ok(())
    }
}

fn decode_key_record(stage: KeyStage, payload: &[u8], offset: u64, key: &mut KeyGroup) -> Result<()> {
    let group_count = key.group_count as usize;
    match stage {
        KeyStage::Counts => {
            expect_len(payload, KEY_HEADER_SIZE as usize, offset)?;
            let counts = decode_u32s(payload);
            key.group_count = counts[0];
            key.total_item_count = counts[1];
        }
        KeyStage::Names => {
            if group_count == 0 {
                expect_len(payload, 0, offset)?;
            } else {
                expect_len(payload, payload.len() - payload.len() % group_count, offset)?;
                let width = payload.len() / group_count;
                key.names = decode_strings(payload, width);
            }
        }
        KeyStage::Positions => {
            expect_len(payload, 4 * group_count, offset)?;
            key.positions = decode_u32s(payload);
        }
        KeyStage::Units => {
            expect_len(payload, UNIT_WIDTH * group_count, offset)?;
            key.units = decode_strings(payload, UNIT_WIDTH);
        }
        KeyStage::Items => {
            expect_len(payload, 4 * key.total_item_count as usize, offset)?;
            key.items = decode_u32s(payload);
        }
    }
    Ok(())
}

fn expect_len(payload: &[u8], expected: usize, offset: u64) -> Result<()> {
    if payload.len() != expected {
        return Err(FormatError::LengthMismatch {
            offset,
            expected: expected as u64,
            found: payload.len() as u64,
        }
        .into());
    }
    Ok(())
}

fn decode_u32s(payload: &[u8]) -> Vec<u32> {
    payload
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn decode_strings(payload: &[u8], width: usize) -> Vec<String> {
    payload
        .chunks_exact(width.max(1))
        .map(decode_text)
        .collect()
}

// Plot file text is 8-bit and padded with blanks or NULs.
fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}
