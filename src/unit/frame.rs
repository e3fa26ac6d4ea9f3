//! Unit file framing
//!
//! A unit file is a header line followed by one JSON line holding the unit.
//! Writers go through `begin`, `write`, `end`; readers through `begin`,
//! `read`, `end`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use thiserror::Error;

pub const FRAME_MAGIC: &str = "unitstore-unit";
pub const FRAME_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed unit: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad frame header: {0}")]
    BadHeader(String),

    #[error("unexpected end of unit file")]
    Truncated,
}

#[derive(Debug, Serialize, Deserialize)]
struct FrameHeader {
    magic: String,
    version: u32,
}

pub struct FrameWriter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> FrameWriter<W> {
    pub fn begin(out: W) -> Result<Self, CodecError> {
        let mut out = BufWriter::new(out);
        let header = FrameHeader {
            magic: FRAME_MAGIC.to_string(),
            version: FRAME_VERSION,
        };
        serde_json::to_writer(&mut out, &header)?;
        out.write_all(b"\n")?;
        Ok(Self { out })
    }

    pub fn write<U: Serialize>(&mut self, unit: &U) -> Result<(), CodecError> {
        serde_json::to_writer(&mut self.out, unit)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn end(self) -> Result<W, CodecError> {
        self.out.into_inner().map_err(|e| CodecError::Io(e.into_error()))
    }
}

pub struct FrameReader<R: Read> {
    input: BufReader<R>,
    line: String,
}

impl<R: Read> FrameReader<R> {
    pub fn begin(input: R) -> Result<Self, CodecError> {
        let mut reader = Self {
            input: BufReader::new(input),
            line: String::new(),
        };

        let line = reader.next_line()?;
        let header: FrameHeader =
            serde_json::from_str(line).map_err(|e| CodecError::BadHeader(e.to_string()))?;
        if header.magic != FRAME_MAGIC {
            return Err(CodecError::BadHeader(format!("magic {:?}", header.magic)));
        }
        if header.version != FRAME_VERSION {
            return Err(CodecError::BadHeader(format!(
                "version {} (expected {})",
                header.version, FRAME_VERSION
            )));
        }

        Ok(reader)
    }

    pub fn read<U: DeserializeOwned>(&mut self) -> Result<U, CodecError> {
        let line = self.next_line()?;
        Ok(serde_json::from_str(line)?)
    }

    pub fn end(self) -> R {
        self.input.into_inner()
    }

    fn next_line(&mut self) -> Result<&str, CodecError> {
        self.line.clear();
        if self.input.read_line(&mut self.line)? == 0 {
            return Err(CodecError::Truncated);
        }
        Ok(self.line.trim_end())
    }
}
