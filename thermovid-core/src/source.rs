// ============================================================================
// thermovid-core/src/source.rs
// ============================================================================
//
// FRAME SOURCE: Recording Metadata and Frame Iteration
//
// This module defines the frame source abstraction consumed by the pipeline
// and a concrete reader for the .tseq frame-sequence container. The source
// is lazy, finite and forward-only: frames are produced in temporal order
// and a source cannot be restarted mid-pipeline.
//
// The abstraction follows the dependency injection pattern used elsewhere in
// this workspace: the pipeline is generic over FrameSource so tests can
// drive it with synthetic sequences instead of files on disk.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use crate::config::DEFAULT_FRAME_RATE;
use crate::error::{CoreResult, source_read_error};

// ============================================================================
// FRAME AND SEQUENCE TYPES
// ============================================================================

/// One raw thermal frame: a row-major grid of float32 values in the
/// recording's temperature units. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl Frame {
    /// Builds a frame, checking that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> CoreResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                crate::error::CoreError::Other(format!(
                    "frame dimensions {width}x{height} overflow"
                ))
            })?;
        if values.len() != expected {
            return Err(crate::error::CoreError::Other(format!(
                "frame buffer has {} values, expected {}x{} = {}",
                values.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major raw values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Smallest value in the frame. NaN values are ignored.
    pub fn min(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Largest value in the frame. NaN values are ignored.
    pub fn max(&self) -> f32 {
        self.values
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Metadata describing one recording, available before any frame is read.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceInfo {
    /// Capture start time.
    pub timestamp: DateTime<Utc>,

    /// Device identifier, when the recorder wrote one.
    pub device_name: Option<String>,

    /// Frame dimensions, constant for the whole sequence.
    pub width: u32,
    pub height: u32,

    /// Capture frame rate in frames per second.
    pub frame_rate: u32,
}

// ============================================================================
// FRAME SOURCE TRAIT
// ============================================================================

/// A lazy, finite, forward-only sequence of thermal frames.
pub trait FrameSource {
    /// Sequence metadata. Valid before the first call to `next_frame`.
    fn info(&self) -> &SequenceInfo;

    /// Produces the next frame in temporal order, or `None` when the
    /// sequence is exhausted. Errors are not recoverable: the source must
    /// not be used again after a read failure.
    fn next_frame(&mut self) -> CoreResult<Option<Frame>>;
}

// ============================================================================
// .TSEQ CONTAINER READER
// ============================================================================

const TSEQ_MAGIC: [u8; 4] = *b"TSEQ";
const TSEQ_VERSION: u8 = 1;

/// Reader for the .tseq thermal frame-sequence container.
///
/// The container layout is deliberately simple:
///
/// ```text
/// magic      [u8; 4]   "TSEQ"
/// version    u8        currently 1
/// width      u32 LE    frame width in pixels
/// height     u32 LE    frame height in pixels
/// frame_rate u32 LE    frames per second; 0 means unspecified
/// timestamp  i64 LE    capture start, unix seconds UTC
/// name_len   u16 LE    device name length in bytes
/// name       [u8]      UTF-8 device name, may be empty
/// frames     [f32 LE]  width*height values per frame, until EOF
/// ```
///
/// A truncated trailing frame is reported as a read error rather than being
/// silently dropped.
pub struct TseqReader {
    reader: BufReader<File>,
    info: SequenceInfo,
    path: std::path::PathBuf,
    frame_bytes: Vec<u8>,
}

impl TseqReader {
    /// Opens a recording and parses its header.
    pub fn open(path: &Path) -> CoreResult<Self> {
        let file = File::open(path)
            .map_err(|e| source_read_error(path, format!("cannot open file: {e}")))?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        read_exact(&mut reader, &mut magic, path, "magic")?;
        if magic != TSEQ_MAGIC {
            return Err(source_read_error(path, "not a .tseq recording (bad magic)"));
        }

        let version = read_u8(&mut reader, path, "version")?;
        if version != TSEQ_VERSION {
            return Err(source_read_error(
                path,
                format!("unsupported container version {version}"),
            ));
        }

        let width = read_u32(&mut reader, path, "width")?;
        let height = read_u32(&mut reader, path, "height")?;
        if width == 0 || height == 0 {
            return Err(source_read_error(
                path,
                format!("invalid frame dimensions {width}x{height}"),
            ));
        }

        let frame_rate = match read_u32(&mut reader, path, "frame rate")? {
            0 => DEFAULT_FRAME_RATE,
            rate => rate,
        };

        let unix_seconds = read_i64(&mut reader, path, "timestamp")?;
        let timestamp = Utc
            .timestamp_opt(unix_seconds, 0)
            .single()
            .ok_or_else(|| source_read_error(path, format!("invalid timestamp {unix_seconds}")))?;

        let name_len = read_u16(&mut reader, path, "device name length")? as usize;
        let mut name_bytes = vec![0u8; name_len];
        read_exact(&mut reader, &mut name_bytes, path, "device name")?;
        let device_name = match String::from_utf8(name_bytes) {
            Ok(name) if !name.is_empty() => Some(name),
            Ok(_) => None,
            Err(_) => return Err(source_read_error(path, "device name is not valid UTF-8")),
        };

        // Dimensions come straight off the wire; reject anything whose frame
        // byte count cannot even be computed instead of overflowing.
        let frame_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| {
                source_read_error(path, format!("frame dimensions {width}x{height} are too large"))
            })?;
        let frame_bytes = vec![0u8; frame_len];

        Ok(Self {
            reader,
            info: SequenceInfo {
                timestamp,
                device_name,
                width,
                height,
                frame_rate,
            },
            path: path.to_path_buf(),
            frame_bytes,
        })
    }
}

impl FrameSource for TseqReader {
    fn info(&self) -> &SequenceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        // Distinguish clean EOF (no bytes of the next frame) from a
        // truncated frame (some bytes, then EOF).
        let mut first = [0u8; 1];
        match self.reader.read(&mut first) {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            Err(e) => {
                return Err(source_read_error(
                    &self.path,
                    format!("read failed mid-sequence: {e}"),
                ));
            }
        }

        self.frame_bytes[0] = first[0];
        if let Err(e) = self.reader.read_exact(&mut self.frame_bytes[1..]) {
            let message = if e.kind() == ErrorKind::UnexpectedEof {
                "truncated frame at end of file".to_string()
            } else {
                format!("read failed mid-sequence: {e}")
            };
            return Err(source_read_error(&self.path, message));
        }

        let values: Vec<f32> = self
            .frame_bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(Some(Frame::new(self.info.width, self.info.height, values)?))
    }
}

// ---- Little-endian read helpers ----

fn read_exact(
    reader: &mut impl Read,
    buf: &mut [u8],
    path: &Path,
    field: &str,
) -> CoreResult<()> {
    reader
        .read_exact(buf)
        .map_err(|e| source_read_error(path, format!("failed reading {field}: {e}")))
}

fn read_u8(reader: &mut impl Read, path: &Path, field: &str) -> CoreResult<u8> {
    let mut buf = [0u8; 1];
    read_exact(reader, &mut buf, path, field)?;
    Ok(buf[0])
}

fn read_u16(reader: &mut impl Read, path: &Path, field: &str) -> CoreResult<u16> {
    let mut buf = [0u8; 2];
    read_exact(reader, &mut buf, path, field)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32(reader: &mut impl Read, path: &Path, field: &str) -> CoreResult<u32> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf, path, field)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i64(reader: &mut impl Read, path: &Path, field: &str) -> CoreResult<i64> {
    let mut buf = [0u8; 8];
    read_exact(reader, &mut buf, path, field)?;
    Ok(i64::from_le_bytes(buf))
}

// ============================================================================
// TEST SUPPORT
// ============================================================================

/// Serializes a .tseq recording. Counterpart to [`TseqReader`], used by
/// tests to build fixture files.
pub fn write_tseq(
    writer: &mut impl std::io::Write,
    info: &SequenceInfo,
    frames: &[Vec<f32>],
) -> std::io::Result<()> {
    writer.write_all(&TSEQ_MAGIC)?;
    writer.write_all(&[TSEQ_VERSION])?;
    writer.write_all(&info.width.to_le_bytes())?;
    writer.write_all(&info.height.to_le_bytes())?;
    writer.write_all(&info.frame_rate.to_le_bytes())?;
    writer.write_all(&info.timestamp.timestamp().to_le_bytes())?;
    let name = info.device_name.as_deref().unwrap_or("");
    writer.write_all(&(name.len() as u16).to_le_bytes())?;
    writer.write_all(name.as_bytes())?;
    for frame in frames {
        for value in frame {
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    Ok(())
}
