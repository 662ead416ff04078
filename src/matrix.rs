//! Little-endian matrix files used to carry test vectors.
//!
//! Layout: the ASCII magic `MAT `, a u32 row count, then per row a u32
//! element count followed by that many f64 values. The declared sections
//! must consume the byte stream exactly.

use crate::error::FftError;

const MAGIC: [u8; 4] = *b"MAT ";

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, count: usize) -> Result<&'a [u8], FftError> {
        if self.data.len() - self.pos < count {
            return Err(FftError::FormatCorruption(format!(
                "unexpected end of stream at byte {}",
                self.pos
            )));
        }
        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    fn read_u32(&mut self) -> Result<u32, FftError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_f64(&mut self) -> Result<f64, FftError> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }
}

/// Parses a matrix stream, failing on any structural inconsistency.
pub fn parse_matrix(data: &[u8]) -> Result<Vec<Vec<f64>>, FftError> {
    let mut reader = Reader { data, pos: 0 };

    if reader.take(4)? != MAGIC {
        return Err(FftError::FormatCorruption("bad magic".to_string()));
    }

    let rows = reader.read_u32()? as usize;
    let mut matrix = Vec::with_capacity(rows);
    for _ in 0..rows {
        let count = reader.read_u32()? as usize;
        let mut row = Vec::with_capacity(count);
        for _ in 0..count {
            row.push(reader.read_f64()?);
        }
        matrix.push(row);
    }

    if reader.pos != data.len() {
        return Err(FftError::FormatCorruption(format!(
            "{} trailing bytes",
            data.len() - reader.pos
        )));
    }
    Ok(matrix)
}

/// Serializes rows into the matrix format; inverse of [`parse_matrix`].
pub fn encode_matrix(rows: &[Vec<f64>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&(rows.len() as u32).to_le_bytes());
    for row in rows {
        out.extend_from_slice(&(row.len() as u32).to_le_bytes());
        for &value in row {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
    out
}
