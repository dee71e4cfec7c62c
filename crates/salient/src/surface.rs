//! Reading and writing response surfaces.
//!
//! Two formats are supported:
//!
//! - binary (`.bin`): little-endian `u32` width, `u32` height, then
//!   `width * height` `f32` values in row-major order;
//! - JSON (`.json`): an array of equally long rows of numbers.
//!
//! [`load_surface`] and [`save_surface`] pick the format from the file
//! extension.

use anyhow::{bail, ensure, Context, Result};
use salient_core::ResponseMap;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

const HEADER_LEN: usize = 8;

/// Decode a binary surface from memory.
pub fn decode_surface(buf: &[u8]) -> Result<ResponseMap> {
    if buf.len() < HEADER_LEN {
        bail!("surface header truncated: {} of {HEADER_LEN} bytes", buf.len());
    }
    let w = u32::from_le_bytes(buf[0..4].try_into()?) as usize;
    let h = u32::from_le_bytes(buf[4..8].try_into()?) as usize;

    let expected = w
        .checked_mul(h)
        .and_then(|n| n.checked_mul(4))
        .context("surface dimensions overflow")?;
    let body = &buf[HEADER_LEN..];
    ensure!(
        body.len() == expected,
        "surface {w}x{h} needs {expected} data bytes, found {}",
        body.len()
    );

    let data = body
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(ResponseMap { w, h, data })
}

/// Encode a surface in the binary format.
pub fn encode_surface(map: &ResponseMap) -> Result<Vec<u8>> {
    ensure!(
        map.data.len() == map.w * map.h,
        "surface {}x{} holds {} values",
        map.w,
        map.h,
        map.data.len()
    );
    let w = u32::try_from(map.w).context("surface width exceeds u32")?;
    let h = u32::try_from(map.h).context("surface height exceeds u32")?;

    let mut out = Vec::with_capacity(HEADER_LEN + map.data.len() * 4);
    out.extend_from_slice(&w.to_le_bytes());
    out.extend_from_slice(&h.to_le_bytes());
    for v in &map.data {
        out.extend_from_slice(&v.to_le_bytes());
    }
    Ok(out)
}

/// Read a binary surface file.
pub fn read_surface(path: &Path) -> Result<ResponseMap> {
    let mut buf = Vec::new();
    File::open(path)
        .with_context(|| format!("opening surface {}", path.display()))?
        .read_to_end(&mut buf)
        .with_context(|| format!("reading surface {}", path.display()))?;
    decode_surface(&buf).with_context(|| format!("decoding surface {}", path.display()))
}

/// Write a binary surface file.
pub fn write_surface(path: &Path, map: &ResponseMap) -> Result<()> {
    let bytes = encode_surface(map)?;
    let mut f =
        File::create(path).with_context(|| format!("creating surface {}", path.display()))?;
    f.write_all(&bytes)?;
    Ok(())
}

/// Build a surface from JSON-style rows. Ragged rows are rejected.
pub fn surface_from_rows(rows: Vec<Vec<f32>>) -> Result<ResponseMap> {
    let h = rows.len();
    let w = rows.first().map_or(0, Vec::len);
    let mut data = Vec::with_capacity(w * h);
    for (i, row) in rows.into_iter().enumerate() {
        ensure!(
            row.len() == w,
            "row {i} has {} values, expected {w}",
            row.len()
        );
        data.extend(row);
    }
    // `[[], []]` has no columns; keep it consistent with `w * h == 0`.
    let h = if w == 0 { 0 } else { h };
    Ok(ResponseMap { w, h, data })
}

/// Split a surface into rows for JSON output.
pub fn surface_to_rows(map: &ResponseMap) -> Vec<Vec<f32>> {
    if map.w == 0 {
        return Vec::new();
    }
    map.data.chunks(map.w).map(<[f32]>::to_vec).collect()
}

/// Read a JSON surface file.
pub fn read_surface_json(path: &Path) -> Result<ResponseMap> {
    let file = File::open(path).with_context(|| format!("opening surface {}", path.display()))?;
    let rows: Vec<Vec<f32>> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing surface {}", path.display()))?;
    surface_from_rows(rows).with_context(|| format!("decoding surface {}", path.display()))
}

/// Write a JSON surface file.
pub fn write_surface_json(path: &Path, map: &ResponseMap) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating surface {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &surface_to_rows(map))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Read a surface, choosing JSON for `.json` files and binary otherwise.
pub fn load_surface(path: &Path) -> Result<ResponseMap> {
    if is_json(path) {
        read_surface_json(path)
    } else {
        read_surface(path)
    }
}

/// Write a surface, choosing JSON for `.json` files and binary otherwise.
pub fn save_surface(path: &Path, map: &ResponseMap) -> Result<()> {
    if is_json(path) {
        write_surface_json(path, map)
    } else {
        write_surface(path, map)
    }
}
