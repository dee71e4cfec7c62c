// tools/gen-surface: synthetic response surfaces for exercising the CLI.
use anyhow::Context;
use salient::surface::save_surface;
use salient::ResponseMap;
use std::path::PathBuf;

/// (row, col, amplitude) of each Gaussian blob, as fractions of the size.
const PEAKS: [(f32, f32, f32); 5] = [
    (0.25, 0.25, 1.0),
    (0.25, 0.75, 0.8),
    (0.75, 0.25, 0.6),
    (0.75, 0.75, 0.4),
    (0.5, 0.5, 0.9),
];

fn synth(w: usize, h: usize, sigma: f32) -> anyhow::Result<ResponseMap> {
    let mut map = ResponseMap::zeros(w, h)?;
    let inv = 1.0 / (2.0 * sigma * sigma);
    for y in 0..h {
        for x in 0..w {
            let mut v = 0.0f32;
            for &(pr, pc, amp) in &PEAKS {
                let dy = y as f32 - pr * h as f32;
                let dx = x as f32 - pc * w as f32;
                v += amp * (-(dx * dx + dy * dy) * inv).exp();
            }
            map.data[y * w + x] = v;
        }
    }
    Ok(map)
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let out: PathBuf = args
        .next()
        .context("usage: gen-surface <out.bin|out.json> [width height]")?
        .into();
    let w: usize = args.next().map_or(Ok(64), |v| v.parse()).context("width")?;
    let h: usize = args.next().map_or(Ok(48), |v| v.parse()).context("height")?;

    let map = synth(w, h, (w.min(h) as f32 / 16.0).max(1.0))?;
    save_surface(&out, &map)?;
    println!("surface: {w}x{h} -> {:?}", out);
    Ok(())
}
