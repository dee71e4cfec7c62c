use anyhow::Context;
use salient::surface::load_surface;
use salient::{extract_features_map, ExtractParams, NormKind, TensorTransforms};
use serde::Serialize;
use std::time::Instant;
use std::{fs::File, io::Write, path::PathBuf};

#[derive(Serialize)]
struct CornerOut {
    row: usize,
    col: usize,
    score: f32,
}

#[derive(Serialize)]
struct CornerDump {
    surface: String,
    width: usize,
    height: usize,
    corners: Vec<CornerOut>,
}

fn main() -> anyhow::Result<()> {
    salient::logging::init_tracing(None)?;

    let mut args = std::env::args().skip(1);
    let input: PathBuf = args
        .next()
        .context("usage: dump_corners <surface> [--count N] [--threshold T] [--normalize l1|l2|inf]")?
        .into();

    let mut params = ExtractParams::<f32>::default();
    let mut norm: Option<NormKind> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--count" => {
                let v = args.next().context("expected an integer after --count")?;
                let n: usize = v
                    .parse()
                    .context("could not parse count (use integer >= 0)")?;
                params = params.with_count(n);
            }
            "--threshold" => {
                let v = args.next().context("expected a number after --threshold")?;
                params = params.with_threshold(v.parse().context("could not parse threshold")?);
            }
            "--normalize" => {
                let v = args.next().context("expected a norm after --normalize")?;
                norm = Some(v.parse().map_err(anyhow::Error::msg)?);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    let mut map = load_surface(&input)?;
    if let Some(kind) = norm {
        map.view_mut()?.normalized(kind);
    }

    let started = Instant::now();
    let features = extract_features_map(&map, &params, 0, 1.0)?;
    let ms = started.elapsed().as_secs_f64() * 1000.0;

    println!("surface {}x{} cells", map.h, map.w);
    println!("extract: {:5.2} ms, {} corners", ms, features.len());

    let dump = CornerDump {
        surface: input.to_string_lossy().into_owned(),
        width: map.w,
        height: map.h,
        corners: features
            .iter()
            .map(|f| CornerOut {
                row: f.x,
                col: f.y,
                score: f.score,
            })
            .collect(),
    };

    let json_out = input.with_extension("dump.json");
    let mut json_file = File::create(&json_out)?;
    serde_json::to_writer_pretty(&mut json_file, &dump)?;
    json_file.write_all(b"\n")?;
    println!("wrote {}", json_out.display());

    Ok(())
}
