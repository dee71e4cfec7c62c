use approx::assert_abs_diff_eq;
use salient::app::{load_config, run_extraction, ExtractionConfig, ExtractionDump};
use salient::surface::{load_surface, save_surface};
use salient::ResponseMap;
use std::fs;

fn peaks_map() -> ResponseMap {
    let mut map = ResponseMap::zeros(6, 4).unwrap();
    map.data[6 + 2] = 0.9; // row 1, col 2
    map.data[3 * 6 + 5] = 0.4; // row 3, col 5
    map.data[4] = 0.7; // row 0, col 4
    map
}

#[test]
fn surfaces_round_trip_through_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let map = peaks_map();
    for name in ["s.bin", "s.json"] {
        let path = dir.path().join(name);
        save_surface(&path, &map).unwrap();
        assert_eq!(load_surface(&path).unwrap(), map, "{name}");
    }
}

#[test]
fn missing_surface_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.bin");
    let err = load_surface(&path).unwrap_err();
    assert!(format!("{err:#}").contains("nope.bin"));
}

#[test]
fn config_file_drives_a_full_run() {
    let dir = tempfile::tempdir().unwrap();
    let surface = dir.path().join("resp.bin");
    save_surface(&surface, &peaks_map()).unwrap();

    let out = dir.path().join("out.json");
    let cfg = ExtractionConfig {
        surface: surface.clone(),
        count: Some(2),
        normalize: Some(salient::NormKind::Infinity),
        octave: Some(3),
        extent: Some(2.5),
        output_json: Some(out.clone()),
        ..Default::default()
    };
    let cfg_path = dir.path().join("run.json");
    fs::write(&cfg_path, serde_json::to_string(&cfg).unwrap()).unwrap();

    let cfg = load_config(&cfg_path).unwrap();
    let dump = run_extraction(&cfg).unwrap();

    let rc: Vec<_> = dump.corners.iter().map(|f| f.rc()).collect();
    assert_eq!(rc, vec![[1, 2], [0, 4]]);
    assert_abs_diff_eq!(dump.corners[0].score, 1.0, epsilon = 1e-6);
    assert_eq!(dump.corners[1].octave, 3);
    assert_eq!(dump.count, Some(2));

    let written: ExtractionDump = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written.corners, dump.corners);
    assert_eq!((written.width, written.height), (6, 4));
}

#[test]
fn default_output_sits_next_to_the_surface() {
    let dir = tempfile::tempdir().unwrap();
    let surface = dir.path().join("resp.json");
    save_surface(&surface, &peaks_map()).unwrap();

    let cfg = ExtractionConfig {
        surface: surface.clone(),
        ..Default::default()
    };
    let dump = run_extraction(&cfg).unwrap();
    assert_eq!(dump.corners.len(), 3);
    assert!(dir.path().join("resp.corners.json").exists());
}
