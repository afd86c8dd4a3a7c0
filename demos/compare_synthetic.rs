use cloudiff::{compare_with_summary, CompareConfig, Sample};
use cloudiff_io::{encode_bin, write_ply};

fn main() {
    // Two scans of a 40 x 40 m slope; the second has a 3 m mound and is
    // missing a strip along its east edge.
    let mut before = Vec::new();
    let mut after = Vec::new();
    for i in 0..40 {
        for j in 0..40 {
            let (x, y) = (i as f32, j as f32);
            let ground = 0.05 * x + 0.02 * y;
            before.push(Sample::new(x, y, ground));

            if i >= 36 {
                continue;
            }
            let d2 = (x - 20.0).powi(2) + (y - 20.0).powi(2);
            let mound = 3.0 * (-d2 / 20.0).exp();
            after.push(Sample::new(x + 0.3, y + 0.3, ground + mound));
        }
    }

    let dir = std::env::temp_dir().join("cloudiff_demo");
    std::fs::create_dir_all(&dir).expect("create demo dir");
    let (path_a, path_b) = (dir.join("before.bin"), dir.join("after.bin"));
    std::fs::write(&path_a, encode_bin(&before)).expect("write before.bin");
    std::fs::write(&path_b, encode_bin(&after)).expect("write after.bin");

    let config = CompareConfig::new(1.0, 1.0, true);
    let (cloud, summary) = compare_with_summary(&path_a, &path_b, &config).expect("compare");
    println!(
        "Merged cloud: {} points ({} matched, {} only before, {} only after)",
        cloud.len(),
        summary.matched,
        summary.only_a,
        summary.only_b
    );
    println!("Elevation amplitude: {:.3} m", summary.amplitude);

    let out = dir.join("diff.ply");
    write_ply(&out, &cloud).expect("write diff.ply");
    println!("Wrote {}", out.display());
}
