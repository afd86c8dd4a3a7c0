//! # cloudiff
//!
//! Compares two `.bin` point clouds and writes the colored diff as PLY.

use argh::FromArgs;
use cloudiff::{
    CellRounding, CloudSink, CompareConfig, DiffSession, DisplayAttributes, MergedCloud,
    MergedPoint,
};
use cloudiff_io::{write_ply, write_ply_binary};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Elevation diff of two point clouds gridded on the XY plane.
#[derive(FromArgs, Debug)]
struct Args {
    /// reference cloud (.bin)
    #[argh(option)]
    cloud_a: Option<PathBuf>,

    /// compared cloud (.bin)
    #[argh(option)]
    cloud_b: Option<PathBuf>,

    /// factor converting file units to world units
    #[argh(option, default = "1.0")]
    unit: f64,

    /// planar cell size in world units
    #[argh(option, default = "1.0")]
    epsilon: f64,

    /// average duplicate samples in a cell instead of keeping the first
    #[argh(switch)]
    averaging: bool,

    /// use floor instead of truncation toward zero for cell indices
    #[argh(switch)]
    floor: bool,

    /// output PLY path
    #[argh(option, short = 'o', default = "PathBuf::from(\"diff.ply\")")]
    output: PathBuf,

    /// write ASCII PLY instead of binary
    #[argh(switch)]
    ascii: bool,

    /// world translation applied to the output as x,y,z
    #[argh(option, from_str_fn(parse_translation))]
    translate: Option<Vector3<f64>>,
}

fn parse_translation(value: &str) -> Result<Vector3<f64>, String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid translation {value:?}: {e}"))?;
    match parts[..] {
        [x, y, z] => Ok(Vector3::new(x, y, z)),
        _ => Err(format!("translation needs 3 components, got {}", parts.len())),
    }
}

/// Sink that renders the merged cloud into a PLY file in world space.
///
/// The file mirrors the display state: it exists while a cloud is shown and
/// visible, and is rewritten whenever the transform changes.
struct PlySink {
    path: PathBuf,
    binary: bool,
    transform: Matrix4<f64>,
    visible: bool,
    shown: Option<MergedCloud>,
    written: bool,
}

impl PlySink {
    fn new(path: PathBuf, binary: bool) -> Self {
        Self {
            path,
            binary,
            transform: Matrix4::identity(),
            visible: true,
            shown: None,
            written: false,
        }
    }

    fn to_world(&self, cloud: &MergedCloud) -> MergedCloud {
        cloud
            .iter()
            .map(|p| {
                let [x, y, z] = p.position;
                let w = self
                    .transform
                    .transform_point(&Point3::new(x as f64, y as f64, z as f64));
                MergedPoint::new([w.x as f32, w.y as f32, w.z as f32], p.color)
            })
            .collect()
    }

    /// Brings the file on disk in line with the current display state.
    fn sync(&mut self) -> io::Result<()> {
        match &self.shown {
            Some(cloud) if self.visible => {
                let world = self.to_world(cloud);
                if self.binary {
                    write_ply_binary(&self.path, &world)?;
                } else {
                    write_ply(&self.path, &world)?;
                }
                self.written = true;
                info!(path = %self.path.display(), points = world.len(), "wrote diff");
            }
            _ if self.written => {
                std::fs::remove_file(&self.path)?;
                self.written = false;
                info!(path = %self.path.display(), "removed diff");
            }
            _ => {}
        }
        Ok(())
    }

    fn sync_or_warn(&mut self) {
        if let Err(e) = self.sync() {
            warn!(path = %self.path.display(), "could not update output: {e}");
        }
    }
}

impl CloudSink for PlySink {
    fn present(&mut self, cloud: &MergedCloud, attributes: &DisplayAttributes) -> io::Result<()> {
        self.transform = attributes.transform;
        self.visible = attributes.visible;
        self.shown = Some(cloud.clone());
        if !self.visible {
            info!("cloud hidden, nothing written");
        }
        self.sync()
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.sync_or_warn();
    }

    fn set_transform(&mut self, transform: &Matrix4<f64>) {
        self.transform = *transform;
        self.sync_or_warn();
    }

    fn remove(&mut self) {
        self.shown = None;
        self.sync_or_warn();
    }
}

fn run(args: Args) -> cloudiff::Result<()> {
    let rounding = if args.floor {
        CellRounding::Floor
    } else {
        CellRounding::TowardZero
    };
    let config =
        CompareConfig::new(args.unit, args.epsilon, args.averaging).with_rounding(rounding);
    config.validate()?;

    let mut attributes = DisplayAttributes::default();
    if let Some(t) = args.translate {
        attributes.transform = Matrix4::new_translation(&t);
    }

    let sink = PlySink::new(args.output, !args.ascii);
    let mut session = DiffSession::new(config, sink).with_attributes(attributes);
    session.compare(args.cloud_a.as_deref(), args.cloud_b.as_deref())?;

    if let Some(summary) = session.last_summary() {
        println!(
            "{} points: {} matched, {} only in A, {} only in B (amplitude {})",
            summary.total(),
            summary.matched,
            summary.only_a,
            summary.only_b,
            summary.amplitude
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudiff=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(argh::from_env()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_cancelled() => {
            info!("{e}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudiff::Rgba;
    use std::path::Path;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["cloudiff"], args).unwrap()
    }

    fn one_point() -> MergedCloud {
        MergedCloud::from_points(vec![MergedPoint::new(
            [1.0, 2.0, 3.0],
            Rgba::opaque(255, 0, 0),
        )])
    }

    #[test]
    fn parses_both_clouds() {
        let args = parse(&["--cloud-a", "a.bin", "--cloud-b", "b.bin", "--epsilon", "0.5"]);
        assert_eq!(args.cloud_a.as_deref(), Some(Path::new("a.bin")));
        assert_eq!(args.cloud_b.as_deref(), Some(Path::new("b.bin")));
        assert_eq!(args.epsilon, 0.5);
        assert_eq!(args.output, PathBuf::from("diff.ply"));
    }

    #[test]
    fn missing_cloud_cancels_compare() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.ply");
        let out_arg = out.to_str().unwrap();

        let args = parse(&["--cloud-b", "b.bin", "-o", out_arg]);
        assert!(args.cloud_a.is_none());
        let err = run(args).unwrap_err();
        assert!(err.is_cancelled());
        assert!(!out.exists());
    }

    #[test]
    fn translation_parsing() {
        assert_eq!(
            parse_translation("1, 2,3").unwrap(),
            Vector3::new(1.0, 2.0, 3.0)
        );
        assert!(parse_translation("1,2").is_err());
        assert!(parse_translation("1,x,3").is_err());
    }

    #[test]
    fn to_world_applies_transform() {
        let mut sink = PlySink::new(PathBuf::from("unused.ply"), false);
        sink.transform = Matrix4::new_translation(&Vector3::new(10.0, 0.0, -1.0));
        let world = sink.to_world(&one_point());
        assert_eq!(world.point(0).position, [11.0, 2.0, 2.0]);
        assert_eq!(world.point(0).color, Rgba::opaque(255, 0, 0));
    }

    #[test]
    fn file_follows_display_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diff.ply");
        let mut sink = PlySink::new(path.clone(), false);

        sink.present(&one_point(), &DisplayAttributes::default()).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("1 2 3 255 0 0 255"));

        sink.set_transform(&Matrix4::new_translation(&Vector3::new(1.0, 1.0, 1.0)));
        assert!(std::fs::read_to_string(&path).unwrap().contains("2 3 4 255 0 0 255"));

        sink.set_visible(false);
        assert!(!path.exists());

        sink.set_visible(true);
        assert!(path.exists());

        sink.remove();
        assert!(!path.exists());
        assert!(!sink.written);
    }

    #[test]
    fn hidden_present_writes_nothing_and_remove_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diff.ply");
        let mut sink = PlySink::new(path.clone(), true);
        let attributes = DisplayAttributes {
            visible: false,
            ..DisplayAttributes::default()
        };

        sink.present(&one_point(), &attributes).unwrap();
        assert!(!path.exists());
        sink.remove();
        assert!(!sink.written);
        assert!(sink.shown.is_none());
    }
}
