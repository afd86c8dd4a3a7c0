use crate::compare::compare_with_summary;
use cloudiff_core::{CompareConfig, DiffError, MergedCloud, Result, Side};
use cloudiff_diff::DiffSummary;
use nalgebra::Matrix4;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Attributes passed through verbatim to whatever displays the cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayAttributes {
    pub point_size: u32,
    pub visible: bool,
    pub transform: Matrix4<f64>,
}

impl Default for DisplayAttributes {
    fn default() -> Self {
        Self {
            point_size: 2,
            visible: true,
            transform: Matrix4::identity(),
        }
    }
}

/// The collaborator that shows a merged cloud.
pub trait CloudSink {
    /// Show `cloud`, replacing anything presented earlier.
    fn present(&mut self, cloud: &MergedCloud, attributes: &DisplayAttributes) -> io::Result<()>;

    fn set_visible(&mut self, visible: bool);

    fn set_transform(&mut self, transform: &Matrix4<f64>);

    /// Drop whatever is currently shown.
    fn remove(&mut self);
}

/// Compare/delete state machine driven by a host.
///
/// A successful [`compare`](Self::compare) replaces the displayed cloud; a
/// failed one leaves it and the sink untouched.
#[derive(Debug)]
pub struct DiffSession<S> {
    config: CompareConfig,
    attributes: DisplayAttributes,
    sink: S,
    displayed: Option<MergedCloud>,
    last_summary: Option<DiffSummary>,
    last_paths: Option<(PathBuf, PathBuf)>,
}

impl<S: CloudSink> DiffSession<S> {
    pub fn new(config: CompareConfig, sink: S) -> Self {
        Self {
            config,
            attributes: DisplayAttributes::default(),
            sink,
            displayed: None,
            last_summary: None,
            last_paths: None,
        }
    }

    pub fn with_attributes(mut self, attributes: DisplayAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Run one compare. `None` for either side means no file was chosen and
    /// yields [`DiffError::Cancelled`] without touching any state.
    pub fn compare(
        &mut self,
        path_a: Option<&Path>,
        path_b: Option<&Path>,
    ) -> Result<&MergedCloud> {
        let path_a = path_a.ok_or(DiffError::Cancelled { side: Side::A })?;
        let path_b = path_b.ok_or(DiffError::Cancelled { side: Side::B })?;

        let (cloud, summary) = compare_with_summary(path_a, path_b, &self.config)
            .inspect_err(|e| warn!("compare failed: {e}"))?;

        self.sink
            .present(&cloud, &self.attributes)
            .map_err(DiffError::Sink)?;
        info!(
            a = %path_a.display(),
            b = %path_b.display(),
            points = cloud.len(),
            "presented merged cloud"
        );

        self.last_summary = Some(summary);
        self.last_paths = Some((path_a.to_path_buf(), path_b.to_path_buf()));
        Ok(self.displayed.insert(cloud))
    }

    /// Remove the displayed cloud. Returns `false` if nothing was shown.
    pub fn delete(&mut self) -> bool {
        match self.displayed.take() {
            Some(_) => {
                self.sink.remove();
                self.last_summary = None;
                debug!("removed merged cloud");
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.attributes.visible = visible;
        if self.displayed.is_some() {
            self.sink.set_visible(visible);
        }
    }

    pub fn set_transform(&mut self, transform: Matrix4<f64>) {
        self.attributes.transform = transform;
        if self.displayed.is_some() {
            self.sink.set_transform(&self.attributes.transform);
        }
    }

    /// Takes effect on the next compare.
    pub fn set_config(&mut self, config: CompareConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    pub fn attributes(&self) -> &DisplayAttributes {
        &self.attributes
    }

    pub fn displayed(&self) -> Option<&MergedCloud> {
        self.displayed.as_ref()
    }

    pub fn last_summary(&self) -> Option<&DiffSummary> {
        self.last_summary.as_ref()
    }

    /// Paths of the last successful compare, for reuse by the host.
    pub fn last_paths(&self) -> Option<(&Path, &Path)> {
        self.last_paths
            .as_ref()
            .map(|(a, b)| (a.as_path(), b.as_path()))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
