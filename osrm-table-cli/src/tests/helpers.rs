//! Test helpers for writing point files and stubbing the table provider.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use osrm_table_core::test_support::{FailingTableProvider, UnitTableProvider};
use osrm_table_core::{TableError, TableProvider};
use serde_json::{Value, json};
use tempfile::TempDir;

use super::*;
use crate::table::{TableConfig, TableProviderBuilder};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A temporary directory for point files.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `count` tabular rows named `{prefix}{i}` and return the path.
    pub(super) fn tabular(&self, name: &str, prefix: &str, count: usize) -> Utf8PathBuf {
        let rows: Vec<Value> = (0..count)
            .map(|i| {
                let step = f64::from(u32::try_from(i).expect("small index")) / 100.0;
                json!([format!("{prefix}{i}"), 13.38 + step, 52.51 + step])
            })
            .collect();
        self.write_json(name, &Value::Array(rows))
    }

    /// Write `count` GeoJSON point features with ids `{prefix}{i}`.
    pub(super) fn geojson(&self, name: &str, prefix: &str, count: usize) -> Utf8PathBuf {
        let features: Vec<Value> = (0..count)
            .map(|i| {
                let step = f64::from(u32::try_from(i).expect("small index")) / 100.0;
                json!({
                    "type": "Feature",
                    "id": format!("{prefix}{i}"),
                    "geometry": {"type": "Point", "coordinates": [2.35 + step, 48.85 + step]},
                    "properties": {}
                })
            })
            .collect();
        self.write_json(
            name,
            &json!({"type": "FeatureCollection", "features": features}),
        )
    }

    pub(super) fn write_json(&self, name: &str, document: &Value) -> Utf8PathBuf {
        let path = self.path(name);
        let payload = serde_json::to_vec_pretty(document).expect("serialise test document");
        write_utf8(&path, &payload);
        path
    }
}

/// Builder handing out deterministic providers instead of an HTTP client.
#[derive(Debug, Clone)]
pub(super) enum StubBuilder {
    Unit,
    Failing(TableError),
}

impl TableProviderBuilder for StubBuilder {
    fn build(&self, _config: &TableConfig) -> Result<Box<dyn TableProvider>, CliError> {
        Ok(match self {
            Self::Unit => Box::new(UnitTableProvider),
            Self::Failing(error) => Box::new(FailingTableProvider::new(error.clone())),
        })
    }
}
