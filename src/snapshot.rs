//! Serializable form of the window table, and its JSON persistence.
//!
//! Only durable state crosses this boundary. Gestures, shear and transition
//! deadlines are transient; a window caught mid-exit is written out in the
//! state its transition settles into.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WmError, WmResult};
use crate::window::{Geometry, Visibility, WindowId};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistedVisibility {
    Visible,
    Hidden,
    Minimized,
}

impl From<Visibility> for PersistedVisibility {
    fn from(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Visible => PersistedVisibility::Visible,
            Visibility::Closing { .. } | Visibility::Hidden => PersistedVisibility::Hidden,
            Visibility::Minimizing { .. } | Visibility::Minimized => PersistedVisibility::Minimized,
        }
    }
}

impl From<PersistedVisibility> for Visibility {
    fn from(visibility: PersistedVisibility) -> Self {
        match visibility {
            PersistedVisibility::Visible => Visibility::Visible,
            PersistedVisibility::Hidden => Visibility::Hidden,
            PersistedVisibility::Minimized => Visibility::Minimized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub id: WindowId,
    pub geometry: Geometry,
    #[serde(default)]
    pub is_maximized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_geometry: Option<Geometry>,
    pub visibility: PersistedVisibility,
    pub z: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowTableSnapshot {
    pub schema_version: u32,
    pub z_counter: u64,
    #[serde(default)]
    pub active: Option<WindowId>,
    #[serde(default)]
    pub windows: Vec<WindowEntry>,
}

impl WindowTableSnapshot {
    pub fn to_json(&self) -> WmResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &str) -> WmResult<Self> {
        let snapshot: Self = serde_json::from_str(data)?;
        migrate(snapshot)
    }

    /// Write to `path` through a sibling temp file so a crash never leaves a
    /// truncated table behind.
    pub fn save(&self, path: &Path) -> WmResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        let file = fs::File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        fs::rename(&tmp_path, path)?;
        tracing::debug!(path = %path.display(), windows = self.windows.len(), "saved window table");
        Ok(())
    }

    /// Read a table from `path`. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> WmResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(path)?;
        let snapshot = Self::from_json(&data)?;
        tracing::debug!(path = %path.display(), windows = snapshot.windows.len(), "loaded window table");
        Ok(Some(snapshot))
    }
}

fn migrate(mut snapshot: WindowTableSnapshot) -> WmResult<WindowTableSnapshot> {
    if snapshot.schema_version > SCHEMA_VERSION {
        return Err(WmError::UnsupportedSchema(snapshot.schema_version));
    }
    if snapshot.schema_version < SCHEMA_VERSION {
        snapshot.schema_version = SCHEMA_VERSION;
    }
    Ok(snapshot)
}
