//! On-disk workspace: a `.ontosheet` directory holding the configuration, the persisted
//! ontology settings and a snapshot of the table session.

use crate::config::Config;
use crate::session::{SessionSnapshot, TableSession};
use crate::settings::FileSettingsStore;
use crate::table::{MemoryTable, Row};
use anyhow::{anyhow, Result};
use log::info;
use std::path::{Path, PathBuf};

pub const WORKSPACE_DIR: &str = ".ontosheet";
const CONFIG_FILE: &str = "config.json";
const SETTINGS_FILE: &str = "settings.json";
const SESSION_FILE: &str = "session.json";

/// Walks up from `start_dir` looking for a `.ontosheet` directory and returns the directory
/// containing it.
pub fn find_workspace_root_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current_dir = Some(start_dir);
    while let Some(dir) = current_dir {
        if dir.join(WORKSPACE_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        current_dir = dir.parent();
    }
    None
}

pub fn find_workspace_root() -> Option<PathBuf> {
    let start_dir = std::env::current_dir().ok()?;
    find_workspace_root_from(&start_dir)
}

pub struct Workspace {
    root: PathBuf,
    pub config: Config,
    pub session: TableSession<MemoryTable, FileSettingsStore>,
}

impl Workspace {
    /// Creates a workspace in `root` seeded with `rows` and settings generated from
    /// `config`. Fails if one already exists unless `overwrite` is set.
    pub fn init(root: &Path, config: Config, rows: Vec<Row>, overwrite: bool) -> Result<Self> {
        let dir = root.join(WORKSPACE_DIR);
        if dir.exists() {
            if !overwrite {
                return Err(anyhow!(
                    "A workspace already exists in {}; use --overwrite to re-initialize",
                    root.display()
                ));
            }
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;
        info!("Creating workspace in {:?}", dir);

        let store = FileSettingsStore::open(&dir.join(SETTINGS_FILE))?;
        let snapshot = SessionSnapshot {
            rows,
            custom_predicates: vec![],
            prefixes: Default::default(),
        };
        let mut session = TableSession::from_snapshot(snapshot, store);
        session.settings_mut().generate(
            &config.base_iri,
            &config.label,
            &config.creator,
            &config.description,
            &config.delimiter,
        )?;
        let workspace = Workspace {
            root: root.to_path_buf(),
            config,
            session,
        };
        workspace.save()?;
        Ok(workspace)
    }

    pub fn load(root: &Path) -> Result<Self> {
        let dir = root.join(WORKSPACE_DIR);
        if !dir.is_dir() {
            return Err(anyhow!("No workspace found in {}", root.display()));
        }
        let config = Config::from_file(&dir.join(CONFIG_FILE))?;
        let snapshot = SessionSnapshot::from_file(&dir.join(SESSION_FILE))?;
        let store = FileSettingsStore::open(&dir.join(SETTINGS_FILE))?;
        Ok(Workspace {
            root: root.to_path_buf(),
            config,
            session: TableSession::from_snapshot(snapshot, store),
        })
    }

    /// Writes the configuration and table snapshot. Settings are written through on
    /// every change and are not rewritten here.
    pub fn save(&self) -> Result<()> {
        let dir = self.dir();
        std::fs::create_dir_all(&dir)?;
        self.config.save_to_file(&dir.join(CONFIG_FILE))?;
        self.session
            .snapshot()
            .save_to_file(&dir.join(SESSION_FILE))?;
        info!("Saved workspace to {:?}", dir);
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }
}
