use crate::model::Planning;
use anyhow::{anyhow, Context};
use fs4::fs_std::FileExt;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge le planning ; un support vide donne un planning vide.
    fn load(&self) -> anyhow::Result<Planning>;
    /// Sauvegarde de manière atomique : tout ou rien.
    fn save(&self, planning: &Planning) -> anyhow::Result<()>;
    /// Verrou exclusif partagé avec les autres processus, tenu jusqu'au drop
    /// du guard. Aucun verrou par défaut.
    fn acquire(&self) -> anyhow::Result<StorageLock> {
        Ok(StorageLock::none())
    }
}

/// Guard d'un verrou posé par [`Storage::acquire`].
#[derive(Debug)]
pub struct StorageLock {
    _file: Option<File>,
}

impl StorageLock {
    pub fn none() -> Self {
        Self { _file: None }
    }
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fichier voisin `<planning>.lock` portant le verrou consultatif.
    pub fn lock_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Planning> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Planning::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        let planning: Planning = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(planning)
    }

    fn save(&self, planning: &Planning) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(planning)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        tracing::debug!(path = %self.path.display(), "planning saved");
        Ok(())
    }

    fn acquire(&self) -> anyhow::Result<StorageLock> {
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("opening {}", lock_path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("locking {}", lock_path.display()))?;
        Ok(StorageLock { _file: Some(file) })
    }
}

/// Stockage en mémoire, pour les tests et les appelants sans fichier.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    planning: Mutex<Planning>,
}

impl MemoryStorage {
    pub fn new(planning: Planning) -> Self {
        Self {
            planning: Mutex::new(planning),
        }
    }

    pub fn snapshot(&self) -> anyhow::Result<Planning> {
        self.load()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> anyhow::Result<Planning> {
        let guard = self
            .planning
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, planning: &Planning) -> anyhow::Result<()> {
        let mut guard = self
            .planning
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        *guard = planning.clone();
        Ok(())
    }
}
