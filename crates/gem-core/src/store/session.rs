//! Store de artefactos de sesión.
//!
//! Mapa en memoria de id a artefacto (red o medio), con capacidad acotada y
//! desalojo FIFO por orden de inserción. Es el único estado durable dentro
//! del proceso: los artefactos solo se crean vía facade, nunca se mutan en
//! sitio, y desaparecen con el teardown de la sesión o por desalojo.
//!
//! Contrato de concurrencia: todas las operaciones se serializan con un único
//! mutex grueso. `get` devuelve clones, no referencias: los medios son
//! inmutables y las redes se usan copy-before-mutate, de modo que el clone en
//! la frontera es la forma más simple de honrar el contrato
//! lookup-then-copy.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use gem_domain::{Medium, MetabolicNetwork};

use crate::constants::DEFAULT_STORE_CAPACITY;
use crate::errors::CoreError;
use crate::identity::ArtifactKind;

/// Unión etiquetada de los dos tipos de artefacto que posee el store.
/// Los puntos de consumo hacen match exhaustivo sobre ella.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ArtifactHandle {
    Network(MetabolicNetwork),
    Medium(Medium),
}

impl ArtifactHandle {
    pub fn id(&self) -> &str {
        match self {
            ArtifactHandle::Network(n) => n.id(),
            ArtifactHandle::Medium(m) => m.id(),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactHandle::Network(_) => ArtifactKind::Model,
            ArtifactHandle::Medium(_) => ArtifactKind::Media,
        }
    }
}

/// Metadatos de una entrada, para listados externos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub id: String,
    pub kind: ArtifactKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredArtifact {
    handle: ArtifactHandle,
    created_at: DateTime<Utc>,
}

/// Configuración del store (capacidad y desalojo).
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    pub capacity: usize,
    pub eviction_enabled: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig { capacity: DEFAULT_STORE_CAPACITY,
                      eviction_enabled: true }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.capacity == 0 {
            return Err(CoreError::Validation("la capacidad del store debe ser al menos 1".to_string()));
        }
        Ok(())
    }
}

/// Store en memoria, inyectado explícitamente (sin singletons a nivel de
/// paquete); su ciclo de vida lo posee el entry point del proceso.
#[derive(Debug)]
pub struct SessionStore {
    inner: Mutex<IndexMap<String, StoredArtifact>>,
    config: StoreConfig,
}

impl SessionStore {
    pub fn new(config: StoreConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(SessionStore { inner: Mutex::new(IndexMap::new()), config })
    }

    pub fn with_defaults() -> Self {
        SessionStore { inner: Mutex::new(IndexMap::new()),
                       config: StoreConfig::default() }
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Registra un artefacto. Tras insertar, desaloja la entrada más antigua
    /// (orden de inserción, no de acceso) mientras se exceda la capacidad,
    /// salvo que el desalojo esté deshabilitado.
    ///
    /// # Errores
    /// `CoreError::DuplicateId` si el id ya existe: los callers deben pasar
    /// antes por el generador de identidades.
    pub fn put(&self, handle: ArtifactHandle) -> Result<(), CoreError> {
        let id = handle.id().to_string();
        let mut map = self.inner.lock().expect("session store mutex poisoned");
        if map.contains_key(&id) {
            return Err(CoreError::DuplicateId(id));
        }
        map.insert(id, StoredArtifact { handle, created_at: Utc::now() });
        if self.config.eviction_enabled {
            while map.len() > self.config.capacity {
                map.shift_remove_index(0);
            }
        }
        Ok(())
    }

    /// Recupera un clone del artefacto; `NotFound` lleva como pista la lista
    /// de ids disponibles.
    pub fn get(&self, id: &str) -> Result<ArtifactHandle, CoreError> {
        let map = self.inner.lock().expect("session store mutex poisoned");
        match map.get(id) {
            Some(stored) => Ok(stored.handle.clone()),
            None => Err(CoreError::NotFound { id: id.to_string(),
                                              hints: map.keys().cloned().collect() }),
        }
    }

    /// Accessor etiquetado: falla con pistas restringidas a redes si el id no
    /// existe, y con `Validation` si el id apunta a un medio.
    pub fn get_network(&self, id: &str) -> Result<MetabolicNetwork, CoreError> {
        let map = self.inner.lock().expect("session store mutex poisoned");
        match map.get(id) {
            Some(StoredArtifact { handle: ArtifactHandle::Network(n), .. }) => Ok(n.clone()),
            Some(_) => Err(CoreError::Validation(format!("'{}' no es una red metabólica", id))),
            None => Err(CoreError::NotFound { id: id.to_string(),
                                              hints: Self::ids_of(&map, ArtifactKind::Model) }),
        }
    }

    /// Accessor etiquetado análogo para medios.
    pub fn get_medium(&self, id: &str) -> Result<Medium, CoreError> {
        let map = self.inner.lock().expect("session store mutex poisoned");
        match map.get(id) {
            Some(StoredArtifact { handle: ArtifactHandle::Medium(m), .. }) => Ok(m.clone()),
            Some(_) => Err(CoreError::Validation(format!("'{}' no es un medio", id))),
            None => Err(CoreError::NotFound { id: id.to_string(),
                                              hints: Self::ids_of(&map, ArtifactKind::Media) }),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.lock().expect("session store mutex poisoned").contains_key(id)
    }

    /// Ids en orden de inserción, opcionalmente filtrados por clase.
    pub fn list(&self, kind: Option<ArtifactKind>) -> Vec<String> {
        let map = self.inner.lock().expect("session store mutex poisoned");
        match kind {
            Some(k) => Self::ids_of(&map, k),
            None => map.keys().cloned().collect(),
        }
    }

    /// Entradas con metadatos, en orden de inserción.
    pub fn entries(&self, kind: Option<ArtifactKind>) -> Vec<ArtifactEntry> {
        let map = self.inner.lock().expect("session store mutex poisoned");
        map.values()
           .filter(|s| kind.map_or(true, |k| s.handle.kind() == k))
           .map(|s| ArtifactEntry { id: s.handle.id().to_string(),
                                    kind: s.handle.kind(),
                                    created_at: s.created_at })
           .collect()
    }

    pub fn remove(&self, id: &str) -> bool {
        self.inner.lock().expect("session store mutex poisoned").shift_remove(id).is_some()
    }

    pub fn clear(&self) {
        self.inner.lock().expect("session store mutex poisoned").clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("session store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ids_of(map: &IndexMap<String, StoredArtifact>, kind: ArtifactKind) -> Vec<String> {
        map.values()
           .filter(|s| s.handle.kind() == kind)
           .map(|s| s.handle.id().to_string())
           .collect()
    }
}
