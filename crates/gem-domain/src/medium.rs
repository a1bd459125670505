use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metabolite::CompoundKey;
use crate::DomainError;

/// Cota de intercambio con el entorno para un compuesto del medio.
/// `lower` (<= 0) limita la captación; `upper` (>= 0) la secreción.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UptakeBound {
    lower: f64,
    upper: f64,
}

impl UptakeBound {
    /// Valida el invariante `lower <= 0 <= upper` y `lower < upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, DomainError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(DomainError::ValidationError("Las cotas de intercambio deben ser finitas".to_string()));
        }
        if lower > 0.0 || upper < 0.0 {
            return Err(DomainError::ValidationError(format!("Cota de intercambio fuera de rango: lower={} debe ser <= 0 <= upper={}", lower, upper)));
        }
        if lower >= upper {
            return Err(DomainError::ValidationError(format!("Cota de intercambio degenerada: lower={} no es menor que upper={}", lower, upper)));
        }
        Ok(UptakeBound { lower, upper })
    }

    pub fn lower(&self) -> f64 { self.lower }
    pub fn upper(&self) -> f64 { self.upper }

    /// Un compuesto está disponible para captación si su cota inferior es
    /// estrictamente negativa.
    pub fn allows_uptake(&self) -> bool {
        self.lower < 0.0
    }
}

/// Medio de cultivo: mapa inmutable de compuesto-en-compartimento a cotas de
/// intercambio. Una vez construido no se modifica; derivar variantes produce
/// un valor nuevo (ver [`Medium::replacing`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medium {
    id: String,
    name: Option<String>,
    bounds: IndexMap<CompoundKey, UptakeBound>,
}

impl Medium {
    /// Construye el medio a partir de pares (clave, cotas), rechazando
    /// duplicados y medios vacíos.
    pub fn new(id: &str, pairs: Vec<(CompoundKey, UptakeBound)>) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::ValidationError("El id de medio no puede estar vacío".to_string()));
        }
        if pairs.is_empty() {
            return Err(DomainError::ValidationError(format!("El medio '{}' no define ningún compuesto", id)));
        }
        let mut bounds = IndexMap::with_capacity(pairs.len());
        for (key, bound) in pairs {
            if bounds.insert(key.clone(), bound).is_some() {
                return Err(DomainError::ValidationError(format!("Compuesto duplicado {} en el medio '{}'", key, id)));
            }
        }
        Ok(Medium { id: id.to_string(), name: None, bounds })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    pub fn len(&self) -> usize { self.bounds.len() }
    pub fn is_empty(&self) -> bool { self.bounds.is_empty() }

    pub fn bound_for(&self, key: &CompoundKey) -> Option<&UptakeBound> {
        self.bounds.get(key)
    }

    /// Iteración en orden de inserción (orden observable y estable).
    pub fn iter(&self) -> impl Iterator<Item = (&CompoundKey, &UptakeBound)> {
        self.bounds.iter()
    }

    /// Compuestos efectivamente captables del medio.
    pub fn uptake_keys(&self) -> impl Iterator<Item = &CompoundKey> {
        self.bounds.iter().filter(|(_, b)| b.allows_uptake()).map(|(k, _)| k)
    }

    /// Deriva un medio nuevo con algunas cotas reemplazadas o añadidas.
    /// El medio original queda intacto; el resultado lleva `new_id`.
    pub fn replacing(&self, new_id: &str, overrides: Vec<(CompoundKey, UptakeBound)>) -> Result<Medium, DomainError> {
        if new_id.trim().is_empty() {
            return Err(DomainError::ValidationError("El id del medio derivado no puede estar vacío".to_string()));
        }
        let mut bounds = self.bounds.clone();
        for (key, bound) in overrides {
            bounds.insert(key, bound);
        }
        Ok(Medium { id: new_id.to_string(),
                    name: self.name.clone(),
                    bounds })
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<medium {} ({} compuestos)>", self.id, self.bounds.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> CompoundKey {
        CompoundKey::parse(raw).unwrap()
    }

    #[test]
    fn test_uptake_bound_invariants() {
        assert!(UptakeBound::new(-5.0, 100.0).is_ok());
        // lower > 0 viola lower <= 0
        assert!(UptakeBound::new(1.0, 100.0).is_err());
        // upper < 0 viola 0 <= upper
        assert!(UptakeBound::new(-5.0, -1.0).is_err());
        // lower == upper viola lower < upper
        assert!(UptakeBound::new(0.0, 0.0).is_err());
    }

    #[test]
    fn test_medium_rejects_duplicates_and_empty() {
        let pairs = vec![(key("cpd00027_e0"), UptakeBound::new(-5.0, 100.0).unwrap()),
                         (key("cpd00027_e0"), UptakeBound::new(-1.0, 10.0).unwrap())];
        assert!(Medium::new("glc_min", pairs).is_err());
        assert!(Medium::new("vacio", vec![]).is_err());
    }

    #[test]
    fn test_replacing_leaves_original_untouched() {
        let base = Medium::new("base",
                               vec![(key("cpd00027_e0"), UptakeBound::new(-5.0, 100.0).unwrap()),
                                    (key("cpd00007_e0"), UptakeBound::new(-10.0, 100.0).unwrap())]).unwrap();
        let derived = base.replacing("anaerobio",
                                     vec![(key("cpd00007_e0"), UptakeBound::new(0.0, 100.0).unwrap())])
                          .unwrap();
        assert_eq!(base.bound_for(&key("cpd00007_e0")).unwrap().lower(), -10.0);
        assert!(!derived.bound_for(&key("cpd00007_e0")).unwrap().allows_uptake());
        assert_eq!(derived.id(), "anaerobio");
    }

    #[test]
    fn test_uptake_keys_filters_secretion_only() {
        let m = Medium::new("m",
                            vec![(key("cpd00027_e0"), UptakeBound::new(-5.0, 100.0).unwrap()),
                                 (key("cpd00011_e0"), UptakeBound::new(0.0, 100.0).unwrap())]).unwrap();
        let uptake: Vec<String> = m.uptake_keys().map(|k| k.to_string()).collect();
        assert_eq!(uptake, vec!["cpd00027_e0".to_string()]);
    }
}
