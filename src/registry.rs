//! Preset registry: name → compiled definition

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::errors::PresetError;
use crate::preset::{PresetDefinition, PresetSource};

/// Compiled presets keyed by name. Definitions are shared, never copied.
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: HashMap<String, Arc<PresetDefinition>>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and add one preset, replacing any preset of the same name
    pub fn register(
        &mut self,
        source: &PresetSource,
    ) -> Result<Arc<PresetDefinition>, PresetError> {
        let def = Arc::new(PresetDefinition::compile(source)?);
        self.presets.insert(source.name.clone(), Arc::clone(&def));
        Ok(def)
    }

    /// Compile a batch. Valid presets are kept; every failure is returned.
    pub fn load<'a>(
        sources: impl IntoIterator<Item = &'a PresetSource>,
    ) -> (Self, Vec<PresetError>) {
        let mut registry = Self::new();
        let mut errors = Vec::new();
        for source in sources {
            if let Err(err) = registry.register(source) {
                crate::log::warn!(preset = %source.name, error = %err, "rejected preset");
                errors.push(err);
            }
        }
        crate::log::debug!(
            loaded = registry.len(),
            rejected = errors.len(),
            "loaded presets"
        );
        (registry, errors)
    }

    /// The embedded presets, compiled once per process
    pub fn builtin() -> &'static PresetRegistry {
        static BUILTIN: OnceLock<PresetRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let sources = crate::presets::all();
            let (registry, errors) = Self::load(&sources);
            debug_assert!(
                errors.is_empty(),
                "embedded presets must compile: {errors:?}"
            );
            registry
        })
    }

    /// Definition registered as `id`. Never falls back to another preset.
    pub fn lookup(&self, id: &str) -> Result<Arc<PresetDefinition>, PresetError> {
        self.presets
            .get(id)
            .cloned()
            .ok_or_else(|| PresetError::UnknownPreset {
                id: id.to_string(),
                suggestion: self.suggest(id),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.presets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // Preset names are case-sensitive; a case-only mismatch is the common mistake.
    fn suggest(&self, id: &str) -> Option<String> {
        self.presets
            .keys()
            .find(|name| name.eq_ignore_ascii_case(id))
            .map(|name| format!("did you mean `{name}`?"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FormulaError;

    #[test]
    fn builtin_contains_embedded_rows() {
        let reg = PresetRegistry::builtin();
        for name in [
            "rect",
            "ellipse",
            "roundRect",
            "triangle",
            "diamond",
            "star4",
            "rightArrow",
        ] {
            assert!(reg.contains(name), "{name}");
        }
        assert_eq!(reg.len(), crate::presets::all().len());
    }

    #[test]
    fn builtin_is_shared() {
        let a = PresetRegistry::builtin().lookup("star4").unwrap();
        let b = PresetRegistry::builtin().lookup("star4").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = PresetRegistry::builtin().lookup("hexagon").unwrap_err();
        assert!(matches!(
            err,
            PresetError::UnknownPreset { ref id, suggestion: None } if id == "hexagon"
        ));
    }

    #[test]
    fn case_mismatch_gets_a_suggestion() {
        let err = PresetRegistry::builtin().lookup("RoundRect").unwrap_err();
        let PresetError::UnknownPreset { suggestion, .. } = err else {
            panic!("expected UnknownPreset");
        };
        assert_eq!(suggestion.as_deref(), Some("did you mean `roundRect`?"));
    }

    #[test]
    fn load_keeps_valid_presets_and_reports_the_rest() {
        let sources = vec![
            crate::presets::rect(),
            PresetSource::new("broken").guide("g", "*/ w 2"),
            PresetSource::new("dangling").guide("g", "+- w missing 0"),
        ];
        let (reg, errors) = PresetRegistry::load(&sources);
        assert_eq!(reg.names(), vec!["rect"]);
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[0],
            PresetError::MalformedFormula {
                preset,
                source: FormulaError::Syntax { .. },
                ..
            } if preset == "broken"
        ));
        assert!(matches!(
            &errors[1],
            PresetError::MalformedFormula { source: FormulaError::UnresolvedName { .. }, .. }
        ));
    }

    #[test]
    fn register_replaces_same_name() {
        let mut reg = PresetRegistry::new();
        reg.register(&crate::presets::rect()).unwrap();
        let mut other = crate::presets::diamond();
        other.name = "rect".into();
        reg.register(&other).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.lookup("rect").unwrap().guides().len(), 2);
    }
}
