//! Effect batches and diagnostics.

use super::effect::Effect;
use crate::core::{ReplayError, Severity};

/// A sub-event that could not be (fully) applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: ReplayError,
}

impl Diagnostic {
    #[must_use]
    pub fn new(error: ReplayError) -> Self {
        Self {
            severity: error.severity(),
            error,
        }
    }
}

impl From<ReplayError> for Diagnostic {
    fn from(error: ReplayError) -> Self {
        Self::new(error)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.severity, self.error)
    }
}

/// Ordered effects produced by one sub-event, plus the diagnostics raised
/// while applying it.
///
/// An empty batch is valid: a sub-event that failed outright yields no
/// effects and at least one diagnostic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectBatch {
    effects: Vec<Effect>,
    diagnostics: Vec<Diagnostic>,
}

impl EffectBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect.
    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Append a diagnostic.
    pub fn diagnose(&mut self, error: ReplayError) {
        self.diagnostics.push(Diagnostic::new(error));
    }

    /// Append everything from another batch, keeping order.
    pub fn extend(&mut self, other: EffectBatch) {
        self.effects.extend(other.effects);
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of effects (diagnostics not included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// No effects. There may still be diagnostics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Did anything go wrong?
    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

impl IntoIterator for EffectBatch {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.into_iter()
    }
}

impl<'a> IntoIterator for &'a EffectBatch {
    type Item = &'a Effect;
    type IntoIter = std::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hazard;
    use crate::core::{CellPos, Lookup, PoiId};

    #[test]
    fn test_batch_operations() {
        let mut batch = EffectBatch::new();
        assert!(batch.is_empty());

        batch.push(Effect::hazard_spawned(Hazard::Spider { pos: CellPos::new(1, 1) }));
        batch.diagnose(ReplayError::Occupied(CellPos::new(1, 2)));

        assert_eq!(batch.len(), 1);
        assert!(batch.has_diagnostics());
        assert_eq!(batch.diagnostics()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut first = EffectBatch::new();
        first.push(Effect::hazard_spawned(Hazard::Spider { pos: CellPos::new(1, 1) }));
        let mut second = EffectBatch::new();
        second.push(Effect::hazard_spawned(Hazard::Spider { pos: CellPos::new(2, 2) }));
        second.diagnose(ReplayError::NotFound(Lookup::Poi(PoiId::new(1))));

        first.extend(second);
        let cells: Vec<_> = first
            .iter()
            .map(|e| match e.subject {
                crate::effects::Subject::Hazard(pos) => pos,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(cells, vec![CellPos::new(1, 1), CellPos::new(2, 2)]);
        assert_eq!(first.diagnostics()[0].severity, Severity::Error);
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new(ReplayError::UnknownAction("teleport".into()));
        assert_eq!(diagnostic.to_string(), "Warning: unknown action kind \"teleport\"");
    }
}
