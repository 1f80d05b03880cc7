// ABOUTME: Open registry pairing each Format with its detector and extractor.
// ABOUTME: Registration order doubles as the documented tie-break priority.

use crate::detect::event_table::EventTableDetector;
use crate::detect::pre_block::PreBlockDetector;
use crate::detect::Detect;
use crate::extract::event_table::EventTableExtractor;
use crate::extract::pre_block::PreBlockExtractor;
use crate::extract::Extract;
use crate::schema::Format;

/// One registered format: the detector that scores it and the extractor
/// that converts a winning page into canonical rows.
pub struct FormatEntry {
    pub format: Format,
    pub detector: Box<dyn Detect>,
    pub extractor: Box<dyn Extract>,
}

/// Registry of known formats.
///
/// Adding a format is one `register` call; the classifier never changes.
/// When two detectors score equally, the earlier registration wins.
#[derive(Default)]
pub struct FormatRegistry {
    entries: Vec<FormatEntry>,
}

impl FormatRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in formats, in tie-break priority order:
    /// `PreBlock` first, then `LegacyEventTable`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            Format::PreBlock,
            Box::new(PreBlockDetector),
            Box::new(PreBlockExtractor),
        );
        registry.register(
            Format::LegacyEventTable,
            Box::new(EventTableDetector),
            Box::new(EventTableExtractor),
        );
        registry
    }

    /// Registers a format at the end of the priority order.
    pub fn register(
        &mut self,
        format: Format,
        detector: Box<dyn Detect>,
        extractor: Box<dyn Extract>,
    ) {
        self.entries.push(FormatEntry {
            format,
            detector,
            extractor,
        });
    }

    /// Registered entries in priority order.
    pub fn entries(&self) -> &[FormatEntry] {
        &self.entries
    }

    /// Looks up the extractor registered for a format.
    pub fn extractor_for(&self, format: Format) -> Option<&dyn Extract> {
        self.entries
            .iter()
            .find(|entry| entry.format == format)
            .map(|entry| entry.extractor.as_ref())
    }

    /// Number of registered formats.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no formats are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_registers_both_formats_in_priority_order() {
        let registry = FormatRegistry::builtin();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.entries()[0].format, Format::PreBlock);
        assert_eq!(registry.entries()[1].format, Format::LegacyEventTable);
    }

    #[test]
    fn extractor_lookup_by_format() {
        let registry = FormatRegistry::builtin();
        assert!(registry.extractor_for(Format::PreBlock).is_some());
        assert!(registry.extractor_for(Format::LegacyEventTable).is_some());

        let empty = FormatRegistry::new();
        assert!(empty.is_empty());
        assert!(empty.extractor_for(Format::PreBlock).is_none());
    }
}
