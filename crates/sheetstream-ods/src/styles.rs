//! Style registry: deduplication of cell style fragments
//!
//! Sheets share one registry guarded by the document's lock. Interning maps
//! a canonical key over the style's semantic fields to a stable identifier;
//! identical descriptors resolve to the same identifier and their XML
//! fragment is emitted exactly once, in registration order, into styles.xml.

use ahash::AHashMap;
use sheetstream_core::Style;

/// One interned fragment
struct Fragment {
    id: String,
    xml: String,
}

/// Canonical lookup key: the fields that distinguish emitted fragments.
/// Only the bold flag renders today; number formats pass through to the
/// consuming application defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StyleKey {
    font_bold: bool,
}

#[derive(Default)]
pub(crate) struct StyleRegistry {
    index: AHashMap<StyleKey, usize>,
    fragments: Vec<Fragment>,
}

impl StyleRegistry {
    /// Intern a style descriptor, returning its stable identifier
    ///
    /// Styles with no distinguishing attributes map to no style at all and
    /// are never registered.
    pub(crate) fn intern(&mut self, style: &Style) -> Option<String> {
        if !style.font_bold {
            return None;
        }
        let key = StyleKey {
            font_bold: style.font_bold,
        };
        if let Some(&idx) = self.index.get(&key) {
            return Some(self.fragments[idx].id.clone());
        }
        let id = format!("bf-{}", fnv1_32(b"true"));
        let xml = format!(
            "<style:style style:name=\"{id}\" style:family=\"table-cell\">\
             <style:text-properties text:display=\"true\" fo:font-weight=\"bold\" />\
             </style:style>"
        );
        self.index.insert(key, self.fragments.len());
        self.fragments.push(Fragment { id: id.clone(), xml });
        Some(id)
    }

    /// Fragments in registration order
    pub(crate) fn fragments(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|f| f.xml.as_str())
    }
}

/// 32-bit FNV-1; only used to synthesise the public `bf-<hash>` id text,
/// never as the lookup key.
fn fnv1_32(data: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for &b in data {
        hash = hash.wrapping_mul(0x0100_0193) ^ u32::from(b);
    }
    hash
}
