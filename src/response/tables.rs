//! Label tables
//!
//! Numeric codes in some responses index fixed label lists. Which list
//! applies is decided by the (message kind, field name) pair.

use crate::protocol::MessageKind;

/// An ordered list of labels indexed by small integer codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTable {
    labels: &'static [&'static str],
}

impl LookupTable {
    pub const fn new(labels: &'static [&'static str]) -> Self {
        Self { labels }
    }

    /// Label for `index`, or `None` when the index is out of range
    pub fn get(&self, index: u64) -> Option<&'static str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.labels.get(i))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Equalizer modes (`EQ_VIEW_INFO`: `i_curr_eq`, `ai_eq_list`)
pub const EQUALIZERS: LookupTable = LookupTable::new(&[
    "Standard",
    "Bass",
    "Flat",
    "Boost",
    "Treble and Bass",
    "User",
    "Music",
    "Cinema",
    "Night",
    "News",
    "Voice",
    "ia_sound",
    "Adaptive Sound Control",
    "Movie",
    "Bass Blast",
    "Dolby Atmos",
    "DTS Virtual X",
    "Bass Boost Plus",
]);

/// Inputs (`FUNC_VIEW_INFO`: `i_curr_func`, `ai_func_list`)
pub const FUNCTIONS: LookupTable = LookupTable::new(&[
    "Wifi",
    "Bluetooth",
    "Portable",
    "Aux",
    "Optical",
    "CP",
    "HDMI",
    "ARC",
    "Spotify",
    "Optical2",
    "HDMI2",
    "HDMI3",
    "LG TV",
    "Mic",
    "Chromecast",
    "Optical/HDMI ARC",
    "LG Optical",
    "FM",
    "USB",
]);

/// How a field refers to its table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// A single number selecting the current entry
    Selector,
    /// An array of numbers listing the available entries
    List,
}

/// Binds a field of one message kind to a label table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub kind: MessageKind,
    pub field: &'static str,
    pub role: FieldRole,
    pub table: LookupTable,
}

/// The set of associations consulted while rendering
#[derive(Debug, Clone)]
pub struct LabelAssociations {
    entries: Vec<Association>,
}

impl Default for LabelAssociations {
    fn default() -> Self {
        Self::new(vec![
            Association {
                kind: MessageKind::EqViewInfo,
                field: "i_curr_eq",
                role: FieldRole::Selector,
                table: EQUALIZERS,
            },
            Association {
                kind: MessageKind::EqViewInfo,
                field: "ai_eq_list",
                role: FieldRole::List,
                table: EQUALIZERS,
            },
            Association {
                kind: MessageKind::FuncViewInfo,
                field: "i_curr_func",
                role: FieldRole::Selector,
                table: FUNCTIONS,
            },
            Association {
                kind: MessageKind::FuncViewInfo,
                field: "ai_func_list",
                role: FieldRole::List,
                table: FUNCTIONS,
            },
        ])
    }
}

impl LabelAssociations {
    pub fn new(entries: Vec<Association>) -> Self {
        Self { entries }
    }

    /// No tables at all; every number renders raw
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The associations that apply to responses of `kind`
    pub fn for_kind(&self, kind: MessageKind) -> KindLabels {
        KindLabels {
            entries: self
                .entries
                .iter()
                .filter(|a| a.kind == kind)
                .copied()
                .collect(),
        }
    }
}

/// Associations already narrowed to one message kind
#[derive(Debug, Clone, Default)]
pub struct KindLabels {
    entries: Vec<Association>,
}

impl KindLabels {
    /// Table for a field of the given role, if any
    pub fn table(&self, field: &str, role: FieldRole) -> Option<LookupTable> {
        self.entries
            .iter()
            .find(|a| a.role == role && a.field == field)
            .map(|a| a.table)
    }
}
