//! Field definitions.
//!
//! A [`FieldDef`] describes one logical catalog field across the three
//! notations and carries the subfield resolution machinery: its own
//! subfields, the fields it inherits from, the optional related
//! fallback, and the behavior variants. Definitions are built with
//! consuming `with_*` methods and then shared as `Arc<FieldDef>`;
//! inheritance and relation links always point at already-built fields,
//! which is what keeps the definition graph acyclic.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::{Arc, OnceLock};

use crate::subfield::{Repeatability, SubfieldDef};

/// Conventional occurrence range for holdings fields.
pub const DEFAULT_OCCURRENCES: RangeInclusive<u8> = 1..=20;

/// External-interchange key of a field: the MARC 21 tag plus up to two
/// single-character indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarcKey {
    tag: String,
    ind1: Option<char>,
    ind2: Option<char>,
}

impl MarcKey {
    /// Key with no indicators.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ind1: None,
            ind2: None,
        }
    }

    /// Set the first indicator.
    pub fn with_ind1(mut self, ind1: char) -> Self {
        self.ind1 = Some(ind1);
        self
    }

    /// Set the second indicator.
    pub fn with_ind2(mut self, ind2: char) -> Self {
        self.ind2 = Some(ind2);
        self
    }

    /// The three-character MARC tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// First indicator, if set.
    pub fn ind1(&self) -> Option<char> {
        self.ind1
    }

    /// Second indicator, if set.
    pub fn ind2(&self) -> Option<char> {
        self.ind2
    }
}

impl fmt::Display for MarcKey {
    /// Canonical key text: `245`, `246 3`, or `264 #1`. An unset first
    /// indicator prints as `#` when the second is set, following the
    /// MARC convention for blank indicators.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        match (self.ind1, self.ind2) {
            (None, None) => Ok(()),
            (Some(i1), None) => write!(f, " {i1}"),
            (None, Some(i2)) => write!(f, " #{i2}"),
            (Some(i1), Some(i2)) => write!(f, " {i1}{i2}"),
        }
    }
}

/// Behavior variants a field can take beyond the basic contract.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Plain field.
    Basic,
    /// Carries a second, independent subfield map for records captured
    /// in a different structural context, such as data taken over from
    /// before a format migration.
    AlternateSet {
        /// The alternate-context subfield map.
        alternate: BTreeMap<char, Arc<SubfieldDef>>,
    },
    /// The compact rendering joins repeated values of one subfield with
    /// a separator instead of repeating the subfield marker.
    Enumerated {
        /// Separator placed between joined values.
        separator: String,
    },
    /// The expanded-notation key is occurrence-templated: registration
    /// produces one entry per occurrence, all resolving to this
    /// definition.
    Holdings {
        /// Inclusive occurrence range.
        occurrences: RangeInclusive<u8>,
    },
}

/// Schema metadata for one catalog field.
pub struct FieldDef {
    pica3: String,
    picaplus: String,
    marc: Option<MarcKey>,
    label: String,
    repeat: Repeatability,
    own: BTreeMap<char, Arc<SubfieldDef>>,
    inherited: Vec<Arc<FieldDef>>,
    related: Option<Arc<FieldDef>>,
    ignorable: Option<char>,
    default_first: Option<char>,
    kind: FieldKind,
    closure: OnceLock<BTreeMap<char, Arc<SubfieldDef>>>,
}

impl FieldDef {
    /// Create a field definition with its two internal notation keys
    /// and a label. Everything else starts empty.
    pub fn new(
        pica3: impl Into<String>,
        picaplus: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            pica3: pica3.into(),
            picaplus: picaplus.into(),
            marc: None,
            label: label.into(),
            repeat: Repeatability::Unknown,
            own: BTreeMap::new(),
            inherited: Vec::new(),
            related: None,
            ignorable: None,
            default_first: None,
            kind: FieldKind::Basic,
            closure: OnceLock::new(),
        }
    }

    /// Set the repeatability of the field itself.
    pub fn with_repeat(mut self, repeat: Repeatability) -> Self {
        self.repeat = repeat;
        self
    }

    /// Map the field to a MARC 21 key.
    pub fn with_marc(mut self, marc: MarcKey) -> Self {
        self.marc = Some(marc);
        self
    }

    /// Declare an own subfield. The last declaration for a code wins,
    /// which is how later catalog layers deliberately replace entries
    /// from earlier ones during construction.
    pub fn with_subfield(mut self, subfield: impl Into<Arc<SubfieldDef>>) -> Self {
        let subfield = subfield.into();
        self.own.insert(subfield.code(), subfield);
        self
    }

    /// Declare several own subfields at once.
    pub fn with_subfields(mut self, subfields: impl IntoIterator<Item = SubfieldDef>) -> Self {
        for subfield in subfields {
            self = self.with_subfield(subfield);
        }
        self
    }

    /// Fold another field's subfields into this one. Inherited fields
    /// are consulted in declaration order, after own subfields.
    pub fn inherit(mut self, field: Arc<FieldDef>) -> Self {
        self.inherited.push(field);
        self
    }

    /// Set the related fallback field. It is consulted only when a
    /// lookup explicitly opts in.
    pub fn with_related(mut self, field: Arc<FieldDef>) -> Self {
        self.related = Some(field);
        self
    }

    /// Mark one subfield code as a structural artifact of the expanded
    /// notation, to be dropped when projecting to the compact notation.
    pub fn with_ignorable(mut self, code: char) -> Self {
        self.ignorable = Some(code);
        self
    }

    /// Mark the subfield whose value may open the compact rendering
    /// without its code marker.
    pub fn with_default_first(mut self, code: char) -> Self {
        self.default_first = Some(code);
        self
    }

    /// Declare an alternate-context subfield, turning the field into
    /// the alternate-set variant on first use.
    pub fn with_alternate_subfield(mut self, subfield: impl Into<Arc<SubfieldDef>>) -> Self {
        debug_assert!(
            matches!(
                self.kind,
                FieldKind::Basic | FieldKind::AlternateSet { .. }
            ),
            "field already carries a behavior variant"
        );
        let subfield = subfield.into();
        match &mut self.kind {
            FieldKind::AlternateSet { alternate } => {
                alternate.insert(subfield.code(), subfield);
            }
            _ => {
                let mut alternate = BTreeMap::new();
                alternate.insert(subfield.code(), subfield);
                self.kind = FieldKind::AlternateSet { alternate };
            }
        }
        self
    }

    /// Turn the field into the enumerated variant: repeated values of
    /// one subfield render joined by `separator`.
    pub fn enumerated(mut self, separator: impl Into<String>) -> Self {
        debug_assert!(
            matches!(self.kind, FieldKind::Basic),
            "field already carries a behavior variant"
        );
        self.kind = FieldKind::Enumerated {
            separator: separator.into(),
        };
        self
    }

    /// Turn the field into the occurrence-templated holdings variant.
    pub fn holdings(mut self, occurrences: RangeInclusive<u8>) -> Self {
        debug_assert!(
            matches!(self.kind, FieldKind::Basic),
            "field already carries a behavior variant"
        );
        self.kind = FieldKind::Holdings { occurrences };
        self
    }

    /// Compact-notation key.
    pub fn pica3(&self) -> &str {
        &self.pica3
    }

    /// Expanded-notation key. For holdings fields this is the bare base
    /// tag without an occurrence suffix.
    pub fn picaplus(&self) -> &str {
        &self.picaplus
    }

    /// MARC 21 key, when one is mapped.
    pub fn marc(&self) -> Option<&MarcKey> {
        self.marc.as_ref()
    }

    /// Human-readable label from the source catalog.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Repeatability of the field within a record.
    pub fn repeat(&self) -> Repeatability {
        self.repeat
    }

    /// The behavior variant.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Fields whose subfields this one folds in, in consultation order.
    pub fn inherited(&self) -> &[Arc<FieldDef>] {
        &self.inherited
    }

    /// The related fallback field, if any.
    pub fn related(&self) -> Option<&Arc<FieldDef>> {
        self.related.as_ref()
    }

    /// The structural-artifact code declared on this field, if any.
    pub fn ignorable(&self) -> Option<char> {
        self.ignorable
    }

    /// Resolve a subfield code against this field.
    ///
    /// Own subfields win over inherited ones, which are consulted
    /// recursively in declaration order; the related field is consulted
    /// last, and only when `include_related` is set. The flag is passed
    /// through the recursion, so an inherited field's own related
    /// fallback participates as well.
    pub fn subfield(&self, code: char, include_related: bool) -> Option<&Arc<SubfieldDef>> {
        if let Some(subfield) = self.own.get(&code) {
            return Some(subfield);
        }
        if let Some(subfield) = self
            .inherited
            .iter()
            .find_map(|field| field.subfield(code, include_related))
        {
            return Some(subfield);
        }
        if include_related {
            if let Some(related) = &self.related {
                return related.subfield(code, true);
            }
        }
        None
    }

    /// Subfields declared directly on this field.
    pub fn own_subfields(&self) -> &BTreeMap<char, Arc<SubfieldDef>> {
        &self.own
    }

    /// Every subfield reachable from this field: own, inherited
    /// (transitively), and the related field's own subfields. Earlier
    /// tiers win on code collisions, matching [`FieldDef::subfield`]
    /// with the related fallback enabled.
    ///
    /// Computed on first use and cached; the definition graph is frozen
    /// by then, so the cached view can never go stale.
    pub fn all_subfields(&self) -> &BTreeMap<char, Arc<SubfieldDef>> {
        self.closure.get_or_init(|| {
            let mut map = BTreeMap::new();
            self.collect_inherited(&mut map);
            if let Some(related) = &self.related {
                for (code, subfield) in related.own_subfields() {
                    map.entry(*code).or_insert_with(|| subfield.clone());
                }
            }
            map
        })
    }

    fn collect_inherited(&self, map: &mut BTreeMap<char, Arc<SubfieldDef>>) {
        for (code, subfield) in &self.own {
            map.entry(*code).or_insert_with(|| subfield.clone());
        }
        for field in &self.inherited {
            field.collect_inherited(map);
        }
    }

    /// Combined subfield view used by editing interfaces: own and
    /// alternate-context subfields of this field and, recursively, of
    /// every inherited field. Own entries win on collision; the related
    /// field does not participate.
    pub fn merged_subfields(&self) -> BTreeMap<char, Arc<SubfieldDef>> {
        let mut map = BTreeMap::new();
        self.collect_merged(&mut map);
        map
    }

    fn collect_merged(&self, map: &mut BTreeMap<char, Arc<SubfieldDef>>) {
        for (code, subfield) in &self.own {
            map.entry(*code).or_insert_with(|| subfield.clone());
        }
        if let FieldKind::AlternateSet { alternate } = &self.kind {
            for (code, subfield) in alternate {
                map.entry(*code).or_insert_with(|| subfield.clone());
            }
        }
        for field in &self.inherited {
            field.collect_merged(map);
        }
    }

    /// Alternate-context subfields, when the field carries them.
    pub fn alternate_subfields(&self) -> Option<&BTreeMap<char, Arc<SubfieldDef>>> {
        match &self.kind {
            FieldKind::AlternateSet { alternate } => Some(alternate),
            _ => None,
        }
    }

    /// Separator of the enumerated variant.
    pub fn separator(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Enumerated { separator } => Some(separator),
            _ => None,
        }
    }

    /// The default-first subfield code: this field's own declaration,
    /// else the first inherited field that resolves one, else the
    /// related field's.
    pub fn default_first(&self) -> Option<char> {
        self.default_first
            .or_else(|| self.inherited.iter().find_map(|field| field.default_first()))
            .or_else(|| self.related.as_ref().and_then(|field| field.default_first()))
    }

    /// Whether `code` is a structural artifact to drop when projecting
    /// to the compact notation. An own declaration shadows inherited
    /// ones completely.
    pub fn is_ignorable(&self, code: char) -> bool {
        match self.ignorable {
            Some(own) => own == code,
            None => self.inherited.iter().any(|field| field.is_ignorable(code)),
        }
    }

    /// Every expanded-notation key the field registers under: the key
    /// itself, or one suffixed key per occurrence for holdings fields.
    pub fn picaplus_keys(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::Holdings { occurrences } => occurrences
                .clone()
                .map(|n| format!("{}/{:02}", self.picaplus, n))
                .collect(),
            _ => vec![self.picaplus.clone()],
        }
    }

    /// The expanded-notation key as shown to catalogers: holdings
    /// fields render with the conventional `XX` occurrence placeholder.
    pub fn display_key(&self) -> String {
        match &self.kind {
            FieldKind::Holdings { .. } => format!("{}/XX", self.picaplus),
            _ => self.picaplus.clone(),
        }
    }

    /// Fixed prefix shared by every expanded occurrence key of a
    /// holdings field; `None` for other variants.
    pub fn occurrence_prefix(&self) -> Option<String> {
        match &self.kind {
            FieldKind::Holdings { .. } => Some(format!("{}/", self.picaplus)),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("pica3", &self.pica3)
            .field("picaplus", &self.picaplus)
            .field("marc", &self.marc)
            .field("label", &self.label)
            .field("repeat", &self.repeat)
            .field("own", &self.own.keys().collect::<Vec<_>>())
            .field("inherited", &self.inherited.iter().map(|f| f.pica3()).collect::<Vec<_>>())
            .field("related", &self.related.as_ref().map(|f| f.pica3()))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.pica3, self.display_key(), self.label)
    }
}
