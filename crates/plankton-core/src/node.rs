use indexmap::IndexMap;
use serde::Serialize;

/// One operator of a parsed physical plan.
///
/// `properties` keeps annotation fragments in print order. A `key=value`
/// fragment becomes a regular entry; any other fragment (a bare predicate, a
/// leading `[a@0 ASC]` list, a `TopK(fetch=10)` marker) is preserved as a
/// key with an empty value so no annotation text is lost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanNode {
    pub operator: String,
    pub properties: IndexMap<String, String>,
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            properties: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Looks up a named `key=value` property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Annotation fragments that were not `key=value` pairs, in print order.
    pub fn bare_properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k.as_str())
    }

    pub fn first_bare(&self) -> Option<&str> {
        self.bare_properties().next()
    }

    /// The named property when present, else the first bare fragment that
    /// satisfies `accept`. Strategies use this to read annotations that
    /// DataFusion has printed both with and without a key over time
    /// (e.g. `SortPreservingMergeExec: [a@0 ASC]` vs `expr=[a@0 ASC]`).
    pub fn property_or_bare(
        &self,
        key: &str,
        accept: impl Fn(&str) -> bool,
    ) -> Option<&str> {
        if let Some(v) = self.property(key) {
            return Some(v);
        }
        self.bare_properties().find(|frag| accept(frag))
    }
}
