//! Render-template sets and the patch fold that builds them.
//!
//! Every dialect variant owns an immutable [`TemplateSet`]: a mapping
//! from generic function/expression/type names to render templates.
//! A variant's set is produced by folding an ordered list of layers,
//! root first, leaf last. Each layer may add, replace or delete
//! entries; a key deleted by a layer stays deleted unless a *later*
//! (more specific) layer re-adds it.

use std::collections::BTreeMap;

/// One patch instruction inside a template layer.
#[derive(Debug, Clone, Copy)]
pub enum TemplateOp {
    Set(&'static str, &'static str),
    Delete(&'static str),
}

/// An immutable snapshot of a variant's resolved templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    entries: BTreeMap<String, String>,
}

impl TemplateSet {
    /// Fold `layers` root-to-leaf into a resolved set.
    pub fn resolve(layers: &[&[TemplateOp]]) -> TemplateSet {
        let mut entries = BTreeMap::new();
        for layer in layers {
            for op in *layer {
                match op {
                    TemplateOp::Set(key, value) => {
                        entries.insert((*key).to_string(), (*value).to_string());
                    }
                    TemplateOp::Delete(key) => {
                        entries.remove(*key);
                    }
                }
            }
        }
        TemplateSet { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in deterministic (lexicographic) order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Generic ANSI-flavored defaults shared by every variant.
///
/// Keys are dotted: `functions.*` render SQL functions, `expressions.*`
/// render expression shapes, `quotes.*`/`params.*` carry lexical
/// conventions, `types.*` map generic type names to dialect type names.
pub const BASE_TEMPLATES: &[TemplateOp] = &[
    TemplateOp::Set("functions.SUM", "SUM({{ args_concat }})"),
    TemplateOp::Set("functions.MIN", "MIN({{ args_concat }})"),
    TemplateOp::Set("functions.MAX", "MAX({{ args_concat }})"),
    TemplateOp::Set("functions.COUNT", "COUNT({{ args_concat }})"),
    TemplateOp::Set("functions.COUNT_DISTINCT", "COUNT(DISTINCT {{ args_concat }})"),
    TemplateOp::Set("functions.AVG", "AVG({{ args_concat }})"),
    TemplateOp::Set("functions.COALESCE", "COALESCE({{ args_concat }})"),
    TemplateOp::Set("functions.CONCAT", "CONCAT({{ args_concat }})"),
    TemplateOp::Set("functions.FLOOR", "FLOOR({{ args_concat }})"),
    TemplateOp::Set("functions.CEIL", "CEIL({{ args_concat }})"),
    TemplateOp::Set("functions.TRUNC", "TRUNC({{ args_concat }})"),
    TemplateOp::Set("functions.LOWER", "LOWER({{ args_concat }})"),
    TemplateOp::Set("functions.UPPER", "UPPER({{ args_concat }})"),
    TemplateOp::Set("functions.LEAST", "LEAST({{ args_concat }})"),
    TemplateOp::Set("functions.GREATEST", "GREATEST({{ args_concat }})"),
    TemplateOp::Set("functions.DATETRUNC", "DATE_TRUNC({{ args_concat }})"),
    TemplateOp::Set("functions.NOW", "NOW({{ args_concat }})"),
    TemplateOp::Set(
        "functions.PERCENTILECONT",
        "PERCENTILE_CONT({{ args_concat }}) WITHIN GROUP (ORDER BY {{ order_by }})",
    ),
    TemplateOp::Set(
        "functions.STRING_AGG",
        "STRING_AGG({{ distinct }}{{ args_concat }})",
    ),
    TemplateOp::Set("expressions.column_aliased", "{{ expr }} {{ quoted_alias }}"),
    TemplateOp::Set("expressions.binary", "({{ left }} {{ op }} {{ right }})"),
    TemplateOp::Set("expressions.is_null", "{{ expr }} IS {% if negate %}NOT {% endif %}NULL"),
    TemplateOp::Set("expressions.cast", "CAST({{ expr }} AS {{ data_type }})"),
    TemplateOp::Set("expressions.interval", "INTERVAL '{{ interval }}'"),
    TemplateOp::Set("expressions.timestamp_literal", "timestamptz '{{ value }}'"),
    TemplateOp::Set("expressions.like", "{{ expr }} {% if negated %}NOT {% endif %}LIKE {{ pattern }}"),
    TemplateOp::Set("expressions.like_escape", "{{ like_expr }} ESCAPE {{ escape_char }}"),
    TemplateOp::Set(
        "expressions.sort",
        "{{ expr }} {% if asc %}ASC{% else %}DESC{% endif %} NULLS {% if nulls_first %}FIRST{% else %}LAST{% endif %}",
    ),
    TemplateOp::Set("quotes.identifiers", "\""),
    TemplateOp::Set("quotes.escape", "\"\""),
    TemplateOp::Set("params.param", "?"),
    TemplateOp::Set("types.string", "TEXT"),
    TemplateOp::Set("types.boolean", "BOOLEAN"),
    TemplateOp::Set("types.integer", "INTEGER"),
    TemplateOp::Set("types.bigint", "BIGINT"),
    TemplateOp::Set("types.float", "FLOAT"),
    TemplateOp::Set("types.double", "DOUBLE PRECISION"),
    TemplateOp::Set("types.decimal", "DECIMAL({{ precision }},{{ scale }})"),
    TemplateOp::Set("types.timestamp", "TIMESTAMP"),
    TemplateOp::Set("types.date", "DATE"),
    TemplateOp::Set("types.time", "TIME"),
    TemplateOp::Set("types.interval", "INTERVAL"),
    TemplateOp::Set("types.binary", "BYTEA"),
];

#[cfg(test)]
mod tests {
    use super::*;

    const FAMILY: &[TemplateOp] = &[
        TemplateOp::Delete("functions.PERCENTILECONT"),
        TemplateOp::Set("quotes.identifiers", "`"),
    ];

    const LEAF: &[TemplateOp] = &[TemplateOp::Set("types.boolean", "BOOL")];

    #[test]
    fn test_leaf_overrides_win() {
        let set = TemplateSet::resolve(&[BASE_TEMPLATES, FAMILY, LEAF]);
        assert_eq!(set.get("quotes.identifiers"), Some("`"));
        assert_eq!(set.get("types.boolean"), Some("BOOL"));
        assert_eq!(set.get("functions.SUM"), Some("SUM({{ args_concat }})"));
    }

    #[test]
    fn test_ancestor_deletion_is_terminal() {
        // The base layer defines PERCENTILECONT, the family layer deletes
        // it; a leaf that does not re-add it must not see it.
        let set = TemplateSet::resolve(&[BASE_TEMPLATES, FAMILY, LEAF]);
        assert!(!set.contains("functions.PERCENTILECONT"));
    }

    #[test]
    fn test_later_layer_can_readd_deleted_key() {
        const READD: &[TemplateOp] =
            &[TemplateOp::Set("functions.PERCENTILECONT", "APPROX_PERCENTILE({{ args_concat }})")];
        let set = TemplateSet::resolve(&[BASE_TEMPLATES, FAMILY, READD]);
        assert_eq!(
            set.get("functions.PERCENTILECONT"),
            Some("APPROX_PERCENTILE({{ args_concat }})")
        );
    }
}
