//! Parameter allocation: logical value registry, bind markers, wire
//! placeholders and the literal-inlining post-pass.
//!
//! SQL fragments are rendered with opaque markers (`$3$`) standing in
//! for parameter slots. A final build pass rewrites markers into the
//! dialect's wire placeholder family and produces the ordered parameter
//! list that travels with the statement.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PolysqlError, PolysqlResult};

/// A logical parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ParamValue {
    /// Literal rendering used by the inlining pass: quoted strings,
    /// `1`/`0` booleans, stringified numbers.
    pub fn to_literal(&self) -> String {
        match self {
            ParamValue::Null => "NULL".to_string(),
            ParamValue::Bool(b) => {
                if *b {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            }
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Float(n) => n.to_string(),
            ParamValue::String(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_literal())
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Float(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<Option<String>> for ParamValue {
    fn from(opt: Option<String>) -> Self {
        match opt {
            Some(s) => ParamValue::String(s),
            None => ParamValue::Null,
        }
    }
}

/// Wire placeholder family of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderStyle {
    /// Bare `?` (MySQL, SQLite, Snowflake, ...).
    Question,
    /// `$1`, `$2`, ... 1-based (Postgres family).
    Dollar,
    /// `:0`, `:1`, ... 0-based (Oracle-style engines).
    Colon,
}

impl PlaceholderStyle {
    /// Render the placeholder for a final (0-based) output slot.
    pub fn render(&self, slot: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${}", slot + 1),
            PlaceholderStyle::Colon => format!(":{}", slot),
        }
    }
}

/// How marker occurrences map to output parameter slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Every occurrence becomes its own slot; duplicated logical values
    /// are duplicated in the output list. Required for drivers without
    /// reusable positional parameters.
    Distinct,
    /// Occurrences sharing a logical index collapse to one slot at the
    /// position of their first occurrence.
    Reuse,
    /// Keep the symbolic `$N$` markers, for display and debugging.
    Symbolic,
}

fn marker_regex() -> Regex {
    Regex::new(r"\$(\d+)\$").unwrap()
}

/// Ordered registry of logical parameter values.
///
/// One allocator per compilation; sharing an allocator across concurrent
/// compilations corrupts marker ordering.
#[derive(Debug, Default)]
pub struct ParamAllocator {
    params: Vec<ParamValue>,
}

impl ParamAllocator {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Start from pre-allocated values; markers `$0$..$n-1$` are
    /// already meaningful for them.
    pub fn with_params(params: Vec<ParamValue>) -> Self {
        Self { params }
    }

    /// Append a value and return its marker.
    ///
    /// Indices are assigned once and are monotonically increasing; the
    /// same value allocated twice yields two distinct indices.
    pub fn allocate_param(&mut self, value: impl Into<ParamValue>) -> String {
        let index = self.params.len();
        self.params.push(value.into());
        format!("${}$", index)
    }

    /// Replace each `?` in `sql`, left to right, with a fresh marker for
    /// the corresponding value.
    pub fn allocate_params_for_question_string(
        &mut self,
        sql: &str,
        values: &[ParamValue],
    ) -> PolysqlResult<String> {
        let question_marks = sql.matches('?').count();
        if question_marks != values.len() {
            return Err(PolysqlError::programming(format!(
                "Expected {} parameters for '{}' but got {}",
                question_marks,
                sql,
                values.len()
            )));
        }
        let mut result = String::with_capacity(sql.len());
        let mut values = values.iter();
        for chunk in sql.split('?') {
            result.push_str(chunk);
            if let Some(value) = values.next() {
                result.push_str(&self.allocate_param(value.clone()));
            }
        }
        Ok(result)
    }

    /// True when `sql` contains at least one allocator marker.
    pub fn has_parameters_in_sql(&self, sql: &str) -> bool {
        marker_regex().is_match(sql)
    }

    /// The logical values allocated so far, in allocation order.
    pub fn params(&self) -> &[ParamValue] {
        &self.params
    }

    /// Rewrite markers into wire placeholders and produce the ordered
    /// bind-parameter list.
    pub fn build_sql_and_params(
        &self,
        annotated_sql: &str,
        style: PlaceholderStyle,
        mode: BuildMode,
    ) -> PolysqlResult<(String, Vec<ParamValue>)> {
        if mode == BuildMode::Symbolic {
            // Validate marker references even when leaving them in place.
            for capture in marker_regex().captures_iter(annotated_sql) {
                self.logical_param(&capture[1])?;
            }
            return Ok((annotated_sql.to_string(), self.params.clone()));
        }

        let re = marker_regex();
        let mut sql = String::with_capacity(annotated_sql.len());
        let mut in_order = Vec::new();
        // logical index -> output slot, first occurrence wins (Reuse mode)
        let mut slot_by_index: Vec<Option<usize>> = vec![None; self.params.len()];
        let mut last_end = 0;

        for capture in re.captures_iter(annotated_sql) {
            let whole = capture.get(0).unwrap();
            let index_str = &capture[1];
            let (index, value) = self.logical_param(index_str)?;
            sql.push_str(&annotated_sql[last_end..whole.start()]);
            let slot = match mode {
                BuildMode::Distinct => {
                    in_order.push(value.clone());
                    in_order.len() - 1
                }
                BuildMode::Reuse => match slot_by_index[index] {
                    Some(slot) => slot,
                    None => {
                        in_order.push(value.clone());
                        let slot = in_order.len() - 1;
                        slot_by_index[index] = Some(slot);
                        slot
                    }
                },
                BuildMode::Symbolic => unreachable!(),
            };
            sql.push_str(&style.render(slot));
            last_end = whole.end();
        }
        sql.push_str(&annotated_sql[last_end..]);

        Ok((sql, in_order))
    }

    fn logical_param(&self, index_str: &str) -> PolysqlResult<(usize, &ParamValue)> {
        let index: usize = index_str
            .parse()
            .map_err(|_| PolysqlError::programming(format!("Bad param marker '${}$'", index_str)))?;
        match self.params.get(index) {
            Some(value) => Ok((index, value)),
            None => Err(PolysqlError::programming(format!(
                "Param at '{}' position was not allocated",
                index
            ))),
        }
    }
}

/// Oracle-style inlining pass: substitute each `:N` placeholder with the
/// literal rendering of `params[N]`, returning the rewritten SQL and the
/// parameters that were *not* consumed.
///
/// Used when the target statement shape cannot carry out-of-band bind
/// parameters (DDL wrappers, drivers without bind support).
pub fn inline_params(
    sql: &str,
    params: &[ParamValue],
) -> PolysqlResult<(String, Vec<ParamValue>)> {
    let re = Regex::new(r":(\d+)").unwrap();
    let mut consumed = vec![false; params.len()];
    let mut result = String::with_capacity(sql.len());
    let mut last_end = 0;

    for capture in re.captures_iter(sql) {
        let whole = capture.get(0).unwrap();
        let slot: usize = capture[1]
            .parse()
            .map_err(|_| PolysqlError::programming(format!("Bad placeholder '{}'", &capture[0])))?;
        let value = params.get(slot).ok_or_else(|| {
            PolysqlError::programming(format!("Param at '{}' position was not allocated", slot))
        })?;
        result.push_str(&sql[last_end..whole.start()]);
        result.push_str(&value.to_literal());
        consumed[slot] = true;
        last_end = whole.end();
    }
    result.push_str(&sql[last_end..]);

    let pending = params
        .iter()
        .zip(consumed)
        .filter(|(_, used)| !used)
        .map(|(value, _)| value.clone())
        .collect();
    Ok((result, pending))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_allocate_returns_monotonic_markers() {
        let mut allocator = ParamAllocator::new();
        assert_eq!(allocator.allocate_param("a"), "$0$");
        assert_eq!(allocator.allocate_param("a"), "$1$");
        assert_eq!(allocator.allocate_param(42), "$2$");
        assert_eq!(allocator.params().len(), 3);
    }

    #[test]
    fn test_build_distinct_duplicates_values() {
        let mut allocator = ParamAllocator::new();
        let a = allocator.allocate_param("a");
        let b = allocator.allocate_param("b");
        let sql = format!("x = {} AND y = {} AND z = {}", b, a, b);
        let (sql, params) = allocator
            .build_sql_and_params(&sql, PlaceholderStyle::Question, BuildMode::Distinct)
            .unwrap();
        assert_eq!(sql, "x = ? AND y = ? AND z = ?");
        assert_eq!(
            params,
            vec![
                ParamValue::String("b".into()),
                ParamValue::String("a".into()),
                ParamValue::String("b".into())
            ]
        );
    }

    #[test]
    fn test_build_reuse_collapses_to_first_occurrence() {
        // occurrence order [1, 0, 1, 2] over values [A, B, C]
        let mut allocator = ParamAllocator::new();
        allocator.allocate_param("A");
        allocator.allocate_param("B");
        allocator.allocate_param("C");
        let (sql, params) = allocator
            .build_sql_and_params(
                "$1$ $0$ $1$ $2$",
                PlaceholderStyle::Dollar,
                BuildMode::Reuse,
            )
            .unwrap();
        assert_eq!(sql, "$1 $2 $1 $3");
        assert_eq!(
            params,
            vec![
                ParamValue::String("B".into()),
                ParamValue::String("A".into()),
                ParamValue::String("C".into())
            ]
        );
    }

    #[test]
    fn test_build_symbolic_keeps_markers() {
        let mut allocator = ParamAllocator::new();
        let marker = allocator.allocate_param("a");
        let sql = format!("x = {}", marker);
        let (out, params) = allocator
            .build_sql_and_params(&sql, PlaceholderStyle::Question, BuildMode::Symbolic)
            .unwrap();
        assert_eq!(out, "x = $0$");
        assert_eq!(params, vec![ParamValue::String("a".into())]);
    }

    #[test]
    fn test_unallocated_marker_is_fatal() {
        let allocator = ParamAllocator::new();
        let err = allocator
            .build_sql_and_params("x = $0$", PlaceholderStyle::Question, BuildMode::Distinct)
            .unwrap_err();
        assert!(err.to_string().contains("was not allocated"));
    }

    #[test]
    fn test_question_string_allocation() {
        let mut allocator = ParamAllocator::new();
        let sql = allocator
            .allocate_params_for_question_string("x BETWEEN ? AND ?", &["a".into(), "b".into()])
            .unwrap();
        assert_eq!(sql, "x BETWEEN $0$ AND $1$");
        assert!(allocator.has_parameters_in_sql(&sql));

        let err = allocator
            .allocate_params_for_question_string("x = ?", &[])
            .unwrap_err();
        assert!(matches!(err, PolysqlError::Programming(_)));
    }

    #[test]
    fn test_inline_params_substitutes_literals() {
        let (sql, pending) = inline_params("WHERE x = :0", &["abc".into()]).unwrap();
        assert_eq!(sql, "WHERE x = 'abc'");
        assert!(pending.is_empty());

        let (sql, pending) =
            inline_params("WHERE a = :0 AND b = :0", &["o'neil".into(), true.into()]).unwrap();
        assert_eq!(sql, "WHERE a = 'o''neil' AND b = 'o''neil'");
        assert_eq!(pending, vec![ParamValue::Bool(true)]);
    }
}
