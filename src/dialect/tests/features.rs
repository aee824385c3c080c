//! Contract properties that must hold for every registered variant.

use crate::dialect::registry::DatabaseType;
use crate::dialect::traits::MatchType;
use crate::error::PolysqlError;
use crate::params::PlaceholderStyle;
use crate::time::{Granularity, SqlInterval};

/// The granularities a backend genuinely cannot truncate to. Everything
/// else must render, deterministically, for every registered key.
fn lacks_granularity(db_type: DatabaseType, granularity: Granularity) -> bool {
    matches!(
        (db_type, granularity),
        (DatabaseType::Mssql, Granularity::Week)
            | (DatabaseType::Hana, Granularity::Week)
            | (
                DatabaseType::Elasticsearch | DatabaseType::AwsElasticsearch,
                Granularity::Week | Granularity::Quarter
            )
            | (DatabaseType::Hive, Granularity::Quarter)
            | (DatabaseType::Sqlite, Granularity::Quarter)
    )
}

#[test]
fn test_granularity_support_matrix() {
    for db_type in DatabaseType::ALL {
        let generator = db_type.generator();
        for granularity in Granularity::ALL {
            let first = generator.time_grouped_column(granularity, "t.created_at");
            let second = generator.time_grouped_column(granularity, "t.created_at");
            if lacks_granularity(db_type, granularity) {
                let err = first.unwrap_err();
                assert!(
                    matches!(err, PolysqlError::UnsupportedFeature { .. }),
                    "{} {} should be unsupported, got: {}",
                    db_type,
                    granularity,
                    err
                );
            } else {
                assert_eq!(
                    first.unwrap(),
                    second.unwrap(),
                    "{} {} must render deterministically",
                    db_type,
                    granularity
                );
            }
        }
    }
}

#[test]
fn test_like_wildcard_placement_is_dialect_independent() {
    let cases = [
        (MatchType::Contains, true, true),
        (MatchType::Starts, false, true),
        (MatchType::Ends, true, false),
        (MatchType::Exact, false, false),
    ];
    for db_type in DatabaseType::ALL {
        let generator = db_type.generator();
        for (match_type, leading, trailing) in cases {
            let sql = generator.like_ignore_case("t.name", false, "$5$", match_type);
            let marker = sql.find("$5$").unwrap();
            assert_eq!(
                sql[..marker].contains("'%'"),
                leading,
                "{} {:?}: leading wildcard in {}",
                db_type,
                match_type,
                sql
            );
            assert_eq!(
                sql[marker..].contains("'%'"),
                trailing,
                "{} {:?}: trailing wildcard in {}",
                db_type,
                match_type,
                sql
            );
            assert!(!sql.contains(" NOT "), "{}: {}", db_type, sql);

            let negated = generator.like_ignore_case("t.name", true, "$5$", match_type);
            assert!(negated.contains(" NOT "), "{}: {}", db_type, negated);
        }
    }
}

#[test]
fn test_date_bin_rejects_mixed_intervals_everywhere() {
    let mixed: SqlInterval = "1 month 3 days".parse().unwrap();
    for db_type in DatabaseType::ALL {
        let err = db_type
            .generator()
            .date_bin(&mixed, "t.ts", "2020-01-01T00:00:00.000")
            .unwrap_err();
        assert!(
            matches!(err, PolysqlError::UnsupportedFeature { .. }),
            "{}: {}",
            db_type,
            err
        );
    }
}

#[test]
fn test_group_by_clause_families() {
    let exprs = vec!["dim0".to_string(), "dim1".to_string()];
    for db_type in DatabaseType::ALL {
        let generator = db_type.generator();
        let ordinal = !matches!(
            db_type,
            DatabaseType::Mssql
                | DatabaseType::Oracle
                | DatabaseType::Hana
                | DatabaseType::Clickhouse
                | DatabaseType::Hive
                | DatabaseType::Elasticsearch
                | DatabaseType::AwsElasticsearch
        );
        let expected = if ordinal {
            " GROUP BY 1, 2"
        } else {
            " GROUP BY dim0, dim1"
        };
        assert_eq!(generator.group_by_clause(&exprs), expected, "{}", db_type);
        assert_eq!(generator.group_by_clause(&[]), "", "{}", db_type);
    }
}

#[test]
fn test_placeholder_style_families() {
    for db_type in DatabaseType::ALL {
        let expected = match db_type {
            DatabaseType::Postgres
            | DatabaseType::Materialize
            | DatabaseType::Redshift
            | DatabaseType::Crate => PlaceholderStyle::Dollar,
            DatabaseType::Oracle => PlaceholderStyle::Colon,
            _ => PlaceholderStyle::Question,
        };
        assert_eq!(
            db_type.generator().placeholder_style(),
            expected,
            "{}",
            db_type
        );
    }
}

#[test]
fn test_approximate_distinct_support_is_explicit() {
    for db_type in DatabaseType::ALL {
        let generator = db_type.generator();
        let supported = matches!(
            db_type,
            DatabaseType::Postgres
                | DatabaseType::Materialize
                | DatabaseType::Bigquery
                | DatabaseType::Redshift
                | DatabaseType::Snowflake
                | DatabaseType::Clickhouse
                | DatabaseType::Vertica
                | DatabaseType::Mssql
                | DatabaseType::Presto
                | DatabaseType::Trino
        );
        match generator.count_distinct_approx("user_id") {
            Ok(sql) => assert!(supported, "{} should not render '{}'", db_type, sql),
            Err(err) => {
                assert!(!supported, "{}: {}", db_type, err);
                assert!(
                    matches!(err, PolysqlError::UnsupportedFeature { .. }),
                    "{}: {}",
                    db_type,
                    err
                );
            }
        }
    }
}

#[test]
fn test_alias_length_enforcement() {
    let generator = DatabaseType::Postgres.generator();
    assert_eq!(
        generator.checked_alias("orders__created_at").unwrap(),
        "orders__created_at"
    );
    let long = "a".repeat(64);
    let err = generator.checked_alias(&long).unwrap_err();
    assert!(matches!(
        err,
        PolysqlError::NamingConstraintViolation { limit: 63, .. }
    ));
    assert!(err.to_string().contains("explicit alias"));

    // no documented limit, any length goes through
    assert!(DatabaseType::Sqlite.generator().checked_alias(&long).is_ok());
}

#[test]
fn test_template_deletions_survive_leaf_layers() {
    // The MySQL family layer deletes the percentile template the base
    // layer defines; the resolved set must not resurrect it.
    let mysql = DatabaseType::Mysql.generator();
    assert!(!mysql.sql_templates().contains("functions.PERCENTILECONT"));

    // Presto re-adds it explicitly with its approximate form.
    let presto = DatabaseType::Presto.generator();
    assert_eq!(
        presto.sql_templates().get("functions.PERCENTILECONT"),
        Some("APPROX_PERCENTILE({{ args_concat }})")
    );

    // CrateDB folds base -> postgres family -> leaf; the leaf deletion
    // wins while the family's param template survives.
    let crate_db = DatabaseType::Crate.generator();
    assert!(!crate_db.sql_templates().contains("types.interval"));
    assert_eq!(
        crate_db.sql_templates().get("params.param"),
        Some("${{ param_index + 1 }}")
    );
}

#[test]
fn test_segment_wrap_families() {
    assert_eq!(
        DatabaseType::Postgres
            .generator()
            .wrap_segment_for_dimension_select("x > 1"),
        "x > 1"
    );
    assert_eq!(
        DatabaseType::Mysql
            .generator()
            .wrap_segment_for_dimension_select("x > 1"),
        "IF(x > 1, 1, 0)"
    );
    assert_eq!(
        DatabaseType::Mssql
            .generator()
            .wrap_segment_for_dimension_select("x > 1"),
        "CASE WHEN x > 1 THEN 1 ELSE 0 END"
    );
}
