//! Database-type registry: the closed key space and its resolution
//! into dialect generators.

use strsim::levenshtein;

use crate::error::{PolysqlError, PolysqlResult};

use super::sql::{
    BigqueryGenerator, ClickhouseGenerator, CrateGenerator, ElasticSearchGenerator,
    HanaGenerator, HiveGenerator, MssqlGenerator, MysqlGenerator, OracleGenerator,
    PostgresGenerator, PrestoGenerator, RedshiftGenerator, SnowflakeGenerator, SqliteGenerator,
    VerticaGenerator,
};
use super::traits::SqlGenerator;

/// Constructor for a dialect generator, used for explicit overrides.
pub type GeneratorFactory = fn() -> Box<dyn SqlGenerator>;

/// The supported database-type keys. Keys are case-sensitive; adding a
/// backend means adding a variant here and the match arms below, which
/// the compiler checks exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseType {
    Postgres,
    Materialize,
    Mysql,
    Mariadb,
    Mongobi,
    Bigquery,
    Redshift,
    Snowflake,
    Clickhouse,
    Hive,
    Oracle,
    Sqlite,
    Vertica,
    Elasticsearch,
    AwsElasticsearch,
    Hana,
    Mssql,
    Presto,
    Trino,
    Crate,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 20] = [
        DatabaseType::Postgres,
        DatabaseType::Materialize,
        DatabaseType::Mysql,
        DatabaseType::Mariadb,
        DatabaseType::Mongobi,
        DatabaseType::Bigquery,
        DatabaseType::Redshift,
        DatabaseType::Snowflake,
        DatabaseType::Clickhouse,
        DatabaseType::Hive,
        DatabaseType::Oracle,
        DatabaseType::Sqlite,
        DatabaseType::Vertica,
        DatabaseType::Elasticsearch,
        DatabaseType::AwsElasticsearch,
        DatabaseType::Hana,
        DatabaseType::Mssql,
        DatabaseType::Presto,
        DatabaseType::Trino,
        DatabaseType::Crate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "postgres",
            DatabaseType::Materialize => "materialize",
            DatabaseType::Mysql => "mysql",
            DatabaseType::Mariadb => "mariadb",
            DatabaseType::Mongobi => "mongobi",
            DatabaseType::Bigquery => "bigquery",
            DatabaseType::Redshift => "redshift",
            DatabaseType::Snowflake => "snowflake",
            DatabaseType::Clickhouse => "clickhouse",
            DatabaseType::Hive => "hive",
            DatabaseType::Oracle => "oracle",
            DatabaseType::Sqlite => "sqlite",
            DatabaseType::Vertica => "vertica",
            DatabaseType::Elasticsearch => "elasticsearch",
            DatabaseType::AwsElasticsearch => "awselasticsearch",
            DatabaseType::Hana => "hana",
            DatabaseType::Mssql => "mssql",
            DatabaseType::Presto => "presto",
            DatabaseType::Trino => "trino",
            DatabaseType::Crate => "crate",
        }
    }

    /// Construct the generator for this database type. Family keys map
    /// to the generator of the dialect they speak.
    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            DatabaseType::Postgres | DatabaseType::Materialize => {
                Box::new(PostgresGenerator::new())
            }
            DatabaseType::Mysql | DatabaseType::Mariadb | DatabaseType::Mongobi => {
                Box::new(MysqlGenerator::new())
            }
            DatabaseType::Bigquery => Box::new(BigqueryGenerator::new()),
            DatabaseType::Redshift => Box::new(RedshiftGenerator::new()),
            DatabaseType::Snowflake => Box::new(SnowflakeGenerator::new()),
            DatabaseType::Clickhouse => Box::new(ClickhouseGenerator::new()),
            DatabaseType::Hive => Box::new(HiveGenerator::new()),
            DatabaseType::Oracle => Box::new(OracleGenerator::new()),
            DatabaseType::Sqlite => Box::new(SqliteGenerator::new()),
            DatabaseType::Vertica => Box::new(VerticaGenerator::new()),
            DatabaseType::Elasticsearch | DatabaseType::AwsElasticsearch => {
                Box::new(ElasticSearchGenerator::new())
            }
            DatabaseType::Hana => Box::new(HanaGenerator::new()),
            DatabaseType::Mssql => Box::new(MssqlGenerator::new()),
            DatabaseType::Presto | DatabaseType::Trino => Box::new(PrestoGenerator::new()),
            DatabaseType::Crate => Box::new(CrateGenerator::new()),
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatabaseType {
    type Err = PolysqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatabaseType::ALL
            .into_iter()
            .find(|db_type| db_type.as_str() == s)
            .ok_or_else(|| PolysqlError::undefined_dialect(s, did_you_mean(s)))
    }
}

/// Closest registered key within a length-scaled Levenshtein threshold.
fn did_you_mean(input: &str) -> Option<String> {
    let threshold = match input.len() {
        0..=2 => 0,
        3..=5 => 2,
        _ => 3,
    };
    DatabaseType::ALL
        .into_iter()
        .map(|db_type| (levenshtein(input, db_type.as_str()), db_type))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, db_type)| db_type.as_str().to_string())
}

/// Resolve a database-type key into a generator. An explicit override
/// factory always wins; an unknown key with no override fails before
/// any rendering starts.
pub fn resolve_generator(
    db_type: &str,
    override_factory: Option<GeneratorFactory>,
) -> PolysqlResult<Box<dyn SqlGenerator>> {
    if let Some(factory) = override_factory {
        return Ok(factory());
    }
    Ok(db_type.parse::<DatabaseType>()?.generator())
}

/// Primary and secondary ("external") dialect selection for one
/// compilation. The external pair covers a distinct storage engine
/// backing precomputed aggregates and resolves with the same rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialectSpec<'a> {
    pub db_type: &'a str,
    pub dialect_factory: Option<GeneratorFactory>,
    pub external_db_type: Option<&'a str>,
    pub external_dialect_factory: Option<GeneratorFactory>,
}

#[derive(Debug)]
pub struct ResolvedDialects {
    pub query: Box<dyn SqlGenerator>,
    pub external: Option<Box<dyn SqlGenerator>>,
}

pub fn resolve_dialects(spec: &DialectSpec<'_>) -> PolysqlResult<ResolvedDialects> {
    let query = resolve_generator(spec.db_type, spec.dialect_factory)?;
    let external =
        if spec.external_db_type.is_some() || spec.external_dialect_factory.is_some() {
            Some(resolve_generator(
                spec.external_db_type.unwrap_or_default(),
                spec.external_dialect_factory,
            )?)
        } else {
            None
        };
    Ok(ResolvedDialects { query, external })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_resolves() {
        for db_type in DatabaseType::ALL {
            let generator = db_type.generator();
            assert!(!generator.name().is_empty());
            assert!(!generator.sql_templates().is_empty());
        }
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        assert!("postgres".parse::<DatabaseType>().is_ok());
        assert!("Postgres".parse::<DatabaseType>().is_err());
    }

    #[test]
    fn test_unknown_key_suggests_closest() {
        let err = "postgress".parse::<DatabaseType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Undefined dialect for database type 'postgress'. Did you mean 'postgres'?"
        );
    }

    fn clickhouse_factory() -> Box<dyn SqlGenerator> {
        Box::new(ClickhouseGenerator::new())
    }

    fn postgres_factory() -> Box<dyn SqlGenerator> {
        Box::new(PostgresGenerator::new())
    }

    #[test]
    fn test_override_wins_over_key_lookup() {
        let generator = resolve_generator("mysql", Some(clickhouse_factory)).unwrap();
        assert_eq!(generator.name(), "clickhouse");

        // an override even rescues an unknown key
        let generator = resolve_generator("no-such-db", Some(postgres_factory)).unwrap();
        assert_eq!(generator.name(), "postgres");
    }

    #[test]
    fn test_unknown_key_without_override_is_fatal() {
        let err = resolve_generator("no-such-db", None).unwrap_err();
        assert!(matches!(err, PolysqlError::UndefinedDialect { .. }));
    }

    #[test]
    fn test_family_keys_share_generators() {
        assert_eq!(DatabaseType::Mariadb.generator().name(), "mysql");
        assert_eq!(DatabaseType::Mongobi.generator().name(), "mysql");
        assert_eq!(DatabaseType::Materialize.generator().name(), "postgres");
        assert_eq!(DatabaseType::Trino.generator().name(), "presto");
        assert_eq!(
            DatabaseType::AwsElasticsearch.generator().name(),
            "elasticsearch"
        );
    }

    #[test]
    fn test_external_resolution_is_independent() {
        let resolved = resolve_dialects(&DialectSpec {
            db_type: "bigquery",
            external_db_type: Some("mysql"),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(resolved.query.name(), "bigquery");
        assert_eq!(resolved.external.unwrap().name(), "mysql");

        let none = resolve_dialects(&DialectSpec {
            db_type: "postgres",
            ..Default::default()
        })
        .unwrap();
        assert!(none.external.is_none());

        let err = resolve_dialects(&DialectSpec {
            db_type: "postgres",
            external_db_type: Some("wat"),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, PolysqlError::UndefinedDialect { .. }));
    }
}
