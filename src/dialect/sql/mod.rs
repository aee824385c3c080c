//! Concrete dialect variants. One file per backend; family keys
//! (mariadb, mongobi, materialize, awselasticsearch, trino) share the
//! generator of the dialect they speak.

pub mod bigquery;
pub mod clickhouse;
pub mod cratedb;
pub mod elasticsearch;
pub mod hana;
pub mod hive;
pub mod mssql;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod presto;
pub mod redshift;
pub mod snowflake;
pub mod sqlite;
pub mod vertica;

pub use bigquery::BigqueryGenerator;
pub use clickhouse::ClickhouseGenerator;
pub use cratedb::CrateGenerator;
pub use elasticsearch::ElasticSearchGenerator;
pub use hana::HanaGenerator;
pub use hive::HiveGenerator;
pub use mssql::MssqlGenerator;
pub use mysql::MysqlGenerator;
pub use oracle::OracleGenerator;
pub use postgres::PostgresGenerator;
pub use presto::PrestoGenerator;
pub use redshift::RedshiftGenerator;
pub use snowflake::SnowflakeGenerator;
pub use sqlite::SqliteGenerator;
pub use vertica::VerticaGenerator;
