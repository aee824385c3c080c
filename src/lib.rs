pub mod cache;
pub mod dialect;
pub mod error;
pub mod member;
pub mod params;
pub mod time;

pub use dialect::{resolve_generator, DatabaseType, SqlGenerator};
pub use error::{PolysqlError, PolysqlResult};

pub mod prelude {
    pub use crate::cache::QueryCache;
    pub use crate::dialect::{
        resolve_dialects, resolve_generator, DatabaseType, DialectSpec, MatchType, SqlGenerator,
        TemplateSet,
    };
    pub use crate::error::{PolysqlError, PolysqlResult};
    pub use crate::member::{
        Dimension, Filter, FilterItem, FilterOperator, GroupFilter, GroupOperator, MemberPath,
        QueryContext, Segment, SelectColumn,
    };
    pub use crate::params::{
        inline_params, BuildMode, ParamAllocator, ParamValue, PlaceholderStyle,
    };
    pub use crate::time::{Granularity, SqlInterval, TimeSeries};
}
