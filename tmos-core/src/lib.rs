//! Version-aware TMOS configuration parsing and per-application reference digging.
//!
//! [`parse`] turns one or more `bigip.conf` style texts into an immutable
//! [`ConfigTree`]; [`ParsedConfig::apps`] then rebuilds, for every virtual
//! server, the minimal set of objects it depends on.

pub mod base;
pub mod blocks;
pub mod config;
pub mod diagnostic;
pub mod dialect;
pub mod dig;
pub mod index;
pub mod parser;
pub mod pool_refs;
pub mod resolve;
pub mod segment;
pub mod stats;
pub mod tree;
pub mod version;

pub use base::{dig_base_config, DEFAULT_BASE_OBJECTS};
pub use config::ParsedConfig;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use dialect::{select_dialect, DialectSelection, PatternDialect};
pub use dig::{dig_virtual, AppBundle, DefaultCounts, ReferenceMap};
pub use index::TreeIndex;
pub use parser::{parse, parse_with_observer, ConfigFile, ParseError, ParseEvent, SourceInfo};
pub use pool_refs::{pools_in_policy, pools_in_rule, PoolReference};
pub use resolve::{Resolved, Resolver};
pub use segment::ObjectRecord;
pub use stats::ParseStats;
pub use tree::{ConfigTree, TreeNode};
pub use version::{detect_version, TmosVersion};
