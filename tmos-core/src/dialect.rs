//! Versioned pattern dialects.
//!
//! Every TMOS release family gets one immutable [`PatternDialect`]: the module
//! keywords that open a top-level object, the name/body split, and the
//! per-feature patterns the digger uses on virtual-server and pool bodies.
//! Dialects are built once and shared; [`select_dialect`] maps a version string
//! onto the table and reports whether the match was exact or a fallback.
//!
//! ## Registered ranges
//!
//! | Versions      | Dialect          | Difference                                   |
//! |---------------|------------------|----------------------------------------------|
//! | 11.0 – 11.2   | `tmos-11-legacy` | SNAT as `snat automap` / `snatpool <name>`   |
//! | 11.3 – 17.x   | `tmos-base`      | SNAT as `source-address-translation { }`     |
//!
//! Anything else falls back to `tmos-base`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::blocks::block_body;
use crate::version::TmosVersion;

/// Module keywords that may open a top-level object.
pub const MODULES: &[&str] = &[
    "apm",
    "ltm",
    "security",
    "net",
    "pem",
    "sys",
    "wom",
    "ilx",
    "auth",
    "analytics",
    "gtm",
    "cli",
    "cm",
    "asm",
];

/// How a feature reference is pulled out of an object body.
#[derive(Debug)]
pub enum Extractor {
    /// Single-line property; capture group 1 holds the value.
    Line(Regex),
    /// Brace-delimited property; the pattern matches up to and including `{`.
    Block(Regex),
}

impl Extractor {
    /// Return the raw reference text for this feature, if present.
    pub fn extract<'a>(&self, body: &'a str) -> Option<&'a str> {
        match self {
            Extractor::Line(re) => re
                .captures(body)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim()),
            Extractor::Block(re) => {
                let open = re.find(body)?;
                block_body(body, open.end())
            }
        }
    }
}

/// Patterns applied to a virtual-server body.
///
/// Properties are matched at four spaces of indentation, the layout tmsh
/// writes to `bigip.conf`. An object collapsed onto one line
/// (`{ destination ... pool ... }`) yields no references.
#[derive(Debug)]
pub struct VirtualPatterns {
    pub destination: Extractor,
    /// Default pool; never matches the pool inside a SNAT block.
    pub pool: Extractor,
    pub profiles: Extractor,
    pub rules: Extractor,
    pub snat: Extractor,
    /// Pool name inside the extracted SNAT text.
    pub snat_pool_name: Regex,
    pub policies: Extractor,
    pub persist: Extractor,
    pub fallback_persist: Extractor,
}

/// Patterns applied to a pool body and its members.
///
/// Same four-space layout as [`VirtualPatterns`].
#[derive(Debug)]
pub struct PoolPatterns {
    pub members: Extractor,
    pub monitor: Extractor,
    /// `min <n> of { a b }` monitor rule; group 1 is the list.
    pub monitor_min_of: Regex,
    pub member_address: Regex,
    pub member_fqdn: Regex,
}

/// Immutable set of patterns for one TMOS release family.
#[derive(Debug)]
pub struct PatternDialect {
    pub name: &'static str,
    pub modules: &'static [&'static str],
    /// Splits a segmented object into name path (group 1) and body (group 2).
    pub name_value: Regex,
    pub virtual_server: VirtualPatterns,
    pub pool: PoolPatterns,
    /// Scopes searched, in order, for a profile reference.
    pub profile_scopes: &'static [&'static str],
}

impl PatternDialect {
    fn base() -> Self {
        Self {
            name: "tmos-base",
            modules: MODULES,
            name_value: regex(r"(?s)\A([\w\-/.:%~]+(?: [\w\-/.:%~]+)*) \{(.*)\}[ \t]*\n?\z"),
            virtual_server: VirtualPatterns {
                destination: Extractor::Line(regex(r"(?m)^ {4}destination (\S+)[ \t]*$")),
                pool: Extractor::Line(regex(r"(?m)^ {4}pool (\S+)[ \t]*$")),
                profiles: Extractor::Block(regex(r"(?m)^ {4}profiles \{")),
                rules: Extractor::Block(regex(r"(?m)^ {4}rules \{")),
                snat: Extractor::Block(regex(r"(?m)^ {4}source-address-translation \{")),
                snat_pool_name: regex(r"(?m)^\s*pool (\S+)"),
                policies: Extractor::Block(regex(r"(?m)^ {4}policies \{")),
                persist: Extractor::Block(regex(r"(?m)^ {4}persist \{")),
                fallback_persist: Extractor::Line(regex(
                    r"(?m)^ {4}fallback-persistence (\S+)[ \t]*$",
                )),
            },
            pool: PoolPatterns {
                members: Extractor::Block(regex(r"(?m)^ {4}members \{")),
                monitor: Extractor::Line(regex(r"(?m)^ {4}monitor (.+?)[ \t]*$")),
                monitor_min_of: regex(r"min \d+ of \{(.*)\}"),
                member_address: regex(r"(?m)^\s*address (\S+)"),
                member_fqdn: regex(r"(?m)^\s*fqdn \{"),
            },
            profile_scopes: &["ltm profile", "apm profile"],
        }
    }

    fn legacy_snat() -> Self {
        let mut dialect = Self::base();
        dialect.name = "tmos-11-legacy";
        dialect.virtual_server.snat =
            Extractor::Line(regex(r"(?m)^ {4}(snat automap|snatpool \S+)[ \t]*$"));
        dialect.virtual_server.snat_pool_name = regex(r"snatpool (\S+)");
        dialect
    }

    /// Whether `word` opens a top-level object in this dialect.
    pub fn is_module(&self, word: &str) -> bool {
        self.modules.contains(&word)
    }
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("dialect patterns are valid")
}

static BASE: LazyLock<PatternDialect> = LazyLock::new(PatternDialect::base);
static LEGACY_SNAT: LazyLock<PatternDialect> = LazyLock::new(PatternDialect::legacy_snat);

/// One row of the dialect table: an inclusive version range.
#[derive(Debug, Clone, Copy)]
pub struct DialectRange {
    pub from: TmosVersion,
    pub to: TmosVersion,
    pub dialect: &'static LazyLock<PatternDialect>,
}

impl DialectRange {
    fn contains(&self, version: TmosVersion) -> bool {
        self.from <= version && version <= self.to
    }
}

/// The registered dialect table, ordered by version.
pub static DIALECT_TABLE: &[DialectRange] = &[
    DialectRange {
        from: TmosVersion::new(11, 0),
        to: TmosVersion::new(11, 2),
        dialect: &LEGACY_SNAT,
    },
    DialectRange {
        from: TmosVersion::new(11, 3),
        to: TmosVersion::new(17, u32::MAX),
        dialect: &BASE,
    },
];

/// The dialect used for versions outside every registered range.
pub fn base_dialect() -> &'static PatternDialect {
    LazyLock::force(&BASE)
}

/// Outcome of mapping a version string onto the dialect table.
#[derive(Debug, Clone, Copy)]
pub struct DialectSelection {
    pub dialect: &'static PatternDialect,
    pub version: Option<TmosVersion>,
    /// `false` when no registered range covered the version.
    pub exact: bool,
}

impl Serialize for DialectSelection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("DialectSelection", 3)?;
        state.serialize_field("dialect", self.dialect.name)?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("exact", &self.exact)?;
        state.end()
    }
}

/// Pick the dialect for a raw version string such as `15.1.0.4`.
pub fn select_dialect(raw_version: &str) -> DialectSelection {
    let version = TmosVersion::parse(raw_version);
    let registered = version.and_then(|v| DIALECT_TABLE.iter().find(|range| range.contains(v)));

    match registered {
        Some(range) => DialectSelection {
            dialect: LazyLock::force(range.dialect),
            version,
            exact: true,
        },
        None => DialectSelection {
            dialect: base_dialect(),
            version,
            exact: false,
        },
    }
}
