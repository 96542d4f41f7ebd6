use std::fmt::{self, Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TMSH_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#TMSH-VERSION:[ \t]*(\d[^\s]*)[ \t]*\r?$").expect("valid version pattern")
});

/// Return the version token from a `#TMSH-VERSION: <version>` header line.
pub fn detect_version(text: &str) -> Option<&str> {
    TMSH_VERSION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Major/minor pair used to pick a pattern dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TmosVersion {
    pub major: u32,
    pub minor: u32,
}

impl TmosVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse the leading `major.minor` of a raw version string such as `15.1.0.4`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts
            .next()
            .map(|part| {
                part.chars()
                    .take_while(char::is_ascii_digit)
                    .collect::<String>()
            })
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0);
        Some(Self { major, minor })
    }
}

impl Display for TmosVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::{detect_version, TmosVersion};

    #[test]
    fn extracts_version_from_header_line() {
        let text = "#TMSH-VERSION: 15.1.0.4\n\nltm node /Common/n1 { }\n";
        assert_eq!(detect_version(text), Some("15.1.0.4"));
    }

    #[test]
    fn tolerates_crlf_header() {
        assert_eq!(detect_version("#TMSH-VERSION: 13.1.3\r\nsys x { }\r\n"), Some("13.1.3"));
    }

    #[test]
    fn missing_header_yields_none() {
        assert_eq!(detect_version("ltm node /Common/n1 { }\n"), None);
        assert_eq!(detect_version("#TMSH-VERSION: \n"), None);
    }

    #[test]
    fn parses_major_minor() {
        assert_eq!(TmosVersion::parse("15.1.0.4"), Some(TmosVersion::new(15, 1)));
        assert_eq!(TmosVersion::parse("11.2"), Some(TmosVersion::new(11, 2)));
        assert_eq!(TmosVersion::parse("17"), Some(TmosVersion::new(17, 0)));
        assert_eq!(TmosVersion::parse("16.1a"), Some(TmosVersion::new(16, 1)));
        assert_eq!(TmosVersion::parse("x.1"), None);
    }
}
