//! Visual Studio toolset generations.
//!
//! The toolset is the ambient version context of the option parser and the
//! emitters: several flags only exist from a given generation on, and the
//! project file shape changes at VS2010 (MSBuild).

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:vs)?(\d{4})$").expect("valid regex"));
static PLATFORM_TOOLSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v(\d{2,3})$").expect("valid regex"));
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?:\.(\d+))?$").expect("valid regex"));

/// Toolset generations, oldest first. Ordering is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolsetVersion {
    Vs2002,
    Vs2003,
    Vs2005,
    Vs2008,
    Vs2010,
    Vs2012,
    Vs2013,
    Vs2015,
    Vs2017,
    Vs2019,
    Vs2022,
}

impl Default for ToolsetVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl ToolsetVersion {
    pub const ALL: [ToolsetVersion; 11] = [
        Self::Vs2002,
        Self::Vs2003,
        Self::Vs2005,
        Self::Vs2008,
        Self::Vs2010,
        Self::Vs2012,
        Self::Vs2013,
        Self::Vs2015,
        Self::Vs2017,
        Self::Vs2019,
        Self::Vs2022,
    ];

    pub fn latest() -> Self {
        Self::Vs2022
    }

    /// Accepts `2019`, `vs2019`, `v142`, `16` and `16.0`.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_lowercase();

        if let Some(caps) = YEAR_RE.captures(&s) {
            return match &caps[1] {
                "2002" => Some(Self::Vs2002),
                "2003" => Some(Self::Vs2003),
                "2005" => Some(Self::Vs2005),
                "2008" => Some(Self::Vs2008),
                "2010" => Some(Self::Vs2010),
                "2012" => Some(Self::Vs2012),
                "2013" => Some(Self::Vs2013),
                "2015" => Some(Self::Vs2015),
                "2017" => Some(Self::Vs2017),
                "2019" => Some(Self::Vs2019),
                "2022" => Some(Self::Vs2022),
                _ => None,
            };
        }

        if let Some(caps) = PLATFORM_TOOLSET_RE.captures(&s) {
            return Self::ALL
                .into_iter()
                .find(|v| v.platform_toolset() == format!("v{}", &caps[1]));
        }

        if let Some(caps) = VERSION_RE.captures(&s) {
            let minor = caps.get(2).map(|m| m.as_str()).unwrap_or("0");
            return match (&caps[1], minor) {
                ("7", "0") => Some(Self::Vs2002),
                ("7", "1") => Some(Self::Vs2003),
                ("8", _) => Some(Self::Vs2005),
                ("9", _) => Some(Self::Vs2008),
                ("10", _) => Some(Self::Vs2010),
                ("11", _) => Some(Self::Vs2012),
                ("12", _) => Some(Self::Vs2013),
                ("14", _) => Some(Self::Vs2015),
                ("15", _) => Some(Self::Vs2017),
                ("16", _) => Some(Self::Vs2019),
                ("17", _) => Some(Self::Vs2022),
                _ => None,
            };
        }

        None
    }

    /// VS2010 and later use MSBuild project files (split body + filters).
    pub fn uses_msbuild(self) -> bool {
        self >= Self::Vs2010
    }

    pub fn platform_toolset(self) -> &'static str {
        match self {
            Self::Vs2002 => "v70",
            Self::Vs2003 => "v71",
            Self::Vs2005 => "v80",
            Self::Vs2008 => "v90",
            Self::Vs2010 => "v100",
            Self::Vs2012 => "v110",
            Self::Vs2013 => "v120",
            Self::Vs2015 => "v140",
            Self::Vs2017 => "v141",
            Self::Vs2019 => "v142",
            Self::Vs2022 => "v143",
        }
    }

    /// `Version` attribute of a `.vcproj` file.
    pub fn vcproj_version(self) -> &'static str {
        match self {
            Self::Vs2002 => "7.00",
            Self::Vs2003 => "7.10",
            Self::Vs2005 => "8.00",
            _ => "9.00",
        }
    }

    /// `ToolsVersion` attribute of a `.vcxproj` file.
    pub fn tools_version(self) -> &'static str {
        match self {
            Self::Vs2013 => "12.0",
            Self::Vs2015 => "14.0",
            Self::Vs2017 => "15.0",
            Self::Vs2019 => "16.0",
            Self::Vs2022 => "17.0",
            _ => "4.0",
        }
    }

    pub fn solution_format_version(self) -> &'static str {
        match self {
            Self::Vs2002 => "7.00",
            Self::Vs2003 => "8.00",
            Self::Vs2005 => "9.00",
            Self::Vs2008 => "10.00",
            Self::Vs2010 => "11.00",
            _ => "12.00",
        }
    }

    /// Second header line of a solution file, if the generation writes one.
    pub fn solution_comment(self) -> Option<&'static str> {
        match self {
            Self::Vs2002 | Self::Vs2003 => None,
            Self::Vs2005 => Some("# Visual Studio 2005"),
            Self::Vs2008 => Some("# Visual Studio 2008"),
            Self::Vs2010 => Some("# Visual Studio 2010"),
            Self::Vs2012 => Some("# Visual Studio 2012"),
            Self::Vs2013 => Some("# Visual Studio 2013"),
            Self::Vs2015 => Some("# Visual Studio 14"),
            Self::Vs2017 => Some("# Visual Studio 15"),
            Self::Vs2019 => Some("# Visual Studio Version 16"),
            Self::Vs2022 => Some("# Visual Studio Version 17"),
        }
    }

    /// Project file extension for this generation.
    pub fn project_extension(self) -> &'static str {
        if self.uses_msbuild() {
            "vcxproj"
        } else {
            "vcproj"
        }
    }
}

impl fmt::Display for ToolsetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = match self {
            Self::Vs2002 => "2002",
            Self::Vs2003 => "2003",
            Self::Vs2005 => "2005",
            Self::Vs2008 => "2008",
            Self::Vs2010 => "2010",
            Self::Vs2012 => "2012",
            Self::Vs2013 => "2013",
            Self::Vs2015 => "2015",
            Self::Vs2017 => "2017",
            Self::Vs2019 => "2019",
            Self::Vs2022 => "2022",
        };
        write!(f, "Visual Studio {}", year)
    }
}
