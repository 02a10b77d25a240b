use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_COMPARE_FOLDER_NAME: &str = "#compare";

/// Which sibling directories are kept out of the compare folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiblingFilter {
    /// Only the chosen marked folder stays in place.
    #[default]
    ExcludeArtistOnly,
    /// Every marked directory stays in place.
    ExcludeAllMarked,
}

/// Directory whose children are partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionRoot {
    /// The input directory itself, or the containing directory of a file input.
    #[default]
    InputPath,
    /// The parent directory of the input path.
    InputParent,
}

/// Directory the compare folder is created under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareRoot {
    #[default]
    MarkedFolder,
    PartitionRoot,
}

macro_rules! snake_case_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().replace('-', "_").as_str() {
                    $($name => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown value '{}', expected one of: {}",
                        other,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($name),)+
                }
            }
        }
    };
}

snake_case_enum!(SiblingFilter {
    ExcludeArtistOnly => "exclude_artist_only",
    ExcludeAllMarked => "exclude_all_marked",
});

snake_case_enum!(PartitionRoot {
    InputPath => "input_path",
    InputParent => "input_parent",
});

snake_case_enum!(CompareRoot {
    MarkedFolder => "marked_folder",
    PartitionRoot => "partition_root",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sibling_filter: SiblingFilter,
    pub partition_root: PartitionRoot,
    pub compare_root: CompareRoot,
    pub compare_folder_name: String,
    pub ignore_patterns: Vec<String>,
    pub output_path: Option<String>,
    pub report_path: Option<String>,
    pub companion_path: Option<String>,
    pub force: bool,
    pub interactive: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sibling_filter: SiblingFilter::default(),
            partition_root: PartitionRoot::default(),
            compare_root: CompareRoot::default(),
            compare_folder_name: DEFAULT_COMPARE_FOLDER_NAME.to_string(),
            ignore_patterns: Vec::new(),
            output_path: None,
            report_path: None,
            companion_path: None,
            force: false,
            interactive: true,
        }
    }
}

impl AppConfig {
    /// Confirmation before moving is only asked of a human operator.
    pub fn confirm_moves(&self) -> bool {
        self.interactive && !self.force
    }
}

/// Load `Kavvka.{toml,json,yaml}` from the working directory (optional),
/// then `KAVVKA_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Kavvka").required(false))
        .add_source(Environment::with_prefix("KAVVKA").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
