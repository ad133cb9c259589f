use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::section::align::{AlignConfig, AlignProfile};
use crate::section::segment::SegmenterConfig;

pub const CONFIG_FILENAME: &str = "draftdiff.toml";
pub const CONFIG_ENV_VAR: &str = "DRAFTDIFF_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub aligner: AlignerSection,
    #[serde(default)]
    pub segmenter: SegmenterSection,
    #[serde(default)]
    pub review: ReviewSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AlignerSection {
    /// "lenient" or "strict".
    #[serde(default)]
    pub profile: Option<String>,
    /// Overrides the profile's confidence floor.
    #[serde(default)]
    pub floor: Option<f32>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct SegmenterSection {
    /// Extra words treated as section-title vocabulary, on top of the
    /// built-in contract terms.
    #[serde(default)]
    pub extra_title_vocabulary: Vec<String>,
    #[serde(default)]
    pub header_len_ceiling: Option<usize>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ReviewSection {
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Character cap on section bodies shipped to the reviewer.
    #[serde(default)]
    pub excerpt_limit: Option<usize>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct OutputSection {
    #[serde(default)]
    pub pretty: Option<bool>,
}

impl AppConfig {
    /// File values seed the aligner; an explicit profile from the command
    /// line wins over the file.
    pub fn align_config(&self, profile_override: Option<AlignProfile>) -> AlignConfig {
        let profile = profile_override
            .or_else(|| match self.aligner.profile.as_deref().map(str::trim) {
                Some(p) if p.eq_ignore_ascii_case("strict") => Some(AlignProfile::Strict),
                Some(p) if p.eq_ignore_ascii_case("lenient") => Some(AlignProfile::Lenient),
                _ => None,
            })
            .unwrap_or_default();
        let mut cfg = AlignConfig::for_profile(profile);
        if let Some(floor) = self.aligner.floor {
            cfg.floor = floor;
        }
        cfg
    }

    pub fn segmenter_config(&self) -> SegmenterConfig {
        let mut cfg = SegmenterConfig {
            extra_title_vocabulary: self
                .segmenter
                .extra_title_vocabulary
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            ..SegmenterConfig::default()
        };
        if let Some(ceiling) = self.segmenter.header_len_ceiling {
            cfg.header_len_ceiling = ceiling;
        }
        cfg
    }

    pub fn review_enabled(&self) -> bool {
        self.review.enabled.unwrap_or(true)
    }

    pub fn review_excerpt(&self) -> usize {
        self.review
            .excerpt_limit
            .unwrap_or(crate::review::service::DEFAULT_EXCERPT_LIMIT)
    }

    pub fn pretty_output(&self) -> bool {
        self.output.pretty.unwrap_or(true)
    }
}

pub fn find_file_upwards(start_dir: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start_dir;
    for _ in 0..=max_levels {
        let candidate = dir.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
    None
}

/// Looks for `draftdiff.toml` near the invocation: current directory first,
/// then the documents' directory, then next to the executable.
pub fn find_default_config(workdir: &Path, filename: &str) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, filename, 8) {
            return Some(p);
        }
    }
    if let Some(p) = find_file_upwards(workdir, filename, 8) {
        return Some(p);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, filename, 10) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
    let cfg: AppConfig = toml::from_str(&text)
        .map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))?;
    Ok(cfg)
}

pub fn init_default_config(dir: &Path, force: bool) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::Config(format!("create config dir {}: {e}", dir.display())))?;
    let cfg_path = dir.join(CONFIG_FILENAME);
    if cfg_path.exists() && !force {
        return Ok(cfg_path);
    }
    std::fs::write(&cfg_path, DEFAULT_CONFIG_TOML)
        .map_err(|e| Error::Config(format!("write {}: {e}", cfg_path.display())))?;
    Ok(cfg_path)
}

const DEFAULT_CONFIG_TOML: &str = r#"[aligner]
# "lenient" scores titles by word overlap; "strict" only rewards exact or
# substring title matches and raises the confidence floor.
profile = "lenient"
# floor = 30.0

[segmenter]
# Words that mark a short line as a section title, in addition to the
# built-in contract vocabulary.
extra_title_vocabulary = []
# Lines longer than this are body text even when they look like headers.
# header_len_ceiling = 150

[review]
enabled = true
# Section bodies ship to the reviewer truncated to this many characters.
# excerpt_limit = 3000

[output]
pretty = true
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("empty toml");
        assert!(cfg.review_enabled());
        assert!(cfg.pretty_output());
        assert_eq!(cfg.review_excerpt(), 3000);
        let align = cfg.align_config(None);
        assert_eq!(align.profile, AlignProfile::Lenient);
        assert_eq!(align.floor, 30.0);
    }

    #[test]
    fn file_profile_and_floor_apply() {
        let cfg: AppConfig = toml::from_str(
            r#"
[aligner]
profile = "strict"
floor = 55.5

[review]
enabled = false
excerpt_limit = 500
"#,
        )
        .expect("toml");
        let align = cfg.align_config(None);
        assert_eq!(align.profile, AlignProfile::Strict);
        assert_eq!(align.floor, 55.5);
        assert!(!cfg.review_enabled());
        assert_eq!(cfg.review_excerpt(), 500);
    }

    #[test]
    fn cli_profile_beats_file_profile() {
        let cfg: AppConfig = toml::from_str("[aligner]\nprofile = \"strict\"\n").expect("toml");
        let align = cfg.align_config(Some(AlignProfile::Lenient));
        assert_eq!(align.profile, AlignProfile::Lenient);
        // The floor follows the chosen profile when the file sets none.
        assert_eq!(align.floor, 30.0);
    }

    #[test]
    fn segmenter_vocabulary_is_normalized() {
        let cfg: AppConfig = toml::from_str(
            "[segmenter]\nextra_title_vocabulary = [\" Escrow \", \"NOVATION\", \"\"]\n",
        )
        .expect("toml");
        let seg = cfg.segmenter_config();
        assert_eq!(seg.extra_title_vocabulary, vec!["escrow", "novation"]);
    }

    #[test]
    fn default_config_text_parses() {
        let cfg: AppConfig = toml::from_str(DEFAULT_CONFIG_TOML).expect("default toml");
        assert_eq!(cfg.aligner.profile.as_deref(), Some("lenient"));
        assert!(cfg.review_enabled());
    }
}
