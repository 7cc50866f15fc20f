use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::Path;
use serde::{Deserialize, Serialize};
use math_rsk::DEFAULT_EDGE_TOLERANCE;
use skin_rsk::{DirectionBlend, PropagationBudget, DEFAULT_DECAY_BASE, DEFAULT_MAX_ITERATIONS};

#[derive(Debug)]
pub enum ConfigError
{
    Io(std::io::Error),
    Parse(toml::de::Error),
}
impl Display for ConfigError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}
impl Error for ConfigError { }
impl From<std::io::Error> for ConfigError
{
    fn from(e: std::io::Error) -> Self { Self::Io(e) }
}
impl From<toml::de::Error> for ConfigError
{
    fn from(e: toml::de::Error) -> Self { Self::Parse(e) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig
{
    pub decay_base: f64,
    pub max_iterations: u32, // 0 runs until convergence
}
impl Default for PropagationConfig
{
    fn default() -> Self
    {
        Self
        {
            decay_base: DEFAULT_DECAY_BASE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig
{
    pub edge_tolerance: f32,
}
impl Default for PickingConfig
{
    fn default() -> Self { Self { edge_tolerance: DEFAULT_EDGE_TOLERANCE } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig
{
    pub speed: f32,
    pub autoplay: bool, // start playing as soon as a clip is added
}
impl Default for PlaybackConfig
{
    fn default() -> Self { Self { speed: 1.0, autoplay: true } }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakingConfig
{
    pub direction_blend: DirectionBlend,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig
{
    pub propagation: PropagationConfig,
    pub picking: PickingConfig,
    pub playback: PlaybackConfig,
    pub baking: BakingConfig,
}
impl EditorConfig
{
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError>
    {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded editor config from '{}'", path.as_ref().display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError>
    {
        Ok(toml::from_str(text)?)
    }

    #[must_use]
    pub fn to_toml_string(&self) -> String
    {
        // plain data, cannot fail
        toml::to_string_pretty(self).unwrap_or_default()
    }

    #[must_use]
    pub fn propagation_budget(&self) -> PropagationBudget
    {
        PropagationBudget
        {
            decay_base: self.propagation.decay_base,
            max_iterations: (self.propagation.max_iterations > 0).then_some(self.propagation.max_iterations),
        }
    }
}
