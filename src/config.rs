use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::pose::ModelType;
use crate::render::OverlayFlags;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VideoConfig {
    /// 基準動画のパス
    #[serde(default = "default_reference_path")]
    pub reference_path: String,
    /// 描画済み入力動画の保存先
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// 保存する動画のFPS
    #[serde(default = "default_output_fps")]
    pub output_fps: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    /// "movenet-lightning" | "movenet-multipose"
    #[serde(default = "default_network")]
    pub network: String,
    /// ONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// キーポイント・人物の検出閾値
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// 描画オプション (e.g. "links,keypoints")
    #[serde(default = "default_overlay")]
    pub overlay: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// tracing の EnvFilter 文字列 (RUST_LOG が優先)
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_reference_path() -> String { "/home/nvidia/myproject/tiger.mp4".to_string() }
fn default_output_path() -> String { "/home/nvidia/myproject/annotated_output.mp4".to_string() }
fn default_output_fps() -> f64 { 30.0 }
fn default_network() -> String { "movenet-multipose".to_string() }
fn default_model_path() -> String { "models/movenet_multipose.onnx".to_string() }
fn default_threshold() -> f32 { 0.15 }
fn default_overlay() -> String { "links,keypoints".to_string() }
fn default_log_filter() -> String { "pose_compare=info,ort=warn".to_string() }

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            reference_path: default_reference_path(),
            output_path: default_output_path(),
            output_fps: default_output_fps(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            model_path: default_model_path(),
            threshold: default_threshold(),
            overlay: default_overlay(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl DetectorConfig {
    pub fn model_type(&self) -> Result<ModelType> {
        self.network.parse()
    }

    pub fn overlay_flags(&self) -> Result<OverlayFlags> {
        self.overlay.parse()
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// ファイルがなければデフォルト。あるのに読めなければエラー
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path).with_context(|| format!("Failed to load {}", path.display()))
    }
}
