// thumbsmith/src/cli.rs
use crate::core::{Result, RunConfig, ThumbError};
use crate::engine::{GlobalTransform, ThumbnailSpec};
use crate::geometry::{GravitySelector, HAlign, RectSpec, VAlign};
use crate::strategy::{EncodeFormat, FillColor, QualityPreset, TransformStep};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "thumbsmith", version, about = "Batch thumbnail generator")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate thumbnail variants from one source image
    Generate(GenerateArgs),
    /// Print source image information
    Info { input: PathBuf },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Source image
    pub input: PathBuf,

    /// Root directory for generated variants
    #[arg(short, long, default_value = "thumbs")]
    pub output: PathBuf,

    /// Variant size, repeatable (e.g. -s 300x100 -s 200x200).
    /// Without any, the stock variant table is used.
    #[arg(short, long, value_name = "WxH")]
    pub size: Vec<String>,

    /// How each size maps the source onto the box
    #[arg(short, long, value_enum, default_value_t = ModeArg::Crop)]
    pub mode: ModeArg,

    /// Horizontal crop gravity
    #[arg(long, value_enum, default_value_t = HAlignArg::Center)]
    pub halign: HAlignArg,

    /// Vertical crop gravity
    #[arg(long, value_enum, default_value_t = VAlignArg::Middle)]
    pub valign: VAlignArg,

    /// Padding color for embed mode
    #[arg(long, value_enum, default_value_t = FillArg::Black)]
    pub fill: FillArg,

    /// Resampling quality preset
    #[arg(short, long, value_enum, default_value_t = PresetArg::Default)]
    pub preset: PresetArg,

    /// Force the output format (otherwise follows the source extension)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Encode parameter: jpeg quality 1-100 or png compression 1-9
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Region of the source shared by all variants, as comma-separated
    /// key=value pairs (e.g. x1=0,y1=0,x2=720,y2=720)
    #[arg(long, value_name = "K=V,..")]
    pub extract: Option<String>,

    /// Rotation in degrees, snapped to quarter turns
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub rotate: i64,

    /// Maximum number of thumbnails generated concurrently
    #[arg(short = 'j', long, default_value_t = RunConfig::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Crop,
    Fit,
    Stretch,
    Embed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HAlignArg {
    Left,
    Center,
    Right,
}

impl From<HAlignArg> for HAlign {
    fn from(value: HAlignArg) -> Self {
        match value {
            HAlignArg::Left => HAlign::Left,
            HAlignArg::Center => HAlign::Center,
            HAlignArg::Right => HAlign::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VAlignArg {
    Top,
    Middle,
    Bottom,
}

impl From<VAlignArg> for VAlign {
    fn from(value: VAlignArg) -> Self {
        match value {
            VAlignArg::Top => VAlign::Top,
            VAlignArg::Middle => VAlign::Middle,
            VAlignArg::Bottom => VAlign::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FillArg {
    Black,
    White,
    Transparent,
}

impl From<FillArg> for FillColor {
    fn from(value: FillArg) -> Self {
        match value {
            FillArg::Black => FillColor::BLACK,
            FillArg::White => FillColor::WHITE,
            FillArg::Transparent => FillColor::TRANSPARENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    Default,
    Nearest,
    Cubic,
    Best,
}

impl From<PresetArg> for QualityPreset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Default => QualityPreset::DEFAULT,
            PresetArg::Nearest => QualityPreset::NEAREST,
            PresetArg::Cubic => QualityPreset::CUBIC,
            PresetArg::Best => QualityPreset::BEST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for EncodeFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Jpeg => EncodeFormat::Jpeg,
            FormatArg::Png => EncodeFormat::Png,
        }
    }
}

impl GenerateArgs {
    pub fn into_run_config(self) -> Result<RunConfig> {
        let gravity = GravitySelector::new(self.halign.into(), self.valign.into());
        let preset = Some(self.preset.into());
        let format: Option<EncodeFormat> = self.format.map(Into::into);

        let specs = if self.size.is_empty() {
            ThumbnailSpec::standard_set(&self.output)
        } else {
            self.size
                .iter()
                .map(|size| {
                    let (width, height) = parse_size(size)?;
                    let step = match self.mode {
                        ModeArg::Crop => {
                            TransformStep::crop(gravity.anchor(), width, height, preset)
                        }
                        ModeArg::Fit => TransformStep::fit(width, height, preset),
                        ModeArg::Stretch => TransformStep::stretch(width, height, preset),
                        ModeArg::Embed => {
                            TransformStep::embed(self.fill.into(), width, height, preset)
                        }
                    };

                    let mut steps = vec![step];
                    if let Some(format) = format {
                        let level = self.quality.unwrap_or_else(|| format.default_level());
                        steps.push(match format {
                            EncodeFormat::Jpeg => TransformStep::jpeg(level),
                            EncodeFormat::Png => TransformStep::png(level),
                        });
                    }

                    let dir = self.output.join(format!("{}x{}", width, height));
                    let spec = ThumbnailSpec::new(dir, steps);
                    Ok(match format {
                        Some(format) => spec.with_extension(format.extension()),
                        None => spec,
                    })
                })
                .collect::<Result<Vec<_>>>()?
        };

        let extract = self.extract.as_deref().map(parse_rect).transpose()?;

        let mut config = RunConfig::new(self.input, specs);
        config.global = GlobalTransform {
            extract,
            rotation: self.rotate,
        };
        config.max_concurrency = self.concurrency;
        Ok(config)
    }
}

/// Parse `WxH`.
fn parse_size(value: &str) -> Result<(u32, u32)> {
    let invalid = || {
        ThumbError::InvalidParameter(format!(
            "Invalid size '{}': expected WxH, e.g. 300x100",
            value
        ))
    };

    let (w, h) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = w.trim().parse().map_err(|_| invalid())?;
    let height = h.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}

/// Parse comma-separated `key=value` rectangle parameters. All RectSpec
/// field names are accepted, in any order.
fn parse_rect(value: &str) -> Result<RectSpec> {
    let mut spec = RectSpec::default();

    for pair in value.split(',').filter(|p| !p.trim().is_empty()) {
        let (key, raw) = pair.split_once('=').ok_or_else(|| {
            ThumbError::InvalidParameter(format!(
                "Invalid rectangle parameter '{}': expected key=value",
                pair
            ))
        })?;
        let parsed: u32 = raw.trim().parse().map_err(|_| {
            ThumbError::InvalidParameter(format!("Invalid rectangle value '{}'", raw.trim()))
        })?;

        let field = match key.trim().to_ascii_lowercase().as_str() {
            "x" => &mut spec.x,
            "y" => &mut spec.y,
            "x1" => &mut spec.x1,
            "y1" => &mut spec.y1,
            "x2" => &mut spec.x2,
            "y2" => &mut spec.y2,
            "left" | "l" => &mut spec.left,
            "top" | "t" => &mut spec.top,
            "right" | "r" => &mut spec.right,
            "bottom" | "b" => &mut spec.bottom,
            "width" | "w" => &mut spec.width,
            "height" | "h" => &mut spec.height,
            other => {
                return Err(ThumbError::InvalidParameter(format!(
                    "Unknown rectangle parameter '{}'",
                    other
                )))
            }
        };
        *field = Some(parsed);
    }

    Ok(spec)
}
