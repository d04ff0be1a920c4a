//! Headless CLI: load an image, redact the given regions, write the
//! encoded result.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};

use pixelveil::export::{self, ExportFormat, ExportRequest, ExportSize};
use pixelveil::filter::{
    EffectConfig, EffectKind, BLUR_RADIUS_MAX, BLUR_RADIUS_MIN, MOSAIC_BLOCK_SIZE_MAX,
    MOSAIC_BLOCK_SIZE_MIN,
};
use pixelveil::selection::{Selection, SelectionSet};
use pixelveil::{compose, loader, logging};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EffectArg {
    Mosaic,
    Blur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
}

#[derive(Debug, Parser)]
#[command(name = "pixelveil", version, about = "Redact regions of an image with a mosaic or blur")]
struct Cli {
    /// Source image (JPEG, PNG, or WebP).
    input: PathBuf,

    /// Output path. Defaults to a timestamped name next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Redaction effect.
    #[arg(long, value_enum, default_value = "mosaic")]
    effect: EffectArg,

    /// Mosaic block size in pixels.
    #[arg(long, default_value_t = 10)]
    block_size: u32,

    /// Blur radius in pixels.
    #[arg(long, default_value_t = 5)]
    radius: u32,

    /// Rectangle to redact, as `X,Y,WxH`. Repeatable.
    #[arg(long = "rect", value_name = "X,Y,WxH")]
    rects: Vec<String>,

    /// Brush dab to redact, as `CX,CY,R`. Repeatable.
    #[arg(long = "dab", value_name = "CX,CY,R")]
    dabs: Vec<String>,

    /// JSON file holding a selection array, as produced by the editor.
    #[arg(long, value_name = "FILE")]
    selections: Option<PathBuf>,

    /// Output encoding.
    #[arg(long, value_enum, default_value = "png")]
    format: FormatArg,

    /// JPEG quality in [0, 1].
    #[arg(long, default_value_t = 0.9)]
    quality: f32,

    /// Resize the output to `WxH` before encoding.
    #[arg(long, value_name = "WxH")]
    size: Option<String>,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let image = loader::load_from_path(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    let selections = collect_selections(&cli)?;
    if selections.is_empty() {
        bail!("no selections given; pass --rect, --dab, or --selections");
    }

    let config = EffectConfig {
        kind: match cli.effect {
            EffectArg::Mosaic => EffectKind::Mosaic,
            EffectArg::Blur => EffectKind::Blur,
        },
        mosaic_block_size: cli
            .block_size
            .clamp(MOSAIC_BLOCK_SIZE_MIN, MOSAIC_BLOCK_SIZE_MAX),
        blur_radius: cli.radius.clamp(BLUR_RADIUS_MIN, BLUR_RADIUS_MAX),
    };

    let composed = compose::compose(&image, &selections, &config);

    let format = match cli.format {
        FormatArg::Png => ExportFormat::Png,
        FormatArg::Jpeg => ExportFormat::Jpeg,
    };
    let request = ExportRequest {
        format,
        quality: cli.quality,
        size: match &cli.size {
            Some(spec) => {
                let (width, height) = parse_dimensions(spec)?;
                ExportSize::Exact { width, height }
            }
            None => ExportSize::Native,
        },
    };

    let bytes = export::encode(&composed, &request)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input, format));
    std::fs::write(&output, &bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        selections = selections.len(),
        output = %output.display(),
        "redacted image written"
    );
    Ok(())
}

fn collect_selections(cli: &Cli) -> anyhow::Result<SelectionSet> {
    let mut selections = SelectionSet::new();

    if let Some(path) = &cli.selections {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let loaded: SelectionSet = serde_json::from_str(&json)
            .with_context(|| format!("invalid selection file {}", path.display()))?;
        for selection in loaded.iter() {
            selections.push(*selection);
        }
    }
    for spec in &cli.rects {
        selections.push(parse_rect(spec)?);
    }
    for spec in &cli.dabs {
        selections.push(parse_dab(spec)?);
    }

    Ok(selections)
}

/// `X,Y,WxH` — e.g. `10,20,300x200`.
fn parse_rect(spec: &str) -> anyhow::Result<Selection> {
    let parts: Vec<&str> = spec.split(',').collect();
    let [x, y, dims] = parts.as_slice() else {
        bail!("invalid rectangle {spec:?}, expected X,Y,WxH");
    };
    let (width, height) = parse_dimensions(dims)?;
    Ok(Selection::Rectangle {
        x: x.trim().parse().with_context(|| format!("invalid rectangle x in {spec:?}"))?,
        y: y.trim().parse().with_context(|| format!("invalid rectangle y in {spec:?}"))?,
        width,
        height,
    })
}

/// `CX,CY,R` — e.g. `150,80,12`.
fn parse_dab(spec: &str) -> anyhow::Result<Selection> {
    let parts: Vec<&str> = spec.split(',').collect();
    let [cx, cy, r] = parts.as_slice() else {
        bail!("invalid dab {spec:?}, expected CX,CY,R");
    };
    Ok(Selection::Brush {
        cx: cx.trim().parse().with_context(|| format!("invalid dab cx in {spec:?}"))?,
        cy: cy.trim().parse().with_context(|| format!("invalid dab cy in {spec:?}"))?,
        r: r.trim().parse().with_context(|| format!("invalid dab radius in {spec:?}"))?,
    })
}

/// `WxH` with both sides positive.
fn parse_dimensions(spec: &str) -> anyhow::Result<(u32, u32)> {
    let (width, height) = spec
        .trim()
        .split_once('x')
        .with_context(|| format!("invalid dimensions {spec:?}, expected WxH"))?;
    let width: u32 = width.trim().parse().with_context(|| format!("invalid width in {spec:?}"))?;
    let height: u32 = height.trim().parse().with_context(|| format!("invalid height in {spec:?}"))?;
    if width == 0 || height == 0 {
        bail!("dimensions {spec:?} must be positive");
    }
    Ok((width, height))
}

fn default_output_path(input: &Path, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("image");
    let name = export::suggested_filename(stem, format);
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => PathBuf::from(name),
    }
}
