use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use coverpress::{
    BatchItem, CancelToken, CoverSlots, DirArchive, EditParams, Resolution, SourceImage,
    archive_all, decode_source_file, export_cover, export_filename, export_image, write_export,
};

#[derive(Parser, Debug)]
#[command(name = "coverpress", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a single image as a JPEG.
    Export(ExportArgs),
    /// Export the three-region cover composite as a JPEG.
    Cover(CoverArgs),
    /// Export a whole manifest of images (plus optional cover) into a
    /// directory.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Optional JSON file with edit parameters (partial keys allowed).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Output resolution preset.
    #[arg(long, value_enum, default_value_t = ResolutionChoice::Standard)]
    resolution: ResolutionChoice,
}

#[derive(Parser, Debug)]
struct CoverArgs {
    /// Top band image path.
    #[arg(long)]
    top: Option<PathBuf>,

    /// Edit parameters JSON for the top image.
    #[arg(long)]
    top_params: Option<PathBuf>,

    /// Bottom-left image path.
    #[arg(long)]
    bottom_left: Option<PathBuf>,

    /// Edit parameters JSON for the bottom-left image.
    #[arg(long)]
    bottom_left_params: Option<PathBuf>,

    /// Bottom-right image path.
    #[arg(long)]
    bottom_right: Option<PathBuf>,

    /// Edit parameters JSON for the bottom-right image.
    #[arg(long)]
    bottom_right_params: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Output resolution preset.
    #[arg(long, value_enum, default_value_t = ResolutionChoice::Standard)]
    resolution: ResolutionChoice,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Batch manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Output directory for the exported files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Output resolution preset.
    #[arg(long, value_enum, default_value_t = ResolutionChoice::Standard)]
    resolution: ResolutionChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResolutionChoice {
    Standard,
    High,
}

impl From<ResolutionChoice> for Resolution {
    fn from(c: ResolutionChoice) -> Self {
        match c {
            ResolutionChoice::Standard => Resolution::Standard,
            ResolutionChoice::High => Resolution::High,
        }
    }
}

/// One manifest entry: an image path plus optional inline edit parameters.
#[derive(serde::Deserialize, Debug)]
struct ManifestEntry {
    path: PathBuf,
    #[serde(default)]
    params: EditParams,
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ManifestCover {
    top: Option<ManifestEntry>,
    bottom_left: Option<ManifestEntry>,
    bottom_right: Option<ManifestEntry>,
}

#[derive(serde::Deserialize, Debug)]
struct Manifest {
    #[serde(default)]
    cover: ManifestCover,
    #[serde(default)]
    images: Vec<ManifestEntry>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Cover(args) => cmd_cover(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn read_params(path: Option<&Path>) -> anyhow::Result<EditParams> {
    match path {
        None => Ok(EditParams::default()),
        Some(p) => {
            let bytes =
                std::fs::read(p).with_context(|| format!("read params '{}'", p.display()))?;
            let params: EditParams =
                serde_json::from_slice(&bytes).with_context(|| "parse edit parameters JSON")?;
            Ok(params)
        }
    }
}

fn original_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let resolution = Resolution::from(args.resolution);
    let source = decode_source_file(&args.in_path)?;
    let params = read_params(args.params.as_deref())?;

    let bytes = export_image(&source, &params, resolution)?;
    let filename = export_filename(
        &original_name(&args.in_path),
        resolution,
        coverpress::export::STANDARD_PREFIX,
    );
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create '{}'", args.out_dir.display()))?;
    let path = write_export(&args.out_dir, &filename, &bytes)?;
    println!("wrote {}", path.display());
    Ok(())
}

struct LoadedSlot {
    source: SourceImage,
    params: EditParams,
}

fn load_slot(
    image: Option<&Path>,
    params: Option<&Path>,
) -> anyhow::Result<Option<LoadedSlot>> {
    match image {
        None => Ok(None),
        Some(p) => Ok(Some(LoadedSlot {
            source: decode_source_file(p)?,
            params: read_params(params)?,
        })),
    }
}

fn cmd_cover(args: CoverArgs) -> anyhow::Result<()> {
    let resolution = Resolution::from(args.resolution);
    let top = load_slot(args.top.as_deref(), args.top_params.as_deref())?;
    let bottom_left = load_slot(args.bottom_left.as_deref(), args.bottom_left_params.as_deref())?;
    let bottom_right = load_slot(
        args.bottom_right.as_deref(),
        args.bottom_right_params.as_deref(),
    )?;
    if top.is_none() && bottom_left.is_none() && bottom_right.is_none() {
        anyhow::bail!("at least one cover slot must be assigned");
    }

    let bytes = export_cover(
        top.as_ref().map(|s| (&s.source, &s.params)),
        bottom_left.as_ref().map(|s| (&s.source, &s.params)),
        bottom_right.as_ref().map(|s| (&s.source, &s.params)),
        resolution,
    )?;
    let filename = export_filename("cover.png", resolution, coverpress::export::COVER_PREFIX);
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create '{}'", args.out_dir.display()))?;
    let path = write_export(&args.out_dir, &filename, &bytes)?;
    println!("wrote {}", path.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let resolution = Resolution::from(args.resolution);
    let bytes = std::fs::read(&args.manifest)
        .with_context(|| format!("read manifest '{}'", args.manifest.display()))?;
    let manifest: Manifest =
        serde_json::from_slice(&bytes).with_context(|| "parse batch manifest JSON")?;

    let top = load_manifest_slot(manifest.cover.top.as_ref())?;
    let bottom_left = load_manifest_slot(manifest.cover.bottom_left.as_ref())?;
    let bottom_right = load_manifest_slot(manifest.cover.bottom_right.as_ref())?;
    let cover = CoverSlots {
        top: top.as_ref().map(|s| (&s.source, &s.params)),
        bottom_left: bottom_left.as_ref().map(|s| (&s.source, &s.params)),
        bottom_right: bottom_right.as_ref().map(|s| (&s.source, &s.params)),
    };

    // Decode failures are isolated per item, like export failures.
    let mut decoded = Vec::new();
    let mut decode_failures = Vec::new();
    for entry in &manifest.images {
        let name = original_name(&entry.path);
        match decode_source_file(&entry.path) {
            Ok(source) => decoded.push((source, entry.params, name)),
            Err(e) => {
                eprintln!("skipping '{name}': {e}");
                decode_failures.push(name);
            }
        }
    }
    let items: Vec<BatchItem<'_>> = decoded
        .iter()
        .map(|(source, params, name)| BatchItem {
            source,
            params,
            name: name.as_str(),
        })
        .collect();

    let sink = DirArchive::new(&args.out_dir)?;
    let (out_dir, mut report) =
        archive_all(sink, &cover, &items, resolution, &CancelToken::new())?;
    report.skipped.extend(decode_failures);

    println!(
        "exported {} file(s) to {}",
        report.exported,
        out_dir.display()
    );
    if !report.skipped.is_empty() {
        println!("skipped: {}", report.skipped.join(", "));
    }
    Ok(())
}

fn load_manifest_slot(entry: Option<&ManifestEntry>) -> anyhow::Result<Option<LoadedSlot>> {
    match entry {
        None => Ok(None),
        Some(e) => Ok(Some(LoadedSlot {
            source: decode_source_file(&e.path)?,
            params: e.params,
        })),
    }
}
