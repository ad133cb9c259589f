use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};

use draftdiff::config::{
    find_default_config, init_default_config, load_config, AppConfig, CONFIG_ENV_VAR,
    CONFIG_FILENAME,
};
use draftdiff::docx::parse_document;
use draftdiff::pipeline::{CompareOptions, ComparePipeline};
use draftdiff::progress::ConsoleProgress;
use draftdiff::review::OfflineReviewService;
use draftdiff::section::{segment_blocks, AlignProfile};

#[derive(Parser, Debug)]
#[command(name = "draftdiff")]
#[command(about = "Compares a contract draft DOCX against its reference template", long_about = None)]
struct Args {
    /// Generate a default config file, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write the config file (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite an existing config file when used with --init-config
    #[arg(long)]
    force: bool,

    /// Reference template .docx
    #[arg(value_name = "TEMPLATE")]
    template: Option<PathBuf>,

    /// Negotiated draft .docx to compare against the template
    #[arg(value_name = "DRAFT")]
    draft: Option<PathBuf>,

    /// Report output path (default: <draft_stem>.review.json)
    #[arg(short, long, value_name = "JSON")]
    output: Option<PathBuf>,

    /// Config file path (default: search for draftdiff.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Alignment profile: lenient or strict (overrides config)
    #[arg(long)]
    profile: Option<String>,

    /// Skip the review collaborator; report structure and formatting only
    #[arg(long)]
    no_review: bool,

    /// Pretty-print the report JSON even when the config says otherwise
    #[arg(long)]
    pretty: bool,

    /// Write both documents' segmented sections to JSON, then exit
    #[arg(long, value_name = "JSON")]
    sections_json: Option<PathBuf>,

    /// Suppress progress output on stderr
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let progress = ConsoleProgress::new(!args.quiet);

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", cfg_path.display());
        return Ok(());
    }

    let (template, draft) = match (args.template.clone(), args.draft.clone()) {
        (Some(t), Some(d)) => (t, d),
        _ => {
            let mut cmd = Args::command();
            cmd.print_help().context("print help")?;
            eprintln!(
                "\n\nUSAGE:\n  draftdiff <template.docx> <draft.docx>\n\nTIPS:\n  - The report lands next to the draft as <draft_stem>.review.json unless -o is given.\n  - Default config search: draftdiff.toml (upwards), or set {CONFIG_ENV_VAR}.\n"
            );
            return Ok(());
        }
    };

    let workdir = template
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let cfg_file = args
        .config
        .clone()
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
        .or_else(|| find_default_config(&workdir, CONFIG_FILENAME));
    let mut file_cfg = AppConfig::default();
    if let Some(p) = cfg_file.as_ref() {
        if p.exists() {
            file_cfg = load_config(p)?;
            progress.config_file(p);
        }
    }

    let profile_override = match args.profile.as_deref().map(str::trim) {
        None => None,
        Some(p) if p.eq_ignore_ascii_case("lenient") => Some(AlignProfile::Lenient),
        Some(p) if p.eq_ignore_ascii_case("strict") => Some(AlignProfile::Strict),
        Some(p) => return Err(anyhow::anyhow!("unknown profile: {p} (lenient|strict)")),
    };

    let options = CompareOptions {
        align: file_cfg.align_config(profile_override),
        segmenter: file_cfg.segmenter_config(),
        review_enabled: !args.no_review && file_cfg.review_enabled(),
        review_excerpt: file_cfg.review_excerpt(),
    };
    let pretty = args.pretty || file_cfg.pretty_output();

    if let Some(sections_path) = args.sections_json.clone() {
        write_sections_json(&template, &draft, &options, &sections_path)?;
        eprintln!("Wrote sections: {}", sections_path.display());
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| default_report_output_for(&draft));

    let pipeline = ComparePipeline::new(options, Box::new(OfflineReviewService), progress);
    let report = pipeline.compare_files(&template, &draft)?;

    let json = report.to_json(pretty)?;
    fs::write(&output, json).with_context(|| format!("write report: {}", output.display()))?;
    eprintln!("Wrote report: {}", output.display());
    Ok(())
}

/// Report lands next to the draft: `contract.docx` -> `contract.review.json`.
fn default_report_output_for(draft: &Path) -> PathBuf {
    let stem = draft
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("draft");
    draft.with_file_name(format!("{stem}.review.json"))
}

/// Segmentation-only mode, for inspecting how the documents split before
/// blaming the aligner.
fn write_sections_json(
    template: &Path,
    draft: &Path,
    options: &CompareOptions,
    out: &Path,
) -> anyhow::Result<()> {
    let label = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string())
    };

    let template_bytes =
        fs::read(template).with_context(|| format!("read {}", template.display()))?;
    let template_doc = parse_document(&label(template), &template_bytes)?;
    let draft_bytes = fs::read(draft).with_context(|| format!("read {}", draft.display()))?;
    let draft_doc = parse_document(&label(draft), &draft_bytes)?;

    let dump = serde_json::json!({
        "template": segment_blocks(&template_doc.blocks, &options.segmenter),
        "draft": segment_blocks(&draft_doc.blocks, &options.segmenter),
    });
    fs::write(out, serde_json::to_string_pretty(&dump)?)
        .with_context(|| format!("write sections: {}", out.display()))?;
    Ok(())
}
