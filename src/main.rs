use clap::{Parser, ValueEnum};
use html::debug::outline;
use html::dom_snapshot::{DomSnapshot, DomSnapshotOptions};
use html_test_support::{FixtureError, RenderCase, diff_lines, load_cases, markup_lines};
use markup::{
    DEFAULT_ID_PREFIX, Diagnostic, Entropy, Fragment, IdTier, RenderConfig, RenderContext,
    SeededEntropy, SystemEntropy,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const OUTLINE_CAP: usize = 500;

/// Render markup template fixtures and inspect the resulting trees.
#[derive(Debug, Parser)]
#[command(name = "markup", version)]
struct Cli {
    /// TOML files with `[[case]]` tables.
    #[arg(required = true)]
    fixtures: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Compare each case with its expected `html` and `missing` count.
    #[arg(long)]
    check: bool,

    /// Draw placeholder ids from a seeded generator instead of the OS.
    #[arg(long)]
    seed: Option<u64>,

    /// Placeholder id prefix.
    #[arg(long, default_value = DEFAULT_ID_PREFIX)]
    prefix: String,

    /// Only render cases whose name contains this text.
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Serialized markup.
    Html,
    /// Indented outline with ids, classes and text previews.
    Outline,
    /// Line snapshot with placeholder ids masked.
    Snapshot,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    #[error("{failed} of {total} cases failed")]
    Check { failed: usize, total: usize },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let result = match cli.seed {
        Some(seed) => run(&cli, || SeededEntropy::new(seed, IdTier::Uuid)),
        None => run(&cli, || SystemEntropy),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run<E: Entropy>(cli: &Cli, entropy: impl Fn() -> E) -> Result<(), CliError> {
    let config = RenderConfig {
        id_prefix: cli.prefix.clone().into(),
        ..RenderConfig::default()
    };
    let mut total = 0;
    let mut failed = 0;
    for path in &cli.fixtures {
        log::info!(target: "markup.cli", "loading {}", path.display());
        for case in load_cases(path)? {
            if cli
                .filter
                .as_deref()
                .is_some_and(|needle| !case.name.contains(needle))
            {
                continue;
            }
            total += 1;
            let mut cx = RenderContext::new(config.clone(), entropy());
            let fragment = case.to_template().render_with(&mut cx);

            println!("== {}", case.name);
            println!("{}", format_fragment(&fragment, cli.format, &cli.prefix));
            for diagnostic in cx.diagnostics() {
                println!("!! {diagnostic}");
            }
            if cli.check && !check_case(&case, &fragment, cx.diagnostics()) {
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(CliError::Check { failed, total });
    }
    Ok(())
}

fn format_fragment(fragment: &Fragment, format: Format, prefix: &str) -> String {
    match format {
        Format::Html => fragment.to_html(),
        Format::Outline => outline(fragment.node(), OUTLINE_CAP).join("\n"),
        Format::Snapshot => {
            let options = DomSnapshotOptions {
                skip_whitespace_text: true,
                mask_value_prefix: Some(prefix.to_string()),
            };
            DomSnapshot::new(fragment.node(), &options).render()
        }
    }
}

fn check_case(case: &RenderCase, fragment: &Fragment, diagnostics: &[Diagnostic]) -> bool {
    let mut ok = true;
    let missing = diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::MissingPlaceholder { .. }))
        .count();
    if missing != case.missing {
        eprintln!(
            "FAIL {}: expected {} missing placeholders, got {missing}",
            case.name, case.missing
        );
        ok = false;
    }
    if let Some(expected) = &case.html {
        let actual = fragment.to_html();
        if &actual != expected {
            eprintln!(
                "FAIL {}:\n{}",
                case.name,
                diff_lines(&markup_lines(expected), &markup_lines(&actual))
            );
            ok = false;
        }
    }
    ok
}
