use std::path::{Path, PathBuf};

use clap::Parser as ClapParser;
use log::{LevelFilter, debug};
use pktir::ast::TranslationUnit;
use pktsketch::{ConstantSetGenerator, SketchConfig, SketchError, SketchGenerator};
use thiserror::Error;

#[derive(ClapParser)]
#[command(about = "Generate synthesizer specifications from packet functions")]
pub struct Arguments {
    /// Path to the compilation unit, serialized as JSON
    input: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print the integer constants of the packet function
    #[arg(long)]
    constants: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Sketch(#[from] SketchError),

    #[error("Failed to parse compilation unit '{file}': {source}")]
    UnitParse {
        source: serde_json::Error,
        file: String,
    },
}

fn load_unit(path: &Path) -> Result<TranslationUnit, CliError> {
    let source = std::fs::read_to_string(path).map_err(SketchError::Io)?;
    serde_json::from_str(&source).map_err(|source| CliError::UnitParse {
        source,
        file: path.display().to_string(),
    })
}

fn run(args: &Arguments) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => SketchConfig::from_path(path)?,
        None => SketchConfig::default(),
    };
    let unit = load_unit(&args.input)?;
    debug!(
        "Loaded {} declarations from {}",
        unit.decls.len(),
        args.input.display()
    );

    let filter = config.packet_filter();
    let generator = SketchGenerator::new(config);
    println!("{}", generator.transform(&unit, &filter)?);

    if args.constants {
        let constants = ConstantSetGenerator::from_translation_unit(&unit, &filter)?;
        let list: Vec<String> = constants.get_set().iter().map(i64::to_string).collect();
        println!("[{}]", list.join(", "));
    }
    Ok(())
}

fn main() {
    let args = Arguments::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    if let Err(error) = run(&args) {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../demos")
            .join(name)
    }

    #[test]
    fn demo_unit_produces_specification() {
        let unit = load_unit(&demo("counter.json")).unwrap();
        let config = SketchConfig::from_path(demo("sketch.toml")).unwrap();
        let filter = config.packet_filter();

        let spec = SketchGenerator::new(config).transform(&unit, &filter).unwrap();
        assert_eq!(
            spec,
            "void spec(int state_1,int pkt_1)\n{\np_a=pkt_1;\nstate_1=p_a+1;\n}"
        );

        let constants = ConstantSetGenerator::from_translation_unit(&unit, &filter).unwrap();
        assert_eq!(constants.into_set().into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn malformed_unit_is_reported() {
        let err = load_unit(&demo("sketch.toml")).unwrap_err();
        assert!(matches!(err, CliError::UnitParse { .. }));
    }
}
