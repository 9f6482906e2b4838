use std::error::Error;
use std::path::PathBuf;

use clap::{ArgEnum, Parser};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use budget_synth::export::{self, ExportFormat};
use budget_synth::generator::Generator;
use budget_synth::profile::{Counts, Profile};

#[derive(Clone, Copy, ArgEnum)]
enum ProfileArg {
    Data,
    Strict,
}

#[derive(Clone, Copy, ArgEnum)]
enum FormatArg {
    Xlsx,
    Csv,
}

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Generation profile; defaults reproduce the original scripts
    #[clap(long, arg_enum, default_value = "data")]
    profile: ProfileArg,
    /// Override the target year
    #[clap(long)]
    year: Option<i32>,
    /// Override the total row count
    #[clap(long)]
    count: Option<usize>,
    /// Override the exact expense row count
    #[clap(long)]
    expense_count: Option<usize>,
    /// Override the exact income row count
    #[clap(long)]
    income_count: Option<usize>,
    /// Seed for reproducible output
    #[clap(long)]
    seed: Option<u64>,
    /// Output file format
    #[clap(long, arg_enum, default_value = "xlsx")]
    format: FormatArg,
    /// Directory the output file is written into
    #[clap(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut profile = match cli.profile {
        ProfileArg::Data => Profile::data(),
        ProfileArg::Strict => Profile::strict(),
    };
    if let Some(year) = cli.year {
        profile.year = year;
    }
    if let Some(count) = cli.count {
        profile.counts = Counts::Total(count);
    }
    if cli.expense_count.is_some() || cli.income_count.is_some() {
        let (expense, income) = match profile.counts {
            Counts::Split { expense, income } => (expense, income),
            Counts::Total(count) => (count, 0),
        };
        profile.counts = Counts::Split {
            expense: cli.expense_count.unwrap_or(expense),
            income: cli.income_count.unwrap_or(income),
        };
    }

    let format = match cli.format {
        FormatArg::Xlsx => ExportFormat::Xlsx,
        FormatArg::Csv => ExportFormat::Csv,
    };
    let path = cli.out_dir.join(profile.file_name(format.extension()));

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(
        "generating {} rows for {}",
        profile.counts.total(),
        profile.year
    );
    let mut generator = Generator::new(profile, rng)?;
    let records = generator.generate();
    export::export(&records, &path, format)?;

    println!(
        "Wrote {} rows to {}",
        records.len(),
        path.canonicalize()?.display()
    );
    Ok(())
}
