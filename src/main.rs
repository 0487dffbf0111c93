// Clippy allows
#![allow(clippy::too_many_arguments)]

//! gct: gene cluster toolkit
//!
//! Usage: gct <COMMAND> [OPTIONS]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use gct_genomics::commands::sizes::DEFAULT_SIZES_FILE;
use gct_genomics::commands::{
    AnnotationCommand, AnnotationTableCommand, CompareCommand, ConnectionsCommand, ExtractStats,
    GenesCommand, MotusCommand, OutputTarget, ProfileCommand, SizesCommand,
};
use gct_genomics::config::{require_dir, require_file, CombinedFormat, SizeBasis};
use gct_genomics::filter::SizeBounds;
use gct_genomics::gene::KeyMode;
use gct_genomics::membership::{ClusterError, Result};

#[derive(Parser)]
#[command(name = "gct")]
#[command(version)]
#[command(about = "Split per-gene data by gene cluster and compare clusterings", long_about = None)]
struct Cli {
    /// Log every step and count
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Cluster size bounds.
#[derive(Args, Debug, Clone)]
struct SizeArgs {
    /// Minimum cluster size
    #[arg(long, default_value = "1")]
    min_cluster_size: usize,

    /// Maximum cluster size (unbounded if not given)
    #[arg(long)]
    max_cluster_size: Option<usize>,
}

impl SizeArgs {
    fn bounds(&self) -> Result<SizeBounds> {
        SizeBounds::new(self.min_cluster_size, self.max_cluster_size)
    }
}

/// Join options of the dispatch commands.
#[derive(Args, Debug, Clone)]
struct JoinArgs {
    /// Join genes by name or by 1-based position [default depends on command]
    #[arg(long)]
    key_mode: Option<KeyMode>,

    /// Filter clusters on dispatched records or on membership counts
    #[arg(long, default_value = "records")]
    size_basis: SizeBasis,
}

/// Output destination of the grouping commands.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
struct OutputArgs {
    /// Write one file per cluster into this existing directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write every cluster into one combined file
    #[arg(long)]
    output_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the genes of every cluster
    Sizes {
        /// Membership file (<cluster> <gene> per line)
        #[arg(long)]
        clusters: PathBuf,

        /// Output file
        #[arg(long, default_value = DEFAULT_SIZES_FILE)]
        output_file: PathBuf,

        #[command(flatten)]
        size: SizeArgs,
    },

    /// Split a gene catalog (multi-FASTA) by cluster
    Genes {
        /// Membership file (<cluster> <gene> per line)
        #[arg(long)]
        clusters: PathBuf,

        /// Gene catalog in FASTA format
        #[arg(long)]
        genes_catalog: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Layout of the combined file
        #[arg(long, default_value = "report")]
        report_format: CombinedFormat,

        #[command(flatten)]
        size: SizeArgs,

        #[command(flatten)]
        join: JoinArgs,
    },

    /// Split an abundance profile table by cluster
    Profile {
        /// Membership file (<cluster> <gene> per line)
        #[arg(long)]
        clusters: PathBuf,

        /// Profile table, one gene per line
        #[arg(long)]
        profiles: PathBuf,

        /// The profile table starts with a header line
        #[arg(long)]
        with_header: bool,

        #[command(flatten)]
        output: OutputArgs,

        /// Layout of the combined file
        #[arg(long, default_value = "report")]
        report_format: CombinedFormat,

        #[command(flatten)]
        size: SizeArgs,

        #[command(flatten)]
        join: JoinArgs,
    },

    /// Split a gene annotation file by cluster
    Annotation {
        /// Membership file (<cluster> <gene> per line)
        #[arg(long)]
        clusters: PathBuf,

        /// Annotation file, one gene per line
        #[arg(long)]
        annotation: PathBuf,

        /// The annotation file starts with a header line
        #[arg(long)]
        with_header: bool,

        #[command(flatten)]
        output: OutputArgs,

        /// Layout of the combined file
        #[arg(long, default_value = "table")]
        report_format: CombinedFormat,

        #[command(flatten)]
        size: SizeArgs,

        #[command(flatten)]
        join: JoinArgs,
    },

    /// Keep the gene connections internal to each cluster
    Connections {
        /// Membership file (<cluster> <gene> per line)
        #[arg(long)]
        clusters: PathBuf,

        /// Connections file (<geneA> <geneB> <weight> per line)
        #[arg(long)]
        genes_connections: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Layout of the combined file
        #[arg(long, default_value = "report")]
        report_format: CombinedFormat,

        #[command(flatten)]
        size: SizeArgs,

        #[command(flatten)]
        join: JoinArgs,
    },

    /// Break every cluster down by mOTU
    Motus {
        /// Membership file (<cluster> <gene> per line)
        #[arg(long)]
        clusters: PathBuf,

        /// mOTU file (<gene> ... <label> per line)
        #[arg(long)]
        motus: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Layout of the combined file
        #[arg(long, default_value = "report")]
        report_format: CombinedFormat,

        #[command(flatten)]
        size: SizeArgs,
    },

    /// Compare a query clustering against a reference clustering
    Compare {
        /// Reference membership file
        #[arg(long = "ref")]
        reference: PathBuf,

        /// Query membership file
        #[arg(long)]
        query: PathBuf,

        /// Output report
        #[arg(long)]
        output_file: PathBuf,

        /// Minimum query cluster size
        #[arg(long, visible_alias = "query-min-cluster-size", default_value = "1")]
        min_cluster_size: usize,

        /// Maximum query cluster size (unbounded if not given)
        #[arg(long, visible_alias = "query-max-cluster-size")]
        max_cluster_size: Option<usize>,
    },

    /// Merge taxonomic and functional annotations for every catalog gene
    AnnotationTable {
        /// Gene catalog in FASTA format
        #[arg(long)]
        genes_catalog: PathBuf,

        /// Taxonomic annotation (tab separated, gene first)
        #[arg(long)]
        taxonomic_annotation: PathBuf,

        /// Functional annotation (gene in the second column)
        #[arg(long)]
        functional_annotation: PathBuf,

        /// Output table
        #[arg(long)]
        annotation_table: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        log::LevelFilter::Warn
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let result = match cli.command {
        Commands::Sizes {
            clusters,
            output_file,
            size,
        } => run_sizes(clusters, output_file, size),

        Commands::Genes {
            clusters,
            genes_catalog,
            output,
            report_format,
            size,
            join,
        } => run_genes(clusters, genes_catalog, output, report_format, size, join),

        Commands::Profile {
            clusters,
            profiles,
            with_header,
            output,
            report_format,
            size,
            join,
        } => run_profile(clusters, profiles, with_header, output, report_format, size, join),

        Commands::Annotation {
            clusters,
            annotation,
            with_header,
            output,
            report_format,
            size,
            join,
        } => run_annotation(
            clusters,
            annotation,
            with_header,
            output,
            report_format,
            size,
            join,
        ),

        Commands::Connections {
            clusters,
            genes_connections,
            output,
            report_format,
            size,
            join,
        } => run_connections(clusters, genes_connections, output, report_format, size, join),

        Commands::Motus {
            clusters,
            motus,
            output,
            report_format,
            size,
        } => run_motus(clusters, motus, output, report_format, size),

        Commands::Compare {
            reference,
            query,
            output_file,
            min_cluster_size,
            max_cluster_size,
        } => run_compare(
            reference,
            query,
            output_file,
            SizeArgs {
                min_cluster_size,
                max_cluster_size,
            },
        ),

        Commands::AnnotationTable {
            genes_catalog,
            taxonomic_annotation,
            functional_annotation,
            annotation_table,
        } => run_annotation_table(
            genes_catalog,
            taxonomic_annotation,
            functional_annotation,
            annotation_table,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Resolve and validate the output destination.
fn output_target(output: OutputArgs, format: CombinedFormat) -> Result<OutputTarget> {
    match (output.output_dir, output.output_file) {
        (Some(dir), _) => {
            require_dir(&dir)?;
            Ok(OutputTarget::Directory(dir))
        }
        (None, Some(path)) => Ok(OutputTarget::File { path, format }),
        (None, None) => Err(ClusterError::InvalidArgument(
            "one of --output-dir or --output-file is required".to_string(),
        )),
    }
}

fn log_done(stats: &ExtractStats) {
    log::info!(
        "Done: {} clusters, {} entries, {} files written",
        stats.clusters_kept,
        stats.entries_written,
        stats.outputs.len()
    );
}

fn run_sizes(clusters: PathBuf, output_file: PathBuf, size: SizeArgs) -> Result<()> {
    require_file(&clusters)?;
    let cmd = SizesCommand::new().with_bounds(size.bounds()?);
    let written = cmd.run(&clusters, &output_file)?;
    log::info!("Done: {} clusters written", written);
    Ok(())
}

fn run_genes(
    clusters: PathBuf,
    genes_catalog: PathBuf,
    output: OutputArgs,
    report_format: CombinedFormat,
    size: SizeArgs,
    join: JoinArgs,
) -> Result<()> {
    require_file(&clusters)?;
    require_file(&genes_catalog)?;
    let target = output_target(output, report_format)?;

    let mut cmd = GenesCommand::new()
        .with_bounds(size.bounds()?)
        .with_size_basis(join.size_basis);
    if let Some(key_mode) = join.key_mode {
        cmd = cmd.with_key_mode(key_mode);
    }

    log_done(&cmd.run(&clusters, &genes_catalog, &target)?);
    Ok(())
}

fn run_profile(
    clusters: PathBuf,
    profiles: PathBuf,
    with_header: bool,
    output: OutputArgs,
    report_format: CombinedFormat,
    size: SizeArgs,
    join: JoinArgs,
) -> Result<()> {
    require_file(&clusters)?;
    require_file(&profiles)?;
    let target = output_target(output, report_format)?;

    let mut cmd = ProfileCommand::new()
        .with_bounds(size.bounds()?)
        .with_size_basis(join.size_basis)
        .with_header(with_header);
    if let Some(key_mode) = join.key_mode {
        cmd = cmd.with_key_mode(key_mode);
    }

    log_done(&cmd.run(&clusters, &profiles, &target)?);
    Ok(())
}

fn run_annotation(
    clusters: PathBuf,
    annotation: PathBuf,
    with_header: bool,
    output: OutputArgs,
    report_format: CombinedFormat,
    size: SizeArgs,
    join: JoinArgs,
) -> Result<()> {
    require_file(&clusters)?;
    require_file(&annotation)?;
    let target = output_target(output, report_format)?;

    let mut cmd = AnnotationCommand::new()
        .with_bounds(size.bounds()?)
        .with_size_basis(join.size_basis)
        .with_header(with_header);
    if let Some(key_mode) = join.key_mode {
        cmd = cmd.with_key_mode(key_mode);
    }

    log_done(&cmd.run(&clusters, &annotation, &target)?);
    Ok(())
}

fn run_connections(
    clusters: PathBuf,
    genes_connections: PathBuf,
    output: OutputArgs,
    report_format: CombinedFormat,
    size: SizeArgs,
    join: JoinArgs,
) -> Result<()> {
    require_file(&clusters)?;
    require_file(&genes_connections)?;
    let target = output_target(output, report_format)?;

    let mut cmd = ConnectionsCommand::new()
        .with_bounds(size.bounds()?)
        .with_size_basis(join.size_basis);
    if let Some(key_mode) = join.key_mode {
        cmd = cmd.with_key_mode(key_mode);
    }

    log_done(&cmd.run(&clusters, &genes_connections, &target)?);
    Ok(())
}

fn run_motus(
    clusters: PathBuf,
    motus: PathBuf,
    output: OutputArgs,
    report_format: CombinedFormat,
    size: SizeArgs,
) -> Result<()> {
    require_file(&clusters)?;
    require_file(&motus)?;
    let target = output_target(output, report_format)?;

    let cmd = MotusCommand::new().with_bounds(size.bounds()?);
    log_done(&cmd.run(&clusters, &motus, &target)?);
    Ok(())
}

fn run_compare(reference: PathBuf, query: PathBuf, output_file: PathBuf, size: SizeArgs) -> Result<()> {
    require_file(&reference)?;
    require_file(&query)?;

    let cmd = CompareCommand::new().with_bounds(size.bounds()?);
    log_done(&cmd.run(&reference, &query, &output_file)?);
    Ok(())
}

fn run_annotation_table(
    genes_catalog: PathBuf,
    taxonomic_annotation: PathBuf,
    functional_annotation: PathBuf,
    annotation_table: PathBuf,
) -> Result<()> {
    require_file(&genes_catalog)?;
    require_file(&taxonomic_annotation)?;
    require_file(&functional_annotation)?;

    let rows = AnnotationTableCommand::new().run(
        &genes_catalog,
        &taxonomic_annotation,
        &functional_annotation,
        &annotation_table,
    )?;
    log::info!("Done: {} genes written", rows);
    Ok(())
}
