use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use criteria_compass::browser::{find_citation, open_url};
use criteria_compass::catalog::EvidenceIndex;
use criteria_compass::config::{init::run_init_wizard, load_config, validate_config};
use criteria_compass::evaluation::{compare_matrix, domain_stats, CompareFilter, StatsFilter};
use criteria_compass::output::{
    format_compare, format_preference_label, format_preferences, format_product_detail,
    format_rails, format_ranking_table, format_ranking_tsv, format_status, format_wizard_summary,
    rank_products, should_use_colors,
};
use criteria_compass::preferences::{
    set_ko, set_ko_many, set_ko_threshold, set_ko_threshold_many, set_relevance,
    set_relevance_many, set_weight, set_weight_many, KoThreshold, Preference, RelevanceLevel,
};
use criteria_compass::prompt::Console;
use criteria_compass::rails::rail_state;
use criteria_compass::selection::{ToggleOutcome, MAX_COMPARE};
use criteria_compass::wizard::{
    ask_answers, CostFocus, DataResidency, Hosting, Sensitivity, SsoNeed, SupportNeed, TeamSize,
    WizardAnswers,
};
use criteria_compass::workspace::{customized_count, Workspace};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn is_on(self) -> bool {
        matches!(self, Switch::On)
    }
}

fn parse_threshold(s: &str) -> Result<KoThreshold, String> {
    s.parse::<u8>()
        .map_err(|e| e.to_string())
        .and_then(KoThreshold::try_from)
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    /// Show every subcriterion's preference
    Show,
    /// Set the weight (0-10); relevance follows
    SetWeight {
        id: String,
        #[arg(allow_negative_numbers = true)]
        weight: i64,
    },
    /// Set relevance; the weight becomes the level's default
    SetRelevance { id: String, level: RelevanceLevel },
    /// Turn knockout on or off
    SetKo { id: String, state: Switch },
    /// Minimum evidence score (1 or 2) a knockout needs
    SetThreshold {
        id: String,
        #[arg(value_parser = parse_threshold)]
        threshold: KoThreshold,
    },
}

#[derive(Subcommand, Debug)]
enum RailsCommand {
    /// List rails with their aggregate state
    List,
    SetRelevance { key: String, level: RelevanceLevel },
    SetWeight {
        key: String,
        #[arg(allow_negative_numbers = true)]
        weight: i64,
    },
    SetKo { key: String, state: Switch },
    SetThreshold {
        key: String,
        #[arg(value_parser = parse_threshold)]
        threshold: KoThreshold,
    },
}

#[derive(Args, Debug)]
struct WizardArgs {
    #[arg(long, value_enum)]
    sensitivity: Option<Sensitivity>,
    #[arg(long, value_enum)]
    data_residency: Option<DataResidency>,
    #[arg(long, value_enum)]
    hosting: Option<Hosting>,
    #[arg(long, value_enum)]
    sso: Option<SsoNeed>,
    #[arg(long, value_enum)]
    team_size: Option<TeamSize>,
    #[arg(long, value_enum)]
    support: Option<SupportNeed>,
    #[arg(long, value_enum)]
    cost_focus: Option<CostFocus>,

    /// Ask the questions in the terminal (flags become the suggested answers)
    #[arg(short, long)]
    interactive: bool,

    /// Mark the result as applied instead of saving it as a draft
    #[arg(long)]
    apply: bool,
}

impl WizardArgs {
    fn answers(&self) -> WizardAnswers {
        let d = WizardAnswers::default();
        WizardAnswers {
            sensitivity: self.sensitivity.unwrap_or(d.sensitivity),
            data_residency: self.data_residency.unwrap_or(d.data_residency),
            hosting: self.hosting.unwrap_or(d.hosting),
            sso: self.sso.unwrap_or(d.sso),
            team_size: self.team_size.unwrap_or(d.team_size),
            support: self.support.unwrap_or(d.support),
            cost_focus: self.cost_focus.unwrap_or(d.cost_focus),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank products (default if no subcommand)
    Rank {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Hide products with knockout violations
        #[arg(long)]
        only_no_ko: bool,
    },
    /// Show one product with per-domain statistics and citations
    Product {
        id: String,
        /// Skip subcriteria marked not applicable
        #[arg(long)]
        only_relevant: bool,
        /// Only subcriteria without evidence (score 0)
        #[arg(long)]
        only_critical: bool,
    },
    /// Compare 2-3 products side by side (default: the current selection)
    Compare {
        ids: Vec<String>,
        /// Show rows where all products score the same too
        #[arg(long)]
        all: bool,
        /// Only must-have and knockout subcriteria
        #[arg(long)]
        only_must_or_ko: bool,
    },
    /// Add a product to the comparison selection, or remove it
    Select { id: String },
    /// Inspect or edit preferences per subcriterion
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },
    /// Inspect or edit rails (groups of related subcriteria)
    Rails {
        #[command(subcommand)]
        command: Option<RailsCommand>,
    },
    /// Scale a whole domain's weights (50-150 %)
    DomainWeight { domain: String, percent: f64 },
    /// Derive preferences from a short questionnaire
    Wizard(WizardArgs),
    /// Mark the current preferences as applied
    Apply,
    /// Drop stored preferences and domain weights
    Reset,
    /// Show preference and selection state
    Status,
    /// Open a citation of a product's evidence in the browser
    Open {
        product: String,
        subcriterion: String,
        /// Citation number (1-based, as shown by `product`)
        #[arg(default_value_t = 1)]
        n: usize,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "criteria-compass")]
#[command(about = "Rank products against weighted criteria with knockout rules", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/criteria-compass/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "criteria_compass=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Rank {
        format: OutputFormat::Table,
        only_no_ko: false,
    });

    if let Commands::Init = command {
        match run_init_wizard(&mut Console::stdio(), cli.config) {
            Ok(_) => std::process::exit(EXIT_SUCCESS),
            Err(e) => {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let config = match load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let workspace = match Workspace::open(config) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    if let Err(e) = run(command, &workspace) {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_DATA);
    }
    std::process::exit(EXIT_SUCCESS);
}

fn run(command: Commands, ws: &Workspace) -> Result<()> {
    let use_colors = should_use_colors();
    match command {
        Commands::Rank { format, only_no_ko } => {
            let prefs = ws.preferences()?;
            let mut evaluations = ws.evaluate(&prefs);
            if only_no_ko {
                evaluations.retain(|e| e.is_ko_free());
            }
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&evaluations)
                        .context("Failed to serialize ranking")?;
                    println!("{}", json);
                }
                OutputFormat::Tsv => {
                    let ranked = rank_products(&ws.dataset.products, &evaluations);
                    println!("{}", format_ranking_tsv(&ranked));
                }
                OutputFormat::Table => {
                    let ranked = rank_products(&ws.dataset.products, &evaluations);
                    println!("{}", format_ranking_table(&ranked, use_colors));
                    if ws.store.load_applied()?.is_some_and(|f| !f.applied) {
                        eprintln!("Showing draft preferences. Run `criteria-compass apply` to confirm them.");
                    }
                }
            }
        }
        Commands::Product {
            id,
            only_relevant,
            only_critical,
        } => {
            let product = ws
                .dataset
                .find_product(&id)
                .with_context(|| format!("Unknown product '{}'", id))?;
            let prefs = ws.preferences()?;
            let evaluations = ws.evaluate(&prefs);
            let evaluation = evaluations
                .iter()
                .find(|e| e.product_id == id)
                .with_context(|| format!("Product '{}' was not evaluated", id))?;
            let filter = StatsFilter {
                only_relevant,
                only_critical,
            };
            let stats = domain_stats(
                &ws.dataset.catalog,
                &ws.dataset.evidence,
                &prefs,
                &id,
                filter,
            );
            let index = EvidenceIndex::new(&ws.dataset.evidence);
            println!(
                "{}",
                format_product_detail(
                    product,
                    evaluation,
                    &stats,
                    &ws.dataset.catalog,
                    &index,
                    use_colors
                )
            );
            if ws.selection.load()?.contains(&id) {
                println!("\n(in comparison selection)");
            }
        }
        Commands::Compare {
            ids,
            all,
            only_must_or_ko,
        } => {
            let mut ids = if ids.is_empty() {
                ws.selection.load()?.product_ids().to_vec()
            } else {
                ids
            };
            if ids.len() > MAX_COMPARE {
                eprintln!("Comparing the first {} products only.", MAX_COMPARE);
                ids.truncate(MAX_COMPARE);
            }
            if ids.len() < 2 {
                anyhow::bail!(
                    "Pick at least two products: `criteria-compass compare <a> <b>` or `criteria-compass select <id>`"
                );
            }
            let products = ids
                .iter()
                .map(|id| {
                    ws.dataset
                        .find_product(id)
                        .with_context(|| format!("Unknown product '{}'", id))
                })
                .collect::<Result<Vec<_>>>()?;
            let prefs = ws.preferences()?;
            let filter = CompareFilter {
                only_diffs: !all,
                only_must_or_ko,
            };
            let rows = compare_matrix(
                &ws.dataset.catalog,
                &ws.dataset.evidence,
                &prefs,
                &ids,
                filter,
            );
            println!("{}", format_compare(&rows, &products, use_colors));
        }
        Commands::Select { id } => {
            if ws.dataset.find_product(&id).is_none() {
                anyhow::bail!("Unknown product '{}'", id);
            }
            let mut selection = ws.selection.load()?;
            match selection.toggle(&id) {
                ToggleOutcome::Added => println!("Added {} to the comparison.", id),
                ToggleOutcome::Removed => println!("Removed {} from the comparison.", id),
                ToggleOutcome::Full => anyhow::bail!(
                    "The comparison already holds {} products. Remove one first.",
                    MAX_COMPARE
                ),
            }
            ws.selection.save(&selection)?;
            println!("Selected: {}", selection.product_ids().join(", "));
        }
        Commands::Prefs { command } => run_prefs(command, ws, use_colors)?,
        Commands::Rails { command } => {
            run_rails(command.unwrap_or(RailsCommand::List), ws, use_colors)?
        }
        Commands::DomainWeight { domain, percent } => {
            let prefs = ws.preferences()?;
            let (multipliers, _) = ws.set_domain_weight(&prefs, &domain, percent)?;
            println!(
                "Domain {} weighted at {:.0}% (draft).",
                domain,
                multipliers.get(&domain) * 100.0
            );
        }
        Commands::Wizard(args) => {
            let answers = if args.interactive {
                ask_answers(&mut Console::stdio(), args.answers())?
            } else {
                args.answers()
            };
            let prefs = ws.preferences()?;
            let outcome = ws.run_wizard(&prefs, &answers);
            println!("Wizard summary:");
            println!("{}", format_wizard_summary(&outcome.summary));
            if args.apply {
                ws.store.save_applied(&outcome.preferences)?;
                println!("Preferences applied.");
            } else {
                ws.store.save_draft(&outcome.preferences)?;
                println!("Saved as draft. Run `criteria-compass apply` to confirm.");
            }
        }
        Commands::Apply => {
            let prefs = ws.preferences()?;
            ws.store.save_applied(&prefs)?;
            println!("Preferences applied.");
        }
        Commands::Reset => {
            ws.store.clear()?;
            println!("Preferences reset to defaults.");
        }
        Commands::Status => {
            let prefs = ws.preferences()?;
            let applied = ws.store.load_applied()?;
            let selection = ws.selection.load()?;
            println!(
                "{}",
                format_status(
                    applied.as_ref(),
                    customized_count(&prefs),
                    prefs.len(),
                    selection.product_ids()
                )
            );
        }
        Commands::Open {
            product,
            subcriterion,
            n,
        } => {
            let index = EvidenceIndex::new(&ws.dataset.evidence);
            let link = find_citation(&index, &product, &subcriterion, n)?;
            println!("Opening {}: {}", link.label, link.url);
            open_url(&link.url)?;
        }
        Commands::Init => anyhow::bail!("init runs before any config is loaded"),
    }
    Ok(())
}

/// Save an edited preference set as draft and echo the touched entry.
fn save_edit(ws: &Workspace, prefs: &[Preference], id: &str) -> Result<()> {
    ws.store.save_draft(prefs)?;
    if let Some(pref) = prefs.iter().find(|p| p.subcriterion_id == id) {
        println!("{}: {} (draft)", id, format_preference_label(pref));
    }
    Ok(())
}

fn run_prefs(command: PrefsCommand, ws: &Workspace, use_colors: bool) -> Result<()> {
    let prefs = ws.preferences()?;
    match command {
        PrefsCommand::Show => {
            println!("{}", format_preferences(&ws.dataset.catalog, &prefs, use_colors));
        }
        PrefsCommand::SetWeight { id, weight } => {
            ws.ensure_subcriterion(&id)?;
            save_edit(ws, &set_weight(&prefs, &id, weight), &id)?;
        }
        PrefsCommand::SetRelevance { id, level } => {
            ws.ensure_subcriterion(&id)?;
            save_edit(ws, &set_relevance(&prefs, &id, level), &id)?;
        }
        PrefsCommand::SetKo { id, state } => {
            ws.ensure_subcriterion(&id)?;
            let updated = set_ko(&prefs, &id, state.is_on());
            if state.is_on() && !updated.iter().any(|p| p.subcriterion_id == id && p.is_ko) {
                eprintln!("{} is not applicable (weight 0) and cannot be a knockout.", id);
            }
            save_edit(ws, &updated, &id)?;
        }
        PrefsCommand::SetThreshold { id, threshold } => {
            ws.ensure_subcriterion(&id)?;
            if !prefs.iter().any(|p| p.subcriterion_id == id && p.is_ko) {
                eprintln!("{} is not a knockout; the threshold only applies once it is.", id);
            }
            save_edit(ws, &set_ko_threshold(&prefs, &id, threshold), &id)?;
        }
    }
    Ok(())
}

fn run_rails(command: RailsCommand, ws: &Workspace, use_colors: bool) -> Result<()> {
    let prefs = ws.preferences()?;
    let (key, updated) = match command {
        RailsCommand::List => {
            println!("{}", format_rails(&ws.rails, &prefs, use_colors));
            return Ok(());
        }
        RailsCommand::SetRelevance { key, level } => {
            let ids = mapped_rail(ws, &key)?;
            let updated = set_relevance_many(&prefs, ids, level);
            (key, updated)
        }
        RailsCommand::SetWeight { key, weight } => {
            let ids = mapped_rail(ws, &key)?;
            let updated = set_weight_many(&prefs, ids, weight);
            (key, updated)
        }
        RailsCommand::SetKo { key, state } => {
            let ids = mapped_rail(ws, &key)?;
            let updated = set_ko_many(&prefs, ids, state.is_on());
            (key, updated)
        }
        RailsCommand::SetThreshold { key, threshold } => {
            let ids = mapped_rail(ws, &key)?;
            let updated = set_ko_threshold_many(&prefs, ids, threshold);
            (key, updated)
        }
    };

    ws.store.save_draft(&updated)?;
    let ids = ws.rail_ids(&key)?;
    if let Some(state) = rail_state(&updated, ids) {
        let mixed = if state.mixed { " (mixed)" } else { "" };
        println!(
            "{}: {} w{}{}{} across {} subcriteria (draft)",
            key,
            state.relevance_level,
            state.weight,
            if state.is_ko {
                format!(" KO>={}", state.ko_threshold)
            } else {
                String::new()
            },
            mixed,
            ids.len()
        );
    }
    Ok(())
}

/// Rail ids, refusing rails that matched nothing.
fn mapped_rail<'a>(ws: &'a Workspace, key: &str) -> Result<&'a [String]> {
    let ids = ws.rail_ids(key)?;
    if ids.is_empty() {
        anyhow::bail!("Rail '{}' is not mapped to any subcriterion in this catalog", key);
    }
    Ok(ids)
}
