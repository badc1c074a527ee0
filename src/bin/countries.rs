use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use countries_rs::config::{DEFAULT_BASE_URL, DEFAULT_LIST_LIMIT};
use countries_rs::detail::{self, country_route};
use countries_rs::prefs::FilePreferences;
use countries_rs::{
    BorderFailurePolicy, Client, Config, DarkMode, FetchState, NameMatch, QueryState, format,
    query, storage,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "countries",
    version,
    about = "Browse, search & inspect countries from the REST Countries API"
)]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct ApiArgs {
    /// Base URL of the REST Countries API.
    #[arg(long, global = true, env = "COUNTRIES_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Total request timeout in seconds.
    #[arg(long, global = true, env = "COUNTRIES_TIMEOUT_SECS", default_value_t = 30)]
    timeout: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List countries (all, by name, or by region) and optionally save them.
    List(ListArgs),
    /// Show one country's details and its border countries.
    Show(ShowArgs),
    /// Show or toggle the persisted dark-mode preference.
    Theme(ThemeArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Search text (partial name match unless --full-text). Blank lists everything.
    #[arg(short, long)]
    search: Option<String>,
    /// Require an exact full-name match for --search.
    #[arg(long, default_value_t = false)]
    full_text: bool,
    /// Region filter: All, Africa, Americas, Asia, Europe or Oceania.
    #[arg(short, long, conflicts_with = "search")]
    region: Option<String>,
    /// Maximum entries for full and name lists (default 250).
    #[arg(long)]
    limit: Option<usize>,
    /// Maximum entries for region lists (default: uncapped).
    #[arg(long)]
    region_limit: Option<usize>,
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Locale for population numbers (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Country name; URL-encoded route form (e.g. United%20Kingdom) is accepted.
    name: String,
    /// Show the country without neighbors if the border lookup fails.
    #[arg(long, default_value_t = false)]
    degrade_borders: bool,
    /// Locale for the population number.
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(ValueEnum, Clone, Debug)]
enum ThemeAction {
    Show,
    Toggle,
}

#[derive(Args, Debug)]
struct ThemeArgs {
    #[arg(value_enum, default_value_t = ThemeAction::Show)]
    action: ThemeAction,
    /// Preference file (defaults to the user config directory).
    #[arg(long)]
    prefs: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::default()
        .with_base_url(cli.api.base_url)
        .with_timeout(Duration::from_secs(cli.api.timeout));
    match cli.cmd {
        Command::List(args) => cmd_list(config, args),
        Command::Show(args) => cmd_show(config, args),
        Command::Theme(args) => cmd_theme(args),
    }
}

fn cmd_list(config: Config, args: ListArgs) -> Result<()> {
    let config = config
        .with_list_limit(Some(args.limit.unwrap_or(DEFAULT_LIST_LIMIT)))
        .with_region_limit(args.region_limit)
        .with_name_match(if args.full_text {
            NameMatch::FullText
        } else {
            NameMatch::Partial
        });
    let state = match (&args.search, &args.region) {
        (Some(text), _) => QueryState::name(text.as_str()),
        (None, Some(region)) => QueryState::region(region.as_str()),
        (None, None) => QueryState::all(),
    };

    let client = Client::new(&config);
    let countries = match query::resolve(&client, &state, &config) {
        FetchState::Ready(list) => list,
        FetchState::Failed(msg) => bail!("{}", msg),
        FetchState::Loading => bail!("query did not settle"),
    };

    if countries.is_empty() {
        println!("No countries match your search.");
    }
    for c in &countries {
        println!(
            "{:<40} {:<10} {:<24} {:>15}",
            c.common_name,
            c.region,
            c.capital.as_deref().unwrap_or("-"),
            format::population(c.population, &args.locale)
        );
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&countries, path)?,
            "json" => storage::save_json(&countries, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} countries to {}", countries.len(), path.display());
    }

    Ok(())
}

fn cmd_show(config: Config, args: ShowArgs) -> Result<()> {
    let config = if args.degrade_borders {
        config.with_border_policy(BorderFailurePolicy::Degrade)
    } else {
        config
    };
    let name = detail::decode_name(&args.name);
    let client = Client::new(&config);
    let view = match detail::resolve_detail_state(&client, &name, &config) {
        FetchState::Ready(view) => view,
        FetchState::Failed(msg) => bail!("{}", msg),
        FetchState::Loading => bail!("lookup did not settle"),
    };

    let d = &view.detail;
    let shown = d.display();
    println!("{}", d.common_name);
    println!("  Flag:             {}", d.flag_url);
    println!("  Native Name:      {}", shown.native_name);
    println!("  Capital:          {}", shown.capital);
    println!(
        "  Population:       {}",
        format::population(d.population, &args.locale)
    );
    println!("  Region:           {}", shown.region);
    if let Some(sub) = &shown.subregion {
        println!("  Subregion:        {}", sub);
    }
    println!("  Top Level Domain: {}", shown.top_level_domain);
    println!("  Currencies:       {}", shown.currencies);
    println!("  Languages:        {}", shown.languages);
    println!("  Border Countries:");
    if view.borders.is_empty() {
        println!("    No border countries");
    }
    for b in &view.borders {
        println!(
            "    {:<4} {:<32} {}",
            b.code,
            b.common_name,
            country_route(&b.common_name)
        );
    }
    Ok(())
}

fn cmd_theme(args: ThemeArgs) -> Result<()> {
    let store = match args.prefs {
        Some(path) => FilePreferences::new(path),
        None => FilePreferences::default_location(),
    };
    let mut mode = DarkMode::init(store);
    let enabled = match args.action {
        ThemeAction::Show => mode.is_enabled(),
        ThemeAction::Toggle => mode.toggle(),
    };
    println!("{}", if enabled { "dark" } else { "light" });
    Ok(())
}
