use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::debug;

use feed_formulator_rs::cli::{Cli, Command, OutputArgs, ProviderArgs, SessionArgs};
use feed_formulator_rs::error::Result;
use feed_formulator_rs::interface::{
    collect_selection, display_catalog, display_report, prompt_ingredients, prompt_weight,
    prompt_yes_no, write_report_csv, write_report_json,
};
use feed_formulator_rs::logging;
use feed_formulator_rs::models::{Catalog, FeedingParameters};
use feed_formulator_rs::state::{
    FormulationSession, load_catalog, load_mix, load_suggestion, save_mix,
};
use feed_formulator_rs::suggest::{
    HttpSuggestionProvider, SuggestionCoordinator, SuggestionOutcome,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let catalog = Arc::new(load_catalog(&cli.catalog)?);
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Formulate { output } => cmd_formulate(catalog, &output),
        Command::Report { session, output } => {
            let session = build_session(catalog, &session)?;
            finish(&session, &output)
        }
        Command::Apply {
            session,
            suggestion,
            output,
        } => cmd_apply(catalog, &session, &suggestion, &output),
        Command::Suggest {
            session,
            provider,
            output,
        } => cmd_suggest(catalog, &session, &provider, &output),
        Command::Catalog => {
            display_catalog(&catalog);
            Ok(())
        }
    }
}

/// Build a session from command-line flags and apply the requested edits.
fn build_session(catalog: Arc<Catalog>, args: &SessionArgs) -> Result<FormulationSession> {
    let sub_species = match &args.sub_species {
        Some(sub) => sub.clone(),
        None => catalog
            .animal(&args.animal)?
            .sub_species
            .first()
            .cloned()
            .unwrap_or_default(),
    };

    let params = FeedingParameters {
        animal_count: args.animal_count,
        daily_scaling: args.scaling,
        mode: args.mode,
        feedings_per_day: args.feedings,
        ..Default::default()
    };
    let mut session = FormulationSession::with_params(catalog, &args.animal, &sub_species, params)?;

    if let Some(grams) = args.feed_per_animal {
        session.set_feed_per_animal(grams);
        session.reseed();
    }

    if let Some(path) = &args.mix {
        session.replace_mix(load_mix(path)?);
        debug!(path = %path.display(), "loaded mix");
    }

    for name in &args.add {
        if !session.add_ingredient(name)? {
            println!("{} is already in the mix.", name);
        }
    }

    for (name, kg) in &args.weights {
        session.set_ingredient_weight(name, *kg)?;
    }

    for name in &args.lock {
        if !session.toggle_lock(name)? {
            // Already locked in a loaded mix; keep it locked.
            session.toggle_lock(name)?;
        }
    }

    Ok(session)
}

/// Print the report and write any requested outputs.
fn finish(session: &FormulationSession, output: &OutputArgs) -> Result<()> {
    let report = session.report();
    display_report(&report);

    if let Some(path) = &output.csv {
        write_report_csv(&report, path)?;
        println!("Report table written to {}", path.display());
    }
    if let Some(path) = &output.json {
        write_report_json(&report, path)?;
        println!("Report written to {}", path.display());
    }
    if let Some(path) = &output.save {
        save_mix(path, session.mix())?;
        println!("Mix saved to {}", path.display());
    }
    Ok(())
}

/// Walk through selection and ingredient weights interactively.
fn cmd_formulate(catalog: Arc<Catalog>, output: &OutputArgs) -> Result<()> {
    if catalog.animals.is_empty() {
        println!("The catalog lists no animals.");
        return Ok(());
    }

    let (animal, sub_species, count) = collect_selection(&catalog)?;
    let params = FeedingParameters {
        animal_count: count,
        ..Default::default()
    };
    let mut session = FormulationSession::with_params(catalog, &animal, &sub_species, params)?;

    println!();
    println!(
        "Formulating {:.3} kg/day for {} {} ({}).",
        session.total_target_mass(),
        count,
        session.animal(),
        session.sub_species()
    );
    display_report(&session.report());

    let wanted = prompt_ingredients(session.catalog())?;
    for name in &wanted {
        session.add_ingredient(name)?;
    }

    let names: Vec<(String, f64)> = session
        .mix()
        .natural
        .iter()
        .map(|c| (c.name.clone(), c.weight))
        .collect();
    for (name, current) in names {
        let kg = prompt_weight(&name, current)?;
        session.set_ingredient_weight(&name, kg)?;
        if prompt_yes_no(&format!("Lock {} at {:.3} kg?", name, kg), false)? {
            session.toggle_lock(&name)?;
        }
    }

    finish(&session, output)?;

    if output.save.is_none() && prompt_yes_no("Save this mix?", false)? {
        save_mix(Path::new("mix.json"), session.mix())?;
        println!("Mix saved to mix.json");
    }
    Ok(())
}

fn cmd_apply(
    catalog: Arc<Catalog>,
    args: &SessionArgs,
    suggestion: &Path,
    output: &OutputArgs,
) -> Result<()> {
    let mut session = build_session(catalog, args)?;
    let response = load_suggestion(suggestion)?;

    let coordinator = SuggestionCoordinator::new(Duration::ZERO);
    let ticket = coordinator.issue();
    session.apply_suggestion(&ticket, &response)?;

    finish(&session, output)
}

fn cmd_suggest(
    catalog: Arc<Catalog>,
    args: &SessionArgs,
    provider_args: &ProviderArgs,
    output: &OutputArgs,
) -> Result<()> {
    let mut session = build_session(catalog, args)?;
    let request = session.suggestion_request()?;

    let provider =
        HttpSuggestionProvider::new(provider_args.endpoint.clone(), provider_args.api_key.clone());
    let coordinator = SuggestionCoordinator::new(Duration::from_secs(provider_args.timeout_secs));
    let ticket = coordinator.issue();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    println!("Requesting a suggested mix from {}...", provider_args.endpoint);
    let outcome = runtime.block_on(coordinator.fetch(&ticket, &provider, &request))?;

    match outcome {
        SuggestionOutcome::Ready(response) => {
            if let SuggestionOutcome::Superseded = session.apply_suggestion(&ticket, &response)? {
                println!("Suggestion was superseded; mix unchanged.");
            }
        }
        SuggestionOutcome::Superseded => {
            println!("Suggestion was superseded; mix unchanged.");
        }
    }

    finish(&session, output)
}
